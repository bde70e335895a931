//! Focus/modal state machine over the derived list, plus the
//! second-to-last-row prefetch trigger.

use std::ops::Range;

/// Navigation intents, already decoded from raw key or mouse input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Enter,
    Left,
    Right,
    Close,
}

/// What a navigation event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Focus moved from one index to another
    FocusChanged { from: usize, to: usize },
    ModalOpened,
    ModalClosed,
    /// A move was requested at a boundary; nothing changed
    Blocked,
    /// The key means nothing in the current mode
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListNavigator {
    focus: usize,
    modal_open: bool,
}

impl ListNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Route a key by mode: Up/Down/Enter while the modal is closed,
    /// Left/Right while it is open. `len` is the derived list length.
    pub fn handle(&mut self, key: NavKey, len: usize) -> NavOutcome {
        if key == NavKey::Close {
            return if self.modal_open {
                self.modal_open = false;
                NavOutcome::ModalClosed
            } else {
                NavOutcome::Ignored
            };
        }
        if len == 0 {
            return NavOutcome::Ignored;
        }
        match (self.modal_open, key) {
            (false, NavKey::Up) | (true, NavKey::Left) => self.step_back(),
            (false, NavKey::Down) | (true, NavKey::Right) => self.step_forward(len),
            (false, NavKey::Enter) => {
                self.modal_open = true;
                NavOutcome::ModalOpened
            }
            _ => NavOutcome::Ignored,
        }
    }

    /// Pointer activation of a row: focus it and open the modal
    pub fn activate(&mut self, index: usize, len: usize) -> NavOutcome {
        if index >= len {
            return NavOutcome::Ignored;
        }
        let from = self.focus;
        self.focus = index;
        self.modal_open = true;
        if from != index {
            NavOutcome::FocusChanged { from, to: index }
        } else {
            NavOutcome::ModalOpened
        }
    }

    /// The list was replaced (tab/filter/sort change). The modal stays as it
    /// is and now shows whatever is at index 0.
    pub fn reset_focus(&mut self) -> NavOutcome {
        let from = std::mem::take(&mut self.focus);
        if from != 0 {
            NavOutcome::FocusChanged { from, to: 0 }
        } else {
            NavOutcome::Ignored
        }
    }

    /// Pull focus back inside a list that shrank
    pub fn clamp(&mut self, len: usize) -> NavOutcome {
        let max = len.saturating_sub(1);
        if self.focus > max {
            let from = self.focus;
            self.focus = max;
            NavOutcome::FocusChanged { from, to: max }
        } else {
            NavOutcome::Ignored
        }
    }

    fn step_back(&mut self) -> NavOutcome {
        if self.focus == 0 {
            return NavOutcome::Blocked;
        }
        let from = self.focus;
        self.focus -= 1;
        NavOutcome::FocusChanged { from, to: self.focus }
    }

    fn step_forward(&mut self, len: usize) -> NavOutcome {
        if self.focus + 1 >= len {
            return NavOutcome::Blocked;
        }
        let from = self.focus;
        self.focus += 1;
        NavOutcome::FocusChanged { from, to: self.focus }
    }
}

/// Paging flags the trigger needs from the task cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingFlags {
    pub loading: bool,
    pub has_next_page: bool,
    pub fetching_next_page: bool,
}

/// Edge-triggered prefetch: fires once when the second-to-last row comes
/// into view while another page can be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefetchTrigger {
    /// Sentinel index the current arming applies to
    sentinel: Option<usize>,
    armed: bool,
}

impl Default for PrefetchTrigger {
    fn default() -> Self {
        PrefetchTrigger {
            sentinel: None,
            armed: true,
        }
    }
}

impl PrefetchTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous sentinel (list replaced)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Report the rows currently on screen. Returns true when the next
    /// page should be requested now.
    pub fn observe(&mut self, visible: Range<usize>, len: usize, flags: PagingFlags) -> bool {
        let Some(sentinel) = len.checked_sub(2) else {
            self.sentinel = None;
            self.armed = true;
            return false;
        };
        if self.sentinel != Some(sentinel) {
            self.sentinel = Some(sentinel);
            self.armed = true;
        }
        if !visible.contains(&sentinel) {
            self.armed = true;
            return false;
        }
        if flags.loading || !flags.has_next_page || flags.fetching_next_page || !self.armed {
            return false;
        }
        self.armed = false;
        true
    }
}
