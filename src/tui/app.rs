use std::io;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::io::api_client::TaskApi;
use crate::io::query_cache::{QueryClient, QueryKey};
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::worker::{ApiWorker, Completion, Request};
use crate::model::{ClientConfig, Label, Task, TaskStatus};
use crate::ops::derive::{SortOrder, derive};
use crate::ops::navigation::{ListNavigator, NavKey, NavOutcome, PrefetchTrigger};
use crate::ops::selection::{Location, Selection, SelectionKey};
use crate::ops::transition::{CompletionOutcome, SelectOutcome, TransitionFlow};

use super::input;
use super::render;
use super::theme::Theme;

/// Terminal rows per task in the list
pub const ROW_HEIGHT: u16 = 2;

/// Which filter a dropdown menu edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Label,
    Assignee,
    Sort,
}

impl MenuKind {
    pub fn key(self) -> SelectionKey {
        match self {
            MenuKind::Label => SelectionKey::Label,
            MenuKind::Assignee => SelectionKey::Assignee,
            MenuKind::Sort => SelectionKey::SortBy,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MenuKind::Label => "Label",
            MenuKind::Assignee => "Assignee",
            MenuKind::Sort => "Sort",
        }
    }
}

/// One entry of a filter menu: display text and the value it writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub text: String,
    pub value: Option<String>,
}

/// Popup layered over the list (the task modal and confirm dialog are
/// tracked by their own state machines)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Search,
    Menu { kind: MenuKind, cursor: usize },
    Help,
}

/// Main application state
pub struct App {
    /// Source of truth for tab, filters and sort
    pub location: Location,
    pub queries: QueryClient,
    pub nav: ListNavigator,
    pub prefetch: PrefetchTrigger,
    pub transition: TransitionFlow,
    pub overlay: Overlay,
    /// Text in the search box while it is open
    pub search_input: String,
    pub theme: Theme,
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// First task index drawn in the list
    pub scroll_offset: usize,
    /// Where the list rows were last drawn (for mouse hit testing)
    pub list_area: Rect,
    /// Task indices drawn in the last frame
    pub visible_rows: Range<usize>,
    /// Requests waiting to be handed to the worker
    outbox: Vec<Request>,
}

impl App {
    pub fn new(query: &str, theme: Theme) -> Self {
        let mut app = App {
            location: Location::from_query(query),
            queries: QueryClient::new(),
            nav: ListNavigator::new(),
            prefetch: PrefetchTrigger::new(),
            transition: TransitionFlow::new(),
            overlay: Overlay::None,
            search_input: String::new(),
            theme,
            status_message: None,
            should_quit: false,
            scroll_offset: 0,
            list_area: Rect::default(),
            visible_rows: 0..0,
            outbox: Vec::new(),
        };
        app.request_data();
        app
    }

    pub fn selection(&self) -> Selection {
        self.location.selection()
    }

    pub fn active_status(&self) -> TaskStatus {
        self.selection().active_status()
    }

    /// The derived list for the active tab
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let selection = self.selection();
        derive(
            self.queries.task_list(selection.active_status()),
            &selection.filters(),
            selection.sort_order(),
        )
    }

    pub fn focused_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.nav.focus()).copied()
    }

    /// Hand pending requests to the caller (the event loop's worker)
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    /// Queue whatever the current screen needs and does not have
    pub fn request_data(&mut self) {
        let status = self.active_status();
        let wanted = [
            self.queries.ensure_tasks(status),
            self.queries.ensure_counts(),
            self.queries.ensure_assignees(),
        ];
        self.outbox.extend(wanted.into_iter().flatten());
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Write one selection value. Returns whether the location changed.
    pub fn navigate(&mut self, key: SelectionKey, value: Option<&str>) -> bool {
        let changed = self.location.write(key, value);
        if changed {
            debug!(query = %self.location.query_string(), "navigate");
            self.on_selection_changed();
        }
        changed
    }

    pub fn go_back(&mut self) {
        if self.location.back() {
            self.on_selection_changed();
        } else {
            self.status_message = Some("No earlier view".into());
        }
    }

    pub fn switch_tab(&mut self, status: TaskStatus) {
        self.navigate(SelectionKey::ActiveTab, Some(status.as_str()));
    }

    /// Move to the neighbouring tab, wrapping around
    pub fn cycle_tab(&mut self, forward: bool) {
        let all = TaskStatus::ALL;
        let idx = all
            .iter()
            .position(|s| *s == self.active_status())
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % all.len()
        } else {
            (idx + all.len() - 1) % all.len()
        };
        self.switch_tab(all[next]);
    }

    /// Remove search, label, assignee and sort in one go
    pub fn clear_filters(&mut self) {
        let changed = self.location.write_many(&[
            (SelectionKey::SearchQuery, None),
            (SelectionKey::Label, None),
            (SelectionKey::Assignee, None),
            (SelectionKey::SortBy, None),
        ]);
        if changed {
            debug!(query = %self.location.query_string(), "filters cleared");
            self.on_selection_changed();
        }
    }

    fn on_selection_changed(&mut self) {
        self.nav.reset_focus();
        self.transition.reset();
        self.prefetch.reset();
        self.scroll_offset = 0;
        self.request_data();
    }

    /// Options for a filter menu; the first entry always clears the filter
    pub fn menu_options(&self, kind: MenuKind) -> Vec<MenuOption> {
        let mut options = vec![MenuOption {
            text: "Clear".into(),
            value: None,
        }];
        match kind {
            MenuKind::Label => options.extend(Label::ALL.into_iter().map(|l| MenuOption {
                text: l.title().into(),
                value: Some(l.as_str().into()),
            })),
            MenuKind::Assignee => {
                if let Some(names) = self.queries.assignees().data() {
                    options.extend(names.iter().map(|n| MenuOption {
                        text: n.clone(),
                        value: Some(n.clone()),
                    }));
                }
            }
            MenuKind::Sort => options.extend(SortOrder::ALL.into_iter().map(|o| MenuOption {
                text: o.label().into(),
                value: Some(o.as_str().into()),
            })),
        }
        options
    }

    pub fn open_menu(&mut self, kind: MenuKind) {
        // Start on the entry matching the current value
        let current = self.location.read(kind.key(), None);
        let cursor = self
            .menu_options(kind)
            .iter()
            .position(|o| o.value == current)
            .unwrap_or(0);
        self.overlay = Overlay::Menu { kind, cursor };
    }

    pub fn open_search(&mut self) {
        self.search_input = self
            .location
            .read(SelectionKey::SearchQuery, None)
            .unwrap_or_default();
        self.overlay = Overlay::Search;
    }

    /// Apply the search box text as the search filter (empty clears it)
    pub fn apply_search_input(&mut self) {
        let value = (!self.search_input.is_empty()).then(|| self.search_input.clone());
        self.navigate(SelectionKey::SearchQuery, value.as_deref());
    }

    // -----------------------------------------------------------------------
    // Navigation and status changes
    // -----------------------------------------------------------------------

    pub fn handle_nav(&mut self, key: NavKey) -> NavOutcome {
        let len = self.visible_tasks().len();
        let outcome = self.nav.handle(key, len);
        self.after_nav(outcome);
        outcome
    }

    /// Mouse click on list row `index`
    pub fn activate_row(&mut self, index: usize) {
        let len = self.visible_tasks().len();
        let outcome = self.nav.activate(index, len);
        self.after_nav(outcome);
    }

    fn after_nav(&mut self, outcome: NavOutcome) {
        match outcome {
            NavOutcome::FocusChanged { .. } | NavOutcome::ModalClosed => self.transition.reset(),
            _ => {}
        }
    }

    /// Status key pressed in the task modal
    pub fn select_status(&mut self, new_status: TaskStatus) {
        let Some((id, current)) = self.focused_task().map(|t| (t.id, t.status)) else {
            return;
        };
        match self.transition.select(id, current, new_status) {
            SelectOutcome::Pending => self.status_message = None,
            SelectOutcome::Unchanged => {
                self.status_message = Some(format!("Task is already {}", current.label()))
            }
            SelectOutcome::Busy => self.status_message = Some("Update in progress".into()),
        }
    }

    pub fn confirm_transition(&mut self) {
        match self.transition.confirm() {
            Some((ticket, update)) => {
                info!(id = update.id, status = %update.status, ticket, "submitting status change");
                self.outbox.push(Request::UpdateStatus { ticket, update });
            }
            None => self.status_message = Some("A comment is required".into()),
        }
    }

    /// Manual refresh: drop cached data for the active tab, counts and
    /// assignees, then refetch
    pub fn refresh(&mut self) {
        self.queries
            .invalidate(QueryKey::Tasks(self.active_status()));
        self.queries.invalidate(QueryKey::StatusCounts);
        self.queries.invalidate(QueryKey::Assignees);
        self.prefetch.reset();
        self.status_message = Some("Refreshing\u{2026}".into());
        self.request_data();
    }

    // -----------------------------------------------------------------------
    // Event loop hooks
    // -----------------------------------------------------------------------

    pub fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::StatusUpdated {
                ticket,
                update,
                result,
            } => {
                if result.is_ok() {
                    // Whether or not the dialog is still waiting for it
                    self.queries.invalidate_all_tasks();
                    self.queries.invalidate(QueryKey::StatusCounts);
                    self.status_message = Some(format!(
                        "#{} moved to {}",
                        update.id,
                        update.status.label()
                    ));
                }
                match self.transition.complete(ticket, result) {
                    CompletionOutcome::Failed(message) => {
                        warn!(id = update.id, error = %message, "status change failed");
                        self.status_message = Some(format!("Update failed: {}", message));
                    }
                    CompletionOutcome::Superseded => {
                        debug!(ticket, "status change completion superseded");
                    }
                    CompletionOutcome::Succeeded => {}
                }
                self.request_data();
            }
            other => {
                if self.queries.apply(other) {
                    self.clamp_focus();
                    self.request_data();
                }
            }
        }
    }

    /// Keep focus inside the derived list. A draft whose task is no longer
    /// the one under focus (reordered, replaced or gone) is dropped.
    pub fn clamp_focus(&mut self) {
        let len = self.visible_tasks().len();
        let outcome = self.nav.clamp(len);
        self.after_nav(outcome);
        if let Some(drafted) = self.transition.task_id()
            && self.focused_task().map(|t| t.id) != Some(drafted)
        {
            debug!(task = drafted, "focused task changed under the draft");
            self.transition.reset();
        }
    }

    /// Fetch the next page if the second-to-last row is in view
    pub fn check_prefetch(&mut self) {
        let status = self.active_status();
        let len = self.visible_tasks().len();
        let flags = self
            .queries
            .tasks(status)
            .map(|t| t.paging_flags())
            .unwrap_or_default();
        if self.prefetch.observe(self.visible_rows.clone(), len, flags)
            && let Some(request) = self.queries.fetch_next_page(status)
        {
            self.outbox.push(request);
        }
    }

    /// Keep the focused row in view for a list `rows` tasks tall
    pub fn scroll_into_view(&mut self, rows: usize) {
        let focus = self.nav.focus();
        let rows = rows.max(1);
        if focus < self.scroll_offset {
            self.scroll_offset = focus;
        } else if focus >= self.scroll_offset + rows {
            self.scroll_offset = focus + 1 - rows;
        }
    }
}

/// Run the TUI application
pub fn run(
    api: Arc<dyn TaskApi>,
    config: &ClientConfig,
    initial_query: Option<&str>,
    state_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    // An explicit --query wins over the restored one
    let query = match initial_query {
        Some(q) => q.to_string(),
        None => read_ui_state(state_path)
            .map(|s| s.last_query)
            .unwrap_or_default(),
    };
    let mut app = App::new(&query, Theme::from_config(&config.ui));
    let worker = ApiWorker::new(api);
    info!(query = %app.location.query_string(), "starting dashboard");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &worker);

    let state = UiState {
        last_query: app.location.params().encode(),
    };
    if let Err(e) = write_ui_state(state_path, &state) {
        warn!(error = %e, path = %state_path.display(), "could not save ui state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &ApiWorker,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for completion in worker.poll() {
            app.apply_completion(completion);
        }

        terminal.draw(|frame| render::render(frame, app))?;

        app.check_prefetch();
        for request in app.take_requests() {
            worker.dispatch(request);
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
