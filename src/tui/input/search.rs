use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

use crate::tui::app::{App, Overlay};

/// Keys while the search box is open. Every edit is applied immediately.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.overlay = Overlay::None,
        KeyCode::Backspace => {
            if let Some((idx, _)) = app.search_input.grapheme_indices(true).next_back() {
                app.search_input.truncate(idx);
                app.apply_search_input();
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input.clear();
            app.apply_search_input();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input.push(c);
            app.apply_search_input();
        }
        _ => {}
    }
}
