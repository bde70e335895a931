use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

/// Keys while the status-change confirmation dialog is open. Printable
/// keys go into the comment.
pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.transition.cancel(),
        KeyCode::Enter => {
            if !app.transition.is_submitting() {
                app.confirm_transition();
            }
        }
        KeyCode::Backspace => app.transition.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.transition.push_char(c);
        }
        _ => {}
    }
}
