use crossterm::event::{KeyCode, KeyEvent};

use crate::model::TaskStatus;
use crate::ops::navigation::NavKey;
use crate::tui::app::{App, Overlay};

/// Keys while the task detail modal is open
pub(super) fn handle_modal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            app.handle_nav(NavKey::Left);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.handle_nav(NavKey::Right);
        }
        KeyCode::Esc | KeyCode::Char('q') => {
            app.handle_nav(NavKey::Close);
        }
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Char(c) => {
            if let Some(status) = TaskStatus::from_shortcut(c) {
                app.select_status(status);
            }
        }
        _ => {}
    }
}
