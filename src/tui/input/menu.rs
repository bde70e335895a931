use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Overlay};

/// Keys while a filter menu is open
pub(super) fn handle_menu(app: &mut App, key: KeyEvent) {
    let Overlay::Menu { kind, cursor } = app.overlay else {
        return;
    };
    let len = app.menu_options(kind).len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.overlay = Overlay::Menu {
                kind,
                cursor: cursor.saturating_sub(1),
            };
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.overlay = Overlay::Menu {
                kind,
                cursor: (cursor + 1).min(len.saturating_sub(1)),
            };
        }
        KeyCode::Enter => {
            let value = app
                .menu_options(kind)
                .into_iter()
                .nth(cursor)
                .and_then(|o| o.value);
            app.overlay = Overlay::None;
            app.navigate(kind.key(), value.as_deref());
        }
        KeyCode::Esc => app.overlay = Overlay::None,
        _ => {}
    }
}
