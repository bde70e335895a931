use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::TaskStatus;
use crate::ops::navigation::NavKey;
use crate::tui::app::{App, MenuKind, Overlay};

/// Keys while the list has focus and no popup is open
pub(super) fn handle_list(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('k') {
            app.open_search();
        }
        return;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.handle_nav(NavKey::Up);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.handle_nav(NavKey::Down);
        }
        KeyCode::Enter => {
            app.handle_nav(NavKey::Enter);
        }
        KeyCode::Tab => app.cycle_tab(true),
        KeyCode::BackTab => app.cycle_tab(false),
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(status) = TaskStatus::from_shortcut(c) {
                app.switch_tab(status);
            }
        }
        KeyCode::Char('/') => app.open_search(),
        KeyCode::Char('l') => app.open_menu(MenuKind::Label),
        KeyCode::Char('a') => app.open_menu(MenuKind::Assignee),
        KeyCode::Char('s') => app.open_menu(MenuKind::Sort),
        KeyCode::Char('x') => app.clear_filters(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Backspace => app.go_back(),
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}
