mod confirm;
mod list;
mod menu;
mod modal;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::app::{App, Overlay, ROW_HEIGHT};
use crate::ops::navigation::NavKey;

use confirm::handle_confirm;
use list::handle_list;
use menu::handle_menu;
use modal::handle_modal;
use search::handle_search;

/// Handle a key event. Layers are checked top-down: help, confirm
/// dialog, search box, filter menu, task modal, then the list itself.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    app.status_message = None;

    if app.overlay == Overlay::Help {
        app.overlay = Overlay::None;
        return;
    }
    if app.transition.is_confirming() {
        handle_confirm(app, key);
        return;
    }
    match app.overlay {
        Overlay::Search => handle_search(app, key),
        Overlay::Menu { .. } => handle_menu(app, key),
        _ if app.nav.is_modal_open() => handle_modal(app, key),
        _ => handle_list(app, key),
    }
}

/// Mouse input: click a row to open it, wheel to move focus
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.overlay != Overlay::None || app.transition.is_confirming() {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if !app.nav.is_modal_open() => {
            if let Some(index) = row_at(app, mouse.column, mouse.row) {
                app.activate_row(index);
            }
        }
        MouseEventKind::ScrollDown if !app.nav.is_modal_open() => {
            app.handle_nav(NavKey::Down);
        }
        MouseEventKind::ScrollUp if !app.nav.is_modal_open() => {
            app.handle_nav(NavKey::Up);
        }
        _ => {}
    }
}

/// Pasted text goes to whichever text field is open
pub fn handle_paste(app: &mut App, text: &str) {
    let clean = text.replace(['\n', '\r'], " ");
    if app.transition.is_confirming() {
        app.transition.push_str(&clean);
    } else if app.overlay == Overlay::Search {
        app.search_input.push_str(&clean);
        app.apply_search_input();
    }
}

/// Task index under a screen position, if it lands on a drawn row
fn row_at(app: &App, column: u16, row: u16) -> Option<usize> {
    let area = app.list_area;
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    if !inside {
        return None;
    }
    let index = app.scroll_offset + ((row - area.y) / ROW_HEIGHT) as usize;
    app.visible_rows.contains(&index).then_some(index)
}
