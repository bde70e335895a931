pub mod confirm_dialog;
pub mod filter_menu;
pub mod help_overlay;
mod helpers;
pub mod status_row;
pub mod tab_bar;
pub mod task_list;
pub mod task_modal;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Overlay};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | task list | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // list with its header
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);
    task_list::render_task_list(frame, app, chunks[1]);

    if app.nav.is_modal_open() {
        task_modal::render_task_modal(frame, app, chunks[1]);
    }
    if app.transition.is_confirming() {
        confirm_dialog::render_confirm_dialog(frame, app, area);
    }
    match app.overlay {
        Overlay::Menu { kind, cursor } => {
            filter_menu::render_filter_menu(frame, app, chunks[1], kind, cursor)
        }
        Overlay::Help => help_overlay::render_help_overlay(frame, app, area),
        Overlay::Search | Overlay::None => {}
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
