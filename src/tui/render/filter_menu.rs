use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, MenuKind};
use crate::util::text::{display_width, truncate_to_width};

/// Dropdown for the label, assignee or sort filter, anchored top-right of
/// the list area
pub fn render_filter_menu(frame: &mut Frame, app: &App, area: Rect, kind: MenuKind, cursor: usize) {
    let options = app.menu_options(kind);
    let current = app.location.read(kind.key(), None);

    let inner_width = options
        .iter()
        .map(|o| display_width(&o.text) + 4)
        .max()
        .unwrap_or(0)
        .max(display_width(kind.title()) + 4)
        .min(40);
    let width = (inner_width as u16 + 2).min(area.width);
    let height = (options.len() as u16 + 2).min(area.height);
    let menu_area = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y,
        width,
        height,
    };
    frame.render_widget(Clear, menu_area);

    let theme = &app.theme;
    let bg = theme.background;
    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let selected = i == cursor;
            let style = if selected {
                Style::default()
                    .fg(theme.text_bright)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else if option.value.is_none() {
                Style::default().fg(theme.dim).bg(bg)
            } else {
                Style::default().fg(theme.text).bg(bg)
            };
            let check = if option.value.is_some() && option.value == current {
                "\u{2713} "
            } else {
                "  "
            };
            let text = truncate_to_width(&option.text, inner_width.saturating_sub(2));
            let pad = inner_width.saturating_sub(display_width(&text) + 2);
            Line::from(Span::styled(
                format!("{}{}{}", check, text, " ".repeat(pad)),
                style,
            ))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .title(Span::styled(
            format!(" {} ", kind.title()),
            Style::default().fg(theme.text_bright).bg(bg),
        ))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), menu_area);
}
