use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::TaskStatus;
use crate::tui::app::{App, Overlay};
use crate::util::text::{display_width, truncate_to_width};

use super::helpers::spans_width;

/// Render the status tabs with their counts, the search box on the right,
/// and a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);

    let sep = "\u{2500}".repeat(area.width as usize);
    let separator = Paragraph::new(Span::styled(
        sep,
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ));
    frame.render_widget(separator, chunks[1]);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));
    let counts = app.queries.counts().data();
    let active = app.active_status();

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", bg_style),
        Span::styled(
            "\u{25B6}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
        Span::styled(" ", bg_style),
    ];

    for status in TaskStatus::ALL {
        let is_current = status == active;
        let style = tab_style(app, is_current);
        spans.push(Span::styled(format!(" {} ", status.label()), style));
        if let Some(counts) = counts {
            let tab_bg = if is_current { app.theme.selection_bg } else { bg };
            spans.push(Span::styled(
                format!("{} ", counts.get(status)),
                Style::default().fg(app.theme.status_color(status)).bg(tab_bg),
            ));
        }
        spans.push(sep.clone());
    }

    // Search box, right-aligned
    let query = app.selection().search_query.unwrap_or_default();
    let searching = app.overlay == Overlay::Search;
    let (text, style) = if searching {
        (
            format!("/{}\u{258C}", app.search_input),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )
    } else if query.is_empty() {
        (
            "/ Search tasks (Ctrl+K)".to_string(),
            Style::default().fg(app.theme.dim).bg(bg),
        )
    } else {
        (
            format!("/{}", query),
            Style::default().fg(app.theme.text).bg(bg),
        )
    };
    let used = spans_width(&spans);
    let width = area.width as usize;
    if used + 4 < width {
        let room = width - used - 2;
        let text = truncate_to_width(&text, room);
        let pad = room - display_width(&text);
        spans.push(Span::styled(" ".repeat(pad + 1), bg_style));
        spans.push(Span::styled(text, style));
        spans.push(Span::styled(" ", bg_style));
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
}

fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}
