use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::ops::transition::TransitionState;
use crate::tui::app::App;

use super::helpers::centered_fixed;

/// Render the status-change confirmation dialog with its comment box
pub fn render_confirm_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_area = centered_fixed(56, 12, area);
    frame.render_widget(Clear, dialog_area);

    let theme = &app.theme;
    let bg = theme.background;
    let text = Style::default().fg(theme.text).bg(bg);
    let dim = Style::default().fg(theme.dim).bg(bg);
    let bright = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let (from, to) = match (app.focused_task(), app.transition.new_status()) {
        (Some(task), Some(to)) => (task.status, to),
        _ => return,
    };

    let mut lines = vec![
        Line::from(Span::styled(" Are you sure to change the status ?", bright)),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!(" {} ", from.label()), Style::default().fg(theme.status_color(from)).bg(bg)),
            Span::styled("\u{2192} ", dim),
            Span::styled(to.label(), Style::default().fg(theme.status_color(to)).bg(bg).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Comment", dim)),
    ];

    let comment = app.transition.comment();
    let mut comment_line = vec![Span::styled(" > ", dim), Span::styled(comment.to_string(), text)];
    if !app.transition.is_submitting() {
        comment_line.push(Span::styled(
            "\u{258C}",
            Style::default().fg(theme.highlight).bg(bg),
        ));
    }
    lines.push(Line::from(comment_line));
    lines.push(Line::from(""));

    if let TransitionState::PendingConfirm {
        error: Some(error), ..
    } = app.transition.state()
    {
        lines.push(Line::from(Span::styled(
            format!(" Update failed: {}", error),
            Style::default().fg(theme.red).bg(bg),
        )));
    }

    let footer = if app.transition.is_submitting() {
        vec![Span::styled(" Submitting\u{2026}", dim)]
    } else {
        let confirm_style = if app.transition.can_confirm() {
            Style::default()
                .fg(theme.background)
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            dim
        };
        vec![
            Span::styled(" ", text),
            Span::styled(" Enter Confirm ", confirm_style),
            Span::styled("  ", text),
            Span::styled("Esc Cancel", dim),
        ]
    };
    lines.push(Line::from(footer));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .title(Span::styled(" Change status ", bright))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, dialog_area);
}
