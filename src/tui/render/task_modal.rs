use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::model::TaskStatus;
use crate::tui::app::App;
use crate::util::text::time_ago;

use super::helpers::{centered_rect, label_chip};

/// Render the detail modal for the focused task
pub fn render_task_modal(frame: &mut Frame, app: &App, area: Rect) {
    let modal_area = centered_rect(80, 90, area);
    frame.render_widget(Clear, modal_area);

    let theme = &app.theme;
    let bg = theme.background;
    let text = Style::default().fg(theme.text).bg(bg);
    let dim = Style::default().fg(theme.dim).bg(bg);
    let bright = Style::default()
        .fg(theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let visible = app.visible_tasks();
    let position = app.nav.focus();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.selection_border).bg(bg))
        .title(Span::styled(
            format!(" {} of {} ", (position + 1).min(visible.len()), visible.len()),
            dim,
        ))
        .style(Style::default().bg(bg));

    let Some(task) = visible.get(position) else {
        let empty = Paragraph::new(Line::from(Span::styled(" No task selected", dim))).block(block);
        frame.render_widget(empty, modal_area);
        return;
    };

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(format!(" #{} ", task.id), dim),
            Span::styled(task.name.clone(), bright),
        ]),
        Line::from(""),
    ];

    let field = |name: &str, value: Span<'static>| {
        Line::from(vec![Span::styled(format!(" {:<10}", name), dim), value])
    };
    lines.push(field(
        "Status",
        Span::styled(
            task.status.label(),
            Style::default().fg(theme.status_color(task.status)).bg(bg),
        ),
    ));
    lines.push(field("Priority", Span::styled(task.priority.clone(), text)));
    lines.push(field("Assignee", Span::styled(task.assignee.clone(), text)));
    let created = match task.created_timestamp() {
        Some(ts) => format!("{} ({})", task.created_at, time_ago(&ts, &Utc::now())),
        None => task.created_at.clone(),
    };
    lines.push(field("Created", Span::styled(created, text)));

    let mut labels = vec![Span::styled(format!(" {:<10}", "Labels"), dim)];
    if task.labels.is_empty() {
        labels.push(Span::styled("none", dim));
    }
    for (i, label) in task.labels.iter().enumerate() {
        if i > 0 {
            labels.push(Span::styled(" ", text));
        }
        labels.push(label_chip(theme, *label));
    }
    lines.push(Line::from(labels));
    lines.push(Line::from(""));

    let description = if task.description.is_empty() {
        Span::styled(" No description", dim)
    } else {
        Span::styled(format!(" {}", task.description), text)
    };
    lines.push(Line::from(description));
    if let Some(comment) = task.comment.as_deref().filter(|c| !c.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Last comment: ", dim),
            Span::styled(comment.to_string(), text),
        ]));
    }
    lines.push(Line::from(""));

    // Status picker
    let mut picker = vec![Span::styled(" Move to  ", dim)];
    for status in TaskStatus::ALL {
        let chosen = app.transition.new_status() == Some(status);
        let current = status == task.status;
        let style = if chosen {
            Style::default()
                .fg(theme.background)
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else if current {
            Style::default().fg(theme.dim).bg(bg)
        } else {
            Style::default().fg(theme.status_color(status)).bg(bg)
        };
        picker.push(Span::styled(
            format!("[{}] {}", status.shortcut(), status.label()),
            style,
        ));
        picker.push(Span::styled("  ", text));
    }
    lines.push(Line::from(picker));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " \u{2190}/\u{2192} previous/next   1-3 change status   Esc close",
        dim,
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, modal_area);
}
