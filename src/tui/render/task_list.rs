use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Task;
use crate::ops::derive::highlight_range;
use crate::tui::app::{App, ROW_HEIGHT};
use crate::util::text::{display_width, time_ago, truncate_to_width};

use super::helpers::{label_chip, push_highlighted_spans, spans_width};

/// Render the list header and the task rows. Also records which rows were
/// drawn so the event loop can run the prefetch check.
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);
    let rows_area = chunks[1];

    app.list_area = rows_area;
    app.visible_rows = 0..0;

    let status = app.active_status();
    let (loading, error) = match app.queries.tasks(status) {
        Some(entry) => (entry.is_loading(), entry.is_error()),
        None => (true, false),
    };

    if error {
        render_header(frame, app, chunks[0], None);
        render_message(
            frame,
            app,
            rows_area,
            "Something went wrong while loading tasks.",
            "Press r to try again",
        );
        return;
    }
    if loading {
        render_header(frame, app, chunks[0], None);
        render_message(frame, app, rows_area, "Loading tasks\u{2026}", "");
        return;
    }

    let len = app.visible_tasks().len();
    render_header(frame, app, chunks[0], Some(len));
    if len == 0 {
        render_message(
            frame,
            app,
            rows_area,
            "No tasks found",
            "Try removing some filters",
        );
        return;
    }

    let rows = (rows_area.height / ROW_HEIGHT) as usize;
    app.scroll_into_view(rows);
    let start = app.scroll_offset.min(len.saturating_sub(1));
    let end = (start + rows).min(len);
    app.visible_rows = start..end;

    let app = &*app;
    let selection = app.selection();
    let query = selection.search_query.as_deref();
    let focus = app.nav.focus();
    let now = Utc::now();
    let width = rows_area.width as usize;

    let visible = app.visible_tasks();
    let mut lines: Vec<Line> = Vec::with_capacity((end - start) * ROW_HEIGHT as usize);
    for (i, task) in visible[start..end].iter().enumerate() {
        let focused = start + i == focus;
        let [title, meta] = task_row(app, task, focused, query, &now, width);
        lines.push(title);
        lines.push(meta);
    }
    let list = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(list, rows_area);
}

/// "Showing N Open Tasks" plus the active filters, then a blank line
fn render_header(frame: &mut Frame, app: &App, area: Rect, count: Option<usize>) {
    let bg = app.theme.background;
    let selection = app.selection();
    let status = selection.active_status();

    let mut spans = vec![Span::styled(
        match count {
            Some(n) => format!(" Showing {} {} Tasks", n, status.label()),
            None => format!(" {} Tasks", status.label()),
        },
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];

    let mut filters: Vec<String> = Vec::new();
    if let Some(label) = selection.label.as_deref().filter(|s| !s.is_empty()) {
        filters.push(format!("label: {}", label));
    }
    if let Some(assignee) = selection.assignee.as_deref().filter(|s| !s.is_empty()) {
        filters.push(format!("assignee: {}", assignee));
    }
    if let Some(order) = selection.sort_order() {
        filters.push(format!("sort: {}", order.label()));
    }
    if let Some(entry) = app.queries.tasks(status)
        && entry.has_next_page()
    {
        filters.push(format!("{} loaded", entry.tasks().len()));
    }
    if !filters.is_empty() {
        let text = filters.join("  ");
        let used = spans_width(&spans);
        let width = area.width as usize;
        if used + display_width(&text) + 2 <= width {
            let pad = width - used - display_width(&text) - 1;
            spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
            spans.push(Span::styled(text, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(header, area);
}

fn render_message(frame: &mut Frame, app: &App, area: Rect, title: &str, hint: &str) {
    let bg = app.theme.background;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )),
    ];
    if !hint.is_empty() {
        lines.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Two lines per task: name with label chips, then id/age/assignee
fn task_row(
    app: &App,
    task: &Task,
    focused: bool,
    query: Option<&str>,
    now: &chrono::DateTime<Utc>,
    width: usize,
) -> [Line<'static>; 2] {
    let theme = &app.theme;
    let bg = if focused { theme.selection_bg } else { theme.background };
    let base = Style::default().bg(bg);

    let marker = if focused {
        Span::styled("\u{258E}", base.fg(theme.selection_border))
    } else {
        Span::styled(" ", base)
    };

    let name_style = if focused {
        base.fg(theme.text_bright).add_modifier(Modifier::BOLD)
    } else {
        base.fg(theme.text)
    };
    let match_style = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);

    let chips_width: usize = task
        .labels
        .iter()
        .map(|l| display_width(l.as_str()) + 3)
        .sum();
    let name_room = width.saturating_sub(chips_width + 3).max(1);
    let name = truncate_to_width(&task.name, name_room);
    // Only highlight when the name was not cut
    let matched = if name == task.name {
        highlight_range(&task.name, query)
    } else {
        None
    };

    let mut title = vec![marker.clone(), Span::styled(" ", base)];
    push_highlighted_spans(&mut title, &name, name_style, match_style, matched);
    for label in &task.labels {
        title.push(Span::styled(" ", base));
        title.push(label_chip(theme, *label));
    }
    pad_line(&mut title, width, base);

    let opened = task
        .created_timestamp()
        .map(|ts| time_ago(&ts, now))
        .unwrap_or_else(|| task.created_at.clone());
    let mut meta = vec![
        marker,
        Span::styled(" ", base),
        Span::styled(
            format!("#{} opened {} by {}", task.id, opened, task.assignee),
            base.fg(theme.dim),
        ),
    ];
    pad_line(&mut meta, width, base);

    [Line::from(title), Line::from(meta)]
}

/// Fill the rest of the row so the focus background spans the width
fn pad_line(spans: &mut Vec<Span>, width: usize, style: Style) {
    let used = spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::worker::{Completion, Request};
    use crate::model::TaskStatus;
    use crate::ops::navigation::NavKey;
    use crate::tui::render::test_helpers::*;

    fn render(app: &mut App) -> String {
        render_to_string(TERM_W, 12, |frame, area| {
            render_task_list(frame, app, area);
        })
    }

    #[test]
    fn shows_count_and_rows() {
        let tasks = vec![sample_task(1, "Fix login"), sample_task(2, "Add export")];
        let mut app = app_with_tasks("", tasks, None);
        let out = render(&mut app);
        assert!(out.contains("Showing 2 Open Tasks"));
        assert!(out.contains("Fix login"));
        assert!(out.contains("Fix login  bug"));
        assert!(out.contains("#2 opened"));
        assert!(out.contains("by ana"));
        assert_eq!(app.visible_rows, 0..2);
    }

    #[test]
    fn header_lists_active_filters() {
        let tasks = vec![sample_task(1, "Fix login")];
        let mut app = app_with_tasks("label=bug&sort_by=ASC", tasks, None);
        let out = render(&mut app);
        assert!(out.contains("label: bug"));
        assert!(out.contains("sort: Latest"));
    }

    #[test]
    fn empty_state() {
        let tasks = vec![sample_task(1, "Fix login")];
        let mut app = app_with_tasks("search_query=zzz", tasks, None);
        let out = render(&mut app);
        assert!(out.contains("Showing 0 Open Tasks"));
        assert!(out.contains("No tasks found"));
        assert!(out.contains("Try removing some filters"));
    }

    #[test]
    fn loading_state() {
        let mut app = empty_app("active_tab=CLOSED");
        let out = render(&mut app);
        assert!(out.contains("Loading tasks"));
        assert_eq!(app.visible_rows, 0..0);
    }

    #[test]
    fn error_state_hides_rows() {
        let mut app = empty_app("");
        app.refresh();
        for request in app.take_requests() {
            if let Request::TaskPage { generation, .. } = request {
                app.apply_completion(Completion::TaskPage {
                    status: TaskStatus::Open,
                    page: 1,
                    generation,
                    result: Err("boom".into()),
                });
            }
        }
        let out = render(&mut app);
        assert!(out.contains("Something went wrong"));
        assert!(!out.contains("boom"));
    }

    #[test]
    fn visible_rows_follow_scroll() {
        let tasks: Vec<Task> = (1..=20)
            .map(|i| sample_task(i, &format!("task {}", i)))
            .collect();
        let mut app = app_with_tasks("", tasks, Some(2));
        // 12 rows minus a 2-row header leaves room for 5 tasks
        render(&mut app);
        assert_eq!(app.visible_rows, 0..5);
        for _ in 0..7 {
            app.handle_nav(NavKey::Down);
        }
        render(&mut app);
        assert_eq!(app.visible_rows, 3..8);
    }
}
