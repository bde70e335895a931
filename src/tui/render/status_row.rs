use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Overlay};

use super::helpers::spans_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let width = area.width as usize;

    let (mut spans, hint) = if app.overlay == Overlay::Search {
        // Search prompt: /query▌
        (
            vec![
                Span::styled(
                    format!("/{}", app.search_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ],
            "Enter done  Esc close".to_string(),
        )
    } else {
        let left = match &app.status_message {
            Some(message) => Span::styled(
                format!(" {}", message),
                Style::default().fg(app.theme.yellow).bg(bg),
            ),
            None => Span::styled(format!(" ?{}", app.location.query_string()), dim),
        };
        let fetching_more = app
            .queries
            .tasks(app.active_status())
            .is_some_and(|entry| entry.is_fetching_next_page());
        let hint = if fetching_more {
            "Loading more\u{2026}  ? help".to_string()
        } else {
            "? help".to_string()
        };
        (vec![left], hint)
    };

    let used = spans_width(&spans);
    let hint_width = hint.chars().count();
    if used + hint_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - hint_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(hint, dim));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn shows_query_string_and_help_hint() {
        let app = app_with_tasks("active_tab=OPEN&label=bug", vec![sample_task(1, "Fix")], None);
        let out = render(&app);
        assert!(out.contains("label=bug"));
        assert!(out.ends_with("? help"));
    }

    #[test]
    fn message_replaces_query() {
        let mut app = app_with_tasks("label=bug", vec![sample_task(1, "Fix")], None);
        app.status_message = Some("No earlier view".into());
        let out = render(&app);
        assert!(out.contains("No earlier view"));
        assert!(!out.contains("label=bug"));
    }

    #[test]
    fn search_prompt() {
        let mut app = app_with_tasks("", vec![sample_task(1, "Fix")], None);
        app.open_search();
        app.search_input = "log".into();
        let out = render(&app);
        assert!(out.starts_with("/log\u{258C}"));
        assert!(out.contains("Esc close"));
    }

    #[test]
    fn loading_more_while_next_page_in_flight() {
        let mut app = app_with_tasks("", vec![sample_task(1, "Fix")], Some(2));
        let status = app.active_status();
        let request = app.queries.fetch_next_page(status);
        assert!(request.is_some());
        let out = render(&app);
        assert!(out.contains("Loading more"));
    }
}
