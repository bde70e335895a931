use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::centered_rect;

const LIST_BINDINGS: &[(&str, &str)] = &[
    ("\u{2191}\u{2193}/jk", "Move focus"),
    ("Enter", "Open task"),
    ("Tab/1-3", "Switch tab"),
    ("/ Ctrl+K", "Search by name"),
    ("l a s", "Label / assignee / sort"),
    ("x", "Clear filters"),
    ("Backspace", "Previous view"),
    ("r", "Refresh"),
    ("?", "Toggle help"),
    ("q", "Quit"),
];

const MODAL_BINDINGS: &[(&str, &str)] = &[
    ("\u{2190}\u{2192}/hl", "Previous / next task"),
    ("1 2 3", "Change status"),
    ("Enter", "Confirm change"),
    ("Esc", "Close / cancel"),
    ("?", "Toggle help"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let (title, bindings) = if app.nav.is_modal_open() {
        (" Task details", MODAL_BINDINGS)
    } else {
        (" Task list", LIST_BINDINGS)
    };

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(title, header_style)), Line::from("")];
    for (key, desc) in bindings {
        add_binding(&mut lines, key, desc, key_style, desc_style);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(Span::styled(" Key Bindings ", header_style))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<12}", key), key_style),
        Span::styled(desc, desc_style),
    ]));
}

#[cfg(test)]
mod tests {
    use crate::ops::navigation::NavKey;
    use crate::tui::app::Overlay;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn list_help() {
        let mut app = app_with_tasks("", vec![sample_task(1, "Fix")], None);
        app.overlay = Overlay::Help;
        let out = render_app(&mut app);
        assert!(out.contains("Key Bindings"));
        assert!(out.contains("Task list"));
        assert!(out.contains("Clear filters"));
    }

    #[test]
    fn modal_help() {
        let mut app = app_with_tasks("", vec![sample_task(1, "Fix")], None);
        app.handle_nav(NavKey::Enter);
        app.overlay = Overlay::Help;
        let out = render_app(&mut app);
        assert!(out.contains("Task details"));
        assert!(out.contains("Change status"));
        assert!(!out.contains("Clear filters"));
    }
}
