use std::ops::Range;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::model::Label;
use crate::tui::theme::Theme;
use crate::util::text;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| text::display_width(&s.content)).sum()
}

/// Push `text` with the byte range `matched` drawn in `highlight_style`
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    matched: Option<Range<usize>>,
) {
    match matched {
        Some(r) if r.end <= text.len() && text.is_char_boundary(r.start) && text.is_char_boundary(r.end) => {
            if r.start > 0 {
                spans.push(Span::styled(text[..r.start].to_string(), base_style));
            }
            spans.push(Span::styled(text[r.clone()].to_string(), highlight_style));
            if r.end < text.len() {
                spans.push(Span::styled(text[r.end..].to_string(), base_style));
            }
        }
        _ => spans.push(Span::styled(text.to_string(), base_style)),
    }
}

/// A label drawn as a colored chip: ` bug `
pub(super) fn label_chip(theme: &Theme, label: Label) -> Span<'static> {
    Span::styled(
        format!(" {} ", label.as_str()),
        Style::default()
            .fg(theme.background)
            .bg(theme.label_color(label))
            .add_modifier(Modifier::BOLD),
    )
}

/// Create a centered rectangle of the given percentage of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A rectangle of fixed size centered in `area`, shrunk to fit
pub(super) fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn highlight_splits_at_match() {
        let mut spans = Vec::new();
        let base = Style::default();
        let hi = Style::default().add_modifier(Modifier::BOLD);
        push_highlighted_spans(&mut spans, "fix bugfix", base, hi, Some(4..7));
        assert_eq!(contents(&spans), vec!["fix ", "bug", "fix"]);
        assert_eq!(spans[1].style, hi);
    }

    #[test]
    fn highlight_without_match_is_one_span() {
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "abc", Style::default(), Style::default(), None);
        assert_eq!(contents(&spans), vec!["abc"]);
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "abc", Style::default(), Style::default(), Some(1..9));
        assert_eq!(contents(&spans), vec!["abc"]);
    }

    #[test]
    fn fixed_rect_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_fixed(40, 10, area), Rect::new(20, 7, 40, 10));
        assert_eq!(centered_fixed(100, 30, area), area);
    }
}
