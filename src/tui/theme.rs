use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Label, TaskStatus, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Per-label chip colors
    pub label_colors: HashMap<Label, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut label_colors = HashMap::new();
        label_colors.insert(Label::Bug, Color::Rgb(0xE5, 0x49, 0x39));
        label_colors.insert(Label::Doc, Color::Rgb(0xFF, 0xA5, 0x00));
        label_colors.insert(Label::Feature, Color::Rgb(0x63, 0xBA, 0x3B));

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            blue: Color::Rgb(0x44, 0x88, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
            label_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui]` config, falling back to defaults.
    /// Unknown slots, labels and malformed colors are ignored.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "highlight" => &mut theme.highlight,
                "dim" => &mut theme.dim,
                "red" => &mut theme.red,
                "yellow" => &mut theme.yellow,
                "green" => &mut theme.green,
                "blue" => &mut theme.blue,
                "selection_bg" => &mut theme.selection_bg,
                "selection_border" => &mut theme.selection_border,
                "search_match_bg" => &mut theme.search_match_bg,
                "search_match_fg" => &mut theme.search_match_fg,
                _ => continue,
            };
            *slot = color;
        }

        for (name, value) in &ui.label_colors {
            let label = Label::ALL.into_iter().find(|l| l.as_str() == name);
            if let (Some(label), Some(color)) = (label, parse_hex_color(value)) {
                theme.label_colors.insert(label, color);
            }
        }

        theme
    }

    pub fn label_color(&self, label: Label) -> Color {
        self.label_colors.get(&label).copied().unwrap_or(self.text)
    }

    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::Open => self.green,
            TaskStatus::InProgress => self.yellow,
            TaskStatus::Closed => self.dim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#e54939"),
            Some(Color::Rgb(0xE5, 0x49, 0x39))
        );
        assert_eq!(parse_hex_color("e54939"), None);
        assert_eq!(parse_hex_color("#e549"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn test_default_label_colors() {
        let theme = Theme::default();
        assert_eq!(theme.label_color(Label::Bug), Color::Rgb(0xE5, 0x49, 0x39));
        assert_eq!(theme.label_color(Label::Doc), Color::Rgb(0xFF, 0xA5, 0x00));
        assert_eq!(
            theme.label_color(Label::Feature),
            Color::Rgb(0x63, 0xBA, 0x3B)
        );
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("highlight".into(), "#000000".into());
        ui.colors.insert("nonsense".into(), "#111111".into());
        ui.label_colors.insert("bug".into(), "#112233".into());
        ui.label_colors.insert("chore".into(), "#445566".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.highlight, Color::Rgb(0, 0, 0));
        assert_eq!(theme.label_color(Label::Bug), Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(theme.label_colors.len(), 3);
        assert_eq!(theme.text, Color::Rgb(0xB0, 0xAA, 0xFF));
    }
}
