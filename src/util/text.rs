use chrono::{DateTime, Utc};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to `max_cells` terminal cells, ending in `…` when cut.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = display_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Relative age like "just now", "5 minutes ago", "3 days ago"
pub fn time_ago(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let d = now.signed_duration_since(*then);
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", n, unit)
        }
    };
    if d.num_seconds() < 60 {
        return "just now".to_string();
    }
    if d.num_minutes() < 60 {
        return plural(d.num_minutes(), "minute");
    }
    if d.num_hours() < 24 {
        return plural(d.num_hours(), "hour");
    }
    let days = d.num_days();
    if days < 30 {
        return plural(days, "day");
    }
    if days < 365 {
        return plural(days / 30, "month");
    }
    plural(days / 365, "year")
}
