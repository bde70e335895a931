use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow status of a task. Also the unit the list is tabbed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    InProgress,
    Closed,
}

impl TaskStatus {
    /// Tab order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Closed];

    /// Wire value, also used as the `active_tab` query value
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Closed => "CLOSED",
        }
    }

    /// Human label shown on tabs and in the status picker
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Open => "Open",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Closed => "Closed",
        }
    }

    /// Parse a wire value (exact match)
    pub fn parse(s: &str) -> Option<TaskStatus> {
        TaskStatus::ALL.into_iter().find(|st| st.as_str() == s)
    }

    /// Digit key that selects this status in the detail modal
    pub fn shortcut(self) -> char {
        match self {
            TaskStatus::Open => '1',
            TaskStatus::InProgress => '2',
            TaskStatus::Closed => '3',
        }
    }

    pub fn from_shortcut(c: char) -> Option<TaskStatus> {
        TaskStatus::ALL.into_iter().find(|st| st.shortcut() == c)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Bug,
    Feature,
    Doc,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Bug, Label::Feature, Label::Doc];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Bug => "bug",
            Label::Feature => "feature",
            Label::Doc => "doc",
        }
    }

    /// Menu title
    pub fn title(self) -> &'static str {
        match self {
            Label::Bug => "Bug",
            Label::Feature => "Feature",
            Label::Doc => "Doc",
        }
    }
}

/// A task as served by the backend. The client never edits these in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Display order is the order the backend sent
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub description: String,
    /// Set by the backend after a status transition with a comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Task {
    /// `createdAt` as a UTC instant, if it parses
    pub fn created_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Exact label match against the wire spelling
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.as_str() == label)
    }
}

/// Parse a backend timestamp. Accepts RFC 3339, an ISO date-time without
/// offset (taken as UTC) and a bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
