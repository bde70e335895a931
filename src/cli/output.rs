use serde::Serialize;

use crate::model::api::StatusCounts;
use crate::model::task::{Label, Task, TaskStatus};
use crate::util::text::truncate_to_width;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: i64,
    pub name: String,
    pub status: TaskStatus,
    pub priority: String,
    pub assignee: String,
    pub created_at: String,
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub status: TaskStatus,
    /// Shareable query string for this selection
    pub query: String,
    pub has_more: bool,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct CountsJson {
    #[serde(rename = "OPEN")]
    pub open: u64,
    #[serde(rename = "IN_PROGRESS")]
    pub in_progress: u64,
    #[serde(rename = "CLOSED")]
    pub closed: u64,
}

#[derive(Serialize)]
pub struct StatusChangeJson {
    pub id: i64,
    pub status: TaskStatus,
    pub comment: String,
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id,
        name: task.name.clone(),
        status: task.status,
        priority: task.priority.clone(),
        assignee: task.assignee.clone(),
        created_at: task.created_at.clone(),
        labels: task.labels.clone(),
        description: task.description.clone(),
        comment: task.comment.clone(),
    }
}

pub fn counts_to_json(counts: &StatusCounts) -> CountsJson {
    CountsJson {
        open: counts.open,
        in_progress: counts.in_progress,
        closed: counts.closed,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

const NAME_WIDTH: usize = 48;

/// One line per task: `#12  name  [bug,doc]  ana  2024-01-01`
pub fn format_task_line(task: &Task) -> String {
    let labels = if task.labels.is_empty() {
        String::new()
    } else {
        let names: Vec<&str> = task.labels.iter().map(|l| l.as_str()).collect();
        format!("[{}]", names.join(","))
    };
    let name = truncate_to_width(&task.name, NAME_WIDTH);
    format!(
        "#{:<5} {:<width$}  {:<16} {:<12} {}",
        task.id,
        name,
        labels,
        task.assignee,
        task.created_at,
        width = NAME_WIDTH
    )
    .trim_end()
    .to_string()
}

pub fn format_counts(counts: &StatusCounts) -> Vec<String> {
    TaskStatus::ALL
        .iter()
        .map(|s| format!("{:<12} {}", s.label(), counts.get(*s)))
        .collect()
}
