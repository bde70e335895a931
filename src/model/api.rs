use serde::{Deserialize, Serialize};

use super::task::{Task, TaskStatus};

/// Every backend response is wrapped as `{ success, data }`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: T,
}

fn default_success() -> bool {
    true
}

/// Body of `POST /tasks/get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPageRequest {
    pub status: TaskStatus,
    pub page: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskPageData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: Option<Total>,
    #[serde(default, rename = "hasMore")]
    pub has_more: Option<bool>,
    #[serde(default, rename = "nextPage")]
    pub next_page: Option<u32>,
}

/// The backend has been seen sending `total` both as a string and a number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Total {
    Number(u64),
    Text(String),
}

impl Total {
    pub fn value(&self) -> Option<u64> {
        match self {
            Total::Number(n) => Some(*n),
            Total::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One page of tasks for a status tab
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    /// Cursor for the following page; `None` once the tab is exhausted
    pub next_page: Option<u32>,
    pub total: Option<u64>,
}

impl From<TaskPageData> for TaskPage {
    fn from(data: TaskPageData) -> Self {
        let next_page = match data.pagination.has_more {
            Some(false) => None,
            _ => data.pagination.next_page,
        };
        TaskPage {
            tasks: data.tasks,
            next_page,
            total: data.pagination.total.as_ref().and_then(Total::value),
        }
    }
}

/// Per-status task counts (tab badges)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    #[serde(rename = "OPEN", default)]
    pub open: u64,
    #[serde(rename = "IN_PROGRESS", default)]
    pub in_progress: u64,
    #[serde(rename = "CLOSED", default)]
    pub closed: u64,
}

impl StatusCounts {
    pub fn get(&self, status: TaskStatus) -> u64 {
        match status {
            TaskStatus::Open => self.open,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Closed => self.closed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssigneeEntry {
    pub assignee: String,
}

/// Body of `POST /tasks/update-status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub id: i64,
    pub status: TaskStatus,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_with_next_cursor() {
        let json = r#"{"success":true,"data":{"tasks":[],"pagination":{"total":"42","hasMore":true,"nextPage":2}}}"#;
        let env: Envelope<TaskPageData> = serde_json::from_str(json).unwrap();
        let page = TaskPage::from(env.data);
        assert_eq!(page.next_page, Some(2));
        assert_eq!(page.total, Some(42));
    }

    #[test]
    fn has_more_false_ends_pagination() {
        let json = r#"{"success":true,"data":{"tasks":[],"pagination":{"total":3,"hasMore":false,"nextPage":2}}}"#;
        let env: Envelope<TaskPageData> = serde_json::from_str(json).unwrap();
        let page = TaskPage::from(env.data);
        assert_eq!(page.next_page, None);
        assert_eq!(page.total, Some(3));
    }

    #[test]
    fn missing_next_page_ends_pagination() {
        let json = r#"{"success":true,"data":{"tasks":[],"pagination":{"total":"0"}}}"#;
        let env: Envelope<TaskPageData> = serde_json::from_str(json).unwrap();
        assert_eq!(TaskPage::from(env.data).next_page, None);
    }

    #[test]
    fn status_counts_by_status() {
        let json = r#"{"success":true,"data":{"OPEN":4,"CLOSED":1,"IN_PROGRESS":2}}"#;
        let env: Envelope<StatusCounts> = serde_json::from_str(json).unwrap();
        assert_eq!(env.data.get(TaskStatus::Open), 4);
        assert_eq!(env.data.get(TaskStatus::InProgress), 2);
        assert_eq!(env.data.get(TaskStatus::Closed), 1);
    }

    #[test]
    fn status_update_body() {
        let body = StatusUpdate {
            id: 3,
            status: TaskStatus::Closed,
            comment: "done".into(),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"id":3,"status":"CLOSED","comment":"done"}"#
        );
    }
}
