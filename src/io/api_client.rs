use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::model::api::{
    AssigneeEntry, Envelope, StatusCounts, StatusUpdate, TaskPage, TaskPageData, TaskPageRequest,
};
use crate::model::task::TaskStatus;

/// Error type for task API calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid base url '{url}': {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        source: reqwest::Error,
    },
    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("{path} reported failure")]
    Rejected { path: String },
    #[error("could not decode response from {path}: {source}")]
    Decode {
        path: String,
        source: reqwest::Error,
    },
}

/// The remote task service. Blocking; callers run it off the UI thread.
pub trait TaskApi: Send + Sync {
    fn fetch_tasks(&self, status: TaskStatus, page: u32) -> Result<TaskPage, ApiError>;
    fn fetch_status_counts(&self) -> Result<StatusCounts, ApiError>;
    fn fetch_assignees(&self) -> Result<Vec<String>, ApiError>;
    fn update_status(&self, update: &StatusUpdate) -> Result<(), ApiError>;
}

const TASKS_PATH: &str = "tasks/get";
const COUNT_PATH: &str = "tasks/status-count";
const ASSIGNEE_PATH: &str = "tasks/get-assignee";
const UPDATE_PATH: &str = "tasks/update-status";

/// JSON-over-HTTP implementation of [`TaskApi`]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    /// `timeout` of `None` waits indefinitely
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        url::Url::parse(base_url).map_err(|source| ApiError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().map_err(|source| ApiError::Transport {
            path: base_url.to_string(),
            source,
        })?;
        Ok(HttpTaskApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self.client.get(self.endpoint(path)).send();
        decode_envelope(path, checked(path, response)?)
    }

    fn post<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<Response, ApiError> {
        debug!(path, "POST");
        let response = self.client.post(self.endpoint(path)).json(body).send();
        checked(path, response)
    }
}

/// Map transport errors and non-2xx statuses
fn checked(path: &str, response: reqwest::Result<Response>) -> Result<Response, ApiError> {
    let response = response.map_err(|source| ApiError::Transport {
        path: path.to_string(),
        source,
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            path: path.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Unwrap `data` from a `{ success, data }` envelope
fn decode_envelope<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
    let envelope: Envelope<T> = response.json().map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })?;
    if !envelope.success {
        return Err(ApiError::Rejected {
            path: path.to_string(),
        });
    }
    Ok(envelope.data)
}

impl TaskApi for HttpTaskApi {
    fn fetch_tasks(&self, status: TaskStatus, page: u32) -> Result<TaskPage, ApiError> {
        let response = self.post(TASKS_PATH, &TaskPageRequest { status, page })?;
        let data: TaskPageData = decode_envelope(TASKS_PATH, response)?;
        Ok(TaskPage::from(data))
    }

    fn fetch_status_counts(&self) -> Result<StatusCounts, ApiError> {
        self.get(COUNT_PATH)
    }

    fn fetch_assignees(&self) -> Result<Vec<String>, ApiError> {
        let entries: Vec<AssigneeEntry> = self.get(ASSIGNEE_PATH)?;
        Ok(entries.into_iter().map(|e| e.assignee).collect())
    }

    fn update_status(&self, update: &StatusUpdate) -> Result<(), ApiError> {
        let response = self.post(UPDATE_PATH, update)?;
        // Only the success flag matters here; `data` may be absent
        let body: serde_json::Value = response.json().map_err(|source| ApiError::Decode {
            path: UPDATE_PATH.to_string(),
            source,
        })?;
        if body.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
            return Err(ApiError::Rejected {
                path: UPDATE_PATH.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_base_url() {
        let err = HttpTaskApi::new("not a url", None).err().unwrap();
        assert!(matches!(err, ApiError::BaseUrl { .. }));
    }

    #[test]
    fn endpoints_join_without_double_slash() {
        let api = HttpTaskApi::new("http://localhost:3000/api/", None).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000/api");
        assert_eq!(api.endpoint(TASKS_PATH), "http://localhost:3000/api/tasks/get");
    }
}
