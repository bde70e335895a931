use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use tracing::{debug, warn};

use crate::io::api_client::TaskApi;
use crate::model::api::{StatusCounts, StatusUpdate, TaskPage};
use crate::model::task::TaskStatus;
use crate::ops::transition::Ticket;

/// A request the UI wants made. Generations tie fetch results back to the
/// cache entry state they were issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    TaskPage {
        status: TaskStatus,
        page: u32,
        generation: u64,
    },
    StatusCounts {
        generation: u64,
    },
    Assignees {
        generation: u64,
    },
    UpdateStatus {
        ticket: Ticket,
        update: StatusUpdate,
    },
}

/// A finished request, delivered back to the event loop. Errors are
/// flattened to their message; the UI only shows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    TaskPage {
        status: TaskStatus,
        page: u32,
        generation: u64,
        result: Result<TaskPage, String>,
    },
    StatusCounts {
        generation: u64,
        result: Result<StatusCounts, String>,
    },
    Assignees {
        generation: u64,
        result: Result<Vec<String>, String>,
    },
    StatusUpdated {
        ticket: Ticket,
        update: StatusUpdate,
        result: Result<(), String>,
    },
}

/// Run one request against the API synchronously
pub fn execute(api: &dyn TaskApi, request: Request) -> Completion {
    match request {
        Request::TaskPage {
            status,
            page,
            generation,
        } => Completion::TaskPage {
            status,
            page,
            generation,
            result: api.fetch_tasks(status, page).map_err(|e| e.to_string()),
        },
        Request::StatusCounts { generation } => Completion::StatusCounts {
            generation,
            result: api.fetch_status_counts().map_err(|e| e.to_string()),
        },
        Request::Assignees { generation } => Completion::Assignees {
            generation,
            result: api.fetch_assignees().map_err(|e| e.to_string()),
        },
        Request::UpdateStatus { ticket, update } => {
            let result = api.update_status(&update).map_err(|e| e.to_string());
            Completion::StatusUpdated {
                ticket,
                update,
                result,
            }
        }
    }
}

/// Fire-and-forget request runner. Each request gets its own thread and
/// reports back over a channel polled by the event loop; completions arrive
/// in whatever order the server answers.
pub struct ApiWorker {
    api: Arc<dyn TaskApi>,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,
}

impl ApiWorker {
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        ApiWorker { api, tx, rx }
    }

    pub fn dispatch(&self, request: Request) {
        debug!(?request, "dispatch");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("taskboard-request".into())
            .spawn(move || {
                let completion = execute(api.as_ref(), request);
                if let Some(err) = completion_error(&completion) {
                    warn!(error = %err, "request failed");
                }
                // Receiver gone means the app is shutting down
                let _ = tx.send(completion);
            });
        if let Err(e) = spawned {
            warn!(error = %e, "could not spawn request thread");
        }
    }

    /// Non-blocking poll for finished requests.
    pub fn poll(&self) -> Vec<Completion> {
        let mut done = Vec::new();
        while let Ok(c) = self.rx.try_recv() {
            done.push(c);
        }
        done
    }
}

fn completion_error(completion: &Completion) -> Option<&str> {
    match completion {
        Completion::TaskPage { result, .. } => result.as_ref().err(),
        Completion::StatusCounts { result, .. } => result.as_ref().err(),
        Completion::Assignees { result, .. } => result.as_ref().err(),
        Completion::StatusUpdated { result, .. } => result.as_ref().err(),
    }
    .map(String::as_str)
}
