//! Client-side cache of server data, keyed by query.
//!
//! Entries are only ever replaced wholesale or invalidated, never patched.
//! Each entry carries a generation; invalidation bumps it so completions of
//! requests issued before the invalidation are dropped on arrival.

use std::collections::HashMap;

use tracing::debug;

use crate::io::worker::{Completion, Request};
use crate::model::api::{StatusCounts, TaskPage};
use crate::model::task::{Task, TaskStatus};
use crate::ops::navigation::PagingFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Tasks(TaskStatus),
    StatusCounts,
    Assignees,
}

/// A single-value query (counts, assignees)
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    data: Option<T>,
    error: Option<String>,
    fetching: bool,
    stale: bool,
    generation: u64,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState {
            data: None,
            error: None,
            fetching: false,
            stale: false,
            generation: 0,
        }
    }
}

impl<T> QueryState<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.fetching
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Start a fetch if there is nothing usable and none in flight
    fn begin(&mut self) -> Option<u64> {
        let needed = (self.data.is_none() && self.error.is_none()) || self.stale;
        if !needed || self.fetching {
            return None;
        }
        self.fetching = true;
        Some(self.generation)
    }

    fn invalidate(&mut self) {
        self.stale = true;
        self.fetching = false;
        self.error = None;
        self.generation += 1;
    }

    fn settle(&mut self, generation: u64, result: Result<T, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.fetching = false;
        self.stale = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
        true
    }
}

/// Pages of tasks for one status tab
#[derive(Debug, Clone, Default)]
pub struct PagedTasks {
    pages: Vec<TaskPage>,
    /// Flattened `pages`, rebuilt whenever pages change
    tasks: Vec<Task>,
    error: Option<String>,
    /// Pages of a reload after invalidation, swapped in once complete
    refill: Vec<TaskPage>,
    /// How many pages the reload should bring back
    refill_depth: usize,
    /// Page-1 (or reload) fetch in flight
    fetching_first: bool,
    fetching_next: bool,
    stale: bool,
    generation: u64,
}

impl PagedTasks {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn total(&self) -> Option<u64> {
        self.pages.first().and_then(|p| p.total)
    }

    /// No data yet and the first page is on its way
    pub fn is_loading(&self) -> bool {
        self.pages.is_empty() && self.fetching_first
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching_first || self.fetching_next
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.fetching_next
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page().is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn paging_flags(&self) -> PagingFlags {
        PagingFlags {
            loading: self.is_loading(),
            has_next_page: self.has_next_page(),
            fetching_next_page: self.fetching_next,
        }
    }

    fn next_page(&self) -> Option<u32> {
        self.pages.last().and_then(|p| p.next_page)
    }

    fn rebuild(&mut self) {
        self.tasks = self.pages.iter().flat_map(|p| p.tasks.iter().cloned()).collect();
    }
}

/// The application's query context. Constructed by whoever owns the event
/// loop and passed to the code that reads or invalidates it.
#[derive(Debug, Clone, Default)]
pub struct QueryClient {
    tasks: HashMap<TaskStatus, PagedTasks>,
    counts: QueryState<StatusCounts>,
    assignees: QueryState<Vec<String>>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self, status: TaskStatus) -> Option<&PagedTasks> {
        self.tasks.get(&status)
    }

    /// Loaded tasks for a tab (empty when nothing is loaded)
    pub fn task_list(&self, status: TaskStatus) -> &[Task] {
        self.tasks.get(&status).map(|p| p.tasks()).unwrap_or(&[])
    }

    pub fn counts(&self) -> &QueryState<StatusCounts> {
        &self.counts
    }

    pub fn assignees(&self) -> &QueryState<Vec<String>> {
        &self.assignees
    }

    /// Request page 1 of a tab if it has no data, or is stale, and nothing
    /// is in flight for it. While a stale tab is reloading, this requests
    /// its next page until as many pages as were loaded before are back.
    pub fn ensure_tasks(&mut self, status: TaskStatus) -> Option<Request> {
        let entry = self.tasks.entry(status).or_default();
        let needed = (entry.pages.is_empty() && entry.error.is_none()) || entry.stale;
        if !needed || entry.is_fetching() {
            return None;
        }
        let page = match entry.refill.last() {
            Some(last) => last.next_page?,
            None => 1,
        };
        entry.fetching_first = true;
        debug!(?status, page, generation = entry.generation, "fetch for reload");
        Some(Request::TaskPage {
            status,
            page,
            generation: entry.generation,
        })
    }

    /// Request the following page, if there is one and nothing is in flight
    pub fn fetch_next_page(&mut self, status: TaskStatus) -> Option<Request> {
        let entry = self.tasks.get_mut(&status)?;
        if entry.is_fetching() || entry.stale {
            return None;
        }
        let page = entry.next_page()?;
        entry.fetching_next = true;
        debug!(?status, page, "fetch next page");
        Some(Request::TaskPage {
            status,
            page,
            generation: entry.generation,
        })
    }

    pub fn ensure_counts(&mut self) -> Option<Request> {
        self.counts
            .begin()
            .map(|generation| Request::StatusCounts { generation })
    }

    pub fn ensure_assignees(&mut self) -> Option<Request> {
        self.assignees
            .begin()
            .map(|generation| Request::Assignees { generation })
    }

    /// Mark a key stale. In-flight results for it will be ignored and the
    /// next `ensure_*` refetches. Current data stays visible until then.
    pub fn invalidate(&mut self, key: QueryKey) {
        debug!(?key, "invalidate");
        match key {
            QueryKey::Tasks(status) => {
                let entry = self.tasks.entry(status).or_default();
                entry.stale = true;
                entry.refill.clear();
                entry.refill_depth = entry.pages.len();
                entry.fetching_first = false;
                entry.fetching_next = false;
                entry.error = None;
                entry.generation += 1;
            }
            QueryKey::StatusCounts => self.counts.invalidate(),
            QueryKey::Assignees => self.assignees.invalidate(),
        }
    }

    /// Invalidate every status tab
    pub fn invalidate_all_tasks(&mut self) {
        for status in TaskStatus::ALL {
            self.invalidate(QueryKey::Tasks(status));
        }
    }

    /// Feed a finished fetch into the cache. Returns false when it was
    /// superseded and dropped. Status updates are not cache data and are
    /// ignored here.
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::TaskPage {
                status,
                page,
                generation,
                result,
            } => self.apply_page(status, page, generation, result),
            Completion::StatusCounts { generation, result } => {
                self.counts.settle(generation, result)
            }
            Completion::Assignees { generation, result } => {
                self.assignees.settle(generation, result)
            }
            Completion::StatusUpdated { .. } => false,
        }
    }

    fn apply_page(
        &mut self,
        status: TaskStatus,
        page: u32,
        generation: u64,
        result: Result<TaskPage, String>,
    ) -> bool {
        let Some(entry) = self.tasks.get_mut(&status) else {
            return false;
        };
        if entry.generation != generation {
            debug!(?status, page, generation, "dropping superseded page");
            return false;
        }
        // Next-page fetches are refused while stale, so anything arriving
        // for a stale entry belongs to its reload
        let reload = page == 1 || entry.stale;
        if reload {
            entry.fetching_first = false;
        } else {
            entry.fetching_next = false;
        }
        match result {
            Ok(data) if reload => {
                if page == 1 {
                    entry.refill.clear();
                }
                entry.refill.push(data);
                let exhausted = entry.refill.last().and_then(|p| p.next_page).is_none();
                if exhausted || entry.refill.len() >= entry.refill_depth {
                    // The reload replaces the whole entry at once
                    entry.pages = std::mem::take(&mut entry.refill);
                    entry.refill_depth = 0;
                    entry.stale = false;
                    entry.error = None;
                    entry.rebuild();
                }
            }
            Ok(data) => {
                entry.pages.push(data);
                entry.error = None;
                entry.rebuild();
            }
            Err(e) => {
                if reload {
                    entry.refill.clear();
                    entry.refill_depth = 0;
                    entry.stale = false;
                }
                entry.error = Some(e);
            }
        }
        true
    }
}
