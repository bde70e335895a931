//! Query-string backed selection state.
//!
//! The five UI selections (tab, search, label, assignee, sort) live only in
//! a [`Location`]'s query parameters. Everything that needs them decodes a
//! [`Selection`] from the current location, so the whole view can be
//! rebuilt from a query string and shared as one.

use url::form_urlencoded;

use crate::model::task::TaskStatus;
use crate::ops::derive::{SortOrder, TaskFilters};

/// A named selection and the query parameter it is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    ActiveTab,
    SearchQuery,
    Label,
    Assignee,
    SortBy,
}

impl SelectionKey {
    pub const ALL: [SelectionKey; 5] = [
        SelectionKey::ActiveTab,
        SelectionKey::SearchQuery,
        SelectionKey::Label,
        SelectionKey::Assignee,
        SelectionKey::SortBy,
    ];

    pub fn param(self) -> &'static str {
        match self {
            SelectionKey::ActiveTab => "active_tab",
            SelectionKey::SearchQuery => "search_query",
            SelectionKey::Label => "label",
            SelectionKey::Assignee => "assignee",
            SelectionKey::SortBy => "sort_by",
        }
    }
}

/// Ordered query parameters with `URLSearchParams`-style editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a query string, with or without the leading `?`
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        QueryParams {
            pairs: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the first occurrence in place (dropping any others), or append.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.pairs[first].1 = value.to_string();
                let mut idx = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = idx <= first || k != key;
                    idx += 1;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
    }

    /// Remove every occurrence of `key`
    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode without the leading `?`
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

/// The five selections as optional strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub active_tab: Option<String>,
    pub search_query: Option<String>,
    pub label: Option<String>,
    pub assignee: Option<String>,
    pub sort_by: Option<String>,
}

impl Selection {
    pub fn decode(params: &QueryParams) -> Self {
        let read = |key: SelectionKey| params.get(key.param()).map(str::to_string);
        Selection {
            active_tab: read(SelectionKey::ActiveTab),
            search_query: read(SelectionKey::SearchQuery),
            label: read(SelectionKey::Label),
            assignee: read(SelectionKey::Assignee),
            sort_by: read(SelectionKey::SortBy),
        }
    }

    /// Write all five fields into `params`; `None` removes the parameter.
    /// Other parameters are left alone.
    pub fn encode_into(&self, params: &mut QueryParams) {
        for key in SelectionKey::ALL {
            match self.get(key) {
                Some(value) => params.set(key.param(), value),
                None => params.delete(key.param()),
            }
        }
    }

    pub fn get(&self, key: SelectionKey) -> Option<&str> {
        match key {
            SelectionKey::ActiveTab => self.active_tab.as_deref(),
            SelectionKey::SearchQuery => self.search_query.as_deref(),
            SelectionKey::Label => self.label.as_deref(),
            SelectionKey::Assignee => self.assignee.as_deref(),
            SelectionKey::SortBy => self.sort_by.as_deref(),
        }
    }

    pub fn set(&mut self, key: SelectionKey, value: Option<String>) {
        let slot = match key {
            SelectionKey::ActiveTab => &mut self.active_tab,
            SelectionKey::SearchQuery => &mut self.search_query,
            SelectionKey::Label => &mut self.label,
            SelectionKey::Assignee => &mut self.assignee,
            SelectionKey::SortBy => &mut self.sort_by,
        };
        *slot = value;
    }

    /// Active tab, defaulting to OPEN when absent or unrecognised
    pub fn active_status(&self) -> TaskStatus {
        self.active_tab
            .as_deref()
            .and_then(TaskStatus::parse)
            .unwrap_or(TaskStatus::Open)
    }

    pub fn filters(&self) -> TaskFilters<'_> {
        TaskFilters {
            search_query: self.search_query.as_deref(),
            label: self.label.as_deref(),
            assignee: self.assignee.as_deref(),
        }
    }

    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort_by.as_deref().and_then(SortOrder::parse)
    }
}

/// Oldest history entries are dropped past this many
pub const HISTORY_LIMIT: usize = 100;

/// The current query plus navigation history.
#[derive(Debug, Clone, Default)]
pub struct Location {
    params: QueryParams,
    history: Vec<QueryParams>,
}

impl Location {
    pub fn from_query(query: &str) -> Self {
        Location {
            params: QueryParams::parse(query),
            history: Vec::new(),
        }
    }

    /// Current value of `key`, or `default` when the parameter is absent
    pub fn read(&self, key: SelectionKey, default: Option<&str>) -> Option<String> {
        self.params
            .get(key.param())
            .or(default)
            .map(str::to_string)
    }

    /// Navigate to the current parameters with `key` set (or removed for
    /// `None`). Returns whether the query changed; an unchanged write does
    /// not add a history entry.
    pub fn write(&mut self, key: SelectionKey, value: Option<&str>) -> bool {
        self.write_many(&[(key, value)])
    }

    /// Apply several writes as one navigation: at most one history entry,
    /// so a single `back` undoes all of them.
    pub fn write_many(&mut self, writes: &[(SelectionKey, Option<&str>)]) -> bool {
        let mut next = self.params.clone();
        for (key, value) in writes {
            match value {
                Some(v) => next.set(key.param(), v),
                None => next.delete(key.param()),
            }
        }
        if next == self.params {
            return false;
        }
        let prev = std::mem::replace(&mut self.params, next);
        if self.history.len() >= HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(prev);
        true
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Go back one navigation. Returns false when there is no history.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.params = prev;
                true
            }
            None => false,
        }
    }

    pub fn selection(&self) -> Selection {
        Selection::decode(&self.params)
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Shareable form, `?a=b&c=d` (or empty)
    pub fn query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!("?{}", self.params.encode())
        }
    }
}
