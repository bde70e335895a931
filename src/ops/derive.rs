//! Filter/sort engine: derives the visible task list from the loaded pages.

use std::cmp::Ordering;
use std::ops::Range;

use regex::RegexBuilder;

use crate::model::task::Task;

/// Sort direction over `createdAt`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first
    Desc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Asc, SortOrder::Desc];

    /// Value of the `sort_by` parameter
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Anything other than `ASC`/`DESC` means no sorting.
    pub fn parse(s: &str) -> Option<SortOrder> {
        match s {
            "ASC" => Some(SortOrder::Asc),
            "DESC" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    /// Menu label. ASC is labelled "Latest" and DESC "Oldest", even though
    /// ASC puts the oldest task first. Kept as shipped.
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Asc => "Latest",
            SortOrder::Desc => "Oldest",
        }
    }
}

/// Conjunctive filters. `None` and empty strings match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilters<'a> {
    pub search_query: Option<&'a str>,
    pub label: Option<&'a str>,
    pub assignee: Option<&'a str>,
}

impl<'a> TaskFilters<'a> {
    pub fn is_empty(&self) -> bool {
        present(self.search_query).is_none()
            && present(self.label).is_none()
            && present(self.assignee).is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(query) = present(self.search_query)
            && !task.name.to_lowercase().contains(&query.to_lowercase())
        {
            return false;
        }
        if let Some(label) = present(self.label)
            && !task.has_label(label)
        {
            return false;
        }
        if let Some(assignee) = present(self.assignee)
            && task.assignee != assignee
        {
            return false;
        }
        true
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Filter, then (optionally) stable-sort by creation time. The input is
/// left untouched; the result borrows from it.
pub fn derive<'t>(
    tasks: &'t [Task],
    filters: &TaskFilters<'_>,
    sort: Option<SortOrder>,
) -> Vec<&'t Task> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|t| filters.matches(t)).collect();

    if let Some(order) = sort {
        // sort_by is stable, so ties keep their filtered order
        visible.sort_by(|a, b| compare_created(a, b, order));
    }
    visible
}

/// Ordering of two tasks under `order`, as used by [`derive`].
/// Unparseable timestamps go last in both directions.
pub fn compare_created(a: &Task, b: &Task, order: SortOrder) -> Ordering {
    let ka = a.created_timestamp();
    let kb = b.created_timestamp();
    match (ka, kb) {
        (Some(x), Some(y)) => match order {
            SortOrder::Asc => x.cmp(&y),
            SortOrder::Desc => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Byte range of the first case-insensitive literal match of `query` in
/// `name`, for highlighting.
pub fn highlight_range(name: &str, query: Option<&str>) -> Option<Range<usize>> {
    let query = present(query)?;
    let re = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()?;
    re.find(name).map(|m| m.range())
}
