mod set_status;
pub use set_status::cmd_set_status;

use tracing::{debug, info};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::api_client::TaskApi;
use crate::model::task::{Task, TaskStatus};
use crate::ops::derive::{SortOrder, derive};
use crate::ops::selection::{Location, SelectionKey};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(command: Commands, api: &dyn TaskApi, json: bool) -> CmdResult {
    match command {
        Commands::List(args) => cmd_list(args, api, json),
        Commands::Counts => cmd_counts(api, json),
        Commands::Assignees => cmd_assignees(api, json),
        Commands::SetStatus(args) => cmd_set_status(args, api, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(&s.to_ascii_uppercase()).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected OPEN, IN_PROGRESS or CLOSED)",
            s
        )
    })
}

/// Build the location a `list` invocation describes: the `--query` seed
/// with each explicit flag written over it.
fn list_location(args: &ListArgs) -> Result<Location, String> {
    let mut location = Location::from_query(args.query.as_deref().unwrap_or(""));
    if let Some(status) = &args.status {
        let status = parse_status(status)?;
        location.write(SelectionKey::ActiveTab, Some(status.as_str()));
    }
    if let Some(sort) = &args.sort {
        let order = SortOrder::parse(&sort.to_ascii_uppercase())
            .ok_or_else(|| format!("unknown sort order '{}' (expected ASC or DESC)", sort))?;
        location.write(SelectionKey::SortBy, Some(order.as_str()));
    }
    let flags = [
        (SelectionKey::SearchQuery, &args.search),
        (SelectionKey::Label, &args.label),
        (SelectionKey::Assignee, &args.assignee),
    ];
    for (key, value) in flags {
        if let Some(v) = value {
            location.write(key, Some(v));
        }
    }
    Ok(location)
}

/// Fetch pages of one status until exhausted or `max_pages` is reached.
/// Returns the tasks and whether more pages remain.
pub fn fetch_all_pages(
    api: &dyn TaskApi,
    status: TaskStatus,
    max_pages: Option<u32>,
) -> Result<(Vec<Task>, bool), Box<dyn std::error::Error>> {
    let mut tasks = Vec::new();
    let mut page = 1;
    let mut fetched = 0;
    loop {
        let data = api.fetch_tasks(status, page)?;
        fetched += 1;
        debug!(?status, page, count = data.tasks.len(), "fetched page");
        tasks.extend(data.tasks);
        match data.next_page {
            // A cursor that does not advance would loop forever
            Some(next) if next > page => {
                if max_pages.is_some_and(|max| fetched >= max) {
                    return Ok((tasks, true));
                }
                page = next;
            }
            _ => return Ok((tasks, false)),
        }
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, api: &dyn TaskApi, json: bool) -> CmdResult {
    let location = list_location(&args)?;
    let selection = location.selection();
    let status = selection.active_status();
    let (tasks, has_more) = fetch_all_pages(api, status, args.max_pages)?;
    let visible = derive(&tasks, &selection.filters(), selection.sort_order());
    info!(?status, loaded = tasks.len(), shown = visible.len(), "list");

    if json {
        let out = TaskListJson {
            status,
            query: location.params().encode(),
            has_more,
            tasks: visible.iter().map(|t| task_to_json(t)).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "Showing {} {} Tasks  {}",
            visible.len(),
            status.label(),
            location.query_string()
        );
        for task in &visible {
            println!("{}", format_task_line(task));
        }
        if has_more {
            println!("(more pages available; raise --max-pages)");
        }
    }
    Ok(())
}

fn cmd_counts(api: &dyn TaskApi, json: bool) -> CmdResult {
    let counts = api.fetch_status_counts()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&counts_to_json(&counts))?);
    } else {
        for line in format_counts(&counts) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_assignees(api: &dyn TaskApi, json: bool) -> CmdResult {
    let assignees = api.fetch_assignees()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&assignees)?);
    } else {
        for name in &assignees {
            println!("{}", name);
        }
    }
    Ok(())
}
