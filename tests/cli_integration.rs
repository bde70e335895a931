//! Integration tests for the `tb` CLI.
//!
//! Each test mounts a mock task API on a `wiremock::MockServer`, runs `tb`
//! as a subprocess against it, and checks stdout and the requests the
//! server received.

use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::process::Command;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn task(id: i64, name: &str, status: &str, labels: &[&str], assignee: &str, created: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": status,
        "priority": "medium",
        "assignee": assignee,
        "createdAt": created,
        "labels": labels,
        "description": format!("About {}", name),
    })
}

/// Two pages of tasks for whatever status was asked for
struct TaskPages;

impl Respond for TaskPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = request.body_json().unwrap_or(Value::Null);
        let status = body["status"].as_str().unwrap_or("OPEN");
        let data = if body["page"].as_u64().unwrap_or(1) == 1 {
            json!({
                "tasks": [
                    task(1, "Fix login redirect", status, &["bug"], "ana", "2024-03-02T09:00:00Z"),
                    task(2, "Write API docs", status, &["doc"], "ben", "2024-01-15T09:00:00Z"),
                ],
                "pagination": { "total": "3", "hasMore": true, "nextPage": 2 }
            })
        } else {
            json!({
                "tasks": [
                    task(3, "Export to CSV", status, &["feature", "bug"], "ana", "2024-02-10T09:00:00Z"),
                ],
                "pagination": { "total": 3, "hasMore": false }
            })
        };
        ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
    }
}

/// A task API with every endpoint mounted. `accept_updates` controls the
/// `success` flag update-status answers with.
async fn task_api(accept_updates: bool) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks/get"))
        .respond_with(TaskPages)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/status-count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "OPEN": 3, "IN_PROGRESS": 1, "CLOSED": 7 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/get-assignee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "assignee": "ana" }, { "assignee": "ben" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks/update-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": accept_updates })))
        .mount(&server)
        .await;
    server
}

/// A task API that answers 500 to everything
async fn broken_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;
    server
}

/// Paths the server was hit on, without the leading slash
async fn paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().trim_start_matches('/').to_string())
        .collect()
}

/// JSON bodies of the requests made to `endpoint`
async fn bodies(server: &MockServer, endpoint: &str) -> Vec<Value> {
    let wanted = format!("/{}", endpoint);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == wanted)
        .map(|r| r.body_json().unwrap())
        .collect()
}

/// Run `tb` with config and state isolated under `home`, returning
/// (stdout, stderr, success).
async fn run_tb(home: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_tb"))
        .args(args)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_STATE_HOME", home.join("state"))
        .env("HOME", home)
        .env_remove("TASKBOARD_BASE_URL")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("failed to run tb");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tb` against `server`, expecting success, and return stdout.
async fn run_tb_ok(server: &MockServer, args: &[&str]) -> String {
    let home = tempfile::tempdir().unwrap();
    let base_url = server.uri();
    let mut full = vec!["--base-url", base_url.as_str(), "--log-level", "warn"];
    full.extend_from_slice(args);
    let (stdout, stderr, success) = run_tb(home.path(), &full).await;
    if !success {
        panic!(
            "tb {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn ids(parsed: &Value) -> Vec<i64> {
    parsed["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_fetches_every_page() {
    let server = task_api(true).await;
    let out = run_tb_ok(&server, &["list"]).await;
    assert!(out.contains("Showing 3 Open Tasks"));
    assert!(out.contains("Fix login redirect"));
    assert!(out.contains("Export to CSV"));
    assert!(!out.contains("more pages available"));

    let pages: Vec<u64> = bodies(&server, "tasks/get")
        .await
        .iter()
        .map(|b| b["page"].as_u64().unwrap())
        .collect();
    assert_eq!(pages, vec![1, 2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_status_is_sent_to_backend() {
    let server = task_api(true).await;
    let out = run_tb_ok(&server, &["list", "--status", "in_progress"]).await;
    assert!(out.contains("Showing 3 In Progress Tasks"));
    assert!(out.contains("active_tab=IN_PROGRESS"));
    let statuses: Vec<Value> = bodies(&server, "tasks/get")
        .await
        .iter()
        .map(|b| b["status"].clone())
        .collect();
    assert_eq!(statuses, vec![json!("IN_PROGRESS"), json!("IN_PROGRESS")]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_label_filter_json() {
    let server = task_api(true).await;
    let out = run_tb_ok(&server, &["--json", "list", "--label", "bug"]).await;
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["status"], "OPEN");
    assert_eq!(parsed["has_more"], false);
    assert!(parsed["query"].as_str().unwrap().contains("label=bug"));
    assert_eq!(ids(&parsed), vec![1, 3]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_search_and_assignee() {
    let server = task_api(true).await;
    let out = run_tb_ok(&server, &["list", "--search", "EXPORT", "--assignee", "ana"]).await;
    assert!(out.contains("Showing 1 Open Tasks"));
    assert!(out.contains("Export to CSV"));
    assert!(!out.contains("Fix login redirect"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_sort_ascending_puts_oldest_first() {
    let server = task_api(true).await;
    let out = run_tb_ok(&server, &["--json", "list", "--sort", "asc"]).await;
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(ids(&parsed), vec![2, 3, 1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_query_seed_with_override() {
    let server = task_api(true).await;
    let out = run_tb_ok(
        &server,
        &["list", "--query", "active_tab=CLOSED&label=doc", "--label", "feature"],
    )
    .await;
    assert!(out.contains("Showing 1 Closed Tasks"));
    assert!(out.contains("Export to CSV"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_max_pages() {
    let server = task_api(true).await;
    let out = run_tb_ok(&server, &["list", "--max-pages", "1"]).await;
    assert!(out.contains("Showing 2 Open Tasks"));
    assert!(out.contains("more pages available"));
    assert_eq!(bodies(&server, "tasks/get").await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_bad_sort_is_rejected_before_fetching() {
    let server = task_api(true).await;
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, success) = run_tb(
        home.path(),
        &["--base-url", &server.uri(), "list", "--sort", "newest"],
    )
    .await;
    assert!(!success);
    assert!(stderr.contains("unknown sort order"));
    assert!(paths(&server).await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_counts() {
    let server = task_api(true).await;
    let out = run_tb_ok(&server, &["counts"]).await;
    assert!(out.contains("Open"));
    assert!(out.contains("In Progress  1"));
    assert!(out.contains("Closed       7"));
    assert_eq!(paths(&server).await, vec!["tasks/status-count".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_counts_json() {
    let server = task_api(true).await;
    let out = run_tb_ok(&server, &["counts", "--json"]).await;
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, json!({ "OPEN": 3, "IN_PROGRESS": 1, "CLOSED": 7 }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_assignees() {
    let server = task_api(true).await;
    let out = run_tb_ok(&server, &["assignees"]).await;
    assert_eq!(out, "ana\nben\n");
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_set_status_sends_comment() {
    let server = task_api(true).await;
    let out = run_tb_ok(&server, &["set-status", "3", "closed", "-m", "shipped in 1.2"]).await;
    assert!(out.contains("#3 \u{2192} Closed"));
    assert_eq!(
        bodies(&server, "tasks/update-status").await,
        vec![json!({ "id": 3, "status": "CLOSED", "comment": "shipped in 1.2" })]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_set_status_requires_comment() {
    let server = task_api(true).await;
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, success) = run_tb(
        home.path(),
        &["--base-url", &server.uri(), "set-status", "3", "CLOSED", "-m", ""],
    )
    .await;
    assert!(!success);
    assert!(stderr.contains("a comment is required"));
    assert!(paths(&server).await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_set_status_rejected_by_backend() {
    let server = task_api(false).await;
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, success) = run_tb(
        home.path(),
        &["--base-url", &server.uri(), "set-status", "3", "OPEN", "-m", "reopen"],
    )
    .await;
    assert!(!success);
    assert!(stderr.contains("tasks/update-status reported failure"));
}

// ---------------------------------------------------------------------------
// Configuration and failure tests
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_missing_base_url() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, success) = run_tb(home.path(), &["counts"]).await;
    assert!(!success);
    assert!(stderr.contains("no API base url"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_base_url_from_config_file() {
    let server = task_api(true).await;
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("tb.toml");
    std::fs::write(
        &config,
        format!("[api]\nbase_url = \"{}\"\ntimeout_secs = 5\n", server.uri()),
    )
    .unwrap();
    let (stdout, stderr, success) =
        run_tb(home.path(), &["--config", config.to_str().unwrap(), "assignees"]).await;
    assert!(success, "stderr: {}", stderr);
    assert!(stdout.contains("ben"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_base_url_from_environment() {
    let server = task_api(true).await;
    let home = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_tb"))
        .arg("assignees")
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_STATE_HOME", home.path().join("state"))
        .env("TASKBOARD_BASE_URL", server.uri())
        .output()
        .await
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("ana"));
    assert_eq!(paths(&server).await, vec!["tasks/get-assignee".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_server_error_is_reported() {
    let server = broken_api().await;
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, success) =
        run_tb(home.path(), &["--base-url", &server.uri(), "list"]).await;
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("500"));
}
