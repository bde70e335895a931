use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::worker::{Completion, Request};
use crate::model::api::TaskPage;
use crate::model::{Label, Task, TaskStatus};
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App at `query` with nothing loaded; its startup requests are dropped.
pub fn empty_app(query: &str) -> App {
    let mut app = App::new(query, Theme::default());
    app.take_requests();
    app
}

/// An App at `query` whose active tab has loaded `tasks` as one page.
pub fn app_with_tasks(query: &str, tasks: Vec<Task>, next_page: Option<u32>) -> App {
    let mut app = App::new(query, Theme::default());
    let status = app.active_status();
    for request in app.take_requests() {
        if let Request::TaskPage {
            page, generation, ..
        } = request
        {
            app.apply_completion(Completion::TaskPage {
                status,
                page,
                generation,
                result: Ok(TaskPage {
                    tasks: tasks.clone(),
                    next_page,
                    total: None,
                }),
            });
        }
    }
    app.take_requests();
    app
}

pub fn sample_task(id: i64, name: &str) -> Task {
    Task {
        id,
        name: name.into(),
        status: TaskStatus::Open,
        priority: "high".into(),
        assignee: "ana".into(),
        created_at: "2024-01-01T10:00:00Z".into(),
        labels: vec![Label::Bug],
        description: format!("Details for {}", name),
        comment: None,
    }
}

/// Render the whole screen
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| {
        super::render(frame, app);
    })
}
