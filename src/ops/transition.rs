//! Two-step status change: pick a status, confirm with a comment.

use unicode_segmentation::UnicodeSegmentation;

use crate::model::api::StatusUpdate;
use crate::model::task::TaskStatus;

/// Identifies one submission so late completions can be matched up
pub type Ticket = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    /// Confirmation dialog open; the draft is being edited
    PendingConfirm {
        task_id: i64,
        new_status: TaskStatus,
        comment: String,
        /// Message from the last failed submission, if any
        error: Option<String>,
    },
    /// Request in flight; the draft is kept for a retry on failure
    Submitting {
        ticket: Ticket,
        task_id: i64,
        new_status: TaskStatus,
        comment: String,
    },
}

/// Result of picking a status in the detail modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Pending,
    /// The task already has that status
    Unchanged,
    /// A submission is in flight; selection ignored
    Busy,
}

/// How a completion affected the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Succeeded,
    Failed(String),
    /// The flow moved on (task switched or cancelled); nothing to update
    Superseded,
}

#[derive(Debug, Clone, Default)]
pub struct TransitionFlow {
    state: TransitionState,
    next_ticket: Ticket,
}

impl TransitionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TransitionState::Idle
    }

    /// Confirmation dialog should be shown (pending or submitting)
    pub fn is_confirming(&self) -> bool {
        !self.is_idle()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, TransitionState::Submitting { .. })
    }

    /// The task the draft belongs to
    pub fn task_id(&self) -> Option<i64> {
        match &self.state {
            TransitionState::Idle => None,
            TransitionState::PendingConfirm { task_id, .. }
            | TransitionState::Submitting { task_id, .. } => Some(*task_id),
        }
    }

    pub fn comment(&self) -> &str {
        match &self.state {
            TransitionState::Idle => "",
            TransitionState::PendingConfirm { comment, .. }
            | TransitionState::Submitting { comment, .. } => comment,
        }
    }

    pub fn new_status(&self) -> Option<TaskStatus> {
        match &self.state {
            TransitionState::Idle => None,
            TransitionState::PendingConfirm { new_status, .. }
            | TransitionState::Submitting { new_status, .. } => Some(*new_status),
        }
    }

    /// Confirm is enabled only while pending with a non-empty comment
    pub fn can_confirm(&self) -> bool {
        matches!(&self.state, TransitionState::PendingConfirm { comment, .. } if !comment.is_empty())
    }

    /// Pick a new status for task `task_id`, currently at `current`.
    /// Re-picking for the same task while the dialog is open switches the
    /// target status and keeps the comment; another task starts a fresh draft.
    pub fn select(&mut self, task_id: i64, current: TaskStatus, new_status: TaskStatus) -> SelectOutcome {
        if self.is_submitting() {
            return SelectOutcome::Busy;
        }
        if current == new_status {
            return SelectOutcome::Unchanged;
        }
        let comment = match std::mem::take(&mut self.state) {
            TransitionState::PendingConfirm {
                task_id: drafted,
                comment,
                ..
            } if drafted == task_id => comment,
            _ => String::new(),
        };
        self.state = TransitionState::PendingConfirm {
            task_id,
            new_status,
            comment,
            error: None,
        };
        SelectOutcome::Pending
    }

    pub fn push_char(&mut self, c: char) {
        if let TransitionState::PendingConfirm { comment, .. } = &mut self.state {
            comment.push(c);
        }
    }

    pub fn push_str(&mut self, text: &str) {
        if let TransitionState::PendingConfirm { comment, .. } = &mut self.state {
            comment.push_str(text);
        }
    }

    /// Delete the last grapheme of the comment
    pub fn backspace(&mut self) {
        if let TransitionState::PendingConfirm { comment, .. } = &mut self.state
            && let Some((idx, _)) = comment.grapheme_indices(true).next_back()
        {
            comment.truncate(idx);
        }
    }

    /// Move to Submitting and hand back the request to send, addressed to
    /// the task the draft was started on. `None` when confirm is disabled.
    pub fn confirm(&mut self) -> Option<(Ticket, StatusUpdate)> {
        if !self.can_confirm() {
            return None;
        }
        let TransitionState::PendingConfirm {
            task_id,
            new_status,
            comment,
            ..
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let update = StatusUpdate {
            id: task_id,
            status: new_status,
            comment: comment.clone(),
        };
        self.state = TransitionState::Submitting {
            ticket,
            task_id,
            new_status,
            comment,
        };
        Some((ticket, update))
    }

    /// Close the dialog without submitting. An in-flight submission keeps
    /// running; its completion will be treated as superseded.
    pub fn cancel(&mut self) {
        self.state = TransitionState::Idle;
    }

    /// Focused task changed: drop any draft unconditionally
    pub fn reset(&mut self) {
        self.state = TransitionState::Idle;
    }

    /// Apply the outcome of submission `ticket`
    pub fn complete(&mut self, ticket: Ticket, result: Result<(), String>) -> CompletionOutcome {
        let in_flight = matches!(&self.state, TransitionState::Submitting { ticket: t, .. } if *t == ticket);
        if !in_flight {
            return CompletionOutcome::Superseded;
        }
        match result {
            Ok(()) => {
                self.state = TransitionState::Idle;
                CompletionOutcome::Succeeded
            }
            Err(message) => {
                if let TransitionState::Submitting {
                    task_id,
                    new_status,
                    comment,
                    ..
                } = std::mem::take(&mut self.state)
                {
                    self.state = TransitionState::PendingConfirm {
                        task_id,
                        new_status,
                        comment,
                        error: Some(message.clone()),
                    };
                }
                CompletionOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_with(comment: &str) -> TransitionFlow {
        let mut flow = TransitionFlow::new();
        assert_eq!(
            flow.select(42, TaskStatus::Open, TaskStatus::Closed),
            SelectOutcome::Pending
        );
        flow.push_str(comment);
        flow
    }

    #[test]
    fn empty_comment_cannot_confirm() {
        let mut flow = pending_with("");
        assert!(!flow.can_confirm());
        assert_eq!(flow.confirm(), None);
        assert!(matches!(flow.state(), TransitionState::PendingConfirm { .. }));
    }

    #[test]
    fn confirm_builds_request() {
        let mut flow = pending_with("ok");
        assert_eq!(flow.task_id(), Some(42));
        let (ticket, update) = flow.confirm().unwrap();
        assert_eq!(
            update,
            StatusUpdate {
                id: 42,
                status: TaskStatus::Closed,
                comment: "ok".into()
            }
        );
        assert!(flow.is_submitting());
        assert_eq!(flow.task_id(), Some(42));
        assert_eq!(flow.complete(ticket, Ok(())), CompletionOutcome::Succeeded);
        assert!(flow.is_idle());
        assert_eq!(flow.task_id(), None);
        assert_eq!(flow.comment(), "");
    }

    #[test]
    fn failure_keeps_comment_for_retry() {
        let mut flow = pending_with("needs review");
        let (ticket, _) = flow.confirm().unwrap();
        assert_eq!(
            flow.complete(ticket, Err("503".into())),
            CompletionOutcome::Failed("503".into())
        );
        assert_eq!(
            flow.state(),
            &TransitionState::PendingConfirm {
                task_id: 42,
                new_status: TaskStatus::Closed,
                comment: "needs review".into(),
                error: Some("503".into()),
            }
        );
        let (retry, update) = flow.confirm().unwrap();
        assert_ne!(retry, ticket);
        assert_eq!(update.id, 42);
        assert_eq!(update.comment, "needs review");
    }

    #[test]
    fn same_status_is_a_no_op() {
        let mut flow = TransitionFlow::new();
        assert_eq!(
            flow.select(1, TaskStatus::Open, TaskStatus::Open),
            SelectOutcome::Unchanged
        );
        assert!(flow.is_idle());
    }

    #[test]
    fn cancel_and_reset_discard_draft() {
        let mut flow = pending_with("draft");
        flow.cancel();
        assert!(flow.is_idle());
        let mut flow = pending_with("draft");
        flow.reset();
        assert!(flow.is_idle());
        assert_eq!(flow.comment(), "");
    }

    #[test]
    fn late_completion_after_reset_is_superseded() {
        let mut flow = pending_with("ok");
        let (ticket, _) = flow.confirm().unwrap();
        flow.reset();
        assert_eq!(flow.complete(ticket, Ok(())), CompletionOutcome::Superseded);
        assert!(flow.is_idle());

        // A new draft on another task is not touched by the old failure
        flow.select(7, TaskStatus::Closed, TaskStatus::Open);
        flow.push_str("x");
        assert_eq!(
            flow.complete(ticket, Err("boom".into())),
            CompletionOutcome::Superseded
        );
        assert_eq!(flow.comment(), "x");
        assert_eq!(flow.task_id(), Some(7));
    }

    #[test]
    fn reselect_switches_target_and_keeps_comment() {
        let mut flow = pending_with("why");
        flow.select(42, TaskStatus::Open, TaskStatus::InProgress);
        assert_eq!(flow.new_status(), Some(TaskStatus::InProgress));
        assert_eq!(flow.comment(), "why");
    }

    #[test]
    fn selecting_for_another_task_starts_fresh() {
        let mut flow = pending_with("meant for 42");
        flow.select(9, TaskStatus::Open, TaskStatus::Closed);
        assert_eq!(flow.task_id(), Some(9));
        assert_eq!(flow.comment(), "");
    }

    #[test]
    fn busy_while_submitting() {
        let mut flow = pending_with("ok");
        flow.confirm().unwrap();
        assert_eq!(
            flow.select(42, TaskStatus::Open, TaskStatus::InProgress),
            SelectOutcome::Busy
        );
        flow.push_char('!');
        assert_eq!(flow.comment(), "ok");
    }

    #[test]
    fn backspace_removes_graphemes() {
        let mut flow = pending_with("ae\u{301}");
        flow.backspace();
        assert_eq!(flow.comment(), "a");
        flow.backspace();
        flow.backspace();
        assert_eq!(flow.comment(), "");
    }
}
