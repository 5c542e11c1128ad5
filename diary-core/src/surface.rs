//! The render surface capability and the confirmation flow.
//!
//! The session never touches a display directly; it issues the
//! instructions below and lets whatever implements [`RenderSurface`]
//! decide what they look like. Destructive actions go through the
//! single-shot [`ConfirmPrompt`]/[`ConfirmTicket`] pair.

use crate::layout::{Cell, MapPoint};
use crate::story::{Action, Node};
use tokio::sync::oneshot;

/// Popover content for the focused overview node.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusCard {
    pub id: String,
    pub title: String,
    pub summary: String,
}

impl FocusCard {
    /// Build the card for a node.
    pub fn for_node(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            title: node.title.clone(),
            summary: node.summary(),
        }
    }
}

/// Display capability consumed by the session.
///
/// Implementations retain or immediately draw whatever granularity
/// suits them; the session re-issues full instructions on every
/// transition rather than diffing.
pub trait RenderSurface {
    /// Present a node's title and body.
    fn show_node(&mut self, node: &Node);

    /// Present the current node's choices, in order.
    fn show_actions(&mut self, actions: &[Action]);

    /// Present the scattered overview, with an optional focus popover.
    fn show_overview(&mut self, points: &[MapPoint], focus: Option<&FocusCard>);

    /// Present the heat-calendar overlay.
    fn show_heat_calendar(&mut self, cells: &[Cell]);

    /// Dismiss the heat-calendar overlay.
    fn hide_heat_calendar(&mut self);

    /// Update the "visited/total" header indicator.
    fn show_progress(&mut self, visited: usize, total: usize);

    /// Present a yes/no dialog. The prompt resolves the session's
    /// pending [`ConfirmTicket`] when answered; dropping it counts as
    /// a cancel.
    fn show_confirm(&mut self, prompt: ConfirmPrompt);
}

/// A pending yes/no question.
///
/// Resolution consumes the prompt, so answering twice is impossible by
/// construction.
#[derive(Debug)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    /// Marks the confirm action as destructive, for styling.
    pub destructive: bool,
    responder: oneshot::Sender<bool>,
}

impl ConfirmPrompt {
    /// Create a prompt and the ticket that waits on it.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        destructive: bool,
    ) -> (Self, ConfirmTicket) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                title: title.into(),
                message: message.into(),
                destructive,
                responder: tx,
            },
            ConfirmTicket { rx },
        )
    }

    /// Answer the question.
    pub fn resolve(self, accepted: bool) {
        // The ticket may already be gone; nothing to do then.
        let _ = self.responder.send(accepted);
    }
}

/// The waiting half of a confirmation.
#[derive(Debug)]
pub struct ConfirmTicket {
    rx: oneshot::Receiver<bool>,
}

impl ConfirmTicket {
    /// Suspend until the prompt is answered. A dropped prompt reads as
    /// a cancel.
    pub async fn outcome(self) -> bool {
        self.rx.await.unwrap_or(false)
    }

    /// Non-blocking check for polling event loops. `Some(answer)` once
    /// the prompt is answered or dropped, `None` while it is pending.
    pub fn try_outcome(&mut self) -> Option<bool> {
        match self.rx.try_recv() {
            Ok(answer) => Some(answer),
            Err(oneshot::error::TryRecvError::Closed) => Some(false),
            Err(oneshot::error::TryRecvError::Empty) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_resolves_once() {
        let (prompt, ticket) = ConfirmPrompt::new("Reset", "Really?", true);
        assert!(prompt.destructive);
        prompt.resolve(true);
        // `resolve` consumed the prompt; only the answer remains.
        assert!(ticket.outcome().await);
    }

    #[tokio::test]
    async fn test_dropped_prompt_is_a_cancel() {
        let (prompt, ticket) = ConfirmPrompt::new("Reset", "Really?", true);
        drop(prompt);
        assert!(!ticket.outcome().await);
    }

    #[tokio::test]
    async fn test_try_outcome_polls() {
        let (prompt, mut ticket) = ConfirmPrompt::new("Reset", "Really?", false);
        assert_eq!(ticket.try_outcome(), None);
        prompt.resolve(false);
        assert_eq!(ticket.try_outcome(), Some(false));
    }
}
