//! Retained screen model.
//!
//! The session emits render instructions; [`Screen`] keeps the latest
//! of each so the draw loop can repaint from them every frame.

use diary_core::{Action, Cell, ConfirmPrompt, FocusCard, MapPoint, Node, RenderSurface};

/// The latest render instructions, one slot per concern.
#[derive(Debug, Default)]
pub struct Screen {
    /// Node being read, if narrative content has been shown.
    pub node: Option<Node>,
    /// Choices for the current node.
    pub actions: Vec<Action>,
    /// Overview points from the last overview render.
    pub points: Vec<MapPoint>,
    /// Focus popover, if one is open.
    pub focus: Option<FocusCard>,
    /// Heat-calendar cells while the overlay is open.
    pub cells: Option<Vec<Cell>>,
    /// Header indicator as `(visited, total)`.
    pub progress: (usize, usize),
    /// Pending confirm dialog awaiting a key.
    pub prompt: Option<ConfirmPrompt>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer and dismiss the pending dialog, if any.
    pub fn answer_prompt(&mut self, accepted: bool) {
        if let Some(prompt) = self.prompt.take() {
            prompt.resolve(accepted);
        }
    }
}

impl RenderSurface for Screen {
    fn show_node(&mut self, node: &Node) {
        self.node = Some(node.clone());
    }

    fn show_actions(&mut self, actions: &[Action]) {
        self.actions = actions.to_vec();
    }

    fn show_overview(&mut self, points: &[MapPoint], focus: Option<&FocusCard>) {
        self.points = points.to_vec();
        self.focus = focus.cloned();
    }

    fn show_heat_calendar(&mut self, cells: &[Cell]) {
        self.cells = Some(cells.to_vec());
    }

    fn hide_heat_calendar(&mut self) {
        self.cells = None;
    }

    fn show_progress(&mut self, visited: usize, total: usize) {
        self.progress = (visited, total);
    }

    fn show_confirm(&mut self, prompt: ConfirmPrompt) {
        // A newer dialog replaces an unanswered one; dropping the old
        // prompt cancels it.
        self.prompt = Some(prompt);
    }
}
