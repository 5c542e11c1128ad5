//! ReaderSession - the narrative state machine.
//!
//! Holds the current view mode and node, applies navigation commands,
//! records visits on arrival, asks the layout engine for positions,
//! and emits render instructions to the surface. Nothing in here
//! panics on reader input: an unresolvable navigation request is
//! ignored and the current state kept.

use crate::layout;
use crate::story::{ActionTarget, StoryGraph, START_NODE};
use crate::surface::{ConfirmPrompt, ConfirmTicket, FocusCard, RenderSurface};
use crate::visits::VisitTracker;
use tracing::debug;

/// Which view the reader is in. Exactly one at a time; the graph
/// overlay remembers what it opened over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// Reading a node.
    Narrative { node_id: String },
    /// The scattered diary map, with at most one focused node.
    Overview { focus: Option<String> },
    /// The heat calendar, layered over a previous mode.
    GraphOverlay { previous: Box<ViewMode> },
}

/// An interactive reading session over one story graph.
///
/// Created with the collaborators injected: the authored graph, a
/// tracker already rebuilt from its store, and the render surface.
pub struct ReaderSession<S: RenderSurface> {
    graph: StoryGraph,
    tracker: VisitTracker,
    surface: S,
    mode: ViewMode,
}

impl<S: RenderSurface> ReaderSession<S> {
    /// Start a session.
    ///
    /// First-ever load (no prior visits) opens the start node;
    /// any later load lands on the overview.
    pub fn new(graph: StoryGraph, tracker: VisitTracker, surface: S) -> Self {
        let mut session = Self {
            graph,
            tracker,
            surface,
            mode: ViewMode::Narrative {
                node_id: START_NODE.to_string(),
            },
        };
        session.show_progress();
        if session.tracker.is_first_load() {
            session.open(START_NODE);
        } else {
            session.enter_overview();
        }
        session
    }

    /// Navigate to a node.
    ///
    /// An unknown id is ignored; otherwise the visit is recorded (for
    /// memory nodes), the mode becomes narrative, and the node is
    /// rendered with its actions.
    pub fn open(&mut self, id: &str) {
        let node = match self.graph.resolve(id) {
            Ok(node) => node.clone(),
            Err(_) => {
                debug!("ignoring navigation to unknown node {id:?}");
                return;
            }
        };
        if matches!(self.mode, ViewMode::GraphOverlay { .. }) {
            self.surface.hide_heat_calendar();
        }

        self.tracker.record_visit(id);
        self.mode = ViewMode::Narrative {
            node_id: id.to_string(),
        };

        self.surface.show_node(&node);
        self.surface.show_actions(&node.actions);
        self.show_progress();
    }

    /// Follow the current node's action at `index`.
    ///
    /// Only meaningful in narrative mode; out-of-range indices and
    /// terminal actions do nothing.
    pub fn choose_action(&mut self, index: usize) {
        let ViewMode::Narrative { node_id } = &self.mode else {
            return;
        };
        let action = match self
            .graph
            .resolve(node_id)
            .ok()
            .and_then(|node| node.actions.get(index))
        {
            Some(action) => action.clone(),
            None => return,
        };
        match action.target() {
            ActionTarget::Goto(next) => self.open(next),
            ActionTarget::Overview => self.enter_overview(),
            ActionTarget::Terminal => {}
        }
    }

    /// Toggle between narrative and overview.
    ///
    /// Leaving the overview re-enters the story at the start node, not
    /// the last one read: the toggle is a return-to-beginning
    /// affordance, not a back stack.
    pub fn toggle_overview(&mut self) {
        match &self.mode {
            ViewMode::Narrative { .. } => self.enter_overview(),
            ViewMode::Overview { .. } => self.open(START_NODE),
            ViewMode::GraphOverlay { .. } => {}
        }
    }

    /// Select an overview point.
    ///
    /// First selection focuses the node; selecting the focused node
    /// again opens it; selecting a different node moves the focus.
    pub fn select_node(&mut self, id: &str) {
        let ViewMode::Overview { focus } = &self.mode else {
            return;
        };
        if focus.as_deref() == Some(id) {
            self.open(id);
            return;
        }
        if self.graph.resolve(id).is_err() {
            debug!("ignoring selection of unknown node {id:?}");
            return;
        }
        self.mode = ViewMode::Overview {
            focus: Some(id.to_string()),
        };
        self.render_overview();
    }

    /// A click outside any overview point clears the focus.
    pub fn click_outside(&mut self) {
        if let ViewMode::Overview { focus } = &self.mode {
            if focus.is_some() {
                self.mode = ViewMode::Overview { focus: None };
                self.render_overview();
            }
        }
    }

    /// Open the heat-calendar overlay over the current mode. No-op if
    /// it is already open.
    pub fn open_graph_overlay(&mut self) {
        if matches!(self.mode, ViewMode::GraphOverlay { .. }) {
            return;
        }
        let previous = self.mode.clone();
        self.mode = ViewMode::GraphOverlay {
            previous: Box::new(previous),
        };
        let cells = layout::heat_calendar(&self.graph, &self.tracker);
        self.surface.show_heat_calendar(&cells);
    }

    /// Close the overlay and restore whatever was under it.
    pub fn close_graph_overlay(&mut self) {
        let ViewMode::GraphOverlay { previous } = &self.mode else {
            return;
        };
        let previous = (**previous).clone();
        self.surface.hide_heat_calendar();
        self.mode = previous;
        self.render_current();
    }

    /// A click on a calendar cell's marker: close the overlay, then
    /// open that node.
    pub fn cell_clicked(&mut self, id: &str) {
        if matches!(self.mode, ViewMode::GraphOverlay { .. }) {
            self.open(id);
        }
    }

    /// Ask the reader to confirm a progress reset.
    ///
    /// Emits a destructive confirm prompt to the surface and returns
    /// the ticket; pass its answer to [`finish_reset`].
    ///
    /// [`finish_reset`]: Self::finish_reset
    pub fn begin_reset(&mut self) -> ConfirmTicket {
        let (prompt, ticket) = ConfirmPrompt::new(
            "INITIALIZE MEMORIES",
            "Clear every recorded observation? This cannot be undone.",
            true,
        );
        self.surface.show_confirm(prompt);
        ticket
    }

    /// Apply the answer to a reset prompt. On `true`, all counts and
    /// the persisted record are cleared and the session re-enters the
    /// first-ever-load state.
    pub fn finish_reset(&mut self, confirmed: bool) {
        if !confirmed {
            return;
        }
        self.tracker.reset();
        self.show_progress();
        self.open(START_NODE);
    }

    /// Reset flow as one suspendable call, for callers that can await.
    pub async fn reset_progress(&mut self) -> bool {
        let ticket = self.begin_reset();
        let confirmed = ticket.outcome().await;
        self.finish_reset(confirmed);
        confirmed
    }

    /// Current view mode.
    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    /// The authored graph.
    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    /// The visit tracker.
    pub fn tracker(&self) -> &VisitTracker {
        &self.tracker
    }

    /// The render surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the render surface, for frontends that keep
    /// retained screen state in it.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn enter_overview(&mut self) {
        self.mode = ViewMode::Overview { focus: None };
        self.render_overview();
    }

    fn render_overview(&mut self) {
        let points = layout::scatter_map(&self.graph, &self.tracker);
        let card = match &self.mode {
            ViewMode::Overview { focus: Some(id) } => {
                self.graph.resolve(id).ok().map(FocusCard::for_node)
            }
            _ => None,
        };
        self.surface.show_overview(&points, card.as_ref());
    }

    /// Re-issue the render instructions for the current mode.
    fn render_current(&mut self) {
        match self.mode.clone() {
            ViewMode::Narrative { node_id } => {
                if let Ok(node) = self.graph.resolve(&node_id) {
                    let node = node.clone();
                    self.surface.show_node(&node);
                    self.surface.show_actions(&node.actions);
                }
            }
            ViewMode::Overview { .. } => self.render_overview(),
            ViewMode::GraphOverlay { .. } => {
                let cells = layout::heat_calendar(&self.graph, &self.tracker);
                self.surface.show_heat_calendar(&cells);
            }
        }
    }

    fn show_progress(&mut self) {
        self.surface
            .show_progress(self.tracker.visited_count(), self.graph.memory_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;

    fn narrative(id: &str) -> ViewMode {
        ViewMode::Narrative {
            node_id: id.to_string(),
        }
    }

    #[test]
    fn test_first_load_opens_start() {
        let h = TestHarness::new();
        assert_eq!(h.session.mode(), &narrative(START_NODE));
        assert_eq!(h.session.surface().shown_nodes, vec![START_NODE]);
        // Header rendered at startup and again after the open.
        assert_eq!(h.session.surface().progress.last(), Some(&(0, 3)));
    }

    #[test]
    fn test_subsequent_load_opens_overview() {
        let h = TestHarness::with_visits(&[("atom_a", 1)]);
        assert_eq!(h.session.mode(), &ViewMode::Overview { focus: None });
        assert!(h.session.surface().shown_nodes.is_empty());
        assert_eq!(h.session.surface().overviews.len(), 1);
    }

    #[test]
    fn test_unknown_node_is_ignored() {
        let mut h = TestHarness::new();
        let before = h.session.mode().clone();
        h.session.open("atom_not_authored");
        assert_eq!(h.session.mode(), &before);
        assert_eq!(h.session.tracker().visited_count(), 0);
    }

    #[test]
    fn test_visit_counting_scenario() {
        let mut h = TestHarness::new();
        h.session.open("atom_b");
        h.session.open("atom_b");
        h.session.open("atom_a");

        let t = h.session.tracker();
        assert_eq!(t.count_of("atom_a"), 1);
        assert_eq!(t.count_of("atom_b"), 2);
        assert_eq!(t.count_of("atom_c"), 0);
        assert_eq!(t.visited_count(), 2);
        assert_eq!(h.session.graph().memory_count(), 3);
        assert_eq!(h.session.surface().progress.last(), Some(&(2, 3)));
    }

    #[test]
    fn test_actions_navigate_and_return_to_overview() {
        let mut h = TestHarness::new();
        // start's first action goes to atom_a.
        h.session.choose_action(0);
        assert_eq!(h.session.mode(), &narrative("atom_a"));
        assert_eq!(h.session.tracker().count_of("atom_a"), 1);

        // atom_a's second action is the overview sentinel.
        h.session.choose_action(1);
        assert_eq!(h.session.mode(), &ViewMode::Overview { focus: None });

        // Out of range and terminal actions are no-ops.
        h.session.open("atom_c");
        h.session.choose_action(9);
        assert_eq!(h.session.mode(), &narrative("atom_c"));
        h.session.choose_action(1); // terminal on atom_c
        assert_eq!(h.session.mode(), &narrative("atom_c"));
    }

    #[test]
    fn test_overview_toggle_returns_to_start() {
        let mut h = TestHarness::new();
        h.session.open("atom_b");
        h.session.toggle_overview();
        assert_eq!(h.session.mode(), &ViewMode::Overview { focus: None });

        h.session.toggle_overview();
        // Back to the beginning, not to atom_b.
        assert_eq!(h.session.mode(), &narrative(START_NODE));
    }

    #[test]
    fn test_focus_then_confirming_selection_opens() {
        let mut h = TestHarness::new();
        h.session.toggle_overview();

        h.session.select_node("atom_a");
        assert_eq!(
            h.session.mode(),
            &ViewMode::Overview {
                focus: Some("atom_a".to_string())
            }
        );
        assert_eq!(h.session.surface().last_focus(), Some("atom_a"));

        // Same node again: open it and record the visit.
        h.session.select_node("atom_a");
        assert_eq!(h.session.mode(), &narrative("atom_a"));
        assert_eq!(h.session.tracker().count_of("atom_a"), 1);
    }

    #[test]
    fn test_focus_swaps_and_clears() {
        let mut h = TestHarness::new();
        h.session.toggle_overview();
        h.session.select_node("atom_a");
        h.session.select_node("atom_b");
        assert_eq!(
            h.session.mode(),
            &ViewMode::Overview {
                focus: Some("atom_b".to_string())
            }
        );
        // No visit recorded by focusing alone.
        assert_eq!(h.session.tracker().visited_count(), 0);

        h.session.click_outside();
        assert_eq!(h.session.mode(), &ViewMode::Overview { focus: None });
    }

    #[test]
    fn test_graph_overlay_round_trip() {
        let mut h = TestHarness::new();
        h.session.open("atom_b");
        h.session.open_graph_overlay();
        assert!(matches!(
            h.session.mode(),
            ViewMode::GraphOverlay { .. }
        ));
        assert_eq!(h.session.surface().calendars.len(), 1);

        // Opening again is a no-op: no nested overlays.
        h.session.open_graph_overlay();
        assert_eq!(h.session.surface().calendars.len(), 1);

        h.session.close_graph_overlay();
        assert_eq!(h.session.mode(), &narrative("atom_b"));
        assert_eq!(h.session.surface().calendar_hides, 1);
    }

    #[test]
    fn test_cell_click_closes_overlay_and_opens() {
        let mut h = TestHarness::new();
        h.session.open("atom_b");
        h.session.open_graph_overlay();
        h.session.cell_clicked("atom_c");

        assert_eq!(h.session.mode(), &narrative("atom_c"));
        assert_eq!(h.session.tracker().count_of("atom_c"), 1);
        assert_eq!(h.session.surface().calendar_hides, 1);

        // Cell clicks outside the overlay do nothing.
        h.session.cell_clicked("atom_a");
        assert_eq!(h.session.tracker().count_of("atom_a"), 0);
    }

    #[tokio::test]
    async fn test_confirmed_reset_reproduces_first_load() {
        let mut h = TestHarness::new();
        h.session.open("atom_a");
        h.session.open("atom_b");

        h.session.surface_mut().confirm_answer = Some(true);
        assert!(h.session.reset_progress().await);

        assert_eq!(h.session.tracker().visited_count(), 0);
        assert_eq!(h.session.mode(), &narrative(START_NODE));
        assert_eq!(h.session.surface().progress.last(), Some(&(0, 3)));
        let (title, destructive) = h.session.surface().prompts.last().unwrap().clone();
        assert_eq!(title, "INITIALIZE MEMORIES");
        assert!(destructive);
    }

    #[tokio::test]
    async fn test_cancelled_reset_changes_nothing() {
        let mut h = TestHarness::new();
        h.session.open("atom_a");

        h.session.surface_mut().confirm_answer = Some(false);
        assert!(!h.session.reset_progress().await);

        assert_eq!(h.session.tracker().count_of("atom_a"), 1);
        assert_eq!(h.session.mode(), &narrative("atom_a"));
    }

    #[tokio::test]
    async fn test_unanswered_prompt_reads_as_cancel() {
        let mut h = TestHarness::new();
        h.session.open("atom_a");

        // Surface drops the prompt without answering.
        h.session.surface_mut().confirm_answer = None;
        assert!(!h.session.reset_progress().await);
        assert_eq!(h.session.tracker().count_of("atom_a"), 1);
    }

    #[test]
    fn test_ticket_polling_path() {
        let mut h = TestHarness::new();
        h.session.open("atom_a");

        h.session.surface_mut().confirm_answer = Some(true);
        let mut ticket = h.session.begin_reset();
        let answer = ticket.try_outcome().expect("auto-answered");
        h.session.finish_reset(answer);

        assert_eq!(h.session.tracker().visited_count(), 0);
        assert_eq!(h.session.mode(), &narrative(START_NODE));
    }
}
