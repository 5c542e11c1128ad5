//! Testing utilities for the diary engine.
//!
//! This module provides tools for deterministic tests without a real
//! display or disk:
//! - [`RecordingSurface`], a render surface that records every
//!   instruction and can auto-answer confirm prompts
//! - [`FailingStore`], a store whose writes always fail, for testing
//!   the degrade-and-continue path
//! - [`TestHarness`], a session pre-wired with a small story and an
//!   in-memory store

use crate::layout::{Cell, MapPoint};
use crate::persist::{MemoryStore, ProgressStore, StoreError};
use crate::session::ReaderSession;
use crate::story::{Action, Node, StoryGraph, OVERVIEW_SENTINEL, START_NODE};
use crate::surface::{ConfirmPrompt, FocusCard, RenderSurface};
use crate::visits::VisitTracker;

/// A render surface that records what it was told to display.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// Ids of nodes shown, in order.
    pub shown_nodes: Vec<String>,
    /// Action labels shown alongside each node.
    pub shown_actions: Vec<Vec<String>>,
    /// Every overview render.
    pub overviews: Vec<Vec<MapPoint>>,
    /// Focused node id per overview render, if any.
    pub focus_cards: Vec<Option<String>>,
    /// Every heat-calendar render.
    pub calendars: Vec<Vec<Cell>>,
    /// How many times the calendar was dismissed.
    pub calendar_hides: usize,
    /// Every header update as `(visited, total)`.
    pub progress: Vec<(usize, usize)>,
    /// `(title, destructive)` of every confirm prompt shown.
    pub prompts: Vec<(String, bool)>,
    /// When set, prompts are answered with this immediately; when
    /// `None`, the prompt is dropped (reads as cancel).
    pub confirm_answer: Option<bool>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently shown focus card id, if the last overview had
    /// one.
    pub fn last_focus(&self) -> Option<&str> {
        self.focus_cards.last()?.as_deref()
    }
}

impl RenderSurface for RecordingSurface {
    fn show_node(&mut self, node: &Node) {
        self.shown_nodes.push(node.id.clone());
    }

    fn show_actions(&mut self, actions: &[Action]) {
        self.shown_actions
            .push(actions.iter().map(|a| a.text.clone()).collect());
    }

    fn show_overview(&mut self, points: &[MapPoint], focus: Option<&FocusCard>) {
        self.overviews.push(points.to_vec());
        self.focus_cards.push(focus.map(|c| c.id.clone()));
    }

    fn show_heat_calendar(&mut self, cells: &[Cell]) {
        self.calendars.push(cells.to_vec());
    }

    fn hide_heat_calendar(&mut self) {
        self.calendar_hides += 1;
    }

    fn show_progress(&mut self, visited: usize, total: usize) {
        self.progress.push((visited, total));
    }

    fn show_confirm(&mut self, prompt: ConfirmPrompt) {
        self.prompts
            .push((prompt.title.clone(), prompt.destructive));
        match self.confirm_answer {
            Some(answer) => prompt.resolve(answer),
            None => drop(prompt),
        }
    }
}

/// A store that loads empty and fails every write, for checking that
/// in-memory state stays authoritative when persistence is gone.
#[derive(Debug, Default)]
pub struct FailingStore;

impl ProgressStore for FailingStore {
    fn load(&self) -> Result<Vec<(String, u32)>, StoreError> {
        Ok(Vec::new())
    }

    fn save(&mut self, _entries: &[(String, u32)]) -> Result<(), StoreError> {
        Err(std::io::Error::other("store unavailable").into())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        Err(std::io::Error::other("store unavailable").into())
    }
}

/// A session over a three-memory test story, recording surface, and
/// in-memory store.
pub struct TestHarness {
    pub session: ReaderSession<RecordingSurface>,
}

/// The story used by the harness: a start hub and memories `atom_a`,
/// `atom_b`, `atom_c`.
pub fn test_story() -> StoryGraph {
    fn node(id: &str, actions: Vec<Action>) -> Node {
        Node {
            id: id.to_string(),
            title: id.to_uppercase(),
            content: format!("Contents of {id}."),
            actions,
        }
    }
    fn goto(text: &str, next: &str) -> Action {
        Action {
            text: text.to_string(),
            next: Some(next.to_string()),
        }
    }

    StoryGraph::new([
        node(
            START_NODE,
            vec![
                goto("First memory", "atom_a"),
                goto("To the overview", OVERVIEW_SENTINEL),
            ],
        ),
        node(
            "atom_a",
            vec![
                goto("Onward", "atom_b"),
                goto("Back out", OVERVIEW_SENTINEL),
            ],
        ),
        node(
            "atom_b",
            vec![goto("Onward", "atom_c"), goto("Restart", START_NODE)],
        ),
        node(
            "atom_c",
            vec![
                goto("Restart", START_NODE),
                Action {
                    text: "The end".to_string(),
                    next: None,
                },
            ],
        ),
    ])
}

impl TestHarness {
    /// A fresh first-load session.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// A session whose store already holds the given counts, as a
    /// returning reader's would.
    pub fn with_visits(visits: &[(&str, u32)]) -> Self {
        let mut store = MemoryStore::new();
        let entries: Vec<(String, u32)> = visits
            .iter()
            .map(|(id, c)| (id.to_string(), *c))
            .collect();
        store.save(&entries).expect("memory store save");
        Self::with_store(store)
    }

    fn with_store(store: MemoryStore) -> Self {
        let tracker = VisitTracker::load(Box::new(store));
        let session = ReaderSession::new(test_story(), tracker, RecordingSurface::new());
        Self { session }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_records() {
        let h = TestHarness::new();
        // First load rendered the start node and two header updates.
        assert_eq!(h.session.surface().shown_nodes, vec![START_NODE]);
        assert_eq!(
            h.session.surface().shown_actions,
            vec![vec!["First memory".to_string(), "To the overview".to_string()]]
        );
        assert!(h.session.surface().progress.len() >= 2);
    }

    #[test]
    fn test_with_visits_seeds_the_store() {
        let h = TestHarness::with_visits(&[("atom_b", 3)]);
        assert_eq!(h.session.tracker().count_of("atom_b"), 3);
        assert_eq!(h.session.tracker().visited_count(), 1);
    }
}
