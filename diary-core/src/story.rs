//! The authored story graph.
//!
//! Nodes are immutable, loaded wholesale at startup, and looked up by
//! string id. Nodes whose id starts with [`MEMORY_PREFIX`] are "memory"
//! nodes: the only ones subject to visit counting and map placement.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Id prefix marking a trackable memory node.
pub const MEMORY_PREFIX: &str = "atom_";

/// Id of the node every fresh session opens first.
pub const START_NODE: &str = "start";

/// Sentinel action target meaning "return to the overview".
pub const OVERVIEW_SENTINEL: &str = "@index";

/// Errors from story lookup and parsing.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("no node with id {0:?}")]
    NodeNotFound(String),

    #[error("malformed story content: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A single authored story node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique id, also the key in the content input.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Body text. May embed markup consumed only by the renderer.
    pub content: String,

    /// Ordered choices offered to the reader.
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Node {
    /// Short body excerpt for the overview focus card.
    ///
    /// Char-based truncation so multi-byte text never splits.
    pub fn summary(&self) -> String {
        let stripped: String = self
            .content
            .chars()
            .filter(|c| !matches!(c, '#' | '*'))
            .collect();
        let trimmed = stripped.trim();
        if trimmed.chars().count() > 150 {
            let head: String = trimmed.chars().take(150).collect();
            format!("{head}...")
        } else {
            trimmed.to_string()
        }
    }
}

/// A reader choice attached to a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Button label.
    pub text: String,

    /// Target node id, the overview sentinel, or absent for a
    /// terminal action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Where an action leads, with the sentinel parsed in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget<'a> {
    /// Navigate to another node.
    Goto(&'a str),
    /// Return to the overview.
    Overview,
    /// Terminal: the action goes nowhere.
    Terminal,
}

impl Action {
    /// Classify this action's `next` field.
    pub fn target(&self) -> ActionTarget<'_> {
        match self.next.as_deref() {
            Some(OVERVIEW_SENTINEL) => ActionTarget::Overview,
            Some(id) => ActionTarget::Goto(id),
            None => ActionTarget::Terminal,
        }
    }
}

/// True if `id` follows the trackable-node naming convention.
pub fn is_memory_id(id: &str) -> bool {
    id.starts_with(MEMORY_PREFIX)
}

/// Read-only view over the authored story content.
///
/// Backed by a `BTreeMap` so iteration order is lexicographic by id,
/// the order every layout and listing relies on.
#[derive(Debug, Clone)]
pub struct StoryGraph {
    nodes: BTreeMap<String, Node>,
}

/// Node shape as it appears in the content input, where the id is the
/// surrounding object key rather than a field.
#[derive(Deserialize)]
struct RawNode {
    title: String,
    content: String,
    #[serde(default)]
    actions: Vec<Action>,
}

impl StoryGraph {
    /// Build a graph from already-constructed nodes.
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    /// Parse the content-collaborator schema: a JSON object keyed by
    /// node id.
    pub fn from_json_str(content: &str) -> Result<Self, StoryError> {
        let raw: BTreeMap<String, RawNode> = serde_json::from_str(content)?;
        let nodes = raw
            .into_iter()
            .map(|(id, n)| {
                let node = Node {
                    id: id.clone(),
                    title: n.title,
                    content: n.content,
                    actions: n.actions,
                };
                (id, node)
            })
            .collect();
        Ok(Self { nodes })
    }

    /// Look up a node by id.
    pub fn resolve(&self, id: &str) -> Result<&Node, StoryError> {
        self.nodes
            .get(id)
            .ok_or_else(|| StoryError::NodeNotFound(id.to_string()))
    }

    /// Whether `id` names a memory node (by convention, not presence).
    pub fn is_memory_node(&self, id: &str) -> bool {
        is_memory_id(id)
    }

    /// All memory-node ids in lexicographic order.
    pub fn memory_node_ids(&self) -> Vec<&str> {
        self.nodes
            .keys()
            .filter(|id| is_memory_id(id))
            .map(String::as_str)
            .collect()
    }

    /// Count of all memory nodes, for the "visited/total" indicator.
    pub fn memory_count(&self) -> usize {
        self.nodes.keys().filter(|id| is_memory_id(id)).count()
    }

    /// Total node count.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Built-in story used by tests and as the binary's fallback content.
pub fn sample_story() -> StoryGraph {
    fn node(id: &str, title: &str, content: &str, actions: Vec<Action>) -> Node {
        Node {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
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
            "The Diary",
            "## A diary bound in grey cloth\n\
             The pages are out of order. Someone has been reading them \
             before you, and counting.\n\
             [Three entries are dog-eared.]",
            vec![
                goto("Open the earliest entry", "atom_arrival"),
                goto("Open the dog-eared entry", "atom_lighthouse"),
                goto("Put the diary down", OVERVIEW_SENTINEL),
            ],
        ),
        node(
            "atom_arrival",
            "Arrival",
            "### The ferry\n\
             The town appears between two squalls, roofs first. Nobody \
             waits at the landing, but a lamp is lit in the harbor office.",
            vec![
                goto("Follow the lamp", "atom_lighthouse"),
                goto("Back to the diary", START_NODE),
            ],
        ),
        node(
            "atom_lighthouse",
            "The Lighthouse",
            "The keeper's log stops mid-sentence on the ninth of March. \
             The lens still turns. Somebody winds it.\n\
             - **Found**: a second diary, same grey cloth.",
            vec![
                goto("Read the second diary", "atom_letters"),
                goto("Back to the diary", START_NODE),
            ],
        ),
        node(
            "atom_letters",
            "Unsent Letters",
            "A bundle of letters, addressed but never stamped. Each one \
             opens the same way: *by the time you read this*.",
            vec![
                goto("Return to the overview", OVERVIEW_SENTINEL),
                Action {
                    text: "Stop reading".to_string(),
                    next: None,
                },
            ],
        ),
    ])
}
