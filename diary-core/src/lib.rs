//! Branching-diary narrative engine.
//!
//! This crate provides:
//! - A read-only story graph with "memory" nodes tracked per visit
//! - Persistent visit counts with crash-tolerant recovery
//! - Deterministic heat-calendar and scatter-map layouts
//! - A view-mode state machine driving an injected render surface
//!
//! # Quick Start
//!
//! ```
//! use diary_core::{MemoryStore, ReaderSession, VisitTracker};
//! use diary_core::testing::RecordingSurface;
//!
//! let graph = diary_core::story::sample_story();
//! let tracker = VisitTracker::load(Box::new(MemoryStore::new()));
//! let mut session = ReaderSession::new(graph, tracker, RecordingSurface::new());
//!
//! session.open("atom_lighthouse");
//! assert_eq!(session.tracker().count_of("atom_lighthouse"), 1);
//! ```

pub mod layout;
pub mod persist;
pub mod session;
pub mod story;
pub mod surface;
pub mod testing;
pub mod visits;

// Primary public API
pub use layout::{heat_calendar, scatter_map, Cell, MapPoint, Marker, Noise};
pub use persist::{FileStore, MemoryStore, ProgressStore, StoreError};
pub use session::{ReaderSession, ViewMode};
pub use story::{Action, ActionTarget, Node, StoryError, StoryGraph};
pub use surface::{ConfirmPrompt, ConfirmTicket, FocusCard, RenderSurface};
pub use visits::VisitTracker;
