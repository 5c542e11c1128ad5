//! Deterministic map layouts.
//!
//! Two pure arrangements of the memory-node set: the fixed-grid heat
//! calendar and the scattered overview map. Marker placement and
//! intensity tiers depend only on the node ordering and visit counts;
//! the cosmetic pieces (background noise, overflow scatter placement)
//! come from an injectable RNG so tests can seed them or ignore them.

use crate::story::StoryGraph;
use crate::visits::VisitTracker;
use rand::Rng;

/// Base cell count of the heat-calendar grid.
pub const GRID_CELLS: usize = 140;

/// Visit counts saturate at this intensity tier.
pub const MAX_TIER: u32 = 4;

/// Markers at or above this count render emphasized.
pub const EMPHASIS_TIER: u32 = 3;

/// Predefined overview coordinates, in percent of each axis, assigned
/// in order to the first memory nodes.
pub const FIXED_COORDS: [(f32, f32); 6] = [
    (50.0, 50.0),
    (30.0, 30.0),
    (70.0, 30.0),
    (25.0, 65.0),
    (65.0, 70.0),
    (50.0, 20.0),
];

/// Normalization constant turning visited-count into a progress ratio
/// for the noise density.
const PROGRESS_NORM: f32 = 6.0;

/// One heat-calendar cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// The memory node assigned here, if any.
    pub marker: Option<Marker>,

    /// Cosmetic background noise. Only ever set on empty cells.
    pub noise: Option<Noise>,
}

impl Cell {
    fn empty() -> Self {
        Self {
            marker: None,
            noise: None,
        }
    }
}

/// A memory node placed on the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub title: String,
    /// Raw visit count.
    pub count: u32,
    /// Intensity tier, 0 for unvisited (present but unrevealed),
    /// otherwise `min(count, MAX_TIER)`.
    pub tier: u32,
    /// Glow hint for well-worn entries.
    pub emphasized: bool,
}

/// Low-intensity background flicker on an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Noise {
    /// 1 or 2.
    pub tier: u32,
    /// In `[0.05, 0.20)`.
    pub opacity: f32,
}

/// A node placed on the scattered overview map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub id: String,
    pub title: String,
    /// Percent of the horizontal axis.
    pub x: f32,
    /// Percent of the vertical axis.
    pub y: f32,
    /// Visited at least once.
    pub read: bool,
}

/// Grid size for `m` markers: the base size, grown in whole grids when
/// the marker count would otherwise break the no-collision guarantee
/// of the placement formula (which needs `m < cells`).
fn grid_size(m: usize) -> usize {
    if m < GRID_CELLS {
        GRID_CELLS
    } else {
        (m / GRID_CELLS + 1) * GRID_CELLS
    }
}

/// Compute the heat calendar with a thread-local RNG for the noise.
pub fn heat_calendar(graph: &StoryGraph, tracker: &VisitTracker) -> Vec<Cell> {
    heat_calendar_with_rng(graph, tracker, &mut rand::thread_rng())
}

/// Compute the heat calendar with a caller-supplied RNG.
///
/// Marker-to-cell assignment and tiers are pure in the graph and the
/// visit counts; only the noise draws from `rng`.
pub fn heat_calendar_with_rng<R: Rng>(
    graph: &StoryGraph,
    tracker: &VisitTracker,
    rng: &mut R,
) -> Vec<Cell> {
    let ids = graph.memory_node_ids();
    let cells = grid_size(ids.len());
    let mut grid = vec![Cell::empty(); cells];

    // Spread markers evenly, skipping the extreme first cell.
    for (k, id) in ids.iter().enumerate() {
        let pos = (k + 1) * cells / (ids.len() + 1);
        let count = tracker.count_of(id);
        let title = graph
            .resolve(id)
            .map(|n| n.title.clone())
            .unwrap_or_default();
        grid[pos].marker = Some(Marker {
            id: id.to_string(),
            title,
            count,
            tier: count.min(MAX_TIER),
            emphasized: count >= EMPHASIS_TIER,
        });
    }

    // Background noise scales with overall progress; silent until the
    // first visit.
    let progress = tracker.visited_count() as f32 / PROGRESS_NORM;
    if progress > 0.0 {
        let threshold = 0.99 - progress * 0.1;
        for cell in grid.iter_mut().filter(|c| c.marker.is_none()) {
            if rng.gen::<f32>() > threshold {
                cell.noise = Some(Noise {
                    tier: rng.gen_range(1..=2),
                    opacity: rng.gen::<f32>() * 0.15 + 0.05,
                });
            }
        }
    }

    grid
}

/// Compute the scattered overview map with a thread-local RNG for
/// overflow placement.
pub fn scatter_map(graph: &StoryGraph, tracker: &VisitTracker) -> Vec<MapPoint> {
    scatter_map_with_rng(graph, tracker, &mut rand::thread_rng())
}

/// Compute the scattered overview map with a caller-supplied RNG.
///
/// The first [`FIXED_COORDS`] slots are fixed; ids beyond them land at
/// rng-chosen interior coordinates on every call.
pub fn scatter_map_with_rng<R: Rng>(
    graph: &StoryGraph,
    tracker: &VisitTracker,
    rng: &mut R,
) -> Vec<MapPoint> {
    graph
        .memory_node_ids()
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let (x, y) = FIXED_COORDS.get(index).copied().unwrap_or_else(|| {
                (rng.gen::<f32>() * 80.0 + 10.0, rng.gen::<f32>() * 80.0 + 10.0)
            });
            let title = graph
                .resolve(id)
                .map(|n| n.title.clone())
                .unwrap_or_default();
            MapPoint {
                id: id.to_string(),
                title,
                x,
                y,
                read: tracker.count_of(id) > 0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use crate::story::{sample_story, Node, StoryGraph};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tracker() -> VisitTracker {
        VisitTracker::load(Box::new(MemoryStore::new()))
    }

    fn graph_of(ids: &[&str]) -> StoryGraph {
        StoryGraph::new(ids.iter().map(|id| Node {
            id: id.to_string(),
            title: id.to_uppercase(),
            content: String::new(),
            actions: vec![],
        }))
    }

    fn marker_positions(cells: &[Cell]) -> Vec<(usize, String)> {
        cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.marker.as_ref().map(|m| (i, m.id.clone())))
            .collect()
    }

    #[test]
    fn test_heat_calendar_is_structurally_deterministic() {
        let graph = sample_story();
        let mut tracker = tracker();
        tracker.record_visit("atom_lighthouse");

        let a = heat_calendar_with_rng(&graph, &tracker, &mut StdRng::seed_from_u64(1));
        let b = heat_calendar_with_rng(&graph, &tracker, &mut StdRng::seed_from_u64(99));

        // Same assignments and tiers regardless of the noise seed.
        assert_eq!(marker_positions(&a), marker_positions(&b));
        let tiers = |cells: &[Cell]| -> Vec<u32> {
            cells
                .iter()
                .filter_map(|c| c.marker.as_ref().map(|m| m.tier))
                .collect()
        };
        assert_eq!(tiers(&a), tiers(&b));
    }

    #[test]
    fn test_heat_calendar_placement_formula() {
        let graph = graph_of(&["atom_a", "atom_b", "atom_c"]);
        let cells = heat_calendar_with_rng(&graph, &tracker(), &mut StdRng::seed_from_u64(0));

        assert_eq!(cells.len(), GRID_CELLS);
        let positions = marker_positions(&cells);
        // floor((k + 1) * 140 / 4) for k = 0, 1, 2.
        assert_eq!(
            positions,
            vec![
                (35, "atom_a".to_string()),
                (70, "atom_b".to_string()),
                (105, "atom_c".to_string()),
            ]
        );
        // The extreme first cell never holds a marker.
        assert!(cells[0].marker.is_none());
    }

    #[test]
    fn test_tiers_saturate_and_emphasize() {
        let graph = graph_of(&["atom_a", "atom_b", "atom_c"]);
        let mut tracker = tracker();
        for _ in 0..6 {
            tracker.record_visit("atom_a");
        }
        tracker.record_visit("atom_b");

        let cells = heat_calendar_with_rng(&graph, &tracker, &mut StdRng::seed_from_u64(0));
        let markers: Vec<&Marker> = cells.iter().filter_map(|c| c.marker.as_ref()).collect();

        let a = markers.iter().find(|m| m.id == "atom_a").unwrap();
        assert_eq!(a.count, 6);
        assert_eq!(a.tier, MAX_TIER);
        assert!(a.emphasized);

        let b = markers.iter().find(|m| m.id == "atom_b").unwrap();
        assert_eq!(b.tier, 1);
        assert!(!b.emphasized);

        // Unvisited: present but unrevealed.
        let c = markers.iter().find(|m| m.id == "atom_c").unwrap();
        assert_eq!(c.tier, 0);
    }

    #[test]
    fn test_no_noise_before_first_visit() {
        let graph = sample_story();
        let cells = heat_calendar_with_rng(&graph, &tracker(), &mut StdRng::seed_from_u64(7));
        assert!(cells.iter().all(|c| c.noise.is_none()));
    }

    #[test]
    fn test_noise_only_on_empty_cells_within_bounds() {
        let graph = sample_story();
        let mut tracker = tracker();
        tracker.record_visit("atom_arrival");
        tracker.record_visit("atom_letters");
        tracker.record_visit("atom_lighthouse");

        // Enough draws that some noise almost surely appears.
        let mut any_noise = false;
        for seed in 0..32 {
            let cells =
                heat_calendar_with_rng(&graph, &tracker, &mut StdRng::seed_from_u64(seed));
            for cell in &cells {
                if let Some(noise) = &cell.noise {
                    any_noise = true;
                    assert!(cell.marker.is_none());
                    assert!(noise.tier == 1 || noise.tier == 2);
                    assert!((0.05..0.20).contains(&noise.opacity));
                }
            }
        }
        assert!(any_noise);
    }

    #[test]
    fn test_grid_grows_past_capacity() {
        let ids: Vec<String> = (0..150).map(|i| format!("atom_{i:03}")).collect();
        let graph = graph_of(&ids.iter().map(String::as_str).collect::<Vec<_>>());
        let cells = heat_calendar_with_rng(&graph, &tracker(), &mut StdRng::seed_from_u64(0));

        assert_eq!(cells.len(), 280);
        // No collisions: every marker survives.
        assert_eq!(marker_positions(&cells).len(), 150);
    }

    #[test]
    fn test_scatter_first_six_are_fixed() {
        let ids: Vec<String> = (0..8).map(|i| format!("atom_{i}")).collect();
        let graph = graph_of(&ids.iter().map(String::as_str).collect::<Vec<_>>());

        let a = scatter_map_with_rng(&graph, &tracker(), &mut StdRng::seed_from_u64(1));
        let b = scatter_map_with_rng(&graph, &tracker(), &mut StdRng::seed_from_u64(2));

        for i in 0..FIXED_COORDS.len() {
            assert_eq!((a[i].x, a[i].y), FIXED_COORDS[i]);
            assert_eq!((b[i].x, b[i].y), FIXED_COORDS[i]);
        }
        // Overflow points stay inside the 10-90% interior.
        for p in a.iter().skip(FIXED_COORDS.len()) {
            assert!((10.0..90.0).contains(&p.x));
            assert!((10.0..90.0).contains(&p.y));
        }
    }

    #[test]
    fn test_scatter_read_flag_follows_counts() {
        let graph = sample_story();
        let mut tracker = tracker();
        tracker.record_visit("atom_letters");

        let points = scatter_map_with_rng(&graph, &tracker, &mut StdRng::seed_from_u64(0));
        let read: Vec<(&str, bool)> = points.iter().map(|p| (p.id.as_str(), p.read)).collect();
        assert_eq!(
            read,
            vec![
                ("atom_arrival", false),
                ("atom_letters", true),
                ("atom_lighthouse", false),
            ]
        );
    }
}
