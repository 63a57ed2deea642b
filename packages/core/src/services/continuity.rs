//! Position Continuity Manager
//!
//! Owns the spatial side-table across re-derivations. Nodes that persist
//! keep their exact prior coordinates; genuinely new nodes are seeded near
//! an already-positioned neighbor so the layout never jumps as a whole.
//!
//! # Seeding
//!
//! A new node takes the position of its first neighbor (scanning the new
//! edge set in order, which is deterministic) that was positioned before
//! this cycle, displaced by a bounded jitter derived from a hash of the
//! node id, reproducible for the same input and never an exact overlap.
//! A new node whose neighbors are all new stays unpositioned and defers to
//! the simulation's default placement; transitive placement is not
//! attempted in one pass.

use crate::models::{DerivedGraph, GraphEdge, Position};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Maximum jitter displacement per axis, in simulation units.
const JITTER_RANGE: f64 = 1.0;

/// Position side-table, keyed by node id.
pub type PositionMap = HashMap<String, Position>;

/// Carries node positions across update cycles.
#[derive(Debug, Clone, Default)]
pub struct PositionContinuity {
    positions: PositionMap,
}

impl PositionContinuity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the side-table for a freshly derived graph.
    ///
    /// Existing positions are carried over exactly and never overwritten;
    /// entries for nodes no longer present are dropped.
    pub fn carry_over(&mut self, graph: &DerivedGraph) {
        let mut next = PositionMap::with_capacity(graph.nodes.len());

        for node in &graph.nodes {
            if let Some(position) = self.positions.get(&node.id) {
                next.insert(node.id.clone(), *position);
            }
        }

        for node in &graph.nodes {
            if next.contains_key(&node.id) {
                continue;
            }
            if let Some(anchor) = first_positioned_neighbor(&node.id, &graph.edges, &self.positions)
            {
                next.insert(node.id.clone(), seeded_near(anchor, &node.id));
            }
        }

        self.positions = next;
    }

    /// Current position of a node, if one is known.
    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    /// Record a position computed by the physics simulation.
    pub fn set_position(&mut self, id: impl Into<String>, position: Position) {
        self.positions.insert(id.into(), position);
    }

    /// The full side-table, for handing to the rendering collaborator.
    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// First neighbor of `id` (in edge order) with a position from the prior
/// cycle. Neighbors that are themselves new have no prior position and are
/// skipped.
fn first_positioned_neighbor(
    id: &str,
    edges: &[GraphEdge],
    prior: &PositionMap,
) -> Option<Position> {
    for edge in edges {
        let Some(other) = edge.other_end(id) else {
            continue;
        };
        if let Some(position) = prior.get(other) {
            return Some(*position);
        }
    }
    None
}

fn seeded_near(anchor: Position, id: &str) -> Position {
    let (dx, dy, dz) = stable_offset(id);
    anchor.offset(dx * JITTER_RANGE, dy * JITTER_RANGE, dz * JITTER_RANGE)
}

/// Hash a node id into three offsets in [-1, 1], 21 bits of hash per axis.
fn stable_offset(id: &str) -> (f64, f64, f64) {
    const AXIS_BITS: u64 = 0x1f_ffff;
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = (hash & AXIS_BITS) as f64 / AXIS_BITS as f64;
    let y = ((hash >> 21) & AXIS_BITS) as f64 / AXIS_BITS as f64;
    let z = ((hash >> 42) & AXIS_BITS) as f64 / AXIS_BITS as f64;
    (x * 2.0 - 1.0, y * 2.0 - 1.0, z * 2.0 - 1.0)
}
