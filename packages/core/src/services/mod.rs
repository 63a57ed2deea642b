//! Derivation Services
//!
//! This module contains the engine's core logic:
//!
//! - `derivation` - the eight-stage graph derivation pipeline
//! - `continuity` - position carry-over and neighbor seeding
//! - `filter` - advanced-filter predicate evaluation
//! - `color` - node/edge color and style resolution
//! - `GraphService` - update orchestration, re-entrancy guarding, and the
//!   hot/cool regime decision
//!
//! Services coordinate between the corpus layer and the presentation
//! collaborators; the derivation pipeline itself stays pure.

pub mod color;
pub mod continuity;
pub mod derivation;
pub mod filter;
pub mod graph_service;

pub use color::{group_matches, is_valid_hex_color, resolve_edge_style, resolve_node_color, EdgeStyle};
pub use continuity::{PositionContinuity, PositionMap};
pub use derivation::derive;
pub use filter::rule_matches;
pub use graph_service::{GraphService, UpdateOptions, UpdateOutcome};
