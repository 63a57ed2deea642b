//! Data Models
//!
//! This module contains the core data structures used throughout VaultGraph:
//!
//! - `GraphNode` / `GraphEdge` / `DerivedGraph` - the derived graph snapshot
//! - `Position` - spatial coordinates carried in side-tables
//! - `GraphConfig` and friends - immutable view-configuration snapshots
//!
//! All externally visible types serialize as camelCase JSON so host
//! applications can persist them directly.

mod config;
mod node;

pub use config::{
    ColorGroup, ConfigPatch, DisplayConfig, FilterKind, FilterRule, ForceConfig, GraphConfig,
    RefreshKind, SearchConfig, SimulationRegime, SimulationTuning,
};
pub use node::{
    DerivedGraph, GraphEdge, GraphNode, NodeKind, Position, TAG_ID_PREFIX, TAG_MARKER,
};
