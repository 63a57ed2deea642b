//! VaultGraph Core - Graph Derivation Engine
//!
//! This crate turns a raw corpus of interlinked notes, attachments, and tags
//! into a filtered, colored, positioned node/edge graph, and keeps that
//! derived graph consistent as the corpus or the user's view configuration
//! changes - preserving spatial continuity across updates so the layout
//! never jumps as a whole.
//!
//! # Architecture
//!
//! - **Pure derivation**: the node/edge set is recomputed from scratch each
//!   cycle as a pure function of (corpus snapshot, config snapshot)
//! - **Incremental positions**: spatial coordinates are carried forward by
//!   node id, never recomputed by derivation
//! - **Collaborator boundaries**: corpus access behind the async
//!   `VaultReader` trait; rendering and physics consume replaceable
//!   snapshots and side-tables
//! - **Degraded, never fatal**: every failure is caught at the update
//!   boundary and logged; the previous graph stays displayed
//!
//! # Modules
//!
//! - [`models`] - Graph records and view-configuration snapshots
//! - [`vault`] - Corpus abstraction plus in-memory and Markdown backends
//! - [`services`] - Derivation pipeline, position continuity, filter and
//!   color resolution, update orchestration
//! - [`utils`] - Small shared helpers (glob matching)

pub mod models;
pub mod services;
pub mod utils;
pub mod vault;

// Re-export commonly used types
pub use models::*;
pub use services::*;
pub use vault::{CorpusSnapshot, MarkdownVault, MemoryVault, VaultError, VaultFile, VaultReader};
