//! Corpus Layer
//!
//! This module owns all access to the underlying note corpus:
//!
//! - `VaultReader` - the async corpus abstraction the engine consumes
//! - `CorpusSnapshot` - eagerly loaded, immutable derivation input
//! - `MemoryVault` - builder-style in-memory corpus for tests and hosts
//! - `MarkdownVault` - filesystem corpus with link/tag extraction and
//!   link resolution
//!
//! Link resolution happens in this layer: the derivation engine only ever
//! consumes confirmed references.

mod error;
mod markdown;
mod memory;
mod reader;
mod snapshot;

pub use error::VaultError;
pub use markdown::MarkdownVault;
pub use memory::MemoryVault;
pub use reader::{LinkTable, VaultFile, VaultReader, MARKDOWN_EXTENSION};
pub use snapshot::CorpusSnapshot;
