//! VaultReader Trait - Corpus Abstraction Layer
//!
//! This module defines the `VaultReader` trait that abstracts corpus access
//! for the derivation engine. The trait enables multiple backend
//! implementations (in-memory, Markdown directory, host-application stores)
//! without changing the derivation logic.
//!
//! # Architecture
//!
//! - **Abstraction point**: between the graph service (orchestration) and
//!   whatever owns the notes. The engine never touches storage directly.
//! - **Async-first**: content reads are the only suspension points of an
//!   update cycle, so every method is async to support both in-process and
//!   I/O-backed corpora.
//! - **Resolved links**: distinguishing a confirmed cross-reference from a
//!   broken one is the reader's job. The derivation engine consumes only the
//!   resolved table and independently re-checks that both endpoints exist.
//! - **Error handling**: `anyhow::Result` for flexible context; shipped
//!   implementations raise typed [`VaultError`](super::VaultError) values
//!   underneath.
//!
//! # Examples
//!
//! ```rust
//! use vaultgraph_core::vault::{MemoryVault, VaultReader};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let vault = MemoryVault::new()
//!     .with_document("a.md", "links to [[b]]")
//!     .with_document("b.md", "the target")
//!     .with_link("a.md", "b.md");
//!
//! let files = vault.list_files().await?;
//! assert_eq!(files.len(), 2);
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Resolved cross-reference table: source id to the set of target ids the
/// corpus indexer confirmed exist.
///
/// Ordered maps keep enumeration deterministic, which the derivation and
/// seeding logic rely on for reproducible output.
pub type LinkTable = BTreeMap<String, BTreeSet<String>>;

/// Extension treated as a text document; everything else is an attachment.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Metadata for one enumerated vault file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFile {
    /// Vault-relative path with `/` separators; the node id.
    pub path: String,
    /// Base name without extension; the display name.
    pub name: String,
    /// File extension without the dot; empty when absent.
    pub extension: String,
}

impl VaultFile {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            extension: extension.into(),
        }
    }

    /// Derive name and extension from a vault-relative path.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let base = path.rsplit('/').next().unwrap_or(path.as_str());
        let (name, extension) = match base.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), ext.to_string()),
            _ => (base.to_string(), String::new()),
        };
        Self {
            path,
            name,
            extension,
        }
    }

    /// Whether this file is a text document (by extension check).
    pub fn is_markdown(&self) -> bool {
        self.extension.eq_ignore_ascii_case(MARKDOWN_EXTENSION)
    }
}

/// Abstraction layer for corpus access.
///
/// Implementations must be `Send + Sync` so update cycles can run on any
/// async executor thread.
#[async_trait]
pub trait VaultReader: Send + Sync {
    /// Enumerate all documents and attachments under management.
    ///
    /// Order must be deterministic for a given corpus state; shipped
    /// implementations sort by path.
    async fn list_files(&self) -> Result<Vec<VaultFile>>;

    /// The resolved cross-reference table.
    ///
    /// Returns `Ok(None)` while the index has not been built yet. That is a
    /// recoverable transient state: the caller aborts the cycle with "no
    /// graph" and retries on the next trigger.
    async fn resolved_links(&self) -> Result<Option<LinkTable>>;

    /// Tag names associated with a document, in occurrence order.
    async fn tags_of(&self, path: &str) -> Result<Vec<String>>;

    /// Full text content of a document.
    async fn read_content(&self, path: &str) -> Result<String>;
}
