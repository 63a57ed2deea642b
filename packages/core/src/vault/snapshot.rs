//! Corpus Snapshot - Eagerly Loaded Derivation Input
//!
//! Derivation is not safe to run against a partially-read corpus, so the
//! snapshot loader awaits every content read before returning. The result is
//! an immutable value the eight-stage pipeline can consume synchronously.
//!
//! The load-everything-then-swap shape keeps the update cycle's suspension
//! points confined to this module: once a `CorpusSnapshot` exists, the rest
//! of the cycle is pure computation.

use super::{LinkTable, VaultFile, VaultReader};
use anyhow::Result;
use std::collections::HashMap;

/// Immutable snapshot of the vault at one point in time.
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
    /// All enumerated files, in the reader's deterministic order.
    pub files: Vec<VaultFile>,
    /// Resolved cross-reference table.
    pub links: LinkTable,
    /// Tag names per document path.
    pub tags: HashMap<String, Vec<String>>,
    /// Full text per document path.
    pub contents: HashMap<String, String>,
}

impl CorpusSnapshot {
    /// An empty corpus. Deriving from it yields an empty graph, not an error.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a complete snapshot from the reader.
    ///
    /// Returns `Ok(None)` when the reader's link index is not built yet.
    /// Tag lists and text content are read eagerly for documents only;
    /// attachments contribute bare file metadata.
    pub async fn load(reader: &dyn VaultReader) -> Result<Option<Self>> {
        let Some(links) = reader.resolved_links().await? else {
            return Ok(None);
        };

        let files = reader.list_files().await?;
        let mut tags = HashMap::new();
        let mut contents = HashMap::new();
        for file in &files {
            if !file.is_markdown() {
                continue;
            }
            let file_tags = reader.tags_of(&file.path).await?;
            if !file_tags.is_empty() {
                tags.insert(file.path.clone(), file_tags);
            }
            contents.insert(file.path.clone(), reader.read_content(&file.path).await?);
        }

        Ok(Some(Self {
            files,
            links,
            tags,
            contents,
        }))
    }

    /// Tag names for a document path; empty for unknown paths.
    pub fn tags_for(&self, path: &str) -> Vec<String> {
        self.tags.get(path).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::MemoryVault;

    #[test]
    fn load_awaits_all_document_reads() {
        let vault = MemoryVault::new()
            .with_document("a.md", "alpha")
            .with_tags("a.md", ["x"])
            .with_document("b.md", "beta")
            .with_attachment("c.png")
            .with_link("a.md", "b.md");

        let snapshot = tokio_test::block_on(CorpusSnapshot::load(&vault))
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.files.len(), 3);
        assert_eq!(snapshot.contents.len(), 2);
        assert_eq!(snapshot.tags_for("a.md"), vec!["x"]);
        assert!(snapshot.links.contains_key("a.md"));
    }

    #[test]
    fn load_reports_missing_index_as_none() {
        let vault = MemoryVault::new().with_document("a.md", "").without_index();
        let snapshot = tokio_test::block_on(CorpusSnapshot::load(&vault)).unwrap();
        assert!(snapshot.is_none());
    }
}
