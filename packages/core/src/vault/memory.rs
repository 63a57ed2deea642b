//! In-Memory Vault
//!
//! Builder-style corpus for tests and for host applications that already own
//! the note set. Links are declared explicitly (they are "resolved" by
//! construction), and `without_index()` simulates a host whose link index has
//! not been built yet.

use super::{LinkTable, VaultError, VaultFile, VaultReader};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory `VaultReader` implementation.
///
/// Files are kept sorted by path so enumeration order is deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    files: Vec<VaultFile>,
    links: LinkTable,
    tags: HashMap<String, Vec<String>>,
    contents: HashMap<String, String>,
    index_built: bool,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self {
            index_built: true,
            ..Self::default()
        }
    }

    /// Add a document with the given text content.
    pub fn with_document(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        self.contents.insert(path.clone(), content.into());
        self.insert_file(VaultFile::from_path(path));
        self
    }

    /// Add an attachment (no content, no tags).
    pub fn with_attachment(mut self, path: impl Into<String>) -> Self {
        self.insert_file(VaultFile::from_path(path.into()));
        self
    }

    /// Associate tag names with a document path.
    pub fn with_tags<I, S>(mut self, path: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .insert(path.into(), tags.into_iter().map(Into::into).collect());
        self
    }

    /// Declare a resolved link from `source` to `target`.
    pub fn with_link(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.links
            .entry(source.into())
            .or_default()
            .insert(target.into());
        self
    }

    /// Simulate a corpus whose link index is not available yet.
    pub fn without_index(mut self) -> Self {
        self.index_built = false;
        self
    }

    fn insert_file(&mut self, file: VaultFile) {
        match self.files.binary_search_by(|f| f.path.cmp(&file.path)) {
            Ok(existing) => self.files[existing] = file,
            Err(slot) => self.files.insert(slot, file),
        }
    }
}

#[async_trait]
impl VaultReader for MemoryVault {
    async fn list_files(&self) -> Result<Vec<VaultFile>> {
        Ok(self.files.clone())
    }

    async fn resolved_links(&self) -> Result<Option<LinkTable>> {
        if !self.index_built {
            return Ok(None);
        }
        Ok(Some(self.links.clone()))
    }

    async fn tags_of(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.tags.get(path).cloned().unwrap_or_default())
    }

    async fn read_content(&self, path: &str) -> Result<String> {
        self.contents
            .get(path)
            .cloned()
            .ok_or_else(|| VaultError::not_found(path).into())
    }
}
