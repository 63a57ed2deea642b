//! Markdown Directory Vault
//!
//! A `VaultReader` rooted at a directory of Markdown notes. It enumerates
//! files, extracts `[[wikilinks]]` and standard Markdown links, extracts
//! inline `#tags`, and resolves link targets against the file set: by exact
//! relative path, by path without extension, and by base name, all
//! case-insensitive. Unresolvable targets are dropped here; the derivation
//! engine only ever sees confirmed references.
//!
//! Hidden entries (dot-prefixed files and directories) are skipped during
//! enumeration.

use super::{LinkTable, VaultError, VaultFile, VaultReader};
use anyhow::Result;
use async_trait::async_trait;
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Compiled extraction patterns
///
/// Wikilinks may carry a heading anchor (`[[note#section]]`) and an alias
/// (`[[note|label]]`); only the target portion is captured. Inline tags
/// must start with a letter so heading markers (`## title`) and bare `#`
/// are not mistaken for tags.
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]\|#]+)(?:#[^\]\|]*)?(?:\|[^\]]*)?\]\]").unwrap()
});
static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\w#])#([A-Za-z][\w/-]*)").unwrap());

/// Filesystem `VaultReader` implementation.
#[derive(Debug, Clone)]
pub struct MarkdownVault {
    root: PathBuf,
}

impl MarkdownVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recursively enumerate files under the root, skipping hidden entries.
    async fn walk(&self) -> Result<Vec<VaultFile>, VaultError> {
        if !self.root.is_dir() {
            return Err(VaultError::invalid_root(&self.root));
        }

        let mut pending = vec![self.root.clone()];
        let mut files = Vec::new();
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| VaultError::io(&dir, e))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| VaultError::io(&dir, e))?
            {
                let name = entry.file_name();
                if name.to_string_lossy().starts_with('.') {
                    continue;
                }
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| VaultError::io(&path, e))?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    files.push(VaultFile::from_path(self.relative_path(&path)));
                }
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    async fn read_file(&self, path: &str) -> Result<String, VaultError> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VaultError::not_found(path)
            } else {
                VaultError::io(full, e)
            }
        })
    }
}

#[async_trait]
impl VaultReader for MarkdownVault {
    async fn list_files(&self) -> Result<Vec<VaultFile>> {
        Ok(self.walk().await?)
    }

    async fn resolved_links(&self) -> Result<Option<LinkTable>> {
        let files = self.walk().await?;
        let index = TargetIndex::build(&files);

        let mut table = LinkTable::new();
        for file in files.iter().filter(|f| f.is_markdown()) {
            let content = self.read_file(&file.path).await?;
            let mut targets = BTreeSet::new();
            for raw in extract_link_targets(&content) {
                if let Some(resolved) = index.resolve(&raw) {
                    if resolved != file.path {
                        targets.insert(resolved);
                    }
                }
            }
            if !targets.is_empty() {
                table.insert(file.path.clone(), targets);
            }
        }
        Ok(Some(table))
    }

    async fn tags_of(&self, path: &str) -> Result<Vec<String>> {
        let content = self.read_file(path).await?;
        Ok(extract_tags(&content))
    }

    async fn read_content(&self, path: &str) -> Result<String> {
        Ok(self.read_file(path).await?)
    }
}

/// Case-insensitive lookup from link target spellings to vault paths.
///
/// Files are indexed under their full relative path, their path without the
/// markdown extension, and their bare base name. Ambiguous base names keep
/// the first file in path order.
struct TargetIndex {
    by_spelling: HashMap<String, String>,
}

impl TargetIndex {
    fn build(files: &[VaultFile]) -> Self {
        let mut by_spelling = HashMap::new();
        for file in files {
            let mut spellings = vec![file.path.to_lowercase()];
            if file.is_markdown() {
                if let Some(stripped) = file.path.strip_suffix(".md") {
                    spellings.push(stripped.to_lowercase());
                }
            }
            spellings.push(file.name.to_lowercase());
            for spelling in spellings {
                by_spelling.entry(spelling).or_insert_with(|| file.path.clone());
            }
        }
        Self { by_spelling }
    }

    fn resolve(&self, target: &str) -> Option<String> {
        let target = target.trim().trim_start_matches("./").to_lowercase();
        if target.is_empty() || target.contains("://") {
            return None;
        }
        self.by_spelling.get(&target).cloned()
    }
}

/// Extract raw link targets: wikilinks plus standard Markdown link
/// destinations from the pull parser.
fn extract_link_targets(content: &str) -> Vec<String> {
    let mut targets: Vec<String> = WIKILINK
        .captures_iter(content)
        .map(|c| c[1].trim().to_string())
        .collect();

    for event in Parser::new(content) {
        if let Event::Start(Tag::Link { dest_url, .. }) = event {
            targets.push(dest_url.to_string());
        }
    }
    targets
}

/// Extract inline tag names in occurrence order, deduplicated.
fn extract_tags(content: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut tags = Vec::new();
    for capture in INLINE_TAG.captures_iter(content) {
        let tag = capture[1].to_string();
        if seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wikilink_targets_drop_anchor_and_alias() {
        let targets = extract_link_targets("see [[note]] and [[deep/other#sec|label]]");
        assert!(targets.contains(&"note".to_string()));
        assert!(targets.contains(&"deep/other".to_string()));
    }

    #[test]
    fn markdown_links_are_extracted() {
        let targets = extract_link_targets("a [label](other.md) and [ext](https://example.com)");
        assert!(targets.contains(&"other.md".to_string()));
        // external urls survive extraction but never resolve
        let index = TargetIndex::build(&[VaultFile::from_path("other.md")]);
        assert_eq!(index.resolve("other.md"), Some("other.md".to_string()));
        assert_eq!(index.resolve("https://example.com"), None);
    }

    #[test]
    fn tags_skip_headings_and_dedupe() {
        let tags = extract_tags("# Title\n#project work on #project and #infra/net");
        assert_eq!(tags, vec!["project".to_string(), "infra/net".to_string()]);
    }

    #[test]
    fn target_index_resolves_by_stem_and_path() {
        let files = vec![
            VaultFile::from_path("a/Note.md"),
            VaultFile::from_path("img/pic.png"),
        ];
        let index = TargetIndex::build(&files);
        assert_eq!(index.resolve("note"), Some("a/Note.md".to_string()));
        assert_eq!(index.resolve("a/note"), Some("a/Note.md".to_string()));
        assert_eq!(index.resolve("a/Note.md"), Some("a/Note.md".to_string()));
        assert_eq!(index.resolve("pic.png"), Some("img/pic.png".to_string()));
        assert_eq!(index.resolve("missing"), None);
    }
}
