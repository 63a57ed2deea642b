//! Integration tests for the Markdown directory vault
//!
//! Tests cover:
//! - File enumeration (ordering, hidden-entry skipping)
//! - Wikilink / Markdown-link extraction and resolution
//! - Inline tag extraction
//! - End-to-end derivation over a real directory tree

use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;
use vaultgraph_core::vault::{CorpusSnapshot, MarkdownVault, VaultError, VaultReader};
use vaultgraph_core::{GraphService, UpdateOptions, UpdateOutcome};

/// Test helper: lay out a small vault on disk.
fn create_test_vault() -> Result<TempDir> {
    let dir = TempDir::new()?;
    let root = dir.path();

    std::fs::write(
        root.join("a.md"),
        "Links to [[b]] and [a note](sub/c.md).\n\nWork on #project today.",
    )?;
    std::fs::write(root.join("b.md"), "# B\n\nSays hello to the world.")?;
    std::fs::create_dir(root.join("sub"))?;
    std::fs::write(root.join("sub/c.md"), "Back to [[a]]. Tagged #project #deep/dive.")?;
    std::fs::write(root.join("cover.png"), [0x89, 0x50, 0x4e, 0x47])?;

    // hidden entries must be skipped
    std::fs::create_dir(root.join(".config"))?;
    std::fs::write(root.join(".config/settings.md"), "[[a]]")?;
    std::fs::write(root.join(".hidden.md"), "[[b]]")?;

    Ok(dir)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =========================================================================
// Enumeration
// =========================================================================

#[tokio::test]
async fn enumeration_is_sorted_and_skips_hidden_entries() -> Result<()> {
    let dir = create_test_vault()?;
    let vault = MarkdownVault::new(dir.path());

    let files = vault.list_files().await?;
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["a.md", "b.md", "cover.png", "sub/c.md"]);
    Ok(())
}

#[tokio::test]
async fn missing_root_is_an_invalid_root_error() {
    let vault = MarkdownVault::new("/no/such/vault/root");
    let error = vault.list_files().await.unwrap_err();
    assert!(matches!(
        error.downcast_ref::<VaultError>(),
        Some(VaultError::InvalidRoot { .. })
    ));
}

// =========================================================================
// Link and tag extraction
// =========================================================================

#[tokio::test]
async fn links_resolve_by_stem_and_relative_path() -> Result<()> {
    let dir = create_test_vault()?;
    let vault = MarkdownVault::new(dir.path());

    let links = vault.resolved_links().await?.expect("index always built");
    let a_targets = &links["a.md"];
    assert!(a_targets.contains("b.md"), "wikilink by stem");
    assert!(a_targets.contains("sub/c.md"), "markdown link by path");

    let c_targets = &links["sub/c.md"];
    assert!(c_targets.contains("a.md"));

    // hidden files contribute no link sources
    assert!(!links.contains_key(".hidden.md"));
    Ok(())
}

#[tokio::test]
async fn unresolvable_targets_are_dropped() -> Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(
        dir.path().join("only.md"),
        "A [[missing note]] and an [external](https://example.com) link.",
    )?;
    let vault = MarkdownVault::new(dir.path());

    let links = vault.resolved_links().await?.unwrap();
    assert!(links.is_empty());
    Ok(())
}

#[tokio::test]
async fn inline_tags_are_extracted_in_order() -> Result<()> {
    let dir = create_test_vault()?;
    let vault = MarkdownVault::new(dir.path());

    assert_eq!(vault.tags_of("a.md").await?, vec!["project"]);
    assert_eq!(
        vault.tags_of("sub/c.md").await?,
        vec!["project", "deep/dive"]
    );
    assert!(vault.tags_of("b.md").await?.is_empty());
    Ok(())
}

// =========================================================================
// End to end
// =========================================================================

#[tokio::test]
async fn snapshot_reads_documents_eagerly() -> Result<()> {
    let dir = create_test_vault()?;
    let vault = MarkdownVault::new(dir.path());

    let snapshot = CorpusSnapshot::load(&vault).await?.unwrap();
    assert_eq!(snapshot.files.len(), 4);
    assert!(snapshot.contents["b.md"].contains("hello"));
    // attachments contribute no content
    assert!(!snapshot.contents.contains_key("cover.png"));
    assert_eq!(snapshot.tags_for("sub/c.md"), vec!["project", "deep/dive"]);
    Ok(())
}

#[tokio::test]
async fn service_derives_a_directory_vault() -> Result<()> {
    init_tracing();
    let dir = create_test_vault()?;
    let service = GraphService::new(Arc::new(MarkdownVault::new(dir.path())));

    let outcome = service.update_data(UpdateOptions::first_load()).await;
    // 3 documents + 2 distinct tags; attachment hidden by default
    assert!(matches!(outcome, UpdateOutcome::Updated { nodes: 5, .. }));

    let graph = service.graph().await;
    assert!(graph.contains_node("a.md"));
    assert!(graph.contains_node("tag:project"));
    assert!(graph.contains_node("tag:deep/dive"));
    assert!(!graph.contains_node("cover.png"));

    // the shared tag links both carrying documents
    let project_neighbors: Vec<&str> = graph.neighbor_ids("tag:project").collect();
    assert!(project_neighbors.contains(&"a.md"));
    assert!(project_neighbors.contains(&"sub/c.md"));
    Ok(())
}
