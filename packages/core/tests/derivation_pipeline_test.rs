//! Integration tests for the graph derivation pipeline
//!
//! Tests cover:
//! - End-to-end derivation from an in-memory vault
//! - The documented filter/search/visibility/orphan scenarios
//! - Structural properties (no dangling edges, idempotence, base-graph
//!   equality with all narrowing disabled)

use anyhow::Result;
use vaultgraph_core::models::{FilterRule, GraphConfig, GraphEdge, SearchConfig};
use vaultgraph_core::services::derive;
use vaultgraph_core::vault::{CorpusSnapshot, MemoryVault};

/// Test helper: load a snapshot, asserting the index is available.
async fn snapshot(vault: &MemoryVault) -> Result<CorpusSnapshot> {
    Ok(CorpusSnapshot::load(vault)
        .await?
        .expect("memory vault index is always built"))
}

fn sorted_ids(graph: &vaultgraph_core::models::DerivedGraph) -> Vec<String> {
    let mut ids: Vec<String> = graph.nodes.iter().map(|n| n.id.clone()).collect();
    ids.sort();
    ids
}

// =========================================================================
// Documented scenarios
// =========================================================================

#[tokio::test]
async fn tagged_pair_scenario() -> Result<()> {
    // corpus = {doc A tagged "x", doc B tagged "x", A links to B}
    let vault = MemoryVault::new()
        .with_document("A.md", "")
        .with_tags("A.md", ["x"])
        .with_document("B.md", "")
        .with_tags("B.md", ["x"])
        .with_link("A.md", "B.md");

    let config = GraphConfig {
        show_tags: true,
        ..Default::default()
    };
    let graph = derive(&snapshot(&vault).await?, &config);

    assert_eq!(sorted_ids(&graph), vec!["A.md", "B.md", "tag:x"]);
    assert_eq!(graph.edges.len(), 3);
    assert!(graph.edges.contains(&GraphEdge::new("A.md", "B.md")));
    assert!(graph.edges.contains(&GraphEdge::new("A.md", "tag:x")));
    assert!(graph.edges.contains(&GraphEdge::new("B.md", "tag:x")));
    Ok(())
}

#[tokio::test]
async fn search_with_expansion_excludes_unconnected_nodes() -> Result<()> {
    // A contains the match; C has no match and no link to A
    let vault = MemoryVault::new()
        .with_document("A.md", "hello world")
        .with_document("C.md", "nothing here");

    let config = GraphConfig {
        search: SearchConfig {
            query: "hello".to_string(),
            expand_neighbors: true,
        },
        ..Default::default()
    };
    let graph = derive(&snapshot(&vault).await?, &config);
    assert_eq!(sorted_ids(&graph), vec!["A.md"]);
    Ok(())
}

#[tokio::test]
async fn zero_edge_document_is_pruned_under_hide_orphans() -> Result<()> {
    let vault = MemoryVault::new()
        .with_document("D.md", "isolated")
        .with_document("A.md", "")
        .with_document("B.md", "")
        .with_link("A.md", "B.md");

    let base = GraphConfig {
        hide_orphans: true,
        ..Default::default()
    };
    let with_search = GraphConfig {
        hide_orphans: true,
        search: SearchConfig {
            query: ".md".to_string(),
            expand_neighbors: false,
        },
        ..base.clone()
    };
    let with_attachments = GraphConfig {
        show_attachments: true,
        ..base.clone()
    };

    let snapshot = snapshot(&vault).await?;
    for config in [base, with_search, with_attachments] {
        let graph = derive(&snapshot, &config);
        assert!(
            !graph.contains_node("D.md"),
            "orphan D.md must be pruned regardless of other filters"
        );
    }
    Ok(())
}

#[tokio::test]
async fn inverted_project_tag_rule() -> Result<()> {
    let vault = MemoryVault::new()
        .with_document("E.md", "")
        .with_tags("E.md", ["project"])
        .with_document("F.md", "");

    let config = GraphConfig {
        filters: vec![FilterRule::tag("#project").inverted()],
        show_tags: false,
        ..Default::default()
    };
    let graph = derive(&snapshot(&vault).await?, &config);
    assert_eq!(sorted_ids(&graph), vec!["F.md"]);
    Ok(())
}

#[tokio::test]
async fn hidden_tag_edge_does_not_rescue_orphan() -> Result<()> {
    // D's only connection is a tag edge; hiding tags must orphan D
    let vault = MemoryVault::new()
        .with_document("D.md", "")
        .with_tags("D.md", ["x"])
        .with_document("A.md", "")
        .with_document("B.md", "")
        .with_link("A.md", "B.md");

    let config = GraphConfig {
        show_tags: false,
        hide_orphans: true,
        ..Default::default()
    };
    let graph = derive(&snapshot(&vault).await?, &config);
    assert_eq!(sorted_ids(&graph), vec!["A.md", "B.md"]);
    Ok(())
}

// =========================================================================
// Structural properties
// =========================================================================

#[tokio::test]
async fn disabled_narrowing_yields_full_base_graph() -> Result<()> {
    let vault = MemoryVault::new()
        .with_document("a.md", "alpha")
        .with_tags("a.md", ["x", "y"])
        .with_document("b.md", "beta")
        .with_tags("b.md", ["x"])
        .with_attachment("img/cover.png")
        .with_link("a.md", "b.md")
        .with_link("b.md", "img/cover.png");

    let config = GraphConfig {
        show_tags: true,
        show_attachments: true,
        hide_orphans: false,
        ..Default::default()
    };
    let graph = derive(&snapshot(&vault).await?, &config);

    // every file, plus one node per distinct tag
    assert_eq!(
        sorted_ids(&graph),
        vec!["a.md", "b.md", "img/cover.png", "tag:x", "tag:y"]
    );
    // two resolved links plus three document-tag edges
    assert_eq!(graph.edges.len(), 5);
    Ok(())
}

#[tokio::test]
async fn derivation_is_idempotent_end_to_end() -> Result<()> {
    let vault = MemoryVault::new()
        .with_document("a.md", "alpha")
        .with_tags("a.md", ["x"])
        .with_document("b.md", "beta")
        .with_link("a.md", "b.md");

    let config = GraphConfig {
        search: SearchConfig {
            query: "alpha".to_string(),
            expand_neighbors: true,
        },
        ..Default::default()
    };
    let first = derive(&snapshot(&vault).await?, &config);
    let second = derive(&snapshot(&vault).await?, &config);
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn no_dangling_edges_across_configurations() -> Result<()> {
    let vault = MemoryVault::new()
        .with_document("a.md", "hello")
        .with_tags("a.md", ["x"])
        .with_document("b.md", "")
        .with_tags("b.md", ["x", "y"])
        .with_attachment("c.png")
        .with_link("a.md", "b.md")
        .with_link("b.md", "c.png");

    let configs = vec![
        GraphConfig::default(),
        GraphConfig {
            show_tags: false,
            show_attachments: true,
            hide_orphans: true,
            ..Default::default()
        },
        GraphConfig {
            filters: vec![FilterRule::path("a"), FilterRule::tag("y").inverted()],
            search: SearchConfig {
                query: "hello".to_string(),
                expand_neighbors: true,
            },
            hide_orphans: true,
            ..Default::default()
        },
    ];

    let snapshot = snapshot(&vault).await?;
    for config in configs {
        let graph = derive(&snapshot, &config);
        for edge in &graph.edges {
            assert!(graph.contains_node(&edge.source), "dangling source");
            assert!(graph.contains_node(&edge.target), "dangling target");
        }
    }
    Ok(())
}
