//! Graph Derivation Engine
//!
//! The eight-stage pipeline that turns (corpus snapshot, view configuration)
//! into a `{nodes, edges}` graph. Pure and synchronous: every suspension
//! point of an update cycle happens before this module runs.
//!
//! # Pipeline
//!
//! 1. Base nodes: every vault file, Document or Attachment by extension
//! 2. Base edges: resolved references with both endpoints present
//! 3. Tag materialization: one shared Tag node per distinct tag name, one
//!    deduplicated edge per document/tag pair (always materialized;
//!    visibility is decided in stage 7)
//! 4. Advanced filtering: positive rules OR-ed, then negative rules
//!    subtracted (negative always overrides)
//! 5. Search filtering with optional one-hop neighbor expansion over the
//!    stage-3 adjacency
//! 6. Edge re-projection after every narrowing stage
//! 7. Visibility: tags and attachments dropped per toggle
//! 8. Orphan pruning against the visible edge set
//!
//! Stages execute in this order with no feedback into earlier stages; the
//! pipeline only ever narrows, so a node pruned by stage 4 can never be
//! resurrected by stage 5's neighbor expansion.

use super::filter::rule_matches;
use crate::models::{
    DerivedGraph, FilterRule, GraphConfig, GraphEdge, GraphNode, NodeKind, SearchConfig,
};
use crate::vault::CorpusSnapshot;
use std::collections::{HashMap, HashSet};

/// Derive the graph for one corpus snapshot and one configuration snapshot.
///
/// Recomputes the node/edge set from scratch; positions are carried forward
/// separately by the continuity manager. An empty corpus yields an empty
/// graph, not an error.
pub fn derive(corpus: &CorpusSnapshot, config: &GraphConfig) -> DerivedGraph {
    let (mut nodes, mut edges) = build_base_graph(corpus);
    materialize_tags(&mut nodes, &mut edges);

    // Stage-3 edge set, kept for search neighbor expansion: expansion is
    // computed over the full corpus graph, not the narrowed one.
    let base_edges = edges.clone();

    apply_advanced_filters(&mut nodes, &config.filters);
    retain_valid_edges(&nodes, &mut edges);

    apply_search(&mut nodes, &base_edges, &config.search);
    retain_valid_edges(&nodes, &mut edges);

    apply_visibility(&mut nodes, config);
    retain_valid_edges(&nodes, &mut edges);

    if config.hide_orphans {
        prune_orphans(&mut nodes, &edges);
        retain_valid_edges(&nodes, &mut edges);
    }

    DerivedGraph { nodes, edges }
}

/// Stages 1-2: one node per vault file, one edge per resolved reference
/// whose endpoints both exist.
fn build_base_graph(corpus: &CorpusSnapshot) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let mut nodes = Vec::with_capacity(corpus.files.len());
    for file in &corpus.files {
        if file.is_markdown() {
            nodes.push(GraphNode::document(
                file.path.clone(),
                file.name.clone(),
                corpus.tags_for(&file.path),
                corpus.contents.get(&file.path).cloned(),
            ));
        } else {
            nodes.push(GraphNode::attachment(file.path.clone(), file.name.clone()));
        }
    }

    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut edges = Vec::new();
    for (source, targets) in &corpus.links {
        if !ids.contains(source.as_str()) {
            continue;
        }
        for target in targets {
            if ids.contains(target.as_str()) {
                edges.push(GraphEdge::new(source.clone(), target.clone()));
            }
        }
    }
    (nodes, edges)
}

/// Stage 3: synthesize one Tag node per distinct tag name corpus-wide and
/// one edge per document/tag pair.
///
/// Two documents sharing a tag reference the same Tag node. Duplicate tag
/// occurrences within a document collapse to a single edge.
fn materialize_tags(nodes: &mut Vec<GraphNode>, edges: &mut Vec<GraphEdge>) {
    let mut materialized: HashSet<String> = HashSet::new();
    let mut tag_nodes = Vec::new();

    for node in nodes.iter() {
        let mut linked: HashSet<&str> = HashSet::new();
        for tag in &node.tags {
            if !linked.insert(tag.as_str()) {
                continue;
            }
            let tag_node = GraphNode::tag(tag);
            if materialized.insert(tag_node.id.clone()) {
                tag_nodes.push(tag_node.clone());
            }
            edges.push(GraphEdge::new(node.id.clone(), tag_node.id));
        }
    }
    nodes.extend(tag_nodes);
}

/// Stage 4: OR across positive rules, then AND-NOT across negative rules.
fn apply_advanced_filters(nodes: &mut Vec<GraphNode>, rules: &[FilterRule]) {
    let positive: Vec<&FilterRule> = rules
        .iter()
        .filter(|r| !r.inverted && !r.is_inert())
        .collect();
    let negative: Vec<&FilterRule> = rules
        .iter()
        .filter(|r| r.inverted && !r.is_inert())
        .collect();
    if positive.is_empty() && negative.is_empty() {
        return;
    }

    nodes.retain(|node| {
        if !positive.is_empty() && !positive.iter().any(|rule| rule_matches(node, rule)) {
            return false;
        }
        !negative.iter().any(|rule| rule_matches(node, rule))
    });
}

/// Stage 5: case-insensitive substring search over name, id, and content,
/// optionally grown by one hop over the stage-3 adjacency.
///
/// Expansion candidates are limited to nodes still present, so earlier
/// prunes hold.
fn apply_search(nodes: &mut Vec<GraphNode>, base_edges: &[GraphEdge], search: &SearchConfig) {
    let query = search.query.trim().to_lowercase();
    if query.is_empty() {
        return;
    }

    let matched: HashSet<&str> = nodes
        .iter()
        .filter(|node| node_matches_search(node, &query))
        .map(|node| node.id.as_str())
        .collect();

    let mut retained: HashSet<&str> = matched.clone();
    if search.expand_neighbors {
        for edge in base_edges {
            if matched.contains(edge.source.as_str()) {
                retained.insert(edge.target.as_str());
            }
            if matched.contains(edge.target.as_str()) {
                retained.insert(edge.source.as_str());
            }
        }
    }

    let retained: HashSet<String> = retained.into_iter().map(str::to_string).collect();
    nodes.retain(|node| retained.contains(&node.id));
}

fn node_matches_search(node: &GraphNode, query: &str) -> bool {
    if node.name.to_lowercase().contains(query) {
        return true;
    }
    if !node.is_tag() && node.id.to_lowercase().contains(query) {
        return true;
    }
    node.content
        .as_deref()
        .is_some_and(|content| content.to_lowercase().contains(query))
}

/// Stage 7: tag and attachment visibility toggles. Documents always survive.
fn apply_visibility(nodes: &mut Vec<GraphNode>, config: &GraphConfig) {
    nodes.retain(|node| match node.kind {
        NodeKind::Document => true,
        NodeKind::Tag => config.show_tags,
        NodeKind::Attachment => config.show_attachments,
    });
}

/// Stage 8: drop nodes with zero incident edges in the visible edge set.
fn prune_orphans(nodes: &mut Vec<GraphNode>, edges: &[GraphEdge]) {
    let mut degree: HashMap<&str, usize> = HashMap::new();
    for edge in edges {
        *degree.entry(edge.source.as_str()).or_default() += 1;
        *degree.entry(edge.target.as_str()).or_default() += 1;
    }
    let connected: HashSet<&str> = degree.keys().copied().collect();
    nodes.retain(|node| connected.contains(node.id.as_str()));
}

/// Stage 6, applied after every narrowing stage: keep only edges whose both
/// endpoints remain.
fn retain_valid_edges(nodes: &[GraphNode], edges: &mut Vec<GraphEdge>) {
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    edges.retain(|edge| ids.contains(edge.source.as_str()) && ids.contains(edge.target.as_str()));
}
