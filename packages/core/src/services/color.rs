//! Color/Group Resolver
//!
//! Maps nodes and edges to display colors. Precedence for nodes: highlight
//! state, then the ordered group-rule list (first match wins), then the
//! per-kind default palette. Side-effect-free; callers apply the returned
//! values to presentation state.
//!
//! A matched rule whose color string fails validation is logged and
//! replaced by the kind default, so one bad rule cannot blank the graph.

use crate::models::{DisplayConfig, GraphConfig, GraphEdge, GraphNode, NodeKind};
use crate::utils::glob_match;
use std::collections::HashSet;

/// Resolved presentation values for one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub color: String,
    pub width: f64,
}

/// Stroke-width multiplier for highlighted edges.
const HIGHLIGHT_WIDTH_FACTOR: f64 = 2.0;

/// Resolve the display color for one node.
pub fn resolve_node_color(
    node: &GraphNode,
    highlight: &HashSet<String>,
    config: &GraphConfig,
) -> String {
    if highlight.contains(&node.id) {
        return config.display.highlight_color.clone();
    }

    for group in &config.groups {
        if !group_matches(node, &group.query) {
            continue;
        }
        if is_valid_hex_color(&group.color) {
            return group.color.clone();
        }
        tracing::warn!(
            query = %group.query,
            color = %group.color,
            "group color failed to parse, substituting kind default"
        );
        break;
    }

    kind_default(node.kind, &config.display).to_string()
}

/// Resolve color and stroke width for one edge.
///
/// An edge is highlighted when both endpoints are in the focus set; the
/// focus set already contains the focused node plus its one-hop neighbors,
/// so every edge incident to the focused node qualifies.
pub fn resolve_edge_style(
    edge: &GraphEdge,
    highlight: &HashSet<String>,
    config: &GraphConfig,
) -> EdgeStyle {
    if highlight.contains(&edge.source) && highlight.contains(&edge.target) {
        EdgeStyle {
            color: config.display.highlight_color.clone(),
            width: config.display.link_width * HIGHLIGHT_WIDTH_FACTOR,
        }
    } else {
        EdgeStyle {
            color: config.display.link_color.clone(),
            width: config.display.link_width,
        }
    }
}

fn kind_default(kind: NodeKind, display: &DisplayConfig) -> &str {
    match kind {
        NodeKind::Document => &display.document_color,
        NodeKind::Tag => &display.tag_color,
        NodeKind::Attachment => &display.attachment_color,
    }
}

/// Whether a group query matches a node.
///
/// Dispatch: `path:` prefix matches the start of the id (non-tag nodes);
/// `tag:` matches exactly against a tag node's name or a document's tag
/// list; `file:` matches the filename exactly or by `*`-glob; anything else
/// is a substring match against name or content. Case-insensitive
/// throughout.
pub fn group_matches(node: &GraphNode, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return false;
    }

    if let Some(path) = query.strip_prefix("path:") {
        let path = path.trim();
        return !path.is_empty()
            && node.kind != NodeKind::Tag
            && node.id.to_lowercase().starts_with(&path.to_lowercase());
    }

    if let Some(tag) = query.strip_prefix("tag:") {
        let wanted = tag.trim().trim_start_matches('#').to_lowercase();
        if wanted.is_empty() {
            return false;
        }
        return match node.kind {
            NodeKind::Tag => node.name.trim_start_matches('#').to_lowercase() == wanted,
            _ => node.tags.iter().any(|t| t.to_lowercase() == wanted),
        };
    }

    if let Some(file) = query.strip_prefix("file:") {
        let pattern = file.trim();
        if pattern.is_empty() || node.kind == NodeKind::Tag {
            return false;
        }
        return node
            .filename
            .as_deref()
            .is_some_and(|filename| glob_match(pattern, filename));
    }

    let needle = query.to_lowercase();
    node.name.to_lowercase().contains(&needle)
        || node
            .content
            .as_deref()
            .is_some_and(|content| content.to_lowercase().contains(&needle))
}

/// Accepts `#rgb` and `#rrggbb` hex colors.
pub fn is_valid_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
