//! Graph Node and Edge Data Structures
//!
//! This module defines the plain-data records the derivation engine produces:
//! nodes, edges, spatial positions, and the `DerivedGraph` snapshot handed to
//! the rendering collaborator.
//!
//! # Architecture
//!
//! - **Plain data**: nodes and edges carry no runtime handles. Anything the
//!   rendering or physics layer injects (3D objects, live coordinates) lives
//!   in side-tables keyed by node id, never on these records.
//! - **Stable ids**: documents and attachments use their vault-relative path
//!   as id; synthesized tag nodes use a `tag:` namespaced id so they can
//!   never collide with a file path.
//! - **Whole-value snapshots**: a `DerivedGraph` is replaced atomically as a
//!   unit, never mutated in place after publication.
//!
//! # Examples
//!
//! ```rust
//! use vaultgraph_core::models::{GraphNode, NodeKind};
//!
//! let note = GraphNode::document(
//!     "projects/plan.md",
//!     "plan",
//!     vec!["project".to_string()],
//!     Some("# Plan\nShip the graph view".to_string()),
//! );
//! assert_eq!(note.kind, NodeKind::Document);
//! assert_eq!(note.filename.as_deref(), Some("plan.md"));
//!
//! let tag = GraphNode::tag("project");
//! assert_eq!(tag.id, "tag:project");
//! assert_eq!(tag.name, "#project");
//! ```

use serde::{Deserialize, Serialize};

/// Namespace prefix for synthesized tag node ids.
pub const TAG_ID_PREFIX: &str = "tag:";

/// Marker character shown before tag names.
pub const TAG_MARKER: char = '#';

/// Kind of a graph node. Immutable once the node is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A text note carrying content and tags.
    Document,
    /// A synthesized node representing one distinct tag name.
    Tag,
    /// A non-text vault file (image, PDF, ...).
    Attachment,
}

/// A single node of the derived graph.
///
/// # Fields
///
/// - `id`: unique stable identifier; vault-relative path for files,
///   `tag:<name>` for tag nodes
/// - `name`: display name (file base name, or `#`-prefixed tag name)
/// - `filename`: original file name including extension; `None` for tags
/// - `kind`: document, tag, or attachment
/// - `tags`: ordered tag names (meaningful for documents only)
/// - `content`: full text (documents only; used for search matching)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique stable identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Original file name including extension (absent for tag nodes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Node kind
    pub kind: NodeKind,

    /// Ordered tag names carried by this node
    #[serde(default)]
    pub tags: Vec<String>,

    /// Full text content (documents only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl GraphNode {
    /// Create a document node from a vault-relative path.
    ///
    /// The `filename` field is derived from the last path segment.
    pub fn document(
        id: impl Into<String>,
        name: impl Into<String>,
        tags: Vec<String>,
        content: Option<String>,
    ) -> Self {
        let id = id.into();
        let filename = last_segment(&id);
        Self {
            id,
            name: name.into(),
            filename,
            kind: NodeKind::Document,
            tags,
            content,
        }
    }

    /// Create an attachment node from a vault-relative path.
    ///
    /// Attachments never carry tags or content.
    pub fn attachment(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let filename = last_segment(&id);
        Self {
            id,
            name: name.into(),
            filename,
            kind: NodeKind::Attachment,
            tags: Vec::new(),
            content: None,
        }
    }

    /// Create a synthesized tag node for a distinct tag name.
    ///
    /// The id is namespaced (`tag:<name>`) and the display name carries the
    /// tag marker (`#<name>`).
    pub fn tag(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        Self {
            id: format!("{TAG_ID_PREFIX}{name}"),
            name: format!("{TAG_MARKER}{name}"),
            filename: None,
            kind: NodeKind::Tag,
            tags: Vec::new(),
            content: None,
        }
    }

    /// Whether this node is a synthesized tag node.
    pub fn is_tag(&self) -> bool {
        self.kind == NodeKind::Tag
    }
}

fn last_segment(path: &str) -> Option<String> {
    path.rsplit('/').next().map(str::to_string)
}

/// A reference between two node ids, unordered semantics.
///
/// Both endpoints must exist in the node set of the same derivation stage;
/// stages drop edges referencing pruned nodes in the same pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether the edge is incident to the given node id.
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    /// The opposite endpoint, if the edge is incident to `id`.
    pub fn other_end(&self, id: &str) -> Option<&str> {
        if self.source == id {
            Some(&self.target)
        } else if self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// A 3-component spatial coordinate.
///
/// Positions live in a side-table owned by the position continuity manager
/// and written by it and the external physics simulation. The canonical
/// node record never carries one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// This position displaced by the given per-axis offsets.
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

/// The `{nodes, edges}` snapshot handed to the rendering collaborator.
///
/// Recomputed from scratch every update cycle as a pure function of
/// (corpus snapshot, view configuration) and swapped in atomically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DerivedGraph {
    /// An empty graph, the state before the first derivation.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a node with the given id is present.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Ids of all nodes adjacent to `id` in the edge set, in edge order.
    pub fn neighbor_ids<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges.iter().filter_map(move |edge| edge.other_end(id))
    }
}
