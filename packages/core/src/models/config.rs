//! View Configuration Snapshots
//!
//! This module defines the immutable configuration the derivation engine is a
//! pure function of, plus the patch type UI collaborators use to produce the
//! next snapshot.
//!
//! # Architecture
//!
//! - **Snapshot semantics**: the engine never holds a mutable settings
//!   reference. Each derivation receives one `GraphConfig` value; mutations
//!   go through `ConfigPatch`, which yields a new snapshot and exactly one
//!   refresh decision (`RefreshKind`).
//! - **Host persistence**: every type serializes as camelCase JSON so a host
//!   application can save and restore view settings verbatim.
//!
//! # Examples
//!
//! ```rust
//! use vaultgraph_core::models::{ConfigPatch, FilterRule, GraphConfig, RefreshKind};
//!
//! let config = GraphConfig::default();
//! let patch = ConfigPatch {
//!     filters: Some(vec![FilterRule::tag("#project")]),
//!     ..Default::default()
//! };
//! assert_eq!(patch.refresh_kind(), RefreshKind::Derive { reheat: false });
//!
//! let next = config.merged(&patch);
//! assert_eq!(next.filters.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// What a filter rule matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Match against the node id (vault-relative path).
    Path,
    /// Match against the node's tag list.
    Tag,
}

/// One structured advanced-filter rule.
///
/// A rule whose value is empty or whitespace-only is inert: it matches
/// nothing and excludes nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRule {
    pub kind: FilterKind,
    pub value: String,
    #[serde(default)]
    pub inverted: bool,
}

impl FilterRule {
    /// A positive path rule.
    pub fn path(value: impl Into<String>) -> Self {
        Self {
            kind: FilterKind::Path,
            value: value.into(),
            inverted: false,
        }
    }

    /// A positive tag rule.
    pub fn tag(value: impl Into<String>) -> Self {
        Self {
            kind: FilterKind::Tag,
            value: value.into(),
            inverted: false,
        }
    }

    /// This rule with inverted (exclusion) polarity.
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Whether the rule has no effective value.
    pub fn is_inert(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// One user-defined color group: first matching query wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorGroup {
    /// Query, prefix-dispatched on `path:`, `tag:`, `file:` (glob), else
    /// substring match against name/content.
    pub query: String,
    /// Hex color applied to matching nodes.
    pub color: String,
}

impl ColorGroup {
    pub fn new(query: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            color: color.into(),
        }
    }
}

/// Full-text search settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Case-insensitive substring matched against name, id, and content.
    pub query: String,
    /// Grow the match set by one adjacency hop over the full corpus graph.
    pub expand_neighbors: bool,
}

impl SearchConfig {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// Default display palette and visual scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    pub document_color: String,
    pub tag_color: String,
    pub attachment_color: String,
    pub highlight_color: String,
    pub link_color: String,
    /// Multiplier applied to degree-based node sizes.
    pub node_scale: f64,
    /// Base link stroke width.
    pub link_width: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            document_color: "#9aa7b8".to_string(),
            tag_color: "#7c9c6a".to_string(),
            attachment_color: "#b08a5e".to_string(),
            highlight_color: "#e8b749".to_string(),
            link_color: "#5c6370".to_string(),
            node_scale: 1.0,
            link_width: 1.0,
        }
    }
}

/// Physical force parameters forwarded to the simulation collaborator.
///
/// Changing any of these warrants a hot (re-energized) restart of the
/// simulation; the engine itself only carries the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForceConfig {
    pub center_strength: f64,
    pub repel_strength: f64,
    pub link_strength: f64,
    pub link_distance: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            center_strength: 0.05,
            repel_strength: 10.0,
            link_strength: 1.0,
            link_distance: 30.0,
        }
    }
}

/// The immutable view-configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphConfig {
    pub search: SearchConfig,
    pub filters: Vec<FilterRule>,
    pub show_tags: bool,
    pub show_attachments: bool,
    pub hide_orphans: bool,
    pub groups: Vec<ColorGroup>,
    pub display: DisplayConfig,
    pub force: ForceConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            filters: Vec::new(),
            show_tags: true,
            show_attachments: false,
            hide_orphans: false,
            groups: Vec::new(),
            display: DisplayConfig::default(),
            force: ForceConfig::default(),
        }
    }
}

impl GraphConfig {
    /// Produce the next snapshot with the patch's set fields replaced.
    pub fn merged(&self, patch: &ConfigPatch) -> Self {
        let mut next = self.clone();
        if let Some(search) = &patch.search {
            next.search = search.clone();
        }
        if let Some(filters) = &patch.filters {
            next.filters = filters.clone();
        }
        if let Some(show_tags) = patch.show_tags {
            next.show_tags = show_tags;
        }
        if let Some(show_attachments) = patch.show_attachments {
            next.show_attachments = show_attachments;
        }
        if let Some(hide_orphans) = patch.hide_orphans {
            next.hide_orphans = hide_orphans;
        }
        if let Some(groups) = &patch.groups {
            next.groups = groups.clone();
        }
        if let Some(display) = &patch.display {
            next.display = display.clone();
        }
        if let Some(force) = &patch.force {
            next.force = force.clone();
        }
        next
    }
}

/// Partial configuration update from a UI collaborator.
///
/// Each set field replaces the corresponding snapshot field wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub search: Option<SearchConfig>,
    pub filters: Option<Vec<FilterRule>>,
    pub show_tags: Option<bool>,
    pub show_attachments: Option<bool>,
    pub hide_orphans: Option<bool>,
    pub groups: Option<Vec<ColorGroup>>,
    pub display: Option<DisplayConfig>,
    pub force: Option<ForceConfig>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The single refresh decision this patch triggers.
    ///
    /// Derive-affecting fields dominate: a patch touching both filters and
    /// groups re-derives (which refreshes colors anyway). Force-parameter
    /// changes re-derive under the hot regime so the simulation re-energizes
    /// with the new constants.
    pub fn refresh_kind(&self) -> RefreshKind {
        let derives = self.search.is_some()
            || self.filters.is_some()
            || self.show_tags.is_some()
            || self.show_attachments.is_some()
            || self.hide_orphans.is_some();
        if derives || self.force.is_some() {
            RefreshKind::Derive {
                reheat: self.force.is_some(),
            }
        } else if self.groups.is_some() {
            RefreshKind::Colors
        } else if self.display.is_some() {
            RefreshKind::Display
        } else {
            RefreshKind::None
        }
    }
}

/// What a configuration change requires of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// Full re-derivation; `reheat` selects the hot regime.
    Derive { reheat: bool },
    /// Per-node color recomputation only.
    Colors,
    /// Display-only recomputation (sizes, edge styles).
    Display,
    /// No refresh needed.
    None,
}

/// Named physics tuning profile applied after a data swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationRegime {
    /// Full re-energize: first load, or force parameters changed.
    Hot,
    /// High damping: only filter/visibility changes, let new nodes settle
    /// without disturbing the existing layout.
    Cool,
}

impl SimulationRegime {
    pub fn tuning(&self) -> SimulationTuning {
        match self {
            SimulationRegime::Hot => SimulationTuning {
                alpha: 1.0,
                alpha_decay: 0.0228,
                velocity_decay: 0.4,
            },
            SimulationRegime::Cool => SimulationTuning {
                alpha: 0.3,
                alpha_decay: 0.05,
                velocity_decay: 0.8,
            },
        }
    }
}

/// Damping/decay constants consumed by the simulation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationTuning {
    pub alpha: f64,
    pub alpha_decay: f64,
    pub velocity_decay: f64,
}
