//! Graph Service - Update Orchestration
//!
//! The boundary between the pure derivation core and its collaborators.
//! Owns the current derived graph, the position and color side-tables, and
//! the highlight focus set; enforces the re-entrancy guard; decides the
//! hot/cool simulation regime; and catches every derivation-stage failure
//! so nothing in this crate is fatal to the host.
//!
//! # Architecture
//!
//! - **One full entry point**: `update_data` re-derives everything and is
//!   idempotent, so external debounce strategies compose safely with it.
//! - **Cheap refreshes**: `update_colors` and `update_display` recompute
//!   presentation side-tables without re-deriving.
//! - **Reducer**: `apply_config` turns a partial settings change into a new
//!   config snapshot plus exactly one refresh decision.
//! - **Whole-value swaps**: the previous graph is never mutated in place; a
//!   consumer holding the prior `Arc` keeps a consistent view.
//!
//! # Concurrency
//!
//! Single-threaded cooperative model. The in-flight `AtomicBool` is checked
//! at entry and cleared at exit (success or failure) by a drop guard; a
//! trigger arriving mid-cycle is coalesced (dropped), never queued into
//! overlapping execution. No locking is needed for mutual exclusion beyond
//! the state `RwLock` that serializes swaps.

use super::color::{resolve_edge_style, resolve_node_color, EdgeStyle};
use super::continuity::PositionContinuity;
use super::derivation::derive;
use crate::models::{
    ConfigPatch, DerivedGraph, GraphConfig, Position, RefreshKind, SimulationRegime,
};
use crate::vault::{CorpusSnapshot, VaultReader};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Flags accepted by [`GraphService::update_data`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Reuse the last loaded corpus snapshot instead of re-reading the
    /// vault. Settings-only refreshes set this; corpus-change triggers
    /// must not.
    pub use_cache: bool,
    /// Force the hot regime (force parameters changed).
    pub reheat: bool,
    /// First derivation for this service instance; implies the hot regime.
    pub is_first_load: bool,
}

impl UpdateOptions {
    /// Options for the initial load.
    pub fn first_load() -> Self {
        Self {
            use_cache: false,
            reheat: false,
            is_first_load: true,
        }
    }

    /// Options for a corpus-change trigger (vault files changed).
    pub fn corpus_change() -> Self {
        Self::default()
    }

    /// Options for a settings-only refresh.
    pub fn settings_change() -> Self {
        Self {
            use_cache: true,
            reheat: false,
            is_first_load: false,
        }
    }
}

/// Result of one update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A new graph was derived and swapped in.
    Updated {
        regime: SimulationRegime,
        nodes: usize,
        edges: usize,
    },
    /// Derivation ran and produced zero nodes - a normal terminal state the
    /// host should surface as "no results", not an empty canvas.
    EmptyResult,
    /// The vault's link index is not built yet; no graph this cycle,
    /// retried on the next trigger.
    CorpusUnavailable,
    /// A vault or derivation failure was caught and logged; the previous
    /// graph (if any) remains displayed.
    NoData,
    /// Another cycle was in flight; this trigger was dropped.
    Coalesced,
}

/// Presentation side-tables derived from the current graph.
#[derive(Debug, Clone, Default)]
struct PresentationTables {
    colors: HashMap<String, String>,
    sizes: HashMap<String, f64>,
    edge_styles: Vec<EdgeStyle>,
}

/// Mutable state owned by the service between update cycles.
struct GraphState {
    graph: Arc<DerivedGraph>,
    derived: bool,
    continuity: PositionContinuity,
    highlight: HashSet<String>,
    presentation: PresentationTables,
}

impl GraphState {
    fn new() -> Self {
        Self {
            graph: Arc::new(DerivedGraph::empty()),
            derived: false,
            continuity: PositionContinuity::new(),
            highlight: HashSet::new(),
            presentation: PresentationTables::default(),
        }
    }

    fn refresh_colors(&mut self, config: &GraphConfig) {
        self.presentation.colors = self
            .graph
            .nodes
            .iter()
            .map(|node| {
                (
                    node.id.clone(),
                    resolve_node_color(node, &self.highlight, config),
                )
            })
            .collect();
    }

    fn refresh_display(&mut self, config: &GraphConfig) {
        let mut degree: HashMap<&str, usize> = HashMap::new();
        for edge in &self.graph.edges {
            *degree.entry(edge.source.as_str()).or_default() += 1;
            *degree.entry(edge.target.as_str()).or_default() += 1;
        }
        self.presentation.sizes = self
            .graph
            .nodes
            .iter()
            .map(|node| {
                let incident = degree.get(node.id.as_str()).copied().unwrap_or(0);
                (
                    node.id.clone(),
                    (1.0 + incident as f64) * config.display.node_scale,
                )
            })
            .collect();
        self.presentation.edge_styles = self
            .graph
            .edges
            .iter()
            .map(|edge| resolve_edge_style(edge, &self.highlight, config))
            .collect();
    }

    fn refresh_presentation(&mut self, config: &GraphConfig) {
        self.refresh_colors(config);
        self.refresh_display(config);
    }
}

/// Clears the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        // then (not then_some): constructing the guard eagerly would run
        // its Drop on the failure path and clear the running cycle's flag
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then(|| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The update-orchestration service.
pub struct GraphService {
    vault: Arc<dyn VaultReader>,
    config: RwLock<Arc<GraphConfig>>,
    state: RwLock<GraphState>,
    snapshot_cache: RwLock<Option<Arc<CorpusSnapshot>>>,
    in_flight: AtomicBool,
}

impl GraphService {
    pub fn new(vault: Arc<dyn VaultReader>) -> Self {
        Self::with_config(vault, GraphConfig::default())
    }

    pub fn with_config(vault: Arc<dyn VaultReader>, config: GraphConfig) -> Self {
        Self {
            vault,
            config: RwLock::new(Arc::new(config)),
            state: RwLock::new(GraphState::new()),
            snapshot_cache: RwLock::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run one full update cycle: load corpus, derive, carry positions,
    /// swap state, refresh presentation tables.
    ///
    /// Never returns an error: failures are logged and degrade to
    /// [`UpdateOutcome::NoData`] with the previous graph untouched.
    pub async fn update_data(&self, options: UpdateOptions) -> UpdateOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("update cycle already in flight, coalescing trigger");
            return UpdateOutcome::Coalesced;
        };

        match self.run_update(options).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(%error, "graph update failed, keeping previous graph");
                UpdateOutcome::NoData
            }
        }
    }

    async fn run_update(&self, options: UpdateOptions) -> anyhow::Result<UpdateOutcome> {
        let Some(snapshot) = self.load_snapshot(options.use_cache).await? else {
            tracing::warn!("link index not available yet, no graph this cycle");
            return Ok(UpdateOutcome::CorpusUnavailable);
        };

        let config = self.config().await;
        let graph = derive(&snapshot, &config);
        let nodes = graph.nodes.len();
        let edges = graph.edges.len();
        let regime = if options.is_first_load || options.reheat {
            SimulationRegime::Hot
        } else {
            SimulationRegime::Cool
        };

        {
            let mut state = self.state.write().await;
            state.continuity.carry_over(&graph);
            state.graph = Arc::new(graph);
            state.derived = true;
            state.refresh_presentation(&config);
        }

        if nodes == 0 {
            tracing::debug!("derivation produced an empty graph");
            Ok(UpdateOutcome::EmptyResult)
        } else {
            tracing::debug!(nodes, edges, ?regime, "graph updated");
            Ok(UpdateOutcome::Updated {
                regime,
                nodes,
                edges,
            })
        }
    }

    async fn load_snapshot(&self, use_cache: bool) -> anyhow::Result<Option<Arc<CorpusSnapshot>>> {
        if use_cache {
            if let Some(cached) = self.snapshot_cache.read().await.clone() {
                return Ok(Some(cached));
            }
        }
        match CorpusSnapshot::load(self.vault.as_ref()).await? {
            Some(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.snapshot_cache.write().await = Some(snapshot.clone());
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    /// Recompute per-node colors without re-deriving.
    pub async fn update_colors(&self) {
        let config = self.config().await;
        let mut state = self.state.write().await;
        state.refresh_colors(&config);
    }

    /// Recompute display-only values (sizes, edge styles) without
    /// re-deriving.
    pub async fn update_display(&self) {
        let config = self.config().await;
        let mut state = self.state.write().await;
        state.refresh_display(&config);
    }

    /// Apply a partial configuration change and trigger exactly one
    /// refresh decision.
    pub async fn apply_config(&self, patch: ConfigPatch) -> RefreshKind {
        let kind = patch.refresh_kind();
        {
            let mut config = self.config.write().await;
            *config = Arc::new(config.merged(&patch));
        }
        match kind {
            RefreshKind::Derive { reheat } => {
                let mut options = UpdateOptions::settings_change();
                options.reheat = reheat;
                self.update_data(options).await;
            }
            RefreshKind::Colors => self.update_colors().await,
            RefreshKind::Display => self.update_display().await,
            RefreshKind::None => {}
        }
        kind
    }

    /// Focus a node: the highlight set becomes the node plus its one-hop
    /// neighbors over the visible edge set, and colors/styles refresh.
    pub async fn set_highlight(&self, id: &str) {
        let config = self.config().await;
        let mut state = self.state.write().await;
        let mut focus = HashSet::new();
        if state.graph.contains_node(id) {
            focus.insert(id.to_string());
            let neighbors: Vec<String> = state
                .graph
                .neighbor_ids(id)
                .map(str::to_string)
                .collect();
            focus.extend(neighbors);
        }
        state.highlight = focus;
        state.refresh_presentation(&config);
    }

    /// Clear the highlight set and refresh colors/styles.
    pub async fn clear_highlight(&self) {
        let config = self.config().await;
        let mut state = self.state.write().await;
        state.highlight.clear();
        state.refresh_presentation(&config);
    }

    /// The current configuration snapshot.
    pub async fn config(&self) -> Arc<GraphConfig> {
        self.config.read().await.clone()
    }

    /// The current graph snapshot (empty before the first derivation).
    pub async fn graph(&self) -> Arc<DerivedGraph> {
        self.state.read().await.graph.clone()
    }

    /// Whether any derivation has completed yet.
    pub async fn has_derived(&self) -> bool {
        self.state.read().await.derived
    }

    /// Resolved color for a node, from the presentation side-table.
    pub async fn node_color(&self, id: &str) -> Option<String> {
        self.state.read().await.presentation.colors.get(id).cloned()
    }

    /// Degree-scaled display size for a node.
    pub async fn node_size(&self, id: &str) -> Option<f64> {
        self.state.read().await.presentation.sizes.get(id).copied()
    }

    /// Style for the edge at `index` in the current edge list.
    pub async fn edge_style(&self, index: usize) -> Option<EdgeStyle> {
        self.state
            .read()
            .await
            .presentation
            .edge_styles
            .get(index)
            .cloned()
    }

    /// Position of a node, if the continuity table knows one.
    pub async fn position(&self, id: &str) -> Option<Position> {
        self.state.read().await.continuity.position(id)
    }

    /// Record a position computed by the physics simulation.
    pub async fn set_position(&self, id: &str, position: Position) {
        self.state
            .write()
            .await
            .continuity
            .set_position(id, position);
    }
}
