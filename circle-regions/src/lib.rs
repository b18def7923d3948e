pub mod error;
pub mod model;
pub mod geometry {
    pub mod intersect;
    pub mod math;
    pub mod tolerance;
}
pub mod topology {
    pub mod circle;
    pub mod edge;
    pub mod node;
}
pub mod algorithms {
    pub mod classify;
    pub mod cycles;
    pub mod edges;
    pub mod incremental;
    pub mod intersections;
    pub mod sanity;
}

pub use algorithms::sanity::check_circles;
pub use error::{CircleSnapshot, RegionError, RegionErrorKind};
pub use geometry::tolerance::{precision, set_precision, Precision};
pub use model::{
    Arc, Circle, CircleId, CycleId, Direction, EdgeId, NodeId, Point, Region, RegionDiff,
    RegionKey, RegionKind,
};

use std::collections::{BTreeSet, HashMap};

use geometry::tolerance::approx_eq;
use topology::circle::CircleRecord;
use topology::edge::{Cycle, GraphEdge};
use topology::node::GraphNode;

/// Removals waiting for the next recomputation to unlink them.
#[derive(Clone, Debug, Default)]
pub struct DirtyState {
    pub(crate) removed: Vec<(CircleId, CircleRecord)>,
}

impl DirtyState {
    pub fn pending_removals(&self) -> usize {
        self.removed.len()
    }
}

/// Incremental planar subdivision of a set of circles.
///
/// Mutations only record what changed; `compute_regions` runs the
/// recomputation pipeline when something did and otherwise returns the cached
/// region list.
pub struct RegionEngine {
    pub(crate) circles: Vec<Option<CircleRecord>>, // id is index
    pub(crate) nodes: Vec<Option<GraphNode>>,      // id is index
    pub(crate) free_nodes: Vec<NodeId>,
    pub(crate) node_index: HashMap<(i64, i64), NodeId>, // rounded position -> node
    pub(crate) edges: Vec<Option<GraphEdge>>,           // id is index
    pub(crate) free_edges: Vec<EdgeId>,
    pub(crate) cycles: HashMap<CycleId, Cycle>,
    pub(crate) next_cycle_id: u32,
    pub(crate) regions: Vec<Region>,
    pub(crate) last_diff: RegionDiff,
    pub(crate) dirty: DirtyState,
    pub(crate) geom_ver: u64,
    // (geom_ver, precision digits) of the cached regions; None after a failure
    pub(crate) built: Option<(u64, u32)>,
}

impl Default for RegionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionEngine {
    pub fn new() -> Self {
        RegionEngine {
            circles: Vec::new(),
            nodes: Vec::new(),
            free_nodes: Vec::new(),
            node_index: HashMap::new(),
            edges: Vec::new(),
            free_edges: Vec::new(),
            cycles: HashMap::new(),
            next_cycle_id: 0,
            regions: Vec::new(),
            last_diff: RegionDiff::default(),
            dirty: DirtyState::default(),
            geom_ver: 0,
            built: Some((0, precision())),
        }
    }

    pub fn geom_version(&self) -> u64 {
        self.geom_ver
    }

    fn bump(&mut self) {
        self.geom_ver = self.geom_ver.wrapping_add(1);
    }

    // Circles
    /// Adds a circle. Returns None for non-finite input, a non-positive radius
    /// or a circle equal (at the current precision) to one already present.
    ///
    /// Ids are never reused: a removed circle leaves an empty slot, so an id
    /// (and any region key built from it) names one circle for the engine's
    /// whole lifetime. Per-run work is proportional to live circles, not slots.
    pub fn add_circle(&mut self, circle: Circle) -> Option<CircleId> {
        if !circle.is_valid() {
            log::warn!(
                "add_circle: rejected invalid circle at ({}, {}) r={}",
                circle.center.x,
                circle.center.y,
                circle.radius
            );
            return None;
        }
        if let Some(dup) = self.find_duplicate(&circle, None) {
            log::warn!("add_circle: duplicate of {}", dup);
            return None;
        }
        let id = CircleId(self.circles.len() as u32);
        self.circles.push(Some(CircleRecord::new(circle)));
        self.bump();
        Some(id)
    }

    pub fn remove_circle(&mut self, id: CircleId) -> bool {
        let Some(rec) = self.circles.get_mut(id.index()).and_then(|c| c.take()) else {
            log::warn!("remove_circle: unknown {}", id);
            return false;
        };
        self.dirty.removed.push((id, rec));
        self.bump();
        true
    }

    pub fn move_circle(&mut self, id: CircleId, x: f64, y: f64) -> bool {
        let Some(radius) = self.circle(id).map(|c| c.radius) else {
            log::warn!("move_circle: unknown {}", id);
            return false;
        };
        self.set_geometry(id, Point::new(x, y), radius)
    }

    pub fn resize_circle(&mut self, id: CircleId, radius: f64) -> bool {
        let Some(center) = self.circle(id).map(|c| c.center) else {
            log::warn!("resize_circle: unknown {}", id);
            return false;
        };
        self.set_geometry(id, center, radius)
    }

    fn set_geometry(&mut self, id: CircleId, center: Point, radius: f64) -> bool {
        let candidate = Circle {
            center,
            radius,
            label: None,
        };
        if !candidate.is_valid() {
            log::warn!("{}: rejected invalid geometry", id);
            return false;
        }
        if let Some(dup) = self.find_duplicate(&candidate, Some(id)) {
            log::warn!("{}: new geometry duplicates {}", id, dup);
            return false;
        }
        let Some(rec) = self.circles.get_mut(id.index()).and_then(|c| c.as_mut()) else {
            return false;
        };
        if rec.center() == center && rec.radius() == radius {
            return true;
        }
        rec.set_geometry(center, radius);
        self.bump();
        true
    }

    fn find_duplicate(&self, circle: &Circle, skip: Option<CircleId>) -> Option<CircleId> {
        self.live_circles()
            .filter(|(id, _)| Some(*id) != skip)
            .find(|(_, rec)| {
                approx_eq(rec.center().x, circle.center.x)
                    && approx_eq(rec.center().y, circle.center.y)
                    && approx_eq(rec.radius(), circle.radius)
            })
            .map(|(id, _)| id)
    }

    pub(crate) fn live_circles(&self) -> impl Iterator<Item = (CircleId, &CircleRecord)> + '_ {
        self.circles
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|rec| (CircleId(i as u32), rec)))
    }

    pub(crate) fn record(&self, id: CircleId) -> Option<&CircleRecord> {
        self.circles.get(id.index()).and_then(|c| c.as_ref())
    }

    pub(crate) fn record_mut(&mut self, id: CircleId) -> Option<&mut CircleRecord> {
        self.circles.get_mut(id.index()).and_then(|c| c.as_mut())
    }

    pub fn circle(&self, id: CircleId) -> Option<&Circle> {
        self.record(id).map(|r| r.circle())
    }

    pub fn circle_ids(&self) -> Vec<CircleId> {
        self.live_circles().map(|(id, _)| id).collect()
    }

    pub fn circle_count(&self) -> usize {
        self.live_circles().count()
    }

    /// Circles strictly containing `id`, as of the last recomputation.
    pub fn parents(&self, id: CircleId) -> Option<&BTreeSet<CircleId>> {
        self.record(id).map(|r| r.parents())
    }

    pub fn children(&self, id: CircleId) -> Option<&BTreeSet<CircleId>> {
        self.record(id).map(|r| r.children())
    }

    pub fn vertex_count(&self, id: CircleId) -> Option<usize> {
        self.record(id).map(|r| r.vertex_count())
    }

    // Graph snapshot
    pub fn nodes(&self) -> Vec<(NodeId, &GraphNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i as u32), n)))
            .collect()
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.index()).and_then(|n| n.as_ref())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    // Regions
    /// True when the cached regions no longer describe the circle set, either
    /// because something was edited or because the global precision changed.
    pub fn is_stale(&self) -> bool {
        self.built != Some((self.geom_ver, precision()))
    }

    pub fn compute_regions(&mut self) -> Result<&[Region], RegionError> {
        if self.is_stale() {
            algorithms::incremental::recompute(self)?;
        }
        Ok(&self.regions)
    }

    /// Regions from the last successful recomputation, without recomputing.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn last_diff(&self) -> &RegionDiff {
        &self.last_diff
    }

    pub(crate) fn snapshot(&self) -> Vec<CircleSnapshot> {
        self.live_circles()
            .map(|(id, rec)| CircleSnapshot {
                id,
                circle: rec.circle().clone(),
            })
            .collect()
    }

    /// Drops every derived structure and marks all circles for a full rebuild.
    pub(crate) fn reset_topology(&mut self) {
        self.nodes.clear();
        self.free_nodes.clear();
        self.node_index.clear();
        self.edges.clear();
        self.free_edges.clear();
        self.cycles.clear();
        self.dirty.removed.clear();
        for rec in self.circles.iter_mut().flatten() {
            rec.vertices.clear();
            rec.sorted = true;
            rec.edges.clear();
            rec.parents.clear();
            rec.children.clear();
            rec.stale = true;
        }
    }
}
