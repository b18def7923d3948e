use std::collections::BTreeSet;

use crate::geometry::math::angle_around;
use crate::model::{Circle, CircleId, EdgeId, NodeId, Point};

/// A circle's local record of one node lying on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleVertex {
    pub node: NodeId,
    /// Polar angle of the node around the circle's center, in [0, 2π).
    pub angle: f64,
}

/// Engine-side state of one circle: geometry plus everything derived from it.
#[derive(Clone, Debug)]
pub struct CircleRecord {
    pub(crate) circle: Circle,
    pub(crate) vertices: Vec<CircleVertex>,
    pub(crate) sorted: bool,
    pub(crate) parents: BTreeSet<CircleId>,
    pub(crate) children: BTreeSet<CircleId>,
    // edges[i] runs from vertices[i] to vertices[(i + 1) % n]
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) stale: bool,
    // bumped on every geometry change; part of isolated-circle region keys
    pub(crate) revision: u32,
}

impl CircleRecord {
    pub(crate) fn new(circle: Circle) -> Self {
        CircleRecord {
            circle,
            vertices: Vec::new(),
            sorted: true,
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
            edges: Vec::new(),
            stale: true,
            revision: 0,
        }
    }

    pub fn circle(&self) -> &Circle {
        &self.circle
    }

    pub fn center(&self) -> Point {
        self.circle.center
    }

    pub fn radius(&self) -> f64 {
        self.circle.radius
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn parents(&self) -> &BTreeSet<CircleId> {
        &self.parents
    }

    pub fn children(&self) -> &BTreeSet<CircleId> {
        &self.children
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub(crate) fn has_vertex(&self, node: NodeId) -> bool {
        self.vertices.iter().any(|v| v.node == node)
    }

    /// Records `node` at `point` unless already present.
    pub(crate) fn add_vertex(&mut self, node: NodeId, point: Point) -> bool {
        if self.has_vertex(node) {
            return false;
        }
        let angle = angle_around(self.circle.center, point);
        self.vertices.push(CircleVertex { node, angle });
        self.sorted = false;
        true
    }

    pub(crate) fn remove_vertex(&mut self, node: NodeId) -> bool {
        let before = self.vertices.len();
        self.vertices.retain(|v| v.node != node);
        let removed = self.vertices.len() != before;
        if removed {
            self.sorted = false;
        }
        removed
    }

    /// Sorts vertices by angle if an add/remove invalidated the order.
    pub(crate) fn ensure_sorted(&mut self) {
        if self.sorted {
            return;
        }
        self.vertices
            .sort_by(|a, b| a.angle.total_cmp(&b.angle).then(a.node.cmp(&b.node)));
        self.sorted = true;
    }

    /// Ordinal of `node` in the sorted vertex list.
    pub(crate) fn vertex_position(&self, node: NodeId) -> Option<usize> {
        debug_assert!(self.sorted);
        self.vertices.iter().position(|v| v.node == node)
    }

    /// Drops containment links; the caller unlinks the other side.
    pub(crate) fn take_relations(&mut self) -> Vec<CircleId> {
        let mut out: Vec<CircleId> = self.parents.iter().copied().collect();
        out.extend(self.children.iter().copied());
        self.parents.clear();
        self.children.clear();
        out
    }

    pub(crate) fn set_geometry(&mut self, center: Point, radius: f64) {
        self.circle.center = center;
        self.circle.radius = radius;
        self.revision = self.revision.wrapping_add(1);
        self.stale = true;
    }
}
