// Purging stale topology and re-solving circle pairs.

use std::collections::HashSet;

use crate::error::{RegionError, RegionErrorKind};
use crate::geometry::intersect::{intersect_circles, CircleRelation, Tangency};
use crate::geometry::tolerance::grid_key;
use crate::model::{CircleId, CycleId, EdgeId, NodeId, Point};
use crate::topology::circle::CircleRecord;
use crate::topology::edge::FaceSlot;
use crate::topology::node::{GraphNode, PairKind};
use crate::RegionEngine;

/// Removes a cycle and clears every face slot it claimed.
pub(crate) fn invalidate_cycle(g: &mut RegionEngine, id: CycleId) {
    let Some(cycle) = g.cycles.remove(&id) else {
        return;
    };
    for step in cycle.steps {
        if let Some(Some(edge)) = g.edges.get_mut(step.edge.index()) {
            let slot = edge.slot_mut(step.dir);
            if slot.cycle() == Some(id) {
                *slot = FaceSlot::Unset;
            }
        }
    }
}

/// Invalidates the cycles on both sides of `edges`.
pub(crate) fn invalidate_edge_cycles(g: &mut RegionEngine, edges: &[EdgeId]) {
    let mut doomed: Vec<CycleId> = Vec::new();
    for eid in edges {
        if let Some(Some(edge)) = g.edges.get(eid.index()) {
            doomed.extend(edge.inner.cycle());
            doomed.extend(edge.outer.cycle());
        }
    }
    for c in doomed {
        invalidate_cycle(g, c);
    }
}

pub(crate) fn free_edge(g: &mut RegionEngine, id: EdgeId) {
    if let Some(slot) = g.edges.get_mut(id.index()) {
        if slot.take().is_some() {
            g.free_edges.push(id);
        }
    }
}

fn free_node(g: &mut RegionEngine, id: NodeId) {
    if let Some(node) = g.nodes.get_mut(id.index()).and_then(|n| n.take()) {
        g.node_index.remove(&grid_key(node.point.x, node.point.y));
        g.free_nodes.push(id);
    }
}

/// Detaches `id` from containment links and from every node it lies on. Nodes
/// left with fewer than two circles are dropped and the circles still on them
/// become stale.
fn detach(g: &mut RegionEngine, id: CircleId, rec: &mut CircleRecord) {
    for other in rec.take_relations() {
        if let Some(o) = g.record_mut(other) {
            o.parents.remove(&id);
            o.children.remove(&id);
        }
    }
    let nodes: Vec<NodeId> = rec.vertices.iter().map(|v| v.node).collect();
    rec.vertices.clear();
    rec.sorted = true;
    for nid in nodes {
        let Some(node) = g.nodes.get_mut(nid.index()).and_then(|n| n.as_mut()) else {
            continue;
        };
        node.remove_circle(id);
        if node.is_valid() {
            continue;
        }
        let rest: Vec<CircleId> = node.circles().collect();
        for c in rest {
            if let Some(r) = g.record_mut(c) {
                r.remove_vertex(nid);
                r.stale = true;
            }
        }
        free_node(g, nid);
    }
}

/// Phase 1. Returns the circles whose pairs must be solved again.
pub(crate) fn purge_stale(g: &mut RegionEngine) -> Vec<CircleId> {
    // circles staled below only lose vertices; their pairs stay valid
    let moved: Vec<CircleId> = g
        .live_circles()
        .filter(|(_, rec)| rec.stale)
        .map(|(id, _)| id)
        .collect();

    let removed = std::mem::take(&mut g.dirty.removed);
    for (id, mut rec) in removed {
        detach(g, id, &mut rec);
        invalidate_edge_cycles(g, &rec.edges);
        for eid in rec.edges.drain(..) {
            free_edge(g, eid);
        }
    }

    for &id in &moved {
        let Some(mut rec) = g.circles.get_mut(id.index()).and_then(|c| c.take()) else {
            continue;
        };
        detach(g, id, &mut rec);
        g.circles[id.index()] = Some(rec);
    }
    moved
}

fn alloc_node(g: &mut RegionEngine, point: Point) -> NodeId {
    let node = GraphNode::new(point);
    match g.free_nodes.pop() {
        Some(id) => {
            g.nodes[id.index()] = Some(node);
            id
        }
        None => {
            g.nodes.push(Some(node));
            NodeId((g.nodes.len() - 1) as u32)
        }
    }
}

/// Merges the pair into the node at `point`, creating it when no node sits at
/// that rounded location. When the node's membership or parities change every
/// circle on it becomes stale.
pub(crate) fn add_pair_to_node(
    g: &mut RegionEngine,
    a: CircleId,
    b: CircleId,
    point: Point,
    kind: PairKind,
) -> Result<(), RegionError> {
    let key = grid_key(point.x, point.y);
    let existing = g.node_index.get(&key).copied().filter(|id| g.node(*id).is_some());
    let nid = match existing {
        Some(id) => id,
        None => {
            let id = alloc_node(g, point);
            g.node_index.insert(key, id);
            id
        }
    };
    let (mut changed, at) = match g.nodes[nid.index()].as_mut() {
        Some(node) => {
            let changed = node.add_circle_pair(a, b, kind).map_err(|c| {
                RegionError::new(RegionErrorKind::MalformedTangency {
                    node: nid,
                    a: c.a,
                    b: c.b,
                })
                .implicating([a, b])
            })?;
            (changed, node.point)
        }
        None => return Ok(()),
    };
    for c in [a, b] {
        if let Some(rec) = g.record_mut(c) {
            changed |= rec.add_vertex(nid, at);
        }
    }
    if changed {
        let members: Vec<CircleId> = g.nodes[nid.index()]
            .as_ref()
            .map(|n| n.circles().collect())
            .unwrap_or_default();
        for c in members {
            if let Some(rec) = g.record_mut(c) {
                rec.stale = true;
            }
        }
    }
    Ok(())
}

/// Phase 2: solves every pair with at least one moved circle.
pub(crate) fn solve_pairs(g: &mut RegionEngine, moved: &[CircleId]) -> Result<(), RegionError> {
    let is_moved: HashSet<CircleId> = moved.iter().copied().collect();
    let ids: Vec<CircleId> = g.live_circles().map(|(id, _)| id).collect();
    for &a in moved {
        for &b in &ids {
            // moved pairs once, in id order
            if a == b || (is_moved.contains(&b) && b < a) {
                continue;
            }
            let (Some(ra), Some(rb)) = (g.record(a), g.record(b)) else {
                continue;
            };
            match intersect_circles(ra.circle(), rb.circle()) {
                CircleRelation::Disjoint => {}
                CircleRelation::Coincident => {
                    log::warn!("{} and {} coincide; no topology between them", a, b);
                }
                CircleRelation::Contains => link_nested(g, a, b),
                CircleRelation::Inside => link_nested(g, b, a),
                CircleRelation::Tangent { point, kind } => {
                    let kind = match kind {
                        Tangency::Inner => PairKind::InnerTangent,
                        Tangency::Outer => PairKind::OuterTangent,
                    };
                    add_pair_to_node(g, a, b, point, kind)?;
                }
                CircleRelation::Lens(p, q) => {
                    add_pair_to_node(g, a, b, p, PairKind::Lens)?;
                    add_pair_to_node(g, a, b, q, PairKind::Lens)?;
                }
            }
        }
    }
    Ok(())
}

fn link_nested(g: &mut RegionEngine, outer: CircleId, inner: CircleId) {
    if let Some(r) = g.record_mut(outer) {
        r.children.insert(inner);
    }
    if let Some(r) = g.record_mut(inner) {
        r.parents.insert(outer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Circle;

    #[test]
    fn shared_point_reuses_node() {
        let mut g = RegionEngine::new();
        let a = g.add_circle(Circle::new(-1.0, 0.0, 1.0)).unwrap();
        let b = g.add_circle(Circle::new(1.0, 0.0, 1.0)).unwrap();
        let c = g.add_circle(Circle::new(0.0, 1.0, 1.0)).unwrap();
        add_pair_to_node(&mut g, a, b, Point::new(0.0, 0.0), PairKind::OuterTangent).unwrap();
        add_pair_to_node(&mut g, a, c, Point::new(1e-17, -1e-17), PairKind::Lens).unwrap();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.node(NodeId(0)).unwrap().circle_count(), 3);
        assert_eq!(g.record(c).unwrap().vertex_count(), 1);
    }

    #[test]
    fn contradictory_tangency_is_fatal() {
        let mut g = RegionEngine::new();
        let a = g.add_circle(Circle::new(-1.0, 0.0, 1.0)).unwrap();
        let b = g.add_circle(Circle::new(1.0, 0.0, 1.0)).unwrap();
        add_pair_to_node(&mut g, a, b, Point::new(0.0, 0.0), PairKind::OuterTangent).unwrap();
        let err = add_pair_to_node(&mut g, a, b, Point::new(0.0, 0.0), PairKind::InnerTangent)
            .unwrap_err();
        assert_eq!(
            err.kind,
            RegionErrorKind::MalformedTangency { node: NodeId(0), a, b }
        );
        assert_eq!(err.implicated, vec![a, b]);
    }

    #[test]
    fn dropping_a_node_stales_the_survivor() {
        let mut g = RegionEngine::new();
        g.add_circle(Circle::new(0.0, 0.0, 1.0)).unwrap();
        let b = g.add_circle(Circle::new(1.2, 0.0, 1.0)).unwrap();
        g.compute_regions().unwrap();
        assert!(!g.record(b).unwrap().is_stale());

        assert!(g.remove_circle(CircleId(0)));
        let moved = purge_stale(&mut g);
        assert!(moved.is_empty());
        assert_eq!(g.node_count(), 0);
        assert!(g.node_index.is_empty());
        assert!(g.record(b).unwrap().is_stale());
        assert_eq!(g.record(b).unwrap().vertex_count(), 0);
        // b's edges are still there until rebuilt; a's are gone with their faces
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.cycles.len(), 0);
    }
}
