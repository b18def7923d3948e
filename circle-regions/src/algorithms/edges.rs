// Rebuilding the arc edges of stale circles.

use std::f64::consts::TAU;

use super::intersections::{free_edge, invalidate_edge_cycles};
use crate::geometry::math::ccw_sweep;
use crate::model::{CircleId, EdgeId};
use crate::topology::edge::{FaceSlot, GraphEdge};
use crate::RegionEngine;

fn alloc_edge(g: &mut RegionEngine, edge: GraphEdge) -> EdgeId {
    match g.free_edges.pop() {
        Some(id) => {
            g.edges[id.index()] = Some(edge);
            id
        }
        None => {
            g.edges.push(Some(edge));
            EdgeId((g.edges.len() - 1) as u32)
        }
    }
}

/// Rebuilds the edges of one circle from its sorted vertices. Edge `i` keeps
/// its id across rebuilds; faces that used the old edges are invalidated.
pub(crate) fn rebuild_circle_edges(g: &mut RegionEngine, id: CircleId) {
    let old: Vec<EdgeId> = match g.record(id) {
        Some(rec) => rec.edges.clone(),
        None => return,
    };
    invalidate_edge_cycles(g, &old);

    let Some(rec) = g.record_mut(id) else {
        return;
    };
    rec.ensure_sorted();
    let n = rec.vertices.len();
    let specs: Vec<GraphEdge> = (0..n)
        .map(|i| {
            let from = rec.vertices[i];
            let to = rec.vertices[(i + 1) % n];
            let sweep = if n == 1 {
                TAU
            } else {
                ccw_sweep(from.angle, to.angle)
            };
            GraphEdge {
                circle: id,
                ordinal: i,
                node1: from.node,
                node2: to.node,
                start_angle: from.angle,
                sweep,
                inner: FaceSlot::Unset,
                outer: FaceSlot::Unset,
            }
        })
        .collect();

    let mut ids: Vec<EdgeId> = Vec::with_capacity(n);
    for (i, edge) in specs.into_iter().enumerate() {
        let eid = match old.get(i) {
            Some(&eid) => {
                g.edges[eid.index()] = Some(edge);
                eid
            }
            None => alloc_edge(g, edge),
        };
        ids.push(eid);
    }
    for &eid in old.iter().skip(n) {
        free_edge(g, eid);
    }
    if let Some(rec) = g.record_mut(id) {
        rec.edges = ids;
        rec.stale = false;
    }
}

/// Phase 3: rebuilds every circle still marked stale.
pub(crate) fn rebuild_stale_edges(g: &mut RegionEngine) -> usize {
    let stale: Vec<CircleId> = g
        .live_circles()
        .filter(|(_, rec)| rec.stale)
        .map(|(id, _)| id)
        .collect();
    for &id in &stale {
        rebuild_circle_edges(g, id);
    }
    stale.len()
}
