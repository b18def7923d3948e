// Face tracing over the rotation system of the arc graph.
//
// Every (edge, direction) pair is a half-edge leaving one node and arriving at
// another. Around each node the departing half-edges are sorted
// counter-clockwise by tangent direction, with tangent ties broken by signed
// curvature. Walking with the face on the left, the successor of a half-edge
// is the departure just clockwise of its reverse at the arrival node. Bounded
// faces come out counter-clockwise and the exterior of each component
// clockwise.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{RegionError, RegionErrorKind};
use crate::geometry::math::normalize_angle;
use crate::model::{CircleId, CycleId, Direction, EdgeId, NodeId};
use crate::topology::edge::{Cycle, FaceSlot, HalfEdge};
use crate::RegionEngine;

#[derive(Clone, Copy, Debug)]
struct Spoke {
    angle: f64,
    // signed: positive turns left
    curvature: f64,
    half: HalfEdge,
}

fn node_circles(g: &RegionEngine, node: NodeId) -> Vec<CircleId> {
    g.node(node).map(|n| n.circles().collect()).unwrap_or_default()
}

fn missing_next(g: &RegionEngine, node: NodeId) -> RegionError {
    RegionError::new(RegionErrorKind::MissingNextEdge { node }).implicating(node_circles(g, node))
}

/// Departing half-edges around `nid`, sorted counter-clockwise.
fn build_rotation(g: &RegionEngine, nid: NodeId) -> Result<Vec<Spoke>, RegionError> {
    let node = g.node(nid).ok_or_else(|| missing_next(g, nid))?;
    let mut spokes: Vec<Spoke> = Vec::with_capacity(node.circle_count() * 2);
    for group in node.groups() {
        let Some(&(ref_circle, ref_parity)) = group.members().first() else {
            continue;
        };
        let ref_rec = g.record(ref_circle).ok_or_else(|| missing_next(g, nid))?;
        let ref_pos = ref_rec
            .vertex_position(nid)
            .ok_or_else(|| missing_next(g, nid))?;
        // counter-clockwise tangent of the reference circle
        let ref_angle = ref_rec.vertices[ref_pos].angle + FRAC_PI_2;

        for &(circle, parity) in group.members() {
            let rec = g.record(circle).ok_or_else(|| missing_next(g, nid))?;
            let pos = rec.vertex_position(nid).ok_or_else(|| missing_next(g, nid))?;
            let n = rec.edges.len();
            if n == 0 {
                return Err(missing_next(g, nid));
            }
            let kappa = 1.0 / rec.radius();
            let flipped = (parity != ref_parity) as u32;
            let departures = [
                (HalfEdge::new(rec.edges[pos], Direction::Forward), 0, kappa),
                (HalfEdge::new(rec.edges[(pos + n - 1) % n], Direction::Backward), 1, -kappa),
            ];
            for (half, turn, curvature) in departures {
                let k = (flipped + turn) % 2;
                spokes.push(Spoke {
                    angle: normalize_angle(ref_angle + PI * k as f64),
                    curvature,
                    half,
                });
            }
        }
    }
    spokes.sort_by(|a, b| {
        a.angle
            .total_cmp(&b.angle)
            .then(a.curvature.total_cmp(&b.curvature))
    });
    for w in spokes.windows(2) {
        if w[0].angle.total_cmp(&w[1].angle) == Ordering::Equal
            && w[0].curvature.total_cmp(&w[1].curvature) == Ordering::Equal
        {
            return Err(RegionError::new(RegionErrorKind::UnsupportedTraversal { node: nid })
                .implicating(node_circles(g, nid)));
        }
    }
    Ok(spokes)
}

/// Cached rotations for one extraction run.
struct Rotations {
    by_node: HashMap<NodeId, Vec<Spoke>>,
}

impl Rotations {
    fn get(&mut self, g: &RegionEngine, nid: NodeId) -> Result<&[Spoke], RegionError> {
        if !self.by_node.contains_key(&nid) {
            let r = build_rotation(g, nid)?;
            self.by_node.insert(nid, r);
        }
        Ok(self.by_node.get(&nid).map(|v| v.as_slice()).unwrap_or(&[]))
    }
}

enum Step {
    Next(HalfEdge),
    /// The arrival node offers no other way out.
    DeadEnd(NodeId),
}

fn next_half_edge(
    g: &RegionEngine,
    rot: &mut Rotations,
    h: HalfEdge,
    from: NodeId,
) -> Result<Step, RegionError> {
    let edge = g
        .edges
        .get(h.edge.index())
        .and_then(|e| e.as_ref())
        .ok_or_else(|| missing_next(g, from))?;
    let at = edge.arrival(h.dir);
    let spokes = rot.get(g, at)?;
    if spokes.len() <= 2 {
        return Ok(Step::DeadEnd(at));
    }
    let twin = h.twin();
    let i = spokes
        .iter()
        .position(|s| s.half == twin)
        .ok_or_else(|| missing_next(g, at))?;
    Ok(Step::Next(spokes[(i + spokes.len() - 1) % spokes.len()].half))
}

fn slot_of(g: &RegionEngine, h: HalfEdge) -> FaceSlot {
    g.edges
        .get(h.edge.index())
        .and_then(|e| e.as_ref())
        .map(|e| e.slot(h.dir))
        .unwrap_or(FaceSlot::Unset)
}

fn set_slot(g: &mut RegionEngine, h: HalfEdge, slot: FaceSlot) {
    if let Some(Some(e)) = g.edges.get_mut(h.edge.index()) {
        *e.slot_mut(h.dir) = slot;
    }
}

fn circle_of(g: &RegionEngine, e: EdgeId) -> Option<CircleId> {
    g.edges.get(e.index()).and_then(|e| e.as_ref()).map(|e| e.circle)
}

/// Walks the face left of `start`, claiming each half-edge for `id`.
fn trace(
    g: &mut RegionEngine,
    rot: &mut Rotations,
    start: HalfEdge,
    id: CycleId,
) -> Result<Option<Vec<HalfEdge>>, RegionError> {
    let Some(start_node) = g
        .edges
        .get(start.edge.index())
        .and_then(|e| e.as_ref())
        .map(|e| e.departure(start.dir))
    else {
        return Ok(None);
    };
    set_slot(g, start, FaceSlot::Cycle(id));
    let mut steps = vec![start];
    let mut cur = start;
    let mut from = start_node;
    loop {
        let next = match next_half_edge(g, rot, cur, from)? {
            Step::Next(h) => h,
            Step::DeadEnd(at) if at == start_node => {
                // closed at its origin with no way around: no face on this side
                for h in &steps {
                    set_slot(g, *h, FaceSlot::Unset);
                }
                set_slot(g, start, FaceSlot::Empty);
                if slot_of(g, start.twin()) == FaceSlot::Unset {
                    set_slot(g, start.twin(), FaceSlot::Empty);
                }
                return Ok(None);
            }
            Step::DeadEnd(at) => {
                let implicated: Vec<CircleId> =
                    steps.iter().filter_map(|h| circle_of(g, h.edge)).collect();
                return Err(missing_next(g, at).implicating(implicated));
            }
        };
        if next == start {
            return Ok(Some(steps));
        }
        if slot_of(g, next) != FaceSlot::Unset {
            let mut implicated: Vec<CircleId> = circle_of(g, next.edge).into_iter().collect();
            implicated.extend(steps.iter().filter_map(|h| circle_of(g, h.edge)));
            return Err(RegionError::new(RegionErrorKind::DuplicateFaceSlot {
                edge: next.edge,
                direction: next.dir,
            })
            .implicating(implicated));
        }
        set_slot(g, next, FaceSlot::Cycle(id));
        steps.push(next);
        from = g
            .edges
            .get(cur.edge.index())
            .and_then(|e| e.as_ref())
            .map(|e| e.arrival(cur.dir))
            .unwrap_or(from);
        cur = next;
    }
}

/// Phase 4: traces every half-edge that has no face yet. Returns the new
/// cycle ids in creation order.
pub(crate) fn extract_cycles(g: &mut RegionEngine) -> Result<Vec<CycleId>, RegionError> {
    let mut rot = Rotations {
        by_node: HashMap::new(),
    };
    let mut created: Vec<CycleId> = Vec::new();
    for ei in 0..g.edges.len() {
        for dir in [Direction::Forward, Direction::Backward] {
            let start = HalfEdge::new(EdgeId(ei as u32), dir);
            match g.edges[ei].as_ref() {
                Some(e) if e.slot(dir) == FaceSlot::Unset => {}
                _ => continue,
            }
            let id = CycleId(g.next_cycle_id);
            g.next_cycle_id = g.next_cycle_id.wrapping_add(1);
            if let Some(steps) = trace(g, &mut rot, start, id)? {
                log::trace!("{}: {} steps from {}", id, steps.len(), start.edge);
                g.cycles.insert(id, Cycle { steps, region: None });
                created.push(id);
            }
        }
    }
    Ok(created)
}
