// Turning traced cycles and isolated circles into published regions.

use std::f64::consts::TAU;

use crate::geometry::math::{arc_signed_area, point_on_circle};
use crate::model::{
    Arc, CircleId, CycleId, Direction, NodeId, Point, Region, RegionKey, RegionKind,
};
use crate::topology::circle::CircleRecord;
use crate::topology::edge::HalfEdge;
use crate::RegionEngine;

fn node_point(g: &RegionEngine, id: NodeId) -> Option<Point> {
    g.node(id).map(|n| n.point())
}

fn arc_for_step(g: &RegionEngine, h: HalfEdge) -> Option<Arc> {
    let edge = g.edges.get(h.edge.index())?.as_ref()?;
    let rec = g.record(edge.circle)?;
    let p1 = node_point(g, edge.node1)?;
    let p2 = node_point(g, edge.node2)?;
    let a1 = edge.start_angle;
    let a2 = edge.start_angle + edge.sweep;
    let (start, end, start_angle, end_angle) = match h.dir {
        Direction::Forward => (p1, p2, a1, a2),
        Direction::Backward => (p2, p1, a2, a1),
    };
    Some(Arc {
        circle: edge.circle,
        center: rec.center(),
        radius: rec.radius(),
        start,
        end,
        start_angle,
        end_angle,
        clockwise: h.dir == Direction::Backward,
    })
}

/// Enclosed area of a closed arc loop; positive when counter-clockwise.
/// Chord terms are measured from the first arc's start so the result does not
/// depend on where the loop sits in the plane.
pub fn signed_area(arcs: &[Arc]) -> f64 {
    let Some(origin) = arcs.first().map(|a| a.start) else {
        return 0.0;
    };
    arcs.iter()
        .map(|a| arc_signed_area(origin, a.start, a.end, a.radius, a.sweep()))
        .sum()
}

/// Classifies one cycle. A cycle walked entirely backward runs along circle
/// exteriors: clockwise it is the outside boundary of a cluster, otherwise
/// it bounds a hole between circles.
pub(crate) fn region_for_cycle(g: &RegionEngine, id: CycleId, steps: &[HalfEdge]) -> Region {
    let arcs: Vec<Arc> = steps.iter().filter_map(|h| arc_for_step(g, *h)).collect();
    let area = signed_area(&arcs);
    let contour = steps.iter().all(|h| h.dir == Direction::Backward);
    let kind = if !contour {
        RegionKind::Region
    } else if area < 0.0 {
        RegionKind::OuterContour
    } else {
        RegionKind::InnerContour
    };
    Region {
        key: RegionKey::Cycle(id),
        kind,
        arcs,
        area: area.abs(),
    }
}

fn full_arc(id: CircleId, rec: &CircleRecord, clockwise: bool) -> Arc {
    let p = point_on_circle(rec.center(), rec.radius(), 0.0);
    let (start_angle, end_angle) = if clockwise { (TAU, 0.0) } else { (0.0, TAU) };
    Arc {
        circle: id,
        center: rec.center(),
        radius: rec.radius(),
        start: p,
        end: p,
        start_angle,
        end_angle,
        clockwise,
    }
}

/// Regions of a circle that touches no other circle: its interior, plus its
/// boundary as an outer contour when nothing contains it.
pub(crate) fn isolated_regions(id: CircleId, rec: &CircleRecord) -> Vec<Region> {
    let mut out = vec![Region {
        key: RegionKey::Circle {
            circle: id,
            revision: rec.revision,
            contour: false,
        },
        kind: RegionKind::Circle,
        arcs: vec![full_arc(id, rec, false)],
        area: rec.circle().area(),
    }];
    if rec.parents.is_empty() {
        out.push(Region {
            key: RegionKey::Circle {
                circle: id,
                revision: rec.revision,
                contour: true,
            },
            kind: RegionKind::OuterContour,
            arcs: vec![full_arc(id, rec, true)],
            area: rec.circle().area(),
        });
    }
    out
}

/// Phase 5 (classification half): fills in the region of every cycle that
/// does not have one yet.
pub(crate) fn classify_new_cycles(g: &mut RegionEngine, created: &[CycleId]) {
    for &id in created {
        let region = match g.cycles.get(&id) {
            Some(c) if c.region.is_none() => region_for_cycle(g, id, &c.steps),
            _ => continue,
        };
        if let Some(c) = g.cycles.get_mut(&id) {
            c.region = Some(region);
        }
    }
}

/// Current region list: traced faces in cycle order, then isolated circles.
pub(crate) fn collect_regions(g: &RegionEngine) -> Vec<Region> {
    let mut ids: Vec<CycleId> = g.cycles.keys().copied().collect();
    ids.sort_unstable();
    let mut out: Vec<Region> = ids
        .iter()
        .filter_map(|id| g.cycles.get(id).and_then(|c| c.region.clone()))
        .collect();
    for (id, rec) in g.live_circles() {
        if rec.vertex_count() == 0 {
            out.extend(isolated_regions(id, rec));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Circle;
    use std::f64::consts::PI;

    #[test]
    fn isolated_circle_yields_interior_and_contour() {
        let rec = CircleRecord::new(Circle::new(1.0, 2.0, 3.0));
        let regions = isolated_regions(CircleId(4), &rec);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].kind, RegionKind::Circle);
        assert_eq!(regions[1].kind, RegionKind::OuterContour);
        for r in &regions {
            assert!((r.area - 9.0 * PI).abs() < 1e-9);
        }
        assert!((signed_area(&regions[0].arcs) - 9.0 * PI).abs() < 1e-9);
        assert!((signed_area(&regions[1].arcs) + 9.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn nested_isolated_circle_has_no_contour() {
        let mut rec = CircleRecord::new(Circle::new(0.0, 0.0, 1.0));
        rec.parents.insert(CircleId(0));
        let regions = isolated_regions(CircleId(1), &rec);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, RegionKind::Circle);
    }
}
