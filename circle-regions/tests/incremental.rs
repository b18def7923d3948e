use circle_regions::{Circle, Region, RegionEngine, RegionKey, RegionKind};
use std::collections::HashSet;

fn summary(regions: &[Region]) -> Vec<(RegionKind, i64)> {
    let mut out: Vec<(RegionKind, i64)> = regions
        .iter()
        .map(|r| (r.kind, (r.area * 1e6).round() as i64))
        .collect();
    out.sort_by_key(|(k, a)| (*k as u8, *a));
    out
}

fn keys(regions: &[Region]) -> HashSet<RegionKey> {
    regions.iter().map(|r| r.key).collect()
}

#[test]
fn move_away_and_back_restores_regions() {
    let mut e = RegionEngine::new();
    e.add_circle(Circle::new(0.0, 0.0, 1.0)).unwrap();
    e.add_circle(Circle::new(1.2, 0.0, 1.0)).unwrap();
    let c = e.add_circle(Circle::new(0.6, 1.0, 0.8)).unwrap();
    let before = summary(e.compute_regions().unwrap());

    assert!(e.move_circle(c, 30.0, 30.0));
    assert!(e.is_stale());
    let away = summary(e.compute_regions().unwrap());
    assert_ne!(before, away);
    assert_eq!(away.iter().filter(|(k, _)| *k == RegionKind::OuterContour).count(), 2);

    assert!(e.move_circle(c, 0.6, 1.0));
    let back = summary(e.compute_regions().unwrap());
    assert_eq!(before, back);
}

#[test]
fn resize_across_topologies() {
    let mut e = RegionEngine::new();
    let a = e.add_circle(Circle::new(0.0, 0.0, 1.0)).unwrap();
    e.add_circle(Circle::new(3.0, 0.0, 1.0)).unwrap();
    assert_eq!(e.compute_regions().unwrap().len(), 4);

    // touching
    assert!(e.resize_circle(a, 2.0));
    assert_eq!(e.compute_regions().unwrap().len(), 3);
    assert_eq!(e.node_count(), 1);

    // crossing
    assert!(e.resize_circle(a, 2.5));
    assert_eq!(e.compute_regions().unwrap().len(), 4);
    assert_eq!(e.node_count(), 2);

    // swallowing
    assert!(e.resize_circle(a, 10.0));
    let regions = e.compute_regions().unwrap();
    assert_eq!(regions.len(), 3);
    assert_eq!(e.node_count(), 0);
    assert_eq!(e.edge_count(), 0);
    assert_eq!(e.cycle_count(), 0);
}

#[test]
fn removal_releases_graph() {
    let mut e = RegionEngine::new();
    let a = e.add_circle(Circle::new(0.0, 0.0, 1.0)).unwrap();
    let b = e.add_circle(Circle::new(1.0, 0.0, 1.0)).unwrap();
    e.add_circle(Circle::new(0.5, 0.8, 1.0)).unwrap();
    e.compute_regions().unwrap();
    assert!(e.remove_circle(a));
    assert!(e.remove_circle(b));
    let regions = e.compute_regions().unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(e.node_count(), 0);
    assert_eq!(e.edge_count(), 0);
    assert_eq!(e.circle_count(), 1);
}

#[test]
fn unrelated_edit_keeps_region_keys() {
    let mut e = RegionEngine::new();
    e.add_circle(Circle::new(0.0, 0.0, 1.0)).unwrap();
    e.add_circle(Circle::new(1.2, 0.0, 1.0)).unwrap();
    let before = keys(e.compute_regions().unwrap());

    let lone = e.add_circle(Circle::new(10.0, 10.0, 1.0)).unwrap();
    let after = keys(e.compute_regions().unwrap());
    assert!(before.is_subset(&after));
    assert_eq!(e.last_diff().added.len(), 2);
    assert!(e.last_diff().removed.is_empty());

    assert!(e.move_circle(lone, 12.0, 10.0));
    e.compute_regions().unwrap();
    // the isolated circle's keys carry its revision
    assert_eq!(e.last_diff().added.len(), 2);
    assert_eq!(e.last_diff().removed.len(), 2);
    assert!(before.is_subset(&keys(e.regions())));
}

#[test]
fn crossing_a_face_invalidates_it() {
    let mut e = RegionEngine::new();
    e.add_circle(Circle::new(0.0, 0.0, 1.0)).unwrap();
    e.add_circle(Circle::new(1.2, 0.0, 1.0)).unwrap();
    let before = keys(e.compute_regions().unwrap());
    e.add_circle(Circle::new(0.6, 0.9, 0.5)).unwrap();
    let after = keys(e.compute_regions().unwrap());
    assert!(before.is_disjoint(&after));
    let diff = e.last_diff().clone();
    assert_eq!(diff.removed.len(), before.len());
    assert_eq!(diff.added.len(), after.len());
}

#[test]
fn incremental_matches_fresh_engine() {
    let start = [
        (0.0, 0.0, 1.0),
        (1.1, 0.3, 0.9),
        (0.4, 1.2, 1.1),
        (-0.9, 0.6, 0.7),
        (2.5, 2.5, 0.5),
    ];
    let mut e = RegionEngine::new();
    let ids: Vec<_> = start
        .iter()
        .map(|&(x, y, r)| e.add_circle(Circle::new(x, y, r)).unwrap())
        .collect();
    e.compute_regions().unwrap();

    let moves = [(1, 0.2, -0.7), (4, 0.9, 0.8), (0, -0.3, 0.1), (3, 5.0, 5.0), (1, 1.0, 0.2)];
    let mut current = start.to_vec();
    for (i, x, y) in moves {
        assert!(e.move_circle(ids[i], x, y));
        current[i].0 = x;
        current[i].1 = y;
        let inc = summary(e.compute_regions().unwrap());

        let mut fresh = RegionEngine::new();
        for &(x, y, r) in &current {
            fresh.add_circle(Circle::new(x, y, r)).unwrap();
        }
        let full = summary(fresh.compute_regions().unwrap());
        assert_eq!(inc, full, "after moving circle {}", i);
        assert_eq!(e.node_count(), fresh.node_count());
        assert_eq!(e.edge_count(), fresh.edge_count());
    }
}
