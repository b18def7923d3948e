// The five-phase recomputation pipeline.
//
// Only circles whose geometry changed are re-solved. Everything derived from
// them (nodes, edges, the cycles through those edges) is torn down and rebuilt;
// cycles that never touch a rebuilt edge survive with their ids and regions.

#[cfg(feature = "region_prof")]
use std::time::Instant;

use std::collections::HashSet;

use super::classify::{classify_new_cycles, collect_regions};
use super::cycles::extract_cycles;
use super::edges::rebuild_stale_edges;
use super::intersections::{purge_stale, solve_pairs};
use crate::error::{RegionError, RegionErrorKind};
use crate::geometry::tolerance::precision;
use crate::model::{RegionDiff, RegionKey, RegionKind};
use crate::RegionEngine;

/// Brings the cached regions up to date. On failure every derived structure
/// is dropped and the error carries a snapshot of the circle set.
pub(crate) fn recompute(g: &mut RegionEngine) -> Result<(), RegionError> {
    match run_pipeline(g) {
        Ok(()) => {
            g.built = Some((g.geom_ver, precision()));
            Ok(())
        }
        Err(e) => {
            let e = e.with_snapshot(g.snapshot());
            log::warn!("region recomputation failed: {}", e);
            g.reset_topology();
            g.regions.clear();
            g.last_diff = RegionDiff::default();
            g.built = None;
            Err(e)
        }
    }
}

fn run_pipeline(g: &mut RegionEngine) -> Result<(), RegionError> {
    #[cfg(feature = "region_prof")]
    let t_all = Instant::now();

    let digits = precision();
    if g.built.map(|(_, d)| d) != Some(digits) {
        log::debug!("precision is {} digits; rebuilding from scratch", digits);
        g.reset_topology();
    }

    #[cfg(feature = "region_prof")]
    let t_purge = Instant::now();
    let moved = purge_stale(g);
    #[cfg(feature = "region_prof")]
    let purge_ms = t_purge.elapsed().as_secs_f64() * 1000.0;

    #[cfg(feature = "region_prof")]
    let t_pairs = Instant::now();
    solve_pairs(g, &moved)?;
    #[cfg(feature = "region_prof")]
    let pairs_ms = t_pairs.elapsed().as_secs_f64() * 1000.0;

    #[cfg(feature = "region_prof")]
    let t_edges = Instant::now();
    let rebuilt = rebuild_stale_edges(g);
    #[cfg(feature = "region_prof")]
    let edges_ms = t_edges.elapsed().as_secs_f64() * 1000.0;

    #[cfg(feature = "region_prof")]
    let t_cycles = Instant::now();
    let created = extract_cycles(g)?;
    #[cfg(feature = "region_prof")]
    let cycles_ms = t_cycles.elapsed().as_secs_f64() * 1000.0;

    #[cfg(feature = "region_prof")]
    let t_publish = Instant::now();
    classify_new_cycles(g, &created);
    let regions = collect_regions(g);
    if g.circle_count() > 0 && !regions.iter().any(|r| r.kind == RegionKind::OuterContour) {
        return Err(RegionError::new(RegionErrorKind::MissingOuterContour).implicating(g.circle_ids()));
    }
    g.last_diff = diff_keys(&g.regions, &regions);
    g.regions = regions;
    #[cfg(feature = "region_prof")]
    let publish_ms = t_publish.elapsed().as_secs_f64() * 1000.0;

    log::debug!(
        "recompute: moved={} rebuilt={} nodes={} edges={} cycles={} new_cycles={} regions={} (+{} -{})",
        moved.len(),
        rebuilt,
        g.node_count(),
        g.edge_count(),
        g.cycles.len(),
        created.len(),
        g.regions.len(),
        g.last_diff.added.len(),
        g.last_diff.removed.len()
    );
    #[cfg(feature = "region_prof")]
    log::debug!(
        "regions_prof purge_ms={:.3} pairs_ms={:.3} edges_ms={:.3} cycles_ms={:.3} publish_ms={:.3} total_ms={:.3}",
        purge_ms,
        pairs_ms,
        edges_ms,
        cycles_ms,
        publish_ms,
        t_all.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn diff_keys(old: &[crate::model::Region], new: &[crate::model::Region]) -> RegionDiff {
    let before: HashSet<RegionKey> = old.iter().map(|r| r.key).collect();
    let after: HashSet<RegionKey> = new.iter().map(|r| r.key).collect();
    RegionDiff {
        added: new
            .iter()
            .map(|r| r.key)
            .filter(|k| !before.contains(k))
            .collect(),
        removed: old
            .iter()
            .map(|r| r.key)
            .filter(|k| !after.contains(k))
            .collect(),
    }
}
