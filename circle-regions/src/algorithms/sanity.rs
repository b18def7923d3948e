// Dry run of the pipeline over a circle set, for debugging inputs.

use crate::error::RegionError;
use crate::model::Circle;
use crate::RegionEngine;

/// Runs a fresh engine over `circles` and returns the number of regions.
/// Circles the engine rejects (duplicates, bad radii) are skipped the same
/// way `add_circle` skips them.
pub fn check_circles(circles: &[Circle]) -> Result<usize, RegionError> {
    let mut engine = RegionEngine::new();
    for c in circles {
        engine.add_circle(c.clone());
    }
    Ok(engine.compute_regions()?.len())
}
