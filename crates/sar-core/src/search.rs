//! Search-effectiveness sampling and the sweep procedure that decides
//! whether a pass over a region would have spotted the target.

use crate::model::region::{Cell, Region, RegionId};
use crate::model::target::TargetLocation;
use core::fmt;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashSet;

/// Bounds for the per-round uniform effectiveness draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectivenessRange {
    low: f64,
    high: f64,
}

impl EffectivenessRange {
    pub const DEFAULT_LOW: f64 = 0.2;
    pub const DEFAULT_HIGH: f64 = 0.9;

    pub fn new(low: f64, high: f64) -> Result<Self, EffectivenessRangeError> {
        if !low.is_finite() || !high.is_finite() || low < 0.0 || high > 1.0 || low > high {
            return Err(EffectivenessRangeError { low, high });
        }
        Ok(Self { low, high })
    }

    pub const fn low(&self) -> f64 {
        self.low
    }

    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Draws one effectiveness value, independent per call.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.low == self.high {
            return self.low;
        }
        rng.gen_range(self.low..=self.high)
    }
}

impl Default for EffectivenessRange {
    fn default() -> Self {
        Self {
            low: Self::DEFAULT_LOW,
            high: Self::DEFAULT_HIGH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectivenessRangeError {
    pub low: f64,
    pub high: f64,
}

impl fmt::Display for EffectivenessRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "effectiveness bounds [{}, {}] must satisfy 0 <= low <= high <= 1",
            self.low, self.high
        )
    }
}

impl std::error::Error for EffectivenessRangeError {}

/// Result of sweeping one region in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    Found(RegionId),
    NotFound,
}

impl SearchOutcome {
    pub const fn is_found(self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Found(region) => write!(f, "Found in Area {region}"),
            SearchOutcome::NotFound => f.write_str("Not Found"),
        }
    }
}

/// One pass over a region: the outcome plus the exact cells examined.
#[derive(Debug, Clone)]
pub struct Sweep {
    pub outcome: SearchOutcome,
    pub covered: HashSet<Cell>,
}

/// Decides detection for an explicit coverage set, independent of how the
/// set was produced.
pub fn detect(region: RegionId, covered: &HashSet<Cell>, target: &TargetLocation) -> SearchOutcome {
    if target.region == region && covered.contains(&target.cell) {
        SearchOutcome::Found(region)
    } else {
        SearchOutcome::NotFound
    }
}

/// Sweeps a region at the given effectiveness: every cell of the grid is
/// enumerated, shuffled, and the first `floor(count * effectiveness)` cells
/// are examined. Effectiveness 0 covers nothing, 1 covers the whole grid.
pub fn sweep_region<R: Rng + ?Sized>(
    region: &Region,
    effectiveness: f64,
    target: &TargetLocation,
    rng: &mut R,
) -> Sweep {
    let mut cells = region.cells();
    cells.shuffle(rng);

    let quota = ((cells.len() as f64) * effectiveness.clamp(0.0, 1.0)).floor() as usize;
    cells.truncate(quota);

    let covered: HashSet<Cell> = cells.into_iter().collect();
    let outcome = detect(region.id(), &covered, target);
    Sweep { outcome, covered }
}

/// Fraction of the region's cells examined by at least one of the sweeps.
/// This union ratio supersedes the sampled effectiveness when a region is
/// swept more than once in a round.
pub fn combined_effectiveness(region: &Region, sweeps: &[Sweep]) -> f64 {
    let mut union: HashSet<Cell> = HashSet::new();
    for sweep in sweeps {
        union.extend(sweep.covered.iter().copied());
    }
    union.len() as f64 / region.cell_count() as f64
}
