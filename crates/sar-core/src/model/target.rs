use crate::model::region::{Cell, GlobalPoint, RegionId, RegionSet};
use core::fmt;
use serde::Serialize;

/// The hidden ground truth: which region holds the target and where inside
/// that region's grid it sits. Fixed at placement, replaced only by a full
/// session reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetLocation {
    pub region: RegionId,
    pub cell: Cell,
}

impl TargetLocation {
    pub const fn new(region: RegionId, cell: Cell) -> Self {
        Self { region, cell }
    }

    pub fn global(&self, regions: &RegionSet) -> GlobalPoint {
        regions.get(self.region).to_global(self.cell)
    }
}

impl fmt::Display for TargetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in Area {}", self.cell, self.region)
    }
}

#[cfg(test)]
mod tests {
    use super::TargetLocation;
    use crate::model::region::{Cell, GlobalPoint, Region, RegionId, RegionSet};

    #[test]
    fn global_position_uses_owning_region_offset() {
        let set = RegionSet::new([
            Region::new(RegionId::Alpha, 50, 50, GlobalPoint::new(130, 265)).unwrap(),
            Region::new(RegionId::Bravo, 50, 50, GlobalPoint::new(80, 255)).unwrap(),
            Region::new(RegionId::Charlie, 50, 50, GlobalPoint::new(105, 205)).unwrap(),
        ])
        .unwrap();

        let target = TargetLocation::new(RegionId::Bravo, Cell::new(3, 4));
        assert_eq!(target.global(&set), GlobalPoint::new(83, 259));
    }
}
