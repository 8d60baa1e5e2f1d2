use core::fmt;
use serde::{Deserialize, Serialize};

pub const REGION_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RegionId {
    Alpha = 0,
    Bravo = 1,
    Charlie = 2,
}

impl RegionId {
    pub const ALL: [RegionId; REGION_COUNT] = [RegionId::Alpha, RegionId::Bravo, RegionId::Charlie];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(RegionId::Alpha),
            1 => Some(RegionId::Bravo),
            2 => Some(RegionId::Charlie),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RegionId::Alpha => "Alpha",
            RegionId::Bravo => "Bravo",
            RegionId::Charlie => "Charlie",
        };
        f.write_str(label)
    }
}

/// A coordinate local to one region's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A coordinate in the shared map space all regions are offset into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalPoint {
    pub x: u32,
    pub y: u32,
}

impl GlobalPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GlobalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One rectangular search area: a `width x height` cell grid placed at
/// `origin` in the shared map space. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    id: RegionId,
    width: u32,
    height: u32,
    origin: GlobalPoint,
}

impl Region {
    pub fn new(
        id: RegionId,
        width: u32,
        height: u32,
        origin: GlobalPoint,
    ) -> Result<Self, RegionError> {
        if width == 0 || height == 0 {
            return Err(RegionError::DegenerateGrid { id, width, height });
        }
        Ok(Self {
            id,
            width,
            height,
            origin,
        })
    }

    pub const fn id(&self) -> RegionId {
        self.id
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn origin(&self) -> GlobalPoint {
        self.origin
    }

    pub const fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    pub const fn to_global(&self, cell: Cell) -> GlobalPoint {
        GlobalPoint::new(cell.x + self.origin.x, cell.y + self.origin.y)
    }

    /// Enumerates every local cell of the grid in row-major order.
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.cell_count());
        for y in 0..self.height {
            for x in 0..self.width {
                cells.push(Cell::new(x, y));
            }
        }
        cells
    }
}

/// The fixed ordered table of search regions, indexed by [`RegionId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSet {
    regions: [Region; REGION_COUNT],
}

impl RegionSet {
    /// Builds the table, requiring each region to sit in its own id's slot.
    pub fn new(regions: [Region; REGION_COUNT]) -> Result<Self, RegionError> {
        for (index, region) in regions.iter().enumerate() {
            if region.id().index() != index {
                return Err(RegionError::MisplacedRegion {
                    expected: RegionId::ALL[index],
                    found: region.id(),
                });
            }
        }
        Ok(Self { regions })
    }

    pub fn get(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    DegenerateGrid {
        id: RegionId,
        width: u32,
        height: u32,
    },
    MisplacedRegion {
        expected: RegionId,
        found: RegionId,
    },
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionError::DegenerateGrid { id, width, height } => {
                write!(f, "region {id} has a degenerate {width}x{height} grid")
            }
            RegionError::MisplacedRegion { expected, found } => {
                write!(f, "expected region {expected} in its slot, found {found}")
            }
        }
    }
}

impl std::error::Error for RegionError {}

#[cfg(test)]
mod tests {
    use super::{Cell, GlobalPoint, Region, RegionError, RegionId, RegionSet};

    fn region(id: RegionId) -> Region {
        Region::new(id, 50, 50, GlobalPoint::new(130, 265)).expect("valid region")
    }

    #[test]
    fn index_roundtrip() {
        for (i, id) in RegionId::ALL.iter().enumerate() {
            assert_eq!(RegionId::from_index(i), Some(*id));
            assert_eq!(id.index(), i);
        }
        assert_eq!(RegionId::from_index(3), None);
    }

    #[test]
    fn global_coordinate_adds_origin() {
        let region = region(RegionId::Alpha);
        assert_eq!(
            region.to_global(Cell::new(3, 4)),
            GlobalPoint::new(133, 269)
        );
    }

    #[test]
    fn cells_cover_the_full_grid() {
        let region = Region::new(RegionId::Bravo, 4, 3, GlobalPoint::new(0, 0)).unwrap();
        let cells = region.cells();
        assert_eq!(cells.len(), 12);
        assert!(cells.contains(&Cell::new(3, 2)));
        assert!(region.contains(Cell::new(3, 2)));
        assert!(!region.contains(Cell::new(4, 0)));
    }

    #[test]
    fn zero_sized_region_is_rejected() {
        let result = Region::new(RegionId::Alpha, 0, 50, GlobalPoint::new(0, 0));
        assert!(matches!(result, Err(RegionError::DegenerateGrid { .. })));
    }

    #[test]
    fn region_set_rejects_misplaced_ids() {
        let result = RegionSet::new([
            region(RegionId::Alpha),
            region(RegionId::Charlie),
            region(RegionId::Bravo),
        ]);
        assert!(matches!(
            result,
            Err(RegionError::MisplacedRegion {
                expected: RegionId::Bravo,
                found: RegionId::Charlie,
            })
        ));
    }

    #[test]
    fn region_set_lookup_by_id() {
        let set = RegionSet::new([
            region(RegionId::Alpha),
            region(RegionId::Bravo),
            region(RegionId::Charlie),
        ])
        .expect("valid set");
        assert_eq!(set.get(RegionId::Bravo).id(), RegionId::Bravo);
        assert_eq!(set.iter().count(), 3);
    }
}
