use serde::{Deserialize, Serialize};

use crate::*;

/// Requested number of mines.
///
/// Serialises as a signed integer where any negative value asks for an
/// automatically chosen count.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum MineCount {
    #[default]
    Auto,
    Exact(CellCount),
}

impl MineCount {
    pub fn from_signed(count: i32) -> Self {
        if count < 0 {
            Self::Auto
        } else {
            Self::Exact(CellCount::try_from(count).unwrap_or(CellCount::MAX))
        }
    }

    pub fn to_signed(self) -> i32 {
        match self {
            Self::Auto => -1,
            Self::Exact(count) => count.into(),
        }
    }
}

impl From<i32> for MineCount {
    fn from(count: i32) -> Self {
        Self::from_signed(count)
    }
}

impl From<MineCount> for i32 {
    fn from(count: MineCount) -> Self {
        count.to_signed()
    }
}

/// Dimensions and mine count of a field, already clamped to something buildable.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: MineCount,
}

impl FieldConfig {
    /// Skips clamping. Generators still clamp before building anything.
    pub const fn new_unchecked(width: Coord, height: Coord, mines: MineCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    /// Zero sizes become 1, an exact mine count above the cell count becomes
    /// the cell count.
    pub fn new(width: Coord, height: Coord, mines: MineCount) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let total_cells = mult(width, height);
        let mines = match mines {
            MineCount::Exact(count) if count > total_cells => {
                log::warn!(
                    "Minefield already full, requested {} mines but only fits {}",
                    count,
                    total_cells
                );
                MineCount::Exact(total_cells)
            }
            mines => mines,
        };
        Self::new_unchecked(width, height, mines)
    }

    /// Same as [`FieldConfig::new`] for signed input: sizes below 1 become 1,
    /// sizes above the coordinate range saturate, negative mines mean auto.
    pub fn from_signed(width: i32, height: i32, mines: i32) -> Self {
        let clamp = |n: i32| Coord::try_from(n.clamp(1, Coord::MAX.into())).unwrap_or(Coord::MAX);
        Self::new(clamp(width), clamp(height), MineCount::from_signed(mines))
    }

    pub fn square(size: Coord, mines: MineCount) -> Self {
        Self::new(size, size, mines)
    }

    /// `(rows, columns)`.
    pub const fn size(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    /// Re-applies [`FieldConfig::new`] to a config that may have been built
    /// unchecked.
    pub fn clamped(self) -> Self {
        Self::new(self.width, self.height, self.mines)
    }
}
