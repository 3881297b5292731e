use core::ops::{Index, IndexMut};
use ndarray::Array2;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;
pub use scan::*;
pub use shuffle::*;

mod scan;
mod shuffle;

pub trait MinefieldGenerator {
    fn generate(self, config: FieldConfig) -> MineLayout;
}

/// Where the mines are, before any cell exists. Always between 1x1 and
/// 255x255.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "Array2<bool>", try_from = "Array2<bool>")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, columns) = mine_mask.dim();
        let in_range = |n: usize| (1..=usize::from(Coord::MAX)).contains(&n);
        if !in_range(rows) || !in_range(columns) {
            return Err(GameError::InvalidBoardShape);
        }

        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        Ok(Self {
            mine_mask,
            // at most 255 * 255 cells
            mine_count: mine_count as CellCount,
        })
    }

    /// `size` is `(rows, columns)`; duplicate coordinates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask = Array2::from_elem(size.to_nd_index(), false);

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub(crate) fn empty(size: Coord2) -> Self {
        Self {
            mine_mask: Array2::from_elem(size.to_nd_index(), false),
            mine_count: 0,
        }
    }

    /// `(rows, columns)`.
    pub fn size(&self) -> Coord2 {
        shape_of(&self.mine_mask)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, columns) = self.size();
        mult(rows, columns)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Mine coordinates in row-major order.
    pub fn mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .filter_map(|((row, column), _)| {
                Some((Coord::try_from(row).ok()?, Coord::try_from(column).ok()?))
            })
    }

    pub(crate) fn place(&mut self, coords: Coord2) {
        if !self[coords] {
            self[coords] = true;
            self.mine_count += 1;
        }
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for MineLayout {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.mine_mask[coords.to_nd_index()]
    }
}

impl TryFrom<Array2<bool>> for MineLayout {
    type Error = GameError;

    fn try_from(mine_mask: Array2<bool>) -> Result<Self> {
        Self::from_mine_mask(mine_mask)
    }
}

impl From<MineLayout> for Array2<bool> {
    fn from(layout: MineLayout) -> Self {
        layout.mine_mask
    }
}

/// Turns a requested count into the number of mines to place.
///
/// Auto picks uniformly from `1..=total / 5 + 1`. Exact requests were already
/// capped by [`FieldConfig::new`].
pub(crate) fn resolve_mine_count(mines: MineCount, total: CellCount, rng: &mut SmallRng) -> CellCount {
    use rand::prelude::*;

    match mines {
        MineCount::Auto => {
            let count = rng.random_range(1..=total / 5 + 1);
            log::trace!("Auto mine count picked {} for {} cells", count, total);
            count.min(total)
        }
        MineCount::Exact(count) => count.min(total),
    }
}

/// Compares the placed count with the request, only a logic error can make them differ.
pub(crate) fn check_mine_count(layout: &MineLayout, expected: CellCount) {
    if layout.mine_count() != expected {
        log::warn!(
            "Generated minefield count mismatch, actual: {}, requested: {}",
            layout.mine_count(),
            expected
        );
    }
}
