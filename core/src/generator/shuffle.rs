use alloc::vec::Vec;

use super::*;

/// Partial Fisher–Yates shuffle over all positions, every layout with the
/// requested mine count is equally likely.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleMinefieldGenerator {
    seed: u64,
}

impl ShuffleMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for ShuffleMinefieldGenerator {
    fn generate(self, config: FieldConfig) -> MineLayout {
        use rand::prelude::*;

        let config = config.clamped();
        let mut layout = MineLayout::empty(config.size());
        let total_cells = config.total_cells();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mines = resolve_mine_count(config.mines, total_cells, &mut rng);

        let mut positions: Vec<CellCount> = (0..total_cells).collect();
        for i in 0..mines {
            let j = rng.random_range(i..total_cells);
            positions.swap(usize::from(i), usize::from(j));
            layout.place(from_linear(positions[usize::from(i)], config.width));
        }

        check_mine_count(&layout, mines);
        layout
    }
}
