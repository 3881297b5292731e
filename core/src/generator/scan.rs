use super::*;

/// Picks a random start position for every mine and walks forward, wrapping
/// at the end of the field, until it finds a position without a mine.
///
/// Always terminates since no more mines than cells are ever placed. Layouts
/// are not uniform when the field is dense: runs of mines attract the next
/// placement to the cell right after them.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanMinefieldGenerator {
    seed: u64,
}

impl ScanMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for ScanMinefieldGenerator {
    fn generate(self, config: FieldConfig) -> MineLayout {
        use rand::prelude::*;

        let config = config.clamped();
        let mut layout = MineLayout::empty(config.size());
        let total_cells = config.total_cells();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mines = resolve_mine_count(config.mines, total_cells, &mut rng);

        for _ in 0..mines {
            let start = rng.random_range(0..total_cells);
            let free = (0..total_cells)
                .map(|step| {
                    let index = (u32::from(start) + u32::from(step)) % u32::from(total_cells);
                    // below `total_cells`, so it fits
                    from_linear(index as CellCount, config.width)
                })
                .find(|&coords| !layout.contains_mine(coords));

            match free {
                Some(coords) => layout.place(coords),
                None => break,
            }
        }

        check_mine_count(&layout, mines);
        layout
    }
}
