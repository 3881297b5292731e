use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldState {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl FieldState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn ends_game(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}

/// The grid of cells for one game.
///
/// Coordinates are `(row, column)`. `reveal`, `flag`, `mark`,
/// `clear_annotation` and `cell_symbol` treat coordinates outside the grid as
/// a no-op, [`Minefield::try_reveal`] reports them as errors.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Minefield {
    grid: Array2<Cell>,
    mine_count: CellCount,
    hidden_safe_count: CellCount,
    state: FieldState,
}

impl Minefield {
    /// Random layout seeded from the clock.
    pub fn new(config: FieldConfig) -> Self {
        Self::with_seed(config, clock_seed())
    }

    pub fn with_seed(config: FieldConfig, seed: u64) -> Self {
        Self::generate(config, ScanMinefieldGenerator::new(seed))
    }

    pub fn generate(config: FieldConfig, generator: impl MinefieldGenerator) -> Self {
        Self::from_layout(&generator.generate(config))
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.field_config())
    }

    /// Builds the cells for `layout`: each mine creates or bumps its
    /// neighbours, positions nobody touched are filled with zero-count cells.
    pub fn from_layout(layout: &MineLayout) -> Self {
        let size = layout.size();
        let mut slots: Array2<Option<Cell>> = Array2::from_elem(size.to_nd_index(), None);

        for coords in layout.mines() {
            slots[coords.to_nd_index()] = Some(Cell::mine());
            for neighbor in slots.iter_neighbors(coords) {
                slots[neighbor.to_nd_index()]
                    .get_or_insert_with(Cell::empty)
                    .increment_adjacent_mine_count();
            }
        }

        let grid = slots.mapv(|slot| slot.unwrap_or_else(Cell::empty));
        let field = Self {
            grid,
            mine_count: layout.mine_count(),
            hidden_safe_count: layout.safe_cell_count(),
            state: FieldState::InProgress,
        };
        log::debug!(
            "Minefield {}x{} built with {} mines",
            field.width(),
            field.height(),
            field.mine_count
        );
        field
    }

    /// `(rows, columns)`.
    pub fn size(&self) -> Coord2 {
        shape_of(&self.grid)
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// Safe cells the player still has to reveal.
    pub fn hidden_safe_count(&self) -> CellCount {
        self.hidden_safe_count
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, columns) = self.size();
        if coords.0 < rows && coords.1 < columns {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_symbol(&self, coords: Coord2) -> Option<Symbol> {
        self.grid.get(coords.to_nd_index()).map(Cell::symbol)
    }

    /// Returns whether this reveal ended the game, see [`Minefield::state`] for how.
    pub fn reveal(&mut self, coords: Coord2) -> bool {
        self.try_reveal(coords).is_ok_and(RevealOutcome::ends_game)
    }

    pub fn try_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }

        let cell = self.grid[coords.to_nd_index()];
        let changed = if !cell.is_mine() && cell.adjacent_mine_count() == 0 {
            self.expose_adjacent_empties(coords) > 0
        } else if !cell.is_revealed() {
            self.reveal_cell(coords);
            true
        } else {
            false
        };

        Ok(if cell.is_mine() {
            self.end_game(FieldState::Lost, coords);
            RevealOutcome::HitMine
        } else if self.hidden_safe_count == 0 {
            self.end_game(FieldState::Won, coords);
            RevealOutcome::Won
        } else if changed {
            RevealOutcome::Revealed
        } else {
            RevealOutcome::NoChange
        })
    }

    pub fn flag(&mut self, coords: Coord2) {
        if let Some(cell) = self.grid.get_mut(coords.to_nd_index()) {
            cell.flag();
            log::trace!("Flag at {:?}", coords);
        }
    }

    pub fn mark(&mut self, coords: Coord2) {
        if let Some(cell) = self.grid.get_mut(coords.to_nd_index()) {
            cell.mark();
            log::trace!("Mark at {:?}", coords);
        }
    }

    pub fn clear_annotation(&mut self, coords: Coord2) {
        if let Some(cell) = self.grid.get_mut(coords.to_nd_index()) {
            cell.clear_annotation();
            log::trace!("Clear annotation at {:?}", coords);
        }
    }

    /// Shows every cell, leaving state and counters alone.
    pub fn expose_all(&mut self) {
        self.grid.iter_mut().for_each(Cell::reveal);
    }

    /// Reveals the zero-count region around `start` plus its numbered border.
    /// Revealed cells act as the visited set. Returns how many cells were revealed.
    fn expose_adjacent_empties(&mut self, start: Coord2) -> usize {
        let mut revealed = 0;
        let mut to_visit = Vec::from([start]);

        while let Some(coords) = to_visit.pop() {
            let cell = self.grid[coords.to_nd_index()];
            if cell.is_revealed() {
                continue;
            }

            self.reveal_cell(coords);
            revealed += 1;

            if cell.adjacent_mine_count() == 0 {
                to_visit.extend(
                    self.grid
                        .iter_neighbors(coords)
                        .filter(|&pos| !self.grid[pos.to_nd_index()].is_revealed()),
                );
            }
        }

        log::trace!("Flood fill from {:?} revealed {} cells", start, revealed);
        revealed
    }

    fn reveal_cell(&mut self, coords: Coord2) {
        let cell = &mut self.grid[coords.to_nd_index()];
        if cell.is_revealed() {
            return;
        }
        cell.reveal();
        if !cell.is_mine() {
            self.hidden_safe_count = self.hidden_safe_count.saturating_sub(1);
        }
    }

    fn end_game(&mut self, state: FieldState, coords: Coord2) {
        if self.state.is_finished() {
            return;
        }
        log::debug!("Game ended {:?} by reveal at {:?}", state, coords);
        self.state = state;
    }

    #[cfg(test)]
    pub(crate) fn cell(&self, coords: Coord2) -> Cell {
        self.grid[coords.to_nd_index()]
    }
}

impl fmt::Display for Minefield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.rows() {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn clock_seed() -> u64 {
    use web_time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn field(size: Coord2, mines: &[Coord2]) -> Minefield {
        Minefield::from_layout(&MineLayout::from_mine_coords(size, mines).unwrap())
    }

    /// Every cell that is not on the 3x3 interior of a 5x5 field.
    fn ring_5x5() -> Vec<Coord2> {
        (0..5)
            .flat_map(|row| (0..5).map(move |column| (row, column)))
            .filter(|&(row, column)| row == 0 || row == 4 || column == 0 || column == 4)
            .collect()
    }

    fn assert_adjacency(field: &Minefield) {
        let (rows, columns) = field.size();
        for row in 0..rows {
            for column in 0..columns {
                let cell = field.cell((row, column));
                if cell.is_mine() {
                    continue;
                }
                let expected = NeighborIter::new((row, column), (rows, columns))
                    .filter(|&pos| field.cell(pos).is_mine())
                    .count();
                assert_eq!(usize::from(cell.adjacent_mine_count()), expected);
            }
        }
    }

    fn count_kind(field: &Minefield, mine: bool) -> usize {
        field.grid.iter().filter(|cell| cell.is_mine() == mine).count()
    }

    #[test]
    fn generated_fields_keep_mine_and_adjacency_invariants() {
        for size in 1..=9 {
            let total = mult(size, size);
            for mines in 0..=total + 1 {
                let config = FieldConfig::square(size, MineCount::Exact(mines));
                let field = Minefield::with_seed(config, u64::from(mines) ^ 0x5eed);
                let expected = mines.min(total);
                assert_eq!(field.mine_count(), expected);
                assert_eq!(count_kind(&field, true), usize::from(expected));
                assert_eq!(field.hidden_safe_count(), total - expected);
                assert_adjacency(&field);
            }
        }
    }

    #[test]
    fn shuffle_generated_fields_keep_adjacency() {
        for seed in 0..20 {
            let config = FieldConfig::new(12, 7, MineCount::Exact(25));
            let field = Minefield::generate(config, ShuffleMinefieldGenerator::new(seed));
            assert_eq!(count_kind(&field, true), 25);
            assert_adjacency(&field);
        }
    }

    #[test]
    fn auto_mine_count_fields_are_consistent() {
        for seed in 0..20 {
            let field = Minefield::with_seed(FieldConfig::square(16, MineCount::Auto), seed);
            assert!((1..=52).contains(&field.mine_count()));
            assert_eq!(count_kind(&field, true), usize::from(field.mine_count()));
            assert_adjacency(&field);
        }
    }

    #[test]
    fn single_empty_cell_wins_immediately() {
        let mut field = Minefield::with_seed(FieldConfig::from_signed(1, 1, 0), 3);
        assert_eq!(field.cell((0, 0)).adjacent_mine_count(), 0);

        assert!(field.reveal((0, 0)));
        assert_eq!(field.state(), FieldState::Won);
        assert_eq!(field.cell_symbol((0, 0)), Some(Symbol::Count(0)));
    }

    #[test]
    fn unchecked_zero_width_config_still_builds_a_column() {
        let config = FieldConfig::new_unchecked(0, 5, MineCount::Exact(3));
        let field = Minefield::generate(config, ScanMinefieldGenerator::new(1));
        assert_eq!((field.width(), field.height()), (1, 5));
        assert_eq!(field.mine_count(), 3);
        assert_eq!(field.hidden_safe_count(), 2);
        assert_adjacency(&field);
    }

    #[test]
    fn oversized_mask_is_rejected_before_building() {
        let mask = Array2::from_elem((300, 300), true);
        assert_eq!(
            MineLayout::from_mine_mask(mask),
            Err(GameError::InvalidBoardShape)
        );

        let layout = MineLayout::from_mine_mask(Array2::from_elem((255, 255), true)).unwrap();
        let field = Minefield::from_layout(&layout);
        assert_eq!(field.size(), (255, 255));
        assert_eq!(field.mine_count(), 65025);
        assert_eq!(field.hidden_safe_count(), 0);
    }

    #[test]
    fn degenerate_sizes_build_one_cell() {
        let field = Minefield::with_seed(FieldConfig::from_signed(-4, 0, 5), 1);
        assert_eq!(field.size(), (1, 1));
        assert_eq!(field.mine_count(), 1);
    }

    #[test]
    fn surrounded_center_wins_without_flood_fill() {
        let ring = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)];
        let mut field = field((3, 3), &ring);
        assert_eq!(field.cell((1, 1)).adjacent_mine_count(), 8);

        assert!(field.reveal((1, 1)));
        assert_eq!(field.state(), FieldState::Won);
        assert_eq!(field.to_string(), "---\n-8-\n---\n");
    }

    #[test]
    fn flood_fill_stops_at_mine_ring() {
        let mut field = field((5, 5), &ring_5x5());

        assert!(field.reveal((2, 2)));
        assert_eq!(field.state(), FieldState::Won);
        assert_eq!(
            field.to_string(),
            "-----\n\
             -535-\n\
             -303-\n\
             -535-\n\
             -----\n"
        );
    }

    #[test]
    fn flood_fill_reveals_zero_region_and_border_only() {
        // zero region in the top-left, mines along row 3 and column 3
        let mines = [(3, 0), (3, 1), (3, 2), (3, 3), (0, 3), (1, 3), (2, 3)];
        let mut field = field((5, 5), &mines);

        assert!(!field.reveal((0, 0)));
        assert_eq!(field.state(), FieldState::InProgress);
        assert_eq!(
            field.to_string(),
            "002--\n\
             003--\n\
             235--\n\
             -----\n\
             -----\n"
        );
        assert_eq!(field.hidden_safe_count(), 25 - 7 - 9);
    }

    #[test]
    fn flood_fill_matches_reachable_region() {
        for seed in 0..30 {
            let config = FieldConfig::new(14, 9, MineCount::Exact(12));
            let mut field = Minefield::with_seed(config, seed);
            let Some(start) = field
                .grid
                .indexed_iter()
                .find(|(_, cell)| !cell.is_mine() && cell.adjacent_mine_count() == 0)
                .map(|((row, column), _)| (row as Coord, column as Coord))
            else {
                continue;
            };

            let mut expected = Array2::from_elem(field.grid.dim(), false);
            let mut stack = Vec::from([start]);
            while let Some(pos) = stack.pop() {
                if core::mem::replace(&mut expected[pos.to_nd_index()], true) {
                    continue;
                }
                if field.cell(pos).adjacent_mine_count() == 0 {
                    stack.extend(field.grid.iter_neighbors(pos));
                }
            }

            field.reveal(start);
            for ((row, column), cell) in field.grid.indexed_iter() {
                let pos = (row as Coord, column as Coord);
                assert_eq!(cell.is_revealed(), expected[pos.to_nd_index()], "{pos:?}");
                assert!(!(cell.is_revealed() && cell.is_mine()));
            }
        }
    }

    #[test]
    fn hitting_mine_loses_and_expose_all_shows_layout() {
        let mut field = field((2, 2), &[(0, 0)]);

        assert_eq!(field.try_reveal((0, 0)), Ok(RevealOutcome::HitMine));
        assert_eq!(field.state(), FieldState::Lost);
        assert_eq!(field.to_string(), "b-\n--\n");

        field.expose_all();
        assert_eq!(field.to_string(), "b1\n11\n");
        assert_eq!(field.state(), FieldState::Lost);
        assert_eq!(field.hidden_safe_count(), 3);
    }

    #[test]
    fn finished_game_refuses_reveals() {
        let mut field = field((2, 2), &[(0, 0)]);
        assert!(field.reveal((0, 0)));

        assert_eq!(field.try_reveal((1, 1)), Err(GameError::AlreadyEnded));
        assert!(!field.reveal((1, 1)));
        assert_eq!(field.state(), FieldState::Lost);
        assert_eq!(field.cell_symbol((1, 1)), Some(Symbol::Unmarked));
    }

    #[test]
    fn loss_is_final_even_if_all_safe_cells_revealed() {
        let mut field = field((1, 2), &[(0, 0)]);
        field.expose_all();
        assert!(field.reveal((0, 0)));
        assert_eq!(field.state(), FieldState::Lost);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut field = field((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(field.try_reveal((0, 1)), Ok(RevealOutcome::Revealed));
        let after_first = field.hidden_safe_count();
        assert_eq!(field.try_reveal((0, 1)), Ok(RevealOutcome::NoChange));
        assert_eq!(field.hidden_safe_count(), after_first);
        assert_eq!(after_first, 6);
    }

    #[test]
    fn revealing_every_safe_cell_wins() {
        let mut field = field((2, 2), &[(0, 0)]);

        assert!(!field.reveal((0, 1)));
        assert!(!field.reveal((1, 0)));
        assert_eq!(field.state(), FieldState::InProgress);
        assert_eq!(field.try_reveal((1, 1)), Ok(RevealOutcome::Won));
        assert_eq!(field.state(), FieldState::Won);
        assert_eq!(field.hidden_safe_count(), 0);
    }

    #[test]
    fn out_of_bounds_is_a_no_op() {
        let mut field = field((2, 3), &[(0, 0)]);
        let before = field.clone();

        assert!(!field.reveal((2, 0)));
        assert!(!field.reveal((0, 3)));
        field.flag((5, 5));
        field.mark((2, 2));
        field.clear_annotation((0, 9));

        assert_eq!(field, before);
        assert_eq!(field.cell_symbol((2, 0)), None);
        assert_eq!(field.try_reveal((0, 3)), Err(GameError::InvalidCoords));
        assert_eq!(field.validate_coords((1, 2)), Ok((1, 2)));
    }

    #[test]
    fn annotations_cycle_without_touching_counts() {
        let mut field = field((2, 2), &[(0, 0)]);
        let before = field.cell((1, 1));

        field.flag((1, 1));
        assert_eq!(field.cell_symbol((1, 1)), Some(Symbol::Flagged));
        field.mark((1, 1));
        assert_eq!(field.cell_symbol((1, 1)), Some(Symbol::Questioned));
        field.clear_annotation((1, 1));
        assert_eq!(field.cell_symbol((1, 1)), Some(Symbol::Unmarked));

        assert_eq!(field.cell((1, 1)), before);
        assert_eq!(field.hidden_safe_count(), 3);
    }

    #[test]
    fn revealed_cells_ignore_later_annotations() {
        let mut field = field((2, 2), &[(0, 0)]);
        field.flag((1, 1));
        field.reveal((1, 1));
        assert_eq!(field.cell_symbol((1, 1)), Some(Symbol::Count(1)));
        field.mark((1, 1));
        assert_eq!(field.cell_symbol((1, 1)), Some(Symbol::Count(1)));
    }

    #[test]
    fn full_field_is_all_mines() {
        let field = Minefield::with_seed(FieldConfig::from_signed(4, 3, 100), 11);
        assert_eq!(field.mine_count(), 12);
        assert_eq!(count_kind(&field, false), 0);
        assert_eq!(field.hidden_safe_count(), 0);
        assert_eq!(field.state(), FieldState::InProgress);
    }

    #[test]
    fn non_square_fields_index_by_row_then_column() {
        let mut field = field((2, 4), &[(1, 3)]);
        assert_eq!((field.width(), field.height()), (4, 2));
        assert!(!field.reveal((0, 0)));
        assert_eq!(field.to_string(), "001-\n001-\n");
        assert_eq!(field.hidden_safe_count(), 1);
    }

    #[test]
    fn from_settings_uses_defaults() {
        let settings = Settings::new(5, 3).unwrap();
        let field = Minefield::from_settings(&settings);
        assert_eq!(field.size(), (5, 5));
        assert_eq!(field.mine_count(), 3);
    }
}
