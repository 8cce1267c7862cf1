#![no_std]

extern crate alloc;

use alloc::collections::BTreeSet;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod snapshot;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const BEGINNER: Self = Self::new_unchecked(9, 9, 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked(16, 16, 40);
    pub const EXPERT: Self = Self::new_unchecked(30, 16, 99);

    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(width, height, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidSize);
        }
        if self.mines == 0 {
            return Err(GameError::NoMines);
        }
        if self.mines > self.total_cells() {
            return Err(GameError::TooManyMines {
                requested: self.mines,
                capacity: self.total_cells(),
            });
        }
        Ok(())
    }

    /// Board dimensions as `(rows, cols)`.
    pub const fn size(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::EXPERT
    }
}

/// The logic grid: where the mines are and how many surround every other cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    cells: Array2<LogicCell>,
    mines: BTreeSet<Coord2>,
}

impl MineLayout {
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mines = BTreeSet::new();
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfBounds { coords, size });
            }
            mines.insert(coords);
        }

        let layout = Self::from_mine_set(size, mines);
        layout.game_config().validate()?;
        Ok(layout)
    }

    /// Builds the logic grid, all coordinates must already be in bounds.
    pub(crate) fn from_mine_set(size: Coord2, mines: BTreeSet<Coord2>) -> Self {
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            if mines.contains(&coords) {
                LogicCell::Mine
            } else {
                let count = NeighborIter::new(coords, size)
                    .filter(|pos| mines.contains(pos))
                    .count();
                LogicCell::Count(count as u8)
            }
        });

        Self { cells, mines }
    }

    pub fn game_config(&self) -> GameConfig {
        let (height, width) = self.size();
        GameConfig {
            width,
            height,
            mines: self.mine_count(),
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds { coords, size })
        }
    }

    /// Dimensions as `(rows, cols)`.
    pub fn size(&self) -> Coord2 {
        types::grid_size(&self.cells)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mines.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count()
    }

    pub fn mines(&self) -> &BTreeSet<Coord2> {
        &self.mines
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine()
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = LogicCell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    /// Cells were marked as pressed, nothing was revealed yet.
    Staged,
    Revealed,
    /// A mine went off, the board now shows the final losing state.
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Staged => true,
            Revealed => true,
            HitMine => true,
        }
    }
}

/// Used to merge outcomes when several cells are opened by one gesture.
impl core::ops::BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Revealed, _) | (_, Revealed) => Revealed,
            (Staged, _) | (_, Staged) => Staged,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_empty_board() {
        assert_eq!(GameConfig::new(0, 5, 1), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new(5, 0, 1), Err(GameError::InvalidSize));
    }

    #[test]
    fn config_rejects_zero_mines() {
        let err = GameConfig::new(1, 1, 0).unwrap_err();

        assert_eq!(err, GameError::NoMines);
        assert!(err.is_configuration());
    }

    #[test]
    fn config_rejects_overfull_board() {
        assert_eq!(
            GameConfig::new(3, 3, 10),
            Err(GameError::TooManyMines {
                requested: 10,
                capacity: 9
            })
        );
        assert!(GameConfig::new(3, 3, 9).is_ok());
    }

    #[test]
    fn presets_are_valid() {
        for config in [
            GameConfig::BEGINNER,
            GameConfig::INTERMEDIATE,
            GameConfig::EXPERT,
        ] {
            config.validate().unwrap();
        }
        assert_eq!(GameConfig::default().size(), (16, 30));
    }

    #[test]
    fn one_by_two_board_counts_the_single_mine() {
        let layout = MineLayout::from_mine_coords((1, 2), &[(0, 0)]).unwrap();

        assert_eq!(layout[(0, 0)], LogicCell::Mine);
        assert_eq!(layout[(0, 1)], LogicCell::Count(1));
        assert_eq!(layout.safe_cell_count(), 1);
    }

    #[test]
    fn center_mine_surrounded_by_ones() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(1, 1)]).unwrap();

        for pos in NeighborIter::new((1, 1), (3, 3)) {
            assert_eq!(layout[pos], LogicCell::Count(1));
        }
    }

    #[test]
    fn out_of_bounds_mine_is_rejected() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::OutOfBounds {
                coords: (2, 0),
                size: (2, 2)
            })
        );
    }

    #[test]
    fn duplicate_mines_collapse() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0), (0, 0)]).unwrap();

        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout[(1, 1)], LogicCell::Count(1));
    }

    #[test]
    fn outcomes_merge_by_priority() {
        use RevealOutcome::*;

        assert_eq!(Revealed | HitMine, HitMine);
        assert_eq!(Staged | Revealed, Revealed);
        assert_eq!(NoChange | Staged, Staged);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
