use serde::{Deserialize, Serialize};

/// Number of distinct tiles a driver has to be able to draw.
pub const TILE_COUNT: usize = 15;

/// Ground truth of a cell, fixed for the lifetime of a layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicCell {
    Mine,
    /// Number of mines among the in-bounds neighbors.
    Count(u8),
}

impl LogicCell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Count(0))
    }
}

impl Default for LogicCell {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayCell {
    Hidden,
    /// Held down by the pointer but not released yet.
    Pressed,
    Flagged,
    Revealed(u8),
    Mine,
    /// The mine that ended the game.
    MineExploded,
    /// A flag that turned out not to cover a mine.
    MineWrongFlag,
}

impl DisplayCell {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    /// Cells that still keep the game from being won.
    pub const fn is_unresolved(self) -> bool {
        matches!(self, Self::Hidden | Self::Pressed)
    }

    /// Position of this cell in the tile sheet:
    /// empty, one to eight, hidden, pressed, flag, mine, wrong flag, exploded.
    pub const fn tile_index(self) -> usize {
        match self {
            Self::Revealed(count) => count as usize,
            Self::Hidden => 9,
            Self::Pressed => 10,
            Self::Flagged => 11,
            Self::Mine => 12,
            Self::MineWrongFlag => 13,
            Self::MineExploded => 14,
        }
    }
}

impl Default for DisplayCell {
    fn default() -> Self {
        Self::Hidden
    }
}

/// What a cell shows once revealed.
impl From<LogicCell> for DisplayCell {
    fn from(cell: LogicCell) -> Self {
        match cell {
            LogicCell::Mine => Self::Mine,
            LogicCell::Count(count) => Self::Revealed(count),
        }
    }
}
