use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board width and height must be positive")]
    InvalidSize,
    #[error("At least one mine is required")]
    NoMines,
    #[error("Too many mines, requested {requested} but only {capacity} cells")]
    TooManyMines {
        requested: CellCount,
        capacity: CellCount,
    },
    #[error("Coordinates {coords:?} are outside of a {size:?} board")]
    OutOfBounds { coords: Coord2, size: Coord2 },
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Generated layout does not match the board config")]
    LayoutMismatch,
}

impl GameError {
    /// Whether this error comes from an invalid board configuration.
    pub const fn is_configuration(self) -> bool {
        matches!(
            self,
            Self::InvalidSize
                | Self::NoMines
                | Self::TooManyMines { .. }
                | Self::LayoutMismatch
        )
    }
}

pub type Result<T> = core::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        assert!(GameError::NoMines.is_configuration());
        assert!(GameError::LayoutMismatch.is_configuration());
        assert!(!GameError::AlreadyEnded.is_configuration());
        assert!(
            !GameError::OutOfBounds {
                coords: (3, 0),
                size: (2, 2)
            }
            .is_configuration()
        );
    }
}
