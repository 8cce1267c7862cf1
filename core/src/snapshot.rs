use alloc::collections::BTreeSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Point-in-time copy of everything a driver may want to show or log about a board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub config: GameConfig,
    pub status: GameStatus,
    pub mines_left: isize,
    pub triggered_mine: Option<Coord2>,
    pub cells: Array2<DisplayCell>,
    pub flagged: BTreeSet<Coord2>,
    pub hidden: BTreeSet<Coord2>,
}

impl BoardSnapshot {
    pub fn from_board<G>(board: &Board<G>) -> Self {
        Self {
            config: board.config(),
            status: board.status(),
            mines_left: board.mines_left(),
            triggered_mine: board.triggered_mine(),
            cells: board.display().to_owned(),
            flagged: board.flagged().clone(),
            hidden: board.hidden().clone(),
        }
    }
}

impl<G> Board<G> {
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_board(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tracks_flags_and_hidden_cells() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut board = Board::from_layout(layout).unwrap();
        board.toggle_flag((0, 0)).unwrap();
        board.reveal((1, 1)).unwrap();

        let snapshot = board.snapshot();

        assert_eq!(snapshot.status, GameStatus::Playing);
        assert_eq!(snapshot.mines_left, 0);
        assert_eq!(snapshot.flagged.iter().collect::<alloc::vec::Vec<_>>(), [&(0, 0)]);
        assert_eq!(snapshot.hidden.len(), 2);
        assert_eq!(snapshot.cells[[1, 1]], DisplayCell::Revealed(1));
    }

    #[test]
    fn snapshot_serializes_for_diagnostics() {
        let layout = MineLayout::from_mine_coords((1, 2), &[(0, 1)]).unwrap();
        let mut board = Board::from_layout(layout).unwrap();
        board.toggle_flag((0, 1)).unwrap();

        let json = serde_json::to_value(board.snapshot()).unwrap();

        assert_eq!(json["status"], "Playing");
        assert_eq!(json["flagged"], serde_json::json!([[0, 1]]));
        assert_eq!(json["hidden"], serde_json::json!([[0, 0]]));
        assert_eq!(json["config"]["width"], 2);
    }
}
