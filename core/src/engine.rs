use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use hashbrown::HashSet;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
///
/// Only a restart leaves `Won` or `Lost`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Neighbor buffer, a cell never has more than 8.
pub type Neighbors = SmallVec<[Coord2; 8]>;

/// Pointer gesture between press and release.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PressState {
    #[default]
    Idle,
    /// A hidden cell is held down and will be revealed on release.
    Single(Coord2),
    /// The hidden neighbors of a numbered cell are held down.
    ///
    /// When `commit` is set the chord was already resolved on press, otherwise the staged cells go back to
    /// hidden on release.
    Chord { staged: Neighbors, commit: bool },
}

fn pending_cells(press: &PressState) -> &[Coord2] {
    match press {
        PressState::Idle => &[],
        PressState::Single(coords) => core::slice::from_ref(coords),
        PressState::Chord { staged, .. } => staged.as_slice(),
    }
}

/// The board engine: a fixed logic layout plus the display grid the player sees.
#[derive(Clone, Debug)]
pub struct Board<G = RandomMinefieldGenerator> {
    config: GameConfig,
    generator: G,
    layout: MineLayout,
    display: Array2<DisplayCell>,
    flagged: BTreeSet<Coord2>,
    hidden: BTreeSet<Coord2>,
    press: PressState,
    status: GameStatus,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// A board with uniformly random mines, every restart draws a fresh layout from the same seeded RNG.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_generator(config, RandomMinefieldGenerator::new(seed))
    }
}

impl Board<MineLayout> {
    /// A board with a predetermined layout, restarting replays the same layout.
    pub fn from_layout(layout: MineLayout) -> Result<Self> {
        let config = layout.game_config();
        Self::with_generator(config, layout)
    }
}

impl<G: MinefieldGenerator> Board<G> {
    pub fn with_generator(config: GameConfig, mut generator: G) -> Result<Self> {
        config.validate()?;
        let layout = generator.generate(config);
        if layout.game_config() != config {
            return Err(GameError::LayoutMismatch);
        }
        let mut board = Self {
            config,
            generator,
            display: Array2::default(layout.size().to_nd_index()),
            layout,
            flagged: BTreeSet::new(),
            hidden: BTreeSet::new(),
            press: PressState::Idle,
            status: GameStatus::Playing,
            triggered_mine: None,
        };
        board.reset_display();
        log::debug!("New {:?} board", config);
        Ok(board)
    }

    /// Throws away the current game and starts over with a new layout from the same generator.
    pub fn restart(&mut self) {
        self.layout = self.generator.generate(self.config);
        self.reset_display();
        log::debug!("Restarted {:?} board", self.config);
    }

    fn reset_display(&mut self) {
        let (rows, cols) = self.layout.size();
        self.display = Array2::default((rows, cols).to_nd_index());
        self.flagged.clear();
        self.hidden = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .collect();
        self.press = PressState::Idle;
        self.status = GameStatus::Playing;
        self.triggered_mine = None;
    }
}

impl<G> Board<G> {
    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Dimensions as `(rows, cols)`.
    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    /// Mines minus placed flags, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flagged.len() as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<DisplayCell> {
        let coords = self.layout.validate_coords(coords)?;
        Ok(self.display_at(coords))
    }

    pub fn logic_at(&self, coords: Coord2) -> Result<LogicCell> {
        let coords = self.layout.validate_coords(coords)?;
        Ok(self.layout[coords])
    }

    pub fn display(&self) -> ArrayView2<'_, DisplayCell> {
        self.display.view()
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn flagged(&self) -> &BTreeSet<Coord2> {
        &self.flagged
    }

    pub fn hidden(&self) -> &BTreeSet<Coord2> {
        &self.hidden
    }

    pub fn press_state(&self) -> &PressState {
        &self.press
    }

    /// Cells currently held down by a gesture.
    pub fn pending_presses(&self) -> &[Coord2] {
        pending_cells(&self.press)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Reveals a hidden cell, a mine ends the game and a zero opens its whole region.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;
        self.check_playing()?;

        if self.display_at(coords).is_hidden() {
            Ok(self.open_cell(coords))
        } else {
            Ok(RevealOutcome::NoChange)
        }
    }

    /// Pointer down: holds a hidden cell, or stages a chord on a numbered cell.
    pub fn press(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;
        self.check_playing()?;

        if !self.check_idle() {
            return Ok(RevealOutcome::NoChange);
        }

        Ok(match self.display_at(coords) {
            DisplayCell::Hidden => {
                self.set_display(coords, DisplayCell::Pressed);
                self.press = PressState::Single(coords);
                RevealOutcome::Staged
            }
            DisplayCell::Revealed(count) if count > 0 => self.stage_chord(coords, count),
            _ => RevealOutcome::NoChange,
        })
    }

    /// Pointer up: resolves whatever gesture [`Board::press`] started.
    pub fn release(&mut self) -> RevealOutcome {
        match core::mem::take(&mut self.press) {
            PressState::Idle => RevealOutcome::NoChange,
            PressState::Single(coords) => {
                if !self.status.is_finished() && self.display_at(coords) == DisplayCell::Pressed {
                    self.open_cell(coords)
                } else {
                    RevealOutcome::NoChange
                }
            }
            PressState::Chord { staged, commit } => self.finish_chord(staged, commit),
        }
    }

    /// Stages, and if the surrounding flags match exactly, resolves a chord on a numbered cell.
    pub fn chord_press(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;
        self.check_playing()?;

        if !self.check_idle() {
            return Ok(RevealOutcome::NoChange);
        }

        Ok(match self.display_at(coords) {
            DisplayCell::Revealed(count) if count > 0 => self.stage_chord(coords, count),
            _ => RevealOutcome::NoChange,
        })
    }

    /// Ends a chord gesture, cells that were only staged go back to hidden.
    pub fn chord_release(&mut self) -> RevealOutcome {
        if matches!(self.press, PressState::Chord { .. }) {
            self.release()
        } else {
            RevealOutcome::NoChange
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.layout.validate_coords(coords)?;
        self.check_playing()?;

        Ok(match self.display_at(coords) {
            DisplayCell::Hidden => {
                self.set_display(coords, DisplayCell::Flagged);
                MarkOutcome::Changed
            }
            DisplayCell::Flagged => {
                self.set_display(coords, DisplayCell::Hidden);
                MarkOutcome::Changed
            }
            _ => MarkOutcome::NoChange,
        })
    }

    /// Flags every remaining hidden cell once only mines are left hidden.
    pub fn auto_finish(&mut self) -> MarkOutcome {
        if self.status.is_finished() || !matches!(self.press, PressState::Idle) {
            return MarkOutcome::NoChange;
        }

        if self.hidden.is_empty() || !self.hidden.is_subset(self.layout.mines()) {
            return MarkOutcome::NoChange;
        }

        let remaining: Vec<Coord2> = self.hidden.iter().copied().collect();
        log::debug!("Auto-flagging {} remaining mines", remaining.len());
        for coords in remaining {
            self.set_display(coords, DisplayCell::Flagged);
        }
        MarkOutcome::Changed
    }

    /// Whether every safe cell is revealed and every mine is settled (flagged counts), never true after a loss.
    ///
    /// A flag on a safe cell keeps the board unsolved even when nothing is hidden, it has to be removed and the
    /// cell revealed.
    pub fn check_win(&self) -> bool {
        if self.status == GameStatus::Lost {
            return false;
        }

        self.display
            .indexed_iter()
            .all(|((row, col), &cell)| match self.layout[(row as Coord, col as Coord)] {
                LogicCell::Mine => !cell.is_unresolved(),
                LogicCell::Count(_) => matches!(cell, DisplayCell::Revealed(_)),
            })
    }

    /// Per-frame housekeeping: auto-finish, then declare a win when the board is cleared.
    pub fn tick(&mut self) -> GameStatus {
        if self.status == GameStatus::Playing {
            self.auto_finish();
            if self.check_win() {
                log::debug!("Board cleared");
                self.status = GameStatus::Won;
            }
        }
        self.status
    }

    fn display_at(&self, coords: Coord2) -> DisplayCell {
        self.display[coords.to_nd_index()]
    }

    /// The only writer of the display grid, keeps the hidden and flagged sets in sync.
    fn set_display(&mut self, coords: Coord2, cell: DisplayCell) {
        let old = core::mem::replace(&mut self.display[coords.to_nd_index()], cell);

        match old {
            DisplayCell::Hidden => {
                self.hidden.remove(&coords);
            }
            DisplayCell::Flagged => {
                self.flagged.remove(&coords);
            }
            _ => {}
        }

        match cell {
            DisplayCell::Hidden => {
                self.hidden.insert(coords);
            }
            DisplayCell::Flagged => {
                self.flagged.insert(coords);
            }
            _ => {}
        }
    }

    /// Copies the logic value into the display grid and follows up on mines and zeros.
    fn open_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let logic = self.layout[coords];
        self.set_display(coords, logic.into());
        log::trace!("Opened {:?}: {:?}", coords, logic);

        match logic {
            LogicCell::Mine => {
                self.lose(coords);
                RevealOutcome::HitMine
            }
            LogicCell::Count(0) => {
                self.flood_reveal(coords);
                RevealOutcome::Revealed
            }
            LogicCell::Count(_) => RevealOutcome::Revealed,
        }
    }

    /// Collects the zero region around `origin` plus its numbered border, then reveals all of it at once.
    fn flood_reveal(&mut self, origin: Coord2) {
        let mut region = HashSet::new();
        let mut border = HashSet::new();
        let mut to_visit = VecDeque::new();
        region.insert(origin);
        to_visit.push_back(origin);

        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in self.layout.iter_neighbors(visit_coords) {
                if region.contains(&pos) {
                    continue;
                }
                if self.layout[pos].is_zero() {
                    region.insert(pos);
                    to_visit.push_back(pos);
                } else {
                    border.insert(pos);
                }
            }
        }

        log::trace!(
            "Flood from {:?}: {} zeros, {} border cells",
            origin,
            region.len(),
            border.len()
        );

        for coords in region.into_iter().chain(border) {
            let logic = self.layout[coords];
            debug_assert!(!logic.is_mine(), "flood reached a mine at {coords:?}");
            self.set_display(coords, logic.into());
        }
    }

    fn stage_chord(&mut self, coords: Coord2, count: u8) -> RevealOutcome {
        let mut staged = Neighbors::new();
        let mut flags = 0u8;
        for pos in self.layout.iter_neighbors(coords) {
            match self.display_at(pos) {
                DisplayCell::Hidden => staged.push(pos),
                DisplayCell::Flagged => flags += 1,
                _ => {}
            }
        }

        if flags == 0 || flags != count {
            log::trace!(
                "Chord at {:?} not armed, {} flags around a {}",
                coords,
                flags,
                count
            );
            for &pos in &staged {
                self.set_display(pos, DisplayCell::Pressed);
            }
            let outcome = if staged.is_empty() {
                RevealOutcome::NoChange
            } else {
                RevealOutcome::Staged
            };
            self.press = PressState::Chord {
                staged,
                commit: false,
            };
            return outcome;
        }

        log::trace!("Chord at {:?} opens {:?}", coords, staged);
        let mut outcome = RevealOutcome::NoChange;
        for &pos in &staged {
            // an earlier flood in this loop may have opened it already
            if !self.display_at(pos).is_hidden() {
                continue;
            }
            outcome = outcome | self.open_cell(pos);
            if self.status == GameStatus::Lost {
                break;
            }
        }
        if self.status == GameStatus::Playing {
            self.press = PressState::Chord {
                staged,
                commit: true,
            };
        }
        outcome
    }

    fn finish_chord(&mut self, staged: Neighbors, commit: bool) -> RevealOutcome {
        if commit {
            return RevealOutcome::NoChange;
        }

        let mut outcome = RevealOutcome::NoChange;
        for pos in staged {
            if self.display_at(pos) == DisplayCell::Pressed {
                self.set_display(pos, DisplayCell::Hidden);
                outcome = RevealOutcome::Staged;
            }
        }
        outcome
    }

    /// Terminal transition: show unflagged mines, the detonated one and every wrong flag.
    fn lose(&mut self, detonated: Coord2) {
        log::debug!("Mine hit at {:?}", detonated);
        self.status = GameStatus::Lost;
        self.triggered_mine = Some(detonated);

        // a held cell must not stay pressed on the final board
        let pending = core::mem::take(&mut self.press);
        for &pos in pending_cells(&pending) {
            if self.display_at(pos) == DisplayCell::Pressed {
                self.set_display(pos, DisplayCell::Hidden);
            }
        }

        let unflagged: Vec<Coord2> = self
            .layout
            .mines()
            .iter()
            .copied()
            .filter(|pos| !self.flagged.contains(pos))
            .collect();
        for pos in unflagged {
            self.set_display(pos, DisplayCell::Mine);
        }

        self.set_display(detonated, DisplayCell::MineExploded);

        let wrong_flags: Vec<Coord2> = self
            .flagged
            .iter()
            .copied()
            .filter(|&pos| !self.layout.contains_mine(pos))
            .collect();
        for pos in wrong_flags {
            self.set_display(pos, DisplayCell::MineWrongFlag);
        }
    }

    fn check_playing(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn check_idle(&self) -> bool {
        let idle = matches!(self.press, PressState::Idle);
        if !idle {
            log::warn!("Press ignored, previous gesture {:?} not released", self.press);
        }
        idle
    }
}
