use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// A reveal game in progress: the hidden hazard layout plus what the player has exposed and flagged so far.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealBoard {
    hazard_layout: HazardLayout,
    cells: Array2<Exposure>,
    flagged_count: Saturating<CellCount>,
    state: EngineState,
    triggered_hazard: Option<Position>,
}

impl RevealBoard {
    pub fn new(hazard_layout: HazardLayout) -> Self {
        let size = hazard_layout.size();
        Self {
            hazard_layout,
            cells: Array2::default((size, size).to_nd_index()),
            flagged_count: Saturating(0),
            state: Default::default(),
            triggered_hazard: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord {
        self.hazard_layout.size()
    }

    pub fn geometry(&self) -> Geometry {
        self.hazard_layout.geometry()
    }

    pub fn hazard_layout(&self) -> &HazardLayout {
        &self.hazard_layout
    }

    pub fn cells(&self) -> &Array2<Exposure> {
        &self.cells
    }

    pub fn total_hazards(&self) -> CellCount {
        self.hazard_layout.hazard_count()
    }

    /// Hazards not yet accounted for by a flag, negative when the player over-flags.
    pub fn flags_left(&self) -> isize {
        (self.hazard_layout.hazard_count() as isize) - (self.flagged_count.0 as isize)
    }

    pub fn cell_at(&self, pos: Position) -> Exposure {
        self.cells[pos.to_nd_index()]
    }

    pub fn triggered_hazard(&self) -> Option<Position> {
        self.triggered_hazard
    }

    pub fn has_hazard_at(&self, pos: Position) -> bool {
        self.hazard_layout.contains_hazard(pos)
    }

    /// Toggles a flag on a hidden cell, exposed cells are left alone.
    pub fn flag(&mut self, pos: Position) -> Result<MarkOutcome> {
        use Exposure::*;
        use MarkOutcome::*;

        let pos = self.hazard_layout.validate_coords(pos)?;
        self.check_not_finished()?;

        let outcome = match self.cells[pos.to_nd_index()] {
            Hidden => {
                self.cells[pos.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.cells[pos.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Exposed(_) | Hazard => NoChange,
        };

        if outcome.has_update() {
            self.mark_started();
            self.update_won();
        }
        Ok(outcome)
    }

    /// Exposes `pos`.
    ///
    /// Revealing a hazard loses the game and exposes every hazard on the board instead of flood-filling. Flagged and
    /// already exposed cells produce an empty outcome.
    pub fn reveal(&mut self, pos: Position) -> Result<RevealOutcome> {
        let pos = self.hazard_layout.validate_coords(pos)?;
        self.check_not_finished()?;

        if !matches!(self.cells[pos.to_nd_index()], Exposure::Hidden) {
            return Ok(RevealOutcome::default());
        }

        if self.hazard_layout.contains_hazard(pos) {
            self.triggered_hazard = Some(pos);
            let exposed = self.expose_all_hazards();
            self.end_game(false);
            return Ok(RevealOutcome {
                exposed,
                hit_hazard: true,
            });
        }

        let exposed = flood_reveal(&mut self.cells, &self.hazard_layout, pos);
        self.mark_started();
        self.update_won();

        Ok(RevealOutcome {
            exposed,
            hit_hazard: false,
        })
    }

    pub fn check_win(&self) -> bool {
        reveal_won(&self.cells, &self.hazard_layout)
    }

    /// Hides every cell again, keeping the same hazards.
    pub fn restart(&mut self) {
        self.cells.fill(Exposure::Hidden);
        self.flagged_count = Saturating(0);
        self.state = EngineState::Ready;
        self.triggered_hazard = None;
        log::debug!("reveal game restarted");
    }

    /// Starts over on a fresh hazard layout.
    pub fn new_game(&mut self, hazard_layout: HazardLayout) {
        *self = Self::new(hazard_layout);
        log::debug!(
            "new reveal game, size {} with {} hazards",
            self.size(),
            self.total_hazards()
        );
    }

    fn expose_all_hazards(&mut self) -> alloc::collections::BTreeSet<CellIndex> {
        for pos in self.hazard_layout.iter_hazards() {
            let cell = &mut self.cells[pos.to_nd_index()];
            if cell.is_flagged() {
                self.flagged_count -= 1;
            }
            *cell = Exposure::Hazard;
        }
        self.hazard_layout.hazard_indices()
    }

    fn update_won(&mut self) {
        if self.check_win() {
            self.end_game(true);
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, EngineState::Ready) {
            self.state = EngineState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        if won {
            self.triggered_hazard = None;
        }
        log::debug!("reveal game ended, won: {}", won);
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;

    fn layout(size: Coord, hazards: &[Position]) -> HazardLayout {
        HazardLayout::from_hazard_positions(size, hazards).unwrap()
    }

    #[test]
    fn reveal_hits_hazard_and_exposes_all_hazards() {
        let mut board = RevealBoard::new(layout(3, &[(0, 0), (2, 2)]));
        board.flag((2, 2)).unwrap();

        let outcome = board.reveal((0, 0)).unwrap();

        assert!(outcome.hit_hazard);
        assert_eq!(outcome.exposed, BTreeSet::from([0, 8]));
        assert_eq!(board.state(), EngineState::Lost);
        assert_eq!(board.triggered_hazard(), Some((0, 0)));
        assert_eq!(board.cell_at((0, 0)), Exposure::Hazard);
        assert_eq!(board.cell_at((2, 2)), Exposure::Hazard);
        assert_eq!(board.cell_at((1, 1)), Exposure::Hidden);
        assert_eq!(board.reveal((1, 1)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn every_cell_around_center_hazard_counts_one() {
        let mut board = RevealBoard::new(HazardLayout::from_hazard_indices(3, &[4]).unwrap());
        let geometry = board.geometry();

        let outcome = board.reveal((0, 0)).unwrap();
        assert!(!outcome.hit_hazard);
        assert_eq!(outcome.exposed, BTreeSet::from([0]));

        for index in [1, 2, 3, 5, 6, 7, 8] {
            let pos = geometry.position_of(index).unwrap();
            let outcome = board.reveal(pos).unwrap();
            assert!(!outcome.hit_hazard);
            assert_eq!(outcome.exposed, BTreeSet::from([index]));
        }
        for index in [0, 1, 2, 3, 5, 6, 7, 8] {
            let pos = geometry.position_of(index).unwrap();
            assert_eq!(board.cell_at(pos), Exposure::Exposed(1));
        }
        assert_eq!(board.cell_at((1, 1)), Exposure::Hidden);
        assert_eq!(board.state(), EngineState::Active);
    }

    #[test]
    fn flagging_twice_restores_hidden() {
        let mut board = RevealBoard::new(layout(3, &[(0, 0)]));

        assert_eq!(board.flag((1, 2)).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.cell_at((1, 2)), Exposure::Flagged);
        assert_eq!(board.flags_left(), 0);
        assert_eq!(board.flag((1, 2)).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.cell_at((1, 2)), Exposure::Hidden);
        assert_eq!(board.flags_left(), 1);
    }

    #[test]
    fn flagging_exposed_cell_is_no_op() {
        let mut board = RevealBoard::new(layout(3, &[(0, 0)]));
        board.reveal((0, 1)).unwrap();

        assert_eq!(board.flag((0, 1)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.cell_at((0, 1)), Exposure::Exposed(1));
    }

    #[test]
    fn revealing_flagged_cell_changes_nothing() {
        let mut board = RevealBoard::new(layout(3, &[(0, 0)]));
        board.flag((0, 0)).unwrap();

        let outcome = board.reveal((0, 0)).unwrap();

        assert!(!outcome.has_update());
        assert_eq!(board.cell_at((0, 0)), Exposure::Flagged);
        assert_eq!(board.state(), EngineState::Active);
    }

    #[test]
    fn removed_flag_opens_on_next_fill() {
        let mut board = RevealBoard::new(layout(5, &[]));
        board.flag((0, 0)).unwrap();
        for row in 0..5 {
            board.flag((row, 2)).unwrap();
        }

        board.reveal((4, 0)).unwrap();
        assert_eq!(board.cell_at((1, 1)), Exposure::Exposed(0));
        assert_eq!(board.cell_at((0, 0)), Exposure::Flagged);

        board.flag((0, 0)).unwrap();
        board.flag((4, 2)).unwrap();
        let outcome = board.reveal((4, 4)).unwrap();

        assert_eq!(board.cell_at((0, 0)), Exposure::Exposed(0));
        assert_eq!(board.cell_at((4, 2)), Exposure::Exposed(0));
        assert!(outcome.exposed.contains(&0));
        assert!(outcome.exposed.contains(&22));
        // cells opened by the first reveal are not reported again
        assert!(!outcome.exposed.contains(&6));
        assert_eq!(board.state(), EngineState::Active);
    }

    #[test]
    fn win_needs_every_hazard_flagged() {
        let mut board = RevealBoard::new(layout(3, &[(2, 2)]));

        board.reveal((0, 0)).unwrap();
        assert_eq!(board.cell_at((2, 2)), Exposure::Hidden);
        assert!(!board.check_win());
        assert_eq!(board.state(), EngineState::Active);

        board.flag((2, 2)).unwrap();
        assert!(board.check_win());
        assert_eq!(board.state(), EngineState::Won);
        assert_eq!(board.flag((2, 2)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn wrong_flags_do_not_win() {
        let mut board = RevealBoard::new(layout(2, &[(0, 0)]));

        board.flag((0, 0)).unwrap();
        board.flag((1, 1)).unwrap();
        board.reveal((0, 1)).unwrap();
        board.reveal((1, 0)).unwrap();

        // nothing hidden, but one flag too many
        assert!(board.cells().iter().all(|cell| !matches!(cell, Exposure::Hidden)));
        assert!(!board.check_win());
        assert_eq!(board.flags_left(), -1);

        board.flag((1, 1)).unwrap();
        board.reveal((1, 1)).unwrap();
        assert!(board.check_win());
        assert_eq!(board.state(), EngineState::Won);
    }

    #[test]
    fn restart_keeps_hazards() {
        let mut board = RevealBoard::new(layout(3, &[(1, 1)]));
        board.reveal((1, 1)).unwrap();
        assert!(board.is_finished());

        board.restart();

        assert_eq!(board.state(), EngineState::Ready);
        assert!(board.has_hazard_at((1, 1)));
        assert!(board.cells().iter().all(|&cell| cell == Exposure::Hidden));
        assert_eq!(board.triggered_hazard(), None);
        assert_eq!(board.flags_left(), 1);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut board = RevealBoard::new(layout(3, &[]));

        assert_eq!(board.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.flag((0, 7)), Err(GameError::InvalidCoords));
    }
}
