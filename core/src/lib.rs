//! Grid traversal core for two puzzle games played on square boards.
//!
//! - The reveal game hides hazards under a grid of cells. Exposing a cell with no adjacent hazard flood-fills the
//!   surrounding region ([`flood_reveal`], driven by [`RevealBoard`]).
//! - The pipe game asks the player to place and rotate connector pieces until the start piece is linked to the end
//!   piece ([`has_path`], driven by [`PipeBoard`]).
//!
//! Everything here is synchronous and single-owner: the caller mutates a board, then queries it.
#![no_std]

extern crate alloc;

use alloc::collections::BTreeSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use connectivity::*;
pub use engine::*;
pub use error::*;
pub use evaluator::*;
pub use generator::*;
pub use geometry::*;
pub use inventory::*;
pub use level::*;
pub use pipes::*;
pub use reveal::*;
pub use tile::*;

mod connectivity;
mod engine;
mod error;
mod evaluator;
mod generator;
mod geometry;
mod inventory;
mod level;
mod pipes;
mod reveal;
mod tile;

/// Dimensions of a reveal game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub hazards: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, hazards: CellCount) -> Self {
        Self { size, hazards }
    }

    /// Clamps to at least a 1×1 board and to fewer hazards than cells.
    pub fn new(size: Coord, hazards: CellCount) -> Self {
        let size = size.max(1);
        let hazards = hazards.min(mult(size, size) - 1);
        Self::new_unchecked(size, hazards)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn geometry(&self) -> Geometry {
        Geometry::new(self.size)
    }
}

/// Fixed hazard positions of one reveal game, never changed by play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardLayout {
    hazard_mask: Array2<bool>,
    hazard_count: CellCount,
}

impl HazardLayout {
    pub(crate) fn from_hazard_mask(hazard_mask: Array2<bool>) -> Self {
        let hazard_count = hazard_mask
            .iter()
            .filter(|&&is_hazard| is_hazard)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        Self {
            hazard_mask,
            hazard_count,
        }
    }

    pub fn from_hazard_positions(size: Coord, hazards: &[Position]) -> Result<Self> {
        let geometry = Geometry::new(size);
        let mut hazard_mask: Array2<bool> = Array2::default((size, size).to_nd_index());

        for &pos in hazards {
            if !geometry.contains(pos) {
                return Err(GameError::InvalidCoords);
            }
            hazard_mask[pos.to_nd_index()] = true;
        }

        Self::checked(hazard_mask)
    }

    pub fn from_hazard_indices(size: Coord, hazards: &[CellIndex]) -> Result<Self> {
        let geometry = Geometry::new(size);
        let mut hazard_mask: Array2<bool> = Array2::default((size, size).to_nd_index());

        for &index in hazards {
            let pos = geometry.position_of(index).ok_or(GameError::InvalidCoords)?;
            hazard_mask[pos.to_nd_index()] = true;
        }

        Self::checked(hazard_mask)
    }

    fn checked(hazard_mask: Array2<bool>) -> Result<Self> {
        let layout = Self::from_hazard_mask(hazard_mask);
        if layout.hazard_count >= layout.total_cells() {
            return Err(GameError::TooManyHazards);
        }
        Ok(layout)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.hazard_count)
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::of(&self.hazard_mask)
    }

    pub fn validate_coords(&self, pos: Position) -> Result<Position> {
        if self.geometry().contains(pos) {
            Ok(pos)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord {
        self.geometry().size()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.hazard_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.hazard_mask.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn hazard_count(&self) -> CellCount {
        self.hazard_count
    }

    pub fn contains_hazard(&self, pos: Position) -> bool {
        self.hazard_mask[pos.to_nd_index()]
    }

    /// Hazards among the up to eight cells around `pos`.
    pub fn adjacent_hazard_count(&self, pos: Position) -> u8 {
        let count = self
            .geometry()
            .neighbors(pos)
            .filter(|&next| self.contains_hazard(next))
            .count();
        // at most eight neighbors
        count as u8
    }

    pub fn iter_hazards(&self) -> impl Iterator<Item = Position> + '_ {
        self.hazard_mask
            .indexed_iter()
            .filter(|&(_, &is_hazard)| is_hazard)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub fn hazard_indices(&self) -> BTreeSet<CellIndex> {
        let geometry = self.geometry();
        self.iter_hazards()
            .map(|pos| geometry.index_of(pos))
            .collect()
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

/// Cells exposed by one reveal, and whether the revealed cell was a hazard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RevealOutcome {
    pub exposed: BTreeSet<CellIndex>,
    pub hit_hazard: bool,
}

impl RevealOutcome {
    pub fn has_update(&self) -> bool {
        self.hit_hazard || !self.exposed.is_empty()
    }
}
