use thiserror::Error;

use crate::AnchorKind;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many hazards")]
    TooManyHazards,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("No pieces of that shape left")]
    OutOfStock,
    #[error("Cell is occupied or locked")]
    CellOccupiedOrLocked,
    #[error("Invalid coordinates")]
    OutOfBounds,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemovalError {
    #[error("No piece to remove")]
    NothingToRemove,
    #[error("Piece cannot be removed")]
    NotSelectable,
    #[error("Invalid coordinates")]
    OutOfBounds,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RotationError {
    #[error("Start and end pieces cannot be rotated")]
    AnchorImmutable,
    #[error("Cell cannot be rotated")]
    NotSelectable,
    #[error("Invalid coordinates")]
    OutOfBounds,
}

/// Structural problems found while building a board from a level definition.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board has no rows")]
    Empty,
    #[error("Board is too large")]
    TooLarge,
    #[error("Row {row} has {len} cells, board is not square")]
    NonSquare { row: usize, len: usize },
    #[error("Board is {rows}x{cols}, not square")]
    NotSquare { rows: usize, cols: usize },
    #[error("Unknown tile code")]
    UnknownTileCode,
    #[error("Invalid orientation")]
    InvalidOrientation,
    #[error("Board has no {0} piece")]
    MissingAnchor(AnchorKind),
    #[error("Board has more than one {0} piece")]
    DuplicateAnchor(AnchorKind),
    #[error("Inventory line is missing or malformed")]
    MissingInventory,
    #[error("Level definition is not valid JSON")]
    Json,
}
