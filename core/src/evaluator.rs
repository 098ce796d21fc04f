use ndarray::Array2;

use crate::*;

/// The reveal game is won once nothing is left hidden and the flags sit exactly on the hazards.
pub fn reveal_won(cells: &Array2<Exposure>, hazards: &HazardLayout) -> bool {
    let all_settled = cells
        .iter()
        .all(|cell| matches!(cell, Exposure::Exposed(_) | Exposure::Flagged));
    let flag_count = cells.iter().filter(|cell| cell.is_flagged()).count();
    let hazards_flagged = hazards
        .iter_hazards()
        .all(|pos| cells[pos.to_nd_index()].is_flagged());

    all_settled && flag_count == usize::from(hazards.hazard_count()) && hazards_flagged
}

/// The reveal game is lost once any hazard has been exposed.
pub fn reveal_lost(cells: &Array2<Exposure>) -> bool {
    cells.iter().any(|cell| matches!(cell, Exposure::Hazard))
}

/// The pipe game is won when the start piece is connected to the end piece.
pub fn connection_won(tiles: &Array2<Tile>, start: Position, end: Position) -> bool {
    has_path(tiles, start, end)
}
