use alloc::collections::{BTreeSet, VecDeque};
use ndarray::Array2;

use crate::*;

/// Exposes the region opened by revealing `start` and returns the indices of every cell exposed by this call.
///
/// A flagged start cell blocks the reveal and is returned on its own, unchanged. A start cell next to a hazard is
/// exposed alone with its count. Otherwise the fill spreads through zero-count cells and stops at the first ring of
/// numbered cells. Flagged cells inside the region are left alone and never expanded. Cells that were already exposed
/// are passed through but not returned.
pub fn flood_reveal(
    cells: &mut Array2<Exposure>,
    hazards: &HazardLayout,
    start: Position,
) -> BTreeSet<CellIndex> {
    let geometry = hazards.geometry();
    let start_index = geometry.index_of(start);

    if cells[start.to_nd_index()].is_flagged() {
        return BTreeSet::from([start_index]);
    }

    if hazards.contains_hazard(start) {
        return BTreeSet::new();
    }

    let start_count = hazards.adjacent_hazard_count(start);
    if start_count != 0 {
        cells[start.to_nd_index()] = Exposure::Exposed(start_count);
        return BTreeSet::from([start_index]);
    }

    let mut exposed = BTreeSet::new();
    let mut discovered = BTreeSet::from([start]);
    let mut to_visit = VecDeque::from([start]);

    while let Some(pos) = to_visit.pop_front() {
        let cell = &mut cells[pos.to_nd_index()];
        if cell.is_flagged() || hazards.contains_hazard(pos) {
            continue;
        }

        // zero cells exposed by an earlier fill still expand
        let count = hazards.adjacent_hazard_count(pos);
        if *cell == Exposure::Hidden {
            *cell = Exposure::Exposed(count);
            exposed.insert(geometry.index_of(pos));
        }

        if count == 0 {
            for next in geometry.neighbors(pos) {
                if discovered.insert(next) {
                    to_visit.push_back(next);
                }
            }
        }
    }

    log::trace!(
        "flood reveal from {:?} exposed {} of {} discovered cells",
        start,
        exposed.len(),
        discovered.len()
    );
    exposed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden(size: Coord) -> Array2<Exposure> {
        Array2::default((size, size).to_nd_index())
    }

    #[test]
    fn center_hazard_exposes_ring_of_ones() {
        let hazards = HazardLayout::from_hazard_indices(3, &[4]).unwrap();
        let mut cells = hidden(3);

        let exposed = flood_reveal(&mut cells, &hazards, (0, 0));

        assert_eq!(exposed, BTreeSet::from([0]));
        assert_eq!(cells[[0, 0]], Exposure::Exposed(1));
        assert_eq!(cells[[1, 1]], Exposure::Hidden);
    }

    #[test]
    fn zero_region_stops_at_numbered_border() {
        // hazard in the bottom right corner of a 4x4 board
        let hazards = HazardLayout::from_hazard_positions(4, &[(3, 3)]).unwrap();
        let mut cells = hidden(4);

        let exposed = flood_reveal(&mut cells, &hazards, (0, 0));

        assert_eq!(exposed.len(), 15);
        assert!(!exposed.contains(&15));
        assert_eq!(cells[[2, 2]], Exposure::Exposed(1));
        assert_eq!(cells[[3, 2]], Exposure::Exposed(1));
        assert_eq!(cells[[1, 1]], Exposure::Exposed(0));
        assert_eq!(cells[[3, 3]], Exposure::Hidden);
    }

    #[test]
    fn hazard_free_board_opens_completely() {
        let hazards = HazardLayout::from_hazard_positions(5, &[]).unwrap();
        let mut cells = hidden(5);

        let exposed = flood_reveal(&mut cells, &hazards, (2, 3));

        assert_eq!(exposed, (0..25).collect::<BTreeSet<_>>());
        assert!(cells.iter().all(|&cell| cell == Exposure::Exposed(0)));
    }

    #[test]
    fn flags_block_the_fill() {
        let hazards = HazardLayout::from_hazard_positions(3, &[]).unwrap();
        let mut cells = hidden(3);
        cells[[0, 1]] = Exposure::Flagged;

        let exposed = flood_reveal(&mut cells, &hazards, (2, 2));

        assert_eq!(exposed.len(), 8);
        assert!(!exposed.contains(&1));
        assert_eq!(cells[[0, 1]], Exposure::Flagged);
    }

    #[test]
    fn fill_passes_through_exposed_zero_cells() {
        let hazards = HazardLayout::from_hazard_positions(3, &[]).unwrap();
        let mut cells = hidden(3);
        for row in 0..3 {
            cells[[row, 1]] = Exposure::Exposed(0);
        }

        let exposed = flood_reveal(&mut cells, &hazards, (0, 2));

        assert_eq!(exposed, BTreeSet::from([0, 2, 3, 5, 6, 8]));
        assert!(cells.iter().all(|&cell| cell == Exposure::Exposed(0)));
    }

    #[test]
    fn flagged_start_is_returned_untouched() {
        let hazards = HazardLayout::from_hazard_positions(3, &[]).unwrap();
        let mut cells = hidden(3);
        cells[[1, 1]] = Exposure::Flagged;

        let exposed = flood_reveal(&mut cells, &hazards, (1, 1));

        assert_eq!(exposed, BTreeSet::from([4]));
        assert_eq!(cells[[1, 1]], Exposure::Flagged);
        assert_eq!(cells.iter().filter(|cell| cell.is_unexposed()).count(), 9);
    }

    #[test]
    fn exposed_region_boundary_is_numbered() {
        let hazards = HazardLayout::from_hazard_positions(6, &[(0, 5), (3, 0), (5, 4)]).unwrap();
        let mut cells = hidden(6);
        let geometry = hazards.geometry();

        let exposed = flood_reveal(&mut cells, &hazards, (2, 3));

        for &index in &exposed {
            let pos = geometry.position_of(index).unwrap();
            let Exposure::Exposed(count) = cells[pos.to_nd_index()] else {
                panic!("cell {pos:?} should be exposed");
            };
            if count == 0 {
                // every neighbor of a zero cell must have been opened too
                for next in geometry.neighbors(pos) {
                    assert!(exposed.contains(&geometry.index_of(next)));
                }
            }
        }
        for pos in hazards.iter_hazards() {
            assert!(!exposed.contains(&geometry.index_of(pos)));
        }
    }
}
