use alloc::collections::VecDeque;
use hashbrown::HashSet;
use ndarray::Array2;

use crate::*;

/// Searches for a chain of mutually connected pieces leading from the start anchor at `start` into the end anchor at
/// `end`.
///
/// Pieces are tracked together with the side they were entered through, so a cross or junction can be passed again
/// from a different side while loops on the board still terminate. The end anchor only counts when entered in its
/// accepted direction. Grids that are not square, or have more than `Coord::MAX` rows, never have a path.
pub fn has_path(tiles: &Array2<Tile>, start: Position, end: Position) -> bool {
    let Some(geometry) = Geometry::of_square(tiles) else {
        log::warn!("Path search on unsupported {:?} grid", tiles.dim());
        return false;
    };
    let tile_at = |pos: Position| tiles[pos.to_nd_index()];

    if !geometry.contains(start) || !geometry.contains(end) {
        return false;
    }
    let Some(accepted) = tile_at(end).accepted_side() else {
        return false;
    };

    let mut discovered: HashSet<(Position, Option<Side>)> = HashSet::from_iter([(start, None)]);
    let mut to_visit: VecDeque<(Option<Side>, Position)> = VecDeque::from([(None, start)]);

    while let Some((entered_from, pos)) = to_visit.pop_front() {
        for side in tile_at(pos).connected(entered_from) {
            let Some((next_entry, next_pos)) = geometry.step(pos, side) else {
                continue;
            };

            if next_pos == end && side == accepted {
                log::trace!(
                    "path found into {:?} after {} pieces",
                    end,
                    discovered.len()
                );
                return true;
            }

            if !tile_at(next_pos).is_pipe() {
                continue;
            }

            if discovered.insert((next_pos, Some(next_entry))) {
                to_visit.push_back((Some(next_entry), next_pos));
            }
        }
    }

    log::trace!("no path, explored {} piece entries", discovered.len());
    false
}
