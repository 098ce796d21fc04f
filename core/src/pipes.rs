use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// A pipe game: the tile grid, the pieces the player still holds, and where the fixed start and end pieces sit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipeBoard {
    tiles: Array2<Tile>,
    inventory: Inventory,
    start: Position,
    end: Position,
}

impl PipeBoard {
    /// Builds a board, checking it is square and holds exactly one start and one end piece.
    pub fn new(tiles: Array2<Tile>, inventory: Inventory) -> core::result::Result<Self, BoardError> {
        let (rows, cols) = tiles.dim();
        if rows == 0 {
            return Err(BoardError::Empty);
        }
        if rows > usize::from(Coord::MAX) {
            return Err(BoardError::TooLarge);
        }
        if rows != cols {
            return Err(BoardError::NotSquare { rows, cols });
        }

        let mut start = None;
        let mut end = None;
        for ((row, col), tile) in tiles.indexed_iter() {
            let pos = (row as Coord, col as Coord);
            let Some(kind) = tile.anchor_kind() else {
                continue;
            };
            let slot = match kind {
                AnchorKind::Start => &mut start,
                AnchorKind::End => &mut end,
            };
            if slot.replace(pos).is_some() {
                return Err(BoardError::DuplicateAnchor(kind));
            }
        }

        let start = start.ok_or(BoardError::MissingAnchor(AnchorKind::Start))?;
        let end = end.ok_or(BoardError::MissingAnchor(AnchorKind::End))?;
        log::debug!(
            "pipe board {}x{} built, start {:?}, end {:?}",
            rows,
            cols,
            start,
            end
        );

        Ok(Self {
            tiles,
            inventory,
            start,
            end,
        })
    }

    pub fn from_definition(definition: &LevelDefinition) -> core::result::Result<Self, BoardError> {
        let tiles = definition.tile_grid()?;
        Self::new(tiles, definition.inventory)
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::of(&self.tiles)
    }

    pub fn size(&self) -> Coord {
        self.geometry().size()
    }

    pub fn tiles(&self) -> &Array2<Tile> {
        &self.tiles
    }

    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        self.geometry()
            .contains(pos)
            .then(|| self.tiles[pos.to_nd_index()])
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn start_position(&self) -> Position {
        self.start
    }

    pub fn end_position(&self) -> Position {
        self.end
    }

    /// Places a selectable piece from the inventory onto an empty selectable cell.
    pub fn place(
        &mut self,
        shape: ShapeKind,
        orientation: Orientation,
        pos: Position,
    ) -> core::result::Result<(), PlacementError> {
        let tile = self.tile_at(pos).ok_or(PlacementError::OutOfBounds)?;
        if tile != Tile::blank() {
            return Err(PlacementError::CellOccupiedOrLocked);
        }

        self.inventory.take(shape)?;
        self.tiles[pos.to_nd_index()] = Tile::connector(shape, orientation, true);
        log::debug!("placed {} at {:?}", shape, pos);
        Ok(())
    }

    /// Takes a player-placed piece back into the inventory, leaving an empty cell.
    pub fn remove(&mut self, pos: Position) -> core::result::Result<(), RemovalError> {
        let tile = self.tile_at(pos).ok_or(RemovalError::OutOfBounds)?;
        let shape = match tile {
            Tile::Connector {
                shape,
                selectable: true,
                ..
            } => shape,
            Tile::Blank { .. } => return Err(RemovalError::NothingToRemove),
            Tile::Connector { .. } | Tile::Locked | Tile::StartAnchor { .. } | Tile::EndAnchor { .. } => {
                return Err(RemovalError::NotSelectable);
            }
        };

        self.tiles[pos.to_nd_index()] = Tile::blank();
        self.inventory.give_back(shape);
        log::debug!("removed {} from {:?}", shape, pos);
        Ok(())
    }

    pub fn rotate(&mut self, pos: Position, delta: i32) -> core::result::Result<(), RotationError> {
        if !self.geometry().contains(pos) {
            return Err(RotationError::OutOfBounds);
        }
        self.tiles[pos.to_nd_index()].rotate(delta)
    }

    pub fn has_path(&self) -> bool {
        has_path(&self.tiles, self.start, self.end)
    }

    pub fn check_win(&self) -> bool {
        connection_won(&self.tiles, self.start, self.end)
    }
}
