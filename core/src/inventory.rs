use core::ops::Index;

use serde::{Deserialize, Serialize};

use crate::*;

/// Remaining placements per shape.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: [CellCount; ShapeKind::COUNT],
}

impl Inventory {
    pub const fn new(counts: [CellCount; ShapeKind::COUNT]) -> Self {
        Self { counts }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (ShapeKind, CellCount)>) -> Self {
        let mut inventory = Self::default();
        for (shape, count) in pairs {
            inventory.counts[shape.index()] = count;
        }
        inventory
    }

    pub const fn count(&self, shape: ShapeKind) -> CellCount {
        self.counts[shape.index()]
    }

    /// Takes one piece, leaving the inventory untouched when none is left.
    pub fn take(&mut self, shape: ShapeKind) -> core::result::Result<(), PlacementError> {
        let count = &mut self.counts[shape.index()];
        *count = count.checked_sub(1).ok_or(PlacementError::OutOfStock)?;
        Ok(())
    }

    pub fn give_back(&mut self, shape: ShapeKind) {
        let count = &mut self.counts[shape.index()];
        *count = count.saturating_add(1);
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeKind, CellCount)> + '_ {
        ShapeKind::ALL
            .into_iter()
            .map(|shape| (shape, self.count(shape)))
    }
}

impl Index<ShapeKind> for Inventory {
    type Output = CellCount;

    fn index(&self, shape: ShapeKind) -> &Self::Output {
        &self.counts[shape.index()]
    }
}
