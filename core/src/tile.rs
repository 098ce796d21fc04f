use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Number of clockwise quarter turns, always kept in `0..4`.
pub type Orientation = u8;

/// Sides reachable through a tile from one entry side, at most three.
pub type ConnectedSides = SmallVec<[Side; 3]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeKind {
    Straight,
    Corner,
    Cross,
    JunctionT,
    Diagonals,
    OverUnder,
}

/// Side groups at orientation 0 in `N, E, S, W` order.
///
/// Sides sharing a non-zero group id are connected through the piece, 0 is closed.
const SHAPE_GROUPS: [[u8; 4]; ShapeKind::COUNT] = [
    [1, 0, 1, 0],
    [1, 1, 0, 0],
    [1, 1, 1, 1],
    [0, 1, 1, 1],
    [1, 1, 2, 2],
    [1, 2, 1, 2],
];

impl ShapeKind {
    pub const COUNT: usize = 6;

    pub const ALL: [ShapeKind; Self::COUNT] = [
        ShapeKind::Straight,
        ShapeKind::Corner,
        ShapeKind::Cross,
        ShapeKind::JunctionT,
        ShapeKind::Diagonals,
        ShapeKind::OverUnder,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Two letter code used by level files.
    pub const fn code(self) -> &'static str {
        use ShapeKind::*;
        match self {
            Straight => "ST",
            Corner => "CO",
            Cross => "CR",
            JunctionT => "JT",
            Diagonals => "DI",
            OverUnder => "OU",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shape| shape.code() == code)
    }

    /// Sides connected to `side` when the piece is turned `orientation` steps clockwise.
    pub fn connected(self, orientation: Orientation, side: Side) -> ConnectedSides {
        let groups = &SHAPE_GROUPS[self.index()];
        let group_of = |side: Side| groups[side.unrotated(orientation) as usize];

        let group = group_of(side);
        if group == 0 {
            return ConnectedSides::new();
        }

        Side::ALL
            .into_iter()
            .filter(|&other| other != side && group_of(other) == group)
            .collect()
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ShapeKind::*;
        f.write_str(match self {
            Straight => "straight",
            Corner => "corner",
            Cross => "cross",
            JunctionT => "junction-t",
            Diagonals => "diagonals",
            OverUnder => "over-under",
        })
    }
}

impl FromStr for ShapeKind {
    type Err = BoardError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Self::from_code(s)
            .or_else(|| Self::ALL.into_iter().find(|shape| shape.to_string() == s))
            .ok_or(BoardError::UnknownTileCode)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorKind {
    Start,
    End,
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
        })
    }
}

/// Content of a single cell of a pipe board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Blank {
        selectable: bool,
    },
    Locked,
    Connector {
        shape: ShapeKind,
        orientation: Orientation,
        selectable: bool,
    },
    StartAnchor {
        orientation: Orientation,
    },
    EndAnchor {
        orientation: Orientation,
    },
}

impl Tile {
    pub const fn blank() -> Self {
        Self::Blank { selectable: true }
    }

    pub const fn connector(shape: ShapeKind, orientation: Orientation, selectable: bool) -> Self {
        Self::Connector {
            shape,
            orientation: orientation % 4,
            selectable,
        }
    }

    pub const fn can_select(self) -> bool {
        match self {
            Self::Blank { selectable } | Self::Connector { selectable, .. } => selectable,
            Self::Locked | Self::StartAnchor { .. } | Self::EndAnchor { .. } => false,
        }
    }

    /// Whether paths can travel through this tile.
    pub const fn is_pipe(self) -> bool {
        matches!(
            self,
            Self::Connector { .. } | Self::StartAnchor { .. } | Self::EndAnchor { .. }
        )
    }

    pub const fn anchor_kind(self) -> Option<AnchorKind> {
        match self {
            Self::StartAnchor { .. } => Some(AnchorKind::Start),
            Self::EndAnchor { .. } => Some(AnchorKind::End),
            _ => None,
        }
    }

    pub const fn shape(self) -> Option<ShapeKind> {
        match self {
            Self::Connector { shape, .. } => Some(shape),
            _ => None,
        }
    }

    pub const fn orientation(self) -> Option<Orientation> {
        match self {
            Self::Connector { orientation, .. }
            | Self::StartAnchor { orientation }
            | Self::EndAnchor { orientation } => Some(orientation),
            Self::Blank { .. } | Self::Locked => None,
        }
    }

    /// Sides a path entering through `side` can leave by.
    ///
    /// Anchors ignore `side`: a start anchor leads out of the side it faces, an end anchor only accepts travel in
    /// the direction opposite to the side it faces.
    pub fn connected(self, side: Option<Side>) -> ConnectedSides {
        match self {
            Self::Connector {
                shape, orientation, ..
            } => match side {
                Some(side) => shape.connected(orientation, side),
                None => ConnectedSides::new(),
            },
            Self::StartAnchor { orientation } => {
                smallvec::smallvec![Side::from_orientation(orientation)]
            }
            Self::EndAnchor { orientation } => {
                smallvec::smallvec![Side::from_orientation(orientation).opposite()]
            }
            Self::Blank { .. } | Self::Locked => ConnectedSides::new(),
        }
    }

    /// The single direction of travel that completes a path into an end anchor.
    pub fn accepted_side(self) -> Option<Side> {
        match self {
            Self::EndAnchor { orientation } => Some(Side::from_orientation(orientation).opposite()),
            _ => None,
        }
    }

    /// Turns a selectable connector by `delta` quarter turns, negative values turn counter-clockwise.
    pub fn rotate(&mut self, delta: i32) -> core::result::Result<(), RotationError> {
        match self {
            Self::StartAnchor { .. } | Self::EndAnchor { .. } => Err(RotationError::AnchorImmutable),
            Self::Connector {
                orientation,
                selectable: true,
                ..
            } => {
                let turned = (i32::from(*orientation) + delta.rem_euclid(4)) % 4;
                *orientation = turned as Orientation;
                Ok(())
            }
            Self::Connector { .. } | Self::Blank { .. } | Self::Locked => {
                Err(RotationError::NotSelectable)
            }
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::blank()
    }
}

/// Player-visible state of a cell in the reveal game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exposure {
    Hidden,
    Flagged,
    Exposed(u8),
    Hazard,
}

impl Exposure {
    pub const fn is_unexposed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for Exposure {
    fn default() -> Self {
        Self::Hidden
    }
}
