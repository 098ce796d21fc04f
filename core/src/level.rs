use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// How a level describes one cell before play starts.
///
/// Connectors written into a level are part of the puzzle and cannot be moved by the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileSpec {
    Blank,
    Locked,
    Connector {
        shape: ShapeKind,
        orientation: Orientation,
    },
    Start {
        orientation: Orientation,
    },
    End {
        orientation: Orientation,
    },
}

impl TileSpec {
    pub fn to_tile(self) -> core::result::Result<Tile, BoardError> {
        use TileSpec::*;

        let checked = |orientation: Orientation| {
            if orientation < 4 {
                Ok(orientation)
            } else {
                Err(BoardError::InvalidOrientation)
            }
        };

        Ok(match self {
            Blank => Tile::blank(),
            Locked => Tile::Locked,
            Connector { shape, orientation } => Tile::connector(shape, checked(orientation)?, false),
            Start { orientation } => Tile::StartAnchor {
                orientation: checked(orientation)?,
            },
            End { orientation } => Tile::EndAnchor {
                orientation: checked(orientation)?,
            },
        })
    }
}

fn parse_orientation(digits: &str) -> core::result::Result<Orientation, BoardError> {
    if digits.is_empty() {
        return Ok(0);
    }
    let orientation: Orientation = digits.parse().map_err(|_| BoardError::UnknownTileCode)?;
    if orientation < 4 {
        Ok(orientation)
    } else {
        Err(BoardError::InvalidOrientation)
    }
}

fn is_orientation_suffix(rest: &str) -> bool {
    rest.len() <= 1 && rest.bytes().all(|byte| byte.is_ascii_digit())
}

impl FromStr for TileSpec {
    type Err = BoardError;

    /// Parses one comma-separated level cell: `#` blank, `L` locked, `S<o>` / `E<o>` anchors, or a two letter shape
    /// code with an optional orientation digit such as `JT` or `CO2`.
    fn from_str(code: &str) -> core::result::Result<Self, Self::Err> {
        let code = code.trim();
        match code {
            "#" => return Ok(Self::Blank),
            "L" => return Ok(Self::Locked),
            _ => {}
        }

        if let Some(rest) = code.strip_prefix('S').filter(|rest| is_orientation_suffix(rest)) {
            return Ok(Self::Start {
                orientation: parse_orientation(rest)?,
            });
        }
        if let Some(rest) = code.strip_prefix('E').filter(|rest| is_orientation_suffix(rest)) {
            return Ok(Self::End {
                orientation: parse_orientation(rest)?,
            });
        }

        let (shape, rest) = code.split_at_checked(2).ok_or(BoardError::UnknownTileCode)?;
        let shape = ShapeKind::from_code(shape).ok_or(BoardError::UnknownTileCode)?;
        if rest.len() > 1 {
            return Err(BoardError::UnknownTileCode);
        }
        Ok(Self::Connector {
            shape,
            orientation: parse_orientation(rest)?,
        })
    }
}

impl fmt::Display for TileSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TileSpec::*;
        match self {
            Blank => f.write_str("#"),
            Locked => f.write_str("L"),
            Connector { shape, orientation } => write!(f, "{}{}", shape.code(), orientation),
            Start { orientation } => write!(f, "S{}", orientation),
            End { orientation } => write!(f, "E{}", orientation),
        }
    }
}

/// Initial layout and piece counts of a pipe level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub tiles: Vec<Vec<TileSpec>>,
    pub inventory: Inventory,
}

impl LevelDefinition {
    /// Reads the compact level text: one board row per line, then a final line with the stock of each shape in
    /// `ST, CO, CR, JT, DI, OU` order.
    pub fn parse_text(text: &str) -> core::result::Result<Self, BoardError> {
        let mut lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let inventory_line = lines.pop().ok_or(BoardError::MissingInventory)?;
        let counts: Vec<CellCount> = inventory_line
            .split(',')
            .map(|count| count.trim().parse::<CellCount>())
            .collect::<core::result::Result<_, _>>()
            .map_err(|_| BoardError::MissingInventory)?;
        let counts: [CellCount; ShapeKind::COUNT] = counts
            .try_into()
            .map_err(|_| BoardError::MissingInventory)?;

        let tiles = lines
            .into_iter()
            .map(|line| {
                line.split(',')
                    .map(str::parse)
                    .collect::<core::result::Result<Vec<TileSpec>, BoardError>>()
            })
            .collect::<core::result::Result<Vec<_>, BoardError>>()?;

        Ok(Self {
            tiles,
            inventory: Inventory::new(counts),
        })
    }

    pub fn from_json(json: &str) -> core::result::Result<Self, BoardError> {
        serde_json::from_str(json).map_err(|err| {
            log::warn!("Could not read level definition: {}", err);
            BoardError::Json
        })
    }

    pub fn to_json(&self) -> core::result::Result<String, BoardError> {
        serde_json::to_string(self).map_err(|_| BoardError::Json)
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// Converts the rows into a square tile grid, rejecting ragged rows and bad orientations.
    pub fn tile_grid(&self) -> core::result::Result<Array2<Tile>, BoardError> {
        let size = self.size();
        if size == 0 {
            return Err(BoardError::Empty);
        }
        if size > usize::from(Coord::MAX) {
            return Err(BoardError::TooLarge);
        }

        let mut tiles = Vec::with_capacity(size * size);
        for (row, specs) in self.tiles.iter().enumerate() {
            if specs.len() != size {
                return Err(BoardError::NonSquare {
                    row,
                    len: specs.len(),
                });
            }
            for spec in specs {
                tiles.push(spec.to_tile()?);
            }
        }

        Ok(Array2::from_shape_fn((size, size), |(row, col)| {
            tiles[row * size + col]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const LEVEL: &str = "\
#,#,#,#,#,#
S1,#,#,#,#,#
#,#,#,JT,#,#
#,#,#,#,L,#
#,#,#,#,E3,#
#,#,#,#,#,#
4,3,1,1,1,1
";

    #[test]
    fn parses_compact_level() {
        let level = LevelDefinition::parse_text(LEVEL).unwrap();

        assert_eq!(level.size(), 6);
        assert_eq!(level.tiles[1][0], TileSpec::Start { orientation: 1 });
        assert_eq!(level.tiles[4][4], TileSpec::End { orientation: 3 });
        assert_eq!(level.tiles[3][4], TileSpec::Locked);
        assert_eq!(
            level.tiles[2][3],
            TileSpec::Connector {
                shape: ShapeKind::JunctionT,
                orientation: 0
            }
        );
        assert_eq!(level.inventory[ShapeKind::Straight], 4);
        assert_eq!(level.inventory[ShapeKind::OverUnder], 1);
    }

    #[test]
    fn level_builds_playable_board() {
        let level = LevelDefinition::parse_text(LEVEL).unwrap();
        let mut board = PipeBoard::from_definition(&level).unwrap();

        assert_eq!(board.start_position(), (1, 0));
        assert_eq!(board.end_position(), (4, 4));
        assert_eq!(
            board.tile_at((2, 3)),
            Some(Tile::connector(ShapeKind::JunctionT, 0, false))
        );
        assert_eq!(board.rotate((2, 3), 1), Err(RotationError::NotSelectable));
        assert!(!board.check_win());
    }

    #[test]
    fn tile_codes() {
        assert_eq!(
            "CO2".parse(),
            Ok(TileSpec::Connector {
                shape: ShapeKind::Corner,
                orientation: 2
            })
        );
        assert_eq!(" E ".parse(), Ok(TileSpec::End { orientation: 0 }));
        assert_eq!("ST7".parse::<TileSpec>(), Err(BoardError::InvalidOrientation));
        assert_eq!("ZZ".parse::<TileSpec>(), Err(BoardError::UnknownTileCode));
        assert_eq!("STX".parse::<TileSpec>(), Err(BoardError::UnknownTileCode));
        assert_eq!("S12".parse::<TileSpec>(), Err(BoardError::UnknownTileCode));
        let diagonals = TileSpec::Connector {
            shape: ShapeKind::Diagonals,
            orientation: 1,
        };
        assert_eq!(diagonals.to_string(), "DI1");
    }

    #[test]
    fn malformed_levels_are_rejected() {
        let ragged = "S1,#\n#,E3,#\n1,1,1,1,1,1";
        let level = LevelDefinition::parse_text(ragged).unwrap();
        assert_eq!(
            PipeBoard::from_definition(&level),
            Err(BoardError::NonSquare { row: 1, len: 3 })
        );

        let no_end = "S1,#\n#,#\n1,1,1,1,1,1";
        let level = LevelDefinition::parse_text(no_end).unwrap();
        assert_eq!(
            PipeBoard::from_definition(&level),
            Err(BoardError::MissingAnchor(AnchorKind::End))
        );

        assert_eq!(
            LevelDefinition::parse_text("S1,E3\n#,#\n1,2"),
            Err(BoardError::MissingInventory)
        );
        assert_eq!(
            LevelDefinition::parse_text("S1,QQ\n#,E3\n1,1,1,1,1,1"),
            Err(BoardError::UnknownTileCode)
        );
        assert_eq!(LevelDefinition::parse_text(""), Err(BoardError::MissingInventory));
    }

    #[test]
    fn json_definition_matches_text() {
        let level = LevelDefinition::parse_text(LEVEL).unwrap();
        let json = level.to_json().unwrap();

        assert_eq!(LevelDefinition::from_json(&json), Ok(level));
        assert_eq!(LevelDefinition::from_json("{\"tiles\": 3}"), Err(BoardError::Json));
    }
}
