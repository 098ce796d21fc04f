use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board size and row/column positions.
pub type Coord = u8;

/// Count type used for hazard counts, stock counts and total-cell counts.
pub type CellCount = u16;

/// Row-major linear index of a cell, `row * size + col`.
pub type CellIndex = usize;

/// Two-dimensional position `(row, col)`.
pub type Position = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// One of the four sides of a cell, in clockwise order starting at the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// The side a piece faces at the given orientation, orientation 0 being north.
    pub const fn from_orientation(orientation: u8) -> Self {
        Self::ALL[(orientation % 4) as usize]
    }

    /// Turns this side clockwise by `steps` quarter turns.
    pub const fn rotated(self, steps: u8) -> Self {
        Self::ALL[((self as u8 + steps % 4) % 4) as usize]
    }

    /// Turns this side counter-clockwise by `steps` quarter turns.
    pub const fn unrotated(self, steps: u8) -> Self {
        self.rotated(4 - steps % 4)
    }

    pub const fn opposite(self) -> Self {
        self.rotated(2)
    }

    /// `(Δrow, Δcol)` of one step out of this side.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }
}

/// The eight directions around a cell used by the reveal game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    const fn row_delta(self) -> i8 {
        use Direction::*;
        match self {
            Up | UpLeft | UpRight => -1,
            Down | DownLeft | DownRight => 1,
            Left | Right => 0,
        }
    }

    const fn col_delta(self) -> i8 {
        use Direction::*;
        match self {
            Left | UpLeft | DownLeft => -1,
            Right | UpRight | DownRight => 1,
            Up | Down => 0,
        }
    }

    /// `(Δrow, Δcol)`, compound directions combine both axes.
    pub const fn delta(self) -> (i8, i8) {
        (self.row_delta(), self.col_delta())
    }
}

/// Coordinate math for a square `size × size` board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    size: Coord,
}

impl Geometry {
    pub const fn new(size: Coord) -> Self {
        Self { size }
    }

    /// Geometry of an existing grid, taken from its row count.
    ///
    /// Only meaningful for square grids of at most `Coord::MAX` rows, larger grids are capped. Use
    /// [`Geometry::of_square`] when the grid has not been validated.
    pub fn of<T>(grid: &Array2<T>) -> Self {
        let rows = grid.dim().0;
        Self::new(rows.try_into().unwrap_or(Coord::MAX))
    }

    /// Geometry of `grid` if it is square and small enough to address with [`Coord`].
    pub fn of_square<T>(grid: &Array2<T>) -> Option<Self> {
        let (rows, cols) = grid.dim();
        if rows != cols {
            return None;
        }
        rows.try_into().ok().map(Self::new)
    }

    pub const fn size(self) -> Coord {
        self.size
    }

    pub const fn total_cells(self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn contains(self, (row, col): Position) -> bool {
        row < self.size && col < self.size
    }

    pub const fn index_of(self, (row, col): Position) -> CellIndex {
        row as CellIndex * self.size as CellIndex + col as CellIndex
    }

    pub fn position_of(self, index: CellIndex) -> Option<Position> {
        let size = CellIndex::from(self.size);
        if size == 0 || index >= size * size {
            return None;
        }
        Some(((index / size).try_into().ok()?, (index % size).try_into().ok()?))
    }

    /// Applies `delta` to `pos`, returning a value only when it remains on the board.
    pub fn offset(self, pos: Position, delta: (i8, i8)) -> Option<Position> {
        let (row, col) = pos;
        let (d_row, d_col) = delta;

        let next_row = row.checked_add_signed(d_row)?;
        if next_row >= self.size {
            return None;
        }

        let next_col = col.checked_add_signed(d_col)?;
        if next_col >= self.size {
            return None;
        }

        Some((next_row, next_col))
    }

    pub fn neighbor(self, index: CellIndex, direction: Direction) -> Option<CellIndex> {
        let pos = self.position_of(index)?;
        self.offset(pos, direction.delta())
            .map(|next| self.index_of(next))
    }

    /// Steps out of `side` of the cell at `pos`.
    ///
    /// Also returns the side of the destination cell that faces back toward `pos`, which is the side a path enters
    /// the destination through.
    pub fn step(self, pos: Position, side: Side) -> Option<(Side, Position)> {
        self.offset(pos, side.delta())
            .map(|next| (side.opposite(), next))
    }

    pub fn neighbors(self, pos: Position) -> NeighborIter {
        NeighborIter::new(pos, self)
    }
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Position,
    geometry: Geometry,
    index: u8,
}

impl NeighborIter {
    fn new(center: Position, geometry: Geometry) -> Self {
        Self {
            center,
            geometry,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let direction = Direction::ALL.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = self.geometry.offset(self.center, direction.delta()) {
                return Some(next_item);
            }
        }
    }
}
