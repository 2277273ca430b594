use rand::Rng;

use crate::grid::COLS;

// ============================================================================
// Palette
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Color {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
}

impl Color {
    pub const ALL: [Color; 7] = [
        Color::Cyan,
        Color::Blue,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Purple,
        Color::Red,
    ];

    /// Palette index, starting at 1. Zero is reserved for an empty cell.
    pub fn index(self) -> u8 {
        match self {
            Color::Cyan => 1,
            Color::Blue => 2,
            Color::Orange => 3,
            Color::Yellow => 4,
            Color::Green => 5,
            Color::Purple => 6,
            Color::Red => 7,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

// ============================================================================
// Shapes
// ============================================================================

/// An immutable, rectangular cell matrix with at least one filled cell.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    /// Builds a shape from 0/1 rows. Panics on ragged or blank input, which
    /// only the fixed catalog and tests ever pass.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty() && !rows[0].is_empty(), "shape must not be empty");
        let width = rows[0].len();
        assert!(rows.iter().all(|row| row.len() == width), "shape must be rectangular");
        let cells: Vec<Vec<bool>> = rows
            .iter()
            .map(|row| row.iter().map(|&c| c != 0).collect())
            .collect();
        assert!(cells.iter().flatten().any(|&c| c), "shape needs a filled cell");
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells[0].len()
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// `(row, col)` of every filled cell, row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|&(_, &filled)| filled)
                .map(move |(col, _)| (row, col))
        })
    }

    /// Quarter turn clockwise: `result[y][x] = self[R-1-x][y]` for a shape of
    /// `R` rows, giving `C` rows of `R` columns.
    pub fn rotated(&self) -> Self {
        let rows = self.rows();
        let cells = (0..self.cols())
            .map(|y| (0..rows).map(|x| self.cells[rows - 1 - x][y]).collect())
            .collect();
        Self { cells }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ShapeKind {
    I,
    T,
    S,
    Z,
    O,
    L,
    J,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::O,
        ShapeKind::L,
        ShapeKind::J,
    ];

    pub fn shape(self) -> Shape {
        match self {
            ShapeKind::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
            ShapeKind::T => Shape::from_rows(&[&[1, 1, 1], &[0, 1, 0]]),
            ShapeKind::S => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
            ShapeKind::Z => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            ShapeKind::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            ShapeKind::L => Shape::from_rows(&[&[1, 1, 1], &[1, 0, 0]]),
            ShapeKind::J => Shape::from_rows(&[&[1, 1, 1], &[0, 0, 1]]),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Every catalog shape in its spawn orientation.
pub fn all_shapes() -> Vec<Shape> {
    ShapeKind::ALL.iter().map(|kind| kind.shape()).collect()
}

// ============================================================================
// Piece
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

/// The falling unit. `position` is the grid offset of the shape's top-left.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: ShapeKind,
    pub shape: Shape,
    pub color: Color,
    pub position: Position,
}

impl Piece {
    /// Horizontally centered on the top row.
    pub fn spawn(kind: ShapeKind, color: Color) -> Self {
        let shape = kind.shape();
        let x = (COLS / 2) as i16 - (shape.cols() / 2) as i16;
        Self {
            kind,
            shape,
            color,
            position: Position { x, y: 0 },
        }
    }

    pub fn new_at(kind: ShapeKind, color: Color, x: i16, y: i16) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            color,
            position: Position { x, y },
        }
    }

    pub fn blocks(&self) -> Vec<Position> {
        self.shape
            .filled_cells()
            .map(|(row, col)| Position {
                x: self.position.x + col as i16,
                y: self.position.y + row as i16,
            })
            .collect()
    }

    pub(crate) fn moved(&self, dx: i16, dy: i16) -> Position {
        Position {
            x: self.position.x + dx,
            y: self.position.y + dy,
        }
    }
}
