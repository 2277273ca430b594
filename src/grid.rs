use log::debug;

use crate::shape::{Color, Piece, Shape};

pub const ROWS: usize = 20;
pub const COLS: usize = 15;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellState {
    Empty,
    Filled(Color),
}

impl CellState {
    /// 0 for empty, otherwise the palette index.
    pub fn index(self) -> u8 {
        match self {
            CellState::Empty => 0,
            CellState::Filled(color) => color.index(),
        }
    }

    pub fn is_empty(self) -> bool {
        self == CellState::Empty
    }
}

/// Settled blocks, `ROWS` rows of `COLS` cells, row 0 at the top.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: Vec<Vec<CellState>>,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: vec![vec![CellState::Empty; COLS]; ROWS],
        }
    }

    pub fn cells(&self) -> &[Vec<CellState>] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> CellState {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: CellState) {
        self.cells[row][col] = cell;
    }

    /// True when any filled cell of `shape` placed at the offset lands left of
    /// column 0, right of the last column, below the last row, or on a settled
    /// block. Cells above row 0 never collide.
    pub fn collides(&self, offset_x: i16, offset_y: i16, shape: &Shape) -> bool {
        shape.filled_cells().any(|(row, col)| {
            let x = offset_x as i32 + col as i32;
            let y = offset_y as i32 + row as i32;
            if x < 0 || x >= COLS as i32 || y >= ROWS as i32 {
                return true;
            }
            y >= 0 && !self.cells[y as usize][x as usize].is_empty()
        })
    }

    /// Writes the piece's color under each of its cells. The caller has
    /// already checked that the position does not collide.
    pub fn lock(&mut self, piece: &Piece) {
        let cell = CellState::Filled(piece.color);
        for block in piece.blocks() {
            if block.y >= 0 && block.y < ROWS as i16 && block.x >= 0 && block.x < COLS as i16 {
                self.cells[block.y as usize][block.x as usize] = cell;
            }
        }
        debug!(
            "locked {:?} at ({}, {})",
            piece.kind, piece.position.x, piece.position.y
        );
    }

    /// Removes every full row, pushing an empty row in at the top for each.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared_count = 0;
        let mut y = 0;

        while y < ROWS {
            if self.is_row_complete(y) {
                self.cells.remove(y);
                self.cells.insert(0, vec![CellState::Empty; COLS]);
                cleared_count += 1;
                // Rows above shifted down into y; re-check it.
            } else {
                y += 1;
            }
        }

        if cleared_count > 0 {
            debug!("cleared {cleared_count} row(s)");
        }
        cleared_count
    }

    pub fn reset(&mut self) {
        for row in &mut self.cells {
            row.fill(CellState::Empty);
        }
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.cells[y].iter().all(|cell| !cell.is_empty())
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.cells[y].iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
