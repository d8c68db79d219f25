//! Playfield grid, collision detection and line clearing

use ratatui::style::Color;
use thiserror::Error;

/// Playfield dimensions
pub const ROWS: usize = 24;
pub const COLS: usize = 16;
/// Column of the spawn base (pieces spawn at the top center)
pub const SPAWN_COL: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfRange { row: i32, col: i32 },
}

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    /// Empty cells read as black
    pub fn color(&self) -> Color {
        match self {
            Cell::Empty => Color::Rgb(0, 0, 0),
            Cell::Filled(color) => *color,
        }
    }
}

/// The game board
#[derive(Debug, Clone)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    cells: [[Cell; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    fn index(row: i32, col: i32) -> Result<(usize, usize), GridError> {
        if row < 0 || col < 0 || row >= ROWS as i32 || col >= COLS as i32 {
            return Err(GridError::OutOfRange { row, col });
        }
        Ok((row as usize, col as usize))
    }

    pub fn get(&self, row: i32, col: i32) -> Result<Cell, GridError> {
        let (r, c) = Self::index(row, col)?;
        Ok(self.cells[r][c])
    }

    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> Result<(), GridError> {
        let (r, c) = Self::index(row, col)?;
        self.cells[r][c] = cell;
        Ok(())
    }

    /// True if any cell leaves the playfield or overlaps a locked cell.
    /// Rows above the top edge count as outside.
    pub fn collides(&self, positions: &[(i32, i32)]) -> bool {
        positions
            .iter()
            .any(|&(row, col)| self.get(row, col).map_or(true, |cell| cell.is_filled()))
    }

    /// Write a landed piece into the grid
    pub fn lock_cells(&mut self, positions: &[(i32, i32)], color: Color) -> Result<(), GridError> {
        for &(row, col) in positions {
            self.set(row, col, Cell::Filled(color))?;
        }
        Ok(())
    }

    /// Remove every full row, compacting the rows above it.
    ///
    /// Scans bottom to top and looks at the same index again after each
    /// removal, since the row above has just fallen into it. Returns the
    /// number of rows removed.
    pub fn check_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut row = ROWS;

        while row > 0 {
            row -= 1;
            if self.is_line_full(row) {
                self.gravity(row);
                cleared += 1;
                row += 1;
            }
        }

        cleared
    }

    /// Shift every row above `cleared` down by one and empty the top row
    pub fn gravity(&mut self, cleared: usize) {
        if cleared >= ROWS {
            return;
        }
        self.cells.copy_within(0..cleared, 1);
        self.cells[0] = [Cell::Empty; COLS];
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Occupied cells as (row, col, color), top to bottom
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32, Color)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_filled())
                .map(move |(col, cell)| (row as i32, col as i32, cell.color()))
        })
    }
}

#[cfg(test)]
impl Board {
    /// Number of filled cells in a row
    pub fn row_count(&self, row: usize) -> usize {
        self.cells
            .get(row)
            .map_or(0, |cells| cells.iter().filter(|cell| cell.is_filled()).count())
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| !cell.is_filled()))
    }
}
