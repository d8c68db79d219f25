//! Active falling piece logic
//!
//! Every transform is speculative: apply it, ask the board whether the
//! result collides, and restore the previous cells if it does.

use crate::board::Board;
use crate::tetromino::TetrominoType;

/// Index of the cell every rotation turns around
pub const PIVOT: usize = 1;

/// Outcome of a downward step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fall {
    Moved,
    /// Blocked below; carries the cells from before the step
    Landed([(i32, i32); 4]),
}

/// An active falling piece
#[derive(Debug, Clone)]
pub struct Piece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Absolute (row, col) of each block, row 0 at the top
    cells: [(i32, i32); 4],
}

impl Piece {
    /// Create a new piece at the spawn position
    pub fn new(piece_type: TetrominoType) -> Self {
        Self {
            piece_type,
            cells: piece_type.spawn_cells(),
        }
    }

    /// Get the absolute positions of all 4 blocks
    pub fn block_positions(&self) -> [(i32, i32); 4] {
        self.cells
    }

    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.cells)
    }

    fn try_transform(&mut self, board: &Board, transform: impl Fn((i32, i32)) -> (i32, i32)) -> bool {
        let snapshot = self.cells;
        self.cells = snapshot.map(transform);
        if self.collides(board) {
            self.cells = snapshot;
            false
        } else {
            true
        }
    }

    /// Try to move left, returns true if successful
    pub fn move_left(&mut self, board: &Board) -> bool {
        self.try_transform(board, |(row, col)| (row, col - 1))
    }

    /// Try to move right, returns true if successful
    pub fn move_right(&mut self, board: &Board) -> bool {
        self.try_transform(board, |(row, col)| (row, col + 1))
    }

    /// Step one row down. A blocked step leaves the piece where it was and
    /// reports the cells it should lock at.
    pub fn move_down(&mut self, board: &Board) -> Fall {
        let before = self.cells;
        if self.try_transform(board, |(row, col)| (row + 1, col)) {
            Fall::Moved
        } else {
            Fall::Landed(before)
        }
    }

    /// Quarter turn about the pivot cell: offset (dx, dy) becomes (-dy, dx)
    /// with x to the right and y downward.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let (pivot_row, pivot_col) = self.cells[PIVOT];
        self.try_transform(board, |(row, col)| {
            let (dx, dy) = (col - pivot_col, row - pivot_row);
            (pivot_row + dx, pivot_col - dy)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, COLS, ROWS};
    use ratatui::style::Color;

    const GRAY: Cell = Cell::Filled(Color::Rgb(128, 128, 128));

    fn min_col(piece: &Piece) -> i32 {
        piece.block_positions().iter().map(|&(_, c)| c).min().unwrap()
    }

    fn max_col(piece: &Piece) -> i32 {
        piece.block_positions().iter().map(|&(_, c)| c).max().unwrap()
    }

    fn max_row(piece: &Piece) -> i32 {
        piece.block_positions().iter().map(|&(r, _)| r).max().unwrap()
    }

    #[test]
    fn test_spawn_position() {
        let piece = Piece::new(TetrominoType::T);
        assert_eq!(piece.block_positions(), [(0, 6), (0, 7), (0, 8), (1, 7)]);
    }

    #[test]
    fn test_move_down() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::T);
        assert_eq!(piece.move_down(&board), Fall::Moved);
        assert_eq!(piece.block_positions(), [(1, 6), (1, 7), (1, 8), (2, 7)]);
    }

    #[test]
    fn test_move_down_lands_on_floor() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::O);
        for _ in 0..22 {
            assert_eq!(piece.move_down(&board), Fall::Moved);
        }
        let resting = piece.block_positions();
        assert_eq!(piece.move_down(&board), Fall::Landed(resting));
        assert_eq!(piece.block_positions(), resting);
        assert_eq!(max_row(&piece), ROWS as i32 - 1);
    }

    #[test]
    fn test_move_down_lands_on_stack() {
        let mut board = Board::new();
        board.set(5, 7, GRAY).unwrap();
        let mut piece = Piece::new(TetrominoType::I);
        for _ in 0..4 {
            assert_eq!(piece.move_down(&board), Fall::Moved);
        }
        assert!(matches!(piece.move_down(&board), Fall::Landed(cells) if cells[0] == (4, 6)));
    }

    #[test]
    fn test_horizontal_moves_stop_at_walls() {
        let board = Board::new();
        for kind in TetrominoType::ALL {
            let mut piece = Piece::new(kind);
            piece.move_down(&board);
            piece.move_down(&board);
            while piece.move_left(&board) {}
            assert_eq!(min_col(&piece), 0, "{} left wall", kind.name());
            let at_wall = piece.block_positions();
            assert!(!piece.move_left(&board));
            assert_eq!(piece.block_positions(), at_wall);

            while piece.move_right(&board) {}
            assert_eq!(max_col(&piece), COLS as i32 - 1, "{} right wall", kind.name());
            assert!(!piece.move_right(&board));
        }
    }

    #[test]
    fn test_every_shape_lands_on_bottom_row() {
        let board = Board::new();
        for kind in TetrominoType::ALL {
            let mut piece = Piece::new(kind);
            let landed = loop {
                if let Fall::Landed(cells) = piece.move_down(&board) {
                    break cells;
                }
            };
            assert_eq!(landed.iter().map(|&(r, _)| r).max(), Some(ROWS as i32 - 1));
        }
    }

    #[test]
    fn test_move_blocked_by_locked_cell() {
        let mut board = Board::new();
        board.set(0, 5, GRAY).unwrap();
        let mut piece = Piece::new(TetrominoType::I);
        assert!(!piece.move_left(&board));
        assert_eq!(piece.block_positions(), TetrominoType::I.spawn_cells());
    }

    #[test]
    fn test_rotate_about_pivot_cell() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::T);
        for _ in 0..5 {
            piece.move_down(&board);
        }
        // (5,6) (5,7) (5,8) (6,7) turned a quarter about (5,7)
        assert!(piece.rotate(&board));
        assert_eq!(piece.block_positions(), [(4, 7), (5, 7), (6, 7), (5, 6)]);
    }

    #[test]
    fn test_i_rotates_off_center() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::I);
        for _ in 0..5 {
            piece.move_down(&board);
        }
        assert!(piece.rotate(&board));
        assert_eq!(piece.block_positions(), [(4, 7), (5, 7), (6, 7), (7, 7)]);
    }

    #[test]
    fn test_four_rotations_restore_every_shape() {
        let board = Board::new();
        for kind in TetrominoType::ALL {
            let mut piece = Piece::new(kind);
            for _ in 0..8 {
                piece.move_down(&board);
            }
            let start = piece.block_positions();
            for _ in 0..4 {
                assert!(piece.rotate(&board), "{} rotation blocked", kind.name());
            }
            assert_eq!(piece.block_positions(), start);
        }
    }

    #[test]
    fn test_collision_exactly_when_out_of_range() {
        let board = Board::new();
        let out_of_range =
            |(row, col): (i32, i32)| row < 0 || row >= ROWS as i32 || col < 0 || col >= COLS as i32;

        for kind in TetrominoType::ALL {
            let mut piece = Piece::new(kind);
            for _ in 0..8 {
                piece.move_down(&board);
            }
            for _ in 0..4 {
                let cells = piece.block_positions();
                for dr in -12..=ROWS as i32 {
                    for dc in -12..=COLS as i32 {
                        let shifted = cells.map(|(row, col)| (row + dr, col + dc));
                        let expected = shifted.iter().any(|&cell| out_of_range(cell));
                        assert_eq!(
                            board.collides(&shifted),
                            expected,
                            "{} at {:?}",
                            kind.name(),
                            shifted
                        );
                    }
                }
                assert!(piece.rotate(&board));
            }
        }
    }

    #[test]
    fn test_rotation_above_top_is_rejected() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::I);
        assert!(!piece.rotate(&board));
        assert_eq!(piece.block_positions(), TetrominoType::I.spawn_cells());
    }

    #[test]
    fn test_rotation_into_wall_is_rejected() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::I);
        for _ in 0..5 {
            piece.move_down(&board);
        }
        assert!(piece.rotate(&board));
        while piece.move_right(&board) {}
        // Vertical I at the right wall would stick out past it
        let before = piece.block_positions();
        assert!(!piece.rotate(&board));
        assert_eq!(piece.block_positions(), before);
    }

    #[test]
    fn test_rotation_into_stack_is_rejected() {
        let mut board = Board::new();
        board.set(5, 7, GRAY).unwrap();
        let mut piece = Piece::new(TetrominoType::L);
        for _ in 0..4 {
            assert_eq!(piece.move_down(&board), Fall::Moved);
        }
        // Pivot at (4,7); the cell at (4,8) would swing into (5,7)
        let before = piece.block_positions();
        assert!(!piece.rotate(&board));
        assert_eq!(piece.block_positions(), before);
    }
}
