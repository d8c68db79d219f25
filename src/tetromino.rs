//! Tetromino definitions and spawn shapes
//!
//! Every shape is a row of cells along the spawn row plus whatever hangs
//! below it. Cell index 1 is always the rotation pivot.

use crate::board::SPAWN_COL;
use ratatui::style::Color;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Green
    T, // Purple
    Z, // Red
}

/// Shape catalog entry: (row, col) offsets from the spawn base and a color
struct ShapeDef {
    offsets: [(i32, i32); 4],
    color: Color,
}

/// Indexed by `TetrominoType as usize`
const SHAPES: [ShapeDef; 7] = [
    // I: ####
    ShapeDef {
        offsets: [(0, 0), (0, 1), (0, 2), (0, 3)],
        color: Color::Rgb(0, 255, 255),
    },
    // J: ###
    //      #
    ShapeDef {
        offsets: [(0, 0), (0, 1), (0, 2), (1, 2)],
        color: Color::Rgb(0, 0, 255),
    },
    // L: ###
    //    #
    ShapeDef {
        offsets: [(0, 0), (0, 1), (0, 2), (1, 0)],
        color: Color::Rgb(255, 140, 0),
    },
    // O: ##
    //    ##
    ShapeDef {
        offsets: [(0, 0), (0, 1), (1, 0), (1, 1)],
        color: Color::Rgb(255, 255, 0),
    },
    // S:  ##
    //    ##
    ShapeDef {
        offsets: [(0, 0), (0, 1), (1, -1), (1, 0)],
        color: Color::Rgb(0, 255, 0),
    },
    // T: ###
    //     #
    ShapeDef {
        offsets: [(0, 0), (0, 1), (0, 2), (1, 1)],
        color: Color::Rgb(128, 0, 128),
    },
    // Z: ##
    //     ##
    ShapeDef {
        offsets: [(0, 0), (0, 1), (1, 1), (1, 2)],
        color: Color::Rgb(255, 0, 0),
    },
];

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::T,
        TetrominoType::Z,
    ];

    fn def(self) -> &'static ShapeDef {
        &SHAPES[self as usize]
    }

    /// Get the color for this tetromino
    pub fn color(self) -> Color {
        self.def().color
    }

    /// Offsets relative to the spawn base, pivot at index 1
    pub fn offsets(self) -> [(i32, i32); 4] {
        self.def().offsets
    }

    /// Absolute (row, col) cells at the top-center spawn position
    pub fn spawn_cells(self) -> [(i32, i32); 4] {
        self.offsets().map(|(dr, dc)| (dr, SPAWN_COL + dc))
    }

    pub fn name(self) -> &'static str {
        match self {
            TetrominoType::I => "I",
            TetrominoType::J => "J",
            TetrominoType::L => "L",
            TetrominoType::O => "O",
            TetrominoType::S => "S",
            TetrominoType::T => "T",
            TetrominoType::Z => "Z",
        }
    }
}
