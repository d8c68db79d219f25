//! Core game state and logic

use crate::board::{Board, GridError};
use crate::piece::{Fall, Piece};
use crate::score::Score;
use crate::spawner::Spawner;
use std::time::Instant;

/// Where the game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// A piece locked on the top row
    Lost,
    /// The score reached its maximum
    Won,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Rotate,
    MoveLeft,
    MoveRight,
    MoveDown,
    Quit,
}

/// Everything that changes during play, owned by the game loop
pub struct GameState {
    /// The game board
    pub board: Board,
    /// Current falling piece
    pub piece: Piece,
    spawner: Spawner,
    /// Score tracking
    pub score: Score,
    pub phase: Phase,
    /// Last automatic descent
    last_fall: Instant,
}

impl GameState {
    pub fn new(now: Instant) -> Self {
        Self::with_spawner(Spawner::new(), now)
    }

    /// Reproducible piece sequence
    pub fn with_seed(seed: u64, now: Instant) -> Self {
        Self::with_spawner(Spawner::with_seed(seed), now)
    }

    fn with_spawner(mut spawner: Spawner, now: Instant) -> Self {
        let first = spawner.next();
        tracing::debug!(piece = first.name(), "spawned");
        Self {
            board: Board::new(),
            piece: Piece::new(first),
            spawner,
            score: Score::new(),
            phase: Phase::Playing,
            last_fall: now,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase != Phase::Playing
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        if self.is_over() {
            return;
        }
        match action {
            Action::Rotate => {
                if !self.piece.rotate(&self.board) {
                    tracing::debug!("rotation rejected");
                }
            }
            Action::MoveLeft => {
                self.piece.move_left(&self.board);
            }
            Action::MoveRight => {
                self.piece.move_right(&self.board);
            }
            Action::MoveDown => self.move_down(),
            Action::Quit => {
                // Handled by the main loop
            }
        }
    }

    /// Start the fall interval over, e.g. after a pause outside the game
    pub fn reset_fall_timer(&mut self, now: Instant) {
        self.last_fall = now;
    }

    /// Automatic descent once the fall interval has passed (call every frame)
    pub fn update(&mut self, now: Instant) {
        if self.is_over() {
            return;
        }
        if now.saturating_duration_since(self.last_fall) > self.score.fall_interval {
            self.move_down();
            self.last_fall = now;
        }
    }

    /// Step the piece down, locking it and starting the next drop cycle if it
    /// was blocked
    pub fn move_down(&mut self) {
        if let Fall::Landed(cells) = self.piece.move_down(&self.board) {
            if let Err(err) = self.lock(&cells) {
                // Collision checks keep landed cells inside the grid
                tracing::error!(%err, "locked piece outside the grid");
                self.phase = Phase::Lost;
            }
        }
    }

    /// Commit landed cells, clear lines and spawn the next piece
    fn lock(&mut self, cells: &[(i32, i32); 4]) -> Result<(), GridError> {
        if cells.iter().any(|&(row, _)| row == 0) {
            tracing::info!(points = self.score.points, level = self.score.level, "topped out");
            self.phase = Phase::Lost;
            return Ok(());
        }

        self.board.lock_cells(cells, self.piece.piece_type.color())?;
        tracing::debug!(piece = self.piece.piece_type.name(), ?cells, "locked");

        let cleared = self.board.check_lines();
        let mut won = false;
        for _ in 0..cleared {
            let award = self.score.award_line();
            won |= award.maxed_out;
            if award.leveled_up {
                tracing::info!(
                    level = self.score.level,
                    interval_ms = self.score.fall_interval.as_millis() as u64,
                    "level up"
                );
            }
        }
        if cleared > 0 {
            tracing::info!(
                cleared,
                total = self.score.lines,
                points = self.score.points,
                "lines cleared"
            );
        }

        if won {
            tracing::info!(points = self.score.points, "maximum score reached");
            self.phase = Phase::Won;
            return Ok(());
        }

        let next = self.spawner.next();
        tracing::debug!(piece = next.name(), "spawned");
        self.piece = Piece::new(next);
        Ok(())
    }
}
