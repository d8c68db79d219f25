//! Score, level and fall speed

use std::time::Duration;

/// Points for each cleared line
pub const LINE_AWARD: u32 = 100;
/// A level is gained each time the score lands on a multiple of this.
/// Must stay a multiple of `LINE_AWARD` or level-ups are skipped.
pub const LEVEL_THRESHOLD: u32 = 1000;
pub const MAX_LEVEL: u32 = 5;
/// Reaching this score wins the game
pub const MAX_SCORE: u32 = 1_000_000;
pub const INITIAL_FALL_INTERVAL: Duration = Duration::from_millis(1000);
pub const FALL_INTERVAL_STEP: Duration = Duration::from_millis(184);

const _: () = assert!(LEVEL_THRESHOLD % LINE_AWARD == 0);

/// What a single line award changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Award {
    pub leveled_up: bool,
    pub maxed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub points: u32,
    pub level: u32,
    /// Time between automatic descents
    pub fall_interval: Duration,
    /// Total lines cleared
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            fall_interval: INITIAL_FALL_INTERVAL,
            lines: 0,
        }
    }

    /// Credit one cleared line
    pub fn award_line(&mut self) -> Award {
        let before = self.points;
        self.lines += 1;
        self.points = (self.points + LINE_AWARD).min(MAX_SCORE);

        let mut award = Award {
            leveled_up: false,
            maxed_out: self.is_maxed(),
        };

        let gained = self.points > before;
        if gained && self.points % LEVEL_THRESHOLD == 0 && self.level < MAX_LEVEL {
            self.level += 1;
            self.fall_interval = self.fall_interval.saturating_sub(FALL_INTERVAL_STEP);
            award.leveled_up = true;
        }

        award
    }

    pub fn is_maxed(&self) -> bool {
        self.points >= MAX_SCORE
    }
}
