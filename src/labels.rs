//! Score and level text for the side panel
//!
//! The values are formatted once per change rather than every frame.

use crate::score::Score;
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::Line;

const LABEL_STYLE: Style = Style::new().fg(Color::White);

pub struct Labels {
    score: u32,
    level: u32,
    score_text: Line<'static>,
    level_text: Line<'static>,
    /// How many value lines have been built
    #[cfg(test)]
    builds: usize,
}

impl Labels {
    pub fn new(score: &Score) -> Self {
        let mut labels = Self {
            score: score.points,
            level: score.level,
            score_text: Line::default(),
            level_text: Line::default(),
            #[cfg(test)]
            builds: 0,
        };
        labels.score_text = labels.build(score.points);
        labels.level_text = labels.build(score.level);
        labels
    }

    fn build(&mut self, value: u32) -> Line<'static> {
        #[cfg(test)]
        {
            self.builds += 1;
        }
        Line::styled(value.to_string(), LABEL_STYLE.bold())
    }

    /// Rebuild whichever value changed since the last refresh
    pub fn refresh(&mut self, score: &Score) {
        if score.points != self.score {
            self.score = score.points;
            self.score_text = self.build(score.points);
        }
        if score.level != self.level {
            self.level = score.level;
            self.level_text = self.build(score.level);
        }
    }

    pub fn score_caption(&self) -> Line<'static> {
        Line::styled("Score:", LABEL_STYLE)
    }

    pub fn level_caption(&self) -> Line<'static> {
        Line::styled("Level:", LABEL_STYLE)
    }

    pub fn score(&self) -> &Line<'static> {
        &self.score_text
    }

    pub fn level(&self) -> &Line<'static> {
        &self.level_text
    }
}
