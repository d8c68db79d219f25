//! Terminal UI rendering with ratatui
//!
//! The playfield is laid out from the classic window geometry: a 768x768
//! pixel window with 32 pixel cells and a 256 pixel side panel left of the
//! grid. Each cell becomes two terminal columns and one terminal row.

use crate::board::{COLS, ROWS};
use crate::game::{GameState, Phase};
use crate::labels::Labels;
use crate::settings::Settings;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub const CELL_SIZE: u16 = 32;
pub const WINDOW_WIDTH: u16 = 768;
pub const WINDOW_HEIGHT: u16 = 768;
/// Width of the side panel left of the grid
pub const BORDER: u16 = 256;

/// Terminal columns per grid cell
const CELL_COLUMNS: u16 = 2;
const PANEL_WIDTH: u16 = BORDER / CELL_SIZE * CELL_COLUMNS;
const BOARD_WIDTH: u16 = COLS as u16 * CELL_COLUMNS + 2;
const GAME_WIDTH: u16 = WINDOW_WIDTH / CELL_SIZE * CELL_COLUMNS + 2;
const GAME_HEIGHT: u16 = WINDOW_HEIGHT / CELL_SIZE + 2;

const _: () = assert!(PANEL_WIDTH + BOARD_WIDTH == GAME_WIDTH);
const _: () = assert!(GAME_HEIGHT as usize == ROWS + 2);

/// Divider between panel and grid
const DIVIDER_COLOR: Color = Color::Rgb(255, 0, 80);
const GRID_COLOR: Color = Color::Rgb(128, 128, 128);

/// Render one frame of the game
pub fn render_game(frame: &mut Frame, game: &GameState, labels: &Labels, settings: &Settings) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // Create main layout: panel | board
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(PANEL_WIDTH),
            Constraint::Length(BOARD_WIDTH),
        ])
        .split(game_area);

    render_panel(frame, main_layout[0], labels);
    render_board(frame, main_layout[1], game, settings);

    match game.phase {
        Phase::Lost => render_overlay(frame, area, "GAME OVER", &format!("Score: {}", game.score.points)),
        Phase::Won => render_overlay(frame, area, "YOU WIN!", "Maximum score"),
        Phase::Playing => {}
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Score and level captions with their values
fn render_panel(frame: &mut Frame, area: Rect, labels: &Labels) {
    // Captions sit roughly where they did in the pixel layout (y = 200..350)
    let top = (200 / CELL_SIZE) as usize;
    let mut lines: Vec<Line> = vec![Line::raw(""); top];
    lines.push(labels.score_caption());
    lines.push(labels.score().clone());
    lines.push(Line::raw(""));
    lines.push(labels.level_caption());
    lines.push(labels.level().clone());

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_board(frame: &mut Frame, area: Rect, game: &GameState, settings: &Settings) {
    let (block_char, empty_char) = settings.visual.block_chars();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GRID_COLOR));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Locked cells first, then the active piece on top
    let mut colors: [[Option<Color>; COLS]; ROWS] = [[None; COLS]; ROWS];
    for (row, col, color) in game.board.filled_cells() {
        colors[row as usize][col as usize] = Some(color);
    }
    if !game.is_over() {
        let color = game.piece.piece_type.color();
        for (row, col) in game.piece.block_positions() {
            if let Some(cell) = colors
                .get_mut(row as usize)
                .and_then(|cells| cells.get_mut(col as usize))
            {
                *cell = Some(color);
            }
        }
    }

    let lines: Vec<Line> = colors
        .iter()
        .map(|cells| {
            let spans: Vec<Span> = cells
                .iter()
                .map(|cell| match cell {
                    Some(color) => Span::styled(block_char, Style::default().fg(*color)),
                    None => Span::styled(empty_char, Style::default().fg(GRID_COLOR).dim()),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);

    // Left edge of the board doubles as the panel divider
    let divider = Rect { width: 1, ..area };
    let bar: Vec<Line> = (0..divider.height)
        .map(|_| Line::styled("│", Style::default().fg(DIVIDER_COLOR)))
        .collect();
    frame.render_widget(Paragraph::new(bar), divider);
}

/// Render an overlay for the end of the game
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 24u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use std::time::Instant;

    fn draw(game: &GameState) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(GAME_WIDTH, GAME_HEIGHT)).unwrap();
        let labels = Labels::new(&game.score);
        let settings = Settings::default();
        terminal
            .draw(|frame| render_game(frame, game, &labels, &settings))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_panel_labels() {
        let game = GameState::with_seed(1, Instant::now());
        let buffer = draw(&game);
        let all = text(&buffer);
        assert!(all.contains("Score:"));
        assert!(all.contains("Level:"));
    }

    #[test]
    fn test_active_piece_drawn_on_top_row() {
        let game = GameState::with_seed(1, Instant::now());
        let buffer = draw(&game);
        // Board border is the first row, grid row 0 is the next
        assert!(row_text(&buffer, 1).contains("██"));
        assert!(!row_text(&buffer, 10).contains("██"));
    }

    #[test]
    fn test_locked_cells_drawn() {
        let mut game = GameState::with_seed(1, Instant::now());
        game.board
            .set(ROWS as i32 - 1, 0, Cell::Filled(Color::Rgb(255, 0, 0)))
            .unwrap();
        let buffer = draw(&game);
        let x = PANEL_WIDTH + 1;
        let cell = &buffer[(x, GAME_HEIGHT - 2)];
        assert_eq!(cell.symbol(), "█");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_game_over_overlay() {
        let mut game = GameState::with_seed(1, Instant::now());
        game.phase = Phase::Lost;
        assert!(text(&draw(&game)).contains("GAME OVER"));
        game.phase = Phase::Won;
        assert!(text(&draw(&game)).contains("YOU WIN!"));
    }
}
