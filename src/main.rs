//! BLOCKFALL - a classic falling-block puzzle
//!
//! A 16x24 playfield, seven pieces, five levels and a million points to win.

mod board;
mod game;
mod input;
mod labels;
mod piece;
mod score;
mod settings;
mod spawner;
mod tetromino;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Action, GameState, Phase};
use input::KeyBindings;
use labels::Labels;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::Path,
    process::ExitCode,
    thread,
    time::{Duration, Instant},
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Pause after the first frame before pieces start falling
const START_DELAY: Duration = Duration::from_secs(1);
/// How long the final frame stays up once the game is decided
const END_DELAY: Duration = Duration::from_secs(1);

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// How the run ended
enum Outcome {
    Quit,
    Finished(Phase),
}

/// Session log file under the blockfall temp directory
fn log_writer(log_dir: &Path, log_file: &str) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(log_file)
        .build(log_dir)
        .with_context(|| format!("failed to open log file in {}", log_dir.display()))
}

fn main() -> ExitCode {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let log_dir = std::env::temp_dir().join("blockfall");
    let log_file = format!("{:08x}.log", session_id);

    // Log to a file so output never lands on the game screen
    let file_appender = match log_writer(&log_dir, &log_file) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("blockfall: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blockfall=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();

    match run(&settings) {
        Ok(outcome) => {
            match outcome {
                Outcome::Quit => tracing::info!("player quit"),
                Outcome::Finished(phase) => tracing::info!(?phase, "game finished"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("fatal: {:#}", e);
            eprintln!("blockfall: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Set up the terminal, play one game and restore the terminal whatever happened
fn run(settings: &Settings) -> Result<Outcome> {
    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            if let Err(teardown) = restore_terminal() {
                tracing::warn!("teardown after failed init: {:#}", teardown);
            }
            return Err(e);
        }
    };

    let result = play(&mut terminal, settings);
    let restored = restore_terminal();

    let outcome = result?;
    restored?;
    Ok(outcome)
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
    terminal.clear().context("failed to clear terminal")?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(stdout(), LeaveAlternateScreen).context("failed to leave alternate screen")?;
    Ok(())
}

/// `BLOCKFALL_SEED` replays the same piece sequence
fn seed_from_env() -> Option<u64> {
    let value = std::env::var("BLOCKFALL_SEED").ok()?;
    match value.trim().parse() {
        Ok(seed) => Some(seed),
        Err(e) => {
            tracing::warn!("ignoring BLOCKFALL_SEED={:?}: {}", value, e);
            None
        }
    }
}

fn play(terminal: &mut Term, settings: &Settings) -> Result<Outcome> {
    let keys = KeyBindings::from_settings(settings);
    let mut game = match seed_from_env() {
        Some(seed) => {
            tracing::info!(seed, "using fixed piece seed");
            GameState::with_seed(seed, Instant::now())
        }
        None => GameState::new(Instant::now()),
    };
    let mut labels = Labels::new(&game.score);

    terminal.draw(|frame| ui::render_game(frame, &game, &labels, settings))?;
    thread::sleep(START_DELAY);
    game.reset_fall_timer(Instant::now());

    loop {
        terminal.draw(|frame| ui::render_game(frame, &game, &labels, settings))?;

        if game.is_over() {
            thread::sleep(END_DELAY);
            return Ok(Outcome::Finished(game.phase));
        }

        // Drain every pending event, waiting at most one frame for the first
        let mut timeout = FRAME_DURATION;
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match keys.action_for(key) {
                Some(Action::Quit) => return Ok(Outcome::Quit),
                Some(action) => game.process_action(action),
                None => {}
            }
        }

        game.update(Instant::now());
        labels.refresh(&game.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_writer_creates_directory() {
        let dir = std::env::temp_dir()
            .join(format!("blockfall-log-{}", std::process::id()))
            .join("nested");
        assert!(log_writer(&dir, "session.log").is_ok());
        assert!(dir.is_dir());
        std::fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_log_writer_reports_unusable_directory() {
        // A regular file where the directory should be
        let blocker = std::env::temp_dir().join(format!("blockfall-blocker-{}", std::process::id()));
        std::fs::write(&blocker, "").unwrap();
        let result = log_writer(&blocker.join("logs"), "session.log");
        std::fs::remove_file(&blocker).unwrap();
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("failed to create log directory"));
    }
}
