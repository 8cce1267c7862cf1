use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mineboard_core::{
    Board, GameConfig, GameStatus, MinefieldGenerator, PressState, RevealOutcome,
};

use command::Command;

mod command;
mod render;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl From<Preset> for GameConfig {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Beginner => GameConfig::BEGINNER,
            Preset::Intermediate => GameConfig::INTERMEDIATE,
            Preset::Expert => GameConfig::EXPERT,
        }
    }
}

/// Minesweeper in the terminal.
///
/// Commands, one per line: `o ROW COL` open, `p ROW COL` press, `l` release, `f ROW COL` flag, `r` restart,
/// `u` dump diagnostics, `q` quit.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Board width in cells
    #[arg(default_value_t = GameConfig::EXPERT.width)]
    width: u8,

    /// Board height in cells
    #[arg(default_value_t = GameConfig::EXPERT.height)]
    height: u8,

    /// Number of mines
    #[arg(default_value_t = GameConfig::EXPERT.mines)]
    mines: u16,

    /// Use a preset board instead of width, height and mines
    #[arg(short, long, value_enum, conflicts_with_all = ["width", "height", "mines"])]
    preset: Option<Preset>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Milliseconds to show a finished board before the next game starts
    #[arg(long, default_value_t = 2000)]
    pause_ms: u64,

    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        match self.preset {
            Some(preset) => Ok(preset.into()),
            None => GameConfig::new(self.width, self.height, self.mines).with_context(|| {
                format!(
                    "Invalid board {}x{} with {} mines",
                    self.width, self.height, self.mines
                )
            }),
        }
    }
}

fn init_logging(filter: log::LevelFilter) {
    use tracing_subscriber::filter::LevelFilter;

    let level = match filter {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter());

    let config = args.game_config()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let mut board = Board::new(config, seed)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    run(
        &mut board,
        stdin.lock(),
        &mut stdout,
        Duration::from_millis(args.pause_ms),
    )
}

/// Reads commands until `q` or end of input, drawing the board after each one that changed it.
fn run<G: MinefieldGenerator>(
    board: &mut Board<G>,
    input: impl BufRead,
    out: &mut impl Write,
    pause: Duration,
) -> Result<()> {
    render::draw(out, board)?;

    for line in input.lines() {
        let line = line.context("Could not read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };
        log::debug!("command: {:?}", command);

        let before = board.status();
        let changed = match command {
            Command::Quit => break,
            Command::Dump => {
                let snapshot = serde_json::to_string(&board.snapshot())?;
                writeln!(out, "{snapshot}")?;
                continue;
            }
            Command::Restart => {
                board.restart();
                true
            }
            // opening would release the held gesture instead of this cell
            Command::Open(_) if *board.press_state() != PressState::Idle => {
                writeln!(out, "Release the pending press first")?;
                continue;
            }
            command => match apply(board, command) {
                Ok(changed) => changed,
                Err(err) => {
                    writeln!(out, "{err}")?;
                    continue;
                }
            },
        };

        let status = board.tick();
        if !changed && status == before {
            log::trace!("Nothing to redraw after {:?}", command);
            continue;
        }
        render::draw(out, board)?;

        if board.is_finished() {
            match status {
                GameStatus::Won => writeln!(out, "You win!")?,
                _ => writeln!(out, "Game over")?,
            }
            thread::sleep(pause);
            board.restart();
            render::draw(out, board)?;
        }
    }

    Ok(())
}

/// Runs a board command, returning whether the display changed.
fn apply<G>(board: &mut Board<G>, command: Command) -> mineboard_core::Result<bool> {
    let outcome = match command {
        Command::Open(coords) => board.press(coords)? | board.release(),
        Command::Press(coords) => board.press(coords)?,
        Command::Release => board.release(),
        Command::Flag(coords) => return Ok(board.toggle_flag(coords)?.has_update()),
        Command::Restart | Command::Dump | Command::Quit => RevealOutcome::NoChange,
    };
    if outcome == RevealOutcome::HitMine {
        log::info!("Mine hit at {:?}", board.triggered_mine());
    }
    Ok(outcome.has_update())
}
