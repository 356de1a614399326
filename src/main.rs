//! Weiqi-Rust: a Go rules engine with a minimax AI.
//!
//! ## Usage
//!
//! - `weiqi-rust` / `weiqi-rust gtp` - Start GTP server for GUI integration
//! - `weiqi-rust selfplay` - Let the AI play both sides
//! - `weiqi-rust demo` - Show a short capture and search demo

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use weiqi_rust::board::{BoardSize, Color, vertex_string};
use weiqi_rust::engine::{AiConfig, AiOutcome, EngineConfig, GoEngine};
use weiqi_rust::gtp::GtpEngine;
use weiqi_rust::search::Strength;

/// Weiqi-Rust: Go rules and alpha-beta AI
#[derive(Parser)]
#[command(name = "weiqi-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Options {
    /// Board size: 9, 13 or 19
    #[arg(long, global = true, default_value_t = 19)]
    size: usize,

    /// Let the AI play black
    #[arg(long, global = true)]
    black_ai: bool,

    /// Let the AI play white
    #[arg(long, global = true)]
    white_ai: bool,

    /// Black AI strength (1-10)
    #[arg(long, global = true, default_value_t = 5)]
    black_strength: u8,

    /// White AI strength (1-10)
    #[arg(long, global = true, default_value_t = 5)]
    white_strength: u8,

    /// Seed for the AI's random choices
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Delay before a scheduled AI move, in milliseconds
    #[arg(long, global = true)]
    delay_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Let the AI play both sides until two passes in a row
    Selfplay {
        /// Stop after this many moves
        #[arg(long, default_value_t = 200)]
        max_moves: usize,
    },
    /// Run a simple demo of the engine
    Demo,
}

impl Options {
    /// Validate the command line into an engine configuration.
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let size = BoardSize::try_from(self.size).context("invalid --size")?;
        let black = Strength::new(self.black_strength).context("invalid --black-strength")?;
        let white = Strength::new(self.white_strength).context("invalid --white-strength")?;
        let mut config = EngineConfig {
            size,
            black: AiConfig {
                enabled: self.black_ai,
                strength: black,
            },
            white: AiConfig {
                enabled: self.white_ai,
                strength: white,
            },
            seed: self.seed,
            ..EngineConfig::default()
        };
        if let Some(ms) = self.delay_ms {
            config.ai_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weiqi_rust=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.options.engine_config()?;

    match cli.command {
        Some(Commands::Gtp) | None => GtpEngine::new(GoEngine::new(config)).run(),
        Some(Commands::Selfplay { max_moves }) => run_selfplay(config, max_moves),
        Some(Commands::Demo) => run_demo(),
    }
}

fn run_selfplay(mut config: EngineConfig, max_moves: usize) -> anyhow::Result<()> {
    config.black.enabled = true;
    config.white.enabled = true;
    let size = config.size.lines();
    let mut engine = GoEngine::new(config);
    let mut passes = 0;

    for n in 1..=max_moves {
        let Some(ticket) = engine.schedule_ai(Instant::now()) else {
            bail!("side to move is not AI-controlled");
        };
        thread::sleep(ticket.due().saturating_duration_since(Instant::now()));

        match engine.fire(&ticket)? {
            AiOutcome::Played(r) => {
                passes = 0;
                println!(
                    "{n:>3}. {} {} (captured {})",
                    r.color,
                    vertex_string(r.point, size),
                    r.captured.len()
                );
            }
            AiOutcome::Passed => {
                passes += 1;
                println!("{n:>3}. {} pass", ticket.side());
                if passes >= 2 {
                    break;
                }
            }
            AiOutcome::Stale => bail!("ticket went stale during self-play"),
        }
    }

    let pos = engine.position();
    println!("\n{}", pos.board);
    println!(
        "captured: black {} white {}",
        pos.captured(Color::Black),
        pos.captured(Color::White)
    );
    info!(moves = engine.history_len(), "self-play finished");
    Ok(())
}

fn run_demo() -> anyhow::Result<()> {
    println!("Weiqi-Rust: Go rules engine with alpha-beta AI\n");

    // Demo 1: capture a lone stone in the center
    println!("=== Capture Demo ===");
    let mut engine = GoEngine::new(EngineConfig {
        size: BoardSize::Nine,
        ..EngineConfig::default()
    });
    for p in [(4, 4), (4, 3), (0, 0), (3, 4), (0, 8), (5, 4), (8, 0)] {
        engine.place_stone(p)?;
    }
    let r = engine.place_stone((4, 5))?;
    println!("White at (4,5) captured {:?}", r.captured);
    println!("{}", engine.board());

    // Demo 2: AI move at high strength
    println!("=== Search Demo ===");
    engine.set_ai_strength(Color::Black, Strength::new(8)?);
    let best = engine.choose_move()?;
    println!("Black's best move: {}", vertex_string(best, engine.board().size()));
    Ok(())
}
