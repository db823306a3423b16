//! Network-Rust command line.
//!
//! ## Usage
//!
//! - `network-rust` - Show a demo
//! - `network-rust play` - Play against the engine over stdin/stdout
//! - `network-rust selfplay` - Let the engine play itself
//! - `network-rust demo` - Walk through a few board features

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use network_rust::config::SearchConfig;
use network_rust::constants::{ADD_DEPTH, STEP_DEPTH};
use network_rust::moves::{Color, Move};
use network_rust::player::{play_game, MachinePlayer};
use network_rust::repl::CommandLoop;
use network_rust::Board;

/// Network-Rust: an alpha-beta engine for the game Network
#[derive(Parser)]
#[command(name = "network-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Search depth while the engine is still adding chips
    #[arg(long, default_value_t = ADD_DEPTH)]
    add_depth: u32,

    /// Search depth once all ten chips are placed
    #[arg(long, default_value_t = STEP_DEPTH)]
    step_depth: u32,

    /// Wall-clock limit per move in milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Seed for the opening move
    #[arg(long)]
    seed: Option<u64>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the engine using text commands
    Play {
        /// Color the engine plays
        #[arg(long, default_value = "white")]
        engine: Color,
    },
    /// Let two engines play each other
    Selfplay {
        /// Maximum number of moves before calling a draw
        #[arg(long, default_value_t = 200)]
        max_moves: usize,
    },
    /// Run a short demo
    Demo,
}

impl Cli {
    fn search_config(&self) -> SearchConfig {
        SearchConfig {
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            seed: self.seed,
            ..SearchConfig::with_depths(self.add_depth, self.step_depth)
        }
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let config = cli.search_config();

    match cli.command {
        Some(Commands::Play { engine }) => {
            let mut repl = CommandLoop::new(engine, config);
            repl.run(io::stdin().lock(), io::stdout().lock())?;
        }
        Some(Commands::Selfplay { max_moves }) => run_selfplay(config, max_moves),
        Some(Commands::Demo) | None => run_demo(config),
    }
    Ok(())
}

fn run_selfplay(config: SearchConfig, max_moves: usize) {
    let mut black = MachinePlayer::with_config(Color::Black, config.clone());
    let white_config = SearchConfig {
        seed: config.seed.map(|s| s.wrapping_add(1)),
        ..config
    };
    let mut white = MachinePlayer::with_config(Color::White, white_config);

    let record = play_game(&mut black, &mut white, max_moves);
    for (i, mv) in record.moves.iter().enumerate() {
        println!("{:3}. {mv}", i + 1);
    }
    println!("{}", black.board());
    match record.winner {
        Some(color) => println!("{color} wins after {} moves", record.moves.len()),
        None => println!("no winner after {} moves", record.moves.len()),
    }
}

fn run_demo(config: SearchConfig) {
    println!("Network-Rust: alpha-beta engine for Network\n");

    println!("=== Board Demo ===");
    let mut board = Board::new();
    for (x, y) in [(6, 0), (3, 5), (5, 5), (6, 5), (5, 7)] {
        board.apply_move(&Move::add(x, y, Color::Black));
    }
    board.apply_move(&Move::add(4, 5, Color::White));
    println!("{board}");
    let corner = Move::add(0, 0, Color::Black);
    if let Err(reason) = board.check_move(&corner) {
        println!("{corner}: {reason}");
    }

    println!("\n=== Search Demo ===");
    let mut player = MachinePlayer::with_config(Color::Black, SearchConfig {
        randomize_opening: false,
        ..config
    });
    for (x, y) in [(6, 0), (3, 5), (5, 5), (6, 5), (5, 7)] {
        player.force_move(Move::add(x, y, Color::Black));
    }
    player.opponent_move(Move::add(4, 5, Color::White));
    match player.choose_move() {
        Some(mv) => println!("Black plays {mv}"),
        None => println!("Black has no move"),
    }
    if let Some(result) = player.last_search() {
        println!(
            "depth {} score {:.3} nodes {} table hits {}",
            result.depth, result.score, result.stats.nodes, result.stats.table.hits
        );
    }
    println!("Black network: {}", player.board().has_network(Color::Black));
}
