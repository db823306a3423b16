//! Network-Rust: an alpha-beta engine for the board game Network.
//!
//! Two players take turns on an 8x8 board, first adding up to ten chips
//! each and then stepping them around, trying to build a network: a chain
//! of six or more connected chips between their two goal edges.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, chip limits and default search depths
//! - [`moves`] - Colors, coordinates, goal areas and moves
//! - [`zobrist`] - Hash keys for incremental position hashing
//! - [`board`] - Board state with exact undo and a live connection graph
//! - [`network`] - Winning-network detection
//! - [`eval`] - Static evaluation
//! - [`tt`] - Transposition table
//! - [`config`] - Search configuration
//! - [`search`] - Iterative-deepening alpha-beta search
//! - [`player`] - Machine player and self-play
//! - [`repl`] - Text command loop
//!
//! ## Example
//!
//! ```
//! use network_rust::config::SearchConfig;
//! use network_rust::moves::{Color, Move};
//! use network_rust::player::MachinePlayer;
//!
//! let mut engine = MachinePlayer::with_config(Color::White, SearchConfig::for_testing());
//! assert!(engine.opponent_move(Move::add(3, 0, Color::Black)));
//! let reply = engine.choose_move().unwrap();
//! println!("engine plays {reply}");
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod eval;
pub mod moves;
pub mod network;
pub mod player;
pub mod repl;
pub mod search;
pub mod tt;
pub mod zobrist;

pub use board::{Board, IllegalMove, MoveGuard, Square};
pub use config::SearchConfig;
pub use moves::{Color, Move, Pos};
pub use player::MachinePlayer;
pub use search::{GameTreeSearch, SearchResult};
