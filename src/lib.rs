//! Weiqi-Rust: a Go (Weiqi) rules engine with a minimax AI.
//!
//! ## Modules
//!
//! - [`constants`] - Board sizes, evaluator weights and search limits
//! - [`board`] - Board grid, groups and liberties
//! - [`position`] - Legality, move application, captures and ko
//! - [`eval`] - Heuristic position evaluation
//! - [`search`] - Random, greedy and alpha-beta move selection
//! - [`engine`] - Game engine with history, AI settings and scheduling
//! - [`gtp`] - Go Text Protocol front-end
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use weiqi_rust::board::BoardSize;
//! use weiqi_rust::engine::{EngineConfig, GoEngine};
//!
//! let mut engine = GoEngine::new(EngineConfig {
//!     size: BoardSize::Nine,
//!     seed: Some(1),
//!     ..EngineConfig::default()
//! });
//!
//! // Play a move
//! engine.place_stone((4, 4)).unwrap();
//!
//! // Ask the AI for a reply
//! let reply = engine.choose_move().unwrap();
//! assert!(engine.position().is_legal(reply));
//! ```

pub mod board;
pub mod constants;
pub mod engine;
pub mod error;
pub mod eval;
pub mod gtp;
pub mod position;
pub mod search;
