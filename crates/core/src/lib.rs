//! Core simulation - pure, deterministic, and testable
//!
//! This crate holds every rule of the game: block storage, piece movement,
//! board yaw, plane clearing and scoring. It has **no dependencies** on
//! rendering, audio, input devices or storage; those are reached through the
//! traits in [`collab`].
//!
//! # Module Structure
//!
//! - [`grid`]: `width × height × depth` cell storage with plane clearing
//! - [`piece`]: piece shapes, discrete orientation and wall kicks
//! - [`orientation`]: 90° board yaw, its transition and the world/grid mapping
//! - [`scoring`]: plane clear points, combo timing and level progression
//! - [`match_engine`]: tick loop, commands, locking and spawning
//! - [`collab`]: renderer, audio and score store interfaces
//! - [`config`]: TOML-loadable match settings
//! - [`rng`]: seeded LCG used for spawns
//! - [`snapshot`]: serializable view of a match
//!
//! # Game Rules
//!
//! - **Planes**: a complete horizontal layer, depth layer or width layer is
//!   cleared and everything beyond it shifts one cell toward it
//! - **Board turns**: the board yaws in 90° steps; piece input waits while it turns
//! - **Wall kicks**: a blocked rotation tries `+x, -x, +z, -z, +y, -y`
//! - **Game over**: any block locked in the top playable row
//!
//! # Example
//!
//! ```
//! use voxtris_core::{HeadlessMatch, MatchConfig};
//! use voxtris_core::types::{BoardTurn, Command, Direction};
//!
//! let mut game = HeadlessMatch::headless(MatchConfig::default()).unwrap();
//! game.start();
//!
//! game.apply_command(Command::Move(Direction::Left));
//! game.apply_command(Command::RotateBoard(BoardTurn::Clockwise));
//!
//! // Piece input is refused until the board settles
//! assert!(!game.apply_command(Command::Move(Direction::Right)));
//! game.tick(1.0);
//! assert!(!game.orientation().is_transitioning());
//! ```
//!
//! # Timing
//!
//! Time is driven from outside: call [`MatchEngine::tick`] with the elapsed
//! seconds. Gravity starts at 3.0 s per cell; each level-up sets it to
//! `3.0 - 0.1 × level` seconds, never below 0.1 s.

pub mod collab;
pub mod config;
pub mod error;
pub mod grid;
pub mod match_engine;
pub mod orientation;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use voxtris_types as types;

// Re-export commonly used types for convenience
pub use collab::{AudioSink, EventLog, MemoryScoreStore, Renderer, ScoreStore, Silent, VisualTable};
pub use config::MatchConfig;
pub use error::ConfigError;
pub use grid::VoxelGrid;
pub use match_engine::{HeadlessMatch, MatchEngine};
pub use orientation::{BoardOrientation, OrientationState};
pub use piece::{FallStep, Orientation, Piece};
pub use rng::SimpleRng;
pub use scoring::{ClearScore, ScoreEngine};
pub use snapshot::MatchSnapshot;
