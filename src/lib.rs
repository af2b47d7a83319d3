//! voxtris (workspace facade crate).
//!
//! Re-exports the simulation crates under `voxtris::{core,types}` and hosts the
//! headless driver used by the `voxtris` binary.

pub use voxtris_core as core;
pub use voxtris_types as types;

pub mod run;
