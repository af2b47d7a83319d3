//! Construction-time errors.
//!
//! Rejected moves and rotations are not errors (they return `false`), and
//! contract violations panic. Only bad configuration surfaces here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid {axis} must be at least 1, got {value}")]
    ZeroDimension { axis: &'static str, value: u32 },

    #[error("grid {width}x{height}x{depth} is too large")]
    TooLarge { width: u32, height: u32, depth: u32 },

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("invalid match config: {0}")]
    Toml(#[from] toml::de::Error),
}
