//! Match configuration.
//!
//! Every field has a default matching the original game, so a TOML file only
//! needs the values it overrides:
//!
//! ```
//! use voxtris_core::MatchConfig;
//!
//! let cfg = MatchConfig::from_toml_str("width = 4\ndepth = 4\n").unwrap();
//! assert_eq!((cfg.width, cfg.height, cfg.depth), (4, 10, 4));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    BASE_FALL_INTERVAL, BOARD_TURN_SECONDS, COMBO_WINDOW, DEFAULT_DEPTH, DEFAULT_HEIGHT,
    DEFAULT_WIDTH, FALL_INTERVAL_STEP, MIN_FALL_INTERVAL, QUICK_FALL_MULTIPLIER,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Seconds per row until the first level-up
    pub base_fall_interval: f64,
    /// Seconds removed from the interval per level
    pub fall_interval_step: f64,
    /// Gravity floor in seconds
    pub min_fall_interval: f64,
    pub quick_fall_multiplier: f64,
    pub board_turn_seconds: f64,
    pub combo_window: f64,
    pub seed: u32,
    /// Give half of the spawned pieces a random initial orientation
    pub random_spawn_rotation: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            depth: DEFAULT_DEPTH,
            base_fall_interval: BASE_FALL_INTERVAL,
            fall_interval_step: FALL_INTERVAL_STEP,
            min_fall_interval: MIN_FALL_INTERVAL,
            quick_fall_multiplier: QUICK_FALL_MULTIPLIER,
            board_turn_seconds: BOARD_TURN_SECONDS,
            combo_window: COMBO_WINDOW,
            seed: 1,
            random_spawn_rotation: true,
        }
    }
}

impl MatchConfig {
    /// Config with the given grid size and default timing
    pub fn with_dims(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: MatchConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::grid::check_dims(self.width, self.height, self.depth)?;

        // fall_interval_step may be zero (constant gravity)
        let positive = [
            ("base_fall_interval", self.base_fall_interval),
            ("min_fall_interval", self.min_fall_interval),
            ("quick_fall_multiplier", self.quick_fall_multiplier),
            ("combo_window", self.combo_window),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.fall_interval_step.is_finite() && self.fall_interval_step >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "fall_interval_step",
                value: self.fall_interval_step,
            });
        }
        if !(self.board_turn_seconds.is_finite() && self.board_turn_seconds >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "board_turn_seconds",
                value: self.board_turn_seconds,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = MatchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!((cfg.width, cfg.height, cfg.depth), (3, 10, 3));
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg = MatchConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, MatchConfig::default());
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let err = MatchConfig::from_toml_str("depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDimension { axis: "depth", .. }));
    }

    #[test]
    fn test_negative_dimension_fails_to_parse() {
        let err = MatchConfig::from_toml_str("width = -3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_non_positive_interval_is_rejected() {
        let err = MatchConfig::from_toml_str("min_fall_interval = 0.0").unwrap_err();
        assert!(err.to_string().contains("min_fall_interval"));
    }

    #[test]
    fn test_instant_board_turn_is_allowed() {
        let cfg = MatchConfig::from_toml_str("board_turn_seconds = 0.0").unwrap();
        assert_eq!(cfg.board_turn_seconds, 0.0);
    }
}
