//! Scoring module - plane clear points, combo timing and level progression
//!
//! Points for one placement:
//!
//! ```text
//! awarded = round(PLANE_SCORES[min(count, 4)] * level * time_bonus * combo)
//! time_bonus = max(1, 2 - elapsed / combo_window)   (only inside the window)
//! combo      = 1 + 0.1 * consecutive
//! ```
//!
//! Rounding is half-to-even. The level starts at 1 and goes up by one whenever
//! the running plane total reaches `level * PLANES_PER_LEVEL`.

use crate::config::MatchConfig;
use crate::types::{PLANES_PER_LEVEL, PLANE_SCORES};

/// Outcome of one `on_planes_cleared` call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClearScore {
    pub awarded: u64,
    pub time_bonus: f64,
    pub combo_multiplier: f64,
    pub consecutive: u32,
    pub level_up: bool,
}

/// Base points for clearing `count` planes at once
pub fn base_points(count: u32) -> u32 {
    PLANE_SCORES[count.min(4) as usize]
}

/// Gravity interval for a level
pub fn fall_interval(level: u32, config: &MatchConfig) -> f64 {
    (config.base_fall_interval - level as f64 * config.fall_interval_step)
        .max(config.min_fall_interval)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEngine {
    score: u64,
    planes_cleared: u32,
    level: u32,
    consecutive: u32,
    last_clear_time: Option<f64>,
    combo_window: f64,
}

impl ScoreEngine {
    pub fn new(combo_window: f64) -> Self {
        Self {
            score: 0,
            planes_cleared: 0,
            level: 1,
            consecutive: 0,
            last_clear_time: None,
            combo_window,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn planes_cleared(&self) -> u32 {
        self.planes_cleared
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn last_clear_time(&self) -> Option<f64> {
        self.last_clear_time
    }

    /// Score one placement that cleared `count` planes at time `now` (seconds)
    ///
    /// `level` scales the points; progression always advances this engine's own
    /// level. A call with `count == 0` changes nothing.
    pub fn on_planes_cleared(&mut self, count: u32, level: u32, now: f64) -> ClearScore {
        if count == 0 {
            return ClearScore::default();
        }

        let within_window = match self.last_clear_time {
            Some(last) => now - last < self.combo_window,
            None => false,
        };
        let time_bonus = match self.last_clear_time {
            Some(last) if within_window => (2.0 - (now - last) / self.combo_window).max(1.0),
            _ => 1.0,
        };
        if within_window {
            self.consecutive += 1;
        } else {
            self.consecutive = 1;
        }

        let combo_multiplier = 1.0 + 0.1 * self.consecutive as f64;
        let raw = base_points(count) as f64 * level as f64 * time_bonus * combo_multiplier;
        let awarded = raw.round_ties_even() as u64;

        self.score += awarded;
        self.planes_cleared += count;
        self.last_clear_time = Some(now);

        let level_up = self.planes_cleared >= self.level * PLANES_PER_LEVEL;
        if level_up {
            self.level += 1;
        }

        ClearScore {
            awarded,
            time_bonus,
            combo_multiplier,
            consecutive: self.consecutive,
            level_up,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.combo_window);
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(crate::types::COMBO_WINDOW)
    }
}
