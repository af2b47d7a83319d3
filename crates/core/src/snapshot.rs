use serde::Serialize;

use crate::types::{GridCoord, Yaw};

/// Read-only view of a match for renderers and the headless driver
///
/// All cells are in board space (grid coordinates).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub yaw: Yaw,
    pub display_yaw: f64,
    pub transitioning: bool,
    pub occupied: Vec<GridCoord>,
    pub active: Vec<GridCoord>,
    pub ghost: Vec<GridCoord>,
    pub score: u64,
    pub level: u32,
    pub planes_cleared: u32,
    pub best_score: u64,
    pub paused: bool,
    pub game_over: bool,
}

impl MatchSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}
