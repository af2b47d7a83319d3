//! Board orientation - discrete yaw with an animated transition
//!
//! The board can be turned about the vertical axis in 90° steps. Pieces move in
//! world space; the grid is indexed in board space. Both share `y`, and the
//! horizontal mapping between them depends only on the *logical* yaw.
//!
//! # Coordinate mapping
//!
//! Every yaw case is built from one quarter turn of an `a × b` footprint:
//!
//! ```text
//! (x, z) -> (z, a - 1 - x)        footprint a × b becomes b × a
//! ```
//!
//! `grid_to_world` applies it `k` times for yaw `k · 90°`; `world_to_grid` applies
//! it `(4 - k) mod 4` times starting from the rotated footprint. Four quarter
//! turns are the identity, so the two are exact inverses.
//!
//! # Transition
//!
//! A turn request moves the state to `Transitioning`. The interpolated yaw from
//! [`BoardOrientation::display_yaw_degrees`] is for rendering only; the logical
//! yaw flips atomically when the transition finishes.

use crate::piece::Orientation;
use crate::types::{Axis, BoardTurn, GridCoord, Yaw};

/// One quarter turn of a footprint `a` cells wide
pub fn quarter_turn(c: GridCoord, a: i32) -> GridCoord {
    GridCoord::new(c.z, c.y, a - 1 - c.x)
}

fn turn_times(mut c: GridCoord, times: u8, footprint: (i32, i32)) -> GridCoord {
    let (mut a, mut b) = footprint;
    for _ in 0..times {
        c = quarter_turn(c, a);
        std::mem::swap(&mut a, &mut b);
    }
    c
}

/// `(width, depth)` of the world-space footprint at a yaw
pub fn world_footprint(yaw: Yaw, dims: (i32, i32)) -> (i32, i32) {
    if yaw.quarter_turns() % 2 == 1 {
        (dims.1, dims.0)
    } else {
        dims
    }
}

/// Board space to world space; `dims` is the grid `(width, depth)`
pub fn grid_to_world(g: GridCoord, yaw: Yaw, dims: (i32, i32)) -> GridCoord {
    turn_times(g, yaw.quarter_turns(), dims)
}

/// World space to board space; `dims` is the grid `(width, depth)`
pub fn world_to_grid(w: GridCoord, yaw: Yaw, dims: (i32, i32)) -> GridCoord {
    let k = yaw.quarter_turns();
    turn_times(w, (4 - k) % 4, world_footprint(yaw, dims))
}

/// Linear part of the world-to-world map taking `from` to `to`
pub fn turn_between(from: Yaw, to: Yaw) -> Orientation {
    let delta = to.quarter_turns() as i32 - from.quarter_turns() as i32;
    Orientation::turns(Axis::Y, delta)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrientationState {
    Idle(Yaw),
    Transitioning {
        from: Yaw,
        to: Yaw,
        elapsed: f64,
        duration: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardOrientation {
    state: OrientationState,
    dims: (i32, i32),
    duration: f64,
}

impl BoardOrientation {
    /// `width`/`depth` are the grid dimensions, `duration` the turn time in seconds
    pub fn new(width: i32, depth: i32, duration: f64) -> Self {
        Self {
            state: OrientationState::Idle(Yaw::Deg0),
            dims: (width, depth),
            duration,
        }
    }

    pub fn state(&self) -> OrientationState {
        self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, OrientationState::Transitioning { .. })
    }

    /// Yaw used for coordinate mapping
    pub fn logical_yaw(&self) -> Yaw {
        match self.state {
            OrientationState::Idle(yaw) => yaw,
            OrientationState::Transitioning { from, .. } => from,
        }
    }

    /// Start a turn; ignored while a turn is in flight
    pub fn request_rotate(&mut self, turn: BoardTurn) -> bool {
        let OrientationState::Idle(from) = self.state else {
            return false;
        };
        let to = from.turned(turn.sign());
        log::trace!("board turn {:?} -> {:?}", from, to);
        self.state = OrientationState::Transitioning {
            from,
            to,
            elapsed: 0.0,
            duration: self.duration,
        };
        true
    }

    fn progress(elapsed: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            1.0
        } else {
            elapsed / duration
        }
    }

    /// Advance the transition; returns the new logical yaw when it completes
    pub fn tick(&mut self, dt: f64) -> Option<Yaw> {
        let OrientationState::Transitioning {
            from,
            to,
            elapsed,
            duration,
        } = self.state
        else {
            return None;
        };

        let elapsed = elapsed + dt;
        if Self::progress(elapsed, duration) >= 1.0 {
            log::trace!("board turn settled at {:?}", to);
            self.state = OrientationState::Idle(to);
            return Some(to);
        }
        self.state = OrientationState::Transitioning {
            from,
            to,
            elapsed,
            duration,
        };
        None
    }

    /// Interpolated yaw in degrees, in `[0, 360)`
    pub fn display_yaw_degrees(&self) -> f64 {
        match self.state {
            OrientationState::Idle(yaw) => yaw.degrees(),
            OrientationState::Transitioning {
                from,
                to,
                elapsed,
                duration,
            } => {
                let t = Self::progress(elapsed, duration).min(1.0);
                let sign = if to == from.turned(1) { 1.0 } else { -1.0 };
                (from.degrees() + sign * 90.0 * t).rem_euclid(360.0)
            }
        }
    }

    /// Grid `(width, depth)`
    pub fn dims(&self) -> (i32, i32) {
        self.dims
    }

    pub fn world_footprint(&self) -> (i32, i32) {
        world_footprint(self.logical_yaw(), self.dims)
    }

    pub fn world_to_grid(&self, w: GridCoord) -> GridCoord {
        world_to_grid(w, self.logical_yaw(), self.dims)
    }

    pub fn grid_to_world(&self, g: GridCoord) -> GridCoord {
        grid_to_world(g, self.logical_yaw(), self.dims)
    }

    /// Back to 0° with no transition
    pub fn reset(&mut self) {
        self.state = OrientationState::Idle(Yaw::Deg0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_every_yaw() {
        let dims = (3, 5);
        for yaw in Yaw::ALL {
            for x in 0..dims.0 {
                for z in 0..dims.1 {
                    let g = GridCoord::new(x, 7, z);
                    let w = grid_to_world(g, yaw, dims);
                    let (fw, fd) = world_footprint(yaw, dims);
                    assert!(w.x >= 0 && w.x < fw && w.z >= 0 && w.z < fd, "{:?} {}", yaw, w);
                    assert_eq!(w.y, 7);
                    assert_eq!(world_to_grid(w, yaw, dims), g);
                }
            }
        }
    }

    #[test]
    fn test_half_turn_mirrors_both_axes() {
        let w = grid_to_world(GridCoord::new(0, 0, 1), Yaw::Deg180, (3, 4));
        assert_eq!(w, GridCoord::new(2, 0, 2));
    }

    #[test]
    fn test_request_ignored_while_transitioning() {
        let mut o = BoardOrientation::new(3, 3, 0.5);
        assert!(o.request_rotate(BoardTurn::Clockwise));
        assert!(!o.request_rotate(BoardTurn::CounterClockwise));
        assert_eq!(o.logical_yaw(), Yaw::Deg0);

        assert_eq!(o.tick(0.25), None);
        assert_eq!(o.logical_yaw(), Yaw::Deg0);
        assert_eq!(o.tick(0.25), Some(Yaw::Deg90));
        assert_eq!(o.logical_yaw(), Yaw::Deg90);
        assert!(!o.is_transitioning());
    }

    #[test]
    fn test_display_yaw_interpolates_ccw() {
        let mut o = BoardOrientation::new(3, 3, 1.0);
        o.request_rotate(BoardTurn::CounterClockwise);
        o.tick(0.5);
        assert!((o.display_yaw_degrees() - 315.0).abs() < 1e-9);
        o.tick(0.5);
        assert_eq!(o.logical_yaw(), Yaw::Deg270);
        assert_eq!(o.display_yaw_degrees(), 270.0);
    }

    #[test]
    fn test_zero_duration_settles_on_next_tick() {
        let mut o = BoardOrientation::new(3, 3, 0.0);
        o.request_rotate(BoardTurn::Clockwise);
        assert!(o.is_transitioning());
        assert_eq!(o.tick(0.0), Some(Yaw::Deg90));
    }

    #[test]
    fn test_turn_between_matches_mapping() {
        let dims = (3, 4);
        let a = GridCoord::new(0, 0, 0);
        let b = GridCoord::new(2, 0, 1);
        for from in Yaw::ALL {
            for to in Yaw::ALL {
                let m = |g| grid_to_world(world_to_grid(g, from, dims), to, dims);
                let linear = turn_between(from, to);
                let wa = grid_to_world(a, from, dims);
                let wb = grid_to_world(b, from, dims);
                assert_eq!(m(wb) - m(wa), linear.apply(wb - wa));
            }
        }
    }
}
