//! Core types module - shared data structures and constants
//!
//! This crate defines the value types used throughout the workspace. They are
//! plain data with no behaviour beyond small conversions, so they can be used by
//! the simulation core, a renderer, or a scripted driver alike.
//!
//! # Grid Dimensions
//!
//! The playfield is a cuboid of `width × height × depth` cells. Above the
//! playable height sit [`OVERFLOW_ROWS`] extra rows used as spawn headroom:
//!
//! - **x**: `0..width` (left to right)
//! - **y**: `0..height + OVERFLOW_ROWS` (bottom to top)
//! - **z**: `0..depth` (back to front)
//!
//! # Timing Defaults
//!
//! All durations are in seconds (`f64`):
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_FALL_INTERVAL` | 3.0 | Gravity until the first level-up |
//! | `FALL_INTERVAL_STEP` | 0.1 | Interval reduction per level |
//! | `MIN_FALL_INTERVAL` | 0.1 | Gravity floor |
//! | `QUICK_FALL_MULTIPLIER` | 5.0 | Quick fall is 5x faster |
//! | `BOARD_TURN_SECONDS` | 0.35 | Board rotation animation length |
//! | `COMBO_WINDOW` | 3.0 | Time window for consecutive-clear bonus |
//!
//! # Examples
//!
//! ```
//! use voxtris_types::{Command, Direction, GridCoord, PieceKind, Yaw};
//!
//! let piece = PieceKind::from_str("l").unwrap();
//! assert_eq!(piece, PieceKind::L);
//!
//! assert_eq!(Yaw::Deg270.turned(1), Yaw::Deg0);
//!
//! let cmd = Command::from_str("moveLeft").unwrap();
//! assert_eq!(cmd, Command::Move(Direction::Left));
//!
//! let c = GridCoord::new(1, 2, 3) + Direction::Down.delta();
//! assert_eq!(c, GridCoord::new(1, 1, 3));
//! ```

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Rows of spawn headroom stored above the playable height
pub const OVERFLOW_ROWS: i32 = 3;

/// Default grid width (the original game ships a 3×10×3 well)
pub const DEFAULT_WIDTH: u32 = 3;

/// Default playable grid height
pub const DEFAULT_HEIGHT: u32 = 10;

/// Default grid depth
pub const DEFAULT_DEPTH: u32 = 3;

/// Fall interval from match start to the first level-up, in seconds
pub const BASE_FALL_INTERVAL: f64 = 3.0;

/// Fall interval reduction per level, in seconds
pub const FALL_INTERVAL_STEP: f64 = 0.1;

/// Fall interval floor, in seconds
pub const MIN_FALL_INTERVAL: f64 = 0.1;

/// Quick fall divides the fall interval by this factor
pub const QUICK_FALL_MULTIPLIER: f64 = 5.0;

/// Length of the board rotation animation, in seconds
pub const BOARD_TURN_SECONDS: f64 = 0.35;

/// Consecutive clears inside this window earn a time bonus, in seconds
pub const COMBO_WINDOW: f64 = 3.0;

/// Planes needed per level: the level goes up once `total >= level * PLANES_PER_LEVEL`
pub const PLANES_PER_LEVEL: u32 = 5;

/// Maximum number of blocks in a piece
pub const MAX_PIECE_BLOCKS: usize = 4;

/// Plane clear scoring table
///
/// Base points for clearing N planes in one placement (N capped at 4):
/// - 0 planes: 0 points
/// - 1 plane: 100 points
/// - 2 planes: 300 points
/// - 3 planes: 700 points
/// - 4+ planes: 1500 points
///
/// Points are multiplied by the level, the time bonus and the combo multiplier.
pub const PLANE_SCORES: [u32; 5] = [0, 100, 300, 700, 1500];

/// Integer cell coordinate
///
/// Used both for grid indices and for world-space piece positions; the two only
/// differ by the board yaw (see `voxtris_core::orientation`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    pub const ZERO: GridCoord = GridCoord { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component along an axis
    pub fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Copy with one component replaced
    pub fn with(self, axis: Axis, value: i32) -> Self {
        match axis {
            Axis::X => Self { x: value, ..self },
            Axis::Y => Self { y: value, ..self },
            Axis::Z => Self { z: value, ..self },
        }
    }
}

impl Add for GridCoord {
    type Output = GridCoord;

    fn add(self, rhs: GridCoord) -> GridCoord {
        GridCoord::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for GridCoord {
    type Output = GridCoord;

    fn sub(self, rhs: GridCoord) -> GridCoord {
        GridCoord::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for GridCoord {
    type Output = GridCoord;

    fn neg(self) -> GridCoord {
        GridCoord::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// World axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Parse axis from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Player movement directions (world space)
///
/// There is no `Up`: pieces only rise through wall kicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Forward,
    Back,
    Down,
}

impl Direction {
    /// Unit vector for this direction
    ///
    /// ```
    /// use voxtris_types::{Direction, GridCoord};
    ///
    /// assert_eq!(Direction::Forward.delta(), GridCoord::new(0, 0, 1));
    /// assert_eq!(Direction::Down.delta(), GridCoord::new(0, -1, 0));
    /// ```
    pub fn delta(self) -> GridCoord {
        match self {
            Direction::Left => GridCoord::new(-1, 0, 0),
            Direction::Right => GridCoord::new(1, 0, 0),
            Direction::Forward => GridCoord::new(0, 0, 1),
            Direction::Back => GridCoord::new(0, 0, -1),
            Direction::Down => GridCoord::new(0, -1, 0),
        }
    }
}

/// Board rotation direction
///
/// - **Clockwise**: yaw increases by 90°
/// - **CounterClockwise**: yaw decreases by 90°
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardTurn {
    Clockwise,
    CounterClockwise,
}

impl BoardTurn {
    /// +1 for clockwise, -1 for counter-clockwise
    pub fn sign(self) -> i32 {
        match self {
            BoardTurn::Clockwise => 1,
            BoardTurn::CounterClockwise => -1,
        }
    }
}

/// Discrete board yaw
///
/// The cycle goes: 0° → 90° → 180° → 270° → 0°
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Yaw {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Yaw {
    pub const ALL: [Yaw; 4] = [Yaw::Deg0, Yaw::Deg90, Yaw::Deg180, Yaw::Deg270];

    /// Number of clockwise quarter turns from 0°
    pub fn quarter_turns(self) -> u8 {
        match self {
            Yaw::Deg0 => 0,
            Yaw::Deg90 => 1,
            Yaw::Deg180 => 2,
            Yaw::Deg270 => 3,
        }
    }

    pub fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Yaw::Deg0,
            1 => Yaw::Deg90,
            2 => Yaw::Deg180,
            _ => Yaw::Deg270,
        }
    }

    /// Yaw after `quarters` additional quarter turns (may be negative)
    ///
    /// ```
    /// use voxtris_types::Yaw;
    ///
    /// assert_eq!(Yaw::Deg0.turned(-1), Yaw::Deg270);
    /// assert_eq!(Yaw::Deg90.turned(2), Yaw::Deg270);
    /// ```
    pub fn turned(self, quarters: i32) -> Self {
        Self::from_quarter_turns(self.quarter_turns() as i32 + quarters)
    }

    pub fn degrees(self) -> f64 {
        self.quarter_turns() as f64 * 90.0
    }
}

/// The five piece kinds
///
/// - **I**: 3-block straight bar
/// - **O**: 2x2 flat square
/// - **T**: flat cross of four (centre, two arms, one front arm)
/// - **L**: 3D corner
/// - **S**: 3D zigzag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    S,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [PieceKind::I, PieceKind::O, PieceKind::T, PieceKind::L, PieceKind::S];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use voxtris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("S"), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_str("z"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "l" => Some(PieceKind::L),
            "s" => Some(PieceKind::S),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::L => "l",
            PieceKind::S => "s",
        }
    }
}

/// Plane families of the grid
///
/// - **Horizontal**: XZ layers at a fixed `y`
/// - **Depth**: XY layers at a fixed `z`
/// - **Width**: YZ layers at a fixed `x`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneAxis {
    Horizontal,
    Depth,
    Width,
}

impl PlaneAxis {
    /// Clear-detection order used after every placement
    pub const ALL: [PlaneAxis; 3] = [PlaneAxis::Horizontal, PlaneAxis::Depth, PlaneAxis::Width];

    /// The coordinate axis held fixed by planes of this family
    pub fn normal(self) -> Axis {
        match self {
            PlaneAxis::Horizontal => Axis::Y,
            PlaneAxis::Depth => Axis::Z,
            PlaneAxis::Width => Axis::X,
        }
    }
}

/// One plane: a family plus the fixed coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plane {
    pub axis: PlaneAxis,
    pub index: i32,
}

impl Plane {
    pub const fn horizontal(y: i32) -> Self {
        Self { axis: PlaneAxis::Horizontal, index: y }
    }

    pub const fn depth(z: i32) -> Self {
        Self { axis: PlaneAxis::Depth, index: z }
    }

    pub const fn width(x: i32) -> Self {
        Self { axis: PlaneAxis::Width, index: x }
    }

    pub fn contains(&self, c: GridCoord) -> bool {
        c.get(self.axis.normal()) == self.index
    }
}

/// Opaque reference to a renderable block owned by the renderer
///
/// The core never looks inside; it only stores handles and forwards them back
/// to the renderer on move and destroy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockHandle(pub u32);

/// Input commands
///
/// These are delivered by whatever input layer drives the match. Each command
/// maps to one game mechanic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the piece one cell in world space (down locks when blocked)
    Move(Direction),
    /// Rotate the piece 90° about a world axis
    Rotate(Axis),
    /// Turn the whole board by 90°
    RotateBoard(BoardTurn),
    /// Enable or disable quick fall
    QuickFall(bool),
    /// Toggle pause state
    Pause,
    /// Restart the match
    Restart,
}

impl Command {
    /// Parse command from string (case-insensitive)
    ///
    /// ```
    /// use voxtris_types::{Axis, BoardTurn, Command};
    ///
    /// assert_eq!(Command::from_str("rotateY"), Some(Command::Rotate(Axis::Y)));
    /// assert_eq!(Command::from_str("turnBoardCcw"), Some(Command::RotateBoard(BoardTurn::CounterClockwise)));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::Move(Direction::Left)),
            "moveright" => Some(Command::Move(Direction::Right)),
            "moveforward" => Some(Command::Move(Direction::Forward)),
            "moveback" => Some(Command::Move(Direction::Back)),
            "movedown" => Some(Command::Move(Direction::Down)),
            "rotatex" => Some(Command::Rotate(Axis::X)),
            "rotatey" => Some(Command::Rotate(Axis::Y)),
            "rotatez" => Some(Command::Rotate(Axis::Z)),
            "turnboardcw" => Some(Command::RotateBoard(BoardTurn::Clockwise)),
            "turnboardccw" => Some(Command::RotateBoard(BoardTurn::CounterClockwise)),
            "quickfallon" => Some(Command::QuickFall(true)),
            "quickfalloff" => Some(Command::QuickFall(false)),
            "pause" => Some(Command::Pause),
            "restart" => Some(Command::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Move(Direction::Left) => "moveLeft",
            Command::Move(Direction::Right) => "moveRight",
            Command::Move(Direction::Forward) => "moveForward",
            Command::Move(Direction::Back) => "moveBack",
            Command::Move(Direction::Down) => "moveDown",
            Command::Rotate(Axis::X) => "rotateX",
            Command::Rotate(Axis::Y) => "rotateY",
            Command::Rotate(Axis::Z) => "rotateZ",
            Command::RotateBoard(BoardTurn::Clockwise) => "turnBoardCw",
            Command::RotateBoard(BoardTurn::CounterClockwise) => "turnBoardCcw",
            Command::QuickFall(true) => "quickFallOn",
            Command::QuickFall(false) => "quickFallOff",
            Command::Pause => "pause",
            Command::Restart => "restart",
        }
    }
}

/// Discrete events for audio and other listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    Locked,
    Cleared { planes: u32 },
    GameOver,
}

/// Core-side summary of the last placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEvent {
    pub planes_cleared: u32,
    pub awarded: u64,
    pub level: u32,
    pub level_up: bool,
    pub game_over: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_defaults_match_original_game() {
        assert_eq!(BASE_FALL_INTERVAL, 3.0);
        assert_eq!(FALL_INTERVAL_STEP, 0.1);
        assert_eq!(MIN_FALL_INTERVAL, 0.1);
        assert_eq!(QUICK_FALL_MULTIPLIER, 5.0);
        assert_eq!(COMBO_WINDOW, 3.0);
        assert_eq!(OVERFLOW_ROWS, 3);
        assert_eq!(PLANE_SCORES, [0, 100, 300, 700, 1500]);
    }

    #[test]
    fn test_command_string_roundtrip() {
        let all = [
            "moveLeft",
            "moveRight",
            "moveForward",
            "moveBack",
            "moveDown",
            "rotateX",
            "rotateY",
            "rotateZ",
            "turnBoardCw",
            "turnBoardCcw",
            "quickFallOn",
            "quickFallOff",
            "pause",
            "restart",
        ];
        for s in all {
            let cmd = Command::from_str(s).unwrap();
            assert_eq!(cmd.as_str(), s);
        }
    }

    #[test]
    fn test_yaw_wraps_both_ways() {
        for yaw in Yaw::ALL {
            assert_eq!(yaw.turned(4), yaw);
            assert_eq!(yaw.turned(1).turned(-1), yaw);
        }
        assert_eq!(Yaw::Deg180.degrees(), 180.0);
    }

    #[test]
    fn test_plane_contains_uses_normal_axis() {
        let c = GridCoord::new(2, 5, 1);
        assert!(Plane::horizontal(5).contains(c));
        assert!(Plane::depth(1).contains(c));
        assert!(Plane::width(2).contains(c));
        assert!(!Plane::width(5).contains(c));
    }
}
