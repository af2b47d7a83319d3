//! Pieces module - shapes, discrete orientation and wall kicks
//!
//! A piece keeps the block offsets it was created with in its own local frame
//! and never rewrites them. Its orientation is one of the 24 axis-aligned
//! rotations, stored as an integer matrix and applied on the way from local to
//! world coordinates, so any sequence of quarter turns stays exact.
//!
//! Validity is always asked of the caller through an `is_free` closure taking
//! a world-space coordinate, the same way `try_rotate` takes `is_valid` for the
//! 2D board. The piece itself knows nothing about grids or board yaw.

use arrayvec::ArrayVec;

use crate::types::{Axis, BlockHandle, GridCoord, PieceKind, MAX_PIECE_BLOCKS};

/// Block positions of one piece
pub type Cells = ArrayVec<GridCoord, MAX_PIECE_BLOCKS>;

const DOWN: GridCoord = GridCoord::new(0, -1, 0);

/// Translations tried, in order, when a rotation does not fit
pub const WALL_KICKS: [GridCoord; 6] = [
    GridCoord::new(1, 0, 0),
    GridCoord::new(-1, 0, 0),
    GridCoord::new(0, 0, 1),
    GridCoord::new(0, 0, -1),
    GridCoord::new(0, 1, 0),
    GridCoord::new(0, -1, 0),
];

const fn c(x: i32, y: i32, z: i32) -> GridCoord {
    GridCoord::new(x, y, z)
}

const SHAPE_I: [GridCoord; 3] = [c(0, 0, 0), c(1, 0, 0), c(2, 0, 0)];
const SHAPE_O: [GridCoord; 4] = [c(0, 0, 0), c(1, 0, 0), c(0, 0, 1), c(1, 0, 1)];
// Centre, left arm, right arm, front arm
const SHAPE_T: [GridCoord; 4] = [c(1, 0, 1), c(0, 0, 1), c(2, 0, 1), c(1, 0, 0)];
const SHAPE_L: [GridCoord; 4] = [c(0, 0, 0), c(1, 0, 0), c(0, 0, 1), c(0, 1, 0)];
const SHAPE_S: [GridCoord; 4] = [c(0, 0, 0), c(1, 0, 0), c(1, 0, 1), c(1, 1, 1)];

/// Local block offsets for a piece kind
pub fn shape_blocks(kind: PieceKind) -> &'static [GridCoord] {
    match kind {
        PieceKind::I => &SHAPE_I,
        PieceKind::O => &SHAPE_O,
        PieceKind::T => &SHAPE_T,
        PieceKind::L => &SHAPE_L,
        PieceKind::S => &SHAPE_S,
    }
}

/// Axis-aligned rotation as an integer 3x3 matrix (rows applied to `(x, y, z)`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation {
    m: [[i32; 3]; 3],
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        m: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    };

    /// One positive quarter turn about a world axis
    ///
    /// - X: `(x, y, z) -> (x, -z, y)`
    /// - Y: `(x, y, z) -> (z, y, -x)`
    /// - Z: `(x, y, z) -> (-y, x, z)`
    pub fn quarter(axis: Axis) -> Self {
        let m = match axis {
            Axis::X => [[1, 0, 0], [0, 0, -1], [0, 1, 0]],
            Axis::Y => [[0, 0, 1], [0, 1, 0], [-1, 0, 0]],
            Axis::Z => [[0, -1, 0], [1, 0, 0], [0, 0, 1]],
        };
        Self { m }
    }

    /// `turns` quarter turns about an axis (negative turns go the other way)
    pub fn turns(axis: Axis, turns: i32) -> Self {
        let q = Self::quarter(axis);
        (0..turns.rem_euclid(4)).fold(Self::IDENTITY, |acc, _| q.then_after(acc))
    }

    /// `self ∘ inner`: apply `inner` first, then `self`
    pub fn then_after(self, inner: Orientation) -> Self {
        let mut m = [[0; 3]; 3];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[r][k] * inner.m[k][c]).sum();
            }
        }
        Self { m }
    }

    pub fn apply(&self, v: GridCoord) -> GridCoord {
        let dot = |r: [i32; 3]| r[0] * v.x + r[1] * v.y + r[2] * v.z;
        GridCoord::new(dot(self.m[0]), dot(self.m[1]), dot(self.m[2]))
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Result of one gravity tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallStep {
    /// Not due yet
    Waiting,
    /// Moved one cell down
    Fell,
    /// Could not move down; the piece is now locked
    Landed,
}

impl FallStep {
    pub fn is_locked(self) -> bool {
        self == FallStep::Landed
    }
}

/// The falling piece
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    kind: Option<PieceKind>,
    blocks: Cells,
    anchor: GridCoord,
    orientation: Orientation,
    handles: ArrayVec<BlockHandle, MAX_PIECE_BLOCKS>,
    fall_timer: f64,
    locked: bool,
}

impl Piece {
    /// Create a piece of a standard kind with its local origin at `anchor`
    pub fn new(kind: PieceKind, anchor: GridCoord) -> Self {
        let mut piece = Self::custom(shape_blocks(kind), anchor);
        piece.kind = Some(kind);
        piece
    }

    /// Create a piece from arbitrary local offsets (1 to 4 blocks)
    pub fn custom(blocks: &[GridCoord], anchor: GridCoord) -> Self {
        assert!(
            !blocks.is_empty() && blocks.len() <= MAX_PIECE_BLOCKS,
            "a piece needs 1..={} blocks, got {}",
            MAX_PIECE_BLOCKS,
            blocks.len()
        );
        Self {
            kind: None,
            blocks: blocks.iter().copied().collect(),
            anchor,
            orientation: Orientation::IDENTITY,
            handles: ArrayVec::new(),
            fall_timer: 0.0,
            locked: false,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn kind(&self) -> Option<PieceKind> {
        self.kind
    }

    pub fn anchor(&self) -> GridCoord {
        self.anchor
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Local offsets as created
    pub fn local_blocks(&self) -> &[GridCoord] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn fall_timer(&self) -> f64 {
        self.fall_timer
    }

    pub fn handles(&self) -> &[BlockHandle] {
        &self.handles
    }

    /// Attach one rendering handle per block, in block order
    pub fn attach_handles(&mut self, handles: &[BlockHandle]) {
        assert_eq!(
            handles.len(),
            self.blocks.len(),
            "renderer must return one handle per block"
        );
        self.handles = handles.iter().copied().collect();
    }

    fn cells_at(&self, anchor: GridCoord, orientation: Orientation) -> Cells {
        self.blocks
            .iter()
            .map(|&b| anchor + orientation.apply(b))
            .collect()
    }

    fn fits(
        &self,
        anchor: GridCoord,
        orientation: Orientation,
        is_free: &impl Fn(GridCoord) -> bool,
    ) -> bool {
        self.cells_at(anchor, orientation).iter().all(|&c| is_free(c))
    }

    /// World positions of every block
    pub fn world_cells(&self) -> Cells {
        self.cells_at(self.anchor, self.orientation)
    }

    /// Whether the current placement is free
    pub fn is_placeable(&self, is_free: impl Fn(GridCoord) -> bool) -> bool {
        self.fits(self.anchor, self.orientation, &is_free)
    }

    fn assert_active(&self) {
        assert!(!self.locked, "operation on a locked piece");
    }

    /// Translate by `delta`; reverts and returns false if any block collides
    pub fn try_move(&mut self, delta: GridCoord, is_free: impl Fn(GridCoord) -> bool) -> bool {
        self.assert_active();
        let target = self.anchor + delta;
        if !self.fits(target, self.orientation, &is_free) {
            return false;
        }
        self.anchor = target;
        true
    }

    /// Rotate 90° about a world axis, trying [`WALL_KICKS`] if needed
    ///
    /// On failure neither the rotation nor any kick translation is kept.
    pub fn try_rotate(&mut self, axis: Axis, is_free: impl Fn(GridCoord) -> bool) -> bool {
        self.assert_active();
        let rotated = Orientation::quarter(axis).then_after(self.orientation);

        let offset = std::iter::once(GridCoord::ZERO)
            .chain(WALL_KICKS)
            .find(|&kick| self.fits(self.anchor + kick, rotated, &is_free));

        match offset {
            Some(kick) => {
                self.anchor = self.anchor + kick;
                self.orientation = rotated;
                true
            }
            None => false,
        }
    }

    /// Where the piece would land if dropped straight down (ghost)
    pub fn soft_drop_projection(&self, is_free: impl Fn(GridCoord) -> bool) -> Cells {
        let mut anchor = self.anchor;
        while self.fits(anchor + DOWN, self.orientation, &is_free) {
            anchor = anchor + DOWN;
        }
        self.cells_at(anchor, self.orientation)
    }

    /// Accumulate fall time; true when a fall is due (the timer restarts)
    pub fn advance_fall_timer(&mut self, dt: f64, fall_interval: f64) -> bool {
        self.assert_active();
        self.fall_timer += dt;
        if self.fall_timer >= fall_interval {
            self.fall_timer = 0.0;
            return true;
        }
        false
    }

    /// Move one cell down, or lock in place when blocked
    pub fn step_down(&mut self, is_free: impl Fn(GridCoord) -> bool) -> FallStep {
        if self.try_move(DOWN, is_free) {
            FallStep::Fell
        } else {
            self.locked = true;
            FallStep::Landed
        }
    }

    /// Gravity: one step down whenever `fall_interval` has elapsed
    pub fn tick_fall(
        &mut self,
        dt: f64,
        fall_interval: f64,
        is_free: impl Fn(GridCoord) -> bool,
    ) -> FallStep {
        if self.advance_fall_timer(dt, fall_interval) {
            self.step_down(is_free)
        } else {
            FallStep::Waiting
        }
    }

    /// Re-express the piece after the world frame turned under it
    ///
    /// `turn` is the linear part of the world-to-world map and `anchor` the
    /// image of the old anchor. Grid cells covered by the piece do not change.
    pub fn reframe(&mut self, anchor: GridCoord, turn: Orientation) {
        self.assert_active();
        self.anchor = anchor;
        self.orientation = turn.then_after(self.orientation);
    }

    /// Translate without a collision check (spawn clamping)
    pub(crate) fn shift(&mut self, delta: GridCoord) {
        self.anchor = self.anchor + delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_box(w: i32, h: i32, d: i32) -> impl Fn(GridCoord) -> bool {
        move |c| c.x >= 0 && c.x < w && c.y >= 0 && c.y < h && c.z >= 0 && c.z < d
    }

    #[test]
    fn test_quarter_turns_have_order_four() {
        for axis in Axis::ALL {
            assert_eq!(Orientation::turns(axis, 4), Orientation::IDENTITY);
            assert_eq!(Orientation::turns(axis, -1), Orientation::turns(axis, 3));
        }
    }

    #[test]
    fn test_quarter_rotation_directions() {
        let x = GridCoord::new(1, 0, 0);
        let y = GridCoord::new(0, 1, 0);
        assert_eq!(Orientation::quarter(Axis::X).apply(y), GridCoord::new(0, 0, 1));
        assert_eq!(Orientation::quarter(Axis::Y).apply(x), GridCoord::new(0, 0, -1));
        assert_eq!(Orientation::quarter(Axis::Z).apply(x), GridCoord::new(0, 1, 0));
    }

    #[test]
    fn test_shapes_have_distinct_blocks() {
        for kind in PieceKind::ALL {
            let blocks = shape_blocks(kind);
            for (i, a) in blocks.iter().enumerate() {
                assert!(!blocks[i + 1..].contains(a), "{:?} repeats {}", kind, a);
            }
        }
    }

    #[test]
    fn test_rotation_preserves_local_blocks() {
        let mut piece = Piece::new(PieceKind::L, GridCoord::new(5, 5, 5));
        let free = in_box(20, 20, 20);
        for axis in [Axis::X, Axis::Y, Axis::Z, Axis::Y] {
            assert!(piece.try_rotate(axis, &free));
        }
        assert_eq!(piece.local_blocks(), shape_blocks(PieceKind::L));
    }

    #[test]
    fn test_rotation_blocked_everywhere_reverts() {
        let mut piece = Piece::new(PieceKind::I, GridCoord::new(0, 0, 0));
        let free = in_box(3, 1, 1);
        let before = piece.clone();
        assert!(!piece.try_rotate(Axis::Y, &free));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_tick_fall_accumulates_then_steps() {
        let mut piece = Piece::custom(&[GridCoord::ZERO], GridCoord::new(0, 2, 0));
        let free = in_box(1, 5, 1);
        assert_eq!(piece.tick_fall(0.4, 1.0, &free), FallStep::Waiting);
        assert_eq!(piece.tick_fall(0.6, 1.0, &free), FallStep::Fell);
        assert_eq!(piece.anchor().y, 1);
        assert_eq!(piece.fall_timer(), 0.0);
    }

    #[test]
    fn test_landing_locks_piece() {
        let mut piece = Piece::custom(&[GridCoord::ZERO], GridCoord::ZERO);
        let free = in_box(1, 5, 1);
        assert!(piece.step_down(&free).is_locked());
        assert!(piece.is_locked());
    }

    #[test]
    #[should_panic(expected = "locked piece")]
    fn test_moving_locked_piece_panics() {
        let mut piece = Piece::custom(&[GridCoord::ZERO], GridCoord::ZERO);
        let free = in_box(1, 5, 1);
        piece.step_down(&free);
        piece.try_move(GridCoord::new(1, 0, 0), &free);
    }

    #[test]
    #[should_panic(expected = "1..=4 blocks")]
    fn test_custom_piece_rejects_empty_shape() {
        Piece::custom(&[], GridCoord::ZERO);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn axis() -> impl Strategy<Value = Axis> {
            prop::sample::select(Axis::ALL.to_vec())
        }

        fn coord() -> impl Strategy<Value = GridCoord> {
            (-5i32..5, -5i32..5, -5i32..5).prop_map(|(x, y, z)| GridCoord::new(x, y, z))
        }

        fn turn_sequence() -> impl Strategy<Value = Vec<(Axis, i32)>> {
            prop::collection::vec((axis(), -8i32..8), 0..12)
        }

        fn compose(seq: &[(Axis, i32)]) -> Orientation {
            seq.iter()
                .fold(Orientation::IDENTITY, |acc, &(a, n)| Orientation::turns(a, n).then_after(acc))
        }

        proptest! {
            #[test]
            fn test_turns_depend_only_on_count_mod_four(a in axis(), n in -12i32..12) {
                prop_assert_eq!(Orientation::turns(a, n), Orientation::turns(a, n.rem_euclid(4)));
                prop_assert_eq!(Orientation::turns(a, n).then_after(Orientation::turns(a, -n)), Orientation::IDENTITY);
            }

            #[test]
            fn test_composition_matches_sequential_application(seq in turn_sequence(), v in coord()) {
                let stepwise = seq.iter().fold(v, |p, &(a, n)| Orientation::turns(a, n).apply(p));
                prop_assert_eq!(compose(&seq).apply(v), stepwise);
            }

            #[test]
            fn test_rotation_keeps_block_distances(seq in turn_sequence(), u in coord(), v in coord()) {
                let o = compose(&seq);
                let d = u - v;
                let rd = o.apply(u) - o.apply(v);
                prop_assert_eq!(d.x * d.x + d.y * d.y + d.z * d.z, rd.x * rd.x + rd.y * rd.y + rd.z * rd.z);
            }
        }
    }
}
