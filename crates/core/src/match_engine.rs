//! Match engine - owns the grid, the falling piece and the board yaw
//!
//! # Tick order
//!
//! Every call to [`MatchEngine::tick`] runs the same sequence:
//!
//! 1. Nothing happens unless the match is started, unpaused and not over.
//! 2. While the board is turning the piece is frozen. Its fall timer still
//!    runs, and a fall that comes due is remembered as *pending*.
//! 3. Otherwise gravity runs normally and may lock the piece.
//! 4. The board transition advances. When it settles, the piece is carried
//!    along so that it covers the same grid cells under the new yaw.
//! 5. A pending fall is applied exactly once as soon as the board is idle.
//!
//! # Locking
//!
//! Blocks are stored at their grid coordinates, complete planes are cleared
//! family by family (horizontal, depth, width), the clear count is scored, and
//! the top playable row is checked for game over before the next spawn.

use log::{debug, info, warn};

use crate::collab::{AudioSink, EventLog, MemoryScoreStore, Renderer, ScoreStore, VisualTable};
use crate::config::MatchConfig;
use crate::error::ConfigError;
use crate::grid::VoxelGrid;
use crate::orientation::{self, BoardOrientation};
use crate::piece::{FallStep, Piece};
use crate::rng::SimpleRng;
use crate::scoring::{fall_interval, ScoreEngine};
use crate::snapshot::MatchSnapshot;
use crate::types::{Axis, Command, Direction, GridCoord, LockEvent, PlaneAxis, Yaw};

/// Engine with in-memory collaborators
pub type HeadlessMatch = MatchEngine<VisualTable, EventLog, MemoryScoreStore>;

/// Free-cell test in world space under the current logical yaw
fn probe<'a>(
    grid: &'a VoxelGrid,
    orientation: &'a BoardOrientation,
) -> impl Fn(GridCoord) -> bool + 'a {
    move |w| grid.is_free(orientation.world_to_grid(w))
}

pub struct MatchEngine<R: Renderer, A: AudioSink, S: ScoreStore> {
    config: MatchConfig,
    grid: VoxelGrid,
    orientation: BoardOrientation,
    scores: ScoreEngine,
    active: Option<Piece>,
    rng: SimpleRng,
    renderer: R,
    audio: A,
    store: S,
    /// Gravity interval for the current level
    fall_interval: f64,
    quick_fall: bool,
    /// A fall came due while the board was turning
    pending_fall: bool,
    /// Match time in seconds (advances only while playing)
    clock: f64,
    /// Best score as last read from or written to the store
    best_score: u64,
    last_event: Option<LockEvent>,
    started: bool,
    paused: bool,
    game_over: bool,
}

impl HeadlessMatch {
    pub fn headless(config: MatchConfig) -> Result<Self, ConfigError> {
        Self::new(
            config,
            VisualTable::new(),
            EventLog::new(),
            MemoryScoreStore::default(),
        )
    }
}

impl<R: Renderer, A: AudioSink, S: ScoreStore> MatchEngine<R, A, S> {
    /// Validate the config and build an idle match; call [`start`](Self::start) to play
    pub fn new(config: MatchConfig, renderer: R, audio: A, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = VoxelGrid::new(config.width, config.height, config.depth)?;
        let orientation = BoardOrientation::new(
            grid.width(),
            grid.depth(),
            config.board_turn_seconds,
        );
        let scores = ScoreEngine::new(config.combo_window);
        // Base speed until the first level-up
        let fall_interval = config.base_fall_interval;

        Ok(Self {
            rng: SimpleRng::new(config.seed),
            config,
            grid,
            orientation,
            scores,
            active: None,
            renderer,
            audio,
            store,
            fall_interval,
            quick_fall: false,
            pending_fall: false,
            clock: 0.0,
            best_score: 0,
            last_event: None,
            started: false,
            paused: false,
            game_over: false,
        })
    }

    /// Start the match, spawning a piece unless one was inserted beforehand
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        if self.active.is_none() {
            self.spawn_next();
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Direct grid access (for scripted setups)
    pub fn grid_mut(&mut self) -> &mut VoxelGrid {
        &mut self.grid
    }

    pub fn orientation(&self) -> &BoardOrientation {
        &self.orientation
    }

    pub fn scores(&self) -> &ScoreEngine {
        &self.scores
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn quick_fall(&self) -> bool {
        self.quick_fall
    }

    pub fn pending_fall(&self) -> bool {
        self.pending_fall
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Gravity interval, ignoring quick fall
    ///
    /// Starts at `base_fall_interval` and is recomputed on each level-up.
    pub fn fall_interval(&self) -> f64 {
        self.fall_interval
    }

    /// Gravity interval in effect right now
    pub fn effective_fall_interval(&self) -> f64 {
        if self.quick_fall {
            self.fall_interval / self.config.quick_fall_multiplier
        } else {
            self.fall_interval
        }
    }

    fn playing(&self) -> bool {
        self.started && !self.paused && !self.game_over
    }

    /// Active piece cells in board space
    pub fn active_cells(&self) -> Vec<GridCoord> {
        self.active
            .as_ref()
            .map(|piece| {
                piece
                    .world_cells()
                    .iter()
                    .map(|&w| self.orientation.world_to_grid(w))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Landing position of the active piece in board space
    pub fn ghost_cells(&self) -> Vec<GridCoord> {
        self.active
            .as_ref()
            .map(|piece| {
                piece
                    .soft_drop_projection(probe(&self.grid, &self.orientation))
                    .iter()
                    .map(|&w| self.orientation.world_to_grid(w))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Take and clear the summary of the last placement
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Remove the active piece and its visuals (for scripted setups)
    pub fn discard_active(&mut self) -> Option<Piece> {
        let piece = self.active.take()?;
        for &handle in piece.handles() {
            self.renderer.destroy_visual(handle);
        }
        self.pending_fall = false;
        Some(piece)
    }

    /// Make `piece` the active piece if its placement is free
    ///
    /// Panics if a piece is already active.
    pub fn insert_piece(&mut self, mut piece: Piece) -> bool {
        assert!(self.active.is_none(), "a piece is already active");
        if !piece.is_placeable(probe(&self.grid, &self.orientation)) {
            return false;
        }
        let cells: Vec<GridCoord> = piece
            .world_cells()
            .iter()
            .map(|&w| self.orientation.world_to_grid(w))
            .collect();
        let handles = self.renderer.spawn_visual(&cells);
        piece.attach_handles(&handles);
        debug!("spawned {:?} at {}", piece.kind(), piece.anchor());
        self.active = Some(piece);
        self.pending_fall = false;
        true
    }

    /// Centre a piece over the world footprint with its lowest block at the
    /// top of the playfield, then pull it back inside the footprint
    fn place_for_spawn(&self, piece: &mut Piece) {
        let (fw, fd) = self.orientation.world_footprint();
        let centre = GridCoord::new((fw - 1) / 2, self.grid.height(), (fd - 1) / 2);
        piece.shift(centre - piece.anchor());

        let cells = piece.world_cells();
        let (mut lo, mut hi) = (cells[0], cells[0]);
        for c in &cells[1..] {
            lo = GridCoord::new(lo.x.min(c.x), lo.y.min(c.y), lo.z.min(c.z));
            hi = GridCoord::new(hi.x.max(c.x), hi.y.max(c.y), hi.z.max(c.z));
        }

        let fit = |lo: i32, hi: i32, size: i32| {
            if lo < 0 {
                -lo
            } else if hi >= size {
                size - 1 - hi
            } else {
                0
            }
        };
        let dx = fit(lo.x, hi.x, fw);
        let dz = fit(lo.z, hi.z, fd);
        let dy = self.grid.height() - lo.y;
        piece.shift(GridCoord::new(dx, dy, dz));
    }

    fn spawn_next(&mut self) {
        let kind = self.rng.pick_kind();
        let mut piece = Piece::new(kind, GridCoord::ZERO);

        if self.config.random_spawn_rotation && self.rng.chance_half() {
            let turned = self.rng.spawn_orientation();
            let mut candidate = piece.clone().with_orientation(turned);
            self.place_for_spawn(&mut candidate);
            if candidate.is_placeable(probe(&self.grid, &self.orientation)) {
                piece = candidate;
            } else {
                self.place_for_spawn(&mut piece);
            }
        } else {
            self.place_for_spawn(&mut piece);
        }

        if !self.insert_piece(piece) {
            debug!("spawn blocked");
            self.end_game();
        }
    }

    fn sync_visuals(&mut self) {
        if let Some(piece) = &self.active {
            for (&handle, &w) in piece.handles().iter().zip(piece.world_cells().iter()) {
                self.renderer
                    .move_visual(handle, self.orientation.world_to_grid(w));
            }
        }
    }

    fn after_step(&mut self, step: FallStep) -> bool {
        match step {
            FallStep::Waiting => false,
            FallStep::Fell => {
                self.sync_visuals();
                true
            }
            FallStep::Landed => {
                self.lock_active();
                true
            }
        }
    }

    /// Advance the match by `dt` seconds; returns whether anything changed
    pub fn tick(&mut self, dt: f64) -> bool {
        if !self.playing() {
            return false;
        }
        self.clock += dt;
        let interval = self.effective_fall_interval();
        let mut changed = false;

        if let Some(piece) = self.active.as_mut() {
            if self.orientation.is_transitioning() {
                if piece.advance_fall_timer(dt, interval) {
                    self.pending_fall = true;
                }
            } else {
                let step = piece.tick_fall(dt, interval, probe(&self.grid, &self.orientation));
                changed |= self.after_step(step);
            }
        }

        let from = self.orientation.logical_yaw();
        if let Some(to) = self.orientation.tick(dt) {
            self.carry_active(from, to);
            changed = true;
        }

        if self.pending_fall && !self.orientation.is_transitioning() {
            self.pending_fall = false;
            if let Some(piece) = self.active.as_mut() {
                let step = piece.step_down(probe(&self.grid, &self.orientation));
                changed |= self.after_step(step);
            }
        }

        changed
    }

    /// Re-express the active piece after the board settled at a new yaw
    fn carry_active(&mut self, from: Yaw, to: Yaw) {
        let Some(piece) = self.active.as_mut() else {
            return;
        };
        let dims = self.orientation.dims();
        let grid_anchor = orientation::world_to_grid(piece.anchor(), from, dims);
        let anchor = orientation::grid_to_world(grid_anchor, to, dims);
        piece.reframe(anchor, orientation::turn_between(from, to));
    }

    /// Apply a player command; returns whether it took effect
    ///
    /// Piece moves and rotations are refused while the board turns. A
    /// `Move(Down)` refused that way is kept as the pending fall.
    pub fn apply_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Restart => {
                self.restart();
                true
            }
            Command::Pause => {
                if !self.started || self.game_over {
                    return false;
                }
                self.paused = !self.paused;
                true
            }
            _ if !self.playing() => false,
            Command::QuickFall(on) => {
                self.quick_fall = on;
                true
            }
            Command::RotateBoard(turn) => self.orientation.request_rotate(turn),
            Command::Move(dir) => {
                if self.orientation.is_transitioning() {
                    if dir == Direction::Down && self.active.is_some() {
                        self.pending_fall = true;
                    }
                    return false;
                }
                self.move_active(dir)
            }
            Command::Rotate(axis) => {
                if self.orientation.is_transitioning() {
                    return false;
                }
                self.rotate_active(axis)
            }
        }
    }

    fn move_active(&mut self, dir: Direction) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let is_free = probe(&self.grid, &self.orientation);
        if dir == Direction::Down {
            let step = piece.step_down(is_free);
            return self.after_step(step);
        }
        let moved = piece.try_move(dir.delta(), is_free);
        if moved {
            self.sync_visuals();
        }
        moved
    }

    fn rotate_active(&mut self, axis: Axis) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let rotated = piece.try_rotate(axis, probe(&self.grid, &self.orientation));
        if rotated {
            self.sync_visuals();
        }
        rotated
    }

    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        for (&handle, &w) in piece.handles().iter().zip(piece.world_cells().iter()) {
            let g = self.orientation.world_to_grid(w);
            if !self.grid.store(g, handle) {
                warn!("block refused at {}", g);
                self.renderer.destroy_visual(handle);
            }
        }
        debug!("locked {:?} at {}", piece.kind(), piece.anchor());
        self.audio.on_lock();

        let mut planes = 0;
        for axis in PlaneAxis::ALL {
            planes += self.grid.clear_complete_planes(axis, &mut self.renderer);
        }

        let level = self.scores.level();
        let mut awarded = 0;
        let mut level_up = false;
        if planes > 0 {
            self.audio.on_clear(planes);
            let result = self.scores.on_planes_cleared(planes, level, self.clock);
            awarded = result.awarded;
            level_up = result.level_up;
            if level_up {
                self.fall_interval = fall_interval(self.scores.level(), &self.config);
                info!(
                    "level {} reached, fall interval {:.2}s",
                    self.scores.level(),
                    self.fall_interval
                );
            }
        }

        if self.grid.top_row_occupied() {
            self.end_game();
        } else {
            self.spawn_next();
        }

        self.last_event = Some(LockEvent {
            planes_cleared: planes,
            awarded,
            level: self.scores.level(),
            level_up,
            game_over: self.game_over,
        });
    }

    fn end_game(&mut self) {
        self.game_over = true;
        self.quick_fall = false;
        self.pending_fall = false;
        self.audio.on_game_over();

        let score = self.scores.score();
        let best = self.store.best_score();
        if score > best {
            self.store.save_best_score(score);
        }
        self.best_score = best.max(score);
        info!("game over: score {} (best {})", score, self.best_score);
    }

    /// Clear the board, score and yaw and spawn a fresh piece; the best score stays
    pub fn restart(&mut self) {
        self.grid.clear_all(&mut self.renderer);
        self.discard_active();
        self.scores.reset();
        self.orientation.reset();
        self.rng = SimpleRng::new(self.config.seed);
        self.fall_interval = self.config.base_fall_interval;
        self.quick_fall = false;
        self.pending_fall = false;
        self.clock = 0.0;
        self.last_event = None;
        self.paused = false;
        self.game_over = false;
        self.started = true;
        self.spawn_next();
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            depth: self.grid.depth(),
            yaw: self.orientation.logical_yaw(),
            display_yaw: self.orientation.display_yaw_degrees(),
            transitioning: self.orientation.is_transitioning(),
            occupied: self.grid.occupied_cells().map(|(c, _)| c).collect(),
            active: self.active_cells(),
            ghost: self.ghost_cells(),
            score: self.scores.score(),
            level: self.scores.level(),
            planes_cleared: self.scores.planes_cleared(),
            best_score: self.best_score,
            paused: self.paused,
            game_over: self.game_over,
        }
    }
}
