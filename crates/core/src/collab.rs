//! Collaborator interfaces
//!
//! The core never renders, plays sound or touches storage. It talks to those
//! layers through three small traits, injected into `MatchEngine` as type
//! parameters. Each trait comes with an in-memory implementation that is good
//! enough for headless runs and tests.
//!
//! Positions handed to the renderer are in board space (grid coordinates). The
//! renderer is expected to apply `BoardOrientation::display_yaw_degrees` to the
//! whole board.

use crate::types::{BlockHandle, GridCoord, MatchEvent};

/// Visual side of blocks
pub trait Renderer {
    /// Create one visual per block, in the same order as `cells`
    fn spawn_visual(&mut self, cells: &[GridCoord]) -> Vec<BlockHandle>;

    fn move_visual(&mut self, handle: BlockHandle, pos: GridCoord);

    fn destroy_visual(&mut self, handle: BlockHandle);
}

/// Sound cues; all methods default to doing nothing
pub trait AudioSink {
    fn on_lock(&mut self) {}

    fn on_clear(&mut self, _planes: u32) {}

    fn on_game_over(&mut self) {}
}

/// Best-score persistence, consulted only at game over
pub trait ScoreStore {
    fn best_score(&self) -> u64;

    fn save_best_score(&mut self, score: u64);
}

/// Arena of visuals: handle index -> last known board position
///
/// Handles are never reused, so a stale handle can be detected.
#[derive(Debug, Clone, Default)]
pub struct VisualTable {
    slots: Vec<Option<GridCoord>>,
    live: usize,
}

impl VisualTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, handle: BlockHandle) -> Option<GridCoord> {
        self.slots.get(handle.0 as usize).copied().flatten()
    }

    /// Number of visuals currently alive
    pub fn live(&self) -> usize {
        self.live
    }

    /// Total number of visuals ever spawned
    pub fn spawned(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockHandle, GridCoord)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|pos| (BlockHandle(i as u32), pos)))
    }
}

impl Renderer for VisualTable {
    fn spawn_visual(&mut self, cells: &[GridCoord]) -> Vec<BlockHandle> {
        cells
            .iter()
            .map(|&pos| {
                let handle = BlockHandle(self.slots.len() as u32);
                self.slots.push(Some(pos));
                self.live += 1;
                handle
            })
            .collect()
    }

    fn move_visual(&mut self, handle: BlockHandle, pos: GridCoord) {
        match self.slots.get_mut(handle.0 as usize) {
            Some(Some(slot)) => *slot = pos,
            _ => log::warn!("move_visual on unknown handle {:?}", handle),
        }
    }

    fn destroy_visual(&mut self, handle: BlockHandle) {
        match self.slots.get_mut(handle.0 as usize) {
            Some(slot @ Some(_)) => {
                *slot = None;
                self.live -= 1;
            }
            _ => log::warn!("destroy_visual on unknown handle {:?}", handle),
        }
    }
}

/// Audio sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioSink for Silent {}

/// Audio sink that records the events it receives
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<MatchEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, MatchEvent> {
        self.events.drain(..)
    }

    pub fn count(&self, pred: impl Fn(&MatchEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl AudioSink for EventLog {
    fn on_lock(&mut self) {
        self.events.push(MatchEvent::Locked);
    }

    fn on_clear(&mut self, planes: u32) {
        self.events.push(MatchEvent::Cleared { planes });
    }

    fn on_game_over(&mut self) {
        self.events.push(MatchEvent::GameOver);
    }
}

/// Best score kept in memory
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryScoreStore {
    best: u64,
}

impl MemoryScoreStore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn best_score(&self) -> u64 {
        self.best
    }

    fn save_best_score(&mut self, score: u64) {
        self.best = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_table_tracks_live_handles() {
        let mut table = VisualTable::new();
        let handles = table.spawn_visual(&[GridCoord::new(0, 0, 0), GridCoord::new(1, 0, 0)]);
        assert_eq!(handles, vec![BlockHandle(0), BlockHandle(1)]);
        assert_eq!(table.live(), 2);

        table.move_visual(handles[1], GridCoord::new(1, 4, 0));
        assert_eq!(table.position(handles[1]), Some(GridCoord::new(1, 4, 0)));

        table.destroy_visual(handles[0]);
        assert_eq!(table.live(), 1);
        assert_eq!(table.position(handles[0]), None);

        // Handles are not reused
        let next = table.spawn_visual(&[GridCoord::ZERO]);
        assert_eq!(next, vec![BlockHandle(2)]);
        assert_eq!(table.spawned(), 3);
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            vec![(BlockHandle(1), GridCoord::new(1, 4, 0)), (BlockHandle(2), GridCoord::ZERO)]
        );
    }

    #[test]
    fn test_destroying_twice_does_not_underflow() {
        let mut table = VisualTable::new();
        let h = table.spawn_visual(&[GridCoord::ZERO])[0];
        table.destroy_visual(h);
        table.destroy_visual(h);
        assert_eq!(table.live(), 0);
    }

    #[test]
    fn test_event_log_records_in_order() {
        let mut log = EventLog::new();
        log.on_lock();
        log.on_clear(2);
        log.on_game_over();
        assert_eq!(
            log.events(),
            &[
                MatchEvent::Locked,
                MatchEvent::Cleared { planes: 2 },
                MatchEvent::GameOver
            ]
        );
        assert_eq!(log.count(|e| matches!(e, MatchEvent::Cleared { .. })), 1);
        assert_eq!(log.drain().count(), 3);
        assert_eq!(log.count(|_| true), 0);
    }
}
