//! Score engine scenarios

use voxtris::core::scoring::fall_interval;
use voxtris::core::{MatchConfig, ScoreEngine};

#[test]
fn test_quick_second_clear_beats_isolated_clear_per_plane() {
    let t = 42.0;
    let mut chained = ScoreEngine::new(3.0);
    chained.on_planes_cleared(2, 1, t);
    let second = chained.on_planes_cleared(1, 1, t + 0.5);

    let mut isolated = ScoreEngine::new(3.0);
    let lone = isolated.on_planes_cleared(1, 1, t + 10.0);

    assert!(second.awarded > lone.awarded);
    assert_eq!(second.awarded, 220);
    assert_eq!(lone.awarded, 110);
}

#[test]
fn test_time_bonus_fades_across_window() {
    let mut s = ScoreEngine::new(3.0);
    s.on_planes_cleared(1, 1, 0.0);
    let r = s.on_planes_cleared(1, 1, 1.5);
    assert!((r.time_bonus - 1.5).abs() < 1e-12);
    // at the window edge the bonus is gone and the streak restarts
    let r = s.on_planes_cleared(1, 1, 4.5);
    assert_eq!(r.time_bonus, 1.0);
    assert_eq!(r.consecutive, 1);
}

#[test]
fn test_level_scales_points() {
    let mut a = ScoreEngine::default();
    let mut b = ScoreEngine::default();
    assert_eq!(
        b.on_planes_cleared(3, 4, 0.0).awarded,
        4 * a.on_planes_cleared(3, 1, 0.0).awarded
    );
}

#[test]
fn test_levels_follow_plane_total() {
    let cfg = MatchConfig::default();
    let mut s = ScoreEngine::default();
    let mut t = 0.0;
    let mut ups = 0;
    for _ in 0..15 {
        t += 10.0;
        if s.on_planes_cleared(1, s.level(), t).level_up {
            ups += 1;
        }
    }
    // 5 planes -> level 2, 10 planes -> level 3, 15 planes -> level 4
    assert_eq!(s.level(), 4);
    assert_eq!(ups, 3);
    assert!(fall_interval(s.level(), &cfg) < fall_interval(1, &cfg));
}
