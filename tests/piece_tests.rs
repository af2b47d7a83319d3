//! Piece movement, rotation and wall kicks against a real grid

use voxtris::core::piece::{shape_blocks, WALL_KICKS};
use voxtris::core::{FallStep, Orientation, Piece, VoxelGrid};
use voxtris::types::{Axis, BlockHandle, GridCoord, PieceKind};

fn sorted(mut cells: Vec<GridCoord>) -> Vec<GridCoord> {
    cells.sort();
    cells
}

#[test]
fn test_wall_kick_pushes_off_left_wall() {
    let grid = VoxelGrid::new(3, 10, 3).unwrap();
    let free = |c| grid.is_free(c);
    let bar = [
        GridCoord::new(0, 0, 0),
        GridCoord::new(0, 1, 0),
        GridCoord::new(0, 2, 0),
    ];
    let mut piece = Piece::custom(&bar, GridCoord::new(1, 2, 1));

    // About Z the bar would lie along -x and leave the grid
    assert!(piece.try_rotate(Axis::Z, free));
    assert_eq!(piece.anchor(), GridCoord::new(2, 2, 1));
    assert_eq!(
        sorted(piece.world_cells().to_vec()),
        vec![
            GridCoord::new(0, 2, 1),
            GridCoord::new(1, 2, 1),
            GridCoord::new(2, 2, 1)
        ]
    );
}

#[test]
fn test_kicks_are_tried_in_order() {
    assert_eq!(
        WALL_KICKS,
        [
            GridCoord::new(1, 0, 0),
            GridCoord::new(-1, 0, 0),
            GridCoord::new(0, 0, 1),
            GridCoord::new(0, 0, -1),
            GridCoord::new(0, 1, 0),
            GridCoord::new(0, -1, 0),
        ]
    );

    // +x is blocked by the right wall, so the -x kick wins
    let grid = VoxelGrid::new(3, 10, 3).unwrap();
    let bar = [
        GridCoord::new(0, 0, 0),
        GridCoord::new(0, -1, 0),
        GridCoord::new(0, -2, 0),
    ];
    let mut piece = Piece::custom(&bar, GridCoord::new(1, 4, 1));
    assert!(piece.try_rotate(Axis::Z, |c| grid.is_free(c)));
    assert_eq!(piece.anchor(), GridCoord::new(0, 4, 1));
}

#[test]
fn test_blocked_rotation_reverts_everything() {
    let mut grid = VoxelGrid::new(3, 10, 3).unwrap();
    // wall every cell around the bar
    for y in 0..13 {
        for z in 0..3 {
            for x in 0..3 {
                if x != 1 || z != 1 {
                    grid.store(GridCoord::new(x, y, z), BlockHandle(0));
                }
            }
        }
    }
    let mut piece = Piece::new(PieceKind::I, GridCoord::ZERO)
        .with_orientation(Orientation::quarter(Axis::Z));
    piece.try_move(GridCoord::new(1, 5, 1), |_| true);
    let before = piece.clone();
    assert!(!piece.try_rotate(Axis::X, |c| grid.is_free(c)));
    assert_eq!(piece, before);
}

#[test]
fn test_soft_drop_projection_does_not_move() {
    let mut grid = VoxelGrid::new(3, 10, 3).unwrap();
    grid.store(GridCoord::new(1, 3, 1), BlockHandle(0));
    let piece = Piece::new(PieceKind::O, GridCoord::new(0, 8, 0));
    let ghost = piece.soft_drop_projection(|c| grid.is_free(c));
    assert!(ghost.iter().all(|c| c.y == 4));
    assert_eq!(piece.anchor(), GridCoord::new(0, 8, 0));
}

#[test]
fn test_move_collides_with_stored_block() {
    let mut grid = VoxelGrid::new(3, 10, 3).unwrap();
    grid.store(GridCoord::new(2, 5, 0), BlockHandle(0));
    let mut piece = Piece::new(PieceKind::O, GridCoord::new(0, 5, 0));
    assert!(!piece.try_move(GridCoord::new(1, 0, 0), |c| grid.is_free(c)));
    assert_eq!(piece.anchor(), GridCoord::new(0, 5, 0));
    assert!(piece.try_move(GridCoord::new(0, 0, 1), |c| grid.is_free(c)));
}

#[test]
fn test_falls_until_floor_then_locks() {
    let grid = VoxelGrid::new(3, 10, 3).unwrap();
    let mut piece = Piece::new(PieceKind::T, GridCoord::new(0, 2, 0));
    let mut steps = Vec::new();
    loop {
        let step = piece.tick_fall(1.0, 1.0, |c| grid.is_free(c));
        steps.push(step);
        if step.is_locked() {
            break;
        }
    }
    assert_eq!(steps, vec![FallStep::Fell, FallStep::Fell, FallStep::Landed]);
    assert!(piece.world_cells().iter().all(|c| c.y == 0));
}

#[test]
fn test_four_turns_about_any_axis_restore_cells() {
    let grid = VoxelGrid::new(9, 9, 9).unwrap();
    for kind in PieceKind::ALL {
        for axis in Axis::ALL {
            let mut piece = Piece::new(kind, GridCoord::new(4, 4, 4));
            let start = sorted(piece.world_cells().to_vec());
            for _ in 0..4 {
                assert!(piece.try_rotate(axis, |c| grid.is_free(c)));
            }
            assert_eq!(sorted(piece.world_cells().to_vec()), start, "{:?} {:?}", kind, axis);
            assert_eq!(piece.local_blocks(), shape_blocks(kind));
        }
    }
}
