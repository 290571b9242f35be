//! Grid and level integration tests

use match_board::core::{GameState, Grid, Level, Piece, SetupError, StartingPiece, StartingTile, Tile};
use match_board::types::{BombKind, Coord, PieceColor, TileKind};

#[test]
fn test_grid_new_is_empty_normal_tiles() {
    let grid = Grid::new(8, 8);
    assert_eq!(grid.width(), 8);
    assert_eq!(grid.height(), 8);

    for y in 0..8 {
        for x in 0..8 {
            assert!(!grid.is_occupied(x, y));
            assert_eq!(grid.tile(x, y).unwrap().kind(), TileKind::Normal);
            assert!(grid.is_fillable(x, y));
        }
    }
}

#[test]
fn test_grid_out_of_bounds_access_is_silent() {
    let mut grid = Grid::new(8, 8);

    // Reads give sentinels.
    assert_eq!(grid.piece(-1, 0), None);
    assert_eq!(grid.piece(8, 0), None);
    assert_eq!(grid.tile(0, -1), None);

    // Writes are refused no-ops.
    assert!(!grid.place_piece(Piece::normal(PieceColor::Red), 8, 8));
    assert_eq!(grid.clear_cell(-1, -1), None);
    assert!(!grid.set_tile(100, 0, Tile::obstacle()));

    // Speculative bomb-blast queries off the edge come back empty.
    assert!(grid.row_cells(-5).is_empty());
    assert!(grid.column_cells(50).is_empty());
    assert!(grid.neighbour_cells(-2, -2, 1).is_empty());
}

#[test]
fn test_grid_place_move_clear_cycle() {
    let mut grid = Grid::new(4, 4);
    let piece = Piece::normal(PieceColor::Green);

    assert!(grid.place_piece(piece, 1, 2));
    assert_eq!(grid.piece(1, 2), Some(piece));

    // Moving = clear + place; the arena slot is the only position record.
    let taken = grid.clear_cell(1, 2).unwrap();
    assert!(grid.place_piece(taken, 1, 0));
    assert!(!grid.is_occupied(1, 2));
    assert_eq!(grid.piece(1, 0), Some(piece));
}

#[test]
fn test_obstacle_cells_never_fillable() {
    let mut grid = Grid::new(4, 4);
    grid.set_tile(2, 2, Tile::obstacle());

    assert!(!grid.is_fillable(2, 2));
    assert!(grid.is_fillable(2, 1));
}

#[test]
fn test_breakable_decay_sequence() {
    let mut grid = Grid::new(4, 4);
    grid.set_tile(0, 0, Tile::breakable(3));

    assert_eq!(grid.break_tile_at(0, 0), Some(2));
    assert_eq!(grid.break_tile_at(0, 0), Some(1));
    assert_eq!(grid.break_tile_at(0, 0), Some(0));
    // At zero the tile is permanently Normal.
    assert_eq!(grid.tile(0, 0).unwrap().kind(), TileKind::Normal);
    assert_eq!(grid.break_tile_at(0, 0), None);
}

#[test]
fn test_color_sweep_matches_assigned_target_only() {
    let mut grid = Grid::from_rows(&[
        "RBRBR", //
        "BRBRB",
    ]);
    grid.place_piece(Piece::bomb(BombKind::Color, None), 0, 0);

    let reds = grid.cells_with_color(Some(PieceColor::Red));
    assert_eq!(reds.len(), 4);
    assert!(!reds.contains(&Coord::new(0, 0)));

    // The colorless bomb is only found by a colorless target.
    assert_eq!(grid.cells_with_color(None), vec![Coord::new(0, 0)]);
}

#[test]
fn test_level_builds_board_with_layout() {
    let mut level = Level::standard(6, 6);
    level.starting_tiles.push(StartingTile {
        x: 3,
        y: 2,
        kind: TileKind::Obstacle,
        break_value: 0,
    });
    level.starting_tiles.push(StartingTile {
        x: 0,
        y: 0,
        kind: TileKind::Breakable,
        break_value: 1,
    });
    level.starting_pieces.push(StartingPiece {
        x: 5,
        y: 5,
        color: PieceColor::Purple,
    });

    let state = GameState::new(&level, 11).unwrap();
    let grid = state.grid();

    // The obstacle stayed empty through the initial fill.
    assert_eq!(grid.tile(3, 2).unwrap().kind(), TileKind::Obstacle);
    assert!(!grid.is_occupied(3, 2));

    // The placed piece survived the fill.
    assert_eq!(grid.piece(5, 5), Some(Piece::normal(PieceColor::Purple)));

    // Everything else is populated.
    for y in 0..6 {
        for x in 0..6 {
            if (x, y) != (3, 2) {
                assert!(grid.is_occupied(x, y), "cell ({}, {})", x, y);
            }
        }
    }
}

#[test]
fn test_level_configuration_errors_are_fatal() {
    let mut level = Level::standard(6, 6);
    level.bomb_templates.retain(|&k| k != BombKind::Neighbour);

    match GameState::new(&level, 1) {
        Err(SetupError::MissingBombTemplate(BombKind::Neighbour)) => {}
        other => panic!("expected missing template error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_same_seed_same_board() {
    let level = Level::standard(8, 8);
    let a = GameState::new(&level, 777).unwrap();
    let b = GameState::new(&level, 777).unwrap();
    assert_eq!(a.grid(), b.grid());

    let c = GameState::new(&level, 778).unwrap();
    assert_ne!(a.grid(), c.grid());
}
