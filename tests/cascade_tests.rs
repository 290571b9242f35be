//! End-to-end cascade scenarios through the public GameState API

use match_board::core::{
    all_matches, BoardEvent, GameState, Grid, Phase, Piece, SwapRejection, Tile,
};
use match_board::types::{BombKind, Coord, PieceColor, TileKind, BONUS_SCORE, PIECE_BASE_VALUE};

fn score_events(events: &[BoardEvent]) -> Vec<(u32, u32)> {
    events
        .iter()
        .filter_map(|e| match e {
            BoardEvent::Score {
                multiplier, bonus, ..
            } => Some((*multiplier, *bonus)),
            _ => None,
        })
        .collect()
}

/// No cell may float: below every piece, every fillable cell is occupied.
fn assert_no_floating_gaps(grid: &Grid) {
    for x in 0..grid.width() as i8 {
        for y in 0..grid.height() as i8 {
            if !grid.is_occupied(x, y) {
                continue;
            }
            for below in 0..y {
                if grid.is_fillable(x, below) {
                    assert!(
                        grid.is_occupied(x, below),
                        "floating piece at ({}, {}) over empty ({}, {})",
                        x,
                        y,
                        x,
                        below
                    );
                }
            }
        }
    }
}

#[test]
fn test_non_adjacent_swap_is_rejected_with_no_mutation() {
    let grid = Grid::from_rows(&[
        "YBGRP", //
        "GRPYB", //
        "PYBGR",
    ]);
    let mut state = GameState::from_grid(grid.clone(), 1);

    for (a, b) in [
        (Coord::new(0, 0), Coord::new(2, 0)),
        (Coord::new(0, 0), Coord::new(1, 1)),
        (Coord::new(4, 2), Coord::new(4, 0)),
    ] {
        assert_eq!(state.request_swap(a, b), Err(SwapRejection::NotAdjacent));
        assert_eq!(state.grid(), &grid);
        assert_eq!(state.phase(), Phase::Idle);
    }
}

#[test]
fn test_scenario_three_in_a_row() {
    // A 3-clear awards no bonus and spawns no bomb.
    let grid = Grid::from_rows(&[
        "GBYPG", //
        "YRYBP", //
        "RGRBG",
    ]);
    let mut state = GameState::from_grid(grid, 1);

    state
        .request_swap(Coord::new(1, 1), Coord::new(1, 0))
        .unwrap();

    // Resolving is the first stepped phase; inspect its output alone.
    state.step();
    let events = state.take_events();
    let scores = score_events(&events);
    assert_eq!(scores, vec![(1, 0), (1, 0), (1, 0)]);
    assert!(!events
        .iter()
        .any(|e| matches!(e, BoardEvent::BombSpawned { .. })));

    state.run_until_stable();
    assert!(all_matches(state.grid()).is_empty());
    assert_no_floating_gaps(state.grid());
}

#[test]
fn test_scenario_four_in_a_row_via_horizontal_swap() {
    // Column 0 reads R,G,R,R; pulling the R at (1,1) left completes four in
    // a row. The swap is horizontal, so the bomb is a Row bomb, spawned at
    // the swap's origin cell.
    let grid = Grid::from_rows(&[
        "RYBPY", //
        "RBYGP", //
        "GRPBG", //
        "RGBYB",
    ]);
    let mut state = GameState::from_grid(grid, 3);

    state
        .request_swap(Coord::new(1, 1), Coord::new(0, 1))
        .unwrap();
    state.step();

    let events = state.take_events();
    let scores = score_events(&events);
    assert_eq!(scores.len(), 4);
    assert!(scores.iter().all(|&(m, b)| m == 1 && b == BONUS_SCORE));

    let spawned: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BoardEvent::BombSpawned { x, y, kind } => Some((*x, *y, *kind)),
            _ => None,
        })
        .collect();
    assert_eq!(spawned, vec![(0, 1, BombKind::Row)]);

    state.run_until_stable();
    assert!(all_matches(state.grid()).is_empty());
    assert_no_floating_gaps(state.grid());
}

#[test]
fn test_scenario_color_bomb_sweeps_exactly_target_color() {
    let mut grid = Grid::from_rows(&[
        "BGYPB", //
        "GPBYR", //
        "YBRGB", //
        "RYGBP",
    ]);
    grid.place_piece(Piece::bomb(BombKind::Color, None), 0, 0);
    let mut state = GameState::from_grid(grid, 5);

    let yellows_before = state
        .grid()
        .cells_with_color(Some(PieceColor::Yellow))
        .len();

    // Swapping the bomb onto the yellow at (1,0) assigns yellow as target.
    state
        .request_swap(Coord::new(0, 0), Coord::new(1, 0))
        .unwrap();
    state.step();

    let events = state.take_events();
    // Every yellow plus the bomb itself, nothing else.
    assert_eq!(score_events(&events).len(), yellows_before + 1);
    assert!(state
        .grid()
        .cells_with_color(Some(PieceColor::Yellow))
        .is_empty());

    // Non-target pieces outside the sweep are untouched (blues survive).
    assert!(!state
        .grid()
        .cells_with_color(Some(PieceColor::Blue))
        .is_empty());

    state.run_until_stable();
    assert!(all_matches(state.grid()).is_empty());
}

#[test]
fn test_scenario_l_shaped_five_prefers_neighbour_bomb() {
    let grid = Grid::from_rows(&[
        "GYBPR", //
        "RGGYB", //
        "GBYRP", //
        "GPBGY",
    ]);
    let mut state = GameState::from_grid(grid, 9);

    // The G at (0,3) drops onto the corner cell (0,2), joining two greens
    // below and two to the right: size 5 with both arms present.
    state
        .request_swap(Coord::new(0, 3), Coord::new(0, 2))
        .unwrap();
    state.step();

    let events = state.take_events();
    let spawned: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BoardEvent::BombSpawned { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(spawned, vec![BombKind::Neighbour]);

    state.run_until_stable();
    assert!(all_matches(state.grid()).is_empty());
}

#[test]
fn test_score_accumulates_value_times_multiplier_plus_bonus() {
    let grid = Grid::from_rows(&[
        "GBYPG", //
        "YRYBP", //
        "RGRBG",
    ]);
    let mut state = GameState::from_grid(grid, 1);

    state
        .request_swap(Coord::new(1, 1), Coord::new(1, 0))
        .unwrap();
    state.run_until_stable();

    let events = state.take_events();
    let expected: u32 = events
        .iter()
        .filter_map(|e| match e {
            BoardEvent::Score {
                value,
                multiplier,
                bonus,
                ..
            } => Some(value * multiplier + bonus),
            _ => None,
        })
        .sum();

    assert_eq!(state.score(), expected);
    assert!(state.score() >= 3 * PIECE_BASE_VALUE);
}

#[test]
fn test_cascade_termination_across_seeds_and_sizes() {
    // Whatever refills fall, the cascade reaches Idle, leaves no matches,
    // and no floating gaps.
    for seed in [1, 7, 42, 1337, 99999] {
        let grid = Grid::from_rows(&[
            "GBYPG", //
            "YRYBP", //
            "RGRBG",
        ]);
        let mut state = GameState::from_grid(grid, seed);
        state
            .request_swap(Coord::new(1, 1), Coord::new(1, 0))
            .unwrap();
        state.run_until_stable();

        assert_eq!(state.phase(), Phase::Idle, "seed {}", seed);
        assert!(all_matches(state.grid()).is_empty(), "seed {}", seed);
        assert_no_floating_gaps(state.grid());
        assert_eq!(state.cascade_level(), 0);
    }
}

#[test]
fn test_obstacles_and_breakables_through_a_full_cascade() {
    let mut grid = Grid::from_rows(&[
        "GBYPG", //
        "YRYBP", //
        "RGRBG",
    ]);
    // Breakable under the matched R at (2,0); obstacle well away from it.
    grid.set_tile(2, 0, Tile::breakable(1));
    grid.clear_cell(4, 2);
    grid.set_tile(4, 2, Tile::obstacle());
    let mut state = GameState::from_grid(grid, 2);

    state
        .request_swap(Coord::new(1, 1), Coord::new(1, 0))
        .unwrap();
    state.run_until_stable();

    let events = state.take_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, BoardEvent::TileBreak { x: 2, y: 0, remaining: 0 })));
    // Fully decayed: the tile is Normal now.
    assert_eq!(state.grid().tile(2, 0).unwrap().kind(), TileKind::Normal);

    // The obstacle never gained a piece, even through refills.
    assert!(!state.grid().is_occupied(4, 2));
    assert_no_floating_gaps(state.grid());
}

#[test]
fn test_moves_decrement_only_on_accepted_swaps() {
    let grid = Grid::from_rows(&[
        "GBYPG", //
        "YRYBP", //
        "RGRBG",
    ]);
    let mut state = GameState::from_grid(grid, 1);
    let initial = state.moves_left();

    // Two rejected probes, then one accepted swap.
    let _ = state.request_swap(Coord::new(0, 2), Coord::new(1, 2));
    let _ = state.request_swap(Coord::new(3, 2), Coord::new(4, 2));
    state
        .request_swap(Coord::new(1, 1), Coord::new(1, 0))
        .unwrap();
    state.run_until_stable();

    assert_eq!(state.moves_left(), initial - 1);
}
