//! Match detection - pure run scanning over a grid snapshot
//!
//! Every function here is a side-effect-free query. "No match" is an empty
//! vector, never an error. Colorless pieces (`color == None`) are invisible
//! to the scanner: a run never starts on one and never extends through one.
//!
//! Two thresholds are in play and they are not the same constant:
//! [`MIN_MATCH_LEN`] (3) is the minimum for a run to count, while
//! [`CORNER_ARM_MIN`] (2) is the relaxed per-arm minimum used when the two
//! arms of an L/T shape share their pivot cell.

use match_board_types::{Coord, Dir, PieceColor, CORNER_ARM_MIN, MIN_MATCH_LEN};

use crate::grid::Grid;

/// Push every element of `src` not already present in `dst`
///
/// Match sets are small (bounded by the board), so linear dedup beats
/// hashing here.
fn union_into(dst: &mut Vec<Coord>, src: Vec<Coord>) {
    for cell in src {
        if !dst.contains(&cell) {
            dst.push(cell);
        }
    }
}

/// Walk from (x, y) along `dir`, collecting the run of same-colored pieces
///
/// The walk stops at the first empty, differently-colored, colorless, or
/// out-of-bounds cell. The collected run (starting cell included) is
/// returned only if it reaches `min_len`; otherwise the result is empty.
pub fn scan_direction(grid: &Grid, x: i8, y: i8, dir: Dir, min_len: usize) -> Vec<Coord> {
    let Some(start) = grid.piece(x, y) else {
        return Vec::new();
    };
    let Some(color) = start.color else {
        // Colorless pieces never seed a run.
        return Vec::new();
    };

    let mut run = vec![Coord::new(x, y)];
    let (dx, dy) = dir.unit();
    let mut next = Coord::new(x + dx, y + dy);

    while let Some(piece) = grid.piece(next.x, next.y) {
        if piece.color != Some(color) {
            break;
        }
        run.push(next);
        next = Coord::new(next.x + dx, next.y + dy);
    }

    if run.len() >= min_len {
        run
    } else {
        Vec::new()
    }
}

/// Horizontal run through (x, y): left and right arms unioned at the pivot
///
/// Each arm only needs [`CORNER_ARM_MIN`] pieces; the union must reach
/// `min_len` to count.
pub fn horizontal_matches_at(grid: &Grid, x: i8, y: i8, min_len: usize) -> Vec<Coord> {
    let mut combined = scan_direction(grid, x, y, Dir::Right, CORNER_ARM_MIN);
    union_into(&mut combined, scan_direction(grid, x, y, Dir::Left, CORNER_ARM_MIN));

    if combined.len() >= min_len {
        combined
    } else {
        Vec::new()
    }
}

/// Vertical run through (x, y): up and down arms unioned at the pivot
pub fn vertical_matches_at(grid: &Grid, x: i8, y: i8, min_len: usize) -> Vec<Coord> {
    let mut combined = scan_direction(grid, x, y, Dir::Up, CORNER_ARM_MIN);
    union_into(&mut combined, scan_direction(grid, x, y, Dir::Down, CORNER_ARM_MIN));

    if combined.len() >= min_len {
        combined
    } else {
        Vec::new()
    }
}

/// All matched cells through (x, y): horizontal and vertical runs unioned
///
/// The union admits L/T shapes where neither arm alone reaches
/// [`MIN_MATCH_LEN`] but the shared pivot brings the whole shape over it.
pub fn matches_at(grid: &Grid, x: i8, y: i8) -> Vec<Coord> {
    let mut combined = horizontal_matches_at(grid, x, y, MIN_MATCH_LEN);
    union_into(&mut combined, vertical_matches_at(grid, x, y, MIN_MATCH_LEN));
    combined
}

/// Union of [`matches_at`] over a list of seed cells
///
/// Used after a collapse/refill to re-test only the cells that changed.
pub fn matches_for_cells(grid: &Grid, seeds: &[Coord]) -> Vec<Coord> {
    let mut combined = Vec::new();
    for seed in seeds {
        union_into(&mut combined, matches_at(grid, seed.x, seed.y));
    }
    combined
}

/// Union of [`matches_at`] over every cell - the cascade-termination test
pub fn all_matches(grid: &Grid) -> Vec<Coord> {
    let mut combined = Vec::new();
    for y in 0..grid.height() as i8 {
        for x in 0..grid.width() as i8 {
            union_into(&mut combined, matches_at(grid, x, y));
        }
    }
    combined
}

/// The first resolvable color in a match set
pub fn match_color(grid: &Grid, cells: &[Coord]) -> Option<PieceColor> {
    cells
        .iter()
        .find_map(|c| grid.piece(c.x, c.y).and_then(|p| p.color))
}

/// True when the set spans both a horizontal and a vertical arm
///
/// Measured against the first cell of the set: any other cell sharing its
/// row proves a horizontal arm, any sharing its column proves a vertical one.
pub fn is_corner_match(cells: &[Coord]) -> bool {
    let Some(first) = cells.first() else {
        return false;
    };

    let mut horizontal = false;
    let mut vertical = false;

    for cell in &cells[1..] {
        if cell.y == first.y && cell.x != first.x {
            horizontal = true;
        }
        if cell.x == first.x && cell.y != first.y {
            vertical = true;
        }
    }

    horizontal && vertical
}

/// Would the piece just placed at (x, y) already sit in a match?
///
/// Refill proceeds column by column, bottom to top, so only the left and
/// downward neighbours are settled; those two directions are sufficient.
pub fn has_match_on_fill(grid: &Grid, x: i8, y: i8) -> bool {
    !scan_direction(grid, x, y, Dir::Left, MIN_MATCH_LEN).is_empty()
        || !scan_direction(grid, x, y, Dir::Down, MIN_MATCH_LEN).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Piece;
    use match_board_types::BombKind;

    #[test]
    fn test_scan_direction_basic_run() {
        let grid = Grid::from_rows(&[
            ".....", //
            "RRR..", //
            ".....",
        ]);

        let run = scan_direction(&grid, 0, 1, Dir::Right, 3);
        assert_eq!(run.len(), 3);
        assert!(run.contains(&Coord::new(0, 1)));
        assert!(run.contains(&Coord::new(2, 1)));

        // Too short for the requested minimum.
        assert!(scan_direction(&grid, 1, 1, Dir::Right, 3).is_empty());
    }

    #[test]
    fn test_scan_direction_stops_at_gap_and_other_color() {
        let grid = Grid::from_rows(&[
            "RR.RR", //
            "GGGBB",
        ]);

        // The gap splits the reds.
        assert!(scan_direction(&grid, 0, 1, Dir::Right, 3).is_empty());
        // The blue pair ends the green run.
        assert_eq!(scan_direction(&grid, 0, 0, Dir::Right, 3).len(), 3);
    }

    #[test]
    fn test_scan_direction_never_includes_colorless_pieces() {
        let mut grid = Grid::from_rows(&[
            "RR...", //
            ".....",
        ]);
        grid.place_piece(Piece::bomb(BombKind::Color, None), 2, 1);

        // The colorless bomb terminates the run.
        assert!(scan_direction(&grid, 0, 1, Dir::Right, 3).is_empty());
        // And never seeds one.
        assert!(scan_direction(&grid, 2, 1, Dir::Left, 1).is_empty());
    }

    #[test]
    fn test_matches_at_straight_run() {
        let grid = Grid::from_rows(&[
            ".....", //
            ".BBBB", //
            ".....",
        ]);

        // Any cell of the run finds the whole run.
        for x in 1..5 {
            let m = matches_at(&grid, x, 1);
            assert_eq!(m.len(), 4, "pivot x={}", x);
        }
        assert!(matches_at(&grid, 0, 1).is_empty());
    }

    #[test]
    fn test_matches_at_corner_union() {
        // L shape: 3 horizontal + 3 vertical sharing the pivot at (0, 0).
        let grid = Grid::from_rows(&[
            "G....", //
            "G....", //
            "GGG..",
        ]);

        let m = matches_at(&grid, 0, 0);
        assert_eq!(m.len(), 5);
        assert!(is_corner_match(&m));

        // Away from the pivot only the single arm is visible.
        let arm = matches_at(&grid, 2, 0);
        assert_eq!(arm.len(), 3);
        assert!(!is_corner_match(&arm));
    }

    #[test]
    fn test_matches_at_two_by_two_is_not_a_match() {
        let grid = Grid::from_rows(&[
            "YY...", //
            "YY...",
        ]);

        for y in 0..2 {
            for x in 0..2 {
                assert!(matches_at(&grid, x, y).is_empty());
            }
        }
    }

    #[test]
    fn test_all_matches_idempotent() {
        let grid = Grid::from_rows(&[
            "RRRGG", //
            "BYBYB", //
            "GGGPP",
        ]);

        let first = all_matches(&grid);
        let second = all_matches(&grid);
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
    }

    #[test]
    fn test_matches_for_cells_deduplicates() {
        let grid = Grid::from_rows(&[
            ".....", //
            "RRR..",
        ]);

        let seeds = [Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)];
        let m = matches_for_cells(&grid, &seeds);
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_match_color_skips_colorless() {
        let mut grid = Grid::from_rows(&[
            ".....", //
            ".RR..",
        ]);
        grid.place_piece(Piece::bomb(BombKind::Color, None), 0, 0);

        let cells = [Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)];
        assert_eq!(match_color(&grid, &cells), Some(PieceColor::Red));
        assert_eq!(match_color(&grid, &cells[..1]), None);
    }

    #[test]
    fn test_has_match_on_fill_checks_left_and_down() {
        let grid = Grid::from_rows(&[
            "..B..", //
            "..B..", //
            "RRB..",
        ]);

        // (2, 2) closes a vertical run below it.
        assert!(has_match_on_fill(&grid, 2, 2));
        // (2, 0) closes a horizontal run to its left... with only 2 reds it
        // does not.
        assert!(!has_match_on_fill(&grid, 2, 0));

        let grid = Grid::from_rows(&[
            ".....", //
            "RRR..",
        ]);
        assert!(has_match_on_fill(&grid, 2, 0));
    }
}
