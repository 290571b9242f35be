//! Scoring - points for cleared pieces
//!
//! Each destroyed piece is worth its base value times the current cascade
//! level, plus a flat bonus when the clear set was large. The cascade level
//! is 1 for the clear a swap triggers directly and climbs by one per chained
//! cascade, so chains pay progressively better.

use match_board_types::{BONUS_SCORE, MIN_BONUS_SET, PIECE_BASE_VALUE};

/// Flat bonus applied to every piece of a clear set of the given size
pub fn bonus_for_set(set_len: usize) -> u32 {
    if set_len >= MIN_BONUS_SET {
        BONUS_SCORE
    } else {
        0
    }
}

/// Score awarded for one cleared piece
pub fn piece_score(multiplier: u32, bonus: u32) -> u32 {
    PIECE_BASE_VALUE * multiplier + bonus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_threshold() {
        assert_eq!(bonus_for_set(3), 0);
        assert_eq!(bonus_for_set(4), BONUS_SCORE);
        assert_eq!(bonus_for_set(12), BONUS_SCORE);
    }

    #[test]
    fn test_piece_score_scales_with_cascade_level() {
        assert_eq!(piece_score(1, 0), PIECE_BASE_VALUE);
        assert_eq!(piece_score(2, 0), 2 * PIECE_BASE_VALUE);
        assert_eq!(piece_score(3, BONUS_SCORE), 3 * PIECE_BASE_VALUE + BONUS_SCORE);
    }
}
