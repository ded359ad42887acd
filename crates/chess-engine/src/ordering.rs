//! Move ordering.
//!
//! Alpha-beta cutoffs come early only if strong moves are searched first.
//! Priority is static and recomputed at every node: captures by victim
//! value (MVV-LVA tiebreak), then promotions, checks, and central
//! destinations. No transposition table or killer state is kept.

use chess::{Board, ChessMove, Square};

use crate::eval::piece_value;

const CAPTURE_BONUS: i32 = 10_000;
const PROMOTION_BONUS: i32 = 8_000;
const CHECK_BONUS: i32 = 5_000;
const CENTER_BONUS: i32 = 100;

/// The 16 central squares (c3-f3 through c6-f6)
fn is_central(sq: Square) -> bool {
    let rank = sq.get_rank().to_index();
    let file = sq.get_file().to_index();
    (2..=5).contains(&rank) && (2..=5).contains(&file)
}

/// Score a move for ordering, higher searched first
fn score_move(board: &Board, m: ChessMove) -> i32 {
    let mut score = 0;

    if let Some(victim) = board.piece_on(m.get_dest()) {
        let attacker = board
            .piece_on(m.get_source())
            .map(piece_value)
            .unwrap_or(0);
        score += CAPTURE_BONUS + piece_value(victim) * 10 - attacker;
    }

    if let Some(promo) = m.get_promotion() {
        score += PROMOTION_BONUS + piece_value(promo);
    }

    if board.make_move_new(m).checkers().popcnt() > 0 {
        score += CHECK_BONUS;
    }

    if is_central(m.get_dest()) {
        score += CENTER_BONUS;
    }

    score
}

/// Reorder moves in place by descending static priority
pub fn order_moves(board: &Board, moves: &mut [ChessMove]) {
    let mut scored: Vec<(i32, ChessMove)> =
        moves.iter().map(|&m| (score_move(board, m), m)).collect();
    scored.sort_by_key(|&(s, _)| std::cmp::Reverse(s));
    for (slot, (_, m)) in moves.iter_mut().zip(scored) {
        *slot = m;
    }
}
