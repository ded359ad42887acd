//! Motif predicates.
//!
//! Every detector is independent and side-effect free. Unless stated
//! otherwise, motifs are read from the perspective of the side to move:
//! a fork is a fork the mover can create, a hanging piece is an enemy
//! piece the mover can win.

use chess::{BoardStatus, Board, MoveGen, Piece};
use tracing::trace;

use crate::board_map::{attackers_of, attacks_from, king_points, BoardMap};

/// Node ceiling for the recursive mate search. The recursion is
/// exponential in N; the budget guarantees termination and caps cost.
/// Exhausting it reports "no forced mate", never an error.
pub const MATE_NODE_BUDGET: u32 = 100_000;

/// Forced mate in exactly `n` of the mover's moves or fewer.
///
/// n = 1: some move checkmates immediately. n > 1: some move after which
/// every legal reply leads back into a forced mate in n - 1.
pub fn forced_mate_in(board: &Board, n: u8, budget: &mut u32) -> bool {
    debug_assert!(n >= 1);
    for m in MoveGen::new_legal(board) {
        if *budget == 0 {
            trace!("mate search budget exhausted");
            return false;
        }
        *budget -= 1;

        let after = board.make_move_new(m);
        match after.status() {
            BoardStatus::Checkmate => return true,
            BoardStatus::Stalemate => continue,
            BoardStatus::Ongoing => {
                if n == 1 {
                    continue;
                }
                let mut refuted = false;
                for reply in MoveGen::new_legal(&after) {
                    if *budget == 0 {
                        return false;
                    }
                    *budget -= 1;
                    let after_reply = after.make_move_new(reply);
                    if !forced_mate_in(&after_reply, n - 1, budget) {
                        refuted = true;
                        break;
                    }
                }
                if !refuted {
                    return true;
                }
            }
        }
    }
    false
}

/// Some legal move lands on a square from which it attacks two or more
/// enemy pieces each worth at least minor-piece value (the king counts
/// as a high-value target).
pub fn fork(map: &BoardMap) -> bool {
    let mover = map.side_to_move();
    for (&dest, arrivals) in &map.moves_to {
        for &m in arrivals {
            // A king cannot fork: it could never approach two defended pieces
            if map.board.piece_on(m.get_source()) == Some(Piece::King) {
                continue;
            }
            let after = map.board.make_move_new(m);

            let mut targets = 0;
            for attacked in attacks_from(&after, dest) {
                if after.color_on(attacked) != Some(!mover) {
                    continue;
                }
                let piece = match after.piece_on(attacked) {
                    Some(p) => p,
                    None => continue,
                };
                if king_points(piece) >= 3 {
                    targets += 1;
                }
            }
            if targets >= 2 {
                return true;
            }
        }
    }
    false
}

/// Some non-king piece of the side to move is absolutely pinned to its
/// king: any move off the pin ray would expose the king to check.
pub fn pin(map: &BoardMap) -> bool {
    let board = map.board;
    let own = *board.color_combined(board.side_to_move());
    let kings = *board.pieces(Piece::King);
    (*board.pinned() & own & !kings).popcnt() > 0
}

/// Some enemy piece above pawn value has more attackers than defenders.
pub fn hanging_piece(map: &BoardMap) -> bool {
    let mover = map.side_to_move();
    for &(sq, piece, color) in &map.pieces {
        if color == mover || piece == Piece::Pawn || piece == Piece::King {
            continue;
        }
        let attackers = attackers_of(map.board, mover, sq).popcnt();
        let defenders = attackers_of(map.board, color, sq).popcnt();
        if attackers > defenders {
            return true;
        }
    }
    false
}

/// The side to move's king sits on its home rank with at most two legal
/// king moves, the classic back-rank vulnerability screen.
pub fn back_rank(map: &BoardMap) -> bool {
    let board = map.board;
    let mover = map.side_to_move();
    let king_sq = board.king_square(mover);

    let home_rank = match mover {
        chess::Color::White => 0,
        chess::Color::Black => 7,
    };
    if king_sq.get_rank().to_index() != home_rank {
        return false;
    }

    let king_moves = map
        .legal
        .iter()
        .filter(|m| m.get_source() == king_sq)
        .count();
    king_moves <= 2
}

/// Seven or fewer non-king pieces remain
pub fn endgame(map: &BoardMap) -> bool {
    map.non_king_piece_count() <= 7
}

/// The side to move can promote a pawn
pub fn promotion(map: &BoardMap) -> bool {
    map.legal.iter().any(|m| m.get_promotion().is_some())
}

// Reserved extension points. The theme vocabulary names these motifs but
// no detector geometry is defined for them yet; until one is, they are
// explicitly unsupported and return false unconditionally.

pub fn skewer(_map: &BoardMap) -> bool {
    false
}

pub fn discovered_attack(_map: &BoardMap) -> bool {
    false
}

pub fn double_attack(_map: &BoardMap) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn board(fen: &str) -> Board {
        Board::from_str(fen).unwrap()
    }

    #[test]
    fn mate_in_one_back_rank() {
        let b = board("6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1");
        let mut budget = MATE_NODE_BUDGET;
        assert!(forced_mate_in(&b, 1, &mut budget));
    }

    #[test]
    fn no_mate_from_start() {
        let b = Board::default();
        let mut budget = MATE_NODE_BUDGET;
        assert!(!forced_mate_in(&b, 1, &mut budget));
        assert!(!forced_mate_in(&b, 2, &mut budget));
    }

    #[test]
    fn mate_in_two_with_rook_ladder() {
        // Two rooks ladder-mate the bare king: 1.Rb7 then 2.Ra8#
        let b = board("6k1/8/8/8/8/8/R7/1R4K1 w - - 0 1");
        let mut budget = MATE_NODE_BUDGET;
        assert!(!forced_mate_in(&b, 1, &mut budget));
        let mut budget = MATE_NODE_BUDGET;
        assert!(forced_mate_in(&b, 2, &mut budget));
    }

    #[test]
    fn exhausted_budget_reports_no_mate() {
        let b = board("6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1");
        let mut budget = 0;
        assert!(!forced_mate_in(&b, 1, &mut budget));
    }

    #[test]
    fn royal_knight_fork_detected() {
        // Nc7+ forks the a8 king and the e8 rook
        let b = board("k3r3/8/8/3N4/8/8/8/6K1 w - - 0 1");
        let map = BoardMap::new(&b);
        assert!(fork(&map));
    }

    #[test]
    fn no_fork_without_double_target() {
        let b = board("k7/8/8/3N4/8/8/8/6K1 w - - 0 1");
        let map = BoardMap::new(&b);
        assert!(!fork(&map));
    }

    #[test]
    fn absolute_pin_detected() {
        // White knight e4 pinned against the king by the e8 rook
        let b = board("4r1k1/8/8/8/4N3/8/8/4K3 w - - 0 1");
        let map = BoardMap::new(&b);
        assert!(pin(&map));
    }

    #[test]
    fn hanging_rook_detected() {
        // Black rook d5 attacked by the b3 bishop, nothing defends it
        let b = board("6k1/8/8/3r4/8/1B6/8/6K1 w - - 0 1");
        let map = BoardMap::new(&b);
        assert!(hanging_piece(&map));
    }

    #[test]
    fn defended_piece_is_not_hanging() {
        // Same rook, now defended by a pawn on e6
        let b = board("6k1/8/4p3/3r4/8/1B6/8/6K1 w - - 0 1");
        let map = BoardMap::new(&b);
        assert!(!hanging_piece(&map));
    }

    #[test]
    fn trapped_home_rank_king_flags_back_rank() {
        // King boxed in by its own pawn shelter, two flight squares
        let b = board("2r3k1/8/8/8/8/8/5PPP/6K1 w - - 0 1");
        let map = BoardMap::new(&b);
        assert!(back_rank(&map));
    }

    #[test]
    fn open_king_does_not_flag_back_rank() {
        let b = board("6k1/8/8/8/8/6K1/8/2r5 w - - 0 1");
        let map = BoardMap::new(&b);
        assert!(!back_rank(&map));
    }

    #[test]
    fn promotion_available() {
        let b = board("8/4P1k1/8/8/8/8/8/4K3 w - - 0 1");
        let map = BoardMap::new(&b);
        assert!(promotion(&map));
        assert!(endgame(&map));
    }

    #[test]
    fn reserved_detectors_never_fire() {
        let map_board = Board::default();
        let map = BoardMap::new(&map_board);
        assert!(!skewer(&map));
        assert!(!discovered_attack(&map));
        assert!(!double_attack(&map));
    }
}
