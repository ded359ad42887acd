//! Static evaluation.
//!
//! Hand-crafted terms, all scored absolute (White minus Black):
//! material, piece-square tables, mobility, king pawn shield, and a
//! doubled-pawn penalty. Terminal positions never reach this function;
//! the search substitutes mate/draw sentinels before evaluating.

use chess::{BitBoard, Board, Color, File, MoveGen, Piece, Rank, Square};

use crate::score::Score;

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 300;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

/// Centipawns per legal-move difference
const MOBILITY_WEIGHT: i32 = 10;

/// Centipawns per pawn shielding the king
const KING_SHIELD_WEIGHT: i32 = 20;

/// Centipawns per extra pawn stacked on a file
const DOUBLED_PAWN_PENALTY: i32 = 15;

/// Material value of a piece, king excluded
pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => 0,
    }
}

// Piece-square tables, written with rank 8 as the first row. White pieces
// index via `pst_index`, Black mirrors vertically.

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
     0,  0,  5,  5,  5,  5,  0, -5,
   -10,  5,  5,  5,  5,  5,  0,-10,
   -10,  0,  5,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_PST: [i32; 64] = [
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20,
];

fn pst_for(piece: Piece) -> &'static [i32; 64] {
    match piece {
        Piece::Pawn => &PAWN_PST,
        Piece::Knight => &KNIGHT_PST,
        Piece::Bishop => &BISHOP_PST,
        Piece::Rook => &ROOK_PST,
        Piece::Queen => &QUEEN_PST,
        Piece::King => &KING_PST,
    }
}

/// Table index for a square, mirrored vertically for Black
fn pst_index(square: Square, color: Color) -> usize {
    let rank = square.get_rank().to_index();
    let file = square.get_file().to_index();
    match color {
        Color::White => (7 - rank) * 8 + file,
        Color::Black => rank * 8 + file,
    }
}

/// Evaluate a position. Absolute convention: positive favors White.
pub fn evaluate(board: &Board) -> Score {
    let mut total = 0;

    for sq in *board.combined() {
        let piece = match board.piece_on(sq) {
            Some(p) => p,
            None => continue,
        };
        let color = match board.color_on(sq) {
            Some(c) => c,
            None => continue,
        };

        let value = piece_value(piece) + pst_for(piece)[pst_index(sq, color)];
        match color {
            Color::White => total += value,
            Color::Black => total -= value,
        }
    }

    total += mobility(board);
    total += king_shield(board, Color::White) - king_shield(board, Color::Black);
    total += doubled_pawns(board, Color::Black) - doubled_pawns(board, Color::White);

    Score::cp(total)
}

/// Legal-move-count difference, White minus Black, weighted.
/// The non-moving side's count comes from a null-move swap; when the side
/// to move is in check the swap is unavailable and the term is skipped.
fn mobility(board: &Board) -> i32 {
    let stm_moves = MoveGen::new_legal(board).len() as i32;
    let swapped = match board.null_move() {
        Some(b) => b,
        None => return 0,
    };
    let opp_moves = MoveGen::new_legal(&swapped).len() as i32;

    let (white_moves, black_moves) = match board.side_to_move() {
        Color::White => (stm_moves, opp_moves),
        Color::Black => (opp_moves, stm_moves),
    };
    (white_moves - black_moves) * MOBILITY_WEIGHT
}

/// Pawn-shield bonus: own pawns on the king's file and the two adjacent
/// files, one rank ahead of the king.
fn king_shield(board: &Board, color: Color) -> i32 {
    let king_sq = board.king_square(color);
    let king_rank = king_sq.get_rank().to_index() as i32;
    let king_file = king_sq.get_file().to_index() as i32;

    let front_rank = match color {
        Color::White => king_rank + 1,
        Color::Black => king_rank - 1,
    };
    if !(0..8).contains(&front_rank) {
        return 0;
    }

    let own_pawns = *board.pieces(Piece::Pawn) & *board.color_combined(color);
    let mut shield = 0;
    for file in (king_file - 1)..=(king_file + 1) {
        if !(0..8).contains(&file) {
            continue;
        }
        let sq = Square::make_square(
            Rank::from_index(front_rank as usize),
            File::from_index(file as usize),
        );
        if (own_pawns & BitBoard::from_square(sq)).popcnt() > 0 {
            shield += 1;
        }
    }
    shield * KING_SHIELD_WEIGHT
}

/// Penalty units for pawns stacked on a file (returned positive)
fn doubled_pawns(board: &Board, color: Color) -> i32 {
    let own_pawns = *board.pieces(Piece::Pawn) & *board.color_combined(color);
    let mut penalty = 0;
    for file_idx in 0..8 {
        let mut on_file = 0;
        for rank_idx in 0..8 {
            let sq = Square::make_square(Rank::from_index(rank_idx), File::from_index(file_idx));
            if (own_pawns & BitBoard::from_square(sq)).popcnt() > 0 {
                on_file += 1;
            }
        }
        if on_file > 1 {
            penalty += (on_file - 1) * DOUBLED_PAWN_PENALTY;
        }
    }
    penalty
}

/// Total non-king material on the board, both sides, in centipawns
pub fn non_king_material(board: &Board) -> i32 {
    let mut total = 0;
    for sq in *board.combined() {
        if let Some(piece) = board.piece_on(sq) {
            total += piece_value(piece);
        }
    }
    total
}
