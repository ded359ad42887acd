//! Precomputed board state shared by the motif detectors.
//!
//! Built once per classification call: the piece placement, the legal
//! moves of the side to move indexed by destination square, and bitboard
//! attack primitives for counting attackers and defenders.

use std::collections::HashMap;

use chess::{BitBoard, Board, ChessMove, Color, File, MoveGen, Piece, Rank, Square, EMPTY};

// Material points on the classic 1/3/3/5/9 scale
pub const PAWN_POINTS: i32 = 1;
pub const KNIGHT_POINTS: i32 = 3;
pub const BISHOP_POINTS: i32 = 3;
pub const ROOK_POINTS: i32 = 5;
pub const QUEEN_POINTS: i32 = 9;
pub const KING_POINTS: i32 = 99;

/// Material points of a piece, king counted as zero
pub fn piece_points(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_POINTS,
        Piece::Knight => KNIGHT_POINTS,
        Piece::Bishop => BISHOP_POINTS,
        Piece::Rook => ROOK_POINTS,
        Piece::Queen => QUEEN_POINTS,
        Piece::King => 0,
    }
}

/// Material points with the king as a high-value target (fork detection)
pub fn king_points(piece: Piece) -> i32 {
    if piece == Piece::King {
        KING_POINTS
    } else {
        piece_points(piece)
    }
}

/// Diagonal capture squares of a pawn, pushes excluded
pub fn pawn_attacks(square: Square, color: Color) -> BitBoard {
    let rank = square.get_rank().to_index() as i32;
    let file = square.get_file().to_index() as i32;
    let forward = if color == Color::White { 1 } else { -1 };

    let mut bb = EMPTY;
    for side in [-1i32, 1] {
        let (r, f) = (rank + forward, file + side);
        if (0..8).contains(&r) && (0..8).contains(&f) {
            bb |= BitBoard::from_square(Square::make_square(
                Rank::from_index(r as usize),
                File::from_index(f as usize),
            ));
        }
    }
    bb
}

/// Squares attacked by the piece standing on `square`
pub fn attacks_from(board: &Board, square: Square) -> BitBoard {
    let piece = match board.piece_on(square) {
        Some(p) => p,
        None => return EMPTY,
    };
    let occupied = *board.combined();

    match piece {
        Piece::Pawn => {
            let color = board.color_on(square).unwrap_or(Color::White);
            pawn_attacks(square, color)
        }
        Piece::Knight => chess::get_knight_moves(square),
        Piece::King => chess::get_king_moves(square),
        Piece::Bishop => chess::get_bishop_moves(square, occupied),
        Piece::Rook => chess::get_rook_moves(square, occupied),
        Piece::Queen => {
            chess::get_bishop_moves(square, occupied) | chess::get_rook_moves(square, occupied)
        }
    }
}

/// All pieces of `color` attacking `square`, found by reverse lookup:
/// place each piece type on the target square and intersect its attack
/// set with the actual pieces of that type.
pub fn attackers_of(board: &Board, color: Color, square: Square) -> BitBoard {
    let occupied = *board.combined();
    let own = *board.color_combined(color);
    let mut found = EMPTY;

    found |= pawn_attacks(square, !color) & *board.pieces(Piece::Pawn) & own;
    found |= chess::get_knight_moves(square) & *board.pieces(Piece::Knight) & own;
    found |= chess::get_king_moves(square) & *board.pieces(Piece::King) & own;

    let diagonal = chess::get_bishop_moves(square, occupied);
    found |= diagonal & (*board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen)) & own;

    let straight = chess::get_rook_moves(square, occupied);
    found |= straight & (*board.pieces(Piece::Rook) | *board.pieces(Piece::Queen)) & own;

    found
}

/// Material points of one side, king excluded
pub fn material_points(board: &Board, color: Color) -> i32 {
    let own = *board.color_combined(color);
    let mut total = 0;
    for sq in own {
        if let Some(piece) = board.piece_on(sq) {
            total += piece_points(piece);
        }
    }
    total
}

/// Per-call precomputation handed to every detector.
pub struct BoardMap<'a> {
    pub board: &'a Board,
    /// Every occupied square with its piece and color
    pub pieces: Vec<(Square, Piece, Color)>,
    /// Legal moves of the side to move
    pub legal: Vec<ChessMove>,
    /// Legal moves indexed by destination square
    pub moves_to: HashMap<Square, Vec<ChessMove>>,
}

impl<'a> BoardMap<'a> {
    pub fn new(board: &'a Board) -> Self {
        let mut pieces = Vec::with_capacity(board.combined().popcnt() as usize);
        for sq in *board.combined() {
            if let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) {
                pieces.push((sq, piece, color));
            }
        }

        let legal: Vec<ChessMove> = MoveGen::new_legal(board).collect();
        let mut moves_to: HashMap<Square, Vec<ChessMove>> = HashMap::new();
        for &m in &legal {
            moves_to.entry(m.get_dest()).or_default().push(m);
        }

        BoardMap {
            board,
            pieces,
            legal,
            moves_to,
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Non-king piece count, both sides
    pub fn non_king_piece_count(&self) -> usize {
        self.pieces
            .iter()
            .filter(|(_, piece, _)| *piece != Piece::King)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sq(name: &str) -> Square {
        Square::from_str(name).unwrap()
    }

    #[test]
    fn pawn_attacks_are_diagonal_only() {
        let bb = pawn_attacks(sq("e4"), Color::White);
        assert_eq!(bb.popcnt(), 2);
        assert!((bb & BitBoard::from_square(sq("d5"))).popcnt() > 0);
        assert!((bb & BitBoard::from_square(sq("f5"))).popcnt() > 0);

        let edge = pawn_attacks(sq("a2"), Color::White);
        assert_eq!(edge.popcnt(), 1);
    }

    #[test]
    fn attackers_found_by_reverse_lookup() {
        // White knight f3 and pawn d4 both attack e5
        let board = Board::from_str(
            "rnbqkbnr/pppp1ppp/8/4p3/3P4/5N2/PPP1PPPP/RNBQKB1R w KQkq - 0 3",
        )
        .unwrap();
        let attackers = attackers_of(&board, Color::White, sq("e5"));
        assert_eq!(attackers.popcnt(), 2);
        assert!((attackers & BitBoard::from_square(sq("f3"))).popcnt() > 0);
        assert!((attackers & BitBoard::from_square(sq("d4"))).popcnt() > 0);
    }

    #[test]
    fn sliding_attacks_stop_at_blockers() {
        let board = Board::from_str("4k3/8/8/4p3/8/8/4R3/4K3 w - - 0 1").unwrap();
        let rook = attacks_from(&board, sq("e2"));
        // Rook sees up to the e5 pawn but not beyond it
        assert!((rook & BitBoard::from_square(sq("e5"))).popcnt() > 0);
        assert!((rook & BitBoard::from_square(sq("e6"))).popcnt() == 0);
    }

    #[test]
    fn map_indexes_moves_by_destination() {
        let board = Board::default();
        let map = BoardMap::new(&board);
        assert_eq!(map.legal.len(), 20);
        // e4 is reachable by exactly one opening move
        assert_eq!(map.moves_to.get(&sq("e4")).map(Vec::len), Some(1));
        assert_eq!(map.non_king_piece_count(), 30);
    }

    #[test]
    fn material_points_ignore_kings() {
        let board = Board::default();
        assert_eq!(material_points(&board, Color::White), 39);
        assert_eq!(material_points(&board, Color::Black), 39);
    }
}
