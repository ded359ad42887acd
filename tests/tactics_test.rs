//! Integration tests: theme detection over hand-curated positions.
//!
//! Each fixture is a FEN with known motifs; assertions check membership
//! (and targeted absences) rather than guessing at every incidental tag.

use std::collections::BTreeSet;
use std::str::FromStr;

use chess::Board;
use chess_tactics::{detect_themes, Theme};

fn themes_of(fen: &str) -> BTreeSet<Theme> {
    let board = Board::from_str(fen).expect("fixture FEN must parse");
    detect_themes(&board)
}

#[test]
fn back_rank_mate_in_one_for_white() {
    let themes = themes_of("6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1");
    assert!(themes.contains(&Theme::MateIn1));
    assert!(themes.contains(&Theme::Endgame));
    assert!(!themes.contains(&Theme::MateIn2));
}

#[test]
fn back_rank_mate_in_one_for_black() {
    // Same motif with colors flipped; detection is side-agnostic
    let themes = themes_of("4r2k/8/8/8/8/8/5PPP/6K1 b - - 0 1");
    assert!(themes.contains(&Theme::MateIn1));
}

#[test]
fn rook_ladder_is_mate_in_two() {
    let themes = themes_of("6k1/8/8/8/8/8/R7/1R4K1 w - - 0 1");
    assert!(themes.contains(&Theme::MateIn2));
    assert!(!themes.contains(&Theme::MateIn1));
}

#[test]
fn scholars_mate_pattern() {
    let themes =
        themes_of("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 4 4");
    assert!(themes.contains(&Theme::MateIn1));
    assert!(!themes.contains(&Theme::Endgame));
}

#[test]
fn knight_fork_of_king_and_rook() {
    let themes = themes_of("k3r3/8/8/3N4/8/8/8/6K1 w - - 0 1");
    assert!(themes.contains(&Theme::Fork));
    assert!(themes.contains(&Theme::Endgame));
}

#[test]
fn absolute_pin_on_the_e_file() {
    let themes = themes_of("4r1k1/8/8/8/4N3/8/8/4K3 w - - 0 1");
    assert!(themes.contains(&Theme::Pin));
}

#[test]
fn undefended_rook_is_hanging() {
    let themes = themes_of("6k1/8/8/3r4/8/1B6/8/6K1 w - - 0 1");
    assert!(themes.contains(&Theme::HangingPiece));
    assert!(!themes.contains(&Theme::Fork));
}

#[test]
fn defended_rook_is_not_hanging() {
    let themes = themes_of("6k1/8/4p3/3r4/8/1B6/8/6K1 w - - 0 1");
    assert!(!themes.contains(&Theme::HangingPiece));
}

#[test]
fn promotion_square_in_reach() {
    let themes = themes_of("8/4P1k1/8/8/8/8/8/4K3 w - - 0 1");
    assert!(themes.contains(&Theme::Promotion));
    assert!(themes.contains(&Theme::Endgame));
}

#[test]
fn sheltered_king_flags_back_rank_screen() {
    let themes = themes_of("2r3k1/8/8/8/8/8/5PPP/6K1 w - - 0 1");
    assert!(themes.contains(&Theme::BackRank));
}

#[test]
fn bare_rook_endgame() {
    let themes = themes_of("8/8/8/4k3/8/8/8/4K2R w - - 0 1");
    assert!(themes.contains(&Theme::Endgame));
    assert!(!themes.contains(&Theme::Promotion));
}

#[test]
fn quiet_opening_has_no_mate_or_material_tactics() {
    let themes =
        themes_of("r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4");
    assert!(!themes.contains(&Theme::MateIn1));
    assert!(!themes.contains(&Theme::HangingPiece));
    assert!(!themes.contains(&Theme::Endgame));
    assert!(!themes.contains(&Theme::Promotion));
}

#[test]
fn stalemated_side_yields_exactly_the_screens() {
    // Black is stalemated: no moves, so only the static screens can fire
    let themes = themes_of("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    let expected: BTreeSet<Theme> = [Theme::BackRank, Theme::Endgame].into_iter().collect();
    assert_eq!(themes, expected);
}

#[test]
fn reserved_themes_never_appear() {
    for fen in [
        "6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1",
        "k3r3/8/8/3N4/8/8/8/6K1 w - - 0 1",
        "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    ] {
        let themes = themes_of(fen);
        assert!(!themes.contains(&Theme::Skewer));
        assert!(!themes.contains(&Theme::DiscoveredAttack));
        assert!(!themes.contains(&Theme::DoubleAttack));
    }
}
