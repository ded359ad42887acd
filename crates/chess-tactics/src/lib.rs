//! Tactical motif recognition over single positions.
//!
//! Each motif is an independent boolean predicate over a precomputed
//! board map (piece placement, legal moves indexed by destination, and
//! attack primitives). Detection never mutates the position and never
//! encodes chess legality itself.

pub use chess;

pub mod board_map;
pub mod detectors;

use std::collections::BTreeSet;

use chess::Board;
use serde::{Deserialize, Serialize};

use board_map::BoardMap;

/// Closed vocabulary of tactical motifs
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    MateIn1,
    MateIn2,
    MateIn3,
    Fork,
    Pin,
    Skewer,
    DiscoveredAttack,
    DoubleAttack,
    BackRank,
    HangingPiece,
    Endgame,
    Promotion,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[
            Theme::MateIn1,
            Theme::MateIn2,
            Theme::MateIn3,
            Theme::Fork,
            Theme::Pin,
            Theme::Skewer,
            Theme::DiscoveredAttack,
            Theme::DoubleAttack,
            Theme::BackRank,
            Theme::HangingPiece,
            Theme::Endgame,
            Theme::Promotion,
        ]
    }
}

/// Classify a position against the theme vocabulary.
///
/// Mate themes are tagged with the smallest forced distance only. The
/// `Skewer`, `DiscoveredAttack` and `DoubleAttack` detectors are reserved
/// extension points and never fire (see `detectors`).
pub fn detect_themes(board: &Board) -> BTreeSet<Theme> {
    let map = BoardMap::new(board);
    let mut themes = BTreeSet::new();

    let mut budget = detectors::MATE_NODE_BUDGET;
    if detectors::forced_mate_in(board, 1, &mut budget) {
        themes.insert(Theme::MateIn1);
    } else if detectors::forced_mate_in(board, 2, &mut budget) {
        themes.insert(Theme::MateIn2);
    } else if detectors::forced_mate_in(board, 3, &mut budget) {
        themes.insert(Theme::MateIn3);
    }

    if detectors::fork(&map) {
        themes.insert(Theme::Fork);
    }
    if detectors::pin(&map) {
        themes.insert(Theme::Pin);
    }
    if detectors::hanging_piece(&map) {
        themes.insert(Theme::HangingPiece);
    }
    if detectors::back_rank(&map) {
        themes.insert(Theme::BackRank);
    }
    if detectors::endgame(&map) {
        themes.insert(Theme::Endgame);
    }
    if detectors::promotion(&map) {
        themes.insert(Theme::Promotion);
    }
    if detectors::skewer(&map) {
        themes.insert(Theme::Skewer);
    }
    if detectors::discovered_attack(&map) {
        themes.insert(Theme::DiscoveredAttack);
    }
    if detectors::double_attack(&map) {
        themes.insert(Theme::DoubleAttack);
    }

    themes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn theme_serde_uses_camel_case() {
        let json = serde_json::to_string(&Theme::BackRank).unwrap();
        assert_eq!(json, "\"backRank\"");
        let back: Theme = serde_json::from_str("\"mateIn2\"").unwrap();
        assert_eq!(back, Theme::MateIn2);
    }

    #[test]
    fn vocabulary_is_closed_and_distinct() {
        let all: BTreeSet<Theme> = Theme::all().iter().copied().collect();
        assert_eq!(all.len(), Theme::all().len());
        assert_eq!(all.len(), 12);
    }

    #[test]
    fn starting_position_only_flags_the_boxed_in_king() {
        // back_rank is a king-safety screen: a home-rank king with at most
        // two flight squares fires even before any attack exists
        let themes = detect_themes(&Board::default());
        let expected: BTreeSet<Theme> = [Theme::BackRank].into_iter().collect();
        assert_eq!(themes, expected);
    }

    #[test]
    fn sparse_position_is_endgame() {
        let board = Board::from_str("8/5pk1/6p1/8/3R4/6P1/5PK1/8 w - - 0 1").unwrap();
        assert!(detect_themes(&board).contains(&Theme::Endgame));
    }
}
