//! Elo-style user rating state.
//!
//! A single `UserRatingState` value per user/session, owned by the
//! `Trainer` facade and persisted whole after every mutation. The paired
//! Elo update treats each puzzle as an opponent rated at the puzzle's
//! target rating.

use std::collections::{BTreeMap, BTreeSet};

use chess_tactics::Theme;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::TrainerConfig;

/// Version stamp for the persisted encoding
pub const RATING_STATE_VERSION: u32 = 1;

/// Rating every new user starts from
pub const INITIAL_RATING: i32 = 1_200;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRecord {
    pub solved: u32,
    pub attempted: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSample {
    pub at: DateTime<Utc>,
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRatingState {
    pub rating: i32,
    pub total_solved: u32,
    pub total_attempts: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub per_theme: BTreeMap<Theme, ThemeRecord>,
    pub history: Vec<RatingSample>,
}

impl Default for UserRatingState {
    fn default() -> Self {
        UserRatingState {
            rating: INITIAL_RATING,
            total_solved: 0,
            total_attempts: 0,
            current_streak: 0,
            best_streak: 0,
            per_theme: BTreeMap::new(),
            history: Vec::new(),
        }
    }
}

/// Versioned envelope written to the store
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedRating {
    pub version: u32,
    pub state: UserRatingState,
}

/// Logistic expected score of the user against a puzzle
pub fn expected_score(user_rating: i32, puzzle_rating: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(puzzle_rating - user_rating) / 400.0))
}

impl UserRatingState {
    /// Apply one puzzle result: Elo update, streaks, per-theme accuracy,
    /// bounded history. Returns the applied rating delta.
    pub fn apply_result(
        &mut self,
        puzzle_rating: i32,
        themes: &BTreeSet<Theme>,
        correct: bool,
        config: &TrainerConfig,
    ) -> i32 {
        let expected = expected_score(self.rating, puzzle_rating);
        let actual = if correct { 1.0 } else { 0.0 };
        let change = (config.elo_k_factor * (actual - expected)).round() as i32;

        let before = self.rating;
        self.rating = (self.rating + change).clamp(config.rating_floor, config.rating_ceiling);

        self.total_attempts += 1;
        if correct {
            self.total_solved += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }

        for theme in themes {
            let record = self.per_theme.entry(*theme).or_default();
            record.attempted += 1;
            if correct {
                record.solved += 1;
            }
        }

        self.history.push(RatingSample {
            at: Utc::now(),
            rating: self.rating,
        });
        if self.history.len() > config.history_window {
            let excess = self.history.len() - config.history_window;
            self.history.drain(..excess);
        }

        info!(
            correct,
            puzzle_rating,
            rating = self.rating,
            streak = self.current_streak,
            "rating updated"
        );
        self.rating - before
    }

    /// Per-theme solve accuracy over attempted themes
    pub fn theme_accuracy(&self) -> BTreeMap<Theme, f64> {
        self.per_theme
            .iter()
            .filter(|(_, record)| record.attempted > 0)
            .map(|(theme, record)| {
                (
                    *theme,
                    f64::from(record.solved) / f64::from(record.attempted),
                )
            })
            .collect()
    }
}
