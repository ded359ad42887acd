//! Shared helpers for the integration tests
#![allow(dead_code)]

use std::collections::BTreeSet;

use chess_trainer::{DifficultyBand, MemoryStore, Puzzle, Theme, Trainer, TrainerConfig};

/// Opt-in log output for debugging test runs (RUST_LOG=debug)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Config tuned for test runtime: shallow searches, short deadlines
pub fn fast_config() -> TrainerConfig {
    TrainerConfig {
        search_depth: 2,
        search_deadline_ms: 250,
        max_generation_attempts: 6,
        ..TrainerConfig::default()
    }
}

pub fn fresh_trainer() -> Trainer<MemoryStore> {
    init_tracing();
    Trainer::with_config(MemoryStore::default(), fast_config())
}

/// Hand-built back-rank mate puzzle rated evenly against a new user
pub fn back_rank_puzzle() -> Puzzle {
    Puzzle {
        id: "backrank-1".to_string(),
        starting_fen: "6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1".to_string(),
        solution: vec!["e1e8".to_string()],
        themes: [Theme::MateIn1, Theme::Endgame]
            .into_iter()
            .collect::<BTreeSet<_>>(),
        target_rating: 1_200,
        difficulty: DifficultyBand::Intermediate,
        attempts: 0,
        solved: false,
        best_solve_time_secs: None,
    }
}
