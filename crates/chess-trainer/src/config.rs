//! Trainer configuration from environment variables, with defaults that
//! suit an interactive offline session.

use std::env;

#[derive(Clone, Debug)]
pub struct TrainerConfig {
    /// Base search depth in plies (extended in endgames)
    pub search_depth: u8,

    /// Soft wall-clock bound per search call
    pub search_deadline_ms: u64,

    /// Full generation attempts before giving up
    pub max_generation_attempts: u32,

    /// Random-walk length bounds for reaching a middlegame, in plies
    pub min_walk_plies: u32,
    pub max_walk_plies: u32,

    /// Evaluation swing that marks a position as tactical, in centipawns
    pub swing_threshold_cp: i32,

    /// Elo K-factor for rating updates
    pub elo_k_factor: f64,

    /// Rating clamp bounds
    pub rating_floor: i32,
    pub rating_ceiling: i32,

    /// Half-width of the target-rating band around the user rating
    pub rating_band: i32,

    /// Bounded puzzle cache capacity
    pub cache_capacity: usize,

    /// Rating history entries retained
    pub history_window: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            search_depth: 3,
            search_deadline_ms: 1_500,
            max_generation_attempts: 10,
            min_walk_plies: 20,
            max_walk_plies: 40,
            swing_threshold_cp: 150,
            elo_k_factor: 32.0,
            rating_floor: 100,
            rating_ceiling: 3_000,
            rating_band: 200,
            cache_capacity: 100,
            history_window: 100,
        }
    }
}

impl TrainerConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let d = TrainerConfig::default();
        TrainerConfig {
            search_depth: env_or("TRAINER_SEARCH_DEPTH", d.search_depth),
            search_deadline_ms: env_or("TRAINER_SEARCH_DEADLINE_MS", d.search_deadline_ms),
            max_generation_attempts: env_or("TRAINER_MAX_ATTEMPTS", d.max_generation_attempts),
            min_walk_plies: env_or("TRAINER_MIN_WALK_PLIES", d.min_walk_plies),
            max_walk_plies: env_or("TRAINER_MAX_WALK_PLIES", d.max_walk_plies),
            swing_threshold_cp: env_or("TRAINER_SWING_THRESHOLD_CP", d.swing_threshold_cp),
            elo_k_factor: env_or("TRAINER_ELO_K", d.elo_k_factor),
            rating_floor: env_or("TRAINER_RATING_FLOOR", d.rating_floor),
            rating_ceiling: env_or("TRAINER_RATING_CEILING", d.rating_ceiling),
            rating_band: env_or("TRAINER_RATING_BAND", d.rating_band),
            cache_capacity: env_or("TRAINER_CACHE_CAPACITY", d.cache_capacity),
            history_window: env_or("TRAINER_HISTORY_WINDOW", d.history_window),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
