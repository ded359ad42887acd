//! Offline chess training core: puzzle generation, solution grading, and
//! an Elo-style adaptive rating loop.
//!
//! The `Trainer` facade owns one user's rating state and puzzle cache,
//! loads both once at construction, and writes them back through the
//! host-supplied `Store` after every mutation. One `Trainer` per
//! user/session; it is not meant to be shared across threads.

pub use chess;

pub mod config;
pub mod error;
pub mod generator;
pub mod puzzle;
pub mod rating;
pub mod store;

use std::str::FromStr;

use chess::{Board, ChessMove};
use tracing::{debug, info};

pub use chess_engine::{extended_depth, search, Score, SearchResult};
pub use chess_tactics::{detect_themes, Theme};

pub use config::TrainerConfig;
pub use error::TrainerError;
pub use generator::{replay_solution, PuzzleGenerator};
pub use puzzle::{DifficultyBand, Puzzle, PuzzleCache};
pub use rating::UserRatingState;
pub use store::{MemoryStore, Store};

/// Outcome of a solution submission
#[derive(Debug, Clone, Copy)]
pub struct SolutionReport {
    pub correct: bool,
    pub rating_change: i32,
    pub new_rating: i32,
    pub new_streak: u32,
}

/// Training session facade over one user's state.
pub struct Trainer<S: Store> {
    config: TrainerConfig,
    store: S,
    rating: UserRatingState,
    cache: PuzzleCache,
    generator: PuzzleGenerator,
}

impl<S: Store> Trainer<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, TrainerConfig::default())
    }

    /// Load persisted state through the store and start a session
    pub fn with_config(store: S, config: TrainerConfig) -> Self {
        let rating = store::load_rating(&store);
        let cache = store::load_cache(&store, config.cache_capacity);
        let generator = PuzzleGenerator::new(config.clone());
        Trainer {
            config,
            store,
            rating,
            cache,
            generator,
        }
    }

    /// Session with a deterministic generator, for tests and replays
    pub fn with_seed(store: S, config: TrainerConfig, seed: u64) -> Self {
        let mut trainer = Self::with_config(store, config);
        trainer.generator = PuzzleGenerator::with_seed(trainer.config.clone(), seed);
        trainer
    }

    /// Generate a puzzle near the user's current rating and cache it.
    ///
    /// With a non-empty `preferred` list the puzzle is guaranteed to carry
    /// at least one requested theme, or generation fails with
    /// `GenerationExhausted`; fall back to `fallback_puzzle` then.
    pub fn generate_puzzle(&mut self, preferred: &[Theme]) -> Result<Puzzle, TrainerError> {
        let puzzle =
            self.generator
                .generate(self.rating.rating, self.rating.current_streak, preferred)?;
        self.cache.insert(puzzle.clone());
        store::save_cache(&mut self.store, &self.cache)?;
        Ok(puzzle)
    }

    /// Most recent cached puzzle that is still unsolved
    pub fn fallback_puzzle(&self) -> Option<&Puzzle> {
        self.cache.latest_unsolved()
    }

    /// Admit an externally produced puzzle (e.g. an imported set) into
    /// the cache after checking its solution replays legally
    pub fn import_puzzle(&mut self, puzzle: Puzzle) -> Result<(), TrainerError> {
        generator::replay_solution(&puzzle)?;
        self.cache.insert(puzzle);
        store::save_cache(&mut self.store, &self.cache)?;
        Ok(())
    }

    /// Grade a submitted solution and update the rating state.
    ///
    /// Wrong length, unparseable moves, and wrong moves are all graded
    /// incorrect; only an unknown puzzle id or a persistence failure is
    /// an error.
    pub fn submit_solution(
        &mut self,
        puzzle_id: &str,
        moves: &[String],
        elapsed_secs: u32,
    ) -> Result<SolutionReport, TrainerError> {
        let puzzle = self
            .cache
            .get(puzzle_id)
            .cloned()
            .ok_or_else(|| TrainerError::UnknownPuzzle(puzzle_id.to_string()))?;

        let correct = validate_solution(&puzzle, moves)?;
        let rating_change =
            self.rating
                .apply_result(puzzle.target_rating, &puzzle.themes, correct, &self.config);

        if let Some(entry) = self.cache.get_mut(puzzle_id) {
            entry.attempts += 1;
            if correct {
                entry.solved = true;
                entry.best_solve_time_secs = Some(match entry.best_solve_time_secs {
                    Some(best) => best.min(elapsed_secs),
                    None => elapsed_secs,
                });
            }
        }

        store::save_rating(&mut self.store, &self.rating)?;
        store::save_cache(&mut self.store, &self.cache)?;

        info!(
            puzzle_id,
            correct,
            rating = self.rating.rating,
            "solution graded"
        );
        Ok(SolutionReport {
            correct,
            rating_change,
            new_rating: self.rating.rating,
            new_streak: self.rating.current_streak,
        })
    }

    pub fn rating_state(&self) -> &UserRatingState {
        &self.rating
    }

    /// Solve accuracy per attempted theme
    pub fn theme_performance(&self) -> std::collections::BTreeMap<Theme, f64> {
        self.rating.theme_accuracy()
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Tear down the session, handing the backing store back to the host
    pub fn into_store(self) -> S {
        self.store
    }
}

/// Replay submitted moves against the stored solution, comparing
/// (from, to, promotion) triples so notation differences don't matter.
fn validate_solution(puzzle: &Puzzle, moves: &[String]) -> Result<bool, TrainerError> {
    if moves.len() != puzzle.solution.len() {
        debug!(
            expected = puzzle.solution.len(),
            got = moves.len(),
            "solution length mismatch"
        );
        return Ok(false);
    }

    let mut board = Board::from_str(&puzzle.starting_fen)
        .map_err(|e| TrainerError::InvalidPosition(e.to_string()))?;

    for (submitted, expected) in moves.iter().zip(&puzzle.solution) {
        // The stored solution was generated from legal moves; a parse
        // failure here means the cache is corrupt
        let expected_move = parse_move(&board, expected).ok_or_else(|| {
            TrainerError::InvalidPosition(format!("stored solution move {expected} is not legal"))
        })?;

        let submitted_move = match parse_move(&board, submitted) {
            Some(m) => m,
            None => return Ok(false),
        };

        let same = submitted_move.get_source() == expected_move.get_source()
            && submitted_move.get_dest() == expected_move.get_dest()
            && submitted_move.get_promotion() == expected_move.get_promotion();
        if !same {
            return Ok(false);
        }

        board = board.make_move_new(expected_move);
    }
    Ok(true)
}

/// Accept SAN ("Re8", "exd5") or coordinate form ("e1e8"), legal moves only
fn parse_move(board: &Board, raw: &str) -> Option<ChessMove> {
    // Check and mate suffixes are decoration, not identity
    let trimmed = raw.trim_end_matches(['+', '#']);
    if let Ok(m) = ChessMove::from_san(board, trimmed) {
        return Some(m);
    }
    if let Ok(m) = ChessMove::from_str(trimmed) {
        if board.legal(m) {
            return Some(m);
        }
    }
    None
}
