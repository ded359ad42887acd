//! Adaptive puzzle generation.
//!
//! Plays a random legal game to reach a plausible middlegame, probes it
//! with the search engine, and keeps positions where the forcing line
//! swings the evaluation. The retry loop is bounded: exhausting it is an
//! explicit error, never an infinite loop.

use std::str::FromStr;
use std::time::{Duration, Instant};

use chess::{Board, ChessMove, Color, MoveGen};
use chess_engine::{extended_depth, search, Score};
use chess_tactics::{detect_themes, Theme};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::TrainerConfig;
use crate::error::TrainerError;
use crate::puzzle::{DifficultyBand, Puzzle};

/// Half-moves in a puzzle solution: best move, best reply, best move
const SOLUTION_PLIES: usize = 3;

pub struct PuzzleGenerator {
    config: TrainerConfig,
    rng: StdRng,
}

impl PuzzleGenerator {
    pub fn new(config: TrainerConfig) -> Self {
        PuzzleGenerator {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests and reproducible sessions
    pub fn with_seed(config: TrainerConfig, seed: u64) -> Self {
        PuzzleGenerator {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate one puzzle near the user's rating.
    ///
    /// `preferred` narrows generation to positions exhibiting at least one
    /// of the given themes; a puzzle is never returned silently missing
    /// them. Fails with `GenerationExhausted` after the configured number
    /// of attempts.
    pub fn generate(
        &mut self,
        user_rating: i32,
        current_streak: u32,
        preferred: &[Theme],
    ) -> Result<Puzzle, TrainerError> {
        let attempts = self.config.max_generation_attempts;
        for attempt in 1..=attempts {
            if let Some(puzzle) = self.try_generate(user_rating, current_streak, preferred) {
                debug!(attempt, id = %puzzle.id, "puzzle generated");
                return Ok(puzzle);
            }
        }
        warn!(attempts, "no tactical position found");
        Err(TrainerError::GenerationExhausted { attempts })
    }

    fn try_generate(
        &mut self,
        user_rating: i32,
        current_streak: u32,
        preferred: &[Theme],
    ) -> Option<Puzzle> {
        let board = self.random_walk();
        if board.status() != chess::BoardStatus::Ongoing {
            return None;
        }

        let depth = extended_depth(&board, self.config.search_depth);
        let result = search(&board, depth, Some(self.search_deadline()));
        let best = result.best_move?;

        if !self.is_tactical(&board, result.score) {
            return None;
        }

        let themes = detect_themes(&board);
        if !preferred.is_empty() && !preferred.iter().any(|t| themes.contains(t)) {
            return None;
        }

        let solution = self.solution_line(&board, best, depth);
        let target_rating = self.sample_target_rating(user_rating, current_streak);

        Some(Puzzle {
            id: format!("{:016x}", board.get_hash()),
            starting_fen: board.to_string(),
            solution,
            themes,
            target_rating,
            difficulty: DifficultyBand::from_rating(target_rating),
            attempts: 0,
            solved: false,
            best_solve_time_secs: None,
        })
    }

    /// Uniform random legal playout toward a middlegame position
    fn random_walk(&mut self) -> Board {
        let plies = self
            .rng
            .gen_range(self.config.min_walk_plies..=self.config.max_walk_plies);
        let mut board = Board::default();
        for _ in 0..plies {
            let moves: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
            if moves.is_empty() {
                break;
            }
            let pick = moves[self.rng.gen_range(0..moves.len())];
            board = board.make_move_new(pick);
        }
        board
    }

    /// A position is tactical when the forcing line found by search beats
    /// the static assessment by the configured swing, or forces mate for
    /// the side to move. Both scores are absolute, so the swing is signed
    /// by the mover's color.
    fn is_tactical(&self, board: &Board, searched: Score) -> bool {
        let static_eval = chess_engine::eval::evaluate(board);
        let swing = match board.side_to_move() {
            Color::White => searched.raw() - static_eval.raw(),
            Color::Black => static_eval.raw() - searched.raw(),
        };
        let mates_mover = match board.side_to_move() {
            Color::White => searched.is_white_mate(),
            Color::Black => searched.is_black_mate(),
        };
        mates_mover || swing >= self.config.swing_threshold_cp
    }

    /// Re-derive each half-move of the solution from a fresh search
    fn solution_line(&self, board: &Board, first: ChessMove, depth: u8) -> Vec<String> {
        let mut line = vec![first.to_string()];
        let mut current = board.make_move_new(first);

        while line.len() < SOLUTION_PLIES {
            if current.status() != chess::BoardStatus::Ongoing {
                break;
            }
            let result = search(&current, depth, Some(self.search_deadline()));
            let best = match result.best_move {
                Some(m) => m,
                None => break,
            };
            line.push(best.to_string());
            current = current.make_move_new(best);
        }
        line
    }

    /// Sample the puzzle's target rating near the user's, nudged harder
    /// on a hot streak and clamped to the configured bounds
    fn sample_target_rating(&mut self, user_rating: i32, current_streak: u32) -> i32 {
        let center = user_rating + (current_streak as i32) * 15;
        let band = self.config.rating_band;
        let target = self.rng.gen_range(center - band..=center + band);
        target.clamp(self.config.rating_floor, self.config.rating_ceiling)
    }

    fn search_deadline(&self) -> Instant {
        Instant::now() + Duration::from_millis(self.config.search_deadline_ms)
    }
}

/// Replay a puzzle's solution from its starting position, confirming
/// every stored move is legal. Returns the final board.
pub fn replay_solution(puzzle: &Puzzle) -> Result<Board, TrainerError> {
    let mut board = Board::from_str(&puzzle.starting_fen)
        .map_err(|e| TrainerError::InvalidPosition(e.to_string()))?;
    for raw in &puzzle.solution {
        let m = ChessMove::from_str(raw)
            .map_err(|e| TrainerError::InvalidPosition(format!("bad move {raw}: {e}")))?;
        if !board.legal(m) {
            return Err(TrainerError::InvalidPosition(format!(
                "illegal solution move {raw}"
            )));
        }
        board = board.make_move_new(m);
    }
    Ok(board)
}
