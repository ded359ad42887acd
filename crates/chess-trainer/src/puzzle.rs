//! Puzzle data model and the bounded in-memory cache.

use std::collections::{BTreeSet, VecDeque};

use chess_tactics::Theme;
use serde::{Deserialize, Serialize};

/// Difficulty bucket derived from the puzzle's target rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DifficultyBand {
    Beginner,
    Intermediate,
    Advanced,
    Master,
}

impl DifficultyBand {
    pub fn from_rating(rating: i32) -> Self {
        match rating {
            r if r < 1_000 => DifficultyBand::Beginner,
            r if r < 1_500 => DifficultyBand::Intermediate,
            r if r < 2_000 => DifficultyBand::Advanced,
            _ => DifficultyBand::Master,
        }
    }
}

/// A generated tactical puzzle.
///
/// `attempts`, `solved` and `best_solve_time_secs` are mutated only by the
/// rating loop on submission; everything else is immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    /// FEN of the position the solver starts from
    pub starting_fen: String,
    /// Solution mainline in coordinate algebraic form
    pub solution: Vec<String>,
    pub themes: BTreeSet<Theme>,
    pub target_rating: i32,
    pub difficulty: DifficultyBand,
    pub attempts: u32,
    pub solved: bool,
    pub best_solve_time_secs: Option<u32>,
}

/// Bounded most-recent-first puzzle cache. Inserting past capacity evicts
/// the oldest entry; solved puzzles stay cached for statistics until
/// evicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleCache {
    capacity: usize,
    entries: VecDeque<Puzzle>,
}

impl PuzzleCache {
    pub fn new(capacity: usize) -> Self {
        PuzzleCache {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn insert(&mut self, puzzle: Puzzle) {
        // Replace any stale entry with the same id
        self.entries.retain(|p| p.id != puzzle.id);
        self.entries.push_front(puzzle);
        self.entries.truncate(self.capacity);
    }

    pub fn get(&self, id: &str) -> Option<&Puzzle> {
        self.entries.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Puzzle> {
        self.entries.iter_mut().find(|p| p.id == id)
    }

    /// Most recently generated puzzle that is still unsolved, used as the
    /// fallback when generation is exhausted
    pub fn latest_unsolved(&self) -> Option<&Puzzle> {
        self.entries.iter().find(|p| !p.solved)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
