//! Key-value persistence boundary.
//!
//! The host supplies a `Store`; the trainer serializes its own structures
//! as versioned JSON and always replaces whole values, never partial
//! fields. Read failures degrade to defaults, write failures surface to
//! the caller without corrupting in-memory state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TrainerError;
use crate::puzzle::{Puzzle, PuzzleCache};
use crate::rating::{PersistedRating, UserRatingState, RATING_STATE_VERSION};

/// Store key for the rating state
pub const RATING_KEY: &str = "trainer/rating";

/// Store key for the puzzle cache
pub const CACHE_KEY: &str = "trainer/puzzles";

/// Minimal get/set interface the host backs with whatever it has
/// (user defaults, a file, a database row).
pub trait Store {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// In-memory store for tests and hosts without durable storage
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Versioned envelope for the cached puzzles
#[derive(Debug, Serialize, Deserialize)]
struct PersistedPuzzles {
    version: u32,
    puzzles: Vec<Puzzle>,
}

/// Load the rating state, falling back to defaults on any failure
pub fn load_rating(store: &impl Store) -> UserRatingState {
    match store.get(RATING_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<PersistedRating>(&raw) {
            Ok(persisted) if persisted.version == RATING_STATE_VERSION => persisted.state,
            Ok(persisted) => {
                warn!(
                    version = persisted.version,
                    "unknown rating state version, starting fresh"
                );
                UserRatingState::default()
            }
            Err(error) => {
                warn!(%error, "unreadable rating state, starting fresh");
                UserRatingState::default()
            }
        },
        Ok(None) => UserRatingState::default(),
        Err(error) => {
            warn!(%error, "rating state read failed, starting fresh");
            UserRatingState::default()
        }
    }
}

/// Write the rating state back as a whole
pub fn save_rating(store: &mut impl Store, state: &UserRatingState) -> Result<(), TrainerError> {
    let raw = serde_json::to_string(&PersistedRating {
        version: RATING_STATE_VERSION,
        state: state.clone(),
    })?;
    store.set(RATING_KEY, &raw)?;
    Ok(())
}

/// Load the puzzle cache, falling back to an empty cache on any failure
pub fn load_cache(store: &impl Store, capacity: usize) -> PuzzleCache {
    let empty = || PuzzleCache::new(capacity);
    match store.get(CACHE_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<PersistedPuzzles>(&raw) {
            Ok(persisted) if persisted.version == RATING_STATE_VERSION => {
                let mut cache = PuzzleCache::new(capacity);
                for puzzle in persisted.puzzles.into_iter().rev() {
                    cache.insert(puzzle);
                }
                cache
            }
            Ok(persisted) => {
                warn!(
                    version = persisted.version,
                    "unknown puzzle cache version, starting empty"
                );
                empty()
            }
            Err(error) => {
                warn!(%error, "unreadable puzzle cache, starting empty");
                empty()
            }
        },
        Ok(None) => empty(),
        Err(error) => {
            warn!(%error, "puzzle cache read failed, starting empty");
            empty()
        }
    }
}

/// Write the puzzle cache back as a whole, most recent first
pub fn save_cache(store: &mut impl Store, cache: &PuzzleCache) -> Result<(), TrainerError> {
    let raw = serde_json::to_string(&PersistedPuzzles {
        version: RATING_STATE_VERSION,
        puzzles: cache.iter().cloned().collect(),
    })?;
    store.set(CACHE_KEY, &raw)?;
    Ok(())
}
