pub use chess;

pub mod eval;
pub mod ordering;
pub mod score;
pub mod search;

pub use score::Score;
pub use search::{extended_depth, search, SearchResult};
