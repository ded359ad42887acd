//! Depth-limited minimax search with alpha-beta pruning.
//!
//! White maximizes, Black minimizes; scores are absolute (see `score`).
//! There is no quiescence search: tactical accuracy at the horizon is
//! bounded by `max_depth` alone. An optional deadline is honored
//! cooperatively between node expansions, degrading to the best move
//! found so far rather than erroring.

use std::time::Instant;

use chess::{Board, ChessMove, Color, MoveGen};
use tracing::{debug, warn};

use crate::eval;
use crate::ordering;
use crate::score::Score;

/// Check the wall clock once per this many nodes
const DEADLINE_CHECK_INTERVAL: u64 = 512;

/// Material threshold below which callers should search deeper
const ENDGAME_MATERIAL: i32 = 2_600;

/// Outcome of a search call.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// `None` only when the root position is terminal
    pub best_move: Option<ChessMove>,
    pub score: Score,
    pub principal_line: Vec<ChessMove>,
    pub nodes: u64,
}

struct SearchContext {
    deadline: Option<Instant>,
    nodes: u64,
    stopped: bool,
}

impl SearchContext {
    fn new(deadline: Option<Instant>) -> Self {
        SearchContext {
            deadline,
            nodes: 0,
            stopped: false,
        }
    }

    /// Cooperative deadline check between node expansions
    fn out_of_time(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.nodes % DEADLINE_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.stopped = true;
                }
            }
        }
        self.stopped
    }
}

/// Score for a position with no legal moves at the given ply
fn terminal_score(board: &Board, ply: i32) -> Score {
    if board.checkers().popcnt() > 0 {
        // The side to move is checkmated
        match board.side_to_move() {
            Color::White => Score::black_mates_in(ply),
            Color::Black => Score::white_mates_in(ply),
        }
    } else {
        Score::draw()
    }
}

/// Search a position to `max_depth` plies.
///
/// Returns the best move, its absolute score, and the principal line.
/// `best_move` is `None` only when the position has no legal moves;
/// callers must branch on that before applying the move. A deadline
/// overrun returns the best fully-searched move so far.
pub fn search(board: &Board, max_depth: u8, deadline: Option<Instant>) -> SearchResult {
    let mut ctx = SearchContext::new(deadline);

    let mut moves: Vec<ChessMove> = MoveGen::new_legal(board).collect();
    if moves.is_empty() {
        return SearchResult {
            best_move: None,
            score: terminal_score(board, 0),
            principal_line: Vec::new(),
            nodes: 1,
        };
    }
    ordering::order_moves(board, &mut moves);

    let maximizing = board.side_to_move() == Color::White;
    let mut alpha = Score::neg_infinity();
    let mut beta = Score::infinity();

    let mut best_move = None;
    let mut best_score = if maximizing {
        Score::neg_infinity()
    } else {
        Score::infinity()
    };
    let mut principal_line = Vec::new();

    for m in moves {
        let child = board.make_move_new(m);
        let (score, line) = alphabeta(
            &child,
            max_depth.saturating_sub(1),
            1,
            alpha,
            beta,
            &mut ctx,
        );

        if ctx.stopped && best_move.is_some() {
            // Partial subtree, keep the last complete result
            break;
        }

        let improved = match best_move {
            None => true,
            Some(_) if maximizing => score > best_score,
            Some(_) => score < best_score,
        };
        if improved {
            best_score = score;
            best_move = Some(m);
            principal_line.clear();
            principal_line.push(m);
            principal_line.extend(line);
        }

        if maximizing {
            if best_score > alpha {
                alpha = best_score;
            }
        } else if best_score < beta {
            beta = best_score;
        }

        if ctx.stopped {
            break;
        }
    }

    if ctx.stopped {
        warn!(
            depth = max_depth,
            nodes = ctx.nodes,
            "search deadline reached, returning best move so far"
        );
    }
    debug!(
        depth = max_depth,
        nodes = ctx.nodes,
        score = %best_score,
        "search complete"
    );

    SearchResult {
        best_move,
        score: best_score,
        principal_line,
        nodes: ctx.nodes,
    }
}

fn alphabeta(
    board: &Board,
    depth: u8,
    ply: i32,
    mut alpha: Score,
    mut beta: Score,
    ctx: &mut SearchContext,
) -> (Score, Vec<ChessMove>) {
    ctx.nodes += 1;
    if ctx.out_of_time() {
        return (eval::evaluate(board), Vec::new());
    }

    let mut moves: Vec<ChessMove> = MoveGen::new_legal(board).collect();
    if moves.is_empty() {
        return (terminal_score(board, ply), Vec::new());
    }
    if depth == 0 {
        return (eval::evaluate(board), Vec::new());
    }
    ordering::order_moves(board, &mut moves);

    let maximizing = board.side_to_move() == Color::White;
    let mut best_score = if maximizing {
        Score::neg_infinity()
    } else {
        Score::infinity()
    };
    let mut best_line = Vec::new();

    for m in moves {
        let child = board.make_move_new(m);
        let (score, line) = alphabeta(&child, depth - 1, ply + 1, alpha, beta, ctx);

        let improved = if maximizing {
            score > best_score
        } else {
            score < best_score
        };
        if improved {
            best_score = score;
            best_line.clear();
            best_line.push(m);
            best_line.extend(line);
        }

        if maximizing {
            if best_score > alpha {
                alpha = best_score;
            }
        } else if best_score < beta {
            beta = best_score;
        }

        // Prune: the opponent already has a better option elsewhere
        if beta <= alpha {
            break;
        }
        if ctx.stopped {
            break;
        }
    }

    (best_score, best_line)
}

/// Depth adjustment hook: search two plies deeper once the board has
/// thinned out to endgame material.
pub fn extended_depth(board: &Board, base: u8) -> u8 {
    if eval::non_king_material(board) < ENDGAME_MATERIAL {
        base + 2
    } else {
        base
    }
}
