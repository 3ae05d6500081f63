//! Attack and check detection.
//!
//! A square is attacked when an enemy piece can geometrically reach it,
//! i.e. it is among that piece's [pseudo-legal targets]. Whether the
//! attacking piece is itself pinned is irrelevant: a pinned piece still
//! gives check. Only pseudo-legal generation is used here, never the
//! legality filter.
//!
//! [pseudo-legal targets]: crate::chess::movegen::pseudo_legal_targets

use crate::chess::board::Board;
use crate::chess::core::{Move, Player, Square};
use crate::chess::movegen::pseudo_legal_targets;

/// Returns true iff some piece of player `by` has `square` among its
/// pseudo-legal targets.
///
/// For an empty square this counts pawn pushes and misses pawn diagonals.
/// Checks are always asked about the square a king stands on, where the
/// reach of a pawn is exactly its diagonals.
#[must_use]
pub fn is_attacked(board: &Board, square: Square, by: Player) -> bool {
    attacked(board, square, by, None)
}

/// Checks whether the king of `player` is attacked by the opponent. A board
/// without such a king is never in check.
#[must_use]
pub fn is_in_check(board: &Board, player: Player, last_move: Option<&Move>) -> bool {
    board
        .king_square(player)
        .is_some_and(|king| attacked(board, king, player.opponent(), last_move))
}

fn attacked(board: &Board, square: Square, by: Player, last_move: Option<&Move>) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.owner == by)
        .any(|(from, _)| pseudo_legal_targets(board, from, last_move).contains(&square))
}
