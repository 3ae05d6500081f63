//! Legal move generation: [pseudo-legal targets] that do not leave the
//! mover's king attacked.
//!
//! Each candidate is simulated on a copy of the board and rejected if the
//! king is in check afterwards. Castling additionally requires the king not
//! to be in check before the move and the single square it passes through
//! not to be attacked.
//!
//! [pseudo-legal targets]: crate::chess::movegen::pseudo_legal_targets

use crate::chess::attacks::is_in_check;
use crate::chess::board::Board;
use crate::chess::core::{Move, MoveFlags, Piece, PieceKind, Player, Promotion, Square};
use crate::chess::execute::relocate;
use crate::chess::movegen::pseudo_legal_targets;

/// Returns the legal moves of the piece standing on `origin`. The list is
/// empty if the square is empty or the piece does not belong to `mover`.
///
/// Moves carry [`MoveFlags`] describing the special rules they trigger.
/// Promotions are listed once per target square with [`Promotion::Queen`]
/// preselected; the final choice is made by replacing it (see
/// [`Move::with_promotion`]).
#[must_use]
pub fn generate_legal_moves(
    board: &Board,
    origin: Square,
    mover: Player,
    last_move: Option<&Move>,
) -> Vec<Move> {
    let Some(piece) = board.at(origin) else {
        return Vec::new();
    };
    if piece.owner != mover {
        return Vec::new();
    }
    pseudo_legal_targets(board, origin, last_move)
        .into_iter()
        .map(|to| classify(board, piece, origin, to))
        .filter(|candidate| is_legal(board, piece, candidate, last_move))
        .collect()
}

/// Legal moves of all pieces of `mover`.
#[must_use]
pub fn all_legal_moves(board: &Board, mover: Player, last_move: Option<&Move>) -> Vec<Move> {
    board
        .pieces()
        .filter(|(_, piece)| piece.owner == mover)
        .flat_map(|(origin, _)| generate_legal_moves(board, origin, mover, last_move))
        .collect()
}

/// Returns true if `mover` has at least one legal move. Stops at the first
/// one found.
pub(super) fn has_legal_moves(board: &Board, mover: Player, last_move: Option<&Move>) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.owner == mover)
        .any(|(origin, piece)| {
            pseudo_legal_targets(board, origin, last_move)
                .into_iter()
                .any(|to| is_legal(board, piece, &classify(board, piece, origin, to), last_move))
        })
}

fn classify(board: &Board, piece: Piece, from: Square, to: Square) -> Move {
    let mut flags = MoveFlags::empty();
    match piece.kind {
        PieceKind::King if from.col().abs_diff(to.col()) == 2 => flags |= MoveFlags::CASTLING,
        PieceKind::Pawn => {
            if from.col() != to.col() && board.at(to).is_none() {
                flags |= MoveFlags::EN_PASSANT;
            }
            if to.row() == piece.owner.promotion_row() {
                flags |= MoveFlags::PROMOTION;
            }
        },
        _ => (),
    }
    let candidate = Move::with_flags(from, to, flags);
    if candidate.is_promotion() {
        candidate.with_promotion(Promotion::default())
    } else {
        candidate
    }
}

fn is_legal(board: &Board, piece: Piece, candidate: &Move, last_move: Option<&Move>) -> bool {
    let (after, _) = relocate(board, piece, candidate);
    if is_in_check(&after, piece.owner, Some(candidate)) {
        return false;
    }
    if candidate.is_castling() {
        if is_in_check(board, piece.owner, last_move) {
            return false;
        }
        let (from, to) = (candidate.from(), candidate.to());
        let transit = Square::new_unchecked(from.row(), (from.col() + to.col()) / 2);
        let (through, _) = relocate(board, piece, &Move::new(from, transit));
        if is_in_check(&through, piece.owner, last_move) {
            return false;
        }
    }
    true
}
