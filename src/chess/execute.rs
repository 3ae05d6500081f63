//! Move application. The input board is never modified: every move produces a
//! new [`Board`].

use anyhow::bail;

use crate::chess::board::Board;
use crate::chess::core::{Move, Piece, PieceKind, Square, BOARD_WIDTH};

/// Applies the move and returns the resulting board together with the
/// captured piece, if any.
///
/// The move is not checked for legality, it is the caller's responsibility
/// to only pass moves produced by [`crate::chess::legality`]. The special
/// rules are triggered by the move and the piece being moved:
///
/// - En passant removes the pawn standing next to the origin, on the
///   destination column.
/// - Castling also moves the rook from the corner on the side of the hop to
///   the square the king jumped over.
/// - A pawn reaching the farthest row turns into the requested promotion
///   piece, a queen if none was requested.
///
/// The moving piece (and the castling rook) are marked as moved.
///
/// # Errors
///
/// If there is no piece on the origin square.
pub fn apply_move(board: &Board, next_move: &Move) -> anyhow::Result<(Board, Option<Piece>)> {
    let Some(piece) = board.at(next_move.from()) else {
        bail!("no piece to move on {}", next_move.from());
    };
    Ok(relocate(board, piece, next_move))
}

/// [`apply_move`] for the callers who already know what stands on the origin
/// square.
pub(super) fn relocate(board: &Board, piece: Piece, next_move: &Move) -> (Board, Option<Piece>) {
    let mut next = *board;
    let _ = next.take(next_move.from());
    let mut captured = next.take(next_move.to());
    if next_move.is_en_passant() {
        let victim = Square::new_unchecked(next_move.from().row(), next_move.to().col());
        captured = next.take(victim);
    }

    let mut moved = Piece {
        has_moved: true,
        ..piece
    };
    if piece.kind == PieceKind::Pawn && next_move.to().row() == piece.owner.promotion_row() {
        moved.kind = next_move.promotion().unwrap_or_default().into();
        moved.was_promoted = true;
    }
    let _ = next.put(next_move.to(), moved);

    if next_move.is_castling() {
        let row = next_move.from().row();
        let (rook_from, rook_to) = if next_move.to().col() > next_move.from().col() {
            (BOARD_WIDTH - 1, next_move.to().col() - 1)
        } else {
            (0, next_move.to().col() + 1)
        };
        let rook_from = Square::new_unchecked(row, rook_from);
        if let Some(rook) = next.at(rook_from) {
            if rook.kind == PieceKind::Rook && rook.owner == piece.owner {
                let _ = next.take(rook_from);
                let _ = next.put(
                    Square::new_unchecked(row, rook_to),
                    Piece {
                        has_moved: true,
                        ..rook
                    },
                );
            }
        }
    }
    (next, captured)
}
