//! Terminal states of the game: checkmate, stalemate and (a partial notion
//! of) insufficient material.

use std::fmt;

use itertools::{Either, Itertools};

use crate::chess::attacks::is_in_check;
use crate::chess::board::Board;
use crate::chess::core::{Move, PieceKind, Player};
use crate::chess::legality::has_legal_moves;

/// The reason a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The side to move is in check and has no legal moves.
    Checkmate {
        #[allow(missing_docs)]
        winner: Player,
    },
    /// The side to move is not in check and has no legal moves.
    Stalemate,
    /// See [`is_insufficient_material`].
    InsufficientMaterial,
}

impl Outcome {
    /// Returns the winner or `None` for draws.
    #[must_use]
    pub const fn winner(&self) -> Option<Player> {
        match self {
            Self::Checkmate { winner } => Some(*winner),
            Self::Stalemate | Self::InsufficientMaterial => None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_draw(&self) -> bool {
        self.winner().is_none()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => {
                let winner = match winner {
                    Player::White => "White",
                    Player::Black => "Black",
                };
                write!(f, "Checkmate! {winner} wins!")
            },
            Self::Stalemate => f.write_str("Stalemate! The game is a draw."),
            Self::InsufficientMaterial => f.write_str("Draw due to insufficient material."),
        }
    }
}

/// The player to move is in check and has no legal moves.
#[must_use]
pub fn is_checkmate(board: &Board, player: Player, last_move: Option<&Move>) -> bool {
    is_in_check(board, player, last_move) && !has_legal_moves(board, player, last_move)
}

/// The player to move is not in check but has no legal moves.
#[must_use]
pub fn is_stalemate(board: &Board, player: Player, last_move: Option<&Move>) -> bool {
    !is_in_check(board, player, last_move) && !has_legal_moves(board, player, last_move)
}

/// Detects a few trivially drawn endings: king versus king and king versus
/// king with a single knight or bishop.
///
/// This is intentionally incomplete. Everything else, including kings with
/// bishops of the same color, is reported as sufficient material.
#[must_use]
pub fn is_insufficient_material(board: &Board) -> bool {
    let (white, black): (Vec<PieceKind>, Vec<PieceKind>) =
        board.pieces().partition_map(|(_, piece)| match piece.owner {
            Player::White => Either::Left(piece.kind),
            Player::Black => Either::Right(piece.kind),
        });
    let lone_king = |pieces: &[PieceKind]| pieces == [PieceKind::King];
    let minor = |pieces: &[PieceKind]| {
        pieces.len() == 2
            && pieces.contains(&PieceKind::King)
            && (pieces.contains(&PieceKind::Knight) || pieces.contains(&PieceKind::Bishop))
    };
    let (white, black) = (white.as_slice(), black.as_slice());
    (lone_king(white) && (lone_king(black) || minor(black))) || (lone_king(black) && minor(white))
}

/// Evaluates the terminal state for the player to move, in priority order:
/// checkmate, stalemate, insufficient material. Returns `None` while the
/// game goes on.
#[must_use]
pub fn outcome(board: &Board, to_move: Player, last_move: Option<&Move>) -> Option<Outcome> {
    if !has_legal_moves(board, to_move, last_move) {
        return Some(if is_in_check(board, to_move, last_move) {
            Outcome::Checkmate {
                winner: to_move.opponent(),
            }
        } else {
            Outcome::Stalemate
        });
    }
    is_insufficient_material(board).then_some(Outcome::InsufficientMaterial)
}
