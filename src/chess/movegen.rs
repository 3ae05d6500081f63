//! Pseudo-legal move generation: geometric reach of a single piece.
//!
//! The targets produced here ignore whether the move exposes the mover's own
//! king. This is what [`crate::chess::attacks`] relies on, and it is filtered
//! into legal moves by [`crate::chess::legality`].

use arrayvec::ArrayVec;

use crate::chess::board::Board;
use crate::chess::core::{Move, Piece, PieceKind, Player, Square, BOARD_WIDTH};

/// A queen in the center of an otherwise empty board reaches 27 squares, no
/// other piece reaches more.
pub const MAX_TARGETS: usize = 27;

/// Target squares of a single piece.
pub type Targets = ArrayVec<Square, MAX_TARGETS>;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KING_START_COL: u8 = 4;

const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Returns the squares the piece standing on `from` can geometrically reach.
/// The mover is the owner of that piece; an empty origin yields no targets.
///
/// `last_move` is the immediately preceding move, it enables en passant.
#[must_use]
pub fn pseudo_legal_targets(board: &Board, from: Square, last_move: Option<&Move>) -> Targets {
    let mut targets = Targets::new();
    let Some(piece) = board.at(from) else {
        return targets;
    };
    match piece.kind {
        PieceKind::Pawn => pawn_targets(board, from, piece.owner, last_move, &mut targets),
        PieceKind::Knight => {
            leaper_targets(board, from, piece.owner, &KNIGHT_OFFSETS, &mut targets);
        },
        PieceKind::Bishop => slider_targets(board, from, piece.owner, &DIAGONALS, &mut targets),
        PieceKind::Rook => slider_targets(board, from, piece.owner, &ORTHOGONALS, &mut targets),
        PieceKind::Queen => {
            slider_targets(board, from, piece.owner, &DIAGONALS, &mut targets);
            slider_targets(board, from, piece.owner, &ORTHOGONALS, &mut targets);
        },
        PieceKind::King => {
            leaper_targets(board, from, piece.owner, &KING_OFFSETS, &mut targets);
            castling_targets(board, from, piece, &mut targets);
        },
    }
    targets
}

fn is_enemy(board: &Board, square: Square, us: Player) -> bool {
    board.at(square).is_some_and(|piece| piece.owner != us)
}

fn leaper_targets(
    board: &Board,
    from: Square,
    us: Player,
    offsets: &[(i8, i8)],
    targets: &mut Targets,
) {
    targets.extend(
        offsets
            .iter()
            .filter_map(|&(rows, cols)| from.shift(rows, cols))
            .filter(|&to| board.at(to).map_or(true, |piece| piece.owner != us)),
    );
}

fn slider_targets(
    board: &Board,
    from: Square,
    us: Player,
    directions: &[(i8, i8)],
    targets: &mut Targets,
) {
    for &(rows, cols) in directions {
        let mut current = from;
        while let Some(to) = current.shift(rows, cols) {
            match board.at(to) {
                None => targets.push(to),
                Some(piece) => {
                    if piece.owner != us {
                        targets.push(to);
                    }
                    break;
                },
            }
            current = to;
        }
    }
}

fn pawn_targets(
    board: &Board,
    from: Square,
    us: Player,
    last_move: Option<&Move>,
    targets: &mut Targets,
) {
    let direction = us.pawn_direction();
    if let Some(push) = from.shift(direction, 0) {
        if board.at(push).is_none() {
            targets.push(push);
            if from.row() == us.pawn_row() {
                if let Some(double_push) = push.shift(direction, 0) {
                    if board.at(double_push).is_none() {
                        targets.push(double_push);
                    }
                }
            }
        }
    }
    for cols in [-1, 1] {
        if let Some(capture) = from.shift(direction, cols) {
            if is_enemy(board, capture, us) {
                targets.push(capture);
            }
        }
    }
    if let Some(capture) = en_passant_target(board, from, us, last_move) {
        targets.push(capture);
    }
}

/// En passant is available right after an enemy pawn advanced two squares
/// and landed next to this pawn. The capture goes to the square that pawn
/// skipped.
fn en_passant_target(
    board: &Board,
    from: Square,
    us: Player,
    last_move: Option<&Move>,
) -> Option<Square> {
    let last_move = last_move?;
    let pushed = board.at(last_move.to())?;
    if pushed.kind != PieceKind::Pawn || pushed.owner == us {
        return None;
    }
    if last_move.from().row().abs_diff(last_move.to().row()) != 2
        || last_move.to().row() != from.row()
        || last_move.to().col().abs_diff(from.col()) != 1
    {
        return None;
    }
    Square::new(
        from.row().checked_add_signed(us.pawn_direction())?,
        last_move.to().col(),
    )
    .ok()
}

/// The king hops two squares towards a rook in the corner of the same row.
/// Both have to be unmoved and the squares between them empty. Whether the
/// king passes through or lands on an attacked square is checked by
/// [`crate::chess::legality`].
fn castling_targets(board: &Board, from: Square, king: Piece, targets: &mut Targets) {
    // Boards assembled by hand may hold "unmoved" kings away from e1/e8.
    if king.has_moved || from.row() != king.owner.back_row() || from.col() != KING_START_COL {
        return;
    }
    for (rook_col, hop) in [(BOARD_WIDTH - 1, 2), (0, -2)] {
        let Ok(rook_square) = Square::new(from.row(), rook_col) else {
            continue;
        };
        let rook_ready = board.at(rook_square).is_some_and(|rook| {
            rook.kind == PieceKind::Rook && rook.owner == king.owner && !rook.has_moved
        });
        if !rook_ready {
            continue;
        }
        let (low, high) = if rook_col > from.col() {
            (from.col() + 1, rook_col)
        } else {
            (rook_col + 1, from.col())
        };
        let path_clear = (low..high)
            .all(|col| board.at(Square::new_unchecked(from.row(), col)).is_none());
        if path_clear {
            if let Some(to) = from.shift(0, hop) {
                targets.push(to);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::CastleRights;

    fn square(input: &str) -> Square {
        Square::try_from(input).unwrap()
    }

    fn board(placement: &str) -> Board {
        Board::from_placement(placement, CastleRights::all()).unwrap()
    }

    fn targets(board: &Board, from: &str, last_move: Option<&Move>) -> Vec<String> {
        pseudo_legal_targets(board, square(from), last_move)
            .iter()
            .map(Square::to_string)
            .sorted()
            .collect()
    }

    #[test]
    fn empty_origin() {
        assert!(pseudo_legal_targets(&Board::starting(), square("e4"), None).is_empty());
    }

    #[test]
    fn starting_position() {
        let board = Board::starting();
        assert_eq!(targets(&board, "e2", None), vec!["e3", "e4"]);
        assert_eq!(targets(&board, "g1", None), vec!["f3", "h3"]);
        assert_eq!(targets(&board, "b8", None), vec!["a6", "c6"]);
        assert!(targets(&board, "a1", None).is_empty());
        assert!(targets(&board, "d1", None).is_empty());
        assert!(targets(&board, "e8", None).is_empty());
        let total: usize = board
            .pieces()
            .filter(|(_, piece)| piece.owner == Player::White)
            .map(|(from, _)| pseudo_legal_targets(&board, from, None).len())
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn queen_in_the_center() {
        let board = board("8/8/8/3Q4/8/8/8/8");
        assert_eq!(
            pseudo_legal_targets(&board, square("d5"), None).len(),
            MAX_TARGETS
        );
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let board = board("8/8/1p6/8/3B4/8/5P2/8");
        assert_eq!(
            targets(&board, "d4", None),
            vec!["a1", "b2", "b6", "c3", "c5", "e3", "e5", "f6", "g7", "h8"]
        );
    }

    #[test]
    fn knight_in_the_corner() {
        let board = board("8/8/8/8/8/8/2p5/N7");
        assert_eq!(targets(&board, "a1", None), vec!["b3", "c2"]);
    }

    #[test]
    fn pawn_pushes_and_captures() {
        let board = board("8/8/8/8/8/3p1n2/4P3/8");
        assert_eq!(targets(&board, "e2", None), vec!["d3", "e3", "e4", "f3"]);
        // Blocked double push.
        let board = self::board("8/8/8/8/4n3/8/4P3/8");
        assert_eq!(targets(&board, "e2", None), vec!["e3"]);
        let board = self::board("8/8/8/8/8/4n3/4P3/8");
        assert!(targets(&board, "e2", None).is_empty());
        // Black pawns move down the board.
        let board = self::board("8/3p4/4N3/8/8/8/8/8");
        assert_eq!(targets(&board, "d7", None), vec!["d5", "d6", "e6"]);
    }

    #[test]
    fn en_passant() {
        let board = board("8/8/8/3pP3/8/8/8/8");
        let double_push = Move::new(square("d7"), square("d5"));
        assert_eq!(targets(&board, "e5", Some(&double_push)), vec!["d6", "e6"]);
        // Not after a single step.
        let single_push = Move::new(square("d6"), square("d5"));
        assert_eq!(targets(&board, "e5", Some(&single_push)), vec!["e6"]);
        // Not without history.
        assert_eq!(targets(&board, "e5", None), vec!["e6"]);
    }

    #[test]
    fn en_passant_needs_adjacent_pawn() {
        let board = board("8/8/8/2p1P3/8/8/8/8");
        let double_push = Move::new(square("c7"), square("c5"));
        assert_eq!(targets(&board, "e5", Some(&double_push)), vec!["e6"]);
    }

    #[test]
    fn castling_candidates() {
        let board = board("r3k2r/8/8/8/8/8/8/R3K2R");
        assert_eq!(
            targets(&board, "e1", None),
            vec!["c1", "d1", "d2", "e2", "f1", "f2", "g1"]
        );
        assert_eq!(
            targets(&board, "e8", None),
            vec!["c8", "d7", "d8", "e7", "f7", "f8", "g8"]
        );
    }

    #[test]
    fn castling_only_from_starting_square() {
        let king = Piece::new(Player::White, PieceKind::King);
        let rook = Piece::new(Player::White, PieceKind::Rook);
        let board = Board::empty()
            .with(square("f1"), Some(king))
            .with(square("h1"), Some(rook))
            .with(square("a1"), Some(rook));
        assert_eq!(
            targets(&board, "f1", None),
            vec!["e1", "e2", "f2", "g1", "g2"]
        );
    }

    #[test]
    fn castling_blocked() {
        // b1 is between the rook and the king even though the king never
        // crosses it.
        let board = board("4k3/8/8/8/8/8/8/RN2K1NR");
        assert_eq!(targets(&board, "e1", None), vec!["d1", "d2", "e2", "f1", "f2"]);
    }

    #[test]
    fn castling_needs_unmoved_pieces() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R", CastleRights::WHITE_LONG)
            .unwrap();
        assert_eq!(
            targets(&board, "e1", None),
            vec!["c1", "d1", "d2", "e2", "f1", "f2"]
        );
        let board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R", CastleRights::empty()).unwrap();
        assert_eq!(targets(&board, "e1", None), vec!["d1", "d2", "e2", "f1", "f2"]);
    }
}
