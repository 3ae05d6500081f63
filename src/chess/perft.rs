//! [Perft] (*per*formance *t*esting) is a technique for checking correctness of
//! move generation (tested functions are legal move generation and move
//! application).
//!
//! Promotions are generated once per target square, so the counts only match
//! the well-known perft tables for trees without promotions.
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::chess::board::Board;
use crate::chess::core::{Move, Player};
use crate::chess::execute::relocate;
use crate::chess::legality::{all_legal_moves, generate_legal_moves};

/// Counts the leaves of the legal move tree of the given depth.
#[must_use]
pub fn perft(board: &Board, player: Player, last_move: Option<&Move>, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    if depth == 1 {
        return all_legal_moves(board, player, last_move).len() as u64;
    }
    board
        .pieces()
        .filter(|(_, piece)| piece.owner == player)
        .flat_map(|(origin, piece)| {
            generate_legal_moves(board, origin, player, last_move)
                .into_iter()
                .map(move |next_move| (piece, next_move))
        })
        .map(|(piece, next_move)| {
            let (next, _) = relocate(board, piece, &next_move);
            perft(&next, player.opponent(), Some(&next_move), depth - 1)
        })
        .sum()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::CastleRights;

    #[test]
    fn shallow_starting_position() {
        let board = Board::starting();
        assert_eq!(perft(&board, Player::White, None, 0), 1);
        assert_eq!(perft(&board, Player::White, None, 1), 20);
        assert_eq!(perft(&board, Player::White, None, 2), 400);
    }

    #[test]
    fn en_passant_and_castling_subtrees() {
        // Position 3 from https://www.chessprogramming.org/Perft_Results has
        // en passant captures and checks but no promotions up to depth 3.
        let board =
            Board::from_placement("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8", CastleRights::empty())
                .unwrap();
        assert_eq!(perft(&board, Player::White, None, 3), 2812);
        // Kiwipete has castling on both sides for both players.
        let board = Board::from_placement(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
            CastleRights::all(),
        )
        .unwrap();
        assert_eq!(perft(&board, Player::White, None, 2), 2039);
    }
}
