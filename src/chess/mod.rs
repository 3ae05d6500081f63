//! Implementation of the chess rules: board model, move generation, move
//! application and game outcome detection.
//!
//! The rules are split into two strictly separated tiers:
//!
//! 1. [`movegen`] produces the geometric reach of a single piece and is the
//!    only thing [`attacks`] relies on.
//! 2. [`legality`] filters that reach by simulating each move with
//!    [`execute`] and asking [`attacks`] whether the mover's king survives.
//!
//! Tier 1 never calls tier 2, otherwise asking "is this square attacked"
//! would need "which moves are legal" and vice versa.

pub mod attacks;
pub mod board;
pub mod core;
pub mod execute;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod outcome;
pub mod perft;

pub use self::attacks::{is_attacked, is_in_check};
pub use self::board::Board;
pub use self::execute::apply_move;
pub use self::game::Game;
pub use self::legality::{all_legal_moves, generate_legal_moves};
pub use self::movegen::pseudo_legal_targets;
pub use self::outcome::{
    is_checkmate,
    is_insufficient_material,
    is_stalemate,
    outcome,
    Outcome,
};
pub use self::perft::perft;

/// Standard starting position: White pawns on the second rank, Black pawns on
/// the seventh one, pieces on the back ranks mirrored for both sides.
#[must_use]
pub fn initial_board() -> Board {
    Board::starting()
}
