//! [`Game`] sequences plies on top of the stateless rules: it keeps track of
//! the side to move, the last move (needed for en passant) and the previous
//! positions for taking moves back.

use anyhow::{bail, Context};

use crate::chess::attacks::is_in_check;
use crate::chess::board::Board;
use crate::chess::core::{CastleRights, Move, Piece, PieceKind, Player, Square};
use crate::chess::execute::apply_move;
use crate::chess::legality::{all_legal_moves, generate_legal_moves};
use crate::chess::outcome::{outcome, Outcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Snapshot {
    board: Board,
    side_to_move: Player,
    last_move: Option<Move>,
}

/// State of a game in progress: the current [`Board`] and everything the
/// rules need besides the piece placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    side_to_move: Player,
    last_move: Option<Move>,
    history: Vec<Snapshot>,
}

impl Game {
    /// Standard starting position, White to move.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::starting(),
            side_to_move: Player::White,
            last_move: None,
            history: Vec::new(),
        }
    }

    /// Parses a position from [Forsyth-Edwards Notation].
    ///
    /// FEN does not carry the history of the pieces, it is reconstructed
    /// from the castling rights (see [`Board::from_placement`]). The en
    /// passant square is turned into the double pawn push that made it
    /// possible. The halfmove clock and the fullmove counter are optional
    /// and ignored.
    ///
    /// # Errors
    ///
    /// If the input is not valid FEN or describes an unreachable position:
    /// not exactly one king per player, pawns on back ranks, en passant
    /// square without the pushed pawn or the player who just moved being in
    /// check.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split_ascii_whitespace();
        let Some(placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let side_to_move = match parts.next() {
            Some(value) => Player::try_from(value)?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        let rights = match parts.next() {
            Some(value) => CastleRights::try_from(value)?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        let en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(Square::try_from(value)?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        for (counter, value) in ["halfmove clock", "fullmove counter"]
            .into_iter()
            .zip(parts.by_ref())
        {
            if !value.bytes().all(|c| c.is_ascii_digit()) {
                bail!(
                    "incorrect FEN: {counter} can not contain anything other than digits, got \
                     {value}"
                );
            }
        }
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in FEN");
        }

        let board = Board::from_placement(placement, rights).context("incorrect FEN")?;
        for player in [Player::White, Player::Black] {
            let kings = board
                .pieces()
                .filter(|(_, piece)| piece.owner == player && piece.kind == PieceKind::King)
                .count();
            if kings != 1 {
                bail!("expected 1 {} king, got {kings}", player.name());
            }
        }
        let last_move = en_passant_square
            .map(|square| double_push(&board, square, side_to_move))
            .transpose()?;
        if is_in_check(&board, side_to_move.opponent(), last_move.as_ref()) {
            bail!("the player who just moved can not be in check");
        }
        Ok(Self {
            board,
            side_to_move,
            last_move,
            history: Vec::new(),
        })
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// The move that led to the current position. For positions imported
    /// from FEN this is the double pawn push implied by the en passant
    /// square, if any.
    #[must_use]
    pub const fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    /// Number of moves played since the game was created.
    #[must_use]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Legal moves of the piece on `square`. Empty if the square is empty or
    /// the piece belongs to the opponent.
    #[must_use]
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        generate_legal_moves(
            &self.board,
            square,
            self.side_to_move,
            self.last_move.as_ref(),
        )
    }

    /// All legal moves of the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        all_legal_moves(&self.board, self.side_to_move, self.last_move.as_ref())
    }

    /// Whether the side to move is in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        is_in_check(&self.board, self.side_to_move, self.last_move.as_ref())
    }

    /// Returns the outcome if the game has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        outcome(&self.board, self.side_to_move, self.last_move.as_ref())
    }

    /// Plays the move and passes the turn to the opponent. Returns the
    /// captured piece, if any.
    ///
    /// Only the squares and the promotion choice of `requested` matter: the
    /// move is looked up among the legal ones, which know about castling and
    /// en passant. A promotion without a choice promotes to a queen.
    ///
    /// # Errors
    ///
    /// If the game has already ended, the move is not legal or a promotion
    /// is requested for a move that does not promote.
    pub fn play(&mut self, requested: &Move) -> anyhow::Result<Option<Piece>> {
        if let Some(outcome) = self.outcome() {
            bail!("the game is over: {outcome}");
        }
        let Some(legal) = self
            .legal_moves_from(requested.from())
            .into_iter()
            .find(|candidate| candidate.to() == requested.to())
        else {
            bail!("illegal move: {requested}");
        };
        let resolved = match (legal.is_promotion(), requested.promotion()) {
            (true, Some(promotion)) => legal.with_promotion(promotion),
            (false, Some(_)) => bail!("{requested} is not a promotion"),
            (_, None) => legal,
        };
        let (board, captured) = apply_move(&self.board, &resolved)?;
        self.history.push(Snapshot {
            board: self.board,
            side_to_move: self.side_to_move,
            last_move: self.last_move,
        });
        self.board = board;
        self.side_to_move = self.side_to_move.opponent();
        self.last_move = Some(resolved);
        Ok(captured)
    }

    /// Parses the move in UCI format and plays it.
    ///
    /// # Errors
    ///
    /// See [`Move::from_uci`] and [`Game::play`].
    pub fn play_uci(&mut self, input: &str) -> anyhow::Result<Option<Piece>> {
        self.play(&Move::from_uci(input)?)
    }

    /// Takes the last move back and returns it. Returns `None` if no moves
    /// were played.
    pub fn undo(&mut self) -> Option<Move> {
        let snapshot = self.history.pop()?;
        let undone = self.last_move;
        self.board = snapshot.board;
        self.side_to_move = snapshot.side_to_move;
        self.last_move = snapshot.last_move;
        undone
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<&str> for Game {
    type Error = anyhow::Error;

    /// Parses FEN, optionally prefixed with "fen ".
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        Self::from_fen(input.strip_prefix("fen ").unwrap_or(input))
    }
}

/// Reconstructs the double pawn push that skipped the en passant square.
fn double_push(board: &Board, square: Square, side_to_move: Player) -> anyhow::Result<Move> {
    let pusher = side_to_move.opponent();
    let (Some(from), Some(to)) = (
        square.shift(-pusher.pawn_direction(), 0),
        square.shift(pusher.pawn_direction(), 0),
    ) else {
        bail!("en passant square is not beyond pushed pawn");
    };
    let pushed = board
        .at(to)
        .is_some_and(|piece| piece.owner == pusher && piece.kind == PieceKind::Pawn);
    if from.row() != pusher.pawn_row() || !pushed {
        bail!("en passant square is not beyond pushed pawn");
    }
    if board.at(square).is_some() || board.at(from).is_some() {
        bail!("en passant square {square} should be empty");
    }
    Ok(Move::new(from, to))
}
