//! [`Board`] is the piece placement: an 8×8 grid of optional pieces.
//!
//! The board is a small `Copy` value. Nothing outside [`crate::chess`] can
//! mutate it in place: every applied move produces a new board (see
//! [`crate::chess::execute::apply_move`]), so any board can be kept around as
//! a snapshot for free.

use std::fmt::{self, Write};

use anyhow::bail;

use crate::chess::core::{CastleRights, Piece, PieceKind, Player, Square, BOARD_WIDTH};

/// Piece kinds of the back rank from the a-file to the h-file.
const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Piece placement indexed by row and column of [`Square`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_WIDTH as usize]; BOARD_WIDTH as usize],
}

impl Board {
    /// Board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [[None; BOARD_WIDTH as usize]; BOARD_WIDTH as usize],
        }
    }

    /// The standard starting position. None of the pieces have moved.
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (col, kind) in (0..BOARD_WIDTH).zip(BACK_RANK) {
                board = board
                    .with(
                        Square::new_unchecked(player.back_row(), col),
                        Some(Piece::new(player, kind)),
                    )
                    .with(
                        Square::new_unchecked(player.pawn_row(), col),
                        Some(Piece::new(player, PieceKind::Pawn)),
                    );
            }
        }
        board
    }

    /// Parses the piece placement part of FEN. History bits of the pieces
    /// are inferred from the placement: a piece standing where the same piece
    /// stands in [`Board::starting`] has never moved, everything else has.
    /// Kings and rooks on their initial squares additionally need the
    /// matching castling right to count as unmoved.
    ///
    /// # Errors
    ///
    /// If the placement does not describe exactly 8 ranks of 8 squares or a
    /// pawn is placed on a back rank.
    pub fn from_placement(placement: &str, rights: CastleRights) -> anyhow::Result<Self> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_WIDTH as usize {
            bail!(
                "piece placement should have {BOARD_WIDTH} ranks, got {}: {placement}",
                ranks.len()
            );
        }
        let starting = Self::starting();
        let mut board = Self::empty();
        for (row, rank) in (0..BOARD_WIDTH).zip(ranks) {
            let mut col: u8 = 0;
            for symbol in rank.chars() {
                if let Some(skip) = symbol.to_digit(10) {
                    if !(1..=u32::from(BOARD_WIDTH)).contains(&skip) {
                        bail!("empty square count should be within 1..=8, got {skip}");
                    }
                    col += u8::try_from(skip)?;
                    if col > BOARD_WIDTH {
                        bail!("rank {rank} is longer than {BOARD_WIDTH} squares");
                    }
                    continue;
                }
                if col >= BOARD_WIDTH {
                    bail!("rank {rank} is longer than {BOARD_WIDTH} squares");
                }
                let square = Square::new_unchecked(row, col);
                let mut piece = Piece::try_from(symbol)?;
                if piece.kind == PieceKind::Pawn && (row == 0 || row == BOARD_WIDTH - 1) {
                    bail!("pawns can not be placed on backranks");
                }
                piece.has_moved = starting.at(square) != Some(piece)
                    || !keeps_castle_right(piece, square, rights);
                board = board.with(square, Some(piece));
                col += 1;
            }
            if col != BOARD_WIDTH {
                bail!("rank {rank} should have {BOARD_WIDTH} squares, got {col}");
            }
        }
        Ok(board)
    }

    /// Returns the piece standing on the square, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square.row() as usize][square.col() as usize]
    }

    /// Returns a copy of the board with the contents of `square` replaced.
    /// Useful for setting up arbitrary positions.
    #[must_use]
    pub fn with(mut self, square: Square, piece: Option<Piece>) -> Self {
        self.squares[usize::from(square.row())][usize::from(square.col())] = piece;
        self
    }

    /// Removes the piece from the square and returns it.
    pub(super) fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[usize::from(square.row())][usize::from(square.col())].take()
    }

    /// Places a piece on the square and returns the one that stood there.
    pub(super) fn put(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.squares[usize::from(square.row())][usize::from(square.col())].replace(piece)
    }

    /// All occupied squares together with the pieces standing on them, row
    /// by row starting from a8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.at(square).map(|piece| (square, piece)))
    }

    /// Locates the king of the given player with a linear scan. Returns
    /// `None` on boards without one.
    #[must_use]
    pub fn king_square(&self, player: Player) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.owner == player && piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

/// Kings and rooks on their initial squares are only "unmoved" if FEN still
/// allows castling with them.
fn keeps_castle_right(piece: Piece, square: Square, rights: CastleRights) -> bool {
    match piece.kind {
        PieceKind::King => rights.intersects(CastleRights::both(piece.owner)),
        PieceKind::Rook => rights.contains(CastleRights::for_rook(piece.owner, square.col())),
        _ => true,
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_WIDTH {
            let mut empty_squares = 0;
            for col in 0..BOARD_WIDTH {
                if let Some(piece) = self.at(Square::new_unchecked(row, col)) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if row != BOARD_WIDTH - 1 {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_WIDTH {
            for col in 0..BOARD_WIDTH {
                match self.at(Square::new_unchecked(row, col)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if col != BOARD_WIDTH - 1 {
                    f.write_char(' ')?;
                }
            }
            if row != BOARD_WIDTH - 1 {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}
