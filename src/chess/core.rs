//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};

use anyhow::{bail, Context};
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A square on the board addressed by (row, column), both within
/// `0..BOARD_WIDTH`.
///
/// Row 0 is Black's back rank (rank 8) and row 7 is White's back rank (rank
/// 1); column 0 is the a-file. This is the order in which a board is drawn on
/// the screen, top to bottom:
///
/// ```
/// use chessmate::chess::core::Square;
///
/// let e2 = Square::try_from("e2").unwrap();
/// assert_eq!((e2.row(), e2.col()), (6, 4));
/// assert_eq!(Square::new(0, 0).unwrap().to_string(), "a8");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square from its coordinates.
    ///
    /// # Errors
    ///
    /// If either coordinate is outside `0..BOARD_WIDTH`.
    pub fn new(row: u8, col: u8) -> anyhow::Result<Self> {
        if row >= BOARD_WIDTH || col >= BOARD_WIDTH {
            bail!("square coordinates should be within 0..BOARD_WIDTH, got ({row}, {col})");
        }
        Ok(Self { row, col })
    }

    /// Callers guarantee that both coordinates are in range.
    pub(super) const fn new_unchecked(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_WIDTH && col < BOARD_WIDTH);
        Self { row, col }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the square `rows` and `cols` away from this one or `None` if it
    /// falls off the board.
    #[must_use]
    pub fn shift(self, rows: i8, cols: i8) -> Option<Self> {
        let row = self.row.checked_add_signed(rows)?;
        let col = self.col.checked_add_signed(cols)?;
        (row < BOARD_WIDTH && col < BOARD_WIDTH).then_some(Self { row, col })
    }

    /// All squares of the board, row by row starting from a8.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..BOARD_WIDTH).flat_map(|row| (0..BOARD_WIDTH).map(move |col| Self { row, col }))
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    /// Parses algebraic coordinates, e.g. "e4".
    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        let col = match file {
            'a'..='h' => file as u8 - b'a',
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        };
        let row = match rank {
            '1'..='8' => b'8' - rank as u8,
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        };
        Ok(Self { row, col })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + self.col) as char)?;
        f.write_char((b'8' - self.row) as char)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Lowercase name of the color.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Row delta of a pawn step: White pawns move towards row 0.
    pub(super) const fn pawn_direction(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Row the pawns start on and may advance two squares from.
    pub(super) const fn pawn_row(self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// Row the king and the rooks start on.
    pub(super) const fn back_row(self) -> u8 {
        match self {
            Self::White => BOARD_WIDTH - 1,
            Self::Black => 0,
        }
    }

    /// The farthest row for this player's pawns.
    pub(super) const fn promotion_row(self) -> u8 {
        self.opponent().back_row()
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player together with the history
/// bits the rules depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
    /// Set once the piece leaves its square. Castling requires both the king
    /// and the rook to have never moved.
    pub has_moved: bool,
    /// Set for pieces that started the game as pawns.
    pub was_promoted: bool,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self {
            owner,
            kind,
            has_moved: false,
            was_promoted: false,
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses a FEN piece symbol: uppercase for White, lowercase for Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self::new(owner, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            Player::Black => f.write_str(&symbol),
        }
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight. Queen is the
/// default choice.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Promotion {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("promotion should be one of 'q', 'r', 'b' or 'n', got '{symbol}'"),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PieceKind::from(*self))
    }
}

bitflags::bitflags! {
    /// Special rules a [`Move`] triggers when it is applied.
    ///
    /// - [Castle] is a king move by two squares that also relocates the
    ///   rook.
    /// - [En passant] is a pawn capture of the opponent's pawn that has just
    ///   advanced two squares: the captured pawn is not on the destination
    ///   square.
    /// - Promotion marks a pawn move to the farthest rank that needs a piece
    ///   choice. The choice itself is stored in [`Move::promotion`].
    ///
    /// [Castle]: https://en.wikipedia.org/wiki/Castling
    /// [En passant]: https://en.wikipedia.org/wiki/En_passant
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        #[allow(missing_docs)]
        const CASTLING = 0b001;
        #[allow(missing_docs)]
        const EN_PASSANT = 0b010;
        #[allow(missing_docs)]
        const PROMOTION = 0b100;
    }
}

/// A move of a piece from one square to another. Castling is represented as
/// a king move; the rook follows when the move is applied.
///
/// Moves print in [UCI format] and can be parsed back from it. A parsed move
/// only knows its squares and the promotion choice: it has to be matched
/// against the legal moves (see [`crate::chess::game::Game::play`]) to learn
/// about castling and en passant.
///
/// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
    flags: MoveFlags,
}

impl Move {
    /// A plain move without any special rules involved.
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Self::with_flags(from, to, MoveFlags::empty())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn with_flags(from: Square, to: Square, flags: MoveFlags) -> Self {
        Self {
            from,
            to,
            promotion: None,
            flags,
        }
    }

    /// King move by two squares: the rook jumps over the king.
    #[must_use]
    pub const fn castling(from: Square, to: Square) -> Self {
        Self::with_flags(from, to, MoveFlags::CASTLING)
    }

    /// Pawn capture "in passing".
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Self::with_flags(from, to, MoveFlags::EN_PASSANT)
    }

    /// Returns the same move with the promotion choice set.
    #[must_use]
    pub const fn with_promotion(self, promotion: Promotion) -> Self {
        Self {
            promotion: Some(promotion),
            ..self
        }
    }

    /// Parses a move in UCI format, e.g. "e2e4" or "e7e8q".
    ///
    /// # Errors
    ///
    /// If the input is not two squares optionally followed by a promotion
    /// symbol.
    pub fn from_uci(input: &str) -> anyhow::Result<Self> {
        let (from, to) = match (input.get(0..2), input.get(2..4)) {
            (Some(from), Some(to)) => (from, to),
            _ => bail!("uci move should be at least 4 chars, got '{input}'"),
        };
        let next_move = Self::new(
            Square::try_from(from).with_context(|| format!("parsing uci move '{input}'"))?,
            Square::try_from(to).with_context(|| format!("parsing uci move '{input}'"))?,
        );
        match input.get(4..).map(|rest| rest.chars().collect_vec()).as_deref() {
            Some([]) => Ok(next_move),
            Some([symbol]) => Ok(next_move.with_promotion(Promotion::try_from(*symbol)?)),
            _ => bail!("uci move should be at most 5 chars, got '{input}'"),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The requested promotion piece, if any. Applying a promoting move
    /// without a choice promotes to [`Promotion::Queen`].
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn flags(&self) -> MoveFlags {
        self.flags
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_castling(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLING)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    /// True for pawn moves reaching the farthest rank.
    #[must_use]
    pub const fn is_promotion(&self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION)
    }
}

impl fmt::Display for Move {
    /// Serializes a move in UCI format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

bitflags::bitflags! {
    /// Castling field of a FEN string. It is only used when importing a
    /// position: it tells which of the kings and rooks standing on their
    /// original squares have never moved.
    ///
    /// - When castling h-side (short), the king ends up on the g-file and the
    ///   rook on the f-file.
    /// - When castling a-side (long), the king ends up on the c-file and the
    ///   rook on the d-file.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CastleRights: u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
    }
}

impl CastleRights {
    /// Both sides for the given player.
    #[must_use]
    pub const fn both(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_SHORT.union(Self::WHITE_LONG),
            Player::Black => Self::BLACK_SHORT.union(Self::BLACK_LONG),
        }
    }

    /// The side where the rook standing in column `rook_col` castles to.
    #[must_use]
    pub const fn for_rook(player: Player, rook_col: u8) -> Self {
        match (player, rook_col) {
            (Player::White, 0) => Self::WHITE_LONG,
            (Player::White, _) => Self::WHITE_SHORT,
            (Player::Black, 0) => Self::BLACK_LONG,
            (Player::Black, _) => Self::BLACK_SHORT,
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses castling rights from the FEN format:
    ///
    /// [`CastleRights`] := '-' | (K)? (Q)? (k)? (q)?
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        if input.is_empty() {
            bail!("castling rights can not be empty, use '-' instead");
        }
        let mut rights = Self::empty();
        for symbol in input.chars() {
            let right = match symbol {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => bail!("unknown castle rights: {input}"),
            };
            if rights.contains(right) {
                bail!("duplicate castle rights: {input}");
            }
            rights |= right;
        }
        Ok(rights)
    }
}
