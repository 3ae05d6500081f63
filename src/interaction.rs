//! Per-ply selection state machine driven by a user interface.
//!
//! A move is entered with two clicks: the first one selects a piece of the
//! side to move and reveals its legal targets, the second one picks the
//! target. A pawn reaching the last rank additionally waits for the choice of
//! the promotion piece.
//!
//! ```text
//! Idle --click own piece--> Selected --click target--> (commit) --> Idle
//!                              |  \
//!                              |   --click promotion target--> PromotionPending
//!                              |                                  |
//!                              |                 choose piece: commit --> Idle
//!                              |                 click or cancel: ----> Idle
//!                               --click elsewhere or cancel--> Idle
//! ```
//!
//! Nothing changes on the board until a move is committed. Once the game has
//! ended all clicks are ignored.

use anyhow::bail;

use crate::chess::core::{Move, Piece, Promotion, Square};
use crate::chess::game::Game;

/// Where the user is in the process of entering a move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// Nothing is selected.
    #[default]
    Idle,
    /// A piece of the side to move is selected.
    Selected {
        #[allow(missing_docs)]
        origin: Square,
        /// Legal moves of the selected piece.
        targets: Vec<Move>,
    },
    /// A promotion target was picked and the piece choice is outstanding.
    PromotionPending {
        #[allow(missing_docs)]
        pending: Move,
    },
}

/// What happened in response to an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The input had no effect.
    Ignored,
    /// A piece was selected, its legal moves are in [`State::Selected`].
    Selected {
        #[allow(missing_docs)]
        origin: Square,
    },
    /// The selection was dropped.
    Deselected,
    /// The move needs a promotion piece, see
    /// [`Interaction::choose_promotion`].
    PromotionRequired {
        #[allow(missing_docs)]
        pending: Move,
    },
    /// The move was played.
    Committed {
        #[allow(missing_docs)]
        played: Move,
        #[allow(missing_docs)]
        captured: Option<Piece>,
    },
}

/// A [`Game`] together with the selection state of the side to move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interaction {
    game: Game,
    state: State,
}

impl Interaction {
    /// Starts with nothing selected.
    #[must_use]
    pub fn new(game: Game) -> Self {
        Self {
            game,
            state: State::Idle,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Replaces the game, e.g. to start over. Drops the selection.
    pub fn reset(&mut self, game: Game) {
        self.game = game;
        self.state = State::Idle;
    }

    /// Handles a click on a square.
    ///
    /// # Errors
    ///
    /// Only if the game refuses a move the selection offered, which does not
    /// happen unless the rules disagree with themselves.
    pub fn click(&mut self, square: Square) -> anyhow::Result<Event> {
        if self.game.outcome().is_some() {
            return Ok(Event::Ignored);
        }
        match std::mem::take(&mut self.state) {
            State::Idle => Ok(self.select(square)),
            State::Selected { origin, targets } => {
                if let Some(&target) = targets.iter().find(|target| target.to() == square) {
                    if target.is_promotion() {
                        self.state = State::PromotionPending { pending: target };
                        return Ok(Event::PromotionRequired { pending: target });
                    }
                    return self.commit(target);
                }
                if square != origin && self.is_own_piece(square) {
                    return Ok(self.select(square));
                }
                Ok(Event::Deselected)
            },
            State::PromotionPending { .. } => Ok(Event::Deselected),
        }
    }

    /// Completes the pending promotion with the chosen piece.
    ///
    /// # Errors
    ///
    /// If no promotion is pending.
    pub fn choose_promotion(&mut self, promotion: Promotion) -> anyhow::Result<Event> {
        let State::PromotionPending { pending } = self.state else {
            bail!("no promotion is pending");
        };
        self.state = State::Idle;
        self.commit(pending.with_promotion(promotion))
    }

    /// Drops the selection or the pending promotion.
    pub fn cancel(&mut self) -> Event {
        match std::mem::take(&mut self.state) {
            State::Idle => Event::Ignored,
            State::Selected { .. } | State::PromotionPending { .. } => Event::Deselected,
        }
    }

    /// Plays the move bypassing the selection, which is dropped.
    ///
    /// # Errors
    ///
    /// See [`Game::play`].
    pub fn play(&mut self, requested: &Move) -> anyhow::Result<Event> {
        self.state = State::Idle;
        let captured = self.game.play(requested)?;
        Ok(Event::Committed {
            played: self.last_move_or(requested),
            captured,
        })
    }

    /// Takes the last move back. Drops the selection.
    pub fn undo(&mut self) -> Option<Move> {
        self.state = State::Idle;
        self.game.undo()
    }

    fn is_own_piece(&self, square: Square) -> bool {
        self.game
            .board()
            .at(square)
            .is_some_and(|piece| piece.owner == self.game.side_to_move())
    }

    fn select(&mut self, square: Square) -> Event {
        if !self.is_own_piece(square) {
            return Event::Ignored;
        }
        self.state = State::Selected {
            origin: square,
            targets: self.game.legal_moves_from(square),
        };
        Event::Selected { origin: square }
    }

    fn commit(&mut self, next_move: Move) -> anyhow::Result<Event> {
        let captured = self.game.play(&next_move)?;
        Ok(Event::Committed {
            played: self.last_move_or(&next_move),
            captured,
        })
    }

    fn last_move_or(&self, fallback: &Move) -> Move {
        *self.game.last_move().unwrap_or(fallback)
    }
}
