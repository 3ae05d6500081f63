//! Text front-end: the [`Engine`] reads commands line by line, drives the
//! [interaction state machine](crate::interaction) and reports what happened.
//!
//! The protocol is modelled after UCI: one command per line, responses are
//! plain lines and diagnostics are sent as `info string <message>`. A command
//! that fails is reported and skipped, it never terminates the loop.
//!
//! | Command | Effect |
//! | --- | --- |
//! | `new` | Reset to the starting position |
//! | `position startpos \| fen <FEN> [moves <m>...]` | Set up a position |
//! | `click <square>` | Select a piece or a target square |
//! | `promote <q\|r\|b\|n>` | Choose the piece for a pending promotion |
//! | `cancel` | Drop the selection or the pending promotion |
//! | `play <move>` | Play a move in UCI format |
//! | `moves [<square>]` | List legal moves |
//! | `undo` | Take back the last move |
//! | `d` | Dump the board |
//! | `status` | Side to move, check and outcome |
//! | `quit` | Exit |

use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use itertools::Itertools;

use crate::chess::core::{Move, Promotion, Square};
use crate::chess::game::Game;
use crate::engine::command::Command;
use crate::interaction::{Event, Interaction, State};

mod command;

/// The Engine connects the rules with the outside world through the input
/// and output streams.
pub struct Engine<'a, R: BufRead, W: Write> {
    interaction: Interaction,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine starting from `game` with the
    /// provided I/O.
    #[must_use]
    pub fn new(game: Game, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            interaction: Interaction::new(game),
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes the commands until
    /// "quit" is sent or the input is closed.
    ///
    /// # Errors
    ///
    /// Only I/O errors are propagated: a command that can not be executed is
    /// reported as `info string` and the loop continues.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self
                .input
                .read_line(&mut line)
                .context("reading from input")?
                == 0
            {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            let command = Command::parse(&line);
            if command == Command::Quit {
                break;
            }
            if let Err(e) = self.execute(command) {
                writeln!(self.output, "info string {e:#}")?;
            }
            self.output.flush()?;
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::NewGame => {
                self.interaction.reset(Game::new());
                Ok(())
            },
            Command::SetPosition { fen, moves } => self.handle_position(fen.as_deref(), &moves),
            Command::Click { square } => {
                let event = self.interaction.click(Square::try_from(square.as_str())?)?;
                self.report(event)
            },
            Command::Promote { piece } => {
                let Some((symbol,)) = piece.chars().collect_tuple() else {
                    bail!("promotion should be a single piece symbol, got {piece}");
                };
                let event = self
                    .interaction
                    .choose_promotion(Promotion::try_from(symbol)?)?;
                self.report(event)
            },
            Command::Cancel => {
                let event = self.interaction.cancel();
                self.report(event)
            },
            Command::Play { next_move } => {
                let event = self.interaction.play(&Move::from_uci(&next_move)?)?;
                self.report(event)
            },
            Command::Moves { square } => self.handle_moves(square.as_deref()),
            Command::Undo => match self.interaction.undo() {
                Some(undone) => {
                    writeln!(self.output, "undo {undone}")?;
                    Ok(())
                },
                None => bail!("no moves to undo"),
            },
            Command::Dump => {
                writeln!(self.output, "{:?}", self.interaction.game().board())?;
                self.report_status()
            },
            Command::Status => self.report_status(),
            Command::Quit => Ok(()),
            Command::Unknown(command) => bail!("Unsupported command: {command}"),
        }
    }

    /// Sets up the position and plays the moves on top of it. The current
    /// game is kept if anything fails.
    fn handle_position(&mut self, fen: Option<&str>, moves: &[String]) -> anyhow::Result<()> {
        let mut game = match fen {
            Some(fen) => Game::try_from(fen)?,
            None => Game::new(),
        };
        for next_move in moves {
            let _ = game
                .play_uci(next_move)
                .with_context(|| format!("playing {next_move}"))?;
        }
        self.interaction.reset(game);
        Ok(())
    }

    fn handle_moves(&mut self, square: Option<&str>) -> anyhow::Result<()> {
        let game = self.interaction.game();
        let moves = match square {
            Some(square) => game.legal_moves_from(Square::try_from(square)?),
            None => game.legal_moves(),
        };
        writeln!(
            self.output,
            "moves {}",
            moves.iter().map(Move::to_string).sorted().join(" ")
        )?;
        Ok(())
    }

    fn report(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Ignored => writeln!(self.output, "ignored")?,
            Event::Selected { origin } => {
                let targets = match self.interaction.state() {
                    State::Selected { targets, .. } => targets
                        .iter()
                        .map(|target| target.to().to_string())
                        .join(" "),
                    State::Idle | State::PromotionPending { .. } => String::new(),
                };
                writeln!(self.output, "selected {origin} targets {targets}")?;
            },
            Event::Deselected => writeln!(self.output, "deselected")?,
            Event::PromotionRequired { pending } => writeln!(
                self.output,
                "promotion {}{} choose q r b n",
                pending.from(),
                pending.to()
            )?,
            Event::Committed { played, captured } => {
                match captured {
                    Some(piece) => writeln!(self.output, "move {played} captures {piece}")?,
                    None => writeln!(self.output, "move {played}")?,
                }
                return self.report_status();
            },
        }
        Ok(())
    }

    fn report_status(&mut self) -> anyhow::Result<()> {
        let game = self.interaction.game();
        match game.outcome() {
            Some(outcome) => writeln!(self.output, "outcome {outcome}")?,
            None if game.in_check() => {
                writeln!(self.output, "turn {} check", game.side_to_move().name())?;
            },
            None => writeln!(self.output, "turn {}", game.side_to_move().name())?,
        }
        Ok(())
    }
}
