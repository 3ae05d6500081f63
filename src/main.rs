use std::io;

use anyhow::Context;
use chessmate::chess::game::Game;
use chessmate::Engine;
use clap::Parser;

/// Plays chess by the rules: select pieces, move them and get told about
/// checks, checkmates and draws.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// Starting position in Forsyth-Edwards Notation.
    #[arg(long)]
    fen: Option<String>,
    /// Do not print the version banner on startup.
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    if !config.quiet {
        chessmate::print_engine_info();
    }
    let game = match config.fen {
        Some(fen) => Game::try_from(fen.as_str()).context("parsing --fen")?,
        None => Game::new(),
    };
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Engine::new(game, &mut input, &mut output).run()
}
