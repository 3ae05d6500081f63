#![no_main]
use chessmate::chess::game::Game;
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position};

fuzz_target!(|data: &[u8]| {
    let input = match std::str::from_utf8(data) {
        Ok(input) => input,
        Err(_) => return,
    };
    let game = match Game::try_from(input) {
        Ok(game) => game,
        Err(_) => return,
    };
    let shakmaty_setup: shakmaty::fen::Fen = match input.trim().parse() {
        Ok(setup) => setup,
        Err(_) => return,
    };
    let shakmaty_position: Chess = match shakmaty_setup.into_position(CastlingMode::Standard) {
        Ok(position) => position,
        Err(_) => return,
    };
    // Promotions are listed once, with the queen.
    assert_eq!(
        game.legal_moves()
            .iter()
            .map(|m| m.to_string())
            .sorted()
            .collect::<Vec<_>>(),
        shakmaty_position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .filter(|m| !(m.len() == 5 && !m.ends_with('q')))
            .sorted()
            .collect::<Vec<_>>()
    );
});
