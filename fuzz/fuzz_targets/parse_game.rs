#![no_main]
use chessmate::chess::game::Game;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(game) = Game::try_from(s) {
            // A position that was accepted has a well-defined state.
            let _ = game.outcome();
            let _ = game.board().to_string();
        }
    }
});
