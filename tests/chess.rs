use chessmate::chess::core::{Move, Piece, PieceKind, Player, Promotion, Square};
use chessmate::chess::game::Game;
use chessmate::chess::{
    all_legal_moves,
    apply_move,
    generate_legal_moves,
    initial_board,
    is_attacked,
    is_checkmate,
    is_in_check,
    is_insufficient_material,
    is_stalemate,
    outcome,
    pseudo_legal_targets,
    Outcome,
};
use itertools::Itertools;
use pretty_assertions::assert_eq;

fn square(input: &str) -> Square {
    Square::try_from(input).unwrap()
}

fn setup(input: &str) -> Game {
    Game::try_from(input).unwrap_or_else(|e| panic!("parsing legal position {input}: {e}"))
}

fn play_all(game: &mut Game, moves: &[&str]) {
    for next_move in moves {
        drop(
            game.play_uci(next_move)
                .unwrap_or_else(|e| panic!("playing {next_move}: {e}")),
        );
    }
}

fn targets(game: &Game, origin: &str) -> Vec<String> {
    game.legal_moves_from(square(origin))
        .iter()
        .map(|m| m.to().to_string())
        .sorted()
        .collect()
}

#[test]
fn initial_position() {
    let board = initial_board();
    assert_eq!(all_legal_moves(&board, Player::White, None).len(), 20);
    assert_eq!(all_legal_moves(&board, Player::Black, None).len(), 20);
    assert!(!is_in_check(&board, Player::White, None));
    assert!(!is_in_check(&board, Player::Black, None));
    assert_eq!(outcome(&board, Player::White, None), None);
    assert_eq!(
        board.at(square("e1")),
        Some(Piece::new(Player::White, PieceKind::King))
    );
    assert_eq!(
        board.at(square("d8")),
        Some(Piece::new(Player::Black, PieceKind::Queen))
    );
    assert_eq!(board.pieces().count(), 32);
}

#[test]
fn opening_moves() {
    let mut game = Game::new();
    play_all(&mut game, &["e2e4", "e7e5"]);
    assert_eq!(game.ply(), 2);
    assert_eq!(game.side_to_move(), Player::White);
    assert!(!game.in_check());
    assert!(!game.legal_moves().is_empty());
    assert_eq!(game.outcome(), None);
    // The vacated squares are empty.
    assert_eq!(game.board().at(square("e2")), None);
    assert_eq!(game.board().at(square("e7")), None);
}

#[test]
fn fools_mate() {
    let mut game = Game::new();
    play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert!(game.in_check());
    assert!(game.legal_moves().is_empty());
    assert!(is_checkmate(game.board(), Player::White, game.last_move()));
    assert!(!is_stalemate(game.board(), Player::White, game.last_move()));
    assert_eq!(
        game.outcome(),
        Some(Outcome::Checkmate {
            winner: Player::Black
        })
    );
    assert_eq!(
        game.outcome().map(|outcome| outcome.to_string()),
        Some("Checkmate! Black wins!".to_string())
    );
    assert!(game.play_uci("a2a3").is_err());
}

#[test]
fn stalemate() {
    let game = setup("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!game.in_check());
    assert!(game.legal_moves().is_empty());
    assert!(is_stalemate(game.board(), Player::Black, None));
    assert!(!is_checkmate(game.board(), Player::Black, None));
    assert_eq!(game.outcome(), Some(Outcome::Stalemate));
    assert!(game.outcome().is_some_and(|outcome| outcome.is_draw()));
}

#[test]
fn moving_piece_vacates_origin() {
    let board = initial_board();
    let knight_move = Move::new(square("g1"), square("f3"));
    let (after, captured) = apply_move(&board, &knight_move).unwrap();
    assert_eq!(captured, None);
    assert_eq!(after.at(square("g1")), None);
    let knight = after.at(square("f3")).unwrap();
    assert_eq!(knight.kind, PieceKind::Knight);
    assert!(knight.has_moved);
    for player in [Player::White, Player::Black] {
        assert!(generate_legal_moves(&after, square("g1"), player, Some(&knight_move)).is_empty());
    }
    // The original board is untouched.
    assert_eq!(board, initial_board());
    assert!(apply_move(&board, &Move::new(square("e4"), square("e5"))).is_err());
}

#[test]
fn values_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<chessmate::chess::Board>();
    assert_send_sync::<Game>();
    assert_send_sync::<chessmate::interaction::Interaction>();
}

#[test]
fn attacks_use_reach() {
    let board = initial_board();
    assert!(is_attacked(&board, square("f3"), Player::White));
    assert!(is_attacked(&board, square("c6"), Player::Black));
    assert!(!is_attacked(&board, square("e5"), Player::White));
    assert!(!is_attacked(&board, square("e1"), Player::Black));
}

#[test]
fn pseudo_legal_includes_illegal_moves() {
    // The pawn is pinned along the diagonal: it can reach two squares but
    // none of the moves is legal.
    let game = setup("k7/1p6/8/8/8/8/8/4K2B b - - 0 1");
    assert_eq!(
        pseudo_legal_targets(game.board(), square("b7"), None).len(),
        2
    );
    assert!(generate_legal_moves(game.board(), square("b7"), Player::Black, None).is_empty());
    // Opponent's pieces have no legal moves for the mover.
    assert!(generate_legal_moves(game.board(), square("e1"), Player::Black, None).is_empty());
    assert!(generate_legal_moves(game.board(), square("e4"), Player::Black, None).is_empty());
}

#[test]
fn en_passant_window() {
    let mut game = Game::new();
    play_all(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert_eq!(targets(&game, "e5"), vec!["d6", "e6"]);

    let mut late = game.clone();
    play_all(&mut late, &["h2h3", "a6a5"]);
    // The right to capture en passant expired.
    assert_eq!(targets(&late, "e5"), vec!["e6"]);
    assert!(late.play_uci("e5d6").is_err());

    let captured = game.play_uci("e5d6").unwrap();
    assert_eq!(
        captured,
        Some(Piece {
            has_moved: true,
            ..Piece::new(Player::Black, PieceKind::Pawn)
        })
    );
    assert!(game.last_move().is_some_and(Move::is_en_passant));
    assert_eq!(game.board().at(square("d5")), None);
    assert_eq!(
        game.board().at(square("d6")).map(|piece| piece.kind),
        Some(PieceKind::Pawn)
    );
}

#[test]
fn en_passant_from_fen() {
    let mut game = setup("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    assert_eq!(targets(&game, "e5"), vec!["e6", "f6"]);
    assert_eq!(
        game.play_uci("e5f6").unwrap().map(|piece| piece.kind),
        Some(PieceKind::Pawn)
    );
    assert_eq!(game.board().at(square("f5")), None);
}

#[test]
fn castling() {
    let mut game = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    assert_eq!(
        targets(&game, "e1"),
        vec!["c1", "d1", "d2", "e2", "f1", "f2", "g1"]
    );
    play_all(&mut game, &["e1g1"]);
    assert!(game.last_move().is_some_and(Move::is_castling));
    assert_eq!(game.board().at(square("h1")), None);
    assert_eq!(
        game.board().at(square("f1")).map(|piece| piece.kind),
        Some(PieceKind::Rook)
    );
    assert_eq!(
        game.board().at(square("g1")).map(|piece| piece.kind),
        Some(PieceKind::King)
    );

    play_all(&mut game, &["e8c8"]);
    assert_eq!(game.board().at(square("a8")), None);
    assert_eq!(
        game.board().at(square("d8")).map(|piece| piece.kind),
        Some(PieceKind::Rook)
    );
    assert_eq!(
        game.board().at(square("c8")).map(|piece| piece.kind),
        Some(PieceKind::King)
    );
}

#[test]
fn castling_lost_after_king_moves() {
    let mut game = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    play_all(&mut game, &["e1f1", "e8f8", "f1e1", "f8e8"]);
    assert_eq!(targets(&game, "e1"), vec!["d1", "d2", "e2", "f1", "f2"]);
}

#[test]
fn castling_lost_after_rook_moves() {
    let mut game = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    play_all(&mut game, &["h1h2", "h8h7", "h2h1", "h7h8"]);
    assert_eq!(
        targets(&game, "e1"),
        vec!["c1", "d1", "d2", "e2", "f1", "f2"]
    );
    assert_eq!(
        targets(&game, "e1"),
        targets(&setup("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1"), "e1")
    );
}

#[test]
fn castling_while_in_check() {
    let game = setup("r3k2r/8/8/8/8/8/8/R3K2r w Qkq - 0 1");
    assert!(game.in_check());
    assert!(!game
        .legal_moves_from(square("e1"))
        .iter()
        .any(|m| m.is_castling()));
}

#[test]
fn promotion() {
    let mut game = setup("8/4P3/8/8/8/8/k7/7K w - - 0 1");
    let moves = game.legal_moves_from(square("e7"));
    assert_eq!(moves.len(), 1);
    assert!(moves[0].is_promotion());
    assert_eq!(moves[0].promotion(), Some(Promotion::Queen));

    let mut underpromotion = game.clone();
    drop(underpromotion.play_uci("e7e8n").unwrap());
    let knight = underpromotion.board().at(square("e8")).unwrap();
    assert_eq!(knight.kind, PieceKind::Knight);
    assert!(knight.was_promoted);

    // No choice means a queen.
    drop(game.play_uci("e7e8").unwrap());
    assert_eq!(
        game.board().at(square("e8")).map(|piece| piece.kind),
        Some(PieceKind::Queen)
    );
    assert!(game.play_uci("a2a3q").is_err());
}

#[test]
fn undo() {
    let mut game = Game::new();
    assert_eq!(game.undo(), None);
    play_all(&mut game, &["e2e4", "d7d5", "e4d5"]);
    assert_eq!(game.undo().map(|m| m.to_string()), Some("e4d5".to_string()));
    assert_eq!(game.undo().map(|m| m.to_string()), Some("d7d5".to_string()));
    assert_eq!(game.undo().map(|m| m.to_string()), Some("e2e4".to_string()));
    assert_eq!(game, Game::new());
}

#[test]
fn insufficient_material() {
    for (input, expected) in [
        ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
        ("4k3/8/8/8/8/8/8/4KN2 w - - 0 1", true),
        ("4k3/8/8/8/8/8/8/4KB2 w - - 0 1", true),
        ("4kn2/8/8/8/8/8/8/4K3 w - - 0 1", true),
        ("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", false),
        ("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1", false),
        ("4kb2/8/8/8/8/8/8/4KB2 w - - 0 1", false),
        ("4k3/8/8/8/8/8/8/3NKN2 w - - 0 1", false),
    ] {
        let game = setup(input);
        assert_eq!(is_insufficient_material(game.board()), expected, "{input}");
    }
    assert_eq!(
        setup("4k3/8/8/8/8/8/8/4K3 w - - 0 1").outcome(),
        Some(Outcome::InsufficientMaterial)
    );
}

#[test]
#[should_panic(expected = "expected 1 white king, got 0")]
fn no_white_king() {
    drop(Game::try_from("3k4/8/8/8/8/8/8/8 w - - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "expected 1 black king, got 0")]
fn no_black_king() {
    drop(Game::try_from("8/8/8/8/8/8/8/3K4 w - - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "expected 1 white king, got 3")]
fn too_many_kings() {
    drop(Game::try_from("1kkk4/8/8/8/8/8/8/1KKK4 w - - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "pawns can not be placed on backranks")]
fn pawns_on_backranks() {
    drop(Game::try_from("3kr3/8/8/8/8/5Q2/8/1KP5 w - - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "en passant square is not beyond pushed pawn")]
fn wrong_en_passant_player() {
    drop(
        Game::try_from("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1").unwrap(),
    );
}

#[test]
#[should_panic(expected = "the player who just moved can not be in check")]
fn opponent_in_check() {
    drop(Game::try_from("4k3/8/8/8/8/8/8/4K2r b - - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "trailing symbols are not allowed in FEN")]
fn trailing_symbols() {
    drop(Game::try_from("4k3/8/8/8/8/8/8/4K3 w - - 0 1 42").unwrap());
}

#[test]
#[should_panic(expected = "player should be 'w' or 'b', got 'x'")]
fn wrong_side_to_move() {
    drop(Game::try_from("4k3/8/8/8/8/8/8/4K3 x - - 0 1").unwrap());
}
