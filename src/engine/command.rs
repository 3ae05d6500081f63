//! Commands of the line-based front-end protocol. Arguments are kept as raw
//! tokens and are validated when the command is executed, so that the error
//! can be reported back.

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    NewGame,
    SetPosition {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Click {
        square: String,
    },
    Promote {
        piece: String,
    },
    Cancel,
    Play {
        next_move: String,
    },
    Moves {
        square: Option<String>,
    },
    Undo,
    Dump,
    Status,
    Quit,
    Unknown(String),
}

fn parse_setposition(parts: &[&str]) -> Option<Command> {
    let moves_index = parts.iter().position(|&x| x == "moves");
    let setup = &parts[1..moves_index.unwrap_or(parts.len())];
    let fen = match setup.split_first() {
        Some((&"startpos", [])) => None,
        Some((&"fen", fen)) if !fen.is_empty() => Some(fen.join(" ")),
        _ => return None,
    };
    let moves = moves_index.map_or_else(Vec::new, |moves_index| {
        parts[moves_index + 1..]
            .iter()
            .map(ToString::to_string)
            .collect()
    });
    Some(Command::SetPosition { fen, moves })
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let unknown = || Self::Unknown(input.trim().to_string());

        match parts.as_slice() {
            ["new"] => Self::NewGame,
            ["position", ..] => parse_setposition(&parts).unwrap_or_else(unknown),
            ["click", square] => Self::Click {
                square: (*square).to_string(),
            },
            ["promote", piece] => Self::Promote {
                piece: (*piece).to_string(),
            },
            ["cancel"] => Self::Cancel,
            ["play", next_move] => Self::Play {
                next_move: (*next_move).to_string(),
            },
            ["moves"] => Self::Moves { square: None },
            ["moves", square] => Self::Moves {
                square: Some((*square).to_string()),
            },
            ["undo"] => Self::Undo,
            ["d"] => Self::Dump,
            ["status"] => Self::Status,
            ["quit"] => Self::Quit,
            _ => unknown(),
        }
    }
}
