//! 棋譜（`f5 d6 c3 ...`）を初期局面から再生し、盤面と結果を表示する。
//!
//! ```text
//! osero_replay [--verbose] <move>...
//! ```
//!
//! 手番の進行（パス・終局）はエンジンが判定するため、棋譜にパスは書かない。
//! ログは JSON で標準エラーに出す。

use std::io::{self, Write as _};
use std::process::ExitCode;

use osero_core::engine;
use tracing::{Level, error, info};

/// コマンドライン引数。
#[derive(Debug)]
struct Args {
    /// 再生する手。
    moves: Vec<String>,
    /// ログの詳細度。
    verbose: bool,
}

impl Args {
    /// `std::env::args` から読み取る。
    fn parse() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    /// 引数列から読み取る。手は空白またはカンマで区切ってよい。
    fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let mut moves = Vec::new();
        let mut verbose = false;

        for arg in args {
            if arg == "--verbose" || arg == "-v" {
                verbose = true;
                continue;
            }
            moves.extend(
                arg.split(|ch: char| ch.is_whitespace() || ch == ',')
                    .filter(|token| !token.is_empty())
                    .map(str::to_owned),
            );
        }

        Self { moves, verbose }
    }
}

/// 1手の結果を人間向けの文に直す。
fn describe(turn: engine::Turn) -> String {
    match turn {
        engine::Turn::Continued { next } => format!("{next} to move"),
        engine::Turn::Passed { skipped } => {
            format!("{skipped} has no legal move and passes")
        }
        engine::Turn::GameOver { black, white } => {
            format!("game over (black={black} white={white})")
        }
        _ => String::from("unknown"),
    }
}

/// 棋譜を再生する。
///
/// 最初に失敗した手で止まり、その手の説明を `Err` で返す。`game` はその直前の状態のまま残る。
fn replay(
    game: &mut engine::Game,
    moves: &[String],
    out: &mut impl io::Write,
) -> Result<(), String> {
    for (ply, token) in moves.iter().enumerate() {
        let square: engine::Square = token
            .parse()
            .map_err(|err| format!("move {}: `{token}`: {err}", ply.wrapping_add(1)))?;
        let mover = game.current_player();
        let turn = game
            .play(square)
            .map_err(|err| format!("move {}: {mover} {square}: {err}", ply.wrapping_add(1)))?;

        info!(ply = ply.wrapping_add(1), %mover, %square, ?turn, "move replayed");
        writeln!(out, "{}. {mover} {square}: {}", ply.wrapping_add(1), describe(turn))
            .map_err(|err| err.to_string())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut game = engine::Game::initial();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = replay(&mut game, &args.moves, &mut out);

    let (black, white) = game.counts();
    let status = match game.status() {
        engine::GameStatus::GameOver { .. } => match game.winner() {
            Some(color) => format!("{color} wins"),
            None => String::from("draw"),
        },
        engine::GameStatus::InProgress => format!("{} to move", game.current_player()),
        _ => String::from("unknown"),
    };
    let summary = writeln!(out, "\n{}B={black} W={white} | {status}", game.board());

    if let Err(message) = result {
        error!(%message, "replay stopped");
        return ExitCode::FAILURE;
    }
    if summary.is_err() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
