use core::fmt;

use tracing::{debug, info};

use crate::engine::board::{ApplyMoveError, Board};
use crate::engine::types::{Color, Square};

/// ゲームの状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Status {
    /// 終局（双方に合法手が無い）。
    GameOver {
        /// 黒の石数。
        black: u32,
        /// 白の石数。
        white: u32,
    },
    /// 進行中。
    InProgress,
}

/// 着手完了後に手番がどう進んだか。
///
/// 表示側はこの値を見て「手番交代」「パス」「終局」の通知を出す。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Turn {
    /// 相手に手番が移った。
    Continued {
        /// 次の手番。
        next: Color,
    },
    /// 終局。
    GameOver {
        /// 黒の石数。
        black: u32,
        /// 白の石数。
        white: u32,
    },
    /// 相手に合法手が無く、直前に打った側がもう一度打つ。
    Passed {
        /// パスした（飛ばされた）側。
        skipped: Color,
    },
}

/// 着手要求に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum PlayError {
    /// すでに終局している。
    GameOver,
    /// 盤面が着手を受け付けなかった。
    IllegalMove(ApplyMoveError),
    /// 前の着手の完了処理（[`Game::on_move_completed`]）がまだ呼ばれていない。
    MoveInFlight,
    /// 完了処理を待っている着手が無い。
    NoMoveInFlight,
    /// 手番ではない側が打とうとした。
    NotYourTurn,
}

impl fmt::Display for PlayError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::GameOver => f.write_str("game is already over"),
            Self::IllegalMove(err) => write!(f, "illegal move: {err}"),
            Self::MoveInFlight => f.write_str("previous move has not been completed"),
            Self::NoMoveInFlight => f.write_str("no move is waiting for completion"),
            Self::NotYourTurn => f.write_str("it is not this player's turn"),
        }
    }
}

impl core::error::Error for PlayError {
    #[inline]
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::IllegalMove(err) => Some(err),
            Self::GameOver | Self::MoveInFlight | Self::NoMoveInFlight | Self::NotYourTurn => None,
        }
    }
}

impl From<ApplyMoveError> for PlayError {
    #[inline]
    fn from(err: ApplyMoveError) -> Self {
        Self::IllegalMove(err)
    }
}

/// 1ゲームの進行を管理する構造体。
///
/// 着手は2段階で進む。[`Game::place_piece`] で盤面を即座に更新し、
/// 表示側の演出が終わったら [`Game::on_move_completed`] で手番を進める。
/// 演出が不要なら [`Game::play`] で両方をまとめて行う。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Game {
    /// 現在の盤面。
    board: Board,
    /// 現手番。
    current_player: Color,
    /// 完了処理を待っている着手があるか。
    move_in_flight: bool,
    /// 終局したか。
    terminal: bool,
}

impl Default for Game {
    #[inline]
    fn default() -> Self {
        Self::initial()
    }
}

impl Game {
    /// 現在の盤面を返す。
    #[inline]
    #[must_use]
    pub const fn board(self) -> Board {
        self.board
    }

    /// 石数（黒、白）を返す。
    #[inline]
    #[must_use]
    pub const fn counts(self) -> (u32, u32) {
        self.board.counts()
    }

    /// 現手番を返す。
    #[inline]
    #[must_use]
    pub const fn current_player(self) -> Color {
        self.current_player
    }

    /// 任意の盤面と手番からゲームを作る（crate 内部向け）。
    #[cfg(test)]
    #[inline]
    #[must_use]
    pub(crate) const fn from_parts(board: Board, current_player: Color) -> Self {
        Self {
            board,
            current_player,
            move_in_flight: false,
            terminal: false,
        }
    }

    /// 初期局面からゲームを開始する。
    #[inline]
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            board: Board::initial(),
            current_player: Color::Black,
            move_in_flight: false,
            terminal: false,
        }
    }

    /// 終局しているかどうかを返す。
    #[inline]
    #[must_use]
    pub const fn is_game_over(self) -> bool {
        self.terminal
    }

    /// 現手番の合法手を行優先で返す。終局後は空。
    #[inline]
    #[must_use]
    pub fn legal_moves(self) -> Vec<Square> {
        if self.terminal {
            return Vec::new();
        }
        self.board.legal_moves(self.current_player)
    }

    /// 着手の完了後に手番を進める。
    ///
    /// 1. 相手に手番を渡す。
    /// 2. 相手に合法手が無ければ、打った側に手番を戻す（パス）。
    /// 3. 打った側にも合法手が無ければ終局。
    ///
    /// 盤面が埋まったかどうかは見ない。埋まれば双方とも打てないので 3 に該当する。
    ///
    /// # Errors
    ///
    /// [`Game::place_piece`] が成功していない場合、`PlayError::NoMoveInFlight` を返す。
    ///
    #[inline]
    pub fn on_move_completed(&mut self) -> Result<Turn, PlayError> {
        if !self.move_in_flight {
            return Err(PlayError::NoMoveInFlight);
        }
        self.move_in_flight = false;

        let mover = self.current_player;
        let next = mover.opponent();

        if self.board.can_play_for(next) {
            self.current_player = next;
            debug!(%next, "turn changed");
            return Ok(Turn::Continued { next });
        }

        if self.board.can_play_for(mover) {
            info!(skipped = %next, %mover, "pass");
            return Ok(Turn::Passed { skipped: next });
        }

        self.terminal = true;
        let (black, white) = self.board.counts();
        info!(black, white, "game over");
        Ok(Turn::GameOver { black, white })
    }

    /// 現手番として `square` に打ち、手番を進める。
    ///
    /// [`Game::place_piece`] と [`Game::on_move_completed`] を続けて呼ぶのと同じ。
    ///
    /// # Errors
    ///
    /// [`Game::place_piece`] と同じ。
    ///
    #[inline]
    pub fn play(&mut self, square: Square) -> Result<Turn, PlayError> {
        self.place_piece(square.x(), square.y(), self.current_player)?;
        self.on_move_completed()
    }

    /// `(x, y)` に `color` の石を打ち、反転した石のビットボードを返す。
    ///
    /// 盤面は即座に更新されるが、手番は [`Game::on_move_completed`] を呼ぶまで進まない。
    /// 失敗した場合、状態は一切変更されない。
    ///
    /// # Errors
    ///
    /// - `PlayError::GameOver`: すでに終局している場合
    /// - `PlayError::MoveInFlight`: 前の着手の完了処理が済んでいない場合
    /// - `PlayError::NotYourTurn`: `color` が現手番ではない場合
    /// - `PlayError::IllegalMove`: 盤外・石のあるマス・挟めないマスの場合
    ///
    #[inline]
    pub fn place_piece(&mut self, x: u8, y: u8, color: Color) -> Result<u64, PlayError> {
        if self.terminal {
            return Err(PlayError::GameOver);
        }
        if self.move_in_flight {
            return Err(PlayError::MoveInFlight);
        }
        if color != self.current_player {
            return Err(PlayError::NotYourTurn);
        }

        let flipped = self.board.place_piece(x, y, color)?;
        self.move_in_flight = true;
        debug!(x, y, %color, flipped = flipped.count_ones(), "piece placed");

        Ok(flipped)
    }

    /// 初期局面からやり直す。
    #[inline]
    pub fn restart(&mut self) {
        self.board.init();
        self.current_player = Color::Black;
        self.move_in_flight = false;
        self.terminal = false;
        debug!("game restarted");
    }

    /// 現在のゲーム状態を返す。
    #[inline]
    #[must_use]
    pub const fn status(self) -> Status {
        if self.terminal {
            let (black, white) = self.board.counts();
            return Status::GameOver { black, white };
        }

        Status::InProgress
    }

    /// 勝者を返す。進行中または引き分けなら `None`。
    #[inline]
    #[must_use]
    pub const fn winner(self) -> Option<Color> {
        if !self.terminal {
            return None;
        }

        let (black, white) = self.board.counts();
        if black > white {
            Some(Color::Black)
        } else if white > black {
            Some(Color::White)
        } else {
            None
        }
    }
}
