use core::fmt;

use tracing::trace;

use crate::engine::types::{Cell, Color, Square};

/// 左端の列（x = 0）のマスク。
const LEFT_EDGE: u64 = 0x0101_0101_0101_0101;

/// 右端の列（x = 7）のマスク。
const RIGHT_EDGE: u64 = 0x8080_8080_8080_8080;

/// 連なりを1マスずつ伸ばす回数。
///
/// 1方向に挟める石は最大6個なので、最初の1個に加えて5回で足りる。
const EXTEND_STEPS: u8 = 5;

/// x 方向に1マス進むときのビット移動量。
const STEP_X: u32 = 1;

/// y 方向に1マス進むときのビット移動量。
const STEP_Y: u32 = 8;

/// `(dx, dy) = (1, 1)` / `(-1, -1)` のビット移動量。
const STEP_DIAGONAL: u32 = 9;

/// `(dx, dy) = (-1, 1)` / `(1, -1)` のビット移動量。
const STEP_ANTI_DIAGONAL: u32 = 7;

/// 初期配置（黒）: (4, 3)。
const START_BLACK_0: u32 = 28;

/// 初期配置（黒）: (3, 4)。
const START_BLACK_1: u32 = 35;

/// 初期配置（白）: (3, 3)。
const START_WHITE_0: u32 = 27;

/// 初期配置（白）: (4, 4)。
const START_WHITE_1: u32 = 36;

/// `u64` の 1 を表す値。
const U64_ONE: u64 = u64::MIN.wrapping_add(1);

/// 8x8 の盤面。
///
/// 黒石・白石をそれぞれビットボードで持つ。ビット `y * 8 + x` が `(x, y)` に対応する。
/// 石の増減は [`Board::place_piece`]（着手と反転）と [`Board::init`] 以外では起きない。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    /// 黒石のビットボード。
    black: u64,
    /// 白石のビットボード。
    white: u64,
}

/// 着手の適用に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ApplyMoveError {
    /// 挟める石が1つもない。
    IllegalMove,
    /// 指定マスにはすでに石がある。
    Occupied,
    /// 盤外の座標が指定された。
    OutOfBounds,
}

impl fmt::Display for ApplyMoveError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::IllegalMove => f.write_str("move does not capture any stone"),
            Self::Occupied => f.write_str("square is already occupied"),
            Self::OutOfBounds => f.write_str("coordinates are outside the board"),
        }
    }
}

impl core::error::Error for ApplyMoveError {}

impl Default for Board {
    #[inline]
    fn default() -> Self {
        Self::initial()
    }
}

impl Board {
    /// 着手を適用し、反転した石のビットボードを返す。
    ///
    /// 失敗した場合、盤面は一切変更されない。
    ///
    /// # Errors
    ///
    /// - `ApplyMoveError::Occupied`: 指定マスに石がある場合
    /// - `ApplyMoveError::IllegalMove`: どの方向にも挟める石が無い場合
    ///
    #[inline]
    pub fn apply(&mut self, square: Square, color: Color) -> Result<u64, ApplyMoveError> {
        if self.occupied() & square.bit() != u64::MIN {
            trace!(%square, %color, "rejected: occupied");
            return Err(ApplyMoveError::Occupied);
        }

        let (player, opponent) = self.split(color);
        let flipped = flips(player, opponent, square);
        if flipped == u64::MIN {
            trace!(%square, %color, "rejected: no capture");
            return Err(ApplyMoveError::IllegalMove);
        }

        let next_player = player | square.bit() | flipped;
        let next_opponent = opponent & !flipped;

        (self.black, self.white) = match color {
            Color::Black => (next_player, next_opponent),
            Color::White => (next_opponent, next_player),
        };

        Ok(flipped)
    }

    /// 黒石のビットボードを返す。
    #[inline]
    #[must_use]
    pub const fn black(self) -> u64 {
        self.black
    }

    /// 指定手番で着手可能かを返す。
    #[inline]
    #[must_use]
    pub fn can_play_for(self, color: Color) -> bool {
        self.legal_moves_bits(color) != u64::MIN
    }

    /// 座標 `(x, y)` のマスの状態を返す（盤外なら `None`）。
    #[inline]
    #[must_use]
    pub fn cell(self, x: u8, y: u8) -> Option<Cell> {
        Square::from_xy(x, y).map(|square| self.cell_at(square))
    }

    /// 指定マスの状態を返す。
    #[inline]
    #[must_use]
    pub fn cell_at(self, square: Square) -> Cell {
        let mask = square.bit();
        if self.black & mask != u64::MIN {
            Cell::Occupied(Color::Black)
        } else if self.white & mask != u64::MIN {
            Cell::Occupied(Color::White)
        } else {
            Cell::Empty
        }
    }

    /// 石数（黒、白）を返す。
    #[inline]
    #[must_use]
    pub const fn counts(self) -> (u32, u32) {
        (self.black.count_ones(), self.white.count_ones())
    }

    /// `color` が `square` に打った場合に反転する石のビットボードを返す。
    ///
    /// 盤面は変更しない。指定マスが埋まっている場合は 0 を返す。
    #[inline]
    #[must_use]
    pub fn flips_for(self, square: Square, color: Color) -> u64 {
        if self.occupied() & square.bit() != u64::MIN {
            return u64::MIN;
        }

        let (player, opponent) = self.split(color);
        flips(player, opponent, square)
    }

    /// 盤面を生のビットボードから生成する（crate 内部向け）。
    ///
    /// - `black` と `white` は重複しないこと（`black & white == 0`）
    #[cfg(test)]
    #[inline]
    #[must_use]
    pub(crate) const fn from_raw(black: u64, white: u64) -> Self {
        Self { black, white }
    }

    /// 盤面を初期配置に戻す。
    #[inline]
    pub fn init(&mut self) {
        *self = Self::initial();
    }

    /// 初期局面を返す。
    #[inline]
    #[must_use]
    pub const fn initial() -> Self {
        let b0 = match U64_ONE.checked_shl(START_BLACK_0) {
            Some(value) => value,
            None => u64::MIN,
        };
        let b1 = match U64_ONE.checked_shl(START_BLACK_1) {
            Some(value) => value,
            None => u64::MIN,
        };
        let w0 = match U64_ONE.checked_shl(START_WHITE_0) {
            Some(value) => value,
            None => u64::MIN,
        };
        let w1 = match U64_ONE.checked_shl(START_WHITE_1) {
            Some(value) => value,
            None => u64::MIN,
        };

        Self {
            black: b0 | b1,
            white: w0 | w1,
        }
    }

    /// `(x, y)` が `color` にとって合法手かを返す。盤外は常に `false`。
    #[inline]
    #[must_use]
    pub fn is_legal_move(self, x: u8, y: u8, color: Color) -> bool {
        Square::from_xy(x, y).is_some_and(|square| self.flips_for(square, color) != u64::MIN)
    }

    /// 指定手番の合法手を行優先で返す。
    #[inline]
    #[must_use]
    pub fn legal_moves(self, color: Color) -> Vec<Square> {
        Square::iter_bits(self.legal_moves_bits(color)).collect()
    }

    /// 指定手番の合法手ビットボードを返す。
    #[inline]
    #[must_use]
    pub fn legal_moves_bits(self, color: Color) -> u64 {
        let (player, opponent) = self.split(color);
        legal_moves(player, opponent)
    }

    /// 盤面の占有ビットボードを返す。
    #[inline]
    #[must_use]
    pub const fn occupied(self) -> u64 {
        self.black | self.white
    }

    /// 座標 `(x, y)` に `color` の石を打ち、反転した石のビットボードを返す。
    ///
    /// # Errors
    ///
    /// - `ApplyMoveError::OutOfBounds`: 盤外の座標の場合
    /// - それ以外は [`Board::apply`] と同じ
    ///
    #[inline]
    pub fn place_piece(&mut self, x: u8, y: u8, color: Color) -> Result<u64, ApplyMoveError> {
        let Some(square) = Square::from_xy(x, y) else {
            trace!(x, y, %color, "rejected: out of bounds");
            return Err(ApplyMoveError::OutOfBounds);
        };

        self.apply(square, color)
    }

    /// (自分, 相手) の順でビットボードを返す。
    #[inline]
    const fn split(self, color: Color) -> (u64, u64) {
        match color {
            Color::Black => (self.black, self.white),
            Color::White => (self.white, self.black),
        }
    }

    /// 白石のビットボードを返す。
    #[inline]
    #[must_use]
    pub const fn white(self) -> u64 {
        self.white
    }
}

/// `X` が黒、`O` が白、`.` が空き。
impl fmt::Display for Board {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for y in u8::MIN..Square::BOARD_LEN {
            write!(f, "{}", y.wrapping_add(1))?;
            for x in u8::MIN..Square::BOARD_LEN {
                let mark = match self.cell(x, y) {
                    Some(Cell::Occupied(Color::Black)) => 'X',
                    Some(Cell::Occupied(Color::White)) => 'O',
                    Some(Cell::Empty) | None => '.',
                };
                write!(f, " {mark}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// 1マス進める関数の型。盤外に出たビットは捨てる。
type Step = fn(u64) -> u64;

/// 8方向 `(dx, dy) ∈ {-1, 0, 1}² \ {(0, 0)}` への1マス移動。
const DIRECTIONS: [Step; 8] = [
    step_up_left,
    step_up,
    step_up_right,
    step_left,
    step_right,
    step_down_left,
    step_down,
    step_down_right,
];

/// `mv` に打ったとき、全方向で挟める相手の石の和集合を返す。
fn flips(player: u64, opponent: u64, mv: Square) -> u64 {
    let origin = mv.bit();
    DIRECTIONS.iter().fold(u64::MIN, |captured, &step| {
        captured | capture_run(player, opponent, origin, step)
    })
}

/// `origin` から1方向に進み、相手の石の連なりを集める。
///
/// 連なりが空でなく、その先が自分の石で閉じている場合だけ連なりを返す。
/// 盤外か空きマスで途切れた場合は 0。
fn capture_run(player: u64, opponent: u64, origin: u64, step: Step) -> u64 {
    let first = step(origin) & opponent;
    if first == u64::MIN {
        return u64::MIN;
    }

    let run = extend_run(first, opponent, step);
    if step(run) & player != u64::MIN {
        run
    } else {
        u64::MIN
    }
}

/// `player` の合法手（空きマスのうち1方向以上で挟めるもの）を返す。
///
/// 自分の石から相手の石の連なりを伸ばし、その先の空きマスを全方向ぶん集める。
/// 結果は [`capture_run`] で 1 マスずつ調べた場合と一致する。
fn legal_moves(player: u64, opponent: u64) -> u64 {
    let empty = !(player | opponent);
    DIRECTIONS.iter().fold(u64::MIN, |targets, &step| {
        targets | landing_squares(player, opponent, empty, step)
    })
}

/// 1方向について、自分の石・相手の連なりの先にある空きマスを返す。
fn landing_squares(player: u64, opponent: u64, empty: u64, step: Step) -> u64 {
    let first = step(player) & opponent;
    if first == u64::MIN {
        return u64::MIN;
    }

    step(extend_run(first, opponent, step)) & empty
}

/// `run` を `step` 方向に、相手の石が続く限り伸ばす（Kogge-Stone 風の反復）。
fn extend_run(mut run: u64, opponent: u64, step: Step) -> u64 {
    for _ in u8::MIN..EXTEND_STEPS {
        run |= step(run) & opponent;
    }
    run
}

/// `(dx, dy) = (1, 0)`。
const fn step_right(bb: u64) -> u64 {
    (bb & !RIGHT_EDGE).wrapping_shl(STEP_X)
}

/// `(dx, dy) = (-1, 0)`。
const fn step_left(bb: u64) -> u64 {
    (bb & !LEFT_EDGE).wrapping_shr(STEP_X)
}

/// `(dx, dy) = (0, 1)`。行の端は y 方向の移動で越えないのでマスク不要。
const fn step_down(bb: u64) -> u64 {
    bb.wrapping_shl(STEP_Y)
}

/// `(dx, dy) = (0, -1)`。
const fn step_up(bb: u64) -> u64 {
    bb.wrapping_shr(STEP_Y)
}

/// `(dx, dy) = (1, 1)`。
const fn step_down_right(bb: u64) -> u64 {
    (bb & !RIGHT_EDGE).wrapping_shl(STEP_DIAGONAL)
}

/// `(dx, dy) = (-1, 1)`。
const fn step_down_left(bb: u64) -> u64 {
    (bb & !LEFT_EDGE).wrapping_shl(STEP_ANTI_DIAGONAL)
}

/// `(dx, dy) = (1, -1)`。
const fn step_up_right(bb: u64) -> u64 {
    (bb & !RIGHT_EDGE).wrapping_shr(STEP_ANTI_DIAGONAL)
}

/// `(dx, dy) = (-1, -1)`。
const fn step_up_left(bb: u64) -> u64 {
    (bb & !LEFT_EDGE).wrapping_shr(STEP_DIAGONAL)
}
