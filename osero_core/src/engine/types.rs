use core::fmt;
use core::str::FromStr;

/// 手番（石の色）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Color {
    /// 先手。
    Black,
    /// 後手。
    White,
}

impl Color {
    /// 相手側の色を返す。
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

impl fmt::Display for Color {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Black => f.write_str("black"),
            Self::White => f.write_str("white"),
        }
    }
}

/// マスの状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Cell {
    /// 空きマス。
    Empty,
    /// 石が置かれている。
    Occupied(Color),
}

impl Cell {
    /// 石の色を返す（空きマスなら `None`）。
    #[inline]
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            Self::Empty => None,
            Self::Occupied(color) => Some(color),
        }
    }

    /// 空きマスかどうかを返す。
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// 盤面上のマス（0..=63のインデックス）。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Square(
    /// `y * 8 + x` に対応する0..=63の値。
    u8,
);

/// 棋譜表記（`"d3"` など）の解析に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseSquareError {
    /// 列の文字が `a..=h` ではない。
    InvalidColumn,
    /// 行の文字が `1..=8` ではない。
    InvalidRow,
    /// 2文字ではない。
    InvalidLength,
}

impl fmt::Display for ParseSquareError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::InvalidColumn => f.write_str("column must be one of a..h"),
            Self::InvalidRow => f.write_str("row must be one of 1..8"),
            Self::InvalidLength => f.write_str("square must be two characters such as `d3`"),
        }
    }
}

impl core::error::Error for ParseSquareError {}

impl Square {
    /// 盤の一辺の長さ。
    pub const BOARD_LEN: u8 = 8;

    /// マスの総数。
    pub const COUNT: u8 = 64;

    /// 全マスを行優先（`y` → `x`）で列挙する。
    #[inline]
    pub fn all() -> impl Iterator<Item = Self> {
        (u8::MIN..Self::COUNT).map(Self::from_index_unchecked)
    }

    /// そのマスを表すビット（`u64`）を返す。
    #[inline]
    #[must_use]
    pub fn bit(self) -> u64 {
        let one = u64::MIN.wrapping_add(1);
        let shift = u32::from(self.0);

        one.checked_shl(shift).unwrap_or(u64::MIN)
    }

    /// 1ビットだけ立ったビットボードから `Square` を生成する。
    #[inline]
    #[must_use]
    pub fn from_bit(bit: u64) -> Option<Self> {
        if bit.count_ones() != 1 {
            return None;
        }

        u8::try_from(bit.trailing_zeros())
            .ok()
            .map(Self::from_index_unchecked)
    }

    /// インデックスから `Square` を生成する（範囲チェックなし）。
    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Self {
        Self(index)
    }

    /// 盤面座標（x, y）から `Square` を生成する。
    #[inline]
    #[must_use]
    pub const fn from_xy(x: u8, y: u8) -> Option<Self> {
        if x >= Self::BOARD_LEN || y >= Self::BOARD_LEN {
            return None;
        }

        let mut idx = match y.checked_mul(Self::BOARD_LEN) {
            Some(value) => value,
            None => return None,
        };

        idx = match idx.checked_add(x) {
            Some(value) => value,
            None => return None,
        };

        Some(Self(idx))
    }

    /// 0..=63 のインデックスを返す。
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// ビットボードに含まれるマスを行優先で列挙する。
    #[inline]
    pub fn iter_bits(bits: u64) -> impl Iterator<Item = Self> {
        let mut bb = bits;
        core::iter::from_fn(move || {
            if bb == u64::MIN {
                return None;
            }
            let lowest = bb & bb.wrapping_neg();
            bb &= bb.wrapping_sub(1);
            Self::from_bit(lowest)
        })
    }

    /// x 座標（0..=7）を返す。
    #[inline]
    #[must_use]
    pub const fn x(self) -> u8 {
        match self.0.checked_rem(Self::BOARD_LEN) {
            Some(value) => value,
            None => u8::MIN,
        }
    }

    /// y 座標（0..=7）を返す。
    #[inline]
    #[must_use]
    pub const fn y(self) -> u8 {
        match self.0.checked_div(Self::BOARD_LEN) {
            Some(value) => value,
            None => u8::MIN,
        }
    }
}

/// 列は `a..h`（x）、行は `1..8`（y）。
impl fmt::Display for Square {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = char::from(b'a'.wrapping_add(self.x()));
        let row = char::from(b'1'.wrapping_add(self.y()));
        write!(f, "{column}{row}")
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        let (column, row) = match *bytes {
            [column, row] => (column.to_ascii_lowercase(), row),
            _ => return Err(ParseSquareError::InvalidLength),
        };

        if !(b'a'..=b'h').contains(&column) {
            return Err(ParseSquareError::InvalidColumn);
        }
        if !(b'1'..=b'8').contains(&row) {
            return Err(ParseSquareError::InvalidRow);
        }

        Self::from_xy(column.wrapping_sub(b'a'), row.wrapping_sub(b'1'))
            .ok_or(ParseSquareError::InvalidLength)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Color, ParseSquareError, Square};

    #[test]
    fn opponent_is_an_involution() {
        for color in [Color::Black, Color::White] {
            assert_ne!(color.opponent(), color);
            assert_eq!(color.opponent().opponent(), color);
        }
    }

    #[test]
    fn from_xy_rejects_out_of_range() {
        assert!(Square::from_xy(8, 0).is_none());
        assert!(Square::from_xy(0, 8).is_none());
        assert!(Square::from_xy(u8::MAX, u8::MAX).is_none());

        let corner = Square::from_xy(7, 7);
        assert_eq!(corner.map(Square::index), Some(63));
    }

    #[test]
    fn xy_and_index_agree() {
        for square in Square::all() {
            assert_eq!(Square::from_xy(square.x(), square.y()), Some(square));
            assert_eq!(Square::from_bit(square.bit()), Some(square));
        }
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn iter_bits_is_row_major() {
        let picked = [0_u8, 9, 63].map(Square::from_index_unchecked);
        let bits = picked.iter().fold(u64::MIN, |acc, sq| acc | sq.bit());
        let squares: Vec<u8> = Square::iter_bits(bits).map(Square::index).collect();
        assert_eq!(squares, vec![0, 9, 63]);
        assert_eq!(Square::iter_bits(u64::MIN).count(), 0);
    }

    #[test]
    fn notation_parses_and_prints() {
        let d3: Result<Square, _> = "d3".parse();
        assert_eq!(d3, Ok(Square(19)));
        assert_eq!(d3.map(|sq| (sq.x(), sq.y())), Ok((3, 2)));

        let h8: Result<Square, _> = " H8 ".parse();
        assert_eq!(h8.map(|sq| sq.to_string()), Ok("h8".to_owned()));

        assert_eq!("i1".parse::<Square>(), Err(ParseSquareError::InvalidColumn));
        assert_eq!("a9".parse::<Square>(), Err(ParseSquareError::InvalidRow));
        assert_eq!("a10".parse::<Square>(), Err(ParseSquareError::InvalidLength));
        assert_eq!("".parse::<Square>(), Err(ParseSquareError::InvalidLength));
    }

    #[test]
    fn cell_accessors() {
        assert!(Cell::Empty.is_empty());
        assert_eq!(Cell::Empty.color(), None);
        assert_eq!(Cell::Occupied(Color::White).color(), Some(Color::White));
    }
}
