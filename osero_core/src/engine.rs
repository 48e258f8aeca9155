/// 盤面（ビットボード）と合法手/反転処理の実装。
pub mod board;
/// ゲーム進行（手番、パス、終局判定など）の実装。
pub mod game;
pub mod types;

pub type Board = board::Board;
pub type Game = game::Game;
pub type Color = types::Color;
pub type Cell = types::Cell;
pub type Square = types::Square;
pub type GameStatus = game::Status;
pub type Turn = game::Turn;
pub type PlayError = game::PlayError;
pub type ApplyMoveError = board::ApplyMoveError;
pub type ParseSquareError = types::ParseSquareError;
