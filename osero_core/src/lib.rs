//! Othello (Reversi) rules engine.
//!
//! このクレートは盤面・合法手・反転処理・手番進行を提供する `engine` のみを持ちます。
//! 描画や入力、演出（反転アニメーションなど）は利用側（UI やテストハーネス）の責務です。

#![forbid(unsafe_code)]

/// ゲームルール・盤面・進行を提供するモジュール。
pub mod engine;
