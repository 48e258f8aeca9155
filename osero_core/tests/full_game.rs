//! 結合テスト: 公開 API だけで終局まで進め、手番進行の規則を毎手確認する。

/// 統合テスト本体。
#[cfg(test)]
mod tests {
    use osero_core::engine;

    /// リバーシの最大手数（初期4石を除く空きマス数）。
    const MAX_PLIES: u8 = 60;

    /// 合法手から1手を決定的に選ぶための簡易 RNG。
    struct Picker(u64);

    impl Picker {
        /// `moves` から1手選ぶ。空なら `None`。
        fn pick(&mut self, moves: &[engine::Square]) -> Option<engine::Square> {
            self.0 = self
                .0
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let len = u64::try_from(moves.len()).ok()?;
            let index = self.0.wrapping_shr(33).checked_rem(len)?;
            moves.get(usize::try_from(index).ok()?).copied()
        }
    }

    /// `seed` で選んだ手で終局まで打ち、最終石数を返す。
    ///
    /// 規則違反を見つけた時点でテストを失敗させる。終局しなければ `None`。
    fn play_to_end(seed: u64) -> Option<(u32, u32)> {
        let mut game = engine::Game::initial();
        let mut picker = Picker(seed);

        for _ply in u8::MIN..MAX_PLIES {
            let mover = game.current_player();
            let moves = game.legal_moves();
            assert!(!moves.is_empty(), "side to move must have a legal move");

            let stones_before = game.board().occupied().count_ones();
            let square = picker.pick(&moves)?;
            let turn = game.play(square);
            let stones_after = game.board().occupied().count_ones();

            assert_eq!(
                Some(stones_after),
                stones_before.checked_add(1),
                "exactly one stone is added per move"
            );
            assert_eq!(
                game.board().cell_at(square),
                engine::Cell::Occupied(mover)
            );

            let board = game.board();
            let opponent_can_play = board.can_play_for(mover.opponent());
            let mover_can_play = board.can_play_for(mover);

            match turn {
                Ok(engine::Turn::Continued { next }) => {
                    assert!(opponent_can_play);
                    assert_eq!(next, mover.opponent());
                    assert_eq!(game.current_player(), next);
                }
                Ok(engine::Turn::Passed { skipped }) => {
                    assert!(!opponent_can_play);
                    assert!(mover_can_play);
                    assert_eq!(skipped, mover.opponent());
                    assert_eq!(game.current_player(), mover);
                    assert!(!game.is_game_over());
                }
                Ok(engine::Turn::GameOver { black, white }) => {
                    assert!(!opponent_can_play && !mover_can_play);
                    assert!(game.is_game_over());
                    assert_eq!((black, white), game.counts());
                    assert_eq!(
                        game.status(),
                        engine::GameStatus::GameOver { black, white }
                    );

                    let before = game;
                    let current = game.current_player();
                    let retry = game.place_piece(0, 0, current);
                    assert_eq!(retry, Err(engine::PlayError::GameOver));
                    assert_eq!(game, before);
                    return Some((black, white));
                }
                other => {
                    assert!(other.is_ok(), "play must succeed, got={other:?}");
                    return None;
                }
            }
        }

        None
    }

    #[test]
    fn random_games_finish_with_consistent_scores() {
        for seed in u64::MIN..64 {
            let result = play_to_end(seed);
            assert!(result.is_some(), "seed={seed} did not finish");

            let Some((black, white)) = result else {
                return;
            };
            let total = black.checked_add(white);
            assert!(total.is_some(), "black+white must not overflow");
            let total = total.unwrap_or(u32::MAX);
            assert!(total <= 64, "seed={seed} total={total}");
            assert!(total >= 5, "seed={seed} total={total}");
        }
    }

    #[test]
    fn same_seed_replays_identically() {
        let first = play_to_end(42);
        assert!(first.is_some());
        assert_eq!(first, play_to_end(42));
    }

    #[test]
    fn opening_scenario_from_notation() {
        let mut game = engine::Game::initial();
        let parsed: Result<engine::Square, _> = "c4".parse();
        assert_eq!(parsed.map(|sq| (sq.x(), sq.y())), Ok((2, 3)));
        let Ok(square) = parsed else {
            return;
        };

        let turn = game.play(square);
        assert_eq!(
            turn,
            Ok(engine::Turn::Continued {
                next: engine::Color::White
            })
        );
        assert_eq!(game.counts(), (4, 1));
        assert!(!game.board().is_legal_move(0, 0, engine::Color::White));
    }

    #[test]
    fn restart_after_game_over() {
        let mut game = engine::Game::initial();
        let mut picker = Picker(7);
        for _ply in u8::MIN..MAX_PLIES {
            let Some(square) = picker.pick(&game.legal_moves()) else {
                break;
            };
            assert!(game.play(square).is_ok());
        }
        assert!(game.is_game_over());

        game.restart();
        assert_eq!(game, engine::Game::initial());
        assert_eq!(game.board(), engine::Board::initial());
        assert_eq!(game.status(), engine::GameStatus::InProgress);
    }
}
