mod common;

use common::*;
use hues_core::{FinalQuorum, Game, GameEvent, GameRules, export_csv, SelectionFilter};
use hues_types::{GamePhase, Position, Score};

#[test]
fn test_two_player_game_end_to_end() {
    let mut game = create_game_with_players(&["Ana", "Luis"]);
    game.set_max_rounds(2).unwrap();

    assert!(game.start());
    assert_phase(&game, GamePhase::Guessing);
    assert_eq!(game.state().current_round, 1);
    let first_word = game.state().current_word.clone();
    assert!(test_words().contains(&first_word));

    // Ana alone is not enough for an average
    submit_guesses(&mut game, &[(1, 3, 4)]);
    assert!(!game.all_players_guessed());
    assert_eq!(game.compute_results(), None);
    assert_phase(&game, GamePhase::Guessing);

    submit_guesses(&mut game, &[(2, 3, 5)]);
    assert!(game.all_players_guessed());
    assert_eq!(game.compute_results(), Some(Position::new(3, 5)));
    assert_phase(&game, GamePhase::Scoring);
    assert_eq!(game.distance_from_average(1), Some(1));
    assert_eq!(game.distance_from_average(2), Some(0));

    assert!(game.advance_round());
    assert_phase(&game, GamePhase::Guessing);
    assert_eq!(game.state().current_round, 2);
    assert!(game.state().average_position.is_none());
    assert!(test_words().contains(&game.state().current_word));
    assert_eq!(game.state().history_word(1), Some(first_word.as_str()));

    play_round(&mut game, &[(1, 10, 10), (2, 10, 12)]);
    assert!(game.advance_round());

    assert_phase(&game, GamePhase::End);
    // Round 1: average (3, 5) -> Ana 2, Luis 3. Round 2: average (10, 11) -> 2 each.
    assert_eq!(game.state().score_of(1), Some(4));
    assert_eq!(game.state().score_of(2), Some(5));
    assert_eq!(game.state().word_history.len(), 2);
}

#[test]
fn test_final_scores_replace_running_scores() {
    let mut game = create_standard_game();
    game.set_max_rounds(2).unwrap();

    play_round(&mut game, &[(1, 0, 0), (2, 0, 0)]);
    game.advance_round();
    play_round(&mut game, &[(1, 0, 0), (2, 4, 0)]);
    game.advance_round();

    assert_eq!(
        game.state().scores,
        vec![
            Score { player_id: 1, score: 4 },
            Score { player_id: 2, score: 4 },
        ]
    );

    // Running finalize again recomputes rather than adds
    assert!(game.finalize());
    assert_eq!(game.state().score_of(1), Some(4));
}

#[test]
fn test_repeated_guesses_keep_one_entry_per_round() {
    let mut game = create_standard_game();
    submit_guesses(&mut game, &[(1, 1, 1), (1, 2, 2), (1, 7, 8)]);

    let ana: Vec<_> = game
        .state()
        .guesses
        .iter()
        .filter(|g| g.player_id == 1 && g.round == 1)
        .collect();
    assert_eq!(ana.len(), 1);
    assert_eq!(ana[0].position, Position::new(7, 8));

    // A new round gets its own entry
    submit_guesses(&mut game, &[(2, 7, 8)]);
    game.compute_results();
    game.advance_round();
    submit_guesses(&mut game, &[(1, 0, 0)]);
    assert_eq!(game.state().guesses.len(), 3);
}

#[test]
fn test_reset_preserves_roster() {
    let mut game = create_game_with_players(&["Ana", "Luis", "Eva"]);
    game.remove_player(2);
    game.add_player("Sofia").unwrap();
    game.set_max_rounds(3).unwrap();
    let roster = game.state().players.clone();
    let pool = game.state().words.clone();

    game.start();
    play_round(&mut game, &[(1, 5, 5), (3, 5, 6), (4, 6, 5)]);
    game.advance_round();
    play_round(&mut game, &[(1, 1, 1), (3, 1, 1)]);
    game.advance_round();
    play_round(&mut game, &[(1, 9, 9), (4, 9, 9)]);
    game.advance_round();
    assert_phase(&game, GamePhase::End);
    assert!(game.state().score_of(1).unwrap() > 0);

    game.reset();
    let state = game.state();
    assert_eq!(state.game_phase, GamePhase::Setup);
    assert_eq!(state.players, roster);
    assert!(state.scores.iter().all(|s| s.score == 0));
    assert_eq!(state.scores.len(), roster.len());
    assert!(state.guesses.is_empty());
    assert!(state.word_history.is_empty());
    assert!(state.current_word.is_empty());
    assert!(state.average_position.is_none());
    assert_eq!(state.current_round, 1);
    assert_eq!(state.max_rounds, 3);
    assert_eq!(state.words, pool);

    // Same players can play again straight away
    assert!(game.start());
    assert!(!game.state().current_word.is_empty());
}

#[test]
fn test_solo_round_scoring_under_both_quorum_rules() {
    for (rule, expected) in [(FinalQuorum::MatchLive, 6), (FinalQuorum::Strict, 0)] {
        let mut game = Game::new(GameRules {
            final_quorum: rule,
            ..GameRules::seeded(9)
        });
        game.set_words(test_words());
        game.add_player("Ana").unwrap();
        game.set_max_rounds(2).unwrap();
        game.start();

        // A single guess is enough for the live average in a solo game
        assert_eq!(game.compute_results(), None);
        assert_eq!(play_round(&mut game, &[(1, 5, 5)]), Position::new(5, 5));
        game.advance_round();
        play_round(&mut game, &[(1, 20, 2)]);
        game.advance_round();

        assert_phase(&game, GamePhase::End);
        assert_eq!(game.state().score_of(1), Some(expected), "rule {:?}", rule);
    }
}

#[test]
fn test_seeded_games_draw_the_same_words() {
    let words_of = |seed: u64| {
        let mut game = Game::new(GameRules::seeded(seed));
        game.set_words(test_words());
        game.add_player("Ana").unwrap();
        game.start();
        let mut drawn = vec![game.state().current_word.clone()];
        for _ in 0..3 {
            play_round(&mut game, &[(1, 0, 0)]);
            game.advance_round();
            drawn.push(game.state().current_word.clone());
        }
        drawn
    };

    assert_eq!(words_of(77), words_of(77));
}

#[test]
fn test_events_follow_the_game() {
    let collector = EventCollector::new();
    let mut game = create_game_with_players(&[]);
    game.add_event_handler(Box::new(collector.clone()));

    game.add_player("Ana").unwrap();
    game.set_max_rounds(1).unwrap();
    game.start();
    play_round(&mut game, &[(1, 2, 2)]);
    game.advance_round();
    game.reset();

    assert_eq!(
        collector.event_names(),
        vec![
            "player_joined",
            "game_started",
            "guess_submitted",
            "round_scored",
            "game_completed",
            "game_reset",
        ]
    );

    let completed = collector
        .get_events()
        .into_iter()
        .find(|e| matches!(e, GameEvent::GameCompleted { .. }));
    assert_eq!(
        completed,
        Some(GameEvent::GameCompleted {
            final_scores: vec![Score { player_id: 1, score: 3 }],
        })
    );
    assert_eq!(collector.last_event(), Some(GameEvent::GameReset));
}

#[test]
fn test_export_after_game() {
    let mut game = create_standard_game();
    game.set_max_rounds(1).unwrap();
    play_round(&mut game, &[(1, 0, 0), (2, 29, 15)]);
    game.advance_round();

    let csv = export_csv(game.state(), SelectionFilter::All);
    let word = game.round_word(1).unwrap().to_string();
    assert_eq!(
        csv,
        format!(
            "Ronda,Palabra,Jugador,Coordenadas,X,Y\n1,{w},Ana,A1,1,A\n1,{w},Luis,P30,30,P",
            w = word
        )
    );
}

#[test]
fn test_restore_from_snapshot_continues_play() {
    let mut game = create_standard_game();
    play_round(&mut game, &[(1, 3, 3), (2, 3, 3)]);
    let snapshot = game.snapshot();

    let mut restored = Game::restore(snapshot.clone(), GameRules::seeded(1));
    assert_eq!(restored.state(), &snapshot);
    assert!(restored.advance_round());
    assert_eq!(restored.state().current_round, 2);
    assert_eq!(restored.add_player("Eva").unwrap(), 3);
}
