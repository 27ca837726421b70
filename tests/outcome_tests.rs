// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chess_notation::{Color, ErrorKind, Game, GameConfig, Method, Outcome};

fn play_all(game: &mut Game, moves: &[&str]) {
    for text in moves {
        game.play(text).unwrap();
    }
}

#[test]
fn rook_ending_stalemate() {
    let mut game = Game::new(GameConfig::from_fen("k7/8/2K5/8/8/8/8/1R6 w - - 0 1")).unwrap();
    game.play("Rb7").unwrap();
    assert_eq!(Outcome::Draw, game.outcome());
    assert_eq!(Method::Stalemate, game.method());
}

#[test]
fn back_rank_mate() {
    let mut game = Game::new(GameConfig::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1")).unwrap();
    let mov = game.play("Ra8#").unwrap();
    assert_eq!("a1a8", mov.to_string());
    assert_eq!(Outcome::WhiteWon, game.outcome());
    assert_eq!(Method::Checkmate, game.method());
    assert!(game.to_pgn().contains("1. Ra8# 1-0"));
}

#[test]
fn finished_games_reject_moves() {
    let mut game = Game::default();
    play_all(&mut game, &["f3", "e5", "g4", "Qh4#"]);
    assert_eq!(Outcome::BlackWon, game.outcome());

    let err = game.play("a3").unwrap_err();
    assert_eq!(ErrorKind::GameAlreadyComplete, err.kind());
    assert_eq!(4, game.moves().len());

    let err = game.resign(Color::White).unwrap_err();
    assert_eq!(ErrorKind::GameAlreadyComplete, err.kind());
}

#[test]
fn knight_shuffle_repetitions() {
    let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8"];
    let mut game = Game::default();
    play_all(&mut game, &shuffle);
    assert!(!game.eligible_draws().contains(&Method::ThreefoldRepetition));
    play_all(&mut game, &shuffle);
    assert!(game.eligible_draws().contains(&Method::ThreefoldRepetition));
    play_all(&mut game, &shuffle);
    assert_eq!(Outcome::Undecided, game.outcome());
    play_all(&mut game, &shuffle);
    assert_eq!(Outcome::Draw, game.outcome());
    assert_eq!(Method::FivefoldRepetition, game.method());
}
