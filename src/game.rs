// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use hashbrown::HashMap;

use crate::error::{Error, Result};
use crate::move_generator::MoveVec;
use crate::moves::Move;
use crate::notation::{AlgebraicNotation, Notation};
use crate::outcome::{self, Method, Outcome};
use crate::pgn;
use crate::position::Position;
use crate::types::Color;

/// One PGN header entry, e.g. `[White "Kasparov"]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagPair {
    pub key: String,
    pub value: String,
}

impl TagPair {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> TagPair {
        TagPair {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitialPosition {
    /// The standard starting position.
    Default,
    Fen(String),
}

impl Default for InitialPosition {
    fn default() -> InitialPosition {
        InitialPosition::Default
    }
}

/// Everything a `Game` needs to know up front. Applied once, at construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameConfig {
    pub initial: InitialPosition,
    pub tag_pairs: Vec<TagPair>,
    /// Suppresses stalemate, fivefold repetition, the seventy-five-move rule
    /// and insufficient material. Checkmate still ends the game.
    pub ignore_automatic_draws: bool,
}

impl GameConfig {
    pub fn new() -> GameConfig {
        GameConfig::default()
    }

    pub fn from_fen<S: Into<String>>(fen: S) -> GameConfig {
        GameConfig {
            initial: InitialPosition::Fen(fen.into()),
            ..GameConfig::default()
        }
    }

    pub fn with_tag<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> GameConfig {
        self.tag_pairs.push(TagPair::new(key, value));
        self
    }

    pub fn ignore_automatic_draws(mut self, ignore: bool) -> GameConfig {
        self.ignore_automatic_draws = ignore;
        self
    }
}

/// A game in progress or finished: its metadata, every move played and every
/// position reached.
///
/// `positions()[0]` is the initial position and `positions()[i + 1]` is the
/// position after `moves()[i]`, so there is always exactly one more position
/// than there are moves. Once the outcome is decided the game accepts no more
/// moves.
#[derive(Clone, Debug)]
pub struct Game {
    tag_pairs: Vec<TagPair>,
    moves: Vec<Move>,
    positions: Vec<Position>,
    repetition_counts: HashMap<u64, usize>,
    current_repetitions: usize,
    outcome: Outcome,
    method: Method,
    ignore_automatic_draws: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Game> {
        let initial = match config.initial {
            InitialPosition::Default => Position::from_start_position(),
            InitialPosition::Fen(ref fen) => Position::from_fen(fen)?,
        };

        Ok(Game::from_position(
            initial,
            config.tag_pairs,
            config.ignore_automatic_draws,
        ))
    }

    fn from_position(
        initial: Position,
        tag_pairs: Vec<TagPair>,
        ignore_automatic_draws: bool,
    ) -> Game {
        let mut game = Game {
            tag_pairs,
            moves: vec![],
            positions: vec![],
            repetition_counts: HashMap::new(),
            current_repetitions: 0,
            outcome: Outcome::Undecided,
            method: Method::None,
            ignore_automatic_draws,
        };
        game.push_position(initial);
        game
    }

    fn push_position(&mut self, position: Position) {
        let count = self
            .repetition_counts
            .entry(position.repetition_key())
            .or_insert(0);
        *count += 1;
        self.current_repetitions = *count;

        let (outcome, method) = outcome::detect(
            &position,
            self.current_repetitions,
            self.ignore_automatic_draws,
        );
        self.outcome = outcome;
        self.method = method;
        self.positions.push(position);
    }

    /// Plays `mov`. The move is matched against the legal moves of the current
    /// position by its squares and promotion piece. A failed move leaves the
    /// game untouched.
    pub fn make_move(&mut self, mov: Move) -> Result<()> {
        self.ensure_in_progress()?;
        let current = self.position();
        let legal = current.find_legal(mov).ok_or_else(|| Error::IllegalMove {
            mov: mov.to_string(),
            fen: current.as_fen(),
        })?;

        let next = current.apply(legal)?;
        debug!("ply {}: {}", self.moves.len() + 1, legal);
        self.moves.push(legal);
        self.push_position(next);
        Ok(())
    }

    /// Plays a move written in algebraic notation.
    pub fn play(&mut self, text: &str) -> Result<Move> {
        self.play_with(&AlgebraicNotation, text)
    }

    pub fn play_with(&mut self, notation: &dyn Notation, text: &str) -> Result<Move> {
        self.ensure_in_progress()?;
        let mov = notation.decode(self.position(), text)?;
        self.make_move(mov)?;
        Ok(mov)
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.outcome.is_decided() {
            return Err(Error::GameAlreadyComplete {
                outcome: self.outcome,
            });
        }

        Ok(())
    }

    pub fn legal_moves(&self) -> MoveVec {
        self.position().legal_moves()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// The current position.
    pub fn position(&self) -> &Position {
        &self.positions[self.positions.len() - 1]
    }

    pub fn initial_position(&self) -> &Position {
        &self.positions[0]
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn ignores_automatic_draws(&self) -> bool {
        self.ignore_automatic_draws
    }

    pub fn tag_pairs(&self) -> &[TagPair] {
        &self.tag_pairs
    }

    /// The value of the first tag named `key`.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tag_pairs
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    /// Replaces the first tag named `key`, or appends one.
    pub fn set_tag<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let pair = TagPair::new(key, value);
        match self.tag_pairs.iter_mut().find(|p| p.key == pair.key) {
            Some(existing) => existing.value = pair.value,
            None => self.tag_pairs.push(pair),
        }
    }

    /// `color` resigns; the other side wins.
    pub fn resign(&mut self, color: Color) -> Result<()> {
        self.ensure_in_progress()?;
        self.outcome = Outcome::win_for(color.toggle());
        self.method = Method::Resignation;
        Ok(())
    }

    /// Ends the game in a draw by `method`, which must be one of
    /// `eligible_draws`.
    pub fn draw(&mut self, method: Method) -> Result<()> {
        self.ensure_in_progress()?;
        if !self.eligible_draws().contains(&method) {
            return Err(Error::IneligibleDraw { method });
        }

        self.outcome = Outcome::Draw;
        self.method = method;
        Ok(())
    }

    /// Draws that may be claimed in the current position. Empty once the game
    /// is over.
    pub fn eligible_draws(&self) -> Vec<Method> {
        if self.outcome.is_decided() {
            return vec![];
        }

        outcome::claimable_draws(self.position(), self.current_repetitions)
    }

    /// Records a result decided outside the board, such as a PGN result
    /// token.
    pub(crate) fn set_outcome(&mut self, outcome: Outcome, method: Method) {
        self.outcome = outcome;
        self.method = method;
    }

    /// The outcome and method the rules alone give the current position,
    /// ignoring the configured automatic-draw suppression.
    pub(crate) fn detect_full_outcome(&self) -> (Outcome, Method) {
        outcome::detect(self.position(), self.current_repetitions, false)
    }

    pub fn from_pgn(text: &str) -> Result<Game> {
        pgn::decode(text)
    }

    pub fn to_pgn(&self) -> String {
        pgn::encode(self)
    }

    /// A flat record describing this game, for reports.
    pub fn summary(&self) -> GameSummary {
        let tag = |key: &str| self.tag(key).unwrap_or("?").to_owned();
        GameSummary {
            event: tag("Event"),
            white: tag("White"),
            black: tag("Black"),
            result: self.outcome,
            method: self.method,
            plies: self.moves.len(),
            final_fen: self.position().as_fen(),
        }
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::from_position(Position::from_start_position(), vec![], false)
    }
}

/// Prints the game as PGN.
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_pgn())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub event: String,
    pub white: String,
    pub black: String,
    pub result: Outcome,
    pub method: Method,
    pub plies: usize,
    pub final_fen: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::Square;

    fn play_all(game: &mut Game, moves: &[&str]) {
        for text in moves {
            game.play(text).unwrap();
        }
    }

    #[test]
    fn new_game_starts_at_start_position() {
        let game = Game::new(GameConfig::new()).unwrap();
        assert_eq!(1, game.positions().len());
        assert!(game.moves().is_empty());
        assert_eq!(Outcome::Undecided, game.outcome());
        assert_eq!(20, game.legal_moves().len());
    }

    #[test]
    fn malformed_fen_config() {
        let err = Game::new(GameConfig::from_fen("not a fen")).unwrap_err();
        assert_eq!(ErrorKind::MalformedFen, err.kind());
    }

    #[test]
    fn moves_append_positions() {
        let mut game = Game::default();
        play_all(&mut game, &["e4", "e5", "Nf3"]);
        assert_eq!(3, game.moves().len());
        assert_eq!(4, game.positions().len());
        assert_eq!(
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2",
            game.position().as_fen()
        );
    }

    #[test]
    fn illegal_move_leaves_game_unchanged() {
        let mut game = Game::default();
        let err = game.make_move(Move::quiet(Square::E2, Square::E5)).unwrap_err();
        assert_eq!(ErrorKind::IllegalMove, err.kind());
        assert!(game.moves().is_empty());
        assert_eq!(1, game.positions().len());
    }

    #[test]
    fn fools_mate() {
        let mut game = Game::default();
        play_all(&mut game, &["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(Outcome::BlackWon, game.outcome());
        assert_eq!(Method::Checkmate, game.method());

        let err = game.play("a3").unwrap_err();
        assert_eq!(ErrorKind::GameAlreadyComplete, err.kind());
        let err = game.make_move(Move::quiet(Square::A2, Square::A3)).unwrap_err();
        assert_eq!(ErrorKind::GameAlreadyComplete, err.kind());
        assert_eq!(4, game.moves().len());
        assert_eq!(5, game.positions().len());
    }

    #[test]
    fn stalemate_from_fen() {
        let mut game = Game::new(GameConfig::from_fen("k7/8/2K5/8/8/8/8/1R6 w - - 0 1")).unwrap();
        game.play("Rb7").unwrap();
        assert_eq!(Outcome::Draw, game.outcome());
        assert_eq!(Method::Stalemate, game.method());
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn ignored_automatic_draws() {
        let config = GameConfig::from_fen("k7/8/2K5/8/8/8/8/1R6 w - - 0 1").ignore_automatic_draws(true);
        let mut game = Game::new(config).unwrap();
        game.play("Rb7").unwrap();
        assert_eq!(Outcome::Undecided, game.outcome());
        assert_eq!(Method::None, game.method());
    }

    #[test]
    fn resignation() {
        let mut game = Game::default();
        game.play("e4").unwrap();
        game.resign(Color::White).unwrap();
        assert_eq!(Outcome::BlackWon, game.outcome());
        assert_eq!(Method::Resignation, game.method());
        assert_eq!(ErrorKind::GameAlreadyComplete, game.resign(Color::Black).unwrap_err().kind());
    }

    #[test]
    fn threefold_claim() {
        let mut game = Game::default();
        assert_eq!(vec![Method::DrawOffer], game.eligible_draws());
        assert_eq!(
            ErrorKind::IneligibleDraw,
            game.draw(Method::ThreefoldRepetition).unwrap_err().kind()
        );

        play_all(&mut game, &["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"]);
        assert!(game.eligible_draws().contains(&Method::ThreefoldRepetition));
        game.draw(Method::ThreefoldRepetition).unwrap();
        assert_eq!(Outcome::Draw, game.outcome());
        assert!(game.eligible_draws().is_empty());
    }

    #[test]
    fn fivefold_ends_game() {
        let mut game = Game::default();
        for _ in 0..4 {
            play_all(&mut game, &["Nf3", "Nf6", "Ng1", "Ng8"]);
        }
        assert_eq!(Outcome::Draw, game.outcome());
        assert_eq!(Method::FivefoldRepetition, game.method());
    }

    #[test]
    fn draw_offer_always_allowed() {
        let mut game = Game::default();
        game.draw(Method::DrawOffer).unwrap();
        assert_eq!(Outcome::Draw, game.outcome());
        assert_eq!(Method::DrawOffer, game.method());
    }

    #[test]
    fn tags_keep_order_and_replace_first() {
        let config = GameConfig::new()
            .with_tag("Event", "Casual")
            .with_tag("White", "A")
            .with_tag("Black", "B");
        let mut game = Game::new(config).unwrap();
        game.set_tag("White", "C");
        game.set_tag("Result", "*");
        let keys: Vec<&str> = game.tag_pairs().iter().map(|p| p.key.as_str()).collect();
        assert_eq!(vec!["Event", "White", "Black", "Result"], keys);
        assert_eq!(Some("C"), game.tag("White"));
        assert_eq!(None, game.tag("Site"));
    }

    #[test]
    fn summary_fields() {
        let mut game = Game::new(GameConfig::new().with_tag("White", "Deep Blue")).unwrap();
        play_all(&mut game, &["e4"]);
        let summary = game.summary();
        assert_eq!("Deep Blue", summary.white);
        assert_eq!("?", summary.black);
        assert_eq!(1, summary.plies);
        assert_eq!(Outcome::Undecided, summary.result);
    }
}
