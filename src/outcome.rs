// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Game termination: who won, and why.
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::position::Position;
use crate::types::Color;

/// The result of a game, written the way PGN writes it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "*")]
    Undecided,
    #[serde(rename = "1-0")]
    WhiteWon,
    #[serde(rename = "0-1")]
    BlackWon,
    #[serde(rename = "1/2-1/2")]
    Draw,
}

impl Outcome {
    pub fn win_for(color: Color) -> Outcome {
        match color {
            Color::White => Outcome::WhiteWon,
            Color::Black => Outcome::BlackWon,
        }
    }

    pub fn is_decided(self) -> bool {
        self != Outcome::Undecided
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Undecided => "*",
            Outcome::WhiteWon => "1-0",
            Outcome::BlackWon => "0-1",
            Outcome::Draw => "1/2-1/2",
        }
    }
}

impl Default for Outcome {
    fn default() -> Outcome {
        Outcome::Undecided
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Outcome, Error> {
        match s {
            "*" => Ok(Outcome::Undecided),
            "1-0" => Ok(Outcome::WhiteWon),
            "0-1" => Ok(Outcome::BlackWon),
            "1/2-1/2" => Ok(Outcome::Draw),
            _ => Err(Error::PgnStructure(format!("unknown game result `{}`", s))),
        }
    }
}

/// How a game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    None,
    Checkmate,
    Resignation,
    DrawOffer,
    Stalemate,
    ThreefoldRepetition,
    FivefoldRepetition,
    FiftyMoveRule,
    SeventyFiveMoveRule,
    InsufficientMaterial,
}

impl Default for Method {
    fn default() -> Method {
        Method::None
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Method::None => "none",
            Method::Checkmate => "checkmate",
            Method::Resignation => "resignation",
            Method::DrawOffer => "draw offer",
            Method::Stalemate => "stalemate",
            Method::ThreefoldRepetition => "threefold repetition",
            Method::FivefoldRepetition => "fivefold repetition",
            Method::FiftyMoveRule => "fifty-move rule",
            Method::SeventyFiveMoveRule => "seventy-five-move rule",
            Method::InsufficientMaterial => "insufficient material",
        };
        f.write_str(text)
    }
}

/// Halfmove clock at which a draw may be claimed.
pub const FIFTY_MOVE_CLOCK: u32 = 100;

/// Halfmove clock at which the game is drawn without a claim.
pub const SEVENTY_FIVE_MOVE_CLOCK: u32 = 150;

/// Classifies `position`, the current position of a game in which it has
/// occurred `repetitions` times (counting itself).
///
/// Checkmate is always detected. Stalemate, fivefold repetition, the
/// seventy-five-move rule and insufficient material are only detected when
/// `ignore_automatic_draws` is false.
pub fn detect(
    position: &Position,
    repetitions: usize,
    ignore_automatic_draws: bool,
) -> (Outcome, Method) {
    let side = position.side_to_move();
    if position.legal_moves().is_empty() {
        if position.is_check(side) {
            return (Outcome::win_for(side.toggle()), Method::Checkmate);
        }

        if !ignore_automatic_draws {
            return (Outcome::Draw, Method::Stalemate);
        }
    }

    if ignore_automatic_draws {
        return (Outcome::Undecided, Method::None);
    }

    if repetitions >= 5 {
        (Outcome::Draw, Method::FivefoldRepetition)
    } else if position.halfmove_clock() >= SEVENTY_FIVE_MOVE_CLOCK {
        (Outcome::Draw, Method::SeventyFiveMoveRule)
    } else if position.has_insufficient_material() {
        (Outcome::Draw, Method::InsufficientMaterial)
    } else {
        (Outcome::Undecided, Method::None)
    }
}

/// Draws the side to move could claim right now.
pub fn claimable_draws(position: &Position, repetitions: usize) -> Vec<Method> {
    let mut methods = vec![Method::DrawOffer];
    if repetitions >= 3 {
        methods.push(Method::ThreefoldRepetition);
    }
    if position.halfmove_clock() >= FIFTY_MOVE_CLOCK {
        methods.push(Method::FiftyMoveRule);
    }

    methods
}
