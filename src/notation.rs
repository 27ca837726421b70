// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move text codecs. A `Notation` turns a move into text relative to the
//! position it is played in, and turns text back into one of that position's
//! legal moves.
//!
//! Two notations are provided: `AlgebraicNotation` (SAN, `Nbd7`, `exd5`,
//! `e8=Q+`) and `LongAlgebraicNotation` (`Ng1f3`, `e2e4`, `Rd1xd8+`). Both
//! decoders share one pest grammar; decoding is always checked against the
//! position's legal moves, never against the text alone.
use std::convert::TryFrom;
use std::fmt::Write;

use pest::iterators::Pair;
use pest::Parser;

use crate::error::{Error, NotationErrorKind, Result};
use crate::moves::Move;
use crate::position::Position;
use crate::types::{File, PieceKind, Rank, Square};

#[derive(Parser)]
#[grammar = "notation.pest"]
struct MoveTextParser;

pub trait Notation: Send + Sync {
    /// Writes `mov`, which must be legal in `pos`, as text.
    fn encode(&self, pos: &Position, mov: Move) -> String;

    /// Finds the legal move in `pos` described by `text`.
    fn decode(&self, pos: &Position, text: &str) -> Result<Move>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AlgebraicNotation;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LongAlgebraicNotation;

impl Notation for AlgebraicNotation {
    fn encode(&self, pos: &Position, mov: Move) -> String {
        if let Some(castle) = castle_text(mov) {
            return with_suffix(pos, mov, castle.to_owned());
        }

        let kind = moving_kind(pos, mov);
        let mut buf = String::new();
        if kind == PieceKind::Pawn {
            if mov.is_capture() {
                write!(&mut buf, "{}", mov.source().file()).unwrap();
            }
        } else {
            buf.push(kind.as_san_char());
            buf.push_str(&disambiguator(pos, mov, kind));
        }

        if mov.is_capture() {
            buf.push('x');
        }

        write!(&mut buf, "{}", mov.destination()).unwrap();
        if let Some(promoted) = mov.promotion_piece() {
            buf.push('=');
            buf.push(promoted.as_san_char());
        }

        with_suffix(pos, mov, buf)
    }

    fn decode(&self, pos: &Position, text: &str) -> Result<Move> {
        let description = parse_move_text(Rule::san, text)?;
        description.find_in(pos, text)
    }
}

impl Notation for LongAlgebraicNotation {
    fn encode(&self, pos: &Position, mov: Move) -> String {
        if let Some(castle) = castle_text(mov) {
            return with_suffix(pos, mov, castle.to_owned());
        }

        let kind = moving_kind(pos, mov);
        let mut buf = String::new();
        if kind != PieceKind::Pawn {
            buf.push(kind.as_san_char());
        }

        write!(&mut buf, "{}", mov.source()).unwrap();
        if mov.is_capture() {
            buf.push('x');
        }

        write!(&mut buf, "{}", mov.destination()).unwrap();
        if let Some(promoted) = mov.promotion_piece() {
            write!(&mut buf, "{}", promoted).unwrap();
        }

        with_suffix(pos, mov, buf)
    }

    fn decode(&self, pos: &Position, text: &str) -> Result<Move> {
        let description = parse_move_text(Rule::lan, text)?;
        description.find_in(pos, text)
    }
}

fn castle_text(mov: Move) -> Option<&'static str> {
    if mov.is_kingside_castle() {
        Some("O-O")
    } else if mov.is_queenside_castle() {
        Some("O-O-O")
    } else {
        None
    }
}

fn moving_kind(pos: &Position, mov: Move) -> PieceKind {
    pos.piece_at(mov.source())
        .map(|piece| piece.kind)
        .unwrap_or(PieceKind::Pawn)
}

/// The shortest source hint that singles `mov` out among the legal moves of
/// the same piece kind to the same square: file, then rank, then both.
fn disambiguator(pos: &Position, mov: Move, kind: PieceKind) -> String {
    let rivals: Vec<Square> = pos
        .legal_moves()
        .iter()
        .filter(|other| {
            other.destination() == mov.destination()
                && other.source() != mov.source()
                && moving_kind(pos, **other) == kind
        })
        .map(|other| other.source())
        .collect();

    let source = mov.source();
    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != source.file()) {
        source.file().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != source.rank()) {
        source.rank().to_string()
    } else {
        source.to_string()
    }
}

fn with_suffix(pos: &Position, mov: Move, mut text: String) -> String {
    if let Ok(after) = pos.apply(mov) {
        if after.is_checkmate() {
            text.push('#');
        } else if after.is_check(after.side_to_move()) {
            text.push('+');
        }
    }

    text
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CastleSide {
    Kingside,
    Queenside,
}

/// What a move token says about the move it names. Anything left as `None`
/// is unconstrained.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct MoveDescription {
    castle: Option<CastleSide>,
    kind: Option<PieceKind>,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Option<Square>,
    promotion: Option<PieceKind>,
}

impl MoveDescription {
    fn matches(&self, pos: &Position, mov: Move) -> bool {
        match self.castle {
            Some(CastleSide::Kingside) => return mov.is_kingside_castle(),
            Some(CastleSide::Queenside) => return mov.is_queenside_castle(),
            None => {}
        }

        self.kind.map_or(true, |k| k == moving_kind(pos, mov))
            && self.to == Some(mov.destination())
            && self.from_file.map_or(true, |f| f == mov.source().file())
            && self.from_rank.map_or(true, |r| r == mov.source().rank())
            && self
                .promotion
                .map_or(true, |p| mov.promotion_piece() == Some(p))
    }

    fn find_in(&self, pos: &Position, text: &str) -> Result<Move> {
        let mut candidates: Vec<Move> = pos
            .legal_moves()
            .into_iter()
            .filter(|&mov| self.matches(pos, mov))
            .collect();

        // A promotion written without its piece promotes to a queen.
        if self.promotion.is_none()
            && !candidates.is_empty()
            && candidates.iter().all(|mov| mov.is_promotion())
        {
            candidates.retain(|mov| mov.promotion_piece() == Some(PieceKind::Queen));
        }

        match candidates.as_slice() {
            [mov] => Ok(*mov),
            [] => Err(Error::IllegalMove {
                mov: text.to_owned(),
                fen: pos.as_fen(),
            }),
            _ => Err(Error::notation(text, NotationErrorKind::Ambiguous)),
        }
    }
}

pub(crate) fn is_castle_token(text: &str) -> bool {
    text.starts_with("O-O") || text.starts_with("0-0")
}

fn parse_move_text(rule: Rule, text: &str) -> Result<MoveDescription> {
    let unrecognized = || Error::notation(text, NotationErrorKind::Unrecognized);
    let mut pairs = MoveTextParser::parse(rule, text).map_err(|_| unrecognized())?;
    let token = pairs.next().ok_or_else(unrecognized)?;

    let mut description = MoveDescription::default();
    for part in token.into_inner() {
        match part.as_rule() {
            Rule::castle_short => description.castle = Some(CastleSide::Kingside),
            Rule::castle_long => description.castle = Some(CastleSide::Queenside),
            Rule::piece => {
                description.kind = Some(piece_kind(&part).ok_or_else(unrecognized)?);
            }
            Rule::from_square => {
                let square = square_of(part).ok_or_else(unrecognized)?;
                description.from_file = Some(square.file());
                description.from_rank = Some(square.rank());
            }
            Rule::from_file => {
                let file = single_char(&part).and_then(|c| File::try_from(c).ok());
                description.from_file = Some(file.ok_or_else(unrecognized)?);
            }
            Rule::from_rank => {
                let rank = single_char(&part).and_then(|c| Rank::try_from(c).ok());
                description.from_rank = Some(rank.ok_or_else(unrecognized)?);
            }
            Rule::square => description.to = Some(square_of(part).ok_or_else(unrecognized)?),
            Rule::promotion => {
                let letter = part.as_str().trim_start_matches('=');
                let kind = letter.chars().next().and_then(PieceKind::from_char);
                description.promotion = Some(kind.ok_or_else(unrecognized)?);
            }
            // Captures, checks, annotations and `e.p.` are advisory; the
            // legal move list decides what the move actually does.
            _ => {}
        }
    }

    // SAN leaves the letter off pawn moves; long algebraic may leave it off
    // any move and name the piece by its square alone.
    if rule == Rule::san && description.castle.is_none() && description.kind.is_none() {
        description.kind = Some(PieceKind::Pawn);
    }

    Ok(description)
}

fn piece_kind(pair: &Pair<Rule>) -> Option<PieceKind> {
    single_char(pair).and_then(PieceKind::from_char)
}

fn single_char(pair: &Pair<Rule>) -> Option<char> {
    pair.as_str().chars().next()
}

fn square_of(pair: Pair<Rule>) -> Option<Square> {
    pair.as_str().parse().ok()
}
