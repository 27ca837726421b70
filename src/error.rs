// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io;

use thiserror::Error;

use crate::outcome::{Method, Outcome};

pub type Result<T> = std::result::Result<T, Error>;

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum FenParseError {
    #[error("expected 6 space-separated fields, found {0}")]
    FieldCount(usize),
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("invalid empty-square digit `{0}`")]
    InvalidDigit(char),
    #[error("rank {0} does not sum to 8 files")]
    FileDoesNotSumToEight(usize),
    #[error("unknown piece `{0}`")]
    UnknownPiece(char),
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castling rights")]
    InvalidCastle,
    #[error("invalid en-passant square")]
    InvalidEnPassant,
    #[error("invalid halfmove clock")]
    InvalidHalfmove,
    #[error("invalid fullmove number")]
    InvalidFullmove,
}

/// Why a piece of move text could not be turned into a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum NotationErrorKind {
    #[error("not a recognized move token")]
    Unrecognized,
    #[error("matches more than one legal move")]
    Ambiguous,
}

/// The broad category of an `Error`, with any positional context removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedFen,
    Notation,
    IllegalMove,
    GameAlreadyComplete,
    IneligibleDraw,
    PgnStructure,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed FEN `{fen}`: {reason}")]
    MalformedFen { fen: String, reason: FenParseError },

    #[error("bad move notation `{text}`: {reason}")]
    Notation {
        text: String,
        reason: NotationErrorKind,
    },

    #[error("illegal move `{mov}` in position `{fen}`")]
    IllegalMove { mov: String, fen: String },

    #[error("game is already complete ({outcome})")]
    GameAlreadyComplete { outcome: Outcome },

    #[error("cannot claim a draw by {method} here")]
    IneligibleDraw { method: Method },

    #[error("malformed PGN: {0}")]
    PgnStructure(String),

    #[error("ply {ply} (`{token}`): {source}")]
    AtPly {
        ply: usize,
        token: String,
        #[source]
        source: Box<Error>,
    },

    #[error("game {index}: {source}")]
    InGame {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedFen { .. } => ErrorKind::MalformedFen,
            Error::Notation { .. } => ErrorKind::Notation,
            Error::IllegalMove { .. } => ErrorKind::IllegalMove,
            Error::GameAlreadyComplete { .. } => ErrorKind::GameAlreadyComplete,
            Error::IneligibleDraw { .. } => ErrorKind::IneligibleDraw,
            Error::PgnStructure(_) => ErrorKind::PgnStructure,
            Error::Io(_) => ErrorKind::Io,
            Error::AtPly { source, .. } | Error::InGame { source, .. } => source.kind(),
        }
    }

    /// The 1-based ply at which a game replay failed, if known.
    pub fn ply(&self) -> Option<usize> {
        match self {
            Error::AtPly { ply, .. } => Some(*ply),
            Error::InGame { source, .. } => source.ply(),
            _ => None,
        }
    }

    /// The 0-based index of the failing game within a batch, if known.
    pub fn game_index(&self) -> Option<usize> {
        match self {
            Error::InGame { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub(crate) fn notation<S: Into<String>>(text: S, reason: NotationErrorKind) -> Error {
        Error::Notation {
            text: text.into(),
            reason,
        }
    }

    pub(crate) fn at_ply<S: Into<String>>(self, ply: usize, token: S) -> Error {
        Error::AtPly {
            ply,
            token: token.into(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_game(self, index: usize) -> Error {
        Error::InGame {
            index,
            source: Box::new(self),
        }
    }
}
