// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Chess game state with FEN and PGN notation.
//!
//! A `Position` is a single board state; a `Game` is the sequence of
//! positions reached by legal moves along with its tag pairs and outcome.
//! Moves are read and written in standard or long algebraic notation, and
//! whole games through the `pgn` module.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate pest_derive;

pub mod attacks;
mod bitboard;
mod error;
mod game;
mod move_generator;
mod moves;
pub mod notation;
pub mod outcome;
mod perft;
pub mod pgn;
mod position;
mod types;
mod zobrist;

pub use bitboard::{Bitboard, BitboardIterator};
pub use error::{Error, ErrorKind, FenParseError, NotationErrorKind, Result};
pub use game::{Game, GameConfig, GameSummary, InitialPosition, TagPair};
pub use move_generator::{MoveGenerator, MoveVec};
pub use moves::Move;
pub use notation::{AlgebraicNotation, LongAlgebraicNotation, Notation};
pub use outcome::{Method, Outcome};
pub use perft::{divide, perft};
pub use pgn::{Batch, LogProgress, NullProgress, PartialBatch, PgnReader, ProgressSink};
pub use position::{Position, START_FEN};
pub use types::{Color, File, Piece, PieceKind, Rank, Square};
