// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Zobrist hashing of positions. Positions keep their hash up to date as
//! moves are applied; `hash` computes one from scratch.
use crate::position::Position;
use crate::types::{CastleStatus, Color, Piece, Square, TableIndex};

struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const fn new(seed: u64) -> Xorshift64 {
        Xorshift64 { state: seed }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        self.state
    }
}

// Table layout: 12 piece entries per square (white pawn..king, then black
// pawn..king), one side-to-move entry, four castling entries, eight
// en-passant file entries.
const SIDE_TO_MOVE_INDEX: usize = 768;
const CASTLING_RIGHTS_INDEX: usize = 769;
const EN_PASSANT_INDEX: usize = 773;
const TABLE_SIZE: usize = 781;

const CASTLE_ORDER: [CastleStatus; 4] = [
    CastleStatus::WHITE_KINGSIDE,
    CastleStatus::WHITE_QUEENSIDE,
    CastleStatus::BLACK_KINGSIDE,
    CastleStatus::BLACK_QUEENSIDE,
];

struct ZobristKeys {
    keys: [u64; TABLE_SIZE],
}

impl ZobristKeys {
    fn new(seed: u64) -> ZobristKeys {
        let mut rng = Xorshift64::new(seed);
        let mut keys = [0; TABLE_SIZE];
        for entry in keys.iter_mut() {
            *entry = rng.next();
        }

        ZobristKeys { keys }
    }

    fn piece(&self, piece: Piece, square: Square) -> u64 {
        let color_offset = match piece.color {
            Color::White => 0,
            Color::Black => 6,
        };
        self.keys[12 * square.as_index() + color_offset + piece.kind.as_index()]
    }

    fn black_to_move(&self) -> u64 {
        self.keys[SIDE_TO_MOVE_INDEX]
    }

    fn en_passant(&self, square: Square) -> u64 {
        self.keys[EN_PASSANT_INDEX + square.file().as_index()]
    }

    fn castle(&self, status: CastleStatus) -> u64 {
        CASTLE_ORDER
            .iter()
            .enumerate()
            .filter(|(_, &right)| status.contains(right))
            .fold(0, |acc, (i, _)| acc ^ self.keys[CASTLING_RIGHTS_INDEX + i])
    }
}

const ZOBRIST_SEED: u64 = 0xf68e_34a4_e8cc_f09a;

lazy_static! {
    static ref KEYS: ZobristKeys = ZobristKeys::new(ZOBRIST_SEED);
}

pub fn hash(pos: &Position) -> u64 {
    let mut running = pos
        .occupied_squares()
        .fold(0, |acc, (sq, piece)| acc ^ KEYS.piece(piece, sq));

    if pos.side_to_move() == Color::Black {
        running ^= KEYS.black_to_move();
    }

    let mut castle = CastleStatus::NONE;
    for &right in CASTLE_ORDER.iter() {
        let allowed = match right {
            CastleStatus::WHITE_KINGSIDE => pos.can_castle_kingside(Color::White),
            CastleStatus::WHITE_QUEENSIDE => pos.can_castle_queenside(Color::White),
            CastleStatus::BLACK_KINGSIDE => pos.can_castle_kingside(Color::Black),
            _ => pos.can_castle_queenside(Color::Black),
        };
        if allowed {
            castle |= right;
        }
    }
    running ^= KEYS.castle(castle);

    if let Some(ep_square) = pos.en_passant_square() {
        running ^= KEYS.en_passant(ep_square);
    }

    running
}

pub fn modify_piece(hash: &mut u64, square: Square, piece: Piece) {
    *hash ^= KEYS.piece(piece, square);
}

pub fn modify_side_to_move(hash: &mut u64) {
    *hash ^= KEYS.black_to_move();
}

/// Moves the castling component of `hash` from `old` rights to `new` rights.
pub fn modify_castle_status(hash: &mut u64, old: CastleStatus, new: CastleStatus) {
    *hash ^= KEYS.castle(old ^ new);
}

pub fn modify_en_passant(hash: &mut u64, old: Option<Square>, new: Option<Square>) {
    if let Some(sq) = old {
        *hash ^= KEYS.en_passant(sq);
    }
    if let Some(sq) = new {
        *hash ^= KEYS.en_passant(sq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn placement_matters() {
        let a = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let b = Position::from_fen("4k3/8/8/8/8/8/8/3K4 w - - 0 1").unwrap();
        assert_ne!(hash(&a), hash(&b));
    }

    #[test]
    fn castle_rights_are_distinct() {
        let fens = [
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
            "r3k2r/8/8/8/8/8/8/R3K2R w KQk - 0 1",
            "r3k2r/8/8/8/8/8/8/R3K2R w KQq - 0 1",
            "r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1",
        ];
        let hashes: Vec<u64> = fens
            .iter()
            .map(|fen| hash(&Position::from_fen(fen).unwrap()))
            .collect();
        for i in 0..hashes.len() {
            for j in (i + 1)..hashes.len() {
                assert_ne!(hashes[i], hashes[j], "{} vs {}", fens[i], fens[j]);
            }
        }
    }

    #[test]
    fn incremental_castle_update() {
        let full = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let partial = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        let mut h = hash(&full);
        modify_castle_status(
            &mut h,
            CastleStatus::WHITE | CastleStatus::BLACK,
            CastleStatus::WHITE_KINGSIDE | CastleStatus::BLACK_QUEENSIDE,
        );
        assert_eq!(hash(&partial), h);
    }
}
