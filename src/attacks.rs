// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Precomputed attack tables. Leaper attacks (king, knight, pawn) are looked
//! up directly; slider attacks are derived from ray tables by cutting each
//! ray at its first blocker.
use crate::bitboard::Bitboard;
use crate::bitboard::{
    BB_FILE_A, BB_FILE_AB, BB_FILE_GH, BB_FILE_H, BB_RANK_1, BB_RANK_12, BB_RANK_78, BB_RANK_8,
};
use crate::types::{Color, Direction, Square, TableIndex, COLORS};

/// A leaper step: the offset to add to a square index, and the set of
/// squares from which taking the step would wrap around an edge.
type Step = (i32, Bitboard);

const KING_STEPS: [Step; 8] = [
    (8, BB_RANK_8),
    (-8, BB_RANK_1),
    (1, BB_FILE_H),
    (-1, BB_FILE_A),
    (9, BB_RANK_8.or(BB_FILE_H)),
    (7, BB_RANK_8.or(BB_FILE_A)),
    (-7, BB_RANK_1.or(BB_FILE_H)),
    (-9, BB_RANK_1.or(BB_FILE_A)),
];

const KNIGHT_STEPS: [Step; 8] = [
    (17, BB_RANK_78.or(BB_FILE_H)),
    (15, BB_RANK_78.or(BB_FILE_A)),
    (10, BB_RANK_8.or(BB_FILE_GH)),
    (6, BB_RANK_8.or(BB_FILE_AB)),
    (-6, BB_RANK_1.or(BB_FILE_GH)),
    (-10, BB_RANK_1.or(BB_FILE_AB)),
    (-15, BB_RANK_12.or(BB_FILE_H)),
    (-17, BB_RANK_12.or(BB_FILE_A)),
];

fn leaper_table(steps: &[Step]) -> [Bitboard; 64] {
    let mut table = [Bitboard::none(); 64];
    for sq in Square::all() {
        let mut board = Bitboard::none();
        for &(offset, edge) in steps {
            if !edge.test(sq) {
                board.set(sq.plus(offset));
            }
        }

        table[sq.as_index()] = board;
    }

    table
}

fn pawn_table() -> [[Bitboard; 2]; 64] {
    let mut table = [[Bitboard::none(); 2]; 64];
    for &color in COLORS.iter() {
        // Pawns never stand on their own promotion rank, so leave those empty.
        let steps: [Step; 2] = match color {
            Color::White => [(7, BB_RANK_8.or(BB_FILE_A)), (9, BB_RANK_8.or(BB_FILE_H))],
            Color::Black => [(-9, BB_RANK_1.or(BB_FILE_A)), (-7, BB_RANK_1.or(BB_FILE_H))],
        };

        let per_square = leaper_table(&steps);
        for sq in Square::all() {
            table[sq.as_index()][color.as_index()] = per_square[sq.as_index()];
        }
    }

    table
}

/// Rays from every square in every direction, excluding the origin. Index 64
/// is an always-empty sentinel used when a ray has no blocker.
fn ray_table() -> [[Bitboard; 8]; 65] {
    let edges = [
        (Direction::North, BB_RANK_8),
        (Direction::NorthEast, BB_RANK_8.or(BB_FILE_H)),
        (Direction::East, BB_FILE_H),
        (Direction::SouthEast, BB_RANK_1.or(BB_FILE_H)),
        (Direction::South, BB_RANK_1),
        (Direction::SouthWest, BB_RANK_1.or(BB_FILE_A)),
        (Direction::West, BB_FILE_A),
        (Direction::NorthWest, BB_RANK_8.or(BB_FILE_A)),
    ];

    let mut table = [[Bitboard::none(); 8]; 65];
    for sq in Square::all() {
        for &(dir, edge) in edges.iter() {
            let mut ray = Bitboard::none();
            let mut cursor = sq;
            while !edge.test(cursor) {
                cursor = cursor.towards(dir);
                ray.set(cursor);
            }

            table[sq.as_index()][dir.as_index()] = ray;
        }
    }

    table
}

lazy_static! {
    static ref KING_TABLE: [Bitboard; 64] = leaper_table(&KING_STEPS);
    static ref KNIGHT_TABLE: [Bitboard; 64] = leaper_table(&KNIGHT_STEPS);
    static ref PAWN_TABLE: [[Bitboard; 2]; 64] = pawn_table();
    static ref RAY_TABLE: [[Bitboard; 8]; 65] = ray_table();
}

fn positive_ray_attacks(sq: Square, occupancy: Bitboard, dir: Direction) -> Bitboard {
    debug_assert!(dir.as_vector() > 0);
    let ray = RAY_TABLE[sq.as_index()][dir.as_index()];
    let blocker = ray.and(occupancy).bits();
    let blocking_square = blocker.trailing_zeros() as usize;
    ray.xor(RAY_TABLE[blocking_square][dir.as_index()])
}

fn negative_ray_attacks(sq: Square, occupancy: Bitboard, dir: Direction) -> Bitboard {
    debug_assert!(dir.as_vector() < 0);
    let ray = RAY_TABLE[sq.as_index()][dir.as_index()];
    let blocker = ray.and(occupancy).bits();
    let blocking_square = (64 - blocker.leading_zeros()).checked_sub(1).unwrap_or(64) as usize;
    ray.xor(RAY_TABLE[blocking_square][dir.as_index()])
}

pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_TABLE[sq.as_index()][color.as_index()]
}

pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_TABLE[sq.as_index()]
}

pub fn king_attacks(sq: Square) -> Bitboard {
    KING_TABLE[sq.as_index()]
}

pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    positive_ray_attacks(sq, occupancy, Direction::NorthWest)
        | negative_ray_attacks(sq, occupancy, Direction::SouthEast)
        | positive_ray_attacks(sq, occupancy, Direction::NorthEast)
        | negative_ray_attacks(sq, occupancy, Direction::SouthWest)
}

pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    positive_ray_attacks(sq, occupancy, Direction::North)
        | negative_ray_attacks(sq, occupancy, Direction::South)
        | positive_ray_attacks(sq, occupancy, Direction::East)
        | negative_ray_attacks(sq, occupancy, Direction::West)
}

pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}
