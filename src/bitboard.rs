// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Definitions of the `Bitboard` type, which is conceptually a set of
//! squares on the chess board. Positions store one bitboard per piece and
//! per color; attack tables and check detection are expressed as bitboard
//! intersections.
use num_traits::FromPrimitive;
use std::fmt;
use std::ops;

use crate::types::{File, Rank, Square};

const RANK_MASKS: [u64; 8] = [
    0x0000_0000_0000_00FF,
    0x0000_0000_0000_FF00,
    0x0000_0000_00FF_0000,
    0x0000_0000_FF00_0000,
    0x0000_00FF_0000_0000,
    0x0000_FF00_0000_0000,
    0x00FF_0000_0000_0000,
    0xFF00_0000_0000_0000,
];

const FILE_MASKS: [u64; 8] = [
    0x0101_0101_0101_0101,
    0x0202_0202_0202_0202,
    0x0404_0404_0404_0404,
    0x0808_0808_0808_0808,
    0x1010_1010_1010_1010,
    0x2020_2020_2020_2020,
    0x4040_4040_4040_4040,
    0x8080_8080_8080_8080,
];

/// A set of squares, one bit per square. A1 is the least significant bit.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs a bitboard from raw bits, bit `n` standing for square `n`.
    pub const fn from_bits(bits: u64) -> Bitboard {
        Bitboard { bits }
    }

    /// The bitboard with every square set, the full board.
    pub const fn all() -> Bitboard {
        Bitboard::from_bits(0xFFFF_FFFF_FFFF_FFFF)
    }

    /// The bitboard with no squares set, the empty set.
    pub const fn none() -> Bitboard {
        Bitboard::from_bits(0)
    }

    /// Tests whether or not a square is a member of this bitboard.
    pub const fn test(self, square: Square) -> bool {
        (self.bits & (1u64 << (square as u8))) != 0
    }

    /// Adds a square to this bitboard.
    pub fn set(&mut self, square: Square) {
        self.bits |= 1u64 << (square as u8);
    }

    /// Removes a square from this bitboard. Removing an absent square does
    /// nothing.
    pub fn unset(&mut self, square: Square) {
        self.bits &= !(1u64 << square as u8);
    }

    /// Takes the bitwise and of two bitboards producing the set intersection
    /// of their contents.
    pub const fn and(self, other: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits & other.bits)
    }

    /// Takes the bitwise or of two bitboards producing the set union of
    /// their contents.
    pub const fn or(self, other: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits | other.bits)
    }

    /// Takes the bitwise exclusive or of two bitboards, the squares in exactly
    /// one of them.
    pub const fn xor(self, other: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits ^ other.bits)
    }

    /// Produces an iterator over the squares in this bitboard, from A1
    /// towards H8.
    pub fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }

    /// Produces a bitboard with the components of this bitboard that
    /// lie on the given rank.
    pub const fn rank(self, rank: Rank) -> Bitboard {
        self.and(Bitboard::from_bits(RANK_MASKS[rank as usize]))
    }

    /// Produces a bitboard with the components of this bitboard that
    /// lie on the given file.
    pub const fn file(self, file: File) -> Bitboard {
        self.and(Bitboard::from_bits(FILE_MASKS[file as usize]))
    }

    /// Retrieves the raw bits of this bitboard.
    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// The number of squares in this bitboard.
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// Whether this bitboard contains no squares.
    pub const fn empty(self) -> bool {
        self.bits == 0
    }

    /// The lowest square in this bitboard, if any.
    pub fn first(self) -> Option<Square> {
        self.into_iter().next()
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Bitboard")
            .field(&format_args!("{:#018x}", self.bits))
            .finish()
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Bitboard;

    fn bitand(self, rhs: Bitboard) -> Bitboard {
        self.and(rhs)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Bitboard) {
        *self = self.and(rhs);
    }
}

impl ops::BitOr for Bitboard {
    type Output = Bitboard;

    fn bitor(self, rhs: Bitboard) -> Bitboard {
        self.or(rhs)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Bitboard) {
        *self = self.or(rhs);
    }
}

impl ops::Not for Bitboard {
    type Output = Bitboard;

    fn not(self) -> Bitboard {
        Bitboard::from_bits(!self.bits)
    }
}

/// Iterator over the squares set in a bitboard, lowest square first.
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.bits == 0 {
            return None;
        }

        let next = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Some(FromPrimitive::from_u32(next).unwrap())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIterator;

    fn into_iter(self) -> BitboardIterator {
        self.iter()
    }
}

pub const BB_RANK_1: Bitboard = Bitboard::from_bits(RANK_MASKS[0]);
pub const BB_RANK_2: Bitboard = Bitboard::from_bits(RANK_MASKS[1]);
pub const BB_RANK_7: Bitboard = Bitboard::from_bits(RANK_MASKS[6]);
pub const BB_RANK_8: Bitboard = Bitboard::from_bits(RANK_MASKS[7]);

pub const BB_FILE_A: Bitboard = Bitboard::from_bits(FILE_MASKS[0]);
pub const BB_FILE_B: Bitboard = Bitboard::from_bits(FILE_MASKS[1]);
pub const BB_FILE_G: Bitboard = Bitboard::from_bits(FILE_MASKS[6]);
pub const BB_FILE_H: Bitboard = Bitboard::from_bits(FILE_MASKS[7]);

pub const BB_FILE_AB: Bitboard = BB_FILE_A.or(BB_FILE_B);
pub const BB_FILE_GH: Bitboard = BB_FILE_G.or(BB_FILE_H);

pub const BB_RANK_12: Bitboard = BB_RANK_1.or(BB_RANK_2);
pub const BB_RANK_78: Bitboard = BB_RANK_7.or(BB_RANK_8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test() {
        let mut board = Bitboard::default();
        assert!(!board.test(Square::A1));

        board.set(Square::A1);
        assert!(board.test(Square::A1));
    }

    #[test]
    fn union_and_intersection() {
        let mut one = Bitboard::none();
        let mut two = Bitboard::none();
        one.set(Square::A2);
        one.set(Square::B2);
        two.set(Square::A2);
        two.set(Square::C2);

        let both = one & two;
        assert!(both.test(Square::A2));
        assert!(!both.test(Square::B2));

        let either = one | two;
        assert_eq!(3, either.count());
    }

    #[test]
    fn enumerating() {
        let mut one = Bitboard::default();
        one.set(Square::B2);
        one.set(Square::A2);

        let squares: Vec<_> = one.iter().collect();
        assert_eq!(vec![Square::A2, Square::B2], squares);
        assert!(Bitboard::none().first().is_none());
    }

    #[test]
    fn rank_and_file() {
        let mut board = Bitboard::none();
        board.set(Square::E8);
        board.set(Square::E7);
        board.set(Square::A7);

        assert_eq!(vec![Square::E8], board.rank(Rank::Eight).iter().collect::<Vec<_>>());
        assert_eq!(2, board.file(File::E).count());
        assert_eq!(Bitboard::none(), board.file(File::H));
    }

    #[test]
    fn exclusive_or_and_first() {
        let mut one = Bitboard::none();
        let mut two = Bitboard::none();
        one.set(Square::C3);
        one.set(Square::D4);
        two.set(Square::D4);
        two.set(Square::F6);

        let either = one.xor(two);
        assert_eq!(vec![Square::C3, Square::F6], either.iter().collect::<Vec<_>>());
        assert_eq!(Some(Square::C3), either.first());
        assert_eq!(64, Bitboard::all().count());
        assert_eq!(two, Bitboard::from_bits(two.bits()));
        assert!(one.and(two).test(Square::D4));
    }

    #[test]
    fn unset() {
        let mut board = Bitboard::none();
        board.set(Square::H2);
        board.unset(Square::H2);
        assert!(board.empty());
    }
}
