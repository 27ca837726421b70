// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `moves` module contains the definition of a `Move` and specifies how
//! it is encoded.
//!
//! ## Encoding
//! A move packs into 16 bits:
//!  * 6 bits - source square
//!  * 6 bits - destination square
//!  * 1 bit  - promotion bit
//!  * 1 bit  - capture bit
//!  * 2 bits - "special" bits
//!
//! The special bits are overloaded, since chess has a number of moves that do
//! not fit nicely into a compact representation:
//!
//! | Promo | Capt  | Spc 0 | Spc 1 | Move                   |
//! |-------|-------|-------|-------|------------------------|
//! | 0     | 0     | 0     | 0     | Quiet                  |
//! | 0     | 0     | 0     | 1     | Double Pawn            |
//! | 0     | 0     | 1     | 0     | King Castle            |
//! | 0     | 0     | 1     | 1     | Queen Castle           |
//! | 0     | 1     | 0     | 0     | Capture                |
//! | 0     | 1     | 0     | 1     | En Passant Capture     |
//! | 1     | 0     | x     | x     | Promotion (xx = piece) |
//! | 1     | 1     | x     | x     | Promotion Capture      |
use num_traits::FromPrimitive;
use std::fmt;

use crate::types::{PieceKind, Square};

const SOURCE_MASK: u16 = 0xFC00;
const DESTINATION_MASK: u16 = 0x03F0;
const PROMO_BIT: u16 = 0x0008;
const CAPTURE_BIT: u16 = 0x0004;
const SPECIAL_0_BIT: u16 = 0x0002;
const SPECIAL_1_BIT: u16 = 0x0001;
const ATTR_MASK: u16 = 0x000F;

/// What kind of special move, if any, a `Move` is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveTag {
    Capture,
    EnPassant,
    KingsideCastle,
    QueensideCastle,
}

/// A single move from one square to another. Moves are only meaningful
/// relative to the position that produced them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    pub fn quiet(source: Square, dest: Square) -> Move {
        let source_bits = (source as u16) << 10;
        let dest_bits = (dest as u16) << 4;
        Move(source_bits | dest_bits)
    }

    pub fn capture(source: Square, dest: Square) -> Move {
        Move(Move::quiet(source, dest).0 | CAPTURE_BIT)
    }

    pub fn en_passant(source: Square, dest: Square) -> Move {
        Move(Move::capture(source, dest).0 | SPECIAL_1_BIT)
    }

    pub fn double_pawn_push(source: Square, dest: Square) -> Move {
        Move(Move::quiet(source, dest).0 | SPECIAL_1_BIT)
    }

    /// Panics if `promoted` is a pawn or a king.
    pub fn promotion(source: Square, dest: Square, promoted: PieceKind) -> Move {
        let piece_bits = match promoted {
            PieceKind::Knight => 0,
            PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            PieceKind::Queen => 3,
            _ => panic!("invalid promotion piece: {:?}", promoted),
        };

        Move(Move::quiet(source, dest).0 | PROMO_BIT | piece_bits)
    }

    pub fn promotion_capture(source: Square, dest: Square, promoted: PieceKind) -> Move {
        Move(Move::promotion(source, dest, promoted).0 | CAPTURE_BIT)
    }

    pub fn kingside_castle(source: Square, dest: Square) -> Move {
        Move(Move::quiet(source, dest).0 | SPECIAL_0_BIT)
    }

    pub fn queenside_castle(source: Square, dest: Square) -> Move {
        Move(Move::quiet(source, dest).0 | SPECIAL_0_BIT | SPECIAL_1_BIT)
    }

    pub fn source(self) -> Square {
        FromPrimitive::from_u16((self.0 & SOURCE_MASK) >> 10).unwrap()
    }

    pub fn destination(self) -> Square {
        FromPrimitive::from_u16((self.0 & DESTINATION_MASK) >> 4).unwrap()
    }

    /// The piece a pawn promotes to, if this is a promotion.
    pub fn promotion_piece(self) -> Option<PieceKind> {
        if !self.is_promotion() {
            return None;
        }

        let piece = match self.0 & (SPECIAL_0_BIT | SPECIAL_1_BIT) {
            0 => PieceKind::Knight,
            1 => PieceKind::Bishop,
            2 => PieceKind::Rook,
            _ => PieceKind::Queen,
        };
        Some(piece)
    }

    pub fn tag(self) -> Option<MoveTag> {
        if self.is_en_passant() {
            Some(MoveTag::EnPassant)
        } else if self.is_capture() {
            Some(MoveTag::Capture)
        } else if self.is_kingside_castle() {
            Some(MoveTag::KingsideCastle)
        } else if self.is_queenside_castle() {
            Some(MoveTag::QueensideCastle)
        } else {
            None
        }
    }

    pub fn is_quiet(self) -> bool {
        (self.0 & ATTR_MASK) == 0
    }

    pub fn is_capture(self) -> bool {
        (self.0 & CAPTURE_BIT) != 0
    }

    pub fn is_en_passant(self) -> bool {
        (self.0 & ATTR_MASK) == 5
    }

    pub fn is_double_pawn_push(self) -> bool {
        (self.0 & ATTR_MASK) == 1
    }

    pub fn is_promotion(self) -> bool {
        (self.0 & PROMO_BIT) != 0
    }

    pub fn is_kingside_castle(self) -> bool {
        (self.0 & ATTR_MASK) == 2
    }

    pub fn is_queenside_castle(self) -> bool {
        (self.0 & ATTR_MASK) == 3
    }

    pub fn is_castle(self) -> bool {
        self.is_kingside_castle() || self.is_queenside_castle()
    }

    /// Whether two moves describe the same intent: same squares and same
    /// promotion piece, regardless of the special-move flags.
    pub fn same_squares(self, other: Move) -> bool {
        self.source() == other.source()
            && self.destination() == other.destination()
            && self.promotion_piece() == other.promotion_piece()
    }
}

/// Prints the move in coordinate form, e.g. `e2e4` or `a7a8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.source(), self.destination())?;
        if let Some(piece) = self.promotion_piece() {
            write!(f, "{}", piece)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Move, MoveTag};
    use crate::types::{PieceKind, Square};

    #[test]
    fn quiet() {
        let quiet = Move::quiet(Square::A4, Square::A5);
        assert_eq!(Square::A4, quiet.source());
        assert_eq!(Square::A5, quiet.destination());
        assert!(quiet.is_quiet());
        assert_eq!(None, quiet.tag());
    }

    #[test]
    fn capture_and_en_passant() {
        let capture = Move::capture(Square::B4, Square::C5);
        assert!(capture.is_capture());
        assert_eq!(Some(MoveTag::Capture), capture.tag());

        let ep = Move::en_passant(Square::E5, Square::D6);
        assert!(ep.is_en_passant());
        assert!(ep.is_capture());
        assert_eq!(Some(MoveTag::EnPassant), ep.tag());
    }

    #[test]
    fn double_pawn_push_is_not_a_capture() {
        let dpp = Move::double_pawn_push(Square::D2, Square::D4);
        assert!(dpp.is_double_pawn_push());
        assert!(!dpp.is_capture());
        assert!(!dpp.is_quiet());
    }

    #[test]
    fn promotions_keep_their_piece() {
        for &kind in &[
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ] {
            let promo = Move::promotion(Square::A7, Square::A8, kind);
            assert_eq!(Some(kind), promo.promotion_piece());
            assert!(!promo.is_capture());

            let promo_capture = Move::promotion_capture(Square::B7, Square::A8, kind);
            assert_eq!(Some(kind), promo_capture.promotion_piece());
            assert!(promo_capture.is_capture());
        }
    }

    #[test]
    fn castles() {
        let short = Move::kingside_castle(Square::E1, Square::G1);
        assert!(short.is_kingside_castle());
        assert!(!short.is_queenside_castle());
        assert_eq!(Some(MoveTag::KingsideCastle), short.tag());

        let long = Move::queenside_castle(Square::E8, Square::C8);
        assert!(long.is_queenside_castle());
        assert_eq!(Some(MoveTag::QueensideCastle), long.tag());
    }

    #[test]
    fn coordinate_display() {
        assert_eq!("e2e4", Move::double_pawn_push(Square::E2, Square::E4).to_string());
        assert_eq!(
            "a7a8q",
            Move::promotion(Square::A7, Square::A8, PieceKind::Queen).to_string()
        );
        assert_eq!("e1g1", Move::kingside_castle(Square::E1, Square::G1).to_string());
    }

    #[test]
    fn same_squares_ignores_flags() {
        let quiet = Move::quiet(Square::E2, Square::E4);
        let dpp = Move::double_pawn_push(Square::E2, Square::E4);
        assert_ne!(quiet, dpp);
        assert!(quiet.same_squares(dpp));
    }
}
