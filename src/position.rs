// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt::{self, Write};

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::error::{Error, FenParseError, Result};
use crate::move_generator::{MoveGenerator, MoveVec};
use crate::moves::Move;
use crate::types::TableIndex;
use crate::types::{CastleStatus, Color, Direction, File, Piece, PieceKind, Rank, Square};
use crate::types::{FILES, PIECE_KINDS, RANKS};
use crate::zobrist;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A chess position: piece placement, side to move, castling rights,
/// en-passant target and the two move counters.
///
/// Positions are values. Applying a move never modifies a position; it
/// produces a new one, so a `Position` can be shared freely between threads
/// and kept around as history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    boards_by_piece: [Bitboard; 12],
    boards_by_color: [Bitboard; 2],
    en_passant_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_clock: u32,
    side_to_move: Color,
    castle_status: CastleStatus,
    zobrist_hash: u64,
}

//
// Board state getters
//

impl Position {
    fn empty() -> Position {
        Position {
            boards_by_piece: [Bitboard::none(); 12],
            boards_by_color: [Bitboard::none(); 2],
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_clock: 1,
            side_to_move: Color::White,
            castle_status: CastleStatus::NONE,
            zobrist_hash: 0,
        }
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_clock(&self) -> u32 {
        self.fullmove_clock
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn zobrist_hash(&self) -> u64 {
        self.zobrist_hash
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_status.contains(kingside_castle_mask(color))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_status.contains(queenside_castle_mask(color))
    }

    pub fn pieces(&self, color: Color) -> Bitboard {
        self.boards_by_color[color.as_index()]
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.boards_by_piece[board_index(color, kind)]
    }

    pub fn pawns(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Pawn)
    }

    pub fn knights(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Knight)
    }

    pub fn bishops(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Bishop)
    }

    pub fn rooks(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Rook)
    }

    pub fn queens(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::Queen)
    }

    pub fn kings(&self, color: Color) -> Bitboard {
        self.pieces_of_kind(color, PieceKind::King)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let color = if self.boards_by_color[Color::White.as_index()].test(square) {
            Color::White
        } else if self.boards_by_color[Color::Black.as_index()].test(square) {
            Color::Black
        } else {
            return None;
        };

        PIECE_KINDS
            .iter()
            .find(|&&kind| self.pieces_of_kind(color, kind).test(square))
            .map(|&kind| Piece::new(kind, color))
    }

    /// Every occupied square with its occupant, A1 first.
    pub fn occupied_squares(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (self.pieces(Color::White) | self.pieces(Color::Black))
            .iter()
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }
}

//
// Move application
//

impl Position {
    fn add_piece(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.piece_at(square).is_none(), "double-add at {}", square);
        self.boards_by_color[piece.color.as_index()].set(square);
        self.boards_by_piece[board_index(piece.color, piece.kind)].set(square);
        zobrist::modify_piece(&mut self.zobrist_hash, square, piece);
    }

    fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.piece_at(square)?;
        self.boards_by_color[piece.color.as_index()].unset(square);
        self.boards_by_piece[board_index(piece.color, piece.kind)].unset(square);
        zobrist::modify_piece(&mut self.zobrist_hash, square, piece);
        Some(piece)
    }

    /// Applies a move that is known to be pseudolegal in this position.
    /// Anything else leaves the position in an unspecified state.
    fn apply_move_in_place(&mut self, mov: Move) {
        let side = self.side_to_move;
        let moving_piece = match self.remove_piece(mov.source()) {
            Some(piece) => piece,
            None => panic!("invalid move {}: no piece at source square", mov),
        };

        if mov.is_en_passant() {
            // The captured pawn sits behind the en-passant square, not on it.
            let victim = mov.destination().towards(side.toggle().pawn_direction());
            self.remove_piece(victim);
        } else if mov.is_capture() {
            self.remove_piece(mov.destination());
        }

        if mov.is_castle() {
            // Castles are encoded with the king's squares; the rook hops over.
            let (rook_from, rook_to) = if mov.is_kingside_castle() {
                (
                    mov.destination().towards(Direction::East),
                    mov.destination().towards(Direction::West),
                )
            } else {
                (
                    mov.destination().towards(Direction::West).towards(Direction::West),
                    mov.destination().towards(Direction::East),
                )
            };

            if let Some(rook) = self.remove_piece(rook_from) {
                self.add_piece(rook_to, rook);
            }
        }

        let placed = match mov.promotion_piece() {
            Some(kind) => Piece::new(kind, side),
            None => moving_piece,
        };
        self.add_piece(mov.destination(), placed);

        let new_ep = if mov.is_double_pawn_push() {
            Some(mov.destination().towards(side.toggle().pawn_direction()))
        } else {
            None
        };
        zobrist::modify_en_passant(&mut self.zobrist_hash, self.en_passant_square, new_ep);
        self.en_passant_square = new_ep;

        // Any move touching a king or rook home square forfeits the rights
        // tied to that square, whether the piece moved or was captured.
        let old_castle = self.castle_status;
        for &sq in &[mov.source(), mov.destination()] {
            self.castle_status &= !castle_rights_lost_at(sq);
        }
        zobrist::modify_castle_status(&mut self.zobrist_hash, old_castle, self.castle_status);

        if mov.is_capture() || moving_piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if side == Color::Black {
            self.fullmove_clock = self.fullmove_clock.saturating_add(1);
        }

        self.side_to_move = side.toggle();
        zobrist::modify_side_to_move(&mut self.zobrist_hash);
    }

    /// Every legal move in this position.
    pub fn legal_moves(&self) -> MoveVec {
        let mut pseudolegal = MoveVec::default();
        MoveGenerator::new().generate_moves(self, &mut pseudolegal);
        pseudolegal
            .into_iter()
            .filter(|&mov| self.is_legal_given_pseudolegal(mov))
            .collect()
    }

    /// Looks up the legal move with the same source, destination and
    /// promotion piece as `mov`. The returned move carries the generator's
    /// flags, so callers may describe a move loosely (e.g. `Move::quiet` for
    /// a capture) and still find it.
    pub fn find_legal(&self, mov: Move) -> Option<Move> {
        self.legal_moves()
            .into_iter()
            .find(|&legal| legal.same_squares(mov))
    }

    pub fn is_legal(&self, mov: Move) -> bool {
        self.find_legal(mov).is_some()
    }

    /// Legality test for a move already known to be pseudolegal: it is legal
    /// if the mover's king is not attacked afterwards.
    pub fn is_legal_given_pseudolegal(&self, mov: Move) -> bool {
        let mut new_pos = self.clone();
        new_pos.apply_move_in_place(mov);
        !new_pos.is_check(self.side_to_move)
    }

    /// Produces the position after `mov`. Fails with `IllegalMove` if the move
    /// is not legal here.
    pub fn apply(&self, mov: Move) -> Result<Position> {
        let legal = self.find_legal(mov).ok_or_else(|| Error::IllegalMove {
            mov: mov.to_string(),
            fen: self.as_fen(),
        })?;

        Ok(self.apply_legal(legal))
    }

    /// Applies a move taken from `legal_moves` without checking it again.
    pub(crate) fn apply_legal(&self, mov: Move) -> Position {
        let mut new_pos = self.clone();
        new_pos.apply_move_in_place(mov);
        new_pos
    }
}

//
// Board analysis
//

impl Position {
    /// The squares holding pieces of color `attacker` that attack `target`.
    /// This does not depend on whose turn it is.
    pub fn squares_attacking(&self, attacker: Color, target: Square) -> Bitboard {
        let occupancy = self.pieces(Color::White) | self.pieces(Color::Black);

        // Attacks are symmetric: a piece of kind K on square S attacks the
        // target iff a K on the target attacks S. Pawns are the exception and
        // look backwards from the target.
        let diagonal = self.bishops(attacker) | self.queens(attacker);
        let straight = self.rooks(attacker) | self.queens(attacker);
        attacks::bishop_attacks(target, occupancy) & diagonal
            | attacks::rook_attacks(target, occupancy) & straight
            | attacks::knight_attacks(target) & self.knights(attacker)
            | attacks::king_attacks(target) & self.kings(attacker)
            | attacks::pawn_attacks(target, attacker.toggle()) & self.pawns(attacker)
    }

    pub fn is_check(&self, color: Color) -> bool {
        self.kings(color)
            .iter()
            .any(|king| !self.squares_attacking(color.toggle(), king).empty())
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check(self.side_to_move) && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check(self.side_to_move) && self.legal_moves().is_empty()
    }

    /// Whether neither side has enough material left to deliver mate: bare
    /// kings, a single minor piece, or only bishops all on one square color.
    pub fn has_insufficient_material(&self) -> bool {
        let heavy = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen];
        for &color in &[Color::White, Color::Black] {
            if heavy
                .iter()
                .any(|&kind| !self.pieces_of_kind(color, kind).empty())
            {
                return false;
            }
        }

        let knights = self.knights(Color::White) | self.knights(Color::Black);
        let bishops = self.bishops(Color::White) | self.bishops(Color::Black);
        if knights.count() + bishops.count() <= 1 {
            return true;
        }

        if !knights.empty() {
            return false;
        }

        let light = bishops.iter().filter(|sq| sq.is_light()).count();
        light == 0 || light == bishops.count() as usize
    }

    /// A key identifying this position for repetition purposes. Two positions
    /// repeat when placement, side to move, castling rights and en-passant
    /// capture availability agree; an en-passant square nobody can use does
    /// not count.
    pub fn repetition_key(&self) -> u64 {
        let mut key = self.zobrist_hash;
        if self.en_passant_square.is_some()
            && !self.legal_moves().iter().any(|mov| mov.is_en_passant())
        {
            zobrist::modify_en_passant(&mut key, self.en_passant_square, None);
        }

        key
    }
}

//
// FEN parsing and generation.
//
// FEN is six space-separated fields: piece placement, side to move, castling
// rights, en-passant target, halfmove clock and fullmove number.
//

impl Position {
    pub fn from_start_position() -> Position {
        Position::from_fen(START_FEN).expect("start position FEN is valid")
    }

    /// Constructs a new position from a FEN representation of a board position.
    /// Beyond the structure of the text, the position is trusted: FEN can
    /// describe positions no game could reach.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position> {
        let fen = fen.as_ref();
        parse_fen(fen).map_err(|reason| Error::MalformedFen {
            fen: fen.to_owned(),
            reason,
        })
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for &rank in RANKS.iter().rev() {
            let mut empty_squares = 0;
            for &file in &FILES {
                match self.piece_at(Square::of(rank, file)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(&mut buf, "{}", empty_squares).unwrap();
                            empty_squares = 0;
                        }
                        write!(&mut buf, "{}", piece).unwrap();
                    }
                    None => empty_squares += 1,
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != Rank::One {
                buf.push('/');
            }
        }

        write!(&mut buf, " {} ", self.side_to_move).unwrap();
        if self.castle_status.is_empty() {
            buf.push('-');
        }
        for &(mask, chr) in CASTLE_CHARS.iter() {
            if self.castle_status.contains(mask) {
                buf.push(chr);
            }
        }

        match self.en_passant_square {
            Some(sq) => write!(&mut buf, " {}", sq).unwrap(),
            None => buf.push_str(" -"),
        }

        write!(&mut buf, " {} {}", self.halfmove_clock, self.fullmove_clock).unwrap();
        buf
    }
}

const CASTLE_CHARS: [(CastleStatus, char); 4] = [
    (CastleStatus::WHITE_KINGSIDE, 'K'),
    (CastleStatus::WHITE_QUEENSIDE, 'Q'),
    (CastleStatus::BLACK_KINGSIDE, 'k'),
    (CastleStatus::BLACK_QUEENSIDE, 'q'),
];

fn parse_fen(fen: &str) -> std::result::Result<Position, FenParseError> {
    let fields: Vec<&str> = fen.trim().split(' ').collect();
    if fields.len() != 6 {
        return Err(FenParseError::FieldCount(fields.len()));
    }

    let mut pos = Position::empty();
    let ranks: Vec<&str> = fields[0].split('/').collect();
    if ranks.len() != 8 {
        return Err(FenParseError::RankCount(ranks.len()));
    }

    for (text, &rank) in ranks.iter().zip(RANKS.iter().rev()) {
        let rank_number = rank.as_index() + 1;
        let mut file = 0;
        for c in text.chars() {
            if let Some(gap) = c.to_digit(10) {
                if gap < 1 || gap > 8 {
                    return Err(FenParseError::InvalidDigit(c));
                }
                file += gap as usize;
                if file > 8 {
                    return Err(FenParseError::FileDoesNotSumToEight(rank_number));
                }
                continue;
            }

            let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
            if file >= 8 {
                return Err(FenParseError::FileDoesNotSumToEight(rank_number));
            }
            pos.add_piece(Square::of(rank, File::from_index(file)), piece);
            file += 1;
        }

        if file != 8 {
            return Err(FenParseError::FileDoesNotSumToEight(rank_number));
        }
    }

    pos.side_to_move = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(FenParseError::InvalidSideToMove),
    };

    if fields[2] != "-" {
        if fields[2].is_empty() {
            return Err(FenParseError::InvalidCastle);
        }
        for c in fields[2].chars() {
            let (mask, _) = CASTLE_CHARS
                .iter()
                .find(|&&(_, chr)| chr == c)
                .ok_or(FenParseError::InvalidCastle)?;
            pos.castle_status |= *mask;
        }
    }

    if fields[3] != "-" {
        let square: Square = fields[3]
            .parse()
            .map_err(|_| FenParseError::InvalidEnPassant)?;
        if square.rank() != Rank::Three && square.rank() != Rank::Six {
            return Err(FenParseError::InvalidEnPassant);
        }
        pos.en_passant_square = Some(square);
    }

    pos.halfmove_clock = fields[4]
        .parse()
        .map_err(|_| FenParseError::InvalidHalfmove)?;
    pos.fullmove_clock = fields[5]
        .parse()
        .map_err(|_| FenParseError::InvalidFullmove)?;
    pos.zobrist_hash = zobrist::hash(&pos);
    Ok(pos)
}

//
// Trait implementations
//

/// A plain-text board diagram, White at the bottom.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                match self.piece_at(Square::of(rank, file)) {
                    Some(piece) => write!(f, " {} ", piece)?,
                    None => write!(f, " . ")?,
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::from_start_position()
    }
}

//
// Helper functions
//

fn board_index(color: Color, kind: PieceKind) -> usize {
    let offset = match color {
        Color::White => 0,
        Color::Black => 6,
    };
    offset + kind.as_index()
}

fn kingside_castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE_KINGSIDE,
        Color::Black => CastleStatus::BLACK_KINGSIDE,
    }
}

fn queenside_castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE_QUEENSIDE,
        Color::Black => CastleStatus::BLACK_QUEENSIDE,
    }
}

fn castle_rights_lost_at(square: Square) -> CastleStatus {
    match square {
        Square::E1 => CastleStatus::WHITE,
        Square::H1 => CastleStatus::WHITE_KINGSIDE,
        Square::A1 => CastleStatus::WHITE_QUEENSIDE,
        Square::E8 => CastleStatus::BLACK,
        Square::H8 => CastleStatus::BLACK_KINGSIDE,
        Square::A8 => CastleStatus::BLACK_QUEENSIDE,
        _ => CastleStatus::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn legal(position: &Position, text: &str) -> Move {
        position
            .legal_moves()
            .into_iter()
            .find(|m| m.to_string() == text)
            .unwrap_or_else(|| panic!("{} is not legal in {}", text, position.as_fen()))
    }

    #[test]
    fn check_smoke() {
        let pos = pos("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(pos.is_check(Color::White));
        assert!(!pos.is_check(Color::Black));
        assert!(pos.is_checkmate());
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let pos = pos("8/8/4r3/8/8/4B3/4K3/8 w - - 0 1");
        assert!(pos
            .legal_moves()
            .iter()
            .all(|m| m.source() != Square::E3));
    }

    #[test]
    fn squares_attacking_ignores_turn() {
        let pos = pos("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1");
        let attackers = pos.squares_attacking(Color::Black, Square::E1);
        assert_eq!(vec![Square::D2], attackers.iter().collect::<Vec<_>>());
        assert!(pos.squares_attacking(Color::Black, Square::D1).empty());
    }

    #[test]
    fn en_passant_capture_removes_victim() {
        let start = pos("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let after = start.apply(legal(&start, "e5d6")).unwrap();
        assert!(after.piece_at(Square::D5).is_none());
        assert_eq!(
            Some(Piece::new(PieceKind::Pawn, Color::White)),
            after.piece_at(Square::D6)
        );
        assert_eq!(None, after.en_passant_square());
    }

    #[test]
    fn double_push_sets_ep_square() {
        let start = Position::from_start_position();
        let after = start.apply(legal(&start, "e2e4")).unwrap();
        assert_eq!(Some(Square::E3), after.en_passant_square());
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            after.as_fen()
        );
    }

    #[test]
    fn counters() {
        let start = Position::from_start_position();
        let after_white = start.apply(legal(&start, "g1f3")).unwrap();
        assert_eq!(1, after_white.halfmove_clock());
        assert_eq!(1, after_white.fullmove_clock());
        let after_black = after_white.apply(legal(&after_white, "e7e5")).unwrap();
        assert_eq!(0, after_black.halfmove_clock());
        assert_eq!(2, after_black.fullmove_clock());
    }

    #[test]
    fn counters_saturate() {
        let start = pos("4k3/8/8/8/8/8/8/4K2R b - - 4294967295 4294967295");
        let after = start.apply(legal(&start, "e8d8")).unwrap();
        assert_eq!(u32::MAX, after.halfmove_clock());
        assert_eq!(u32::MAX, after.fullmove_clock());
    }

    #[test]
    fn apply_legal_matches_apply() {
        let start = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        for &mov in start.legal_moves().iter() {
            assert_eq!(start.apply(mov).unwrap(), start.apply_legal(mov));
        }
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let start = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let after = start.apply(legal(&start, "e1g1")).unwrap();
        assert_eq!(
            Some(Piece::new(PieceKind::Rook, Color::White)),
            after.piece_at(Square::F1)
        );
        assert!(after.piece_at(Square::H1).is_none());
        assert_eq!("r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1", after.as_fen());

        let after = after.apply(legal(&after, "e8c8")).unwrap();
        assert_eq!("2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2", after.as_fen());
    }

    #[test]
    fn rook_capture_clears_opponent_rights() {
        let start = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let after = start.apply(legal(&start, "a1a8")).unwrap();
        assert!(!after.can_castle_queenside(Color::Black));
        assert!(!after.can_castle_queenside(Color::White));
        assert!(after.can_castle_kingside(Color::Black));
        assert!(after.can_castle_kingside(Color::White));
    }

    #[test]
    fn promotion_places_new_piece() {
        let start = pos("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let mov = Move::promotion(Square::A7, Square::A8, PieceKind::Knight);
        let after = start.apply(mov).unwrap();
        assert_eq!(
            Some(Piece::new(PieceKind::Knight, Color::White)),
            after.piece_at(Square::A8)
        );
    }

    #[test]
    fn apply_rejects_illegal_moves() {
        let start = Position::from_start_position();
        let err = start.apply(Move::quiet(Square::E2, Square::E5)).unwrap_err();
        assert_eq!(crate::error::ErrorKind::IllegalMove, err.kind());
    }

    #[test]
    fn apply_accepts_loosely_tagged_moves() {
        let start = Position::from_start_position();
        let after = start.apply(Move::quiet(Square::E2, Square::E4)).unwrap();
        assert_eq!(Some(Square::E3), after.en_passant_square());
    }

    #[test]
    fn incremental_hash_matches_fresh_hash() {
        let mut current = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        for text in &["e1g1", "b4c3", "d2c3", "e8c8"] {
            current = current.apply(legal(&current, text)).unwrap();
            let reparsed = Position::from_fen(current.as_fen()).unwrap();
            assert_eq!(reparsed.zobrist_hash(), current.zobrist_hash());
            assert_eq!(reparsed, current);
        }
    }

    #[test]
    fn insufficient_material() {
        assert!(pos("8/8/4k3/8/8/3K4/8/8 w - - 0 1").has_insufficient_material());
        assert!(pos("8/8/4k3/8/8/3K4/8/6N1 w - - 0 1").has_insufficient_material());
        assert!(pos("8/8/4k3/2b5/8/3K4/8/5B2 w - - 0 1").has_insufficient_material());
        assert!(!pos("8/8/4k3/3b4/8/3K4/8/5B2 w - - 0 1").has_insufficient_material());
        assert!(!pos("8/8/4k3/8/8/3K4/8/5NN1 w - - 0 1").has_insufficient_material());
        assert!(!pos("8/8/4k3/8/8/3K4/4P3/8 w - - 0 1").has_insufficient_material());
    }

    #[test]
    fn unusable_ep_square_does_not_affect_repetition_key() {
        let with_ep = pos("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        let without = pos("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
        assert_ne!(with_ep.zobrist_hash(), without.zobrist_hash());
        assert_eq!(with_ep.repetition_key(), without.repetition_key());
    }

    #[test]
    fn occupied_squares_lists_pieces() {
        let pos = pos("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let pieces: Vec<_> = pos.occupied_squares().collect();
        assert_eq!(
            vec![
                (Square::E1, Piece::new(PieceKind::King, Color::White)),
                (Square::E8, Piece::new(PieceKind::King, Color::Black)),
            ],
            pieces
        );
    }

    mod fen {
        use super::*;

        fn reason(fen: &str) -> FenParseError {
            match Position::from_fen(fen) {
                Err(Error::MalformedFen { reason, .. }) => reason,
                other => panic!("expected malformed FEN, got {:?}", other),
            }
        }

        #[test]
        fn starting_position() {
            let pos = Position::from_start_position();
            assert_eq!(START_FEN, pos.as_fen());
            assert_eq!(Color::White, pos.side_to_move());
            assert!(pos.can_castle_kingside(Color::Black));
            assert_eq!(
                Some(Piece::new(PieceKind::Queen, Color::White)),
                pos.piece_at(Square::D1)
            );
            assert_eq!(32, pos.occupied_squares().count());
        }

        #[test]
        fn trailing_newline_is_tolerated() {
            let pos = Position::from_fen(format!("{}\n", START_FEN)).unwrap();
            assert_eq!(START_FEN, pos.as_fen());
        }

        #[test]
        fn field_count() {
            assert_eq!(FenParseError::FieldCount(1), reason(""));
            assert_eq!(
                FenParseError::FieldCount(4),
                reason("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -")
            );
            assert_eq!(
                FenParseError::FieldCount(7),
                reason("8/8/8/8/8/8/8/8  w - - 0 1")
            );
        }

        #[test]
        fn rank_shape() {
            assert_eq!(FenParseError::RankCount(7), reason("8/8/8/8/8/8/8 w - - 0 1"));
            assert_eq!(
                FenParseError::FileDoesNotSumToEight(8),
                reason("7/8/8/8/8/8/8/8 w - - 0 1")
            );
            assert_eq!(
                FenParseError::FileDoesNotSumToEight(1),
                reason("8/8/8/8/8/8/8/ppppppppp w - - 0 1")
            );
            assert_eq!(
                FenParseError::FileDoesNotSumToEight(5),
                reason("8/8/8/44p/8/8/8/8 w - - 0 1")
            );
            assert_eq!(FenParseError::InvalidDigit('9'), reason("9/8/8/8/8/8/8/8 w - - 0 1"));
            assert_eq!(FenParseError::UnknownPiece('z'), reason("z7/8/8/8/8/8/8/8 w - - 0 1"));
        }

        #[test]
        fn other_fields() {
            assert_eq!(FenParseError::InvalidSideToMove, reason("8/8/8/8/8/8/8/8 c - - 0 1"));
            assert_eq!(FenParseError::InvalidCastle, reason("8/8/8/8/8/8/8/8 w a - 0 1"));
            assert_eq!(FenParseError::InvalidEnPassant, reason("8/8/8/8/8/8/8/8 w - e4 0 1"));
            assert_eq!(FenParseError::InvalidEnPassant, reason("8/8/8/8/8/8/8/8 w - z3 0 1"));
            assert_eq!(FenParseError::InvalidHalfmove, reason("8/8/8/8/8/8/8/8 w - - x 1"));
            assert_eq!(FenParseError::InvalidFullmove, reason("8/8/8/8/8/8/8/8 w - - 0 -1"));
        }

        #[test]
        fn roundtrip() {
            for fen in &[
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
                "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
                "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w Kq d6 0 3",
            ] {
                assert_eq!(*fen, Position::from_fen(fen).unwrap().as_fen());
            }
        }
    }
}
