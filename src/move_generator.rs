// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudolegal move generation. Every move produced here obeys the movement
//! rules of its piece, but may leave the mover's own king in check;
//! `Position::legal_moves` filters those out.
use arrayvec::ArrayVec;

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::bitboard::{BB_RANK_1, BB_RANK_2, BB_RANK_7, BB_RANK_8};
use crate::moves::Move;
use crate::position::Position;
use crate::types::{Color, Direction, PieceKind, Square, PROMOTION_KINDS};

/// No reachable chess position has more than 218 legal moves, so a fixed
/// buffer of 256 never overflows.
pub type MoveVec = ArrayVec<Move, 256>;

#[derive(Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> MoveGenerator {
        MoveGenerator
    }

    pub fn generate_moves(&self, pos: &Position, moves: &mut MoveVec) {
        self.generate_pawn_moves(pos, moves);
        self.generate_leaper_moves(pos, moves, PieceKind::Knight, attacks::knight_attacks);
        self.generate_slider_moves(pos, moves, PieceKind::Bishop, attacks::bishop_attacks);
        self.generate_slider_moves(pos, moves, PieceKind::Rook, attacks::rook_attacks);
        self.generate_slider_moves(pos, moves, PieceKind::Queen, attacks::queen_attacks);
        self.generate_leaper_moves(pos, moves, PieceKind::King, attacks::king_attacks);
        self.generate_castling_moves(pos, moves);
    }

    fn generate_pawn_moves(&self, pos: &Position, moves: &mut MoveVec) {
        let color = pos.side_to_move();
        let enemies = pos.pieces(color.toggle());
        let occupancy = pos.pieces(Color::White) | pos.pieces(Color::Black);
        let (start_rank, promo_rank) = match color {
            Color::White => (BB_RANK_2, BB_RANK_8),
            Color::Black => (BB_RANK_7, BB_RANK_1),
        };

        let dir = color.pawn_direction();
        for pawn in pos.pawns(color) {
            // Pawns can't stand on the promotion rank; a FEN that says
            // otherwise gets no moves for that pawn.
            if promo_rank.test(pawn) {
                continue;
            }

            let target = pawn.towards(dir);
            if !occupancy.test(target) {
                if promo_rank.test(target) {
                    for &kind in PROMOTION_KINDS.iter() {
                        moves.push(Move::promotion(pawn, target, kind));
                    }
                } else {
                    moves.push(Move::quiet(pawn, target));
                    if start_rank.test(pawn) {
                        let double_target = target.towards(dir);
                        if !occupancy.test(double_target) {
                            moves.push(Move::double_pawn_push(pawn, double_target));
                        }
                    }
                }
            }

            let pawn_attacks = attacks::pawn_attacks(pawn, color);
            for target in pawn_attacks & enemies {
                if promo_rank.test(target) {
                    for &kind in PROMOTION_KINDS.iter() {
                        moves.push(Move::promotion_capture(pawn, target, kind));
                    }
                } else {
                    moves.push(Move::capture(pawn, target));
                }
            }

            if let Some(ep_square) = pos.en_passant_square() {
                // The en-passant square must be empty and sit directly in
                // front of an enemy pawn, otherwise the FEN lied to us.
                let victim = ep_square.towards(color.toggle().pawn_direction());
                if pawn_attacks.test(ep_square)
                    && !occupancy.test(ep_square)
                    && pos.pawns(color.toggle()).test(victim)
                {
                    moves.push(Move::en_passant(pawn, ep_square));
                }
            }
        }
    }

    fn generate_leaper_moves<F>(
        &self,
        pos: &Position,
        moves: &mut MoveVec,
        kind: PieceKind,
        attacks: F,
    ) where
        F: Fn(Square) -> Bitboard,
    {
        let color = pos.side_to_move();
        let enemies = pos.pieces(color.toggle());
        let allies = pos.pieces(color);
        for piece in pos.pieces_of_kind(color, kind) {
            for target in attacks(piece) & !allies {
                if enemies.test(target) {
                    moves.push(Move::capture(piece, target));
                } else {
                    moves.push(Move::quiet(piece, target));
                }
            }
        }
    }

    fn generate_slider_moves<F>(
        &self,
        pos: &Position,
        moves: &mut MoveVec,
        kind: PieceKind,
        attacks: F,
    ) where
        F: Fn(Square, Bitboard) -> Bitboard,
    {
        let color = pos.side_to_move();
        let enemies = pos.pieces(color.toggle());
        let allies = pos.pieces(color);
        let occupancy = enemies | allies;
        for piece in pos.pieces_of_kind(color, kind) {
            for target in attacks(piece, occupancy) & !allies {
                if enemies.test(target) {
                    moves.push(Move::capture(piece, target));
                } else {
                    moves.push(Move::quiet(piece, target));
                }
            }
        }
    }

    fn generate_castling_moves(&self, pos: &Position, moves: &mut MoveVec) {
        let color = pos.side_to_move();
        let king_start = match color {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        };

        if !pos.kings(color).test(king_start) || pos.is_check(color) {
            return;
        }

        let occupancy = pos.pieces(Color::White) | pos.pieces(Color::Black);
        let rooks = pos.rooks(color);
        let enemy = color.toggle();

        // The king may not pass through an attacked square. The destination
        // square is covered by the legality test that follows generation.
        if pos.can_castle_kingside(color) {
            let transit = king_start.towards(Direction::East);
            let dest = transit.towards(Direction::East);
            let rook = dest.towards(Direction::East);
            if rooks.test(rook)
                && !occupancy.test(transit)
                && !occupancy.test(dest)
                && pos.squares_attacking(enemy, transit).empty()
            {
                moves.push(Move::kingside_castle(king_start, dest));
            }
        }

        if pos.can_castle_queenside(color) {
            let transit = king_start.towards(Direction::West);
            let dest = transit.towards(Direction::West);
            let knight_square = dest.towards(Direction::West);
            let rook = knight_square.towards(Direction::West);
            if rooks.test(rook)
                && !occupancy.test(transit)
                && !occupancy.test(dest)
                && !occupancy.test(knight_square)
                && pos.squares_attacking(enemy, transit).empty()
            {
                moves.push(Move::queenside_castle(king_start, dest));
            }
        }
    }
}
