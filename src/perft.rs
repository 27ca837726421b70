// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::moves::Move;
use crate::position::Position;

/// Counts the leaf nodes of the legal move tree rooted at `pos`, `depth` plies
/// deep. Subtrees are walked in parallel.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = pos.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .par_iter()
        .map(|&mov| perft(&pos.apply_legal(mov), depth - 1))
        .sum()
}

/// Per-root-move breakdown of `perft`, in generation order.
pub fn divide(pos: &Position, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return vec![];
    }

    pos.legal_moves()
        .par_iter()
        .map(|&mov| (mov, perft(&pos.apply_legal(mov), depth - 1)))
        .collect()
}
