// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate criterion;

use chess_notation::attacks;
use chess_notation::pgn;
use chess_notation::{
    AlgebraicNotation, Bitboard, MoveGenerator, MoveVec, Notation, Position, Square,
};
use criterion::black_box;
use criterion::Criterion;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

const GAME: &str = r#"[Event "?"]
[White "Kasparov"]
[Black "Deep-Blue"]
[Result "1-0"]

1. Nf3 d5 2. g3 Bg4 3. b3 Nd7 4. Bb2 e6 5. Bg2 Ngf6 6. O-O c6 7. d3 Bd6
8. Nbd2 O-O 9. h3 Bh5 10. e3 h6 11. Qe1 Qa5 12. a3 Bc7 13. Nh4 g5 14. Nhf3
e5 15. e4 Rfe8 16. Nh2 Qb6 17. Qc1 a5 18. Re1 Bd6 19. Ndf1 dxe4 20. dxe4 Bc5
21. Ne3 Rad8 22. Nhf1 g4 23. hxg4 Nxg4 24. f3 Nxe3 25. Nxe3 Be7 26. Kh1 Bg5
27. Re2 a4 28. b4 f5 29. exf5 e4 30. f4 Bxe2 31. fxg5 Ne5 32. g6 Bf3 33. Bc3
Qb5 34. Qf1 Qxf1+ 35. Rxf1 h5 36. Kg1 Kf8 37. Bh3 b5 38. Kf2 Kg7 39. g4 Kh6
40. Rg1 hxg4 41. Bxg4 Bxg4 42. Nxg4+ Nxg4+ 43. Rxg4 Rd5 44. f6 Rd1 45. g7 1-0
"#;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("queen attacks f5 empty board", |b| {
        b.iter(|| attacks::queen_attacks(black_box(Square::F5), Bitboard::none()))
    });

    c.bench_function("generate moves kiwipete", |b| {
        let pos = Position::from_fen(KIWIPETE).unwrap();
        b.iter(|| {
            let mut vec = MoveVec::default();
            let gen = MoveGenerator::new();
            gen.generate_moves(black_box(&pos), &mut vec);
        });
    });

    c.bench_function("legal moves kiwipete", |b| {
        let pos = Position::from_fen(KIWIPETE).unwrap();
        b.iter(|| black_box(&pos).legal_moves())
    });

    c.bench_function("parse fen kiwipete", |b| {
        b.iter(|| Position::from_fen(black_box(KIWIPETE)).unwrap())
    });

    c.bench_function("encode san kiwipete", |b| {
        let pos = Position::from_fen(KIWIPETE).unwrap();
        let moves = pos.legal_moves();
        b.iter(|| {
            for &mov in moves.iter() {
                black_box(AlgebraicNotation.encode(&pos, mov));
            }
        });
    });

    c.bench_function("decode pgn game", |b| {
        b.iter(|| pgn::decode(black_box(GAME)).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
