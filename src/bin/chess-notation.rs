// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use std::time::Instant;

use chess_notation::pgn::{self, LogProgress, NullProgress, ProgressSink};
use chess_notation::{
    divide, perft, AlgebraicNotation, Game, GameConfig, GameSummary, Notation, Position,
};
use clap::{App, Arg, ArgMatches, SubCommand};

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("fen")
                .about("Describe a board position")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for a board position")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for a board position")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("divide")
                        .help("Print the node count below each root move")
                        .long("--divide"),
                ),
        )
        .subcommand(
            SubCommand::with_name("pgn")
                .about("Decode the games in a PGN file")
                .arg(
                    Arg::with_name("FILE")
                        .help("PGN file to read")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("limit")
                        .help("Stop after this many games")
                        .value_name("LIMIT")
                        .short("-n")
                        .long("--limit")
                        .conflicts_with("parallel")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("parallel")
                        .help("Decode games on all cores")
                        .short("-p")
                        .long("--parallel"),
                )
                .arg(
                    Arg::with_name("format")
                        .help("Output format")
                        .value_name("FORMAT")
                        .short("-f")
                        .long("--format")
                        .possible_values(&["text", "json", "csv"])
                        .default_value("text")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("quiet")
                        .help("Do not log progress")
                        .short("-q")
                        .long("--quiet"),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("fen") {
        run_fen(matches);
    }

    if let Some(matches) = matches.subcommand_matches("perft") {
        run_perft(matches);
    }

    if let Some(matches) = matches.subcommand_matches("pgn") {
        run_pgn(matches);
    }

    println!("{}", matches.usage());
    process::exit(1);
}

fn parse_position(fen: &str) -> Position {
    match Position::from_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

fn run_fen(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let pos = parse_position(fen);
    println!("{}", pos);
    println!();
    println!("fen:     {}", pos.as_fen());
    println!("hash:    {:016x}", pos.zobrist_hash());
    println!("check:   {}", pos.is_check(pos.side_to_move()));

    let game = match Game::new(GameConfig::from_fen(fen)) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };
    println!("outcome: {} ({})", game.outcome(), game.method());
    let moves: Vec<String> = game
        .legal_moves()
        .iter()
        .map(|&mov| AlgebraicNotation.encode(&pos, mov))
        .collect();
    println!("moves:   {}", moves.join(" "));
    process::exit(0);
}

fn run_perft(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let depth = value_t!(matches, "depth", u32).unwrap_or(4);
    let pos = parse_position(fen);

    println!("fen:   {}", fen);
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
    println!();
    if matches.is_present("divide") {
        let mut total = 0;
        for (mov, count) in divide(&pos, depth) {
            println!("{}: {}", mov, count);
            total += count;
        }
        println!();
        println!("total: {}", total);
        process::exit(0);
    }

    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&pos, i);
        let duration = start.elapsed();
        println!("perft({}) = {} ({} ms)", i, results, duration.as_millis());
    }

    process::exit(0);
}

fn run_pgn(matches: &ArgMatches) -> ! {
    let path = matches.value_of("FILE").unwrap();
    let file = match File::open(path) {
        Ok(file) => BufReader::new(file),
        Err(err) => {
            eprintln!("could not open {}: {}", path, err);
            process::exit(1);
        }
    };

    let mut sink: Box<dyn ProgressSink> = if matches.is_present("quiet") {
        Box::new(NullProgress)
    } else {
        Box::new(LogProgress::default())
    };

    let start = Instant::now();
    let games = if matches.is_present("limit") {
        let limit = value_t_or_exit!(matches, "limit", usize);
        match pgn::PgnReader::new(file).read_games_with(limit, sink.as_mut()) {
            Ok(batch) => batch.games,
            Err(partial) => {
                eprintln!("{}", partial);
                partial.games
            }
        }
    } else {
        let result = if matches.is_present("parallel") {
            pgn::par_decode_all(file, sink.as_mut())
        } else {
            pgn::read_all(file, sink.as_mut())
        };
        match result {
            Ok(games) => games,
            Err(err) => {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
    };
    info!("decoded {} games in {} ms", games.len(), start.elapsed().as_millis());

    let summaries: Vec<GameSummary> = games.iter().map(Game::summary).collect();
    let written = match matches.value_of("format").unwrap_or("text") {
        "json" => write_json(&summaries),
        "csv" => write_csv(&summaries),
        _ => {
            for summary in &summaries {
                println!(
                    "{} - {} ({}): {} by {} after {} plies",
                    summary.white,
                    summary.black,
                    summary.event,
                    summary.result,
                    summary.method,
                    summary.plies
                );
            }
            Ok(())
        }
    };

    if let Err(err) = written {
        eprintln!("{}", err);
        process::exit(1);
    }

    process::exit(0);
}

fn write_json(summaries: &[GameSummary]) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), summaries)?;
    println!();
    Ok(())
}

fn write_csv(summaries: &[GameSummary]) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());
    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;
    Ok(())
}
