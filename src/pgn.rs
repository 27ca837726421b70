// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! PGN decoding and encoding.
//!
//! A single record is decoded by `decode`: tag pairs are read line by line,
//! then the movetext is cleaned of comments, variations, NAGs and move
//! numbers and replayed through a `Game`. Comment and variation stripping is
//! non-nesting: the first closing delimiter ends the section.
//!
//! `PgnReader` frames records out of a stream of many games, and `read_all` /
//! `par_decode_all` decode a whole stream at once.
use std::io::BufRead;

use rayon::prelude::*;
use regex::Regex;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::game::{Game, GameConfig, InitialPosition, TagPair};
use crate::notation::{self, AlgebraicNotation, LongAlgebraicNotation, Notation};
use crate::outcome::{Method, Outcome};
use crate::position::Position;
use crate::types::Color;

lazy_static! {
    static ref TAG_PAIR: Regex = Regex::new(r#"\[(.*)\s"(.*)"\]"#).unwrap();
    static ref COMMENT: Regex = Regex::new(r"(?s)\{.*?\}").unwrap();
    static ref LINE_COMMENT: Regex = Regex::new(r";[^\n]*").unwrap();
    static ref VARIATION: Regex = Regex::new(r"(?s)\(.*?\)").unwrap();
    static ref BRACKETED: Regex = Regex::new(r"(?s)\[.*?\]").unwrap();
    static ref NAG: Regex = Regex::new(r"\$\d+").unwrap();
    static ref MOVE_NUMBER: Regex = Regex::new(r"^(?:\d+\.+)?(.*)$").unwrap();
}

/// Movetext lines are wrapped before they exceed this width.
const LINE_WIDTH: usize = 80;

fn tag_pairs(text: &str) -> Vec<TagPair> {
    TAG_PAIR
        .captures_iter(text)
        .map(|caps| TagPair::new(caps[1].trim(), &caps[2]))
        .collect()
}

/// Splits movetext into move tokens and the trailing result, if any.
fn move_tokens(text: &str) -> (Vec<String>, Option<Outcome>) {
    let text = TAG_PAIR.replace_all(text, " ");
    let text = COMMENT.replace_all(&text, " ");
    let text = VARIATION.replace_all(&text, " ");
    let text = BRACKETED.replace_all(&text, " ");
    let text = LINE_COMMENT.replace_all(&text, " ");
    let text = NAG.replace_all(&text, " ");

    let mut tokens = vec![];
    let mut result = None;
    for word in text.split_whitespace() {
        if let Ok(outcome) = word.parse::<Outcome>() {
            result = Some(outcome);
            continue;
        }

        if word == "e.p." {
            continue;
        }

        if let Some(caps) = MOVE_NUMBER.captures(word) {
            let token = &caps[1];
            if !token.is_empty() {
                tokens.push(token.to_owned());
            }
        }
    }

    (tokens, result)
}

/// Long algebraic is chosen when the first non-castling token decodes as long
/// algebraic in the position it is played from. Leading castles read the same
/// in both notations and are replayed to reach that position.
fn choose_notation(initial: &Position, tokens: &[String]) -> &'static dyn Notation {
    let mut pos = initial.clone();
    for token in tokens {
        if !notation::is_castle_token(token) {
            if LongAlgebraicNotation.decode(&pos, token).is_ok() {
                return &LongAlgebraicNotation;
            }
            break;
        }

        match AlgebraicNotation
            .decode(&pos, token)
            .and_then(|mov| pos.apply(mov))
        {
            Ok(next) => pos = next,
            Err(_) => break,
        }
    }

    &AlgebraicNotation
}

/// Decodes one PGN record into a game.
///
/// Automatic draws are ignored while replaying; the recorded result, if any,
/// is authoritative. A `FEN` tag sets the initial position. Replay failures
/// report the 1-based ply and the token that failed.
pub fn decode(text: &str) -> Result<Game> {
    let tags = tag_pairs(text);
    let (tokens, result) = move_tokens(text);
    let initial = match tags.iter().find(|pair| pair.key == "FEN") {
        Some(pair) => InitialPosition::Fen(pair.value.clone()),
        None => InitialPosition::Default,
    };

    let config = GameConfig {
        initial,
        tag_pairs: tags,
        ignore_automatic_draws: true,
    };
    let mut game = Game::new(config)?;
    let notation = choose_notation(game.position(), &tokens);
    debug!("replaying {} plies", tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        game.play_with(notation, token)
            .map_err(|err| err.at_ply(i + 1, token.as_str()))?;
    }

    if let Some(result) = result {
        let (detected, method) = game.detect_full_outcome();
        let method = if detected == result {
            method
        } else {
            Method::None
        };
        game.set_outcome(result, method);
    }

    Ok(game)
}

/// Encodes a game as PGN: tag pairs, a blank line, then numbered movetext in
/// algebraic notation ending with the result.
pub fn encode(game: &Game) -> String {
    let mut out = String::new();
    let mut tags: Vec<TagPair> = game.tag_pairs().to_vec();
    let initial = game.initial_position();
    if *initial != Position::from_start_position() && game.tag("FEN").is_none() {
        tags.push(TagPair::new("SetUp", "1"));
        tags.push(TagPair::new("FEN", initial.as_fen()));
    }

    for pair in &tags {
        out.push_str(&format!("[{} \"{}\"]\n", pair.key, pair.value));
    }
    if !tags.is_empty() {
        out.push('\n');
    }

    let mut words = vec![];
    for (i, &mov) in game.moves().iter().enumerate() {
        let before = &game.positions()[i];
        let text = AlgebraicNotation.encode(before, mov);
        let number = before.fullmove_clock();
        match before.side_to_move() {
            Color::White => words.push(format!("{}. {}", number, text)),
            Color::Black if i == 0 => words.push(format!("{}... {}", number, text)),
            Color::Black => words.push(text),
        }
    }
    words.push(game.outcome().to_string());

    let mut line_len = 0;
    for word in words {
        if line_len > 0 && line_len + 1 + word.len() > LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        line_len += word.len();
        out.push_str(&word);
    }

    out.push('\n');
    out
}

/// Receives a notification for every game decoded from a stream.
pub trait ProgressSink {
    fn game_decoded(&mut self, index: usize, game: &Game);

    fn finished(&mut self, _total: usize) {}
}

/// Ignores all progress.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn game_decoded(&mut self, _index: usize, _game: &Game) {}
}

/// Logs progress through the `log` facade every `interval` games.
#[derive(Copy, Clone, Debug)]
pub struct LogProgress {
    interval: usize,
}

impl LogProgress {
    pub fn new(interval: usize) -> LogProgress {
        LogProgress {
            interval: interval.max(1),
        }
    }
}

impl Default for LogProgress {
    fn default() -> LogProgress {
        LogProgress::new(1)
    }
}

impl ProgressSink for LogProgress {
    fn game_decoded(&mut self, index: usize, _game: &Game) {
        if (index + 1) % self.interval == 0 {
            info!("processed game {}", index + 1);
        }
    }

    fn finished(&mut self, total: usize) {
        info!("processed {} games", total);
    }
}

/// A bounded read that reached its limit or the end of the stream.
#[derive(Debug)]
pub struct Batch {
    pub games: Vec<Game>,
    /// True if the stream has no more records.
    pub exhausted: bool,
}

/// A bounded read that failed partway. `games` holds everything decoded
/// before the failure.
#[derive(Debug, Error)]
#[error("{error} ({} games decoded before the failure)", .games.len())]
pub struct PartialBatch {
    pub games: Vec<Game>,
    #[source]
    pub error: Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Section {
    Start,
    Tags,
    AfterTags,
    Moves,
}

/// Frames PGN records out of a stream one line at a time. A record is a tag
/// section, a blank line, then movetext ending at the next blank line outside
/// a brace comment.
pub struct PgnReader<R> {
    reader: R,
    /// A line read past the end of the previous record.
    pending: Option<String>,
    records_read: usize,
}

impl<R: BufRead> PgnReader<R> {
    pub fn new(reader: R) -> PgnReader<R> {
        PgnReader {
            reader,
            pending: None,
            records_read: 0,
        }
    }

    /// How many records have been framed so far, successful or not.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line))
    }

    /// The raw text of the next record, or `None` at the end of the stream.
    pub fn next_record(&mut self) -> Result<Option<String>> {
        let mut record = String::new();
        let mut section = Section::Start;
        let mut in_comment = false;
        loop {
            let line = match self.next_line()? {
                Some(line) => line,
                None => break,
            };

            let trimmed = line.trim();
            let blank = trimmed.is_empty();
            let tag = trimmed.starts_with('[');
            section = match section {
                Section::Start if blank => continue,
                Section::Start if tag => Section::Tags,
                Section::Start => Section::Moves,
                Section::Tags if blank => Section::AfterTags,
                Section::Tags if tag => Section::Tags,
                Section::Tags => Section::Moves,
                Section::AfterTags if blank => continue,
                Section::AfterTags if tag => {
                    self.records_read += 1;
                    return Err(Error::PgnStructure(
                        "tag pair after the end of the tag section".to_owned(),
                    ));
                }
                Section::AfterTags => Section::Moves,
                Section::Moves if in_comment => Section::Moves,
                Section::Moves if blank => break,
                Section::Moves if tag => {
                    // A new record started without a separating blank line.
                    self.pending = Some(line);
                    break;
                }
                Section::Moves => Section::Moves,
            };

            if section == Section::Moves {
                in_comment = track_comment(in_comment, trimmed);
            }
            record.push_str(&line);
            if !line.ends_with('\n') {
                record.push('\n');
            }
        }

        match section {
            Section::Start => Ok(None),
            Section::Tags | Section::AfterTags => {
                self.records_read += 1;
                Err(Error::PgnStructure(
                    "stream ended before the movetext".to_owned(),
                ))
            }
            Section::Moves => {
                self.records_read += 1;
                Ok(Some(record))
            }
        }
    }

    /// Decodes the next game. Errors carry the 0-based index of the failing
    /// record in the stream.
    pub fn next_game(&mut self) -> Result<Option<Game>> {
        let index = self.records_read;
        let record = match self.next_record() {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(None),
            Err(err) => return Err(err.in_game(index)),
        };

        decode(&record).map(Some).map_err(|err| err.in_game(index))
    }

    /// Decodes up to `limit` games. The reader keeps its place, so repeated
    /// calls walk the whole stream.
    pub fn read_games(&mut self, limit: usize) -> std::result::Result<Batch, PartialBatch> {
        self.read_games_with(limit, &mut NullProgress)
    }

    /// Like `read_games`, reporting each decoded game to `sink` by its index
    /// in the stream.
    pub fn read_games_with(
        &mut self,
        limit: usize,
        sink: &mut dyn ProgressSink,
    ) -> std::result::Result<Batch, PartialBatch> {
        let mut games = vec![];
        let mut exhausted = false;
        while games.len() < limit {
            let index = self.records_read;
            match self.next_game() {
                Ok(Some(game)) => {
                    sink.game_decoded(index, &game);
                    games.push(game);
                }
                Ok(None) => {
                    exhausted = true;
                    break;
                }
                Err(error) => {
                    sink.finished(games.len());
                    return Err(PartialBatch { games, error });
                }
            }
        }

        sink.finished(games.len());
        Ok(Batch { games, exhausted })
    }
}

impl<R: BufRead> Iterator for PgnReader<R> {
    type Item = Result<Game>;

    fn next(&mut self) -> Option<Result<Game>> {
        self.next_game().transpose()
    }
}

/// Whether a brace comment is still open after `line`. Braces do not nest and
/// `;` comments hide the rest of the line.
fn track_comment(mut open: bool, line: &str) -> bool {
    for c in line.chars() {
        match c {
            '{' if !open => open = true,
            '}' if open => open = false,
            ';' if !open => break,
            _ => {}
        }
    }

    open
}

/// Decodes every game in `reader`, stopping at the first failure.
pub fn read_all<R: BufRead>(reader: R, sink: &mut dyn ProgressSink) -> Result<Vec<Game>> {
    let mut games = vec![];
    for game in PgnReader::new(reader) {
        let game = game?;
        sink.game_decoded(games.len(), &game);
        games.push(game);
    }

    sink.finished(games.len());
    Ok(games)
}

/// Like `read_all`, but frames the stream first and then decodes the records
/// in parallel. On failure the error of the earliest failing game is
/// returned.
pub fn par_decode_all<R: BufRead>(reader: R, sink: &mut dyn ProgressSink) -> Result<Vec<Game>> {
    let mut framer = PgnReader::new(reader);
    let mut records = vec![];
    let mut framing_error = None;
    loop {
        let index = framer.records_read();
        match framer.next_record() {
            Ok(Some(record)) => records.push(record),
            Ok(None) => break,
            Err(err) => {
                framing_error = Some(err.in_game(index));
                break;
            }
        }
    }

    debug!("framed {} records", records.len());
    let decoded: Vec<Result<Game>> = records
        .par_iter()
        .enumerate()
        .map(|(index, record)| decode(record).map_err(|err| err.in_game(index)))
        .collect();

    let mut games = Vec::with_capacity(decoded.len());
    for (index, game) in decoded.into_iter().enumerate() {
        let game = game?;
        sink.game_decoded(index, &game);
        games.push(game);
    }

    // Records before a framing failure decode first, so their errors win.
    if let Some(err) = framing_error {
        return Err(err);
    }

    sink.finished(games.len());
    Ok(games)
}

/// Decodes every game in a string.
pub fn decode_all(text: &str) -> Result<Vec<Game>> {
    read_all(text.as_bytes(), &mut NullProgress)
}
