//! Batch sessions.
//!
//! Input layout:
//!
//! ```text
//! n q            header: document line count, query count
//! <n markup lines>
//! <q query lines>
//! ```
//!
//! The document is fully built before the first query is read. Each query
//! yields exactly one answer; misses never abort the session.

use std::fmt;
use std::io::{self, BufRead, Write};

use hrml_parser::{Document, ParseError, Parser};
use tracing::info;

use crate::path::Answer;

/// Which block of the input ran short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Document,
    Queries,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Document => f.write_str("document"),
            Section::Queries => f.write_str("query"),
        }
    }
}

/// Fatal session error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid header '{0}': expected two counts `<lines> <queries>`")]
    InvalidHeader(String),

    #[error("expected {expected} {section} line(s), found {found}")]
    MissingLines {
        section: Section,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A loaded document plus the number of queries still to answer.
#[derive(Debug)]
pub struct Session {
    document: Document,
    queries: usize,
}

impl Session {
    /// Read the header and the document block from `lines`.
    pub fn load<I>(lines: &mut I) -> Result<Self, SessionError>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let header = lines
            .next()
            .transpose()?
            .ok_or_else(|| SessionError::InvalidHeader(String::new()))?;
        let (count, queries) = parse_header(&header)?;

        let mut parser = Parser::new();
        for found in 0..count {
            let line = lines.next().transpose()?.ok_or(SessionError::MissingLines {
                section: Section::Document,
                expected: count,
                found,
            })?;
            parser.feed_line(&line)?;
        }
        let document = parser.finish()?;

        info!(lines = count, queries, "document loaded");
        Ok(Self { document, queries })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of query lines announced by the header.
    pub fn queries(&self) -> usize {
        self.queries
    }

    /// Answer a single query line.
    pub fn answer(&self, query: &str) -> Answer {
        crate::answer(&self.document, query.strip_suffix('\r').unwrap_or(query))
    }

    /// Answer the announced number of query lines, handing each answer to
    /// `emit` as soon as it is known.
    pub fn answer_all<I, F>(&self, lines: &mut I, mut emit: F) -> Result<usize, SessionError>
    where
        I: Iterator<Item = io::Result<String>>,
        F: FnMut(Answer) -> io::Result<()>,
    {
        for found in 0..self.queries {
            let line = lines.next().transpose()?.ok_or(SessionError::MissingLines {
                section: Section::Queries,
                expected: self.queries,
                found,
            })?;
            emit(self.answer(&line))?;
        }
        Ok(self.queries)
    }

    /// Run a whole session held in memory.
    pub fn run(input: &str) -> Result<Vec<Answer>, SessionError> {
        let mut lines = input.lines().map(|line| Ok::<_, io::Error>(line.to_string()));
        let session = Session::load(&mut lines)?;

        let mut answers = Vec::new();
        session.answer_all(&mut lines, |answer| {
            answers.push(answer);
            Ok(())
        })?;
        Ok(answers)
    }

    /// Run a session from `reader`, writing one answer per line to `writer`.
    /// Returns the number of answers written.
    pub fn run_to<R, W>(reader: R, mut writer: W) -> Result<usize, SessionError>
    where
        R: BufRead,
        W: Write,
    {
        let mut lines = reader.lines();
        let session = Session::load(&mut lines)?;
        let written = session.answer_all(&mut lines, |answer| writeln!(writer, "{answer}"))?;
        writer.flush()?;
        Ok(written)
    }
}

fn parse_header(line: &str) -> Result<(usize, usize), SessionError> {
    let invalid = || SessionError::InvalidHeader(line.trim_end().to_string());
    let mut counts = line.split_whitespace().map(str::parse::<usize>);

    match (counts.next(), counts.next(), counts.next()) {
        (Some(Ok(lines)), Some(Ok(queries)), None) => Ok((lines, queries)),
        _ => Err(invalid()),
    }
}
