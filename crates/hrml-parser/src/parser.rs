//! Line-oriented document parser for HRML.
//!
//! Feeds markup lines through the scanner and the tree builder in a single
//! pass and hands back the finished `Document`.

use crate::builder::TreeBuilder;
use crate::document::Document;
use crate::ParseError;
use hrml_lexer::Scanner;

/// HRML document parser.
#[derive(Debug, Default)]
pub struct Parser {
    scanner: Scanner,
    builder: TreeBuilder,
}

impl Parser {
    /// Create a parser positioned before the first line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole source string into a document.
    pub fn parse(source: &str) -> Result<Document, ParseError> {
        Self::parse_lines(source.lines())
    }

    /// Parse a sequence of lines into a document.
    pub fn parse_lines<I>(lines: I) -> Result<Document, ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut parser = Parser::new();
        for line in lines {
            parser.feed_line(line.as_ref())?;
        }
        parser.finish()
    }

    /// Scan one line and apply its events to the tree.
    pub fn feed_line(&mut self, line: &str) -> Result<(), ParseError> {
        for event in self.scanner.scan_line(line)? {
            self.builder.feed(event)?;
        }
        Ok(())
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.scanner.line()
    }

    /// Finish parsing and return the document.
    pub fn finish(self) -> Result<Document, ParseError> {
        let document = self.builder.finish()?;
        tracing::debug!(lines = self.scanner.line(), "document parsed");
        Ok(document)
    }
}
