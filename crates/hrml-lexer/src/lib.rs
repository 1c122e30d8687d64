//! HRML Lexer
//!
//! Scans HRML markup lines into a stream of structural events.
//! Each line is scanned by a small character-level state machine with four
//! exclusive modes (tag name, attribute name, attribute value, neutral).
//!
//! # Example
//!
//! ```
//! use hrml_lexer::{EventKind, Scanner};
//!
//! let events = Scanner::tokenize("<a value=\"5\">\n</a>").unwrap();
//! assert_eq!(events[0].kind, EventKind::TagStart("a".into()));
//! ```

pub mod event;
pub mod scanner;

pub use event::{Event, EventKind, Span};
pub use scanner::{Mode, ScanState, Scanner};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}
