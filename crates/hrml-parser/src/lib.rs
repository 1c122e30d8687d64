//! HRML Parser
//!
//! Builds an element tree from the scanner's event stream.
//! The tree lives in an arena (`Document`) and elements refer to their
//! children by `ElementId`; the open-element stack holds ids into the same
//! arena, so stack and tree can never disagree.

pub mod builder;
pub mod document;
pub mod parser;

pub use builder::TreeBuilder;
pub use document::{Document, Element, ElementId};
pub use parser::Parser;

use hrml_lexer::LexerError;

/// Fatal document error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lexer(#[from] LexerError),

    /// A closing tag arrived while no element was open.
    #[error("Parse error at line {line}, column {column}: closing tag '{tag}' has no open element")]
    StackUnderflow {
        tag: String,
        line: usize,
        column: usize,
    },

    /// Elements were still open when the input ended (innermost last).
    #[error("Parse error: unclosed element(s) at end of input: {}", .tags.join(", "))]
    Unclosed { tags: Vec<String> },
}
