//! HRML Query
//!
//! Resolves dotted/tilde paths such as `tag1.tag2~name` against a parsed
//! `Document`, and runs the batch protocol that pairs one document with a
//! list of queries.
//!
//! ```text
//! "n q" header → n markup lines → Document → q queries → q answers
//! ```

pub mod path;
pub mod session;

pub use path::{Answer, QueryError, QueryPath};
pub use session::{Section, Session, SessionError};

use hrml_parser::Document;

/// Resolve a raw query string against `doc`.
///
/// Misses never fail the caller; they come back as [`Answer::NotFound`].
pub fn answer(doc: &Document, query: &str) -> Answer {
    QueryPath::parse(query).resolve(doc).into()
}
