//! Query paths.
//!
//! `.` descends into a child element, `~` descends one last time and switches
//! to the attribute name. Everything after `~` belongs to the attribute name.

use std::fmt;

use hrml_parser::Document;
use tracing::debug;

/// Why a query did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("no child element named '{name}'")]
    ChildNotFound { name: String },

    #[error("no attribute named '{name}'")]
    AttributeNotFound { name: String },
}

/// A parsed query: child names to descend through, then an attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPath {
    pub segments: Vec<String>,
    pub attribute: String,
}

impl QueryPath {
    /// Split a raw query into segments and attribute name.
    ///
    /// Characters after the last `.` are only kept if a `~` follows them; a
    /// query without `~` therefore has an empty attribute name.
    pub fn parse(query: &str) -> Self {
        let mut path = QueryPath::default();
        let mut segment = String::new();
        let mut in_attribute = false;

        for ch in query.chars() {
            if in_attribute {
                path.attribute.push(ch);
                continue;
            }
            match ch {
                '.' => path.segments.push(std::mem::take(&mut segment)),
                '~' => {
                    path.segments.push(std::mem::take(&mut segment));
                    in_attribute = true;
                }
                c => segment.push(c),
            }
        }

        path
    }

    /// Walk `doc` from its root and return the attribute value.
    ///
    /// An empty attribute name never matches.
    pub fn resolve<'d>(&self, doc: &'d Document) -> Result<&'d str, QueryError> {
        let mut current = doc.root();
        for segment in &self.segments {
            current = doc
                .child(current, segment)
                .ok_or_else(|| QueryError::ChildNotFound {
                    name: segment.clone(),
                })?;
        }

        let missing = || QueryError::AttributeNotFound {
            name: self.attribute.clone(),
        };
        if self.attribute.is_empty() {
            return Err(missing());
        }
        let value = doc.attribute(current, &self.attribute).ok_or_else(missing)?;
        debug!(path = %self, "resolved");
        Ok(value)
    }
}

impl fmt::Display for QueryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.segments.join("."), self.attribute)
    }
}

/// The printable outcome of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Found(String),
    NotFound,
}

impl Answer {
    /// Text printed for every miss.
    pub const NOT_FOUND: &'static str = "Not Found!";

    pub fn is_found(&self) -> bool {
        matches!(self, Answer::Found(_))
    }
}

impl From<Result<&str, QueryError>> for Answer {
    fn from(result: Result<&str, QueryError>) -> Self {
        match result {
            Ok(value) => Answer::Found(value.to_string()),
            Err(e) => {
                debug!(error = %e, "query missed");
                Answer::NotFound
            }
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Found(value) => f.write_str(value),
            Answer::NotFound => f.write_str(Self::NOT_FOUND),
        }
    }
}
