/// A position in source text, tracking line and column for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Structural event emitted by the scanner.
///
/// Every variant carries the tag name it belongs to, so a consumer never has
/// to track scanner state of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The tag name is complete and attributes may follow.
    TagStart(String),
    /// `>` reached on an opening tag.
    TagOpen(String),
    /// `>` reached on a closing tag (`</name>`).
    TagClose(String),
    /// An attribute name is complete.
    AttributeNameEnd { tag: String, name: String },
    /// A quoted attribute value is complete.
    AttributeValue {
        tag: String,
        name: String,
        value: String,
    },
}

/// An event produced by the HRML scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub span: Span,
}

impl Event {
    pub fn new(kind: EventKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Tag name the event refers to.
    pub fn tag(&self) -> &str {
        match &self.kind {
            EventKind::TagStart(tag) | EventKind::TagOpen(tag) | EventKind::TagClose(tag) => tag,
            EventKind::AttributeNameEnd { tag, .. } | EventKind::AttributeValue { tag, .. } => tag,
        }
    }
}
