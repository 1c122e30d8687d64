//! Tree builder driven by scanner events.

use crate::document::{Document, ElementId};
use crate::ParseError;
use hrml_lexer::{Event, EventKind};
use tracing::{debug, warn};

/// Builds a `Document` from a stream of scanner events.
///
/// The open-element stack holds ids into the document arena. The root is
/// implicit: it is the current element whenever the stack is empty and can
/// never be closed.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    document: Document,
    stack: Vec<ElementId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element currently accepting attributes and children.
    pub fn current(&self) -> ElementId {
        self.stack.last().copied().unwrap_or(self.document.root())
    }

    /// Number of open elements, not counting the root.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Apply one scanner event to the tree.
    pub fn feed(&mut self, event: Event) -> Result<(), ParseError> {
        match event.kind {
            EventKind::TagStart(name) => {
                let parent = self.current();
                let (id, replaced) = self.document.insert_child(parent, &name);
                if replaced.is_some() {
                    debug!(tag = %name, line = event.span.line, "replacing existing child");
                }
                debug!(tag = %name, depth = self.stack.len() + 1, "open element");
                self.stack.push(id);
            }
            EventKind::TagOpen(_) | EventKind::AttributeNameEnd { .. } => {}
            EventKind::TagClose(name) => {
                let Some(id) = self.stack.pop() else {
                    return Err(ParseError::StackUnderflow {
                        tag: name,
                        line: event.span.line,
                        column: event.span.column,
                    });
                };
                let open = &self.document.element(id).name;
                if *open != name {
                    warn!(
                        expected = %open,
                        found = %name,
                        line = event.span.line,
                        "closing tag does not match open element"
                    );
                }
            }
            EventKind::AttributeValue { name, value, .. } => {
                let id = self.current();
                self.document.set_attribute(id, name, value);
            }
        }
        Ok(())
    }

    /// Finish building. Every opened element must have been closed.
    pub fn finish(self) -> Result<Document, ParseError> {
        if !self.stack.is_empty() {
            let tags = self
                .stack
                .iter()
                .map(|&id| self.document.element(id).name.clone())
                .collect();
            return Err(ParseError::Unclosed { tags });
        }
        Ok(self.document)
    }
}
