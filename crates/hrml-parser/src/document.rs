//! Arena-backed element tree.
//!
//! Every element is stored once in `Document::elements` and addressed by an
//! `ElementId`. Parents map child names to ids, so ownership is strictly
//! hierarchical and there are no back-references.

use std::collections::BTreeMap;

/// Index of an element inside its `Document`.
///
/// Ids are only minted by the document that owns the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// One tagged node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: BTreeMap<String, ElementId>,
}

impl Element {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: BTreeMap::new(),
        }
    }
}

/// A parsed document with a synthetic root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    elements: Vec<Element>,
    root: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Name of the synthetic root element.
    pub const ROOT_NAME: &'static str = "root";

    /// Create a document holding only the root.
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new(Self::ROOT_NAME)],
            root: ElementId(0),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Element behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was minted by a different, smaller document. Use
    /// [`Document::get`] when the id's origin is not known.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    /// Element behind `id`, or `None` if this document never minted it.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// Look up a direct child of `parent` by tag name.
    pub fn child(&self, parent: ElementId, name: &str) -> Option<ElementId> {
        self.element(parent).children.get(name).copied()
    }

    /// Look up an attribute value on `id`.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id).attributes.get(name).map(String::as_str)
    }

    /// Depth-first walk below `id`, yielding `(depth, id)` with children in
    /// name order. `id` itself is not yielded.
    pub fn descendants(&self, id: ElementId) -> Descendants<'_> {
        let stack = self
            .element(id)
            .children
            .values()
            .rev()
            .map(|&child| (1, child))
            .collect();
        Descendants { doc: self, stack }
    }

    /// Create an element named `name` under `parent`.
    ///
    /// An existing child with the same name is replaced; its subtree stays in
    /// the arena but is no longer reachable. Returns the new id and the id of
    /// the replaced child, if any.
    pub(crate) fn insert_child(
        &mut self,
        parent: ElementId,
        name: &str,
    ) -> (ElementId, Option<ElementId>) {
        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(name));
        let replaced = self.elements[parent.0].children.insert(name.to_string(), id);
        (id, replaced)
    }

    /// Set an attribute, returning the previous value. Last write wins.
    pub(crate) fn set_attribute(
        &mut self,
        id: ElementId,
        name: String,
        value: String,
    ) -> Option<String> {
        self.elements[id.0].attributes.insert(name, value)
    }
}

/// Iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<(usize, ElementId)>,
}

impl Iterator for Descendants<'_> {
    type Item = (usize, ElementId);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        self.stack.extend(
            self.doc
                .element(id)
                .children
                .values()
                .rev()
                .map(|&child| (depth + 1, child)),
        );
        Some((depth, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_document_has_root_only() {
        let doc = Document::new();
        assert_eq!(doc.element(doc.root()).name, "root");
        assert_eq!(doc.descendants(doc.root()).count(), 0);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut doc = Document::new();
        let (a, replaced) = doc.insert_child(doc.root(), "a");
        assert_eq!(replaced, None);
        doc.set_attribute(a, "x".into(), "1".into());

        assert_eq!(doc.child(doc.root(), "a"), Some(a));
        assert_eq!(doc.attribute(a, "x"), Some("1"));
        assert_eq!(doc.attribute(a, "y"), None);
        assert_eq!(doc.child(a, "a"), None);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut doc = Document::new();
        let root = doc.root();
        let (first, _) = doc.insert_child(root, "a");
        doc.set_attribute(first, "x".into(), "old".into());
        let (second, replaced) = doc.insert_child(root, "a");

        assert_eq!(replaced, Some(first));
        assert_eq!(doc.child(root, "a"), Some(second));
        assert_eq!(doc.attribute(second, "x"), None);
    }

    #[test]
    fn test_get_with_foreign_id() {
        let mut big = Document::new();
        let (a, _) = big.insert_child(big.root(), "a");
        let small = Document::new();

        assert_eq!(small.get(a), None);
        assert_eq!(big.get(a).map(|e| e.name.as_str()), Some("a"));
        assert_eq!(small.get(small.root()).map(|e| e.name.as_str()), Some("root"));
    }

    #[test]
    fn test_attribute_last_write_wins() {
        let mut doc = Document::new();
        let (a, _) = doc.insert_child(doc.root(), "a");
        assert_eq!(doc.set_attribute(a, "x".into(), "1".into()), None);
        assert_eq!(doc.set_attribute(a, "x".into(), "2".into()), Some("1".into()));
        assert_eq!(doc.attribute(a, "x"), Some("2"));
    }

    #[test]
    fn test_descendants_depth_first_in_name_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let (b, _) = doc.insert_child(root, "b");
        doc.insert_child(b, "c");
        doc.insert_child(root, "a");

        let names: Vec<_> = doc
            .descendants(root)
            .map(|(depth, id)| (depth, doc.element(id).name.as_str()))
            .collect();
        assert_eq!(names, vec![(1, "a"), (1, "b"), (2, "c")]);
    }
}
