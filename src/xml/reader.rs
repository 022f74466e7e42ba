//! Document Lookup Helpers
//!
//! WPS servers disagree on prefixes and on which OWS namespace revision they
//! use, and DescribeProcess documents leave many children unqualified. All
//! lookups here therefore compare element and attribute *local* names only.

use roxmltree::{Document, Node};

use crate::error::Result;

/// Parses an XML string into a document tree.
pub fn parse_document(text: &str) -> Result<Document<'_>> {
    Ok(Document::parse(text)?)
}

/// Lookup operations over an element node.
pub trait ElementExt<'a, 'input: 'a> {
    /// Returns the element's local name (no namespace, no prefix).
    fn local_name(&self) -> &str;

    /// Returns true if this is an element with the given local name.
    fn is_named(&self, name: &str) -> bool;

    /// Returns the first child element with the given local name.
    fn child_element(&self, name: &str) -> Option<Node<'a, 'input>>;

    /// Returns all child elements with the given local name, in document order.
    fn child_elements(&self, name: &str) -> Vec<Node<'a, 'input>>;

    /// Returns the first element child, whatever its name.
    fn first_element_child(&self) -> Option<Node<'a, 'input>>;

    /// Follows a path of local names, taking the first match at each level.
    fn find_path(&self, path: &[&str]) -> Option<Node<'a, 'input>>;

    /// Returns every element reachable through a path of local names.
    ///
    /// All matches are followed at every level, so
    /// `find_all_path(&["DataInputs", "Input"])` returns each `Input`
    /// under each `DataInputs`.
    fn find_all_path(&self, path: &[&str]) -> Vec<Node<'a, 'input>>;

    /// Returns an attribute value by local name, ignoring its namespace.
    fn attr(&self, name: &str) -> Option<String>;

    /// Returns the concatenated, trimmed text of this element.
    ///
    /// `None` when the element holds no non-whitespace text.
    fn text_content(&self) -> Option<String>;

    /// Returns the trimmed text of the first child element with the given name.
    fn child_text(&self, name: &str) -> Option<String>;

    /// Returns the element's content as written in the source document.
    ///
    /// Text-only content is unescaped and trimmed. Mixed or element content
    /// is returned verbatim, markup included.
    fn inner_content(&self) -> Option<String>;
}

impl<'a, 'input: 'a> ElementExt<'a, 'input> for Node<'a, 'input> {
    fn local_name(&self) -> &str {
        self.tag_name().name()
    }

    fn is_named(&self, name: &str) -> bool {
        self.is_element() && self.tag_name().name() == name
    }

    fn child_element(&self, name: &str) -> Option<Node<'a, 'input>> {
        self.children().find(|n| n.is_named(name))
    }

    fn child_elements(&self, name: &str) -> Vec<Node<'a, 'input>> {
        self.children().filter(|n| n.is_named(name)).collect()
    }

    fn first_element_child(&self) -> Option<Node<'a, 'input>> {
        self.children().find(|n| n.is_element())
    }

    fn find_path(&self, path: &[&str]) -> Option<Node<'a, 'input>> {
        let mut current = *self;
        for name in path {
            current = current.child_element(name)?;
        }
        Some(current)
    }

    fn find_all_path(&self, path: &[&str]) -> Vec<Node<'a, 'input>> {
        let mut current = vec![*self];
        for name in path {
            current = current
                .iter()
                .flat_map(|node| node.child_elements(name))
                .collect();
        }
        current
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attributes()
            .find(|a| a.name() == name)
            .map(|a| a.value().to_string())
    }

    fn text_content(&self) -> Option<String> {
        let text: String = self
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn child_text(&self, name: &str) -> Option<String> {
        self.child_element(name).and_then(|n| n.text_content())
    }

    fn inner_content(&self) -> Option<String> {
        if self.first_element_child().is_none() {
            return self.text_content();
        }

        let first = self.first_child()?;
        let last = self.last_child()?;
        let source = self.document().input_text();
        let raw = source.get(first.range().start..last.range().end)?;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
