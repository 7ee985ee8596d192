//! Owned XML element tree for Classic API responses.
//!
//! Response bodies are parsed with `roxmltree` and copied into an owned
//! tree of [`XmlElement`]s holding tag, text and child elements in document
//! order. Attributes, comments and processing instructions are dropped.

use crate::error::{JssError, Result};

/// A single XML element with its child elements in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Local tag name (namespaces are not used by the Classic API).
    pub tag: String,
    /// Direct text content, `None` for empty elements.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parses an XML document and returns its root element.
    ///
    /// `source` names the document in the error (normally the request URL).
    pub fn parse(xml: &str, source: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| JssError::Parse {
            url: source.to_string(),
            source: e,
        })?;
        Ok(Self::from_node(doc.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let text: String = node
            .children()
            .filter(|c| c.is_text())
            .filter_map(|c| c.text())
            .collect();
        XmlElement {
            tag: node.tag_name().name().to_string(),
            text: if text.is_empty() { None } else { Some(text) },
            children: node
                .children()
                .filter(|c| c.is_element())
                .map(Self::from_node)
                .collect(),
        }
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All direct children with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// First element reached by a `/`-separated path of child tags.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        path.split('/').try_fold(self, |el, tag| el.child(tag))
    }

    /// Every element matching a `/`-separated path, in document order.
    ///
    /// Intermediate steps fan out over all matching children, so
    /// `scripts/script` returns each script under each `scripts`.
    pub fn find_all(&self, path: &str) -> Vec<&XmlElement> {
        path.split('/').fold(vec![self], |level, tag| {
            level
                .into_iter()
                .flat_map(|el| el.children.iter().filter(move |c| c.tag == tag))
                .collect()
        })
    }

    /// Text of the element at `path`, if the element exists.
    ///
    /// An element that exists but is empty yields `Some("")`.
    pub fn find_text(&self, path: &str) -> Option<&str> {
        self.find(path).map(XmlElement::text_or_empty)
    }

    /// Element text, with an empty element reading as `""`.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
