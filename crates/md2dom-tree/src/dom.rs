//! DOM-like output tree
//!
//! A minimal element/text node model, shaped after the DOM so that
//! rich-text importers which walk `nodeType`, `tagName`, attributes and
//! `childNodes` can consume it directly.

use serde::{Deserialize, Serialize};

/// `nodeType` of an element node (matches the DOM constant)
pub const NODE_TYPE_ELEMENT: u8 = 1;

/// `nodeType` of a text node (matches the DOM constant)
pub const NODE_TYPE_TEXT: u8 = 3;

/// A node in the output tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "camelCase")]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
}

/// Literal text leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
}

/// Tagged element with attributes and children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag_name: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Ordered attribute list with unique keys
///
/// Serialized as an array of `[key, value]` pairs. Duplicate keys in
/// deserialized input collapse onto the first occurrence, keeping the
/// last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>", into = "Vec<(String, String)>")]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up an attribute value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute.
    ///
    /// An existing key keeps its position and takes the new value;
    /// a new key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    /// Iterate over `(key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }
}

impl From<Vec<(String, String)>> for Attributes {
    fn from(pairs: Vec<(String, String)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<Attributes> for Vec<(String, String)> {
    fn from(attributes: Attributes) -> Self {
        attributes.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.set(key, value);
        }
        attributes
    }
}

// Convenience constructors
impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(TextNode { text: s.into() })
    }

    pub fn element(
        tag_name: impl Into<String>,
        attributes: Attributes,
        children: Vec<Node>,
    ) -> Self {
        Node::Element(ElementNode::new(tag_name, attributes, children))
    }

    /// DOM `nodeType` of this node
    pub fn node_type(&self) -> u8 {
        match self {
            Node::Element(_) => NODE_TYPE_ELEMENT,
            Node::Text(_) => NODE_TYPE_TEXT,
        }
    }

    /// Concatenated text of this node and all of its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&t.text),
            Node::Element(e) => {
                for child in &e.children {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(&t.text),
            Node::Element(_) => None,
        }
    }
}

impl From<ElementNode> for Node {
    fn from(element: ElementNode) -> Self {
        Node::Element(element)
    }
}

impl From<TextNode> for Node {
    fn from(text: TextNode) -> Self {
        Node::Text(text)
    }
}

impl ElementNode {
    pub fn new(tag_name: impl Into<String>, attributes: Attributes, children: Vec<Node>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes,
            children,
        }
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Direct element children, skipping text leaves
    pub fn element_children(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}
