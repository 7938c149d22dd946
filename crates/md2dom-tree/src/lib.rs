//! md2dom-tree: DOM-like output tree for md2dom
//!
//! This crate provides the element and text node types that a Markdown
//! AST is mapped onto before being handed to a rich-text importer.
//!
//! ## Example
//!
//! ```rust
//! use md2dom_tree::{Attributes, ElementNode, Node};
//!
//! let root = ElementNode::new(
//!     "div",
//!     Attributes::new(),
//!     vec![Node::element("p", Attributes::new(), vec![Node::text("Hello")])],
//! );
//!
//! assert_eq!(root.text_content(), "Hello");
//! ```

pub mod dom;

pub use dom::{Attributes, ElementNode, NODE_TYPE_ELEMENT, NODE_TYPE_TEXT, Node, TextNode};
