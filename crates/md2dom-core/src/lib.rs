//! md2dom-core: Core library for mapping Markdown to DOM-like trees
//!
//! This crate provides:
//! - A typed mdast representation, built from the `markdown` crate or mdast JSON
//! - Parser options with explicit defaults
//! - Table-driven mdast to DOM tree conversion
//! - The `parse_markdown` entry point and a rich-text importer hand-off
//!
//! # Example
//!
//! ```
//! use md2dom_core::parse_markdown;
//!
//! let root = parse_markdown("# Title", None).unwrap();
//! assert_eq!(root.tag_name, "div");
//! assert_eq!(root.text_content(), "Title");
//! ```

pub mod ast;
pub mod convert;
pub mod importer;
pub mod options;
pub mod parser;

pub use ast::AstNode;
pub use convert::{NodeRule, NodeRules, TagRule, ast_to_dom, ast_to_dom_with_rules};
pub use importer::{StateImporter, state_from_markdown};
pub use md2dom_tree::{Attributes, ElementNode, Node, TextNode};
pub use options::ParserOptions;
pub use parser::{
    MarkdownParser, MarkdownRsParser, ParseError, ParseResult, SourceFile, parse_markdown,
    parse_markdown_with,
};
