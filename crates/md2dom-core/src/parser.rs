//! Markdown entry point
//!
//! Parses Markdown through a [`MarkdownParser`] and maps the resulting
//! mdast onto a DOM tree.

use md2dom_tree::{ElementNode, Node};
use thiserror::Error;

use crate::ast::AstNode;
use crate::convert::{NodeRules, ast_to_dom_with_rules};
use crate::options::ParserOptions;

/// Parser errors
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reported by the Markdown parser itself
    #[error("Markdown parse error: {0}")]
    Markdown(String),

    #[error("Parser returned a text node where a root element was expected")]
    NotAnElement,
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Virtual source file handed to the parser
///
/// The path components are informational only; nothing is read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFile<'a> {
    pub directory: &'a str,
    pub filename: &'a str,
    pub extension: &'a str,
    pub contents: &'a str,
}

impl<'a> SourceFile<'a> {
    /// `~/example.txt` holding `contents`
    pub fn virtual_file(contents: &'a str) -> Self {
        Self {
            directory: "~",
            filename: "example",
            extension: "txt",
            contents,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{}/{}.{}", self.directory, self.filename, self.extension)
    }
}

/// A Markdown parser producing an mdast root
pub trait MarkdownParser {
    fn parse(&self, source: &SourceFile<'_>, options: &ParserOptions) -> ParseResult<AstNode>;
}

/// [`MarkdownParser`] backed by the `markdown` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRsParser;

impl MarkdownParser for MarkdownRsParser {
    fn parse(&self, source: &SourceFile<'_>, options: &ParserOptions) -> ParseResult<AstNode> {
        let mdast = markdown::to_mdast(source.contents, &options.to_markdown_options())
            .map_err(|e| ParseError::Markdown(e.to_string()))?;
        Ok(AstNode::from(mdast))
    }
}

/// Parse Markdown into a DOM tree rooted at a `div` element
///
/// `options` are merged over [`ParserOptions::default`].
pub fn parse_markdown(markdown: &str, options: Option<&ParserOptions>) -> ParseResult<ElementNode> {
    parse_markdown_with(&MarkdownRsParser, NodeRules::builtin(), markdown, options)
}

/// Parse Markdown with a custom parser and rule registry
pub fn parse_markdown_with<P: MarkdownParser + ?Sized>(
    parser: &P,
    rules: &NodeRules,
    markdown: &str,
    options: Option<&ParserOptions>,
) -> ParseResult<ElementNode> {
    let defaults = ParserOptions::default();
    let options = match options {
        Some(options) => defaults.merged(options),
        None => defaults,
    };

    let source = SourceFile::virtual_file(markdown);
    log::trace!(
        "parsing {} ({} bytes) with options {:?}",
        source.display_name(),
        markdown.len(),
        options
    );

    let root = parser.parse(&source, &options)?;
    match ast_to_dom_with_rules(&root, rules) {
        Node::Element(element) => Ok(element),
        Node::Text(_) => Err(ParseError::NotAnElement),
    }
}
