//! Hand-off to rich-text state importers

use md2dom_tree::ElementNode;

use crate::options::ParserOptions;
use crate::parser::{ParseResult, parse_markdown};

/// Builds an editor document state from a DOM tree
pub trait StateImporter {
    type State;

    fn state_from_element(&self, element: &ElementNode) -> Self::State;
}

/// Parse Markdown and feed the resulting tree to `importer`
pub fn state_from_markdown<I: StateImporter + ?Sized>(
    importer: &I,
    markdown: &str,
    options: Option<&ParserOptions>,
) -> ParseResult<I::State> {
    let element = parse_markdown(markdown, options)?;
    Ok(importer.state_from_element(&element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use md2dom_tree::Node;

    /// One block per top-level element, as `(tag, text)`
    struct BlockImporter;

    impl StateImporter for BlockImporter {
        type State = Vec<(String, String)>;

        fn state_from_element(&self, element: &ElementNode) -> Self::State {
            element
                .children
                .iter()
                .filter_map(Node::as_element)
                .map(|block| (block.tag_name.clone(), block.text_content()))
                .collect()
        }
    }

    #[test]
    fn test_state_from_markdown() {
        let state = state_from_markdown(&BlockImporter, "# Title\n\nBody *text*", None).unwrap();
        assert_eq!(
            state,
            vec![
                ("h1".to_string(), "Title".to_string()),
                ("p".to_string(), "Body text".to_string()),
            ]
        );
    }
}
