//! mdast to DOM tree conversion
//!
//! Maps an [`AstNode`] tree onto element and text nodes. Each node type is
//! handled by a [`NodeRule`] looked up by its mdast `type` tag; types with
//! no rule become `span` elements.

use std::collections::HashMap;
use std::sync::LazyLock;

use md2dom_tree::{Attributes, ElementNode, Node};

use crate::ast::AstNode;

/// Tag used for node types without a rule
pub const FALLBACK_TAG: &str = "span";

/// Computes attributes from the source node
pub type AttributeFn = fn(&AstNode) -> Attributes;

/// Rewrites the mapped children of a node
pub type ChildrenFn = fn(Vec<Node>) -> Vec<Node>;

/// How the tag name of an element is chosen
#[derive(Debug, Clone, Copy)]
pub enum TagRule {
    Static(&'static str),
    Dynamic(fn(&AstNode) -> String),
}

impl TagRule {
    fn resolve(&self, node: &AstNode) -> String {
        match self {
            TagRule::Static(tag) => (*tag).to_string(),
            TagRule::Dynamic(rule) => rule(node),
        }
    }
}

/// Mapping rule for one node type
#[derive(Debug, Clone, Copy)]
pub struct NodeRule {
    pub tag: TagRule,
    /// Defaults to no attributes
    pub attributes: Option<AttributeFn>,
    /// Defaults to passing children through unchanged
    pub children: Option<ChildrenFn>,
}

impl NodeRule {
    pub const fn tag(tag: &'static str) -> Self {
        Self {
            tag: TagRule::Static(tag),
            attributes: None,
            children: None,
        }
    }

    pub const fn dynamic(rule: fn(&AstNode) -> String) -> Self {
        Self {
            tag: TagRule::Dynamic(rule),
            attributes: None,
            children: None,
        }
    }

    pub const fn with_attributes(mut self, rule: AttributeFn) -> Self {
        self.attributes = Some(rule);
        self
    }

    pub const fn with_children(mut self, rule: ChildrenFn) -> Self {
        self.children = Some(rule);
        self
    }
}

const BUILTIN_RULES: &[(&str, NodeRule)] = &[
    // Block nodes
    ("root", NodeRule::tag("div")),
    ("paragraph", NodeRule::tag("p")),
    ("blockquote", NodeRule::tag("blockquote")),
    ("heading", NodeRule::dynamic(heading_tag)),
    (
        "code",
        NodeRule::tag("pre")
            .with_attributes(code_attributes)
            .with_children(wrap_in_code),
    ),
    ("list", NodeRule::dynamic(list_tag)),
    ("listItem", NodeRule::tag("li")),
    ("thematicBreak", NodeRule::tag("hr")),
    // Inline nodes
    ("strong", NodeRule::tag("strong")),
    ("emphasis", NodeRule::tag("em")),
    ("inlineCode", NodeRule::tag("code")),
    ("link", NodeRule::tag("a").with_attributes(link_attributes)),
    ("image", NodeRule::tag("img").with_attributes(image_attributes)),
    ("delete", NodeRule::tag("del")),
    ("break", NodeRule::tag("br")),
];

static BUILTIN: LazyLock<NodeRules> = LazyLock::new(NodeRules::default);

/// Rule registry keyed by mdast `type` tag
#[derive(Debug, Clone)]
pub struct NodeRules {
    rules: HashMap<String, NodeRule>,
}

impl Default for NodeRules {
    fn default() -> Self {
        Self {
            rules: BUILTIN_RULES
                .iter()
                .map(|(kind, rule)| (kind.to_string(), *rule))
                .collect(),
        }
    }
}

impl NodeRules {
    /// Shared instance of the built-in rules
    pub fn builtin() -> &'static NodeRules {
        &BUILTIN
    }

    /// Registry with no rules; every element becomes a `span`
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add or replace the rule for a node type
    pub fn with_rule(mut self, kind: impl Into<String>, rule: NodeRule) -> Self {
        self.rules.insert(kind.into(), rule);
        self
    }

    pub fn get(&self, kind: &str) -> Option<&NodeRule> {
        self.rules.get(kind)
    }
}

/// Convert an mdast node to a DOM node using the built-in rules
pub fn ast_to_dom(node: &AstNode) -> Node {
    ast_to_dom_with_rules(node, NodeRules::builtin())
}

/// Convert an mdast node to a DOM node using a custom rule registry
pub fn ast_to_dom_with_rules(node: &AstNode, rules: &NodeRules) -> Node {
    Converter { rules }.convert_node(node)
}

struct Converter<'a> {
    rules: &'a NodeRules,
}

impl Converter<'_> {
    fn convert_node(&self, node: &AstNode) -> Node {
        match node {
            AstNode::Text(text) => Node::text(text.value.as_str()),
            _ => Node::Element(self.convert_element(node)),
        }
    }

    fn convert_element(&self, node: &AstNode) -> ElementNode {
        // A literal value stands in for the child list
        let children = match node.value() {
            Some(value) => vec![Node::text(value)],
            None => node
                .children()
                .iter()
                .map(|child| self.convert_node(child))
                .collect(),
        };

        match self.rules.get(node.kind()) {
            Some(rule) => {
                let attributes = rule
                    .attributes
                    .map_or_else(Attributes::new, |attributes| attributes(node));
                let children = match rule.children {
                    Some(rewrite) => rewrite(children),
                    None => children,
                };
                ElementNode::new(rule.tag.resolve(node), attributes, children)
            }
            None => {
                log::debug!(
                    "no rule for mdast node type {:?}, using <{}>",
                    node.kind(),
                    FALLBACK_TAG
                );
                ElementNode::new(FALLBACK_TAG, Attributes::new(), children)
            }
        }
    }
}

fn heading_tag(node: &AstNode) -> String {
    match node {
        AstNode::Heading(heading) => match heading.depth {
            Some(depth) => format!("h{}", depth),
            None => "h".to_string(),
        },
        _ => "h".to_string(),
    }
}

fn list_tag(node: &AstNode) -> String {
    let tag = match node {
        AstNode::List(list) if list.ordered == Some(true) => "ol",
        _ => "ul",
    };
    tag.to_string()
}

/// Attributes from `(key, field)` pairs, skipping absent fields
fn present_attributes(pairs: &[(&str, &Option<String>)]) -> Attributes {
    pairs
        .iter()
        .filter_map(|(key, value)| value.as_deref().map(|value| (*key, value)))
        .collect()
}

fn link_attributes(node: &AstNode) -> Attributes {
    match node {
        AstNode::Link(link) => present_attributes(&[("href", &link.url), ("title", &link.title)]),
        _ => Attributes::new(),
    }
}

fn image_attributes(node: &AstNode) -> Attributes {
    match node {
        AstNode::Image(image) => present_attributes(&[
            ("src", &image.url),
            ("title", &image.title),
            ("alt", &image.alt),
        ]),
        _ => Attributes::new(),
    }
}

fn code_attributes(node: &AstNode) -> Attributes {
    match node {
        AstNode::Code(code) => present_attributes(&[("lang", &code.lang)]),
        _ => Attributes::new(),
    }
}

/// `<pre><code>…</code></pre>` nesting for code blocks
fn wrap_in_code(children: Vec<Node>) -> Vec<Node> {
    vec![Node::element("code", Attributes::new(), children)]
}
