//! Markdown AST consumed by the mapper
//!
//! A typed view over mdast: one variant per node type the mapper has rules
//! for, plus [`AstNode::Other`] which keeps any other node's type tag,
//! literal value, children and remaining fields.
//! Reference: https://github.com/syntax-tree/mdast

use markdown::mdast;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// An mdast node
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    // Block nodes
    Root(Parent),
    Paragraph(Parent),
    Blockquote(Parent),
    Heading(Heading),
    Code(Code),
    List(List),
    ListItem(Parent),
    ThematicBreak,

    // Inline nodes
    Strong(Parent),
    Emphasis(Parent),
    InlineCode(Literal),
    Link(Link),
    Image(Image),
    Text(Literal),

    /// Any node type without a dedicated variant
    Other(Other),
}

/// Container node with only children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parent {
    pub children: Vec<AstNode>,
}

/// Leaf node carrying literal text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Literal {
    pub value: String,
}

/// Heading node (# to ######)
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub depth: Option<u8>,
    pub children: Vec<AstNode>,
}

/// Code block node (fenced or indented)
#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub lang: Option<String>,
    pub meta: Option<String>,
    pub value: String,
}

/// List node (ordered or unordered)
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: Option<bool>,
    pub start: Option<u32>,
    pub children: Vec<AstNode>,
}

/// Link node
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub url: Option<String>,
    pub title: Option<String>,
    pub children: Vec<AstNode>,
}

/// Image node
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub url: Option<String>,
    pub title: Option<String>,
    pub alt: Option<String>,
}

/// Node of a type without a dedicated variant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Other {
    /// The mdast `type` tag, e.g. `"delete"` or `"html"`
    pub kind: String,
    pub value: Option<String>,
    pub children: Vec<AstNode>,
    /// Type-specific fields, as they would appear in mdast JSON
    pub fields: Map<String, Value>,
}

impl AstNode {
    /// The mdast `type` tag of this node
    pub fn kind(&self) -> &str {
        match self {
            AstNode::Root(_) => "root",
            AstNode::Paragraph(_) => "paragraph",
            AstNode::Blockquote(_) => "blockquote",
            AstNode::Heading(_) => "heading",
            AstNode::Code(_) => "code",
            AstNode::List(_) => "list",
            AstNode::ListItem(_) => "listItem",
            AstNode::ThematicBreak => "thematicBreak",
            AstNode::Strong(_) => "strong",
            AstNode::Emphasis(_) => "emphasis",
            AstNode::InlineCode(_) => "inlineCode",
            AstNode::Link(_) => "link",
            AstNode::Image(_) => "image",
            AstNode::Text(_) => "text",
            AstNode::Other(o) => &o.kind,
        }
    }

    /// Literal text carried by the node itself, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            AstNode::Text(l) | AstNode::InlineCode(l) => Some(&l.value),
            AstNode::Code(c) => Some(&c.value),
            AstNode::Other(o) => o.value.as_deref(),
            _ => None,
        }
    }

    /// Child nodes; empty for leaves
    pub fn children(&self) -> &[AstNode] {
        match self {
            AstNode::Root(p)
            | AstNode::Paragraph(p)
            | AstNode::Blockquote(p)
            | AstNode::ListItem(p)
            | AstNode::Strong(p)
            | AstNode::Emphasis(p) => &p.children,
            AstNode::Heading(h) => &h.children,
            AstNode::List(l) => &l.children,
            AstNode::Link(l) => &l.children,
            AstNode::Other(o) => &o.children,
            AstNode::Code(_)
            | AstNode::ThematicBreak
            | AstNode::InlineCode(_)
            | AstNode::Image(_)
            | AstNode::Text(_) => &[],
        }
    }

    /// Build a node from mdast JSON, as emitted by remark and other unist tools.
    ///
    /// Never fails: missing or mistyped fields are treated as absent, and a
    /// value that is not an object becomes an [`Other`] node with an empty
    /// kind.
    pub fn from_json(json: &Value) -> AstNode {
        let Some(object) = json.as_object() else {
            return AstNode::Other(Other::default());
        };

        let string = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);
        let children = || {
            object
                .get("children")
                .and_then(Value::as_array)
                .map(|nodes| nodes.iter().map(AstNode::from_json).collect())
                .unwrap_or_default()
        };
        let parent = || Parent {
            children: children(),
        };
        let literal = || Literal {
            value: string("value").unwrap_or_default(),
        };

        let kind = object.get("type").and_then(Value::as_str).unwrap_or_default();
        match kind {
            "root" => AstNode::Root(parent()),
            "paragraph" => AstNode::Paragraph(parent()),
            "blockquote" => AstNode::Blockquote(parent()),
            "heading" => AstNode::Heading(Heading {
                depth: object
                    .get("depth")
                    .and_then(Value::as_u64)
                    .and_then(|d| u8::try_from(d).ok()),
                children: children(),
            }),
            "code" => AstNode::Code(Code {
                lang: string("lang"),
                meta: string("meta"),
                value: string("value").unwrap_or_default(),
            }),
            "list" => AstNode::List(List {
                ordered: object.get("ordered").and_then(Value::as_bool),
                start: object
                    .get("start")
                    .and_then(Value::as_u64)
                    .and_then(|s| u32::try_from(s).ok()),
                children: children(),
            }),
            "listItem" => AstNode::ListItem(parent()),
            "thematicBreak" => AstNode::ThematicBreak,
            "strong" => AstNode::Strong(parent()),
            "emphasis" => AstNode::Emphasis(parent()),
            "inlineCode" => AstNode::InlineCode(literal()),
            "link" => AstNode::Link(Link {
                url: string("url"),
                title: string("title"),
                children: children(),
            }),
            "image" => AstNode::Image(Image {
                url: string("url"),
                title: string("title"),
                alt: string("alt"),
            }),
            "text" => AstNode::Text(literal()),
            _ => {
                let fields = object
                    .iter()
                    .filter(|(key, _)| {
                        !matches!(key.as_str(), "type" | "value" | "children" | "position")
                    })
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                AstNode::Other(Other {
                    kind: kind.to_string(),
                    value: string("value"),
                    children: children(),
                    fields,
                })
            }
        }
    }
}

impl<'de> Deserialize<'de> for AstNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|json| AstNode::from_json(&json))
    }
}

fn convert_children(children: Vec<mdast::Node>) -> Vec<AstNode> {
    children.into_iter().map(AstNode::from).collect()
}

fn parent(children: Vec<mdast::Node>) -> Parent {
    Parent {
        children: convert_children(children),
    }
}

impl Other {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        self.children = children;
        self
    }

    /// Add a field to the bag; `None` leaves the bag untouched
    pub fn with_field(mut self, key: &str, value: Option<impl Into<Value>>) -> Self {
        if let Some(value) = value {
            self.fields.insert(key.to_string(), value.into());
        }
        self
    }
}

fn reference_kind(kind: &mdast::ReferenceKind) -> &'static str {
    match kind {
        mdast::ReferenceKind::Shortcut => "shortcut",
        mdast::ReferenceKind::Collapsed => "collapsed",
        mdast::ReferenceKind::Full => "full",
    }
}

fn align_kind(align: &mdast::AlignKind) -> Value {
    match align {
        mdast::AlignKind::Left => Value::from("left"),
        mdast::AlignKind::Right => Value::from("right"),
        mdast::AlignKind::Center => Value::from("center"),
        mdast::AlignKind::None => Value::Null,
    }
}

impl From<mdast::Node> for AstNode {
    fn from(node: mdast::Node) -> Self {
        use mdast::Node as Md;

        match node {
            Md::Root(n) => AstNode::Root(parent(n.children)),
            Md::Paragraph(n) => AstNode::Paragraph(parent(n.children)),
            Md::Blockquote(n) => AstNode::Blockquote(parent(n.children)),
            Md::Heading(n) => AstNode::Heading(Heading {
                depth: Some(n.depth),
                children: convert_children(n.children),
            }),
            Md::Code(n) => AstNode::Code(Code {
                lang: n.lang,
                meta: n.meta,
                value: n.value,
            }),
            Md::List(n) => AstNode::List(List {
                ordered: Some(n.ordered),
                start: n.start,
                children: convert_children(n.children),
            }),
            Md::ListItem(n) => AstNode::ListItem(parent(n.children)),
            Md::ThematicBreak(_) => AstNode::ThematicBreak,
            Md::Strong(n) => AstNode::Strong(parent(n.children)),
            Md::Emphasis(n) => AstNode::Emphasis(parent(n.children)),
            Md::InlineCode(n) => AstNode::InlineCode(Literal { value: n.value }),
            Md::Link(n) => AstNode::Link(Link {
                url: Some(n.url),
                title: n.title,
                children: convert_children(n.children),
            }),
            Md::Image(n) => AstNode::Image(Image {
                url: Some(n.url),
                title: n.title,
                alt: Some(n.alt),
            }),
            Md::Text(n) => AstNode::Text(Literal { value: n.value }),

            // GFM and other extensions
            Md::Break(_) => AstNode::Other(Other::new("break")),
            Md::Delete(n) => {
                AstNode::Other(Other::new("delete").with_children(convert_children(n.children)))
            }
            Md::Html(n) => AstNode::Other(Other::new("html").with_value(n.value)),
            Md::Table(n) => AstNode::Other(
                Other::new("table")
                    .with_children(convert_children(n.children))
                    .with_field(
                        "align",
                        Some(n.align.iter().map(align_kind).collect::<Vec<_>>()),
                    ),
            ),
            Md::TableRow(n) => {
                AstNode::Other(Other::new("tableRow").with_children(convert_children(n.children)))
            }
            Md::TableCell(n) => {
                AstNode::Other(Other::new("tableCell").with_children(convert_children(n.children)))
            }
            Md::Math(n) => AstNode::Other(
                Other::new("math")
                    .with_value(n.value)
                    .with_field("meta", n.meta),
            ),
            Md::InlineMath(n) => AstNode::Other(Other::new("inlineMath").with_value(n.value)),
            Md::Yaml(n) => AstNode::Other(Other::new("yaml").with_value(n.value)),
            Md::Toml(n) => AstNode::Other(Other::new("toml").with_value(n.value)),
            Md::Definition(n) => AstNode::Other(
                Other::new("definition")
                    .with_field("identifier", Some(n.identifier))
                    .with_field("label", n.label)
                    .with_field("url", Some(n.url))
                    .with_field("title", n.title),
            ),
            Md::FootnoteDefinition(n) => AstNode::Other(
                Other::new("footnoteDefinition")
                    .with_children(convert_children(n.children))
                    .with_field("identifier", Some(n.identifier))
                    .with_field("label", n.label),
            ),
            Md::FootnoteReference(n) => AstNode::Other(
                Other::new("footnoteReference")
                    .with_field("identifier", Some(n.identifier))
                    .with_field("label", n.label),
            ),
            Md::LinkReference(n) => AstNode::Other(
                Other::new("linkReference")
                    .with_children(convert_children(n.children))
                    .with_field("identifier", Some(n.identifier))
                    .with_field("label", n.label)
                    .with_field("referenceType", Some(reference_kind(&n.reference_kind))),
            ),
            Md::ImageReference(n) => AstNode::Other(
                Other::new("imageReference")
                    .with_field("alt", Some(n.alt))
                    .with_field("identifier", Some(n.identifier))
                    .with_field("label", n.label)
                    .with_field("referenceType", Some(reference_kind(&n.reference_kind))),
            ),

            // MDX nodes only appear when MDX constructs are enabled
            Md::MdxJsxFlowElement(n) => AstNode::Other(
                Other::new("mdxJsxFlowElement").with_children(convert_children(n.children)),
            ),
            Md::MdxJsxTextElement(n) => AstNode::Other(
                Other::new("mdxJsxTextElement").with_children(convert_children(n.children)),
            ),
            Md::MdxjsEsm(n) => AstNode::Other(Other::new("mdxjsEsm").with_value(n.value)),
            Md::MdxFlowExpression(n) => {
                AstNode::Other(Other::new("mdxFlowExpression").with_value(n.value))
            }
            Md::MdxTextExpression(n) => {
                AstNode::Other(Other::new("mdxTextExpression").with_value(n.value))
            }
        }
    }
}

// Convenience constructors
impl AstNode {
    pub fn root(children: Vec<AstNode>) -> Self {
        AstNode::Root(Parent { children })
    }

    pub fn text(s: impl Into<String>) -> Self {
        AstNode::Text(Literal { value: s.into() })
    }

    pub fn paragraph(children: Vec<AstNode>) -> Self {
        AstNode::Paragraph(Parent { children })
    }

    pub fn blockquote(children: Vec<AstNode>) -> Self {
        AstNode::Blockquote(Parent { children })
    }

    pub fn heading(depth: u8, children: Vec<AstNode>) -> Self {
        AstNode::Heading(Heading {
            depth: Some(depth),
            children,
        })
    }

    pub fn code(lang: Option<String>, value: impl Into<String>) -> Self {
        AstNode::Code(Code {
            lang,
            meta: None,
            value: value.into(),
        })
    }

    pub fn list(ordered: bool, children: Vec<AstNode>) -> Self {
        AstNode::List(List {
            ordered: Some(ordered),
            start: if ordered { Some(1) } else { None },
            children,
        })
    }

    pub fn list_item(children: Vec<AstNode>) -> Self {
        AstNode::ListItem(Parent { children })
    }

    pub fn thematic_break() -> Self {
        AstNode::ThematicBreak
    }

    pub fn strong(children: Vec<AstNode>) -> Self {
        AstNode::Strong(Parent { children })
    }

    pub fn emphasis(children: Vec<AstNode>) -> Self {
        AstNode::Emphasis(Parent { children })
    }

    pub fn inline_code(value: impl Into<String>) -> Self {
        AstNode::InlineCode(Literal {
            value: value.into(),
        })
    }

    pub fn link(url: impl Into<String>, title: Option<String>, children: Vec<AstNode>) -> Self {
        AstNode::Link(Link {
            url: Some(url.into()),
            title,
            children,
        })
    }

    pub fn image(url: impl Into<String>, title: Option<String>, alt: impl Into<String>) -> Self {
        AstNode::Image(Image {
            url: Some(url.into()),
            title,
            alt: Some(alt.into()),
        })
    }

    pub fn other(kind: impl Into<String>, children: Vec<AstNode>) -> Self {
        AstNode::Other(Other::new(kind).with_children(children))
    }
}
