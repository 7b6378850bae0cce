//! AST definitions for hsml templates
//!
//! The tree is built once per compile call by the tree builder and walked once by the
//! emitter. All variant sets are closed enums so every consumer matches exhaustively.
//!
//! ## Shape
//!
//! - [`Document`] is the implicit root; it owns the root-level nodes in source order.
//! - [`Node::Element`] carries a [`TagHead`] and its children.
//! - [`Node::Text`], [`Node::Comment`] and [`Node::Doctype`] are leaves.

use serde::Serialize;

/// Elements that never have a closing tag or content.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Check a tag name against the void element table (ASCII case-insensitive).
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag_name))
}

/// The implicit document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes below the root.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&Node> = self.children.iter().collect();
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children());
        }
        count
    }
}

/// A node of the template tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
    Doctype(DoctypeNode),
}

impl Node {
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(element) => &element.children,
            Node::Text(_) | Node::Comment(_) | Node::Doctype(_) => &[],
        }
    }

    /// Mutable access to the child list; only elements have one.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element(element) => Some(&mut element.children),
            Node::Text(_) | Node::Comment(_) | Node::Doctype(_) => None,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Node::Element(element) => element.line,
            Node::Text(text) => text.line,
            Node::Comment(comment) => comment.line,
            Node::Doctype(doctype) => doctype.line,
        }
    }

    pub fn indent_depth(&self) -> usize {
        match self {
            Node::Element(element) => element.indent_depth,
            Node::Text(text) => text.indent_depth,
            Node::Comment(comment) => comment.indent_depth,
            Node::Doctype(_) => 0,
        }
    }

    /// Human readable node kind, used in diagnostics and tree views.
    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Element(_) => "Element",
            Node::Text(_) => "Text",
            Node::Comment(comment) if comment.native => "Comment",
            Node::Comment(_) => "DevComment",
            Node::Doctype(_) => "Doctype",
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// An element introduced by a tag head line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementNode {
    pub head: TagHead,
    pub children: Vec<Node>,
    pub indent_depth: usize,
    pub line: usize,
}

impl ElementNode {
    pub fn new(head: TagHead, indent_depth: usize, line: usize) -> Self {
        Self {
            head,
            children: Vec::new(),
            indent_depth,
            line,
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.head.tag_name
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.head.tag_name)
    }
}

/// A pure text leaf: a piped/plain text line or the body of a text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextNode {
    pub text: TextSpan,
    pub indent_depth: usize,
    pub line: usize,
}

/// A `//` (dev) or `//!` (native) comment line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentNode {
    pub text: String,
    pub native: bool,
    pub indent_depth: usize,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctypeNode {
    pub value: String,
    pub line: usize,
}

/// The structural declaration at the start of an element line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagHead {
    pub tag_name: String,
    pub classes: Vec<String>,
    pub id: Option<String>,
    pub attributes: Vec<Attribute>,
    pub inline_content: Option<TextSpan>,
}

impl TagHead {
    /// Tag name used when a head starts with a class or id shorthand.
    pub const DEFAULT_TAG: &'static str = "div";

    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            classes: Vec::new(),
            id: None,
            attributes: Vec::new(),
            inline_content: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// One `name="value"` entry of an attribute list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// The name as written, without the dynamic sigil.
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Literal(value.into()),
        }
    }

    pub fn dynamic(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Dynamic(expression.into()),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.value, AttributeValue::Dynamic(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum AttributeValue {
    /// Unescaped literal text.
    Literal(String),
    /// Raw expression source, exactly as written between the quotes.
    Dynamic(String),
}

/// An ordered run of literal text and interpolations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextSpan {
    pub segments: Vec<Segment>,
}

impl TextSpan {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Literal(text.into())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a segment, merging adjacent literals.
    pub fn push(&mut self, segment: Segment) {
        if let Segment::Literal(text) = &segment {
            if text.is_empty() {
                return;
            }
            if let Some(Segment::Literal(previous)) = self.segments.last_mut() {
                previous.push_str(text);
                return;
            }
        }
        self.segments.push(segment);
    }

    pub fn extend(&mut self, other: TextSpan) {
        for segment in other.segments {
            self.push(segment);
        }
    }

    /// The span rendered back in template notation, used by tree views.
    pub fn to_source(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Interpolation(expression) => format!("{{{{ {} }}}}", expression),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Segment {
    Literal(String),
    /// Trimmed expression source found between `{{` and `}}`.
    Interpolation(String),
}
