//! HTML emitter
//!
//! Serializes a [`Document`] into compact markup. The walk is depth-first and pre-order, driven
//! by an explicit work stack of [`Step`]s rather than recursion.
//!
//! Literal text and literal attribute values are escaped. Interpolations and dynamic attribute
//! expressions are carried through unevaluated and unescaped.

use crate::hsml::ast::{
    Attribute, AttributeValue, Document, ElementNode, Node, Segment, TagHead, TextSpan,
};
use crate::hsml::config::{CompileOptions, DynamicAttributeStyle, VoidElementStyle};

/// One unit of pending work.
enum Step<'d> {
    Enter(&'d Node),
    Close(&'d str),
    /// Line break between adjacent pieces of text.
    Separator,
}

pub struct HtmlEmitter<'o> {
    options: &'o CompileOptions,
    output: String,
}

impl<'o> HtmlEmitter<'o> {
    pub fn new(options: &'o CompileOptions) -> Self {
        Self {
            options,
            output: String::new(),
        }
    }

    pub fn emit(mut self, document: &Document) -> String {
        let mut work: Vec<Step> = Vec::new();
        self.schedule(&mut work, &document.children);

        while let Some(step) = work.pop() {
            match step {
                Step::Enter(node) => self.enter(node, &mut work),
                Step::Close(tag_name) => {
                    self.output.push_str("</");
                    self.output.push_str(tag_name);
                    self.output.push('>');
                }
                Step::Separator => self.output.push('\n'),
            }
        }

        log::debug!("emitted {} bytes of html", self.output.len());
        self.output
    }

    /// Push `children` so that they pop in source order.
    fn schedule<'d>(&self, work: &mut Vec<Step<'d>>, children: &'d [Node]) {
        let visible: Vec<&Node> = children.iter().filter(|node| self.renders(node)).collect();

        for (index, node) in visible.iter().enumerate().rev() {
            work.push(Step::Enter(*node));
            if index > 0 && is_text(visible[index - 1]) && is_text(node) {
                work.push(Step::Separator);
            }
        }
    }

    fn enter<'d>(&mut self, node: &'d Node, work: &mut Vec<Step<'d>>) {
        match node {
            Node::Element(element) => self.open_element(element, work),
            Node::Text(text) => push_text(&mut self.output, &text.text),
            Node::Comment(comment) => {
                self.output.push_str("<!--");
                self.output.push_str(&comment.text);
                self.output.push_str("-->");
            }
            Node::Doctype(doctype) => {
                self.output.push_str("<!DOCTYPE ");
                self.output.push_str(&doctype.value);
                self.output.push('>');
            }
        }
    }

    fn open_element<'d>(&mut self, element: &'d ElementNode, work: &mut Vec<Step<'d>>) {
        let head = &element.head;
        self.output.push('<');
        self.output.push_str(&head.tag_name);
        self.push_attributes(head);

        if element.is_void() {
            match self.options.void_elements {
                VoidElementStyle::SelfClosing => self.output.push_str("/>"),
                VoidElementStyle::Html => self.output.push('>'),
            }
            return;
        }
        self.output.push('>');

        let inline = head
            .inline_content
            .as_ref()
            .filter(|span| !span.is_empty());
        if let Some(span) = inline {
            push_text(&mut self.output, span);
        }

        work.push(Step::Close(&head.tag_name));
        let before = work.len();
        self.schedule(work, &element.children);

        // Inline text followed by a text child reads as two lines of text.
        let first_child_is_text = work.len() > before
            && matches!(work.last(), Some(Step::Enter(node)) if is_text(node));
        if inline.is_some() && first_child_is_text {
            work.push(Step::Separator);
        }
    }

    fn push_attributes(&mut self, head: &TagHead) {
        if !head.classes.is_empty() {
            self.output.push_str(" class=\"");
            push_escaped_attribute(&mut self.output, &head.classes.join(" "));
            self.output.push('"');
        }

        if let Some(id) = &head.id {
            self.output.push_str(" id=\"");
            push_escaped_attribute(&mut self.output, id);
            self.output.push('"');
        }

        for attribute in &head.attributes {
            self.output.push(' ');
            self.push_attribute(attribute);
        }
    }

    fn push_attribute(&mut self, attribute: &Attribute) {
        match &attribute.value {
            AttributeValue::Literal(value) => {
                self.output.push_str(&attribute.name);
                self.output.push_str("=\"");
                push_escaped_attribute(&mut self.output, value);
                self.output.push('"');
            }
            AttributeValue::Dynamic(expression) => match self.options.dynamic_attributes {
                DynamicAttributeStyle::Binding => {
                    self.output.push(':');
                    self.output.push_str(&attribute.name);
                    self.output.push('=');
                    push_carried_value(&mut self.output, expression);
                }
                DynamicAttributeStyle::Interpolation => {
                    self.output.push_str(&attribute.name);
                    self.output.push('=');
                    push_carried_value(&mut self.output, &format!("{{{{ {} }}}}", expression));
                }
            },
        }
    }

    /// Whether a node produces any output with the current options.
    fn renders(&self, node: &Node) -> bool {
        match node {
            Node::Comment(comment) => comment.native && self.options.native_comments,
            Node::Element(_) | Node::Text(_) | Node::Doctype(_) => true,
        }
    }
}

fn is_text(node: &Node) -> bool {
    matches!(node, Node::Text(_))
}

fn push_text(output: &mut String, span: &TextSpan) {
    for segment in &span.segments {
        match segment {
            Segment::Literal(text) => push_escaped_text(output, text),
            Segment::Interpolation(expression) => {
                output.push_str("{{ ");
                output.push_str(expression);
                output.push_str(" }}");
            }
        }
    }
}

fn push_escaped_text(output: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

fn push_escaped_attribute(output: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(c),
        }
    }
}

/// Quote an unevaluated value, picking the quote it does not contain.
fn push_carried_value(output: &mut String, value: &str) {
    if !value.contains('"') {
        output.push('"');
        output.push_str(value);
        output.push('"');
    } else if !value.contains('\'') {
        output.push('\'');
        output.push_str(value);
        output.push('\'');
    } else {
        output.push('"');
        output.push_str(&value.replace('"', "&quot;"));
        output.push('"');
    }
}

/// Emit `document` as HTML.
pub fn emit(document: &Document, options: &CompileOptions) -> String {
    HtmlEmitter::new(options).emit(document)
}
