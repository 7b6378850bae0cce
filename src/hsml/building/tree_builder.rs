//! Indentation tree builder
//!
//! Places parsed lines into a tree using an explicit stack of open nodes. Each stack entry
//! is a node whose subtree may still grow; its depth is the depth of the line that opened it.
//!
//! For every incoming line at depth `d`:
//!
//! 1. Close every open node with depth >= `d`, attaching each to the node below it on the
//!    stack (or to the document root when the stack empties).
//! 2. The line may be at most one level deeper than the new top (or at depth 0 when the
//!    stack is empty); anything deeper skipped a level.
//! 3. The new top must be able to hold children: void elements, text, comments and doctype
//!    declarations cannot.
//! 4. The new node is pushed. A text block head consumes its body from the scanner first.
//!
//! An element line whose attribute list is still open at the end of the line pulls the
//! following lines into its content until the list closes. Their indentation is ignored and
//! `//` lines among them are dropped as dev comments. Errors in the joined content are
//! reported against the physical line they occur on.
//!
//! The walk is linear in the number of lines and never recurses.

use crate::hsml::ast::{
    CommentNode, Document, DoctypeNode, ElementNode, Node, Segment, TextNode, TextSpan,
};
use crate::hsml::error::CompileError;
use crate::hsml::lexing::{LineScanner, SourceLine};
use crate::hsml::parsing::{self, text, LineCursor, ParsedLine};

const DEV_COMMENT: &str = "//";

/// A physical line joined into an element line by a wrapped attribute list.
#[derive(Debug, Clone, Copy)]
struct Continuation {
    line_number: usize,
    indent_width: usize,
    /// Character offset of the line within the joined content
    start: usize,
}

/// Builds a [`Document`] from template source.
pub struct TreeBuilder<'a> {
    scanner: LineScanner<'a>,
    stack: Vec<Node>,
    document: Document,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            scanner: LineScanner::new(source),
            stack: Vec::new(),
            document: Document::new(),
        }
    }

    pub fn build(mut self) -> Result<Document, CompileError> {
        let mut lines = 0;

        while let Some(line) = self.scanner.next_line() {
            let line = line?;
            lines += 1;
            self.place(line)?;
        }

        while let Some(node) = self.stack.pop() {
            self.attach(node)?;
        }

        log::debug!(
            "built {} root nodes ({} total) from {} lines",
            self.document.children.len(),
            self.document.node_count(),
            lines
        );

        Ok(self.document)
    }

    fn place(&mut self, line: SourceLine) -> Result<(), CompileError> {
        let depth = line.indent_depth;

        while self
            .stack
            .last()
            .is_some_and(|open| open.indent_depth() >= depth)
        {
            if let Some(node) = self.stack.pop() {
                self.attach(node)?;
            }
        }

        let max_depth = self.stack.last().map_or(0, |open| open.indent_depth() + 1);
        if depth > max_depth {
            return Err(CompileError::structural(
                line.line_number,
                format!(
                    "line is indented {} levels but its parent allows at most {}; an indentation level was skipped",
                    depth, max_depth
                ),
            )
            .with_column(line.indent_width + 1));
        }

        if let Some(parent) = self.stack.last() {
            check_accepts_children(parent, line.line_number)?;
        }

        let node = self.node_for(line)?;
        self.stack.push(node);
        Ok(())
    }

    fn node_for(&mut self, mut line: SourceLine) -> Result<Node, CompileError> {
        let depth = line.indent_depth;
        let line_number = line.line_number;

        let continuations = self.join_wrapped_attributes(&mut line);
        let parsed = parsing::parse_line(&line)
            .map_err(|err| relocate(err, &line, &continuations))?;

        match parsed {
            ParsedLine::Element {
                head,
                opens_text_block,
            } => {
                let mut element = ElementNode::new(head, depth, line_number);

                if element.is_void() && element.head.inline_content.is_some() {
                    return Err(CompileError::structural(
                        line_number,
                        format!(
                            "void element `{}` cannot have inline content",
                            element.tag_name()
                        ),
                    ));
                }

                if opens_text_block {
                    if element.is_void() {
                        return Err(CompileError::structural(
                            line_number,
                            format!(
                                "void element `{}` cannot open a text block",
                                element.tag_name()
                            ),
                        ));
                    }
                    if let Some(body) = self.text_block(depth)? {
                        element.children.push(Node::Text(body));
                    }
                }

                Ok(Node::Element(element))
            }
            ParsedLine::Text(text) => Ok(Node::Text(TextNode {
                text,
                indent_depth: depth,
                line: line_number,
            })),
            ParsedLine::Comment { text, native } => Ok(Node::Comment(CommentNode {
                text,
                native,
                indent_depth: depth,
                line: line_number,
            })),
            ParsedLine::Doctype(value) => {
                if depth > 0 {
                    return Err(CompileError::structural(
                        line_number,
                        "doctype must be declared at the root level",
                    ));
                }
                Ok(Node::Doctype(DoctypeNode {
                    value,
                    line: line_number,
                }))
            }
        }
    }

    /// Append the lines of an attribute list left open at the end of `line`.
    ///
    /// A list still open at the end of input is left for the tag head parser to report.
    fn join_wrapped_attributes(&mut self, line: &mut SourceLine) -> Vec<Continuation> {
        let mut continuations = Vec::new();
        if !parsing::continues_on_next_line(&line.content) {
            return continuations;
        }

        let mut length = line.content.chars().count();
        while let Some(next) = self.scanner.take_continuation_line() {
            if next.text.starts_with(DEV_COMMENT) {
                continue;
            }

            // Only a line with a `)` can close the list
            let may_close = next.text.contains(')');
            continuations.push(Continuation {
                line_number: next.line_number,
                indent_width: next.indent_width,
                start: length + 1,
            });
            length += 1 + next.text.chars().count();
            line.content.push('\n');
            line.content.push_str(&next.text);

            if may_close && !parsing::attribute_list_is_open(&line.content) {
                break;
            }
        }

        log::trace!(
            "attribute list on line {} wraps over {} lines",
            line.line_number,
            continuations.len()
        );
        continuations
    }

    /// Read the body of a text block opened at `depth` into a single text node.
    fn text_block(&mut self, depth: usize) -> Result<Option<TextNode>, CompileError> {
        let block = self.scanner.take_text_block(depth)?;
        let Some(first) = block.first() else {
            return Ok(None);
        };
        let first_line = first.line_number;

        let mut span = TextSpan::default();
        for (index, block_line) in block.iter().enumerate() {
            if index > 0 {
                span.push(Segment::Literal("\n".to_string()));
            }
            let cursor = LineCursor::new(block_line.line_number, block_line.indent_width);
            span.extend(text::extract(&block_line.text, cursor)?);
        }

        log::trace!(
            "text block at line {}: {} lines",
            first_line,
            block.len()
        );

        Ok(Some(TextNode {
            text: span,
            indent_depth: depth + 1,
            line: first_line,
        }))
    }

    fn attach(&mut self, node: Node) -> Result<(), CompileError> {
        match self.stack.last_mut() {
            None => {
                self.document.children.push(node);
                Ok(())
            }
            Some(parent) => {
                let line = parent.line();
                match parent.children_mut() {
                    Some(children) => {
                        children.push(node);
                        Ok(())
                    }
                    None => Err(CompileError::structural(
                        node.line(),
                        format!("line {} cannot have children", line),
                    )),
                }
            }
        }
    }
}

/// Move an error found in joined content back onto the physical line it came from.
fn relocate(
    mut err: CompileError,
    line: &SourceLine,
    continuations: &[Continuation],
) -> CompileError {
    let Some(column) = err.column else {
        return err;
    };
    if err.line != line.line_number {
        return err;
    }

    let index = column.saturating_sub(line.indent_width + 1);
    if let Some(continuation) = continuations.iter().rev().find(|c| c.start <= index) {
        err.line = continuation.line_number;
        err.column = Some(continuation.indent_width + index - continuation.start + 1);
    }
    err
}

fn check_accepts_children(parent: &Node, line_number: usize) -> Result<(), CompileError> {
    let reason = match parent {
        Node::Element(element) if element.is_void() => {
            format!("void element `{}` cannot have children", element.tag_name())
        }
        Node::Element(_) => return Ok(()),
        Node::Text(_) => "text cannot have children".to_string(),
        Node::Comment(_) => "comments cannot have children".to_string(),
        Node::Doctype(_) => "doctype cannot have children".to_string(),
    };

    Err(CompileError::structural(
        line_number,
        format!("{} (opened on line {})", reason, parent.line()),
    ))
}

/// Build the tree for a whole template.
pub fn build(source: &str) -> Result<Document, CompileError> {
    TreeBuilder::new(source).build()
}
