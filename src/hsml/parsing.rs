//! Line parsing
//!
//!     Every significant source line is parsed on its own into a [`ParsedLine`]. What kind of
//!     line it is is decided from its first characters, in this order:
//!
//!         - `//!` native comment, `//` dev comment
//!         - `|` piped text (one following space is dropped)
//!         - `doctype` declaration
//!         - `(` is an error: an attribute list must follow a tag or shorthand
//!         - an ASCII letter, `.` or `#` starts an element head ([tag_head])
//!         - anything else is a text line
//!
//!     Nesting is not decided here. The tree builder places parsed lines by their depth, and
//!     joins the lines of a wrapped attribute list into one element line before parsing it
//!     ([continues_on_next_line]).
//!
//!     Native comments and doctype values are copied into the markup verbatim, so text that
//!     would end the comment or the declaration early is rejected.
//!
//!     Error positions are tracked with a [`LineCursor`], which maps byte offsets within a
//!     slice of the line back to 1-based columns of the original source line.

pub mod attributes;
pub mod tag_head;
pub mod text;

use crate::hsml::ast::{TagHead, TextSpan};
use crate::hsml::error::CompileError;
use crate::hsml::lexing::SourceLine;

pub use tag_head::{attribute_list_is_open, parse_tag_head, ParsedHead};

const DOCTYPE_KEYWORD: &str = "doctype";
const DEFAULT_DOCTYPE: &str = "html";
const NATIVE_COMMENT: &str = "//!";

/// Position of a slice within a source line, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCursor {
    pub line: usize,
    /// Number of characters on the line before the slice starts
    pub offset: usize,
}

impl LineCursor {
    pub fn new(line: usize, offset: usize) -> Self {
        LineCursor { line, offset }
    }

    /// 1-based column of byte `index` within `slice`.
    pub fn column_at(&self, slice: &str, index: usize) -> usize {
        let chars = match slice.get(..index) {
            Some(prefix) => prefix.chars().count(),
            None => slice.chars().count(),
        };
        self.offset + chars + 1
    }

    /// Cursor for the part of `slice` that starts at byte `index`.
    pub fn advanced(&self, slice: &str, index: usize) -> LineCursor {
        LineCursor::new(self.line, self.column_at(slice, index) - 1)
    }

    pub fn syntax_error(
        &self,
        slice: &str,
        index: usize,
        message: impl Into<String>,
    ) -> CompileError {
        CompileError::syntax(self.line, message).with_column(self.column_at(slice, index))
    }
}

/// A single parsed source line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Element {
        head: TagHead,
        /// The head ended with a bare `.`: the indented lines below are raw text.
        opens_text_block: bool,
    },
    Text(TextSpan),
    Comment {
        text: String,
        native: bool,
    },
    Doctype(String),
}

/// Parse the content of one significant line.
pub fn parse_line(line: &SourceLine) -> Result<ParsedLine, CompileError> {
    let content = line.content.as_str();
    let cursor = LineCursor::new(line.line_number, line.indent_width);

    if let Some(text) = content.strip_prefix(NATIVE_COMMENT) {
        check_native_comment(content, text, cursor)?;
        return Ok(ParsedLine::Comment {
            text: text.to_string(),
            native: true,
        });
    }
    if let Some(text) = content.strip_prefix("//") {
        return Ok(ParsedLine::Comment {
            text: text.to_string(),
            native: false,
        });
    }

    if let Some(rest) = content.strip_prefix('|') {
        let start = if rest.starts_with(' ') { 2 } else { 1 };
        let span = text::extract(&content[start..], cursor.advanced(content, start))?;
        return Ok(ParsedLine::Text(span));
    }

    if let Some(value) = doctype_value(content) {
        if let Some(index) = content.find(['<', '>']) {
            return Err(cursor.syntax_error(
                content,
                index,
                "doctype value cannot contain `<` or `>`",
            ));
        }
        return Ok(ParsedLine::Doctype(value));
    }

    match content.chars().next() {
        Some('(') => Err(cursor.syntax_error(
            content,
            0,
            "attribute list without a tag: expected a tag name, `.class` or `#id` before `(`",
        )),
        Some(c) if c.is_ascii_alphabetic() || c == '.' || c == '#' => {
            let ParsedHead {
                head,
                opens_text_block,
            } = parse_tag_head(content, cursor)?;
            Ok(ParsedLine::Element {
                head,
                opens_text_block,
            })
        }
        _ => Ok(ParsedLine::Text(text::extract(content, cursor)?)),
    }
}

/// Whether an element line leaves its attribute list open, wrapping it onto the next lines.
pub fn continues_on_next_line(content: &str) -> bool {
    let starts_head = content
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '.' || c == '#');

    starts_head && doctype_value(content).is_none() && attribute_list_is_open(content)
}

/// Native comment text is emitted verbatim between `<!--` and `-->`, so it must not be
/// able to close the comment early.
fn check_native_comment(content: &str, text: &str, cursor: LineCursor) -> Result<(), CompileError> {
    let start = NATIVE_COMMENT.len();

    if let Some(index) = text.find("--") {
        return Err(cursor.syntax_error(
            content,
            start + index,
            "native comment cannot contain `--`",
        ));
    }
    if text.starts_with('>') || text.starts_with("->") {
        return Err(cursor.syntax_error(
            content,
            start,
            "native comment cannot start with `>` or `->`",
        ));
    }
    Ok(())
}

fn doctype_value(content: &str) -> Option<String> {
    let rest = content.strip_prefix(DOCTYPE_KEYWORD)?;
    if rest.is_empty() {
        return Some(DEFAULT_DOCTYPE.to_string());
    }
    if !rest.starts_with([' ', '\t']) {
        return None;
    }

    let value = rest.trim();
    if value.is_empty() {
        Some(DEFAULT_DOCTYPE.to_string())
    } else {
        Some(value.to_string())
    }
}
