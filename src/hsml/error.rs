//! Compile errors
//!
//! Every stage reports failures through a single [`CompileError`]: the error kind, the
//! 1-based line it happened on, an optional 1-based column and a message. Errors are
//! always fatal to the current compile call; no stage recovers or returns partial output.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The three failure families a template can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Inconsistent indentation unit or mixed whitespace kinds.
    Indentation,
    /// Skipped indentation level, content under a void element, or any other tree-shape violation.
    Structural,
    /// Malformed shorthand, bad attribute list, unterminated interpolation.
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Indentation => write!(f, "IndentationError"),
            ErrorKind::Structural => write!(f, "StructuralError"),
            ErrorKind::Syntax => write!(f, "SyntaxError"),
        }
    }
}

/// A structured compile failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind} at line {line}: {message}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub line: usize,
    pub column: Option<usize>,
    pub message: String,
}

impl CompileError {
    pub fn new(kind: ErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            column: None,
            message: message.into(),
        }
    }

    pub fn indentation(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Indentation, line, message)
    }

    pub fn structural(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structural, line, message)
    }

    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, line, message)
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Render the error together with the surrounding source lines.
    ///
    /// Shows 2 lines before the failing line, the failing line with a `>>` marker (and a
    /// caret under the column when it is known), and 2 lines after.
    pub fn render(&self, source: &str) -> String {
        let mut rendered = format!("{}\n\n", self);
        rendered.push_str(&format_source_context(source, self.line, self.column));
        rendered
    }
}

/// Format source code context around a 1-based line number.
pub fn format_source_context(source: &str, line: usize, column: Option<usize>) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = line.saturating_sub(1);

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();

    for line_num in start_line..end_line {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!(
            "{} {:3} | {}\n",
            marker,
            line_num + 1,
            lines[line_num]
        ));

        if line_num == error_line {
            if let Some(column) = column {
                let padding = " ".repeat(column.saturating_sub(1));
                context.push_str(&format!("   {:3} | {}^\n", "", padding));
            }
        }
    }

    context
}
