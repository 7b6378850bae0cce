//! Line scanner
//!
//!     Splits the raw template into logical lines, measures the indentation depth of each
//!     line and hands out the content that follows the leading whitespace.
//!
//!     The indentation unit is fixed by the first indented line: its whitespace kind (spaces
//!     or tabs) and its width become the unit every later line is measured against. Blank
//!     lines are dropped and never take part in the consistency checks.
//!
//!     The scanner is pulled line by line by the tree builder. Text blocks (`p.`) need their
//!     body lines verbatim, without unit validation of the extra indentation, so the builder
//!     asks the scanner for them through [`LineScanner::take_text_block`] instead of pulling
//!     them as regular lines.

use std::iter::{Enumerate, Peekable};
use std::str::Lines;

use serde::Serialize;

use crate::hsml::error::CompileError;

/// One non-blank line of the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLine {
    pub indent_depth: usize,
    /// Number of leading whitespace characters, used to compute error columns.
    pub indent_width: usize,
    /// Everything after the leading whitespace, with trailing whitespace removed.
    pub content: String,
    pub line_number: usize,
}

/// One body line of a text block, with the block's indentation base stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLine {
    pub line_number: usize,
    pub indent_width: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndentChar {
    Space,
    Tab,
}

impl IndentChar {
    fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' => Some(IndentChar::Space),
            '\t' => Some(IndentChar::Tab),
            _ => None,
        }
    }

    fn describe(&self, count: usize) -> String {
        let noun = match (self, count) {
            (IndentChar::Space, 1) => "space",
            (IndentChar::Space, _) => "spaces",
            (IndentChar::Tab, 1) => "tab",
            (IndentChar::Tab, _) => "tabs",
        };
        format!("{} {}", count, noun)
    }
}

/// The whitespace run that represents one nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndentUnit {
    pub kind: IndentChar,
    pub width: usize,
}

/// Leading whitespace of a raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Indentation {
    width: usize,
    kind: Option<IndentChar>,
}

/// Measure leading whitespace, rejecting lines that mix tabs and spaces.
fn measure_indentation(raw: &str, line_number: usize) -> Result<Indentation, CompileError> {
    let mut width = 0;
    let mut kind: Option<IndentChar> = None;

    for c in raw.chars() {
        let Some(current) = IndentChar::from_char(c) else {
            break;
        };
        match kind {
            Some(previous) if previous != current => {
                return Err(CompileError::indentation(
                    line_number,
                    "indentation mixes tabs and spaces",
                )
                .with_column(width + 1));
            }
            _ => kind = Some(current),
        }
        width += 1;
    }

    Ok(Indentation { width, kind })
}

fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Stateful line scanner for a single compile call.
pub struct LineScanner<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
    unit: Option<IndentUnit>,
}

impl<'a> LineScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate().peekable(),
            unit: None,
        }
    }

    /// The indentation unit, once the first indented line has been seen.
    pub fn unit(&self) -> Option<IndentUnit> {
        self.unit
    }

    /// Scan the next non-blank line.
    pub fn next_line(&mut self) -> Option<Result<SourceLine, CompileError>> {
        loop {
            let (index, raw) = self.lines.next()?;
            if is_blank(raw) {
                continue;
            }
            return Some(self.classify(index + 1, raw));
        }
    }

    fn classify(&mut self, line_number: usize, raw: &str) -> Result<SourceLine, CompileError> {
        let indentation = measure_indentation(raw, line_number)?;
        let indent_depth = self.depth_of(indentation, line_number)?;
        let content = raw[indentation.width..].trim_end().to_string();

        log::trace!(
            "line {}: depth {} content {:?}",
            line_number,
            indent_depth,
            content
        );

        Ok(SourceLine {
            indent_depth,
            indent_width: indentation.width,
            content,
            line_number,
        })
    }

    fn depth_of(&mut self, indentation: Indentation, line_number: usize) -> Result<usize, CompileError> {
        let Some(kind) = indentation.kind else {
            return Ok(0);
        };

        let unit = match self.unit {
            Some(unit) => unit,
            None => {
                let unit = IndentUnit {
                    kind,
                    width: indentation.width,
                };
                log::debug!(
                    "indentation unit established on line {}: {}",
                    line_number,
                    kind.describe(indentation.width)
                );
                self.unit = Some(unit);
                unit
            }
        };

        if kind != unit.kind {
            return Err(CompileError::indentation(
                line_number,
                format!(
                    "line is indented with {} but the template is indented with {}",
                    kind.describe(indentation.width),
                    unit.kind.describe(unit.width)
                ),
            )
            .with_column(1));
        }

        if indentation.width % unit.width != 0 {
            return Err(CompileError::indentation(
                line_number,
                format!(
                    "indentation of {} is not a multiple of the indentation unit ({})",
                    kind.describe(indentation.width),
                    unit.kind.describe(unit.width)
                ),
            )
            .with_column(indentation.width + 1));
        }

        Ok(indentation.width / unit.width)
    }

    /// Take the body of a text block opened by an element at `parent_depth`.
    ///
    /// Consumes every following line indented deeper than the parent, plus blank lines in
    /// between. Blank lines after the last body line are left alone. The block base (one
    /// level deeper than the parent) is stripped; any further indentation is kept verbatim.
    pub fn take_text_block(&mut self, parent_depth: usize) -> Result<Vec<BlockLine>, CompileError> {
        let mut block = Vec::new();
        let mut pending_blanks = Vec::new();

        loop {
            let Some(&(index, raw)) = self.lines.peek() else {
                break;
            };
            let line_number = index + 1;

            if is_blank(raw) {
                pending_blanks.push(line_number);
                self.lines.next();
                continue;
            }

            let parent_width = self.unit.map_or(0, |unit| unit.width * parent_depth);
            let leading = raw
                .chars()
                .take_while(|c| IndentChar::from_char(*c).is_some())
                .count();
            if leading <= parent_width {
                break;
            }

            let unit = self.block_unit(raw, leading, line_number)?;
            let base = unit.width * (parent_depth + 1);
            let base_ok = raw
                .chars()
                .take(base)
                .all(|c| IndentChar::from_char(c) == Some(unit.kind))
                && leading >= base;
            if !base_ok {
                return Err(CompileError::indentation(
                    line_number,
                    format!(
                        "text block lines must be indented by {} more than their element",
                        unit.kind.describe(unit.width)
                    ),
                )
                .with_column(1));
            }

            for blank in pending_blanks.drain(..) {
                block.push(BlockLine {
                    line_number: blank,
                    indent_width: base,
                    text: String::new(),
                });
            }

            block.push(BlockLine {
                line_number,
                indent_width: base,
                text: raw[base..].trim_end().to_string(),
            });
            self.lines.next();
        }

        Ok(block)
    }

    /// Take the next non-blank line of a wrapped attribute list.
    ///
    /// Continuation lines sit inside the list that a previous line opened, so their
    /// indentation is stripped without being checked against the unit or establishing it.
    pub fn take_continuation_line(&mut self) -> Option<BlockLine> {
        let (index, raw) = self.lines.by_ref().find(|(_, raw)| !is_blank(raw))?;
        let leading = raw
            .chars()
            .take_while(|c| IndentChar::from_char(*c).is_some())
            .count();

        Some(BlockLine {
            line_number: index + 1,
            indent_width: leading,
            text: raw[leading..].trim_end().to_string(),
        })
    }

    /// The unit to measure a text block with, establishing it from the block's first line if needed.
    fn block_unit(&mut self, raw: &str, leading: usize, line_number: usize) -> Result<IndentUnit, CompileError> {
        if let Some(unit) = self.unit {
            return Ok(unit);
        }
        let indentation = measure_indentation(raw, line_number)?;
        let kind = indentation.kind.unwrap_or(IndentChar::Space);
        let unit = IndentUnit {
            kind,
            width: leading,
        };
        self.unit = Some(unit);
        Ok(unit)
    }
}

impl<'a> Iterator for LineScanner<'a> {
    type Item = Result<SourceLine, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}

/// Scan a whole template into lines.
///
/// Text block bodies and wrapped attribute lists are scanned like any other line here, so their
/// irregular inner indentation reports an indentation error; the compile pipeline uses
/// [`LineScanner`] directly.
pub fn scan(source: &str) -> Result<Vec<SourceLine>, CompileError> {
    LineScanner::new(source).collect()
}
