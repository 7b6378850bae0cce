//! Main module for hsml library functionality
//!
//! The compile pipeline runs in three passes over a single template string:
//!
//!     1. [lexing]: the line scanner measures indentation, dropping blank lines.
//!     2. [parsing] + [building]: each line is parsed on its own and placed into the tree by
//!        its depth.
//!     3. [emitting]: the tree is written out as markup.
//!
//! Every call owns all of its state; nothing is shared or cached between calls.

pub mod ast;
pub mod building;
pub mod config;
pub mod emitting;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod processor;

use crate::hsml::ast::Document;
use crate::hsml::config::CompileOptions;
use crate::hsml::error::CompileError;
use crate::hsml::lexing::SourceLine;

/// Compile a template to HTML with the default options.
pub fn compile(source: &str) -> Result<String, CompileError> {
    compile_with_options(source, &CompileOptions::default())
}

pub fn compile_with_options(
    source: &str,
    options: &CompileOptions,
) -> Result<String, CompileError> {
    let document = parse(source)?;
    Ok(emitting::emit(&document, options))
}

/// Build the tree for a template without emitting it.
pub fn parse(source: &str) -> Result<Document, CompileError> {
    building::build(source)
}

/// Run the line scanner alone.
pub fn scan(source: &str) -> Result<Vec<SourceLine>, CompileError> {
    lexing::scan(source)
}
