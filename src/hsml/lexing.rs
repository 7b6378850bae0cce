//! Lexing
//!
//!     Lexing happens at two granularities:
//!
//!         1. Lines. The [scanner] splits the template into [`SourceLine`]s and turns leading
//!            whitespace into an indentation depth. Everything structural about the tree is
//!            decided from these depths alone.
//!
//!         2. Line content. The [tokens] module defines the logos token sets used by the
//!            parsers to read a single line's content: the tag head, the attribute list and
//!            free text. The parsers switch between them with `morph`, since the same
//!            character means different things in each position.
//!
//!     Indentation is validated while scanning, so the parsers and the tree builder only ever
//!     see well-formed depths.

pub mod scanner;
pub mod tokens;

pub use scanner::{scan, BlockLine, IndentChar, IndentUnit, LineScanner, SourceLine};
pub use tokens::{AttrToken, HeadToken, TextToken};
