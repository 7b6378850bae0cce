//! # hsml
//!
//! A compiler for HSML, an indentation-based shorthand for HTML.
//!
//! ```text
//! h1.text-red Hello
//! .card
//!   img(:src="url")
//! ```
//!
//! compiles to
//!
//! ```text
//! <h1 class="text-red">Hello</h1><div class="card"><img :src="url"/></div>
//! ```
//!
//! Dynamic attributes (`:name="expr"`) and interpolations (`{{ expr }}`) are never evaluated;
//! they are carried through for a later binding step. See [`hsml::config`] for the output
//! styles and [`hsml::processor`] for the inspection formats.

pub mod hsml;

pub use hsml::config::CompileOptions;
pub use hsml::error::{CompileError, ErrorKind};
pub use hsml::{compile, compile_with_options, parse, scan};
