//! Tree building
//!
//!     The builder drives the line scanner, parses each line and places the resulting node by
//!     its indentation depth. The output is a [`Document`](crate::hsml::ast::Document) whose
//!     shape is final: the emitter never re-checks structure.

pub mod tree_builder;

pub use tree_builder::{build, TreeBuilder};
