//! Emission
//!
//!     The emitter is a pure structural transform from the tree to markup. It never evaluates
//!     an expression: `{{ }}` interpolations and `:` dynamic attributes are written back out
//!     for a later binding step, in the style selected by
//!     [`CompileOptions`](crate::hsml::config::CompileOptions).

pub mod html;

pub use html::{emit, HtmlEmitter};
