//! Inspection formats
//!
//! Besides HTML, a template can be dumped at two earlier stages for debugging:
//!
//! - [lines]: the scanner output, one row per significant line.
//! - [treeviz]: the built tree. The JSON form of the tree is plain serde output and needs no
//!   module of its own.

pub mod lines;
pub mod treeviz;
