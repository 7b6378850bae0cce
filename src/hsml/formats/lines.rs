//! Line dump formats
//!
//! Show what the line scanner produced, before any parsing: `lines-simple` prints one
//! `depth|line|content` row per significant line, `lines-json` the same data as JSON.

use crate::hsml::lexing::SourceLine;

pub fn to_simple_str(lines: &[SourceLine]) -> String {
    let mut result = String::new();
    for line in lines {
        result.push_str(&format!(
            "{}|{}|{}\n",
            line.indent_depth, line.line_number, line.content
        ));
    }
    result
}

pub fn to_json_str(lines: &[SourceLine]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(lines)
}
