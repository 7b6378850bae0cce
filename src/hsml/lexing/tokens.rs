//! Token definitions for the hsml line grammar
//!
//! A line is lexed with three token sets, switched with [`logos::Lexer::morph`]:
//!
//! - [`HeadToken`] for the tag head (`tag.class#id`).
//! - [`AttrToken`] inside a parenthesized attribute list.
//! - [`TextToken`] for free text, splitting out the `{{` / `}}` delimiters.
//!
//! Lexing is context dependent because the same character means different things in each
//! position: `#` starts an id in a head, but is part of a key such as `#header` inside an
//! attribute list, and is plain text after the head.

use logos::Logos;

/// Tokens of a tag head.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadToken {
    /// Tag, class or id name. Bracketed groups allow Tailwind arbitrary values (`bg-[#fff]`).
    #[regex(r"([A-Za-z0-9_\-:/@!%]|\[[^\] \t]*\])+")]
    Name,

    #[token(".")]
    Dot,

    #[token("#")]
    Hash,

    #[token("(")]
    OpenParen,

    #[regex(r"[ \t]+")]
    Whitespace,
}

/// Tokens inside a `( ... )` attribute list.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrToken {
    /// Attribute key, including framework spellings such as `@click`, `(click)` or `[(ngModel)]`.
    #[regex(r"([A-Za-z0-9_\-:@#.]|\[[^\] \t\n]*\]|\([^() \t\n]*\))+")]
    Key,

    #[token("=")]
    Equals,

    /// Quoted values end on the line they start on.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    DoubleQuoted,

    #[regex(r#"'([^'\\\n]|\\[^\n])*'"#)]
    SingleQuoted,

    #[token(",")]
    Comma,

    /// Includes line breaks: a list may wrap onto the following lines.
    #[regex(r"[ \t\n]+")]
    Whitespace,

    #[token(")")]
    CloseParen,
}

/// Tokens of free text.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextToken {
    #[token("{{")]
    OpenInterpolation,

    #[token("}}")]
    CloseInterpolation,

    /// A single brace that is not part of a delimiter.
    #[token("{")]
    #[token("}")]
    Brace,

    #[regex(r"[^{}]+")]
    Chunk,
}

impl AttrToken {
    pub fn is_quoted(&self) -> bool {
        matches!(self, AttrToken::DoubleQuoted | AttrToken::SingleQuoted)
    }
}
