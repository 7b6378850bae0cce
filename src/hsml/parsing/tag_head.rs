//! Tag head parsing
//!
//! A tag head is the element part of a line:
//!
//! `<head> = [<tag>] ("." <class> | "#" <id>)* ["(" <attributes> ")"] ["." | " " <inline text>]`
//!
//! The tag defaults to `div` when only shorthands are given. A bare `.` at the very end of the
//! head opens a text block. After the first whitespace character the rest of the line is
//! inline text.
//!
//! The head is lexed with [`HeadToken`]; the lexer morphs into [`AttrToken`] for the attribute
//! list and back afterwards. Literal `class` and `id` attributes are folded into the shorthand
//! slots once the whole head is read.

use logos::{Lexer, Logos};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::hsml::ast::{Attribute, AttributeValue, TagHead, TextSpan};
use crate::hsml::error::CompileError;
use crate::hsml::lexing::{AttrToken, HeadToken};
use crate::hsml::parsing::{attributes, text, LineCursor};

static TAG_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap());
static ID_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// A parsed tag head and whether it opened a text block.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedHead {
    pub head: TagHead,
    pub opens_text_block: bool,
}

/// Parse an element line's content. The content must start with a letter, `.` or `#`.
pub fn parse_tag_head(content: &str, cursor: LineCursor) -> Result<ParsedHead, CompileError> {
    let mut lexer = HeadToken::lexer(content);

    let mut tag_name: Option<String> = None;
    let mut classes: Vec<String> = Vec::new();
    let mut id: Option<(String, usize)> = None;
    let mut attribute_list: Option<Vec<Attribute>> = None;
    let mut inline_content: Option<TextSpan> = None;
    let mut opens_text_block = false;

    while let Some(token) = lexer.next() {
        let start = lexer.span().start;
        let token = token.map_err(|_| {
            cursor.syntax_error(
                content,
                start,
                format!("unexpected `{}` in tag head", lexer.slice()),
            )
        })?;

        if attribute_list.is_some() && !matches!(token, HeadToken::Whitespace | HeadToken::Dot) {
            return Err(cursor.syntax_error(
                content,
                start,
                match token {
                    HeadToken::OpenParen => "only one attribute list is allowed per element",
                    HeadToken::Name => "expected a space between the attribute list and inline text",
                    _ => "shorthands must come before the attribute list",
                },
            ));
        }

        match token {
            HeadToken::Name => {
                let name = lexer.slice();
                if start != 0 {
                    return Err(cursor.syntax_error(
                        content,
                        start,
                        format!("unexpected `{}` in tag head", name),
                    ));
                }
                if !TAG_NAME.is_match(name) {
                    return Err(cursor.syntax_error(
                        content,
                        start,
                        format!(
                            "invalid tag name `{}`: expected a letter followed by letters, digits or `-`",
                            name
                        ),
                    ));
                }
                tag_name = Some(name.to_string());
            }
            HeadToken::Dot => {
                let has_head = tag_name.is_some()
                    || !classes.is_empty()
                    || id.is_some()
                    || attribute_list.is_some();
                if lexer.remainder().is_empty() && has_head {
                    opens_text_block = true;
                    break;
                }
                if attribute_list.is_some() {
                    return Err(cursor.syntax_error(
                        content,
                        start,
                        "shorthands must come before the attribute list",
                    ));
                }
                classes.push(expect_name(&mut lexer, content, start, cursor, "a class name after `.`")?);
            }
            HeadToken::Hash => {
                let name = expect_name(&mut lexer, content, start, cursor, "an id after `#`")?;
                if !ID_NAME.is_match(&name) {
                    return Err(cursor.syntax_error(
                        content,
                        start + 1,
                        format!(
                            "invalid id `{}`: expected letters, digits, `-` or `_`",
                            name
                        ),
                    ));
                }
                if id.is_some() {
                    return Err(cursor.syntax_error(
                        content,
                        start,
                        "an element can only have one `#id` shorthand",
                    ));
                }
                id = Some((name, start));
            }
            HeadToken::OpenParen => {
                let mut attr_lexer: Lexer<AttrToken> = lexer.morph();
                let resolved = attributes::resolve(&mut attr_lexer, start, cursor)?;
                lexer = attr_lexer.morph();
                attribute_list = Some(resolved);
            }
            HeadToken::Whitespace => {
                // Exactly one separator character; tabs and spaces are both one byte.
                let text_start = start + 1;
                let rest = &content[text_start..];
                if !rest.is_empty() {
                    inline_content =
                        Some(text::extract(rest, cursor.advanced(content, text_start))?);
                }
                break;
            }
        }
    }

    let mut head = TagHead::new(tag_name.unwrap_or_else(|| TagHead::DEFAULT_TAG.to_string()));
    head.classes = classes;
    head.id = id.as_ref().map(|(name, _)| name.clone());
    head.inline_content = inline_content;

    for attribute in attribute_list.unwrap_or_default() {
        match (attribute.name.as_str(), &attribute.value) {
            ("class", AttributeValue::Literal(value)) => {
                head.classes
                    .extend(value.split_whitespace().map(str::to_string));
            }
            ("id", AttributeValue::Literal(value)) => {
                if let Some((shorthand, at)) = &id {
                    return Err(cursor.syntax_error(
                        content,
                        *at,
                        format!(
                            "id given twice: `#{}` shorthand and `id=\"{}\"` attribute",
                            shorthand, value
                        ),
                    ));
                }
                head.id = Some(value.clone());
            }
            _ => head.attributes.push(attribute),
        }
    }

    Ok(ParsedHead {
        head,
        opens_text_block,
    })
}

/// Whether `content` opens an attribute list that is still open at its end.
///
/// Any lexing error before the list closes counts as closed, so the error is reported by
/// [`parse_tag_head`] on the line where it happened.
pub fn attribute_list_is_open(content: &str) -> bool {
    let mut lexer = HeadToken::lexer(content);
    loop {
        match lexer.next() {
            Some(Ok(HeadToken::OpenParen)) => break,
            Some(Ok(HeadToken::Whitespace)) | Some(Err(_)) | None => return false,
            Some(Ok(_)) => {}
        }
    }

    let mut lexer: Lexer<AttrToken> = lexer.morph();
    loop {
        match lexer.next() {
            None => return true,
            Some(Ok(AttrToken::CloseParen)) | Some(Err(_)) => return false,
            Some(Ok(_)) => {}
        }
    }
}

/// Read the name that must directly follow a `.` or `#` at `marker`.
fn expect_name(
    lexer: &mut Lexer<'_, HeadToken>,
    content: &str,
    marker: usize,
    cursor: LineCursor,
    expected: &str,
) -> Result<String, CompileError> {
    match lexer.next() {
        Some(Ok(HeadToken::Name)) => Ok(lexer.slice().to_string()),
        _ => Err(cursor.syntax_error(content, marker, format!("expected {}", expected))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hsml::ast::Segment;
    use crate::hsml::error::ErrorKind;
    use rstest::rstest;

    fn head(content: &str) -> TagHead {
        parse_tag_head(content, LineCursor::new(1, 0)).unwrap().head
    }

    fn error(content: &str) -> CompileError {
        parse_tag_head(content, LineCursor::new(1, 0)).unwrap_err()
    }

    #[test]
    fn test_tag_classes_and_id() {
        let head = head("h1.text-red.big#title");
        assert_eq!(head.tag_name, "h1");
        assert_eq!(head.classes, vec!["text-red", "big"]);
        assert_eq!(head.id.as_deref(), Some("title"));
    }

    #[test]
    fn test_default_tag() {
        assert_eq!(head(".card").tag_name, "div");
        assert_eq!(head("#main").tag_name, "div");
    }

    #[test]
    fn test_shorthand_order_is_free() {
        let head = head("#app.shell.dark");
        assert_eq!(head.classes, vec!["shell", "dark"]);
        assert_eq!(head.id.as_deref(), Some("app"));
    }

    #[test]
    fn test_tailwind_classes() {
        let head = head(".bg-[#1da1f2].lg:[&:nth-child(3)]:hover:underline");
        assert_eq!(
            head.classes,
            vec!["bg-[#1da1f2]", "lg:[&:nth-child(3)]:hover:underline"]
        );
    }

    #[test]
    fn test_inline_text() {
        let head = head("p Hello {{ name }}");
        assert_eq!(
            head.inline_content.unwrap().segments,
            vec![
                Segment::Literal("Hello ".to_string()),
                Segment::Interpolation("name".to_string())
            ]
        );
    }

    #[test]
    fn test_inline_text_keeps_extra_spaces() {
        let head = head("p   padded");
        assert_eq!(head.inline_content, Some(TextSpan::literal("  padded")));
    }

    #[test]
    fn test_attributes_then_inline_text() {
        let head = head(r#"a(href="/") Home"#);
        assert_eq!(head.attributes, vec![Attribute::literal("href", "/")]);
        assert_eq!(head.inline_content, Some(TextSpan::literal("Home")));
    }

    #[test]
    fn test_text_block_dot() {
        let parsed = parse_tag_head("script.", LineCursor::new(1, 0)).unwrap();
        assert!(parsed.opens_text_block);
        assert_eq!(parsed.head.tag_name, "script");

        let parsed = parse_tag_head(r#"p.intro(title="x")."#, LineCursor::new(1, 0)).unwrap();
        assert!(parsed.opens_text_block);
        assert_eq!(parsed.head.classes, vec!["intro"]);
    }

    #[test]
    fn test_class_attribute_merges_after_shorthand() {
        let head = head(r#"div.a(class="b  c" :class="{ d: on }")"#);
        assert_eq!(head.classes, vec!["a", "b", "c"]);
        assert_eq!(
            head.attributes,
            vec![Attribute::dynamic("class", "{ d: on }")]
        );
        assert!(head.attribute("class").is_some_and(Attribute::is_dynamic));
    }

    #[test]
    fn test_id_attribute_fills_slot() {
        let head = head(r#"section(id="intro")"#);
        assert_eq!(head.id.as_deref(), Some("intro"));
        assert!(head.attributes.is_empty());
    }

    #[test]
    fn test_id_given_twice() {
        let err = error(r#"div#a(id="b")"#);
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.column, Some(4));
    }

    #[test]
    fn test_wrapped_attribute_list() {
        let head = head("img.avatar(\nsrc=\"a.png\"\nalt='x'\n) Caption");
        assert_eq!(head.classes, vec!["avatar"]);
        assert_eq!(
            head.attributes,
            vec![Attribute::literal("src", "a.png"), Attribute::literal("alt", "x")]
        );
        assert_eq!(head.inline_content, Some(TextSpan::literal("Caption")));
    }

    #[rstest]
    #[case::open_at_end("img(", true)]
    #[case::open_after_entries(r#"a.link(href="/""#, true)]
    #[case::paren_inside_value(r#"a(title="x)""#, true)]
    #[case::closed(r#"a(href="/")"#, false)]
    #[case::closed_on_a_later_line("a(\nhref=\"/\"\n) Home", false)]
    #[case::no_list("div.card", false)]
    #[case::paren_in_inline_text("p see (below", false)]
    #[case::lexing_error("img($", false)]
    fn test_attribute_list_is_open(#[case] content: &str, #[case] open: bool) {
        assert_eq!(attribute_list_is_open(content), open);
    }

    #[rstest]
    #[case::lone_dot(".", 1)]
    #[case::dot_then_space("p. text", 2)]
    #[case::empty_hash("div# x", 4)]
    #[case::second_id("div#a#b", 6)]
    #[case::bad_tag_name("h1:x", 1)]
    #[case::bad_id("#a:b", 2)]
    #[case::shorthand_after_attributes(r#"a(href="/").x"#, 12)]
    #[case::second_attribute_list(r#"a(href="/")(title="t")"#, 12)]
    #[case::text_glued_to_attributes(r#"a(href="/")Home"#, 12)]
    #[case::unexpected_character("div$", 4)]
    fn test_head_errors(#[case] content: &str, #[case] column: usize) {
        let err = error(content);
        assert_eq!(err.kind, ErrorKind::Syntax, "{}", err);
        assert_eq!(err.column, Some(column), "{}", err);
    }
}
