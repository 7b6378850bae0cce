//! Attribute list resolution
//!
//! Reads the entries of a `( ... )` attribute list from a lexer that has already consumed
//! the opening parenthesis, up to and including the closing one.
//!
//! Grammar: `<list> = "(" (<sep>* <entry>)* <sep>* ")"`
//! Where: `<entry> = <key> ws* "=" ws* <quoted>` and `<sep> = "," | ws`
//!
//! A key starting with `:` is dynamic: its value is captured verbatim as expression source.
//! Other values are literals: the quotes are stripped and escaped quotes of the same kind
//! are unescaped. No value is ever evaluated.

use logos::Lexer;

use crate::hsml::ast::Attribute;
use crate::hsml::error::CompileError;
use crate::hsml::lexing::AttrToken;
use crate::hsml::parsing::LineCursor;

/// The sigil that marks a dynamic attribute.
pub const DYNAMIC_SIGIL: char = ':';

fn is_valid_key_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, ':' | '@' | '#' | '[' | '(')
}

/// Resolve an attribute list. `open` is the byte offset of the opening parenthesis.
pub fn resolve(
    lexer: &mut Lexer<'_, AttrToken>,
    open: usize,
    cursor: LineCursor,
) -> Result<Vec<Attribute>, CompileError> {
    let source = lexer.source();
    let mut attributes: Vec<Attribute> = Vec::new();

    loop {
        let Some(token) = lexer.next() else {
            return Err(unterminated_list(source, open, cursor));
        };
        let token = token.map_err(|_| unexpected_character(lexer, cursor))?;

        match token {
            AttrToken::Whitespace | AttrToken::Comma => continue,
            AttrToken::CloseParen => return Ok(attributes),
            AttrToken::Key => {
                let key_start = lexer.span().start;
                let attribute = resolve_entry(lexer, open, cursor)?;

                let duplicate = attributes.iter().any(|existing| {
                    existing.name == attribute.name && existing.is_dynamic() == attribute.is_dynamic()
                });
                if duplicate {
                    return Err(cursor.syntax_error(
                        source,
                        key_start,
                        format!("duplicate attribute `{}`", display_key(&attribute)),
                    ));
                }
                attributes.push(attribute);
            }
            AttrToken::Equals => {
                return Err(cursor.syntax_error(
                    source,
                    lexer.span().start,
                    "expected an attribute name before `=`",
                ));
            }
            AttrToken::DoubleQuoted | AttrToken::SingleQuoted => {
                return Err(cursor.syntax_error(
                    source,
                    lexer.span().start,
                    "expected an attribute name before the quoted value",
                ));
            }
        }
    }
}

/// Resolve one `key="value"` entry; the lexer is positioned on the key.
fn resolve_entry(
    lexer: &mut Lexer<'_, AttrToken>,
    open: usize,
    cursor: LineCursor,
) -> Result<Attribute, CompileError> {
    let source = lexer.source();
    let key = lexer.slice();
    let key_start = lexer.span().start;

    let first = key.chars().next().unwrap_or(' ');
    if !is_valid_key_start(first) {
        return Err(cursor.syntax_error(
            source,
            key_start,
            format!(
                "attribute name `{}` must start with a letter, `:`, `@`, `#`, `[` or `(`",
                key
            ),
        ));
    }

    let (name, dynamic) = match key.strip_prefix(DYNAMIC_SIGIL) {
        Some("") => {
            return Err(cursor.syntax_error(
                source,
                key_start,
                "expected an attribute name after `:`",
            ));
        }
        Some(name) => (name, true),
        None => (key, false),
    };

    match next_significant(lexer) {
        None => return Err(unterminated_list(source, open, cursor)),
        Some(Err(())) => return Err(unexpected_character(lexer, cursor)),
        Some(Ok(AttrToken::Equals)) => {}
        Some(Ok(_)) => {
            return Err(cursor.syntax_error(
                source,
                key_start,
                format!("attribute `{}` is missing `=` and a quoted value", key),
            ));
        }
    }

    let quoted = match next_significant(lexer) {
        None => return Err(unterminated_list(source, open, cursor)),
        Some(Err(())) => return Err(unexpected_character(lexer, cursor)),
        Some(Ok(token)) if token.is_quoted() => lexer.slice(),
        Some(Ok(AttrToken::Key)) => {
            return Err(cursor.syntax_error(
                source,
                lexer.span().start,
                format!("value of attribute `{}` must be quoted", key),
            ));
        }
        Some(Ok(_)) => {
            return Err(cursor.syntax_error(
                source,
                lexer.span().start,
                format!("attribute `{}` is missing a value after `=`", key),
            ));
        }
    };

    let quote = quoted.chars().next().unwrap_or('"');
    let inner = &quoted[1..quoted.len() - 1];

    if dynamic {
        if inner.trim().is_empty() {
            return Err(cursor.syntax_error(
                source,
                key_start,
                format!("dynamic attribute `{}` has an empty expression", key),
            ));
        }
        Ok(Attribute::dynamic(name, inner))
    } else {
        Ok(Attribute::literal(name, unescape_quote(inner, quote)))
    }
}

/// Next token that is not insignificant whitespace.
fn next_significant(lexer: &mut Lexer<'_, AttrToken>) -> Option<Result<AttrToken, ()>> {
    loop {
        match lexer.next()? {
            Ok(AttrToken::Whitespace) => continue,
            other => return Some(other),
        }
    }
}

/// Replace `\<quote>` with `<quote>`; every other character is kept as written.
fn unescape_quote(value: &str, quote: char) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&quote) {
            continue;
        }
        result.push(c);
    }

    result
}

fn display_key(attribute: &Attribute) -> String {
    if attribute.is_dynamic() {
        format!("{}{}", DYNAMIC_SIGIL, attribute.name)
    } else {
        attribute.name.clone()
    }
}

fn unterminated_list(source: &str, open: usize, cursor: LineCursor) -> CompileError {
    cursor.syntax_error(source, open, "unterminated attribute list: missing `)`")
}

fn unexpected_character(lexer: &Lexer<'_, AttrToken>, cursor: LineCursor) -> CompileError {
    let slice = lexer.slice();
    let start = lexer.span().start;
    let rest = &lexer.source()[start..];

    if rest.starts_with('"') || rest.starts_with('\'') {
        cursor.syntax_error(lexer.source(), start, "unterminated quoted value")
    } else {
        cursor.syntax_error(
            lexer.source(),
            start,
            format!("unexpected `{}` in attribute list", slice),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hsml::error::ErrorKind;
    use logos::Logos;

    /// Resolve the attribute list that starts at the first `(` of `source`.
    fn resolve_str(source: &str) -> Result<Vec<Attribute>, CompileError> {
        let open = source.find('(').expect("test source needs a `(`");
        let mut lexer = AttrToken::lexer(source);
        lexer.bump(open + 1);
        resolve(&mut lexer, open, LineCursor::new(1, 0))
    }

    #[test]
    fn test_literal_and_dynamic_values() {
        let attributes =
            resolve_str(r#"(src="a.png" :alt="'Avatar of ' + fullName")"#).unwrap();

        assert_eq!(
            attributes,
            vec![
                Attribute::literal("src", "a.png"),
                Attribute::dynamic("alt", "'Avatar of ' + fullName"),
            ]
        );
    }

    #[test]
    fn test_comma_and_whitespace_separators() {
        let spaced = resolve_str(r#"(  a="1"   b='2'  )"#).unwrap();
        let commas = resolve_str(r#"(a="1",b='2')"#).unwrap();
        let mixed = resolve_str(r#"(a = "1" , b='2',)"#).unwrap();

        assert_eq!(spaced, commas);
        assert_eq!(spaced, mixed);
    }

    #[test]
    fn test_literal_unescapes_only_the_same_quote() {
        let attributes = resolve_str(r#"(title="say \"hi\" \n", alt='it\'s')"#).unwrap();

        assert_eq!(attributes[0], Attribute::literal("title", r#"say "hi" \n"#));
        assert_eq!(attributes[1], Attribute::literal("alt", "it's"));
    }

    #[test]
    fn test_dynamic_value_is_verbatim() {
        let attributes = resolve_str(r#"(:title="a \"b\"")"#).unwrap();
        assert_eq!(attributes[0], Attribute::dynamic("title", r#"a \"b\""#));
    }

    #[test]
    fn test_framework_keys_are_literal() {
        let attributes = resolve_str(
            r#"(@click="go()" #header="slot" (click)="x()" [(ngModel)]="name")"#,
        )
        .unwrap();
        let names: Vec<_> = attributes.iter().map(|a| a.name.as_str()).collect();

        assert_eq!(names, vec!["@click", "#header", "(click)", "[(ngModel)]"]);
        assert!(attributes.iter().all(|a| !a.is_dynamic()));
    }

    #[test]
    fn test_literal_and_dynamic_of_same_name_coexist() {
        let attributes = resolve_str(r#"(class="a" :class="{ b: on }")"#).unwrap();
        assert_eq!(attributes.len(), 2);
    }

    #[test]
    fn test_lexer_continues_after_close_paren() {
        let source = r#"a(href="/") Home"#;
        let mut lexer = AttrToken::lexer(source);
        lexer.bump(2);
        resolve(&mut lexer, 1, LineCursor::new(1, 0)).unwrap();

        assert_eq!(lexer.remainder(), " Home");
    }

    #[test]
    fn test_missing_equals() {
        let err = resolve_str("(disabled)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("missing `=`"));
        assert_eq!(err.column, Some(2));
    }

    #[test]
    fn test_unquoted_value() {
        let err = resolve_str("(src=imgSrc)").unwrap_err();
        assert!(err.message.contains("must be quoted"));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = resolve_str(r#"(src="a.png)"#).unwrap_err();
        assert!(err.message.contains("unterminated quoted value"));
        assert_eq!(err.column, Some(6));
    }

    #[test]
    fn test_mismatched_quotes() {
        let err = resolve_str(r#"(src="a.png')"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_unterminated_list() {
        let err = resolve_str(r#"img(src="a.png""#).unwrap_err();
        assert!(err.message.contains("unterminated attribute list"));
        assert_eq!(err.column, Some(4));
    }

    #[test]
    fn test_duplicate_name() {
        let err = resolve_str(r#"(src="a" src="b")"#).unwrap_err();
        assert!(err.message.contains("duplicate attribute `src`"));
        assert_eq!(err.column, Some(10));

        let err = resolve_str(r#"(:src="a", :src="b")"#).unwrap_err();
        assert!(err.message.contains("duplicate attribute `:src`"));
    }

    #[test]
    fn test_invalid_key_start() {
        let err = resolve_str(r#"(1src="x")"#).unwrap_err();
        assert!(err.message.contains("must start with"));

        let err = resolve_str(r#"(.src="x")"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_empty_dynamic_expression() {
        let err = resolve_str(r#"(:src="  ")"#).unwrap_err();
        assert!(err.message.contains("empty expression"));
    }
}
