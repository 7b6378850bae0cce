//! Text and interpolation extraction
//!
//! Splits free text into literal and interpolation segments. The extractor is not an
//! expression parser: the expression source is an opaque run of characters that ends at the
//! first `}}`. Braces inside the expression are not counted; only the delimiter pair is.
//!
//! Grammar: `<text> = (<literal> | "{{" <expression> "}}")*`

use logos::Logos;

use crate::hsml::ast::{Segment, TextSpan};
use crate::hsml::error::CompileError;
use crate::hsml::lexing::TextToken;
use crate::hsml::parsing::LineCursor;

/// Extract the segments of `text`, reporting errors relative to `cursor`.
pub fn extract(text: &str, cursor: LineCursor) -> Result<TextSpan, CompileError> {
    let mut lexer = TextToken::lexer(text);
    let mut span = TextSpan::default();
    // Byte offset just after the currently open `{{`
    let mut open: Option<usize> = None;

    while let Some(token) = lexer.next() {
        let Ok(token) = token else {
            if open.is_none() {
                span.push(Segment::Literal(lexer.slice().to_string()));
            }
            continue;
        };

        match (open, token) {
            (None, TextToken::OpenInterpolation) => open = Some(lexer.span().end),
            (None, _) => span.push(Segment::Literal(lexer.slice().to_string())),
            (Some(_), TextToken::OpenInterpolation) => {
                return Err(cursor.syntax_error(
                    text,
                    lexer.span().start,
                    "nested `{{` inside an interpolation is not supported",
                ));
            }
            (Some(start), TextToken::CloseInterpolation) => {
                let expression = text[start..lexer.span().start].trim();
                if expression.is_empty() {
                    return Err(cursor.syntax_error(
                        text,
                        start - 2,
                        "interpolation has an empty expression",
                    ));
                }
                span.push(Segment::Interpolation(expression.to_string()));
                open = None;
            }
            (Some(_), TextToken::Brace | TextToken::Chunk) => {}
        }
    }

    if let Some(start) = open {
        return Err(cursor.syntax_error(
            text,
            start - 2,
            "unterminated interpolation: missing closing `}}`",
        ));
    }

    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hsml::error::ErrorKind;

    fn segments(text: &str) -> Vec<Segment> {
        extract(text, LineCursor::new(1, 0)).unwrap().segments
    }

    fn lit(text: &str) -> Segment {
        Segment::Literal(text.to_string())
    }

    fn expr(text: &str) -> Segment {
        Segment::Interpolation(text.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(segments("Hello world"), vec![lit("Hello world")]);
    }

    #[test]
    fn test_interpolation_is_trimmed() {
        assert_eq!(
            segments("Hi {{  user.name }}, welcome"),
            vec![lit("Hi "), expr("user.name"), lit(", welcome")]
        );
    }

    #[test]
    fn test_only_interpolation() {
        assert_eq!(segments("{{ fullName }}"), vec![expr("fullName")]);
    }

    #[test]
    fn test_braces_inside_expression_are_opaque() {
        assert_eq!(
            segments("{{ {a: 1}.a }}"),
            vec![expr("{a: 1}.a")]
        );
    }

    #[test]
    fn test_first_closing_delimiter_wins() {
        assert_eq!(segments("{{ a }}}"), vec![expr("a"), lit("}")]);
    }

    #[test]
    fn test_stray_braces_are_literal() {
        assert_eq!(segments("a { b } c }}"), vec![lit("a { b } c }}")]);
    }

    #[test]
    fn test_unterminated_interpolation() {
        let err = extract("Hi {{ name", LineCursor::new(3, 4)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.line, 3);
        assert_eq!(err.column, Some(8));
    }

    #[test]
    fn test_nested_open_delimiter_is_rejected() {
        let err = extract("{{ a {{ b }} }}", LineCursor::new(1, 0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("nested"));
    }

    #[test]
    fn test_empty_interpolation_is_rejected() {
        let err = extract("x {{   }}", LineCursor::new(1, 0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.column, Some(3));
    }
}
