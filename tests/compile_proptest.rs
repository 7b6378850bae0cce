//! Property-based tests for the hsml compiler
//!
//! These tests ensure that the compiler never panics, and that output only depends on what a
//! template means rather than on how its insignificant parts are spelled.

use proptest::prelude::*;

/// Escape literal text the way the emitter does
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Generate a line built from the characters the grammar cares about
fn template_line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Anything at all
        ".{0,30}",
        // Heavy on grammar punctuation
        r#"[ \ta-z0-9.#(){}=:"',|/!@\[\]-]{0,30}"#,
        // Plausible heads
        r#"[a-z]{1,5}(\.[a-z]{1,4}|#[a-z]{1,4}){0,3}(\([a-z:]{1,4}="[a-z ]{0,5}"\))?( [a-z{} ]{0,10})?\.?"#,
    ]
}

/// Generate a whole template: lines with random indentation
fn template_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            prop_oneof!["", "  ", "    ", "      ", "\t", "\t\t", " \t"],
            template_line_strategy(),
        ),
        0..12,
    )
    .prop_map(|lines| {
        lines
            .into_iter()
            .map(|(indent, line)| format!("{}{}", indent, line))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// Generate distinct attributes with literal values
fn attributes_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-z][a-z0-9-]{0,6}", "[a-zA-Z0-9 ./_-]{0,10}", 1..6)
        .prop_map(|map| map.into_iter().collect())
}

proptest! {
    #[test]
    fn compile_never_panics(source in template_strategy()) {
        let _ = hsml::compile(&source);
    }

    #[test]
    fn errors_always_point_into_the_source(source in template_strategy()) {
        if let Err(err) = hsml::compile(&source) {
            prop_assert!(err.line >= 1);
            prop_assert!(err.line <= source.lines().count().max(1));
            prop_assert!(!err.message.is_empty());
        }
    }

    #[test]
    fn attribute_separators_are_insignificant(
        attributes in attributes_strategy(),
        separators in prop::collection::vec(prop_oneof![" ", ",", ", ", " , ", "\t", " ,\t"], 6),
        padding in prop_oneof!["", " ", "  "],
        quote_single in any::<bool>(),
    ) {
        let canonical = attributes
            .iter()
            .map(|(name, value)| format!("{}=\"{}\"", name, value))
            .collect::<Vec<_>>()
            .join(" ");

        let quote = if quote_single { '\'' } else { '"' };
        let mut spelled = String::new();
        for (index, (name, value)) in attributes.iter().enumerate() {
            if index > 0 {
                spelled.push_str(&separators[index]);
            }
            spelled.push_str(&format!("{}{}={}{}{}{}", name, padding, padding, quote, value, quote));
        }

        let expected = hsml::compile(&format!("div({})", canonical)).unwrap();
        let actual = hsml::compile(&format!("div({}{}{})", padding, spelled, padding)).unwrap();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn shorthand_classes_merge_in_order(
        classes in prop::collection::vec("[a-z][a-z0-9_-]{0,8}", 1..6),
    ) {
        let html = hsml::compile(&format!("div.{}", classes.join("."))).unwrap();
        prop_assert_eq!(html, format!("<div class=\"{}\"></div>", classes.join(" ")));
    }

    #[test]
    fn nesting_depth_is_preserved(depth in 1usize..40, unit in prop_oneof!["  ", "    ", "\t"]) {
        let source = (0..depth)
            .map(|level| format!("{}section", unit.repeat(level)))
            .collect::<Vec<_>>()
            .join("\n");

        let html = hsml::compile(&source).unwrap();
        prop_assert_eq!(html, format!("{}{}", "<section>".repeat(depth), "</section>".repeat(depth)));
    }

    #[test]
    fn literal_text_is_escaped(text in "[a-zA-Z0-9 <>&\"]{0,20}") {
        let html = hsml::compile(&format!("p {}", text)).unwrap();
        prop_assert_eq!(html, format!("<p>{}</p>", escape_text(text.trim_end())));
    }

    #[test]
    fn interpolations_are_carried_verbatim(expression in "[a-zA-Z_][a-zA-Z0-9_.<>&+ ]{0,15}") {
        let html = hsml::compile(&format!("p {{{{ {} }}}}", expression)).unwrap();
        prop_assert_eq!(html, format!("<p>{{{{ {} }}}}</p>", expression.trim()));
    }
}
