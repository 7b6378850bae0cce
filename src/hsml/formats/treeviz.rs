//! Treeviz formatter for hsml documents
//!
//! One line per node, nesting drawn with box characters:
//!
//! ```text
//! ├─ Doctype: html
//! └─ Element: div.card
//!   ├─ Element: img :src
//!   └─ Text: {{ fullName }}
//! ```
//!
//! Labels are truncated to 40 characters.

use crate::hsml::ast::{AttributeValue, Document, Node, TagHead};

const LABEL_WIDTH: usize = 40;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

pub fn to_treeviz_str(doc: &Document) -> String {
    let mut result = String::new();
    // (node, prefix, is_last); pushed in reverse so siblings pop in order
    let mut pending: Vec<(&Node, String, bool)> = Vec::new();
    push_children(&mut pending, &doc.children, "");

    while let Some((node, prefix, is_last)) = pending.pop() {
        let connector = if is_last { "└─" } else { "├─" };
        result.push_str(&format!(
            "{}{} {}: {}\n",
            prefix,
            connector,
            node.node_type(),
            truncate(&display_label(node), LABEL_WIDTH)
        ));

        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        push_children(&mut pending, node.children(), &child_prefix);
    }

    result
}

fn push_children<'d>(pending: &mut Vec<(&'d Node, String, bool)>, children: &'d [Node], prefix: &str) {
    for (i, child) in children.iter().enumerate().rev() {
        pending.push((child, prefix.to_string(), i == children.len() - 1));
    }
}

fn display_label(node: &Node) -> String {
    match node {
        Node::Element(element) => head_label(&element.head),
        Node::Text(text) => text.text.to_source().replace('\n', "↵"),
        Node::Comment(comment) => comment.text.trim().to_string(),
        Node::Doctype(doctype) => doctype.value.clone(),
    }
}

fn head_label(head: &TagHead) -> String {
    let mut label = head.tag_name.clone();
    for class in &head.classes {
        label.push('.');
        label.push_str(class);
    }
    if let Some(id) = &head.id {
        label.push('#');
        label.push_str(id);
    }
    for attribute in &head.attributes {
        label.push(' ');
        if let AttributeValue::Dynamic(_) = attribute.value {
            label.push(':');
        }
        label.push_str(&attribute.name);
    }
    if let Some(inline) = &head.inline_content {
        label.push_str(" | ");
        label.push_str(&inline.to_source());
    }
    label
}
