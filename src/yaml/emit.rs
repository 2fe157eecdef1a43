//! Renders a node tree to YAML text.
//!
//! The crate owns this instead of delegating to a YAML library because the
//! tree carries scalar styles and application tags that a generic value
//! model cannot express. Output is fully deterministic: block style with
//! two-space indent, sequence dashes at the parent key's indent, flow only
//! where a flow hint is set and the whole subtree tolerates it.

use crate::yaml::node::{plain_safe, Node, Scalar, ScalarStyle};

/// Renders a complete document for the given root node, ending in a single
/// newline. A tag on a block root goes on its own line above the content.
#[must_use]
pub fn to_yaml(root: &Node) -> String {
    let mut out = String::new();
    match root {
        Node::Scalar { tag, value, style } => {
            if let Some(tag) = tag {
                out.push_str(tag.as_str());
                out.push(' ');
            }
            match (*style, value) {
                (ScalarStyle::Literal, Scalar::Str(text)) => write_literal(&mut out, text, 1),
                _ => {
                    out.push_str(&render_scalar(value, *style, false));
                    out.push('\n');
                }
            }
        }
        Node::Sequence { tag, items, flow } => {
            if items.is_empty() || (*flow && root.flow_compatible()) {
                out.push_str(&flow_string(root));
                out.push('\n');
            } else {
                if let Some(tag) = tag {
                    out.push_str(tag.as_str());
                    out.push('\n');
                }
                write_sequence_items(&mut out, items, 0);
            }
        }
        Node::Mapping { tag, entries, flow } => {
            if entries.is_empty() || (*flow && root.flow_compatible()) {
                out.push_str(&flow_string(root));
                out.push('\n');
            } else {
                if let Some(tag) = tag {
                    out.push_str(tag.as_str());
                    out.push('\n');
                }
                write_mapping_entries(&mut out, entries, 0, false);
            }
        }
    }
    out
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

/// Writes block mapping entries at the given indent. With `first_inline`
/// the first key lands where the cursor already is, which is how a mapping
/// shares a line with its sequence dash.
fn write_mapping_entries(
    out: &mut String,
    entries: &[(String, Node)],
    indent: usize,
    first_inline: bool,
) {
    for (at, (key, value)) in entries.iter().enumerate() {
        if at > 0 || !first_inline {
            pad(out, indent);
        }
        out.push_str(&render_key(key, false));
        out.push(':');
        write_value_after_colon(out, value, indent);
    }
}

fn write_sequence_items(out: &mut String, items: &[Node], indent: usize) {
    for item in items {
        pad(out, indent);
        out.push('-');
        write_item_after_dash(out, item, indent);
    }
}

/// Continues the line after `key:` and recurses for block children.
fn write_value_after_colon(out: &mut String, node: &Node, indent: usize) {
    match node {
        Node::Scalar { tag, value, style } => {
            out.push(' ');
            if let Some(tag) = tag {
                out.push_str(tag.as_str());
                out.push(' ');
            }
            match (*style, value) {
                (ScalarStyle::Literal, Scalar::Str(text)) => {
                    write_literal(out, text, indent + 1);
                }
                _ => {
                    out.push_str(&render_scalar(value, *style, false));
                    out.push('\n');
                }
            }
        }
        Node::Sequence { tag, items, flow } => {
            if items.is_empty() || (*flow && node.flow_compatible()) {
                out.push(' ');
                out.push_str(&flow_string(node));
                out.push('\n');
            } else {
                if let Some(tag) = tag {
                    out.push(' ');
                    out.push_str(tag.as_str());
                }
                out.push('\n');
                // Dashes sit at the key's own indent.
                write_sequence_items(out, items, indent);
            }
        }
        Node::Mapping { tag, entries, flow } => {
            if entries.is_empty() || (*flow && node.flow_compatible()) {
                out.push(' ');
                out.push_str(&flow_string(node));
                out.push('\n');
            } else {
                if let Some(tag) = tag {
                    out.push(' ');
                    out.push_str(tag.as_str());
                }
                out.push('\n');
                write_mapping_entries(out, entries, indent + 1, false);
            }
        }
    }
}

/// Continues the line after a sequence dash.
fn write_item_after_dash(out: &mut String, node: &Node, indent: usize) {
    match node {
        Node::Scalar { tag, value, style } => {
            out.push(' ');
            if let Some(tag) = tag {
                out.push_str(tag.as_str());
                out.push(' ');
            }
            match (*style, value) {
                (ScalarStyle::Literal, Scalar::Str(text)) => {
                    write_literal(out, text, indent + 1);
                }
                _ => {
                    out.push_str(&render_scalar(value, *style, false));
                    out.push('\n');
                }
            }
        }
        Node::Sequence { tag, items, flow } => {
            if items.is_empty() || (*flow && node.flow_compatible()) {
                out.push(' ');
                out.push_str(&flow_string(node));
                out.push('\n');
            } else {
                if let Some(tag) = tag {
                    out.push(' ');
                    out.push_str(tag.as_str());
                }
                out.push('\n');
                write_sequence_items(out, items, indent + 1);
            }
        }
        Node::Mapping { tag, entries, flow } => {
            if entries.is_empty() || (*flow && node.flow_compatible()) {
                out.push(' ');
                out.push_str(&flow_string(node));
                out.push('\n');
            } else if let Some(tag) = tag {
                out.push(' ');
                out.push_str(tag.as_str());
                out.push('\n');
                write_mapping_entries(out, entries, indent + 1, false);
            } else {
                out.push(' ');
                write_mapping_entries(out, entries, indent + 1, true);
            }
        }
    }
}

/// One-line flow rendering for a subtree with no literal scalars.
fn flow_string(node: &Node) -> String {
    match node {
        Node::Scalar { tag, value, style } => {
            let text = render_scalar(value, *style, true);
            match tag {
                Some(tag) => format!("{tag} {text}"),
                None => text,
            }
        }
        Node::Sequence { tag, items, .. } => {
            let inner = items.iter().map(flow_string).collect::<Vec<_>>().join(", ");
            match tag {
                Some(tag) => format!("{tag} [{inner}]"),
                None => format!("[{inner}]"),
            }
        }
        Node::Mapping { tag, entries, .. } => {
            let inner = entries
                .iter()
                .map(|(key, value)| {
                    format!("{}: {}", render_key(key, true), flow_string(value))
                })
                .collect::<Vec<_>>()
                .join(", ");
            match tag {
                Some(tag) => format!("{tag} {{{inner}}}"),
                None => format!("{{{inner}}}"),
            }
        }
    }
}

fn render_scalar(value: &Scalar, style: ScalarStyle, in_flow: bool) -> String {
    match value {
        Scalar::Null => "null".to_owned(),
        Scalar::Bool(flag) => flag.to_string(),
        Scalar::Int(number) => number.to_string(),
        Scalar::Str(text) => match style {
            ScalarStyle::Plain if !in_flow || plain_safe(text, true) => text.clone(),
            ScalarStyle::Plain | ScalarStyle::SingleQuoted => single_quote(text),
            ScalarStyle::DoubleQuoted | ScalarStyle::Literal => double_quote(text),
        },
    }
}

fn render_key(key: &str, in_flow: bool) -> String {
    if plain_safe(key, in_flow) {
        key.to_owned()
    } else if key.chars().any(char::is_control) {
        double_quote(key)
    } else {
        single_quote(key)
    }
}

/// Writes a literal block: chomping indicator chosen from the trailing
/// newlines, then the content lines at the given indent.
fn write_literal(out: &mut String, content: &str, indent: usize) {
    let stripped = content.trim_end_matches('\n');
    let trailing = content.len() - stripped.len();
    out.push_str(match trailing {
        0 => "|-",
        1 => "|",
        _ => "|+",
    });
    out.push('\n');
    for line in stripped.split('\n') {
        if line.is_empty() {
            out.push('\n');
        } else {
            pad(out, indent);
            out.push_str(line);
            out.push('\n');
        }
    }
    for _ in 1..trailing {
        out.push('\n');
    }
}

fn single_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        if c == '\'' {
            out.push_str("''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

fn double_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::node::Tag;

    #[test]
    fn renders_the_standard_tape_layout() {
        let interaction = Node::map(vec![
            ("recorded".into(), Node::str("2013-10-01T13:27:37.000Z")),
            (
                "request".into(),
                Node::flow_seq(vec![Node::str("GET"), Node::str("http://x/")])
                    .with_tag(Tag::new("tape.request")),
            ),
            (
                "response".into(),
                Node::flow_seq(vec![
                    Node::int(200),
                    Node::flow_map(vec![("Content-Type".into(), Node::str("text/plain"))]),
                    Node::str("hello"),
                ])
                .with_tag(Tag::new("tape.response")),
            ),
        ]);
        let root = Node::map(vec![
            ("name".into(), Node::str("t1")),
            ("interactions".into(), Node::seq(vec![interaction])),
        ])
        .with_tag(Tag::new("tape"));

        let expected = "\
!tape
name: t1
interactions:
- recorded: 2013-10-01T13:27:37.000Z
  request: !tape.request [GET, 'http://x/']
  response: !tape.response [200, {Content-Type: text/plain}, hello]
";
        assert_eq!(to_yaml(&root), expected);
    }

    #[test]
    fn a_literal_body_pushes_the_sequence_back_to_block_style() {
        let request = Node::flow_seq(vec![
            Node::str("POST"),
            Node::str("http://x/submit"),
            Node::literal("line one\nline two"),
        ])
        .with_tag(Tag::new("tape.request"));
        let root = Node::map(vec![("request".into(), request)]);

        let expected = "\
request: !tape.request
- POST
- http://x/submit
- |-
  line one
  line two
";
        assert_eq!(to_yaml(&root), expected);
    }

    #[test]
    fn chomping_follows_trailing_newlines() {
        let strip = Node::map(vec![("body".into(), Node::literal("a\nb"))]);
        assert_eq!(to_yaml(&strip), "body: |-\n  a\n  b\n");

        let clip = Node::map(vec![("body".into(), Node::literal("a\nb\n"))]);
        assert_eq!(to_yaml(&clip), "body: |\n  a\n  b\n");

        let keep = Node::map(vec![("body".into(), Node::literal("a\n\n\n"))]);
        assert_eq!(to_yaml(&keep), "body: |+\n  a\n\n\n");
    }

    #[test]
    fn interior_blank_lines_carry_no_padding() {
        let root = Node::map(vec![("body".into(), Node::literal("a\n\nb"))]);
        assert_eq!(to_yaml(&root), "body: |-\n  a\n\n  b\n");
    }

    #[test]
    fn boolean_and_null_scalars_render_plain() {
        let root = Node::map(vec![
            ("enabled".into(), Node::bool(true)),
            ("archived".into(), Node::bool(false)),
            ("slot".into(), Node::null()),
        ]);
        assert_eq!(to_yaml(&root), "enabled: true\narchived: false\nslot: null\n");
    }

    #[test]
    fn strings_that_look_like_other_types_are_quoted() {
        let root = Node::map(vec![
            ("flag".into(), Node::str("true")),
            ("count".into(), Node::str("42")),
            ("nothing".into(), Node::str("null")),
        ]);
        assert_eq!(
            to_yaml(&root),
            "flag: 'true'\ncount: '42'\nnothing: 'null'\n"
        );
    }

    #[test]
    fn plain_urls_pick_up_quotes_only_inside_flow() {
        let block = Node::map(vec![("uri".into(), Node::str("http://x/"))]);
        assert_eq!(to_yaml(&block), "uri: http://x/\n");

        let flow = Node::flow_seq(vec![Node::str("http://x/")]);
        assert_eq!(to_yaml(&flow), "['http://x/']\n");
    }

    #[test]
    fn double_quoted_scalars_escape_their_controls() {
        let root = Node::map(vec![("text".into(), Node::str("a\nb\u{7}"))]);
        assert_eq!(to_yaml(&root), "text: \"a\\nb\\u0007\"\n");
    }

    #[test]
    fn tagged_empty_collections_render_flow() {
        let root = Node::map(vec![(
            "items".into(),
            Node::seq(vec![]).with_tag(Tag::new("marker")),
        )]);
        assert_eq!(to_yaml(&root), "items: !marker []\n");
    }

    #[test]
    fn nested_block_sequences_indent_below_their_dash() {
        let root = Node::map(vec![(
            "groups".into(),
            Node::seq(vec![Node::seq(vec![Node::str("a"), Node::str("b")])]),
        )]);
        assert_eq!(to_yaml(&root), "groups:\n-\n  - a\n  - b\n");
    }

    #[test]
    fn tagged_file_scalars_stay_inline() {
        let root = Node::map(vec![(
            "body".into(),
            Node::str("bodies/image.png").with_tag(Tag::new("file")),
        )]);
        assert_eq!(to_yaml(&root), "body: !file bodies/image.png\n");
    }
}
