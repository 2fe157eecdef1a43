//! The canonical node tree that tapes are rendered through.
//!
//! Serialization never goes straight from tape structs to text. It first
//! builds a tree of [`Node`] values carrying resolved tags, scalar styles and
//! flow hints, then hands the tree to the emitter. Keeping the tree explicit
//! is what makes the output deterministic and cheap to test.

use std::fmt;

/// An application tag such as `!tape` or `!tape.request`.
///
/// The leading `!` is implied; constructors accept either spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Creates a tag, normalizing to a single leading `!`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let bare = name.trim_start_matches('!');
        Self(format!("!{bare}"))
    }

    /// The tag with its leading `!`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A scalar payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A string.
    Str(String),
}

/// How a scalar is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Unquoted.
    Plain,
    /// Single-quoted.
    SingleQuoted,
    /// Double-quoted with escapes.
    DoubleQuoted,
    /// Block literal (`|`), only valid outside flow collections.
    Literal,
}

/// One node of the serialization tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A scalar leaf.
    Scalar {
        /// Application tag, if any.
        tag: Option<Tag>,
        /// The value.
        value: Scalar,
        /// Output style.
        style: ScalarStyle,
    },
    /// A sequence of nodes.
    Sequence {
        /// Application tag, if any.
        tag: Option<Tag>,
        /// Items in order.
        items: Vec<Node>,
        /// Prefer compact `[a, b]` rendering.
        flow: bool,
    },
    /// A mapping with string keys.
    Mapping {
        /// Application tag, if any.
        tag: Option<Tag>,
        /// Entries in their final output order.
        entries: Vec<(String, Node)>,
        /// Prefer compact `{a: b}` rendering.
        flow: bool,
    },
}

impl Node {
    /// A plain null scalar.
    #[must_use]
    pub fn null() -> Self {
        Node::Scalar { tag: None, value: Scalar::Null, style: ScalarStyle::Plain }
    }

    /// A plain boolean scalar.
    #[must_use]
    pub fn bool(value: bool) -> Self {
        Node::Scalar { tag: None, value: Scalar::Bool(value), style: ScalarStyle::Plain }
    }

    /// A plain integer scalar.
    #[must_use]
    pub fn int(value: i64) -> Self {
        Node::Scalar { tag: None, value: Scalar::Int(value), style: ScalarStyle::Plain }
    }

    /// A string scalar in its natural style, quoted only when plain text
    /// would be misread.
    #[must_use]
    pub fn str(value: impl Into<String>) -> Self {
        let value = value.into();
        let style = natural_style(&value);
        Node::Scalar { tag: None, value: Scalar::Str(value), style }
    }

    /// A string scalar forced to block literal style. The caller must have
    /// checked [`literal_safe`] first.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Node::Scalar {
            tag: None,
            value: Scalar::Str(value.into()),
            style: ScalarStyle::Literal,
        }
    }

    /// A block sequence.
    #[must_use]
    pub fn seq(items: Vec<Node>) -> Self {
        Node::Sequence { tag: None, items, flow: false }
    }

    /// A sequence that prefers `[a, b]` rendering.
    #[must_use]
    pub fn flow_seq(items: Vec<Node>) -> Self {
        Node::Sequence { tag: None, items, flow: true }
    }

    /// A block mapping.
    #[must_use]
    pub fn map(entries: Vec<(String, Node)>) -> Self {
        Node::Mapping { tag: None, entries, flow: false }
    }

    /// A mapping that prefers `{a: b}` rendering.
    #[must_use]
    pub fn flow_map(entries: Vec<(String, Node)>) -> Self {
        Node::Mapping { tag: None, entries, flow: true }
    }

    /// Returns this node with the given tag attached.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        match &mut self {
            Node::Scalar { tag: slot, .. }
            | Node::Sequence { tag: slot, .. }
            | Node::Mapping { tag: slot, .. } => *slot = Some(tag),
        }
        self
    }

    /// The node's tag, if any.
    #[must_use]
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Node::Scalar { tag, .. }
            | Node::Sequence { tag, .. }
            | Node::Mapping { tag, .. } => tag.as_ref(),
        }
    }

    /// True for an untagged null scalar.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Node::Scalar { tag: None, value: Scalar::Null, .. }
        )
    }

    /// True for an untagged sequence with no items.
    #[must_use]
    pub fn is_empty_sequence(&self) -> bool {
        matches!(self, Node::Sequence { tag: None, items, .. } if items.is_empty())
    }

    /// True for an untagged mapping with no entries.
    #[must_use]
    pub fn is_empty_mapping(&self) -> bool {
        matches!(self, Node::Mapping { tag: None, entries, .. } if entries.is_empty())
    }

    /// True when a mapping property holding this node is dropped entirely.
    #[must_use]
    pub fn elidable(&self) -> bool {
        self.is_null() || self.is_empty_sequence() || self.is_empty_mapping()
    }

    /// Whether the whole subtree can be rendered in flow style.
    ///
    /// Block literals cannot appear inside `[...]` or `{...}`, so any
    /// literal scalar anywhere below forces block rendering.
    #[must_use]
    pub fn flow_compatible(&self) -> bool {
        match self {
            Node::Scalar { style, .. } => *style != ScalarStyle::Literal,
            Node::Sequence { items, .. } => items.iter().all(Node::flow_compatible),
            Node::Mapping { entries, .. } => {
                entries.iter().all(|(_, node)| node.flow_compatible())
            }
        }
    }
}

/// Picks the style a string takes when nothing forces one.
///
/// Plain wherever YAML allows it, single quotes for text that would be
/// misread plain, double quotes once escapes are required.
#[must_use]
pub fn natural_style(s: &str) -> ScalarStyle {
    if plain_safe(s, false) {
        ScalarStyle::Plain
    } else if s.contains('\n') || s.chars().any(|c| c != '\n' && c.is_control()) {
        ScalarStyle::DoubleQuoted
    } else {
        ScalarStyle::SingleQuoted
    }
}

/// Whether a string survives unquoted.
///
/// Rejects anything a YAML parser would resolve to a different type or trip
/// over syntactically. Flow context is stricter: collection punctuation and
/// `:` anywhere force quotes there.
#[must_use]
pub fn plain_safe(s: &str, in_flow: bool) -> bool {
    if s.is_empty() || looks_like_other_type(s) {
        return false;
    }
    let first = s.chars().next().unwrap_or(' ');
    if "-?:,[]{}#&*!|>'\"%@` \t".contains(first) {
        return false;
    }
    if s.starts_with("---") || s.starts_with("...") {
        return false;
    }
    if s.ends_with([' ', '\t', ':']) {
        return false;
    }
    if s.contains(": ") || s.contains(" #") {
        return false;
    }
    if s.chars().any(char::is_control) {
        return false;
    }
    if in_flow && s.contains([',', '[', ']', '{', '}', ':']) {
        return false;
    }
    true
}

/// Whether a string can be emitted as a block literal.
///
/// Literal blocks carry printable text and newlines. Leading whitespace on
/// the first line would need an explicit indentation indicator, so such
/// strings keep their quoted form instead.
#[must_use]
pub fn literal_safe(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with([' ', '\n'])
        && s.chars().all(|c| c == '\n' || !c.is_control())
}

/// Strings a YAML parser reads as null, boolean or number: decimal forms,
/// the `.inf`/`.nan` float spellings, and `0x`/`0o`/`0b` radix integers.
/// The boolean set covers the legacy `yes`/`on` spellings so tapes stay
/// readable by older tooling.
fn looks_like_other_type(s: &str) -> bool {
    if s == "~" {
        return true;
    }
    let lower = s.to_ascii_lowercase();
    if matches!(
        lower.as_str(),
        "null" | "true" | "false" | "yes" | "no" | "on" | "off"
    ) {
        return true;
    }
    let unsigned = lower.strip_prefix('+').unwrap_or(&lower);
    if matches!(unsigned, ".inf" | ".nan") {
        return true;
    }
    for (prefix, base) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = unsigned.strip_prefix(prefix) {
            return u64::from_str_radix(digits, base).is_ok();
        }
    }
    s.parse::<i64>().is_ok() || s.parse::<f64>().is_ok()
}
