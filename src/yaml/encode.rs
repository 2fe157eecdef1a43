//! Turns a [`Tape`] into the canonical node tree.
//!
//! One encoding path exists per domain shape, dispatched statically; what a
//! caller can vary is the set of tags, through [`TagRegistry`]. Encoding
//! itself is infallible: every way to go wrong is caught at registry setup
//! or left to the I/O layers.

use chrono::{DateTime, Utc};

use crate::io::FileResolver;
use crate::message::{Body, Headers};
use crate::tape::format::{RecordedInteraction, RecordedRequest, RecordedResponse, Tape};
use crate::yaml::error::EncodeError;
use crate::yaml::node::{literal_safe, natural_style, Node, ScalarStyle, Tag};
use crate::yaml::order::{
    by_declared, by_key, INTERACTION_FIELDS, REQUEST_FIELDS, RESPONSE_FIELDS, TAPE_FIELDS,
};

/// Timestamps are stored at millisecond precision in UTC.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// The document shapes that carry a tag in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    /// The tape document root.
    Tape,
    /// The request half of an interaction.
    Request,
    /// The response half of an interaction.
    Response,
    /// A body stored in a sidecar file.
    FileRef,
}

impl DocumentType {
    /// Resolves a registration name to a document type.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tape" => Some(DocumentType::Tape),
            "request" => Some(DocumentType::Request),
            "response" => Some(DocumentType::Response),
            "file" => Some(DocumentType::FileRef),
            _ => None,
        }
    }

    /// The registration name of this type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DocumentType::Tape => "tape",
            DocumentType::Request => "request",
            DocumentType::Response => "response",
            DocumentType::FileRef => "file",
        }
    }
}

/// The tags attached to tagged document shapes.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    tape: Tag,
    request: Tag,
    response: Tag,
    file: Tag,
}

impl TagRegistry {
    /// The stock tag set: `!tape`, `!tape.request`, `!tape.response`,
    /// `!file`.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            tape: Tag::new("tape"),
            request: Tag::new("tape.request"),
            response: Tag::new("tape.response"),
            file: Tag::new("file"),
        }
    }

    /// Overrides the tag for a named document type.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::UnknownType`] when `type_name` is not one of
    /// the tagged shapes, and [`EncodeError::InvalidTag`] when the tag text
    /// could not survive in a YAML document.
    pub fn register(&mut self, type_name: &str, tag: &str) -> Result<(), EncodeError> {
        let Some(doc_type) = DocumentType::from_name(type_name) else {
            return Err(EncodeError::UnknownType { type_name: type_name.to_owned() });
        };
        let tag = validate_tag(doc_type, tag)?;
        match doc_type {
            DocumentType::Tape => self.tape = tag,
            DocumentType::Request => self.request = tag,
            DocumentType::Response => self.response = tag,
            DocumentType::FileRef => self.file = tag,
        }
        Ok(())
    }

    /// The tag currently registered for a document type.
    #[must_use]
    pub fn tag_for(&self, doc_type: DocumentType) -> &Tag {
        match doc_type {
            DocumentType::Tape => &self.tape,
            DocumentType::Request => &self.request,
            DocumentType::Response => &self.response,
            DocumentType::FileRef => &self.file,
        }
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate_tag(doc_type: DocumentType, tag: &str) -> Result<Tag, EncodeError> {
    let bare = tag.trim_start_matches('!');
    if bare.is_empty() {
        return Err(EncodeError::InvalidTag {
            type_name: doc_type.name().to_owned(),
            tag: tag.to_owned(),
            reason: "tag has no name".to_owned(),
        });
    }
    if bare
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || "!,[]{}\"'`#".contains(c))
    {
        return Err(EncodeError::InvalidTag {
            type_name: doc_type.name().to_owned(),
            tag: tag.to_owned(),
            reason: "tag contains characters YAML reserves".to_owned(),
        });
    }
    Ok(Tag::new(bare))
}

/// Maps tapes to canonical node trees.
#[derive(Debug, Clone)]
pub struct NodeMapper {
    tags: TagRegistry,
    resolver: FileResolver,
}

impl NodeMapper {
    /// Creates a mapper with the stock tag set, resolving body files against
    /// the given tape root.
    #[must_use]
    pub fn new(resolver: FileResolver) -> Self {
        Self { tags: TagRegistry::standard(), resolver }
    }

    /// Creates a mapper with a caller-configured tag set.
    #[must_use]
    pub fn with_tags(resolver: FileResolver, tags: TagRegistry) -> Self {
        Self { tags, resolver }
    }

    /// The tag registry, for setup-time overrides.
    pub fn tags_mut(&mut self) -> &mut TagRegistry {
        &mut self.tags
    }

    /// Builds the canonical node tree for a tape.
    ///
    /// Encoding the same logical tape always yields the same tree: field
    /// order is declared per type, generic mappings are key-sorted, and the
    /// interaction sequence keeps its recording order. The tape itself is
    /// never touched.
    #[must_use]
    pub fn encode(&self, tape: &Tape) -> Node {
        let interactions = tape
            .interactions
            .iter()
            .map(|interaction| self.encode_interaction(interaction))
            .collect();
        let properties = vec![
            ("name", Node::str(&tape.name)),
            ("interactions", Node::seq(interactions)),
        ];
        declared_mapping(TAPE_FIELDS, properties)
            .with_tag(self.tags.tag_for(DocumentType::Tape).clone())
    }

    fn encode_interaction(&self, interaction: &RecordedInteraction) -> Node {
        let properties = vec![
            ("recorded", Node::str(format_timestamp(&interaction.recorded))),
            ("request", self.encode_request(&interaction.request)),
            ("response", self.encode_response(&interaction.response)),
        ];
        declared_mapping(INTERACTION_FIELDS, properties)
    }

    /// Requests render as a compact positional sequence whose slot layout
    /// follows [`REQUEST_FIELDS`]: method, uri, headers, body.
    fn encode_request(&self, request: &RecordedRequest) -> Node {
        let properties = vec![
            ("method", Node::str(&request.method)),
            ("uri", Node::str(request.url.as_str())),
            ("headers", encode_headers(&request.headers)),
            ("body", self.encode_optional_body(request.body.as_ref())),
        ];
        let slots = positional(slot_values(REQUEST_FIELDS, properties));
        Node::flow_seq(slots).with_tag(self.tags.tag_for(DocumentType::Request).clone())
    }

    fn encode_response(&self, response: &RecordedResponse) -> Node {
        let properties = vec![
            ("status", Node::int(i64::from(response.status))),
            ("headers", encode_headers(&response.headers)),
            ("body", self.encode_optional_body(response.body.as_ref())),
        ];
        let slots = positional(slot_values(RESPONSE_FIELDS, properties));
        Node::flow_seq(slots).with_tag(self.tags.tag_for(DocumentType::Response).clone())
    }

    fn encode_optional_body(&self, body: Option<&Body>) -> Node {
        match body {
            None => Node::null(),
            Some(body) => self.encode_body(body),
        }
    }

    /// Text bodies stay plain when plain is their natural style; anything
    /// that would need quoting goes block literal instead, so multi-line
    /// payloads stay readable in the tape. Content a literal block cannot
    /// carry keeps its natural quoted form.
    fn encode_body(&self, body: &Body) -> Node {
        match body {
            Body::Text(text) => {
                if natural_style(text) == ScalarStyle::Plain {
                    Node::str(text)
                } else if literal_safe(text) {
                    Node::literal(text)
                } else {
                    Node::str(text)
                }
            }
            Body::File(path) => Node::str(self.resolver.to_tape_path(path))
                .with_tag(self.tags.tag_for(DocumentType::FileRef).clone()),
        }
    }
}

/// Headers flatten to a single value per name, the first one captured, and
/// the names sort lexicographically. The flatten is lossy on purpose; the
/// capture keeps every value, only the tape does not.
fn encode_headers(headers: &Headers) -> Node {
    let entries = headers
        .iter()
        .filter_map(|(name, values)| {
            values
                .first()
                .map(|value| (name.to_owned(), Node::str(value.as_str())))
        })
        .collect();
    Node::flow_map(by_key(entries))
}

/// Builds a block mapping with elision applied, then declared ordering.
fn declared_mapping(declared: &[&str], properties: Vec<(&'static str, Node)>) -> Node {
    let kept = properties
        .into_iter()
        .filter(|(_, node)| !node.elidable())
        .map(|(name, node)| (name.to_owned(), node))
        .collect();
    Node::map(by_declared(declared, kept))
}

/// Orders named properties by the declared field list and drops the names,
/// leaving the value-only slots a positional sequence carries. The same
/// declaration tables drive mappings and positional forms.
fn slot_values(declared: &[&str], properties: Vec<(&str, Node)>) -> Vec<Node> {
    by_declared(declared, properties)
        .into_iter()
        .map(|(_, node)| node)
        .collect()
}

/// Applies the positional-slot policy: trailing empty slots are trimmed so
/// short forms stay short, while interior empty slots become an explicit
/// null placeholder so later positions keep their meaning.
fn positional(mut slots: Vec<Node>) -> Vec<Node> {
    while slots.last().is_some_and(Node::elidable) {
        slots.pop();
    }
    for slot in &mut slots {
        if slot.elidable() {
            *slot = Node::null();
        }
    }
    slots
}

/// Renders a capture timestamp in the on-tape form, millisecond precision.
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use url::Url;

    fn mapper() -> NodeMapper {
        NodeMapper::new(FileResolver::new("/tapes"))
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 10, 1, 13, 27, 37).unwrap()
    }

    fn get_request(url: &str) -> RecordedRequest {
        RecordedRequest {
            method: "GET".into(),
            url: Url::parse(url).unwrap(),
            headers: Headers::new(),
            body: None,
        }
    }

    fn ok_response(body: Option<Body>) -> RecordedResponse {
        RecordedResponse { status: 200, headers: Headers::new(), body }
    }

    fn entry_names(node: &Node) -> Vec<String> {
        match node {
            Node::Mapping { entries, .. } => {
                entries.iter().map(|(name, _)| name.clone()).collect()
            }
            other => panic!("expected a mapping, got {other:?}"),
        }
    }

    fn sequence_items(node: &Node) -> &[Node] {
        match node {
            Node::Sequence { items, .. } => items,
            other => panic!("expected a sequence, got {other:?}"),
        }
    }

    #[test]
    fn tape_root_is_tagged_and_ordered() {
        let mut tape = Tape::new("t1");
        tape.interactions.push(RecordedInteraction {
            recorded: instant(),
            request: get_request("http://x/"),
            response: ok_response(None),
        });
        let root = mapper().encode(&tape);

        assert_eq!(root.tag(), Some(&Tag::new("tape")));
        assert_eq!(entry_names(&root), ["name", "interactions"]);
    }

    #[test]
    fn a_tape_with_no_interactions_elides_the_sequence() {
        let root = mapper().encode(&Tape::new("empty"));
        assert_eq!(entry_names(&root), ["name"]);
    }

    #[test]
    fn interaction_fields_follow_the_declared_order() {
        let interaction = RecordedInteraction {
            recorded: instant(),
            request: get_request("http://x/"),
            response: ok_response(None),
        };
        let node = mapper().encode_interaction(&interaction);
        assert_eq!(entry_names(&node), ["recorded", "request", "response"]);
    }

    #[test]
    fn timestamps_render_at_millisecond_precision() {
        assert_eq!(format_timestamp(&instant()), "2013-10-01T13:27:37.000Z");
    }

    #[test]
    fn bare_requests_trim_down_to_method_and_uri() {
        let node = mapper().encode_request(&get_request("http://x/"));
        let items = sequence_items(&node);

        assert_eq!(node.tag(), Some(&Tag::new("tape.request")));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Node::str("GET"));
        assert_eq!(items[1], Node::str("http://x/"));
    }

    #[test]
    fn an_interior_empty_slot_becomes_an_explicit_null() {
        let mut request = get_request("http://x/");
        request.body = Some(Body::text("payload"));
        let node = mapper().encode_request(&request);
        let items = sequence_items(&node);

        assert_eq!(items.len(), 4);
        assert!(items[2].is_null());
        assert_eq!(items[3], Node::str("payload"));
    }

    #[test]
    fn positional_slots_follow_the_declared_field_tables() {
        let mut request = get_request("http://x/");
        request.headers.append("Accept", "*/*");
        request.body = Some(Body::text("payload"));
        let node = mapper().encode_request(&request);
        let items = sequence_items(&node);
        assert_eq!(items.len(), REQUEST_FIELDS.len());
        assert_eq!(items[0], Node::str("GET"));
        assert_eq!(items[1], Node::str("http://x/"));
        assert_eq!(items[2], encode_headers(&request.headers));
        assert_eq!(items[3], Node::str("payload"));

        let mut response = ok_response(Some(Body::text("done")));
        response.headers.append("Server", "x");
        let node = mapper().encode_response(&response);
        let items = sequence_items(&node);
        assert_eq!(items.len(), RESPONSE_FIELDS.len());
        assert_eq!(items[0], Node::int(200));
        assert_eq!(items[1], encode_headers(&response.headers));
        assert_eq!(items[2], Node::str("done"));
    }

    #[test]
    fn headers_flatten_to_the_first_value_and_sort_by_name() {
        let mut headers = Headers::new();
        headers.append("X-Trace", "abc");
        headers.append("Accept", "text/html");
        headers.append("Accept", "application/json");
        let node = encode_headers(&headers);

        match node {
            Node::Mapping { entries, flow, .. } => {
                assert!(flow);
                let rendered: Vec<_> = entries
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.clone()))
                    .collect();
                assert_eq!(
                    rendered,
                    [
                        ("Accept", Node::str("text/html")),
                        ("X-Trace", Node::str("abc")),
                    ]
                );
            }
            other => panic!("expected a mapping, got {other:?}"),
        }
    }

    #[test]
    fn single_line_bodies_stay_plain() {
        let node = mapper().encode_body(&Body::text("hello"));
        assert_eq!(node, Node::str("hello"));
    }

    #[test]
    fn multi_line_bodies_go_literal() {
        let node = mapper().encode_body(&Body::text("line one\nline two\n"));
        match node {
            Node::Scalar { style, .. } => assert_eq!(style, ScalarStyle::Literal),
            other => panic!("expected a scalar, got {other:?}"),
        }
    }

    #[test]
    fn bodies_a_literal_block_cannot_carry_keep_their_quoted_form() {
        let node = mapper().encode_body(&Body::text("bell\u{7}sound"));
        match node {
            Node::Scalar { style, .. } => assert_eq!(style, ScalarStyle::DoubleQuoted),
            other => panic!("expected a scalar, got {other:?}"),
        }
    }

    #[test]
    fn file_bodies_become_tagged_tape_relative_paths() {
        let body = Body::file("/tapes/bodies/image.png");
        let node = mapper().encode_body(&body);

        assert_eq!(node.tag(), Some(&Tag::new("file")));
        match node {
            Node::Scalar { value, .. } => {
                assert_eq!(value, crate::yaml::node::Scalar::Str("bodies/image.png".into()));
            }
            other => panic!("expected a scalar, got {other:?}"),
        }
    }

    #[test]
    fn encoding_twice_yields_identical_trees() {
        let mut tape = Tape::new("determinism");
        let mut headers = Headers::new();
        headers.append("B-Header", "2");
        headers.append("A-Header", "1");
        tape.interactions.push(RecordedInteraction {
            recorded: instant(),
            request: RecordedRequest {
                method: "POST".into(),
                url: Url::parse("http://example.com/submit").unwrap(),
                headers,
                body: Some(Body::text("a\nb\n")),
            },
            response: ok_response(Some(Body::text("done"))),
        });

        assert_eq!(mapper().encode(&tape), mapper().encode(&tape));
    }

    #[test]
    fn header_insertion_order_does_not_leak_into_the_tree() {
        let mut forward = Headers::new();
        forward.append("Alpha", "1");
        forward.append("Beta", "2");
        let mut backward = Headers::new();
        backward.append("Beta", "2");
        backward.append("Alpha", "1");

        assert_eq!(encode_headers(&forward), encode_headers(&backward));
    }

    #[test]
    fn custom_tags_replace_the_stock_ones() {
        let mut tags = TagRegistry::standard();
        tags.register("tape", "!cassette").unwrap();
        let mapper = NodeMapper::with_tags(FileResolver::new("/tapes"), tags);
        let root = mapper.encode(&Tape::new("t"));
        assert_eq!(root.tag(), Some(&Tag::new("cassette")));
    }

    #[test]
    fn registering_an_unknown_type_is_a_configuration_error() {
        let mut tags = TagRegistry::standard();
        let err = tags.register("cookie_jar", "!jar").unwrap_err();
        match err {
            EncodeError::UnknownType { type_name } => assert_eq!(type_name, "cookie_jar"),
            other => panic!("expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn unusable_tag_text_is_rejected() {
        let mut tags = TagRegistry::standard();
        assert!(matches!(
            tags.register("tape", "!"),
            Err(EncodeError::InvalidTag { .. })
        ));
        assert!(matches!(
            tags.register("response", "!has space"),
            Err(EncodeError::InvalidTag { .. })
        ));
    }
}
