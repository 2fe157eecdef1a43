//! Parses persisted tape documents back into [`Tape`] values.
//!
//! Reading is deliberately more liberal than writing: request and response
//! sequences may be tagged or untagged, header mappings may carry one value
//! or a list per name, interior slots may be null, and trailing slots may be
//! missing. File-reference bodies come back with their tape-relative path;
//! resolving them against a directory is the caller's business.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_yaml::{Mapping, Value};
use tracing::debug;
use url::Url;

use crate::message::{Body, Headers};
use crate::tape::format::{RecordedInteraction, RecordedRequest, RecordedResponse, Tape};
use crate::yaml::error::TapeError;

/// Parses a tape document from YAML text.
///
/// # Errors
///
/// Returns [`TapeError::Yaml`] when the text is not YAML at all and
/// [`TapeError::Malformed`] when it parses but does not describe a tape.
pub fn parse_tape(text: &str) -> Result<Tape, TapeError> {
    let value: Value = serde_yaml::from_str(text)?;
    tape_from_value(value)
}

/// Reads and parses a tape file.
///
/// # Errors
///
/// Returns [`TapeError::Read`] when the file cannot be read, plus everything
/// [`parse_tape`] returns.
pub fn load_tape(path: &Path) -> Result<Tape, TapeError> {
    debug!(path = %path.display(), "loading tape");
    let text = fs::read_to_string(path).map_err(|source| TapeError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse_tape(&text)
}

fn tape_from_value(value: Value) -> Result<Tape, TapeError> {
    let value = untag(value);
    let Value::Mapping(map) = value else {
        return Err(TapeError::malformed("tape root is not a mapping"));
    };
    let name = match entry(&map, "name") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err(TapeError::malformed("tape name is not a string")),
        None => return Err(TapeError::malformed("tape has no name")),
    };
    let interactions = match entry(&map, "interactions") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items
            .iter()
            .enumerate()
            .map(|(at, item)| interaction_from_value(item.clone(), at))
            .collect::<Result<_, _>>()?,
        Some(_) => return Err(TapeError::malformed("interactions is not a sequence")),
    };
    Ok(Tape { name, interactions })
}

fn interaction_from_value(value: Value, at: usize) -> Result<RecordedInteraction, TapeError> {
    let value = untag(value);
    let Value::Mapping(map) = value else {
        return Err(TapeError::malformed(format!(
            "interaction {at} is not a mapping"
        )));
    };
    let recorded = match entry(&map, "recorded") {
        Some(Value::String(text)) => timestamp_from(text)?,
        _ => {
            return Err(TapeError::malformed(format!(
                "interaction {at} has no recorded timestamp"
            )))
        }
    };
    let request = entry(&map, "request")
        .cloned()
        .ok_or_else(|| TapeError::malformed(format!("interaction {at} has no request")))?;
    let response = entry(&map, "response")
        .cloned()
        .ok_or_else(|| TapeError::malformed(format!("interaction {at} has no response")))?;
    Ok(RecordedInteraction {
        recorded,
        request: request_from_value(request, at)?,
        response: response_from_value(response, at)?,
    })
}

fn request_from_value(value: Value, at: usize) -> Result<RecordedRequest, TapeError> {
    let value = untag(value);
    let Value::Sequence(slots) = value else {
        return Err(TapeError::malformed(format!(
            "interaction {at}: request is not a sequence"
        )));
    };
    let mut slots = slots.into_iter();
    let method = match slots.next() {
        Some(Value::String(method)) => method,
        _ => {
            return Err(TapeError::malformed(format!(
                "interaction {at}: request has no method"
            )))
        }
    };
    let uri = match slots.next() {
        Some(Value::String(uri)) => uri,
        _ => {
            return Err(TapeError::malformed(format!(
                "interaction {at}: request has no uri"
            )))
        }
    };
    let url = Url::parse(&uri).map_err(|_| {
        TapeError::malformed(format!("interaction {at}: unreadable request uri `{uri}`"))
    })?;
    let headers = headers_from_slot(slots.next(), at)?;
    let body = body_from_slot(slots.next(), at)?;
    Ok(RecordedRequest { method, url, headers, body })
}

fn response_from_value(value: Value, at: usize) -> Result<RecordedResponse, TapeError> {
    let value = untag(value);
    let Value::Sequence(slots) = value else {
        return Err(TapeError::malformed(format!(
            "interaction {at}: response is not a sequence"
        )));
    };
    let mut slots = slots.into_iter();
    let status = match slots.next() {
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|wide| u16::try_from(wide).ok())
            .ok_or_else(|| {
                TapeError::malformed(format!("interaction {at}: status out of range"))
            })?,
        Some(Value::String(text)) => text.parse::<u16>().map_err(|_| {
            TapeError::malformed(format!("interaction {at}: unreadable status `{text}`"))
        })?,
        _ => {
            return Err(TapeError::malformed(format!(
                "interaction {at}: response has no status"
            )))
        }
    };
    let headers = headers_from_slot(slots.next(), at)?;
    let body = body_from_slot(slots.next(), at)?;
    Ok(RecordedResponse { status, headers, body })
}

fn headers_from_slot(slot: Option<Value>, at: usize) -> Result<Headers, TapeError> {
    let Some(value) = slot else {
        return Ok(Headers::new());
    };
    match untag(value) {
        Value::Null => Ok(Headers::new()),
        Value::Mapping(map) => {
            let mut headers = Headers::new();
            for (key, value) in &map {
                let Value::String(name) = key else {
                    return Err(TapeError::malformed(format!(
                        "interaction {at}: header name is not a string"
                    )));
                };
                match value {
                    Value::Sequence(values) => {
                        for value in values {
                            headers.append(name.clone(), header_value(value, at)?);
                        }
                    }
                    single => headers.append(name.clone(), header_value(single, at)?),
                }
            }
            Ok(headers)
        }
        _ => Err(TapeError::malformed(format!(
            "interaction {at}: headers are not a mapping"
        ))),
    }
}

/// Hand-edited tapes sometimes leave header values unquoted, so numbers and
/// booleans are read back as their text.
fn header_value(value: &Value, at: usize) -> Result<String, TapeError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(TapeError::malformed(format!(
            "interaction {at}: header value is not text"
        ))),
    }
}

fn body_from_slot(slot: Option<Value>, at: usize) -> Result<Option<Body>, TapeError> {
    match slot {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(Body::Text(text))),
        Some(Value::Tagged(tagged)) => match tagged.value {
            Value::String(path) => Ok(Some(Body::File(PathBuf::from(path)))),
            _ => Err(TapeError::malformed(format!(
                "interaction {at}: file reference is not a path"
            ))),
        },
        Some(_) => Err(TapeError::malformed(format!(
            "interaction {at}: body is neither text nor a file reference"
        ))),
    }
}

fn timestamp_from(text: &str) -> Result<DateTime<Utc>, TapeError> {
    DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| TapeError::malformed(format!("unreadable timestamp `{text}`")))
}

/// Strips a tag wrapper, if any. Readers accept tagged and untagged forms
/// alike; the tag itself only matters for file references, which keep their
/// wrapper until [`body_from_slot`].
fn untag(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => tagged.value,
        other => other,
    }
}

fn entry<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.iter().find_map(|(name, value)| match name {
        Value::String(text) if text.as_str() == key => Some(value),
        _ => None,
    })
}
