//! Read-only message views and the vocabulary types they share.
//!
//! The traits here are capability surfaces: a [`Request`] exposes method,
//! URL, headers, and body; a [`Response`] exposes status, headers, and body.
//! Recorded tape values implement them directly, and the decorators in
//! [`filtering`] implement them by delegation so a handler chain can hand
//! transformed views downstream without touching the originals.

pub mod filtering;
pub mod headers;

pub use headers::Headers;

use std::path::PathBuf;

use url::Url;

/// A message payload: inline text, or a reference to a file stored next to
/// the tape it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Inline textual payload.
    Text(String),
    /// Reference to a sidecar file holding the payload.
    File(PathBuf),
}

impl Body {
    /// Builds an inline text body.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Builds a file-reference body.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Returns the inline text when this body holds one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File(_) => None,
        }
    }
}

/// Read-only view of an HTTP message.
///
/// `headers()` returns an owned snapshot rather than a borrow so that
/// decorating views can compute a transformed set on each access without
/// mutating the value they wrap.
pub trait Message {
    /// The message headers as this view presents them.
    fn headers(&self) -> Headers;

    /// The message body, if any.
    fn body(&self) -> Option<&Body>;

    /// First value of the named header, as this view presents it.
    fn header(&self, name: &str) -> Option<String> {
        self.headers().get(name).map(str::to_owned)
    }
}

/// Read-only view of an HTTP request.
pub trait Request: Message {
    /// The request method, e.g. `GET`.
    fn method(&self) -> &str;

    /// The request URL.
    fn url(&self) -> &Url;
}

/// Read-only view of an HTTP response.
pub trait Response: Message {
    /// The response status code.
    fn status(&self) -> u16;
}
