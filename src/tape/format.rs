//! Tape data structures for recording and replaying HTTP interactions.

use chrono::{DateTime, Utc};
use url::Url;

use crate::message::{Body, Headers, Message, Request, Response};

/// A named tape holding a sequence of recorded interactions.
#[derive(Debug, Clone, PartialEq)]
pub struct Tape {
    /// Human-readable name; also the basis of the tape's file name.
    pub name: String,
    /// Interactions in recording order. The order is data: serialization
    /// must never reorder it.
    pub interactions: Vec<RecordedInteraction>,
}

impl Tape {
    /// Creates an empty tape with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), interactions: Vec::new() }
    }
}

/// A single captured request/response exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInteraction {
    /// When this exchange was captured.
    pub recorded: DateTime<Utc>,
    /// The request as observed at capture time.
    pub request: RecordedRequest,
    /// The response as observed at capture time.
    pub response: RecordedResponse,
}

/// The request half of a recorded interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Request method, e.g. `GET`.
    pub method: String,
    /// Request URL in canonical form.
    pub url: Url,
    /// Headers in capture order.
    pub headers: Headers,
    /// Request body, if any.
    pub body: Option<Body>,
}

impl RecordedRequest {
    /// Snapshots a request view. The snapshot holds whatever the view
    /// presents, so a filtered view yields a filtered capture.
    #[must_use]
    pub fn from_request(request: &dyn Request) -> Self {
        Self {
            method: request.method().to_owned(),
            url: request.url().clone(),
            headers: request.headers(),
            body: request.body().cloned(),
        }
    }
}

/// The response half of a recorded interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedResponse {
    /// Response status code.
    pub status: u16,
    /// Headers in capture order.
    pub headers: Headers,
    /// Response body, if any.
    pub body: Option<Body>,
}

impl RecordedResponse {
    /// Snapshots a response view, filtered or not.
    #[must_use]
    pub fn from_response(response: &dyn Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers(),
            body: response.body().cloned(),
        }
    }
}

impl Message for RecordedRequest {
    fn headers(&self) -> Headers {
        self.headers.clone()
    }

    fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }
}

impl Request for RecordedRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn url(&self) -> &Url {
        &self.url
    }
}

impl Message for RecordedResponse {
    fn headers(&self) -> Headers {
        self.headers.clone()
    }

    fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }
}

impl Response for RecordedResponse {
    fn status(&self) -> u16 {
        self.status
    }
}
