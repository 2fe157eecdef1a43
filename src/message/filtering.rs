//! Header-filtering decorators for requests and responses.
//!
//! A filtering view wraps a message, applies a pure [`HeaderTransform`] in
//! its `headers()` accessor, and delegates everything else to the wrapped
//! value. The original message is never mutated; downstream consumers simply
//! observe the transformed headers.

use std::sync::Arc;

use url::Url;

use super::{Body, Headers, Message, Request, Response};

/// Pure transformation applied to a message's headers.
///
/// Transforms must hold no mutable state: the same chain instance may serve
/// overlapping exchanges from several threads.
pub type HeaderTransform = Arc<dyn Fn(Headers) -> Headers + Send + Sync>;

/// Header names that describe the transport hop rather than the exchange.
/// The stock filter drops them so they are neither forwarded nor recorded.
const NO_PASS_HEADERS: [&str; 11] = [
    "Connection",
    "Content-Length",
    "Host",
    "Keep-Alive",
    "Proxy-Authenticate",
    "Proxy-Authorization",
    "Proxy-Connection",
    "TE",
    "Trailers",
    "Transfer-Encoding",
    "Upgrade",
];

/// Transform that passes headers through unchanged.
#[must_use]
pub fn keep_all() -> HeaderTransform {
    Arc::new(|headers| headers)
}

/// Transform that removes the named headers (case-insensitive).
pub fn remove_headers<I, S>(names: I) -> HeaderTransform
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    Arc::new(move |mut headers| {
        for name in &names {
            headers.remove(name);
        }
        headers
    })
}

/// Transform that replaces the value of `name` wherever it is present,
/// leaving absent headers absent.
pub fn replace_header(name: impl Into<String>, replacement: impl Into<String>) -> HeaderTransform {
    let name = name.into();
    let replacement = replacement.into();
    Arc::new(move |mut headers| {
        if headers.contains(&name) {
            headers.set(name.clone(), replacement.clone());
        }
        headers
    })
}

/// Transform that strips hop-by-hop and transport bookkeeping headers
/// (`Connection`, `Keep-Alive`, `Proxy-*`, `TE`, `Trailers`,
/// `Transfer-Encoding`, `Upgrade`, `Content-Length`, `Host`).
#[must_use]
pub fn strip_transport_headers() -> HeaderTransform {
    remove_headers(NO_PASS_HEADERS)
}

/// Request view that applies a header transform and delegates every other
/// accessor to the wrapped request.
pub struct HeaderFilteringRequest<'a> {
    inner: &'a dyn Request,
    transform: HeaderTransform,
}

impl<'a> HeaderFilteringRequest<'a> {
    /// Wraps `inner` with the given header transform.
    pub fn new(inner: &'a dyn Request, transform: HeaderTransform) -> Self {
        Self { inner, transform }
    }
}

impl Message for HeaderFilteringRequest<'_> {
    fn headers(&self) -> Headers {
        (self.transform)(self.inner.headers())
    }

    fn body(&self) -> Option<&Body> {
        self.inner.body()
    }
}

impl Request for HeaderFilteringRequest<'_> {
    fn method(&self) -> &str {
        self.inner.method()
    }

    fn url(&self) -> &Url {
        self.inner.url()
    }
}

/// Response view that applies a header transform and delegates every other
/// accessor to the wrapped response.
pub struct HeaderFilteringResponse {
    inner: Box<dyn Response>,
    transform: HeaderTransform,
}

impl HeaderFilteringResponse {
    /// Wraps `inner` with the given header transform.
    #[must_use]
    pub fn new(inner: Box<dyn Response>, transform: HeaderTransform) -> Self {
        Self { inner, transform }
    }
}

impl Message for HeaderFilteringResponse {
    fn headers(&self) -> Headers {
        (self.transform)(self.inner.headers())
    }

    fn body(&self) -> Option<&Body> {
        self.inner.body()
    }
}

impl Response for HeaderFilteringResponse {
    fn status(&self) -> u16 {
        self.inner.status()
    }
}
