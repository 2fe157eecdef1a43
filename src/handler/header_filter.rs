//! Chain step that filters headers on the way down and on the way back up.

use crate::handler::{HandlerError, HttpHandler};
use crate::message::filtering::{
    strip_transport_headers, HeaderFilteringRequest, HeaderFilteringResponse, HeaderTransform,
};
use crate::message::{Request, Response};

/// Applies one transform to the request it passes down and another to the
/// response it passes back up.
///
/// Underlying messages are never touched; the inner handler sees a
/// decorating view of the request, and the caller sees a decorating view of
/// the response. Nesting several filters composes their transforms.
pub struct HeaderFilter {
    request_transform: HeaderTransform,
    response_transform: HeaderTransform,
    next: Box<dyn HttpHandler>,
}

impl HeaderFilter {
    /// The stock filter: strips hop-by-hop transport headers in both
    /// directions.
    #[must_use]
    pub fn new(next: Box<dyn HttpHandler>) -> Self {
        Self::with_transforms(strip_transport_headers(), strip_transport_headers(), next)
    }

    /// Applies the same transform in both directions.
    #[must_use]
    pub fn with_transform(transform: HeaderTransform, next: Box<dyn HttpHandler>) -> Self {
        Self::with_transforms(transform.clone(), transform, next)
    }

    /// Applies independent request and response transforms.
    #[must_use]
    pub fn with_transforms(
        request_transform: HeaderTransform,
        response_transform: HeaderTransform,
        next: Box<dyn HttpHandler>,
    ) -> Self {
        Self { request_transform, response_transform, next }
    }
}

impl HttpHandler for HeaderFilter {
    fn handle(&self, request: &dyn Request) -> Result<Box<dyn Response>, HandlerError> {
        let filtered = HeaderFilteringRequest::new(request, self.request_transform.clone());
        let response = self.next.handle(&filtered)?;
        Ok(Box::new(HeaderFilteringResponse::new(
            response,
            self.response_transform.clone(),
        )))
    }
}
