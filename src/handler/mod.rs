//! The interception chain: composable steps between a caller and a
//! terminal that produces responses.

pub mod header_filter;
pub mod recording;
pub mod replaying;

pub use header_filter::HeaderFilter;
pub use recording::RecordingHandler;
pub use replaying::ReplayingHandler;

use std::error::Error;

use crate::message::{Request, Response};

/// Boxed error type that handler steps propagate.
///
/// Steps never wrap or translate errors from further down the chain; a
/// failure reaches the caller exactly as the failing step produced it.
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// One step in the interception chain.
///
/// A step either produces a response itself (a terminal) or transforms what
/// passes through on the way to an inner handler it owns.
pub trait HttpHandler: Send + Sync {
    /// Handles a request, producing a response.
    ///
    /// # Errors
    ///
    /// Returns whatever this step or anything below it fails with,
    /// unchanged.
    fn handle(&self, request: &dyn Request) -> Result<Box<dyn Response>, HandlerError>;
}
