//! Chain step that records the exchanges passing through it.

use std::sync::{Arc, Mutex};

use crate::handler::{HandlerError, HttpHandler};
use crate::message::{Request, Response};
use crate::tape::recorder::TapeRecorder;

/// Records each successful exchange while delegating to an inner handler.
///
/// The snapshot keeps the request view this step receives and the response
/// view the inner handler returns. A filter above this step therefore
/// redacts the recorded request; a filter below it redacts the recorded
/// response. Failed exchanges are not recorded.
pub struct RecordingHandler {
    recorder: Arc<Mutex<TapeRecorder>>,
    next: Box<dyn HttpHandler>,
}

impl RecordingHandler {
    /// Creates a recording step around the given inner handler.
    pub fn new(recorder: Arc<Mutex<TapeRecorder>>, next: Box<dyn HttpHandler>) -> Self {
        Self { recorder, next }
    }
}

impl HttpHandler for RecordingHandler {
    fn handle(&self, request: &dyn Request) -> Result<Box<dyn Response>, HandlerError> {
        let response = self.next.handle(request)?;
        {
            let mut recorder = self.recorder.lock().expect("recorder lock poisoned");
            recorder.record(request, response.as_ref());
        }
        Ok(response)
    }
}
