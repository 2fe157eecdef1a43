//! Chain terminal that serves responses from a tape.

use std::sync::Mutex;

use crate::handler::{HandlerError, HttpHandler};
use crate::message::{Request, Response};
use crate::tape::replayer::TapeReplayer;

/// Serves recorded responses in tape order instead of performing real I/O.
pub struct ReplayingHandler {
    replayer: Mutex<TapeReplayer>,
}

impl ReplayingHandler {
    /// Creates a terminal over the given replayer.
    #[must_use]
    pub fn new(replayer: TapeReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl HttpHandler for ReplayingHandler {
    fn handle(&self, request: &dyn Request) -> Result<Box<dyn Response>, HandlerError> {
        let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
        match replayer.next_interaction() {
            Some(interaction) => Ok(Box::new(interaction.response.clone())),
            None => Err(format!(
                "tape `{}` is exhausted: no recorded response left for {} {}",
                replayer.tape_name(),
                request.method(),
                request.url(),
            )
            .into()),
        }
    }
}
