//! Replays interactions from a loaded tape.

use std::path::Path;

use tracing::debug;

use crate::tape::format::{RecordedInteraction, Tape};
use crate::yaml::error::TapeError;
use crate::yaml::loader;

/// Serves a tape's interactions strictly in recording order.
///
/// There is no request matching: the next interaction is served regardless
/// of what is asked, which keeps replay deterministic for clients that issue
/// the same traffic in the same order they recorded it.
#[derive(Debug)]
pub struct TapeReplayer {
    tape: Tape,
    cursor: usize,
}

impl TapeReplayer {
    /// Creates a replayer over an in-memory tape.
    #[must_use]
    pub fn new(tape: Tape) -> Self {
        Self { tape, cursor: 0 }
    }

    /// Loads a tape file and replays it.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, TapeError> {
        Ok(Self::new(loader::load_tape(path)?))
    }

    /// The name of the tape being replayed.
    #[must_use]
    pub fn tape_name(&self) -> &str {
        &self.tape.name
    }

    /// How many interactions have not been served yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tape.interactions.len() - self.cursor
    }

    /// Serves the next interaction, or `None` once the tape is exhausted.
    pub fn next_interaction(&mut self) -> Option<&RecordedInteraction> {
        let interaction = self.tape.interactions.get(self.cursor)?;
        self.cursor += 1;
        debug!(
            tape = %self.tape.name,
            served = self.cursor,
            "serving recorded interaction"
        );
        Some(interaction)
    }
}
