//! Tape model plus the recorder and replayer that produce and consume it.

pub mod format;
pub mod recorder;
pub mod replayer;

pub use format::{RecordedInteraction, RecordedRequest, RecordedResponse, Tape};
pub use recorder::TapeRecorder;
pub use replayer::TapeReplayer;
