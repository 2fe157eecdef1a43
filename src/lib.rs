//! Records HTTP interactions onto tapes and replays them for reproducible
//! tests.
//!
//! A tape is a named, ordered list of request/response exchanges persisted
//! as deterministic, diff-friendly YAML: field order is fixed per type,
//! null and empty values are omitted, multi-line bodies render as literal
//! blocks, and the same tape always serializes to the same bytes. Traffic
//! reaches the recorder through an interception chain of
//! [`handler::HttpHandler`] steps, so header filters placed around the
//! recording step redact both what the caller sees and what the tape keeps.
//!
//! The usual wiring is [`tape::TapeRecorder`] behind a
//! [`handler::RecordingHandler`] while capturing, then a
//! [`handler::ReplayingHandler`] over the written file when the test runs
//! offline.

pub mod handler;
pub mod io;
pub mod message;
pub mod tape;
pub mod yaml;

pub use message::{Body, Headers, Message, Request, Response};
pub use tape::{
    RecordedInteraction, RecordedRequest, RecordedResponse, Tape, TapeRecorder, TapeReplayer,
};
pub use yaml::{TapeError, TapeWriter};
