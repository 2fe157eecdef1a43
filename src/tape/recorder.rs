//! Records interactions onto a tape file.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::message::{Request, Response};
use crate::tape::format::{RecordedInteraction, RecordedRequest, RecordedResponse, Tape};
use crate::yaml::error::TapeError;
use crate::yaml::writer::TapeWriter;

/// Accumulates interactions and writes them as a YAML tape file.
#[derive(Debug)]
pub struct TapeRecorder {
    writer: TapeWriter,
    tape: Tape,
}

impl TapeRecorder {
    /// Creates a recorder for a named tape stored under the given root
    /// directory.
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            writer: TapeWriter::new(root),
            tape: Tape::new(name),
        }
    }

    /// Records one exchange, stamped with the current time.
    ///
    /// The snapshot captures whatever the given views present, so filtered
    /// views record filtered values.
    pub fn record(&mut self, request: &dyn Request, response: &dyn Response) {
        self.record_at(Utc::now(), request, response);
    }

    /// Records one exchange with an explicit capture timestamp.
    pub fn record_at(
        &mut self,
        recorded: DateTime<Utc>,
        request: &dyn Request,
        response: &dyn Response,
    ) {
        debug!(
            method = request.method(),
            url = %request.url(),
            status = response.status(),
            "recording interaction"
        );
        self.tape.interactions.push(RecordedInteraction {
            recorded,
            request: RecordedRequest::from_request(request),
            response: RecordedResponse::from_response(response),
        });
    }

    /// The tape as captured so far.
    #[must_use]
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Finishes recording and writes the tape file, returning its path.
    ///
    /// # Errors
    ///
    /// Returns an error when the tape file cannot be written.
    pub fn finish(self) -> Result<PathBuf, TapeError> {
        self.writer.write_file(&self.tape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Body, Headers};
    use crate::yaml::loader::load_tape;
    use chrono::TimeZone;
    use url::Url;

    fn request(url: &str) -> RecordedRequest {
        RecordedRequest {
            method: "GET".into(),
            url: Url::parse(url).unwrap(),
            headers: Headers::new(),
            body: None,
        }
    }

    fn response(status: u16, body: &str) -> RecordedResponse {
        RecordedResponse {
            status,
            headers: Headers::new(),
            body: Some(Body::text(body)),
        }
    }

    #[test]
    fn record_and_finish() {
        let dir = std::env::temp_dir().join("tapedeck_recorder_test");
        let mut recorder = TapeRecorder::new(&dir, "smoke test");
        let at = Utc.with_ymd_and_hms(2013, 10, 1, 13, 27, 37).unwrap();
        recorder.record_at(at, &request("http://x/one"), &response(200, "first"));
        recorder.record_at(at, &request("http://x/two"), &response(404, "second"));

        let path = recorder.finish().expect("finish should succeed");
        assert!(path.ends_with("smoke_test.yaml"));

        let tape = load_tape(&path).unwrap();
        assert_eq!(tape.name, "smoke test");
        assert_eq!(tape.interactions.len(), 2);
        assert_eq!(tape.interactions[0].request.url.as_str(), "http://x/one");
        assert_eq!(tape.interactions[1].response.status, 404);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn record_stamps_the_current_time() {
        let mut recorder = TapeRecorder::new("/unused", "timing");
        let before = Utc::now();
        recorder.record(&request("http://x/"), &response(200, "ok"));
        let after = Utc::now();

        let recorded = recorder.tape().interactions[0].recorded;
        assert!(recorded >= before && recorded <= after);
    }
}
