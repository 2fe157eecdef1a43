//! Writes tapes to YAML text, streams, and files under a tape root.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::io::{tape_file_name, FileResolver};
use crate::tape::format::Tape;
use crate::yaml::emit;
use crate::yaml::encode::NodeMapper;
use crate::yaml::error::TapeError;

/// Serializes tapes into a tape root directory.
#[derive(Debug, Clone)]
pub struct TapeWriter {
    root: PathBuf,
    mapper: NodeMapper,
}

impl TapeWriter {
    /// Creates a writer rooted at the given directory, with the stock tags.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mapper = NodeMapper::new(FileResolver::new(root.clone()));
        Self { root, mapper }
    }

    /// The mapper, for setup-time tag overrides.
    pub fn mapper_mut(&mut self) -> &mut NodeMapper {
        &mut self.mapper
    }

    /// Renders a tape as a complete YAML document.
    #[must_use]
    pub fn to_yaml(&self, tape: &Tape) -> String {
        emit::to_yaml(&self.mapper.encode(tape))
    }

    /// Writes the document to an arbitrary sink.
    ///
    /// # Errors
    ///
    /// Returns whatever the sink returns.
    pub fn write(&self, tape: &Tape, out: &mut impl io::Write) -> io::Result<()> {
        out.write_all(self.to_yaml(tape).as_bytes())
    }

    /// Writes the tape to its file under the root, creating the root as
    /// needed, and returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`TapeError::Write`] when the directory or file cannot be
    /// written.
    pub fn write_file(&self, tape: &Tape) -> Result<PathBuf, TapeError> {
        fs::create_dir_all(&self.root).map_err(|source| TapeError::Write {
            path: self.root.clone(),
            source,
        })?;
        let path = self.root.join(tape_file_name(&tape.name));
        debug!(
            path = %path.display(),
            interactions = tape.interactions.len(),
            "writing tape"
        );
        fs::write(&path, self.to_yaml(tape)).map_err(|source| TapeError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Body, Headers};
    use crate::tape::format::{RecordedInteraction, RecordedRequest, RecordedResponse};
    use crate::yaml::loader::parse_tape;
    use chrono::{TimeZone, Utc};
    use std::env;
    use url::Url;

    fn sample_tape() -> Tape {
        let mut tape = Tape::new("t1");
        tape.interactions.push(RecordedInteraction {
            recorded: Utc.with_ymd_and_hms(2013, 10, 1, 13, 27, 37).unwrap(),
            request: RecordedRequest {
                method: "GET".into(),
                url: Url::parse("http://x/").unwrap(),
                headers: Headers::new(),
                body: None,
            },
            response: RecordedResponse {
                status: 200,
                headers: Headers::from_pairs([("Content-Type", "text/plain")]),
                body: Some(Body::text("hello")),
            },
        });
        tape
    }

    #[test]
    fn renders_the_canonical_document() {
        let expected = "\
!tape
name: t1
interactions:
- recorded: 2013-10-01T13:27:37.000Z
  request: !tape.request [GET, 'http://x/']
  response: !tape.response [200, {Content-Type: text/plain}, hello]
";
        assert_eq!(TapeWriter::new("/tapes").to_yaml(&sample_tape()), expected);
    }

    #[test]
    fn rendering_is_deterministic() {
        let writer = TapeWriter::new("/tapes");
        let tape = sample_tape();
        assert_eq!(writer.to_yaml(&tape), writer.to_yaml(&tape));
    }

    #[test]
    fn documents_round_trip_through_the_loader() {
        let mut tape = sample_tape();
        tape.interactions.push(RecordedInteraction {
            recorded: Utc.with_ymd_and_hms(2013, 10, 1, 13, 28, 2).unwrap(),
            request: RecordedRequest {
                method: "POST".into(),
                url: Url::parse("http://x/submit").unwrap(),
                headers: Headers::from_pairs([("Accept", "*/*")]),
                body: Some(Body::text("line one\nline two\n")),
            },
            response: RecordedResponse {
                status: 201,
                headers: Headers::new(),
                body: Some(Body::file("bodies/image.png")),
            },
        });

        let writer = TapeWriter::new("/tapes");
        let reloaded = parse_tape(&writer.to_yaml(&tape)).unwrap();
        assert_eq!(reloaded, tape);
    }

    #[test]
    fn custom_tags_show_up_in_the_document() {
        let mut writer = TapeWriter::new("/tapes");
        writer.mapper_mut().tags_mut().register("tape", "!cassette").unwrap();
        let doc = writer.to_yaml(&Tape::new("renamed"));
        assert!(doc.starts_with("!cassette\n"));
    }

    #[test]
    fn write_file_normalizes_the_tape_name() {
        let root = env::temp_dir().join("tapedeck-writer-file-test");
        let writer = TapeWriter::new(&root);
        let mut tape = sample_tape();
        tape.name = "my tape".into();

        let path = writer.write_file(&tape).unwrap();
        assert!(path.ends_with("my_tape.yaml"));
        let reloaded = parse_tape(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.name, "my tape");

        let _ = fs::remove_dir_all(&root);
    }
}
