//! Error types for tape serialization and persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or building the serialization tree.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A tag registration named a type that carries no tag.
    #[error("no tagged document type named `{type_name}`")]
    UnknownType {
        /// The name that failed to resolve.
        type_name: String,
    },
    /// A tag override was not usable as a YAML tag.
    #[error("invalid tag `{tag}` for type `{type_name}`: {reason}")]
    InvalidTag {
        /// The type the tag was registered for.
        type_name: String,
        /// The offending tag text.
        tag: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors raised while reading or writing tape files.
#[derive(Debug, Error)]
pub enum TapeError {
    /// A tape file could not be read.
    #[error("failed to read tape file {}", path.display())]
    Read {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A tape file could not be written.
    #[error("failed to write tape file {}", path.display())]
    Write {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The document was not parseable as YAML at all.
    #[error("tape document is not valid YAML")]
    Yaml(#[from] serde_yaml::Error),
    /// The document parsed but does not describe a tape.
    #[error("malformed tape document: {reason}")]
    Malformed {
        /// What was wrong with it.
        reason: String,
    },
}

impl TapeError {
    /// Shorthand for a [`TapeError::Malformed`] with the given reason.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        TapeError::Malformed { reason: reason.into() }
    }
}
