//! Canonical YAML serialization: node tree, encoders, emitter, loader and
//! writer.
//!
//! The write path is `Tape` → [`encode::NodeMapper`] → [`node::Node`] tree →
//! [`emit::to_yaml`], and is byte-deterministic. The read path goes through
//! `serde_yaml` in [`loader`] and is forgiving about shapes the writer never
//! produces.

pub mod emit;
pub mod encode;
pub mod error;
pub mod loader;
pub mod node;
pub mod order;
pub mod writer;

pub use encode::{DocumentType, NodeMapper, TagRegistry};
pub use error::{EncodeError, TapeError};
pub use loader::{load_tape, parse_tape};
pub use node::{Node, Scalar, ScalarStyle, Tag};
pub use writer::TapeWriter;
