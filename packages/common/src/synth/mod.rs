//! Turns uploaded bytes into an XML document.
//!
//! The only implementation today is [`TemplateSynthesizer`], which wraps a few
//! pieces of metadata (size, timestamp, a base64 sample of the leading bytes) in
//! a fixed document template. Callers hold a [`DocumentSynthesizer`] trait
//! object, so a real PDF parser can be plugged in behind it.

mod template;

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use template::{SAMPLE_LEN, SCHEMA_NAMESPACE, TemplateSynthesizer};

/// Errors produced while synthesizing a document.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The input byte source broke before it was fully read.
    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),
    /// The XML writer rejected an event.
    #[error("failed to write XML: {0}")]
    Write(String),
    /// The generated buffer is not valid UTF-8.
    #[error("generated XML is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl SynthesisError {
    pub(crate) fn write(err: impl fmt::Display) -> Self {
        Self::Write(err.to_string())
    }
}

/// Produces an XML document from raw input bytes.
///
/// Implementations must be pure: the same `(input, now)` pair always yields
/// the same string.
pub trait DocumentSynthesizer: Send + Sync {
    fn synthesize(&self, input: &[u8], now: DateTime<Utc>) -> Result<String, SynthesisError>;
}

/// Synthesize with the default template.
pub fn synthesize(input: &[u8], now: DateTime<Utc>) -> Result<String, SynthesisError> {
    TemplateSynthesizer.synthesize(input, now)
}
