//! Error type for the fallible body setters.
//!
//! # Design
//! Only two operations on a descriptor can fail: encoding a typed value
//! into a body and statting a file for a streamed body. Both surface as
//! `BodyError` variants rather than panics so callers can recover; every
//! other transformation is total.

use std::fmt;
use std::path::PathBuf;

/// Errors returned by `Request::json_body` and `Request::file_body`.
#[derive(Debug)]
pub enum BodyError {
    /// The value could not be serialized into the requested body encoding.
    Encode(String),

    /// The file backing a streamed body could not be inspected, e.g. it
    /// does not exist or is not readable.
    Io { path: PathBuf, message: String },
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::Encode(msg) => write!(f, "body encoding failed: {msg}"),
            BodyError::Io { path, message } => {
                write!(f, "file body failed for {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for BodyError {}
