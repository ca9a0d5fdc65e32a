//! Filesystem capability for file-backed request bodies.
//!
//! # Design
//! `Request::file_body` never touches `std::fs` directly — it goes through
//! the `FileSystem` trait so tests can inject a fake and hosts can route
//! file access through whatever I/O layer they own. The same capability
//! that stats the file is expected to stream its bytes when the transport
//! executes the request.

use std::io;
use std::path::Path;

use crate::body::OCTET_STREAM;

/// Metadata the file-body setter needs before the transport streams the
/// file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// File size in bytes, used for the `content-length` header.
    pub size: u64,
    /// Content type, usually guessed from the file extension.
    pub content_type: String,
}

/// Capability to inspect a file that will back a streamed body.
pub trait FileSystem {
    fn file_info(&self, path: &Path) -> io::Result<FileInfo>;
}

/// `FileSystem` backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl FileSystem for HostFs {
    fn file_info(&self, path: &Path) -> io::Result<FileInfo> {
        let metadata = std::fs::metadata(path)?;
        if metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path is a directory",
            ));
        }
        Ok(FileInfo {
            size: metadata.len(),
            content_type: content_type_for(path).to_string(),
        })
    }
}

/// Guess a content type from the file extension; `application/octet-stream`
/// when the extension is missing or unknown.
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("csv") => "text/csv",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        _ => OCTET_STREAM,
    }
}
