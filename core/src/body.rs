//! Request body variants.
//!
//! # Design
//! `Body` is a closed sum type dispatched by exhaustive matching. Payloads
//! live behind `Arc` so descriptor transformations share them instead of
//! copying. A `Stream` body carries no bytes at all — only a content type,
//! an optional length, and a [`StreamSource`] naming where the transport
//! obtains the bytes — which keeps the descriptor plain, comparable data.

use std::path::PathBuf;
use std::sync::Arc;

use crate::url;

pub(crate) const TEXT_PLAIN: &str = "text/plain";
pub(crate) const OCTET_STREAM: &str = "application/octet-stream";
pub(crate) const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The body of a request descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// No body; a descriptor carrying `Empty` has no content headers.
    Empty,

    /// Raw bytes with an explicit content type.
    Bytes {
        content_type: String,
        bytes: Arc<Vec<u8>>,
    },

    /// A text payload with an explicit content type.
    Text {
        content_type: String,
        text: Arc<str>,
    },

    /// Key-value pairs encoded as `application/x-www-form-urlencoded` when
    /// the transport serializes the body.
    Form {
        entries: Arc<Vec<(String, String)>>,
    },

    /// A body whose bytes the transport streams from an external source.
    Stream {
        content_type: String,
        content_length: Option<u64>,
        source: StreamSource,
    },
}

/// Where the transport obtains the bytes of a `Stream` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSource {
    /// Stream the contents of a file; the filesystem capability that stated
    /// the file is expected to do the reading as well.
    File(PathBuf),
}

impl Body {
    /// A text body with the default `text/plain` content type.
    pub fn text(text: impl Into<Arc<str>>) -> Self {
        Self::text_with(text, TEXT_PLAIN)
    }

    /// A text body with an explicit content type.
    pub fn text_with(text: impl Into<Arc<str>>, content_type: &str) -> Self {
        Body::Text {
            content_type: content_type.to_string(),
            text: text.into(),
        }
    }

    /// A raw-bytes body with the default `application/octet-stream` content
    /// type.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::bytes_with(bytes, OCTET_STREAM)
    }

    /// A raw-bytes body with an explicit content type.
    pub fn bytes_with(bytes: impl Into<Vec<u8>>, content_type: &str) -> Self {
        Body::Bytes {
            content_type: content_type.to_string(),
            bytes: Arc::new(bytes.into()),
        }
    }

    /// A form-encoded body from key-value pairs.
    pub fn form<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Body::Form {
            entries: Arc::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// A streamed body whose bytes come from `source`.
    pub fn stream(source: StreamSource, content_type: &str, content_length: Option<u64>) -> Self {
        Body::Stream {
            content_type: content_type.to_string(),
            content_length,
            source,
        }
    }

    /// The content type this body implies, or `None` for `Empty`.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Body::Empty => None,
            Body::Bytes { content_type, .. }
            | Body::Text { content_type, .. }
            | Body::Stream { content_type, .. } => Some(content_type),
            Body::Form { .. } => Some(FORM_URLENCODED),
        }
    }

    /// The content length in bytes, or `None` when there is no body or the
    /// stream's length is unknown.
    pub fn content_length(&self) -> Option<u64> {
        match self {
            Body::Empty => None,
            Body::Bytes { bytes, .. } => Some(bytes.len() as u64),
            Body::Text { text, .. } => Some(text.len() as u64),
            Body::Form { entries } => Some(url::encode_pairs(entries).len() as u64),
            Body::Stream { content_length, .. } => *content_length,
        }
    }

    /// The bytes a transport should send, for variants that carry them
    /// inline. `Empty` and `Stream` return `None` — a stream's bytes come
    /// from its [`StreamSource`].
    pub fn inline_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Body::Empty | Body::Stream { .. } => None,
            Body::Bytes { bytes, .. } => Some(bytes.to_vec()),
            Body::Text { text, .. } => Some(text.as_bytes().to_vec()),
            Body::Form { entries } => Some(url::encode_pairs(entries).into_bytes()),
        }
    }
}
