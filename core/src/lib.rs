//! Immutable HTTP request descriptor builder.
//!
//! # Overview
//! Builds `Request` values as plain data without touching the network
//! (host-does-IO pattern). The caller hands a finished descriptor to its
//! own HTTP transport for execution, keeping this crate fully
//! deterministic and testable.
//!
//! # Design
//! - `Request` is an immutable value: every setter returns a new
//!   descriptor, sharing untouched sub-structures (headers map, query-param
//!   list, body payload) via `Arc` instead of copying them.
//! - The body is a closed sum type (`Body`) whose content headers are kept
//!   consistent by `set_body` itself.
//! - Setters come in two conventions: data-first inherent methods for
//!   direct chaining, and data-last closures in [`pipe`] for pipeline
//!   composition.
//! - The only fallible operations are the JSON body setter (encoding can
//!   reject the value) and the file body setter (the injected filesystem
//!   capability can fail); both return `Result` with a typed `BodyError`.

pub mod body;
pub mod error;
pub mod fs;
pub mod options;
pub mod pipe;
pub mod request;

mod url;

pub use body::{Body, StreamSource};
pub use error::BodyError;
pub use fs::{FileInfo, FileSystem, HostFs};
pub use options::RequestOptions;
pub use request::{Method, Request};
