//! Option struct consumed by `Request::modify`.

use crate::body::Body;
use crate::request::Method;

/// A bundle of descriptor changes applied in one `modify` call.
///
/// Every field is optional; `..Default::default()` fills the rest. The
/// application order is fixed by `modify` itself, so the order fields are
/// written here does not matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub url: Option<String>,
    pub headers: Option<Vec<(String, String)>>,
    pub url_params: Option<Vec<(String, String)>>,
    pub hash: Option<String>,
    pub body: Option<Body>,
    pub accept: Option<String>,
    /// Shorthand for `accept: application/json`; applied last, so it wins
    /// over an `accept` field in the same options value.
    pub accept_json: bool,
}
