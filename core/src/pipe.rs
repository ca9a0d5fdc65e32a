//! Data-last transformation functions for pipeline composition.
//!
//! Each function captures its arguments and returns a closure over the
//! descriptor, so transformations can be stacked with [`Request::pipe`]:
//!
//! ```
//! use request_core::{pipe, Method, Request};
//!
//! let req = Request::get("https://h/api")
//!     .pipe(pipe::set_method(Method::Post))
//!     .pipe(pipe::append_url("/items"))
//!     .pipe(pipe::set_header("x-api-key", "secret"));
//! assert_eq!(req.method(), Method::Post);
//! assert_eq!(req.url(), "https://h/api/items");
//! ```

use crate::body::Body;
use crate::request::{Method, Request};

pub fn set_method(method: Method) -> impl Fn(&Request) -> Request {
    move |req| req.set_method(method)
}

pub fn set_url(url: impl Into<String>) -> impl Fn(&Request) -> Request {
    let url = url.into();
    move |req| req.set_url(&url)
}

pub fn append_url(segment: impl Into<String>) -> impl Fn(&Request) -> Request {
    let segment = segment.into();
    move |req| req.append_url(&segment)
}

pub fn prepend_url(prefix: impl Into<String>) -> impl Fn(&Request) -> Request {
    let prefix = prefix.into();
    move |req| req.prepend_url(&prefix)
}

pub fn set_header(
    name: impl Into<String>,
    value: impl Into<String>,
) -> impl Fn(&Request) -> Request {
    let name = name.into();
    let value = value.into();
    move |req| req.set_header(&name, &value)
}

pub fn accept(media_type: impl Into<String>) -> impl Fn(&Request) -> Request {
    let media_type = media_type.into();
    move |req| req.accept(&media_type)
}

pub fn accept_json() -> impl Fn(&Request) -> Request {
    |req| req.accept_json()
}

pub fn basic_auth(
    username: impl Into<String>,
    password: impl Into<String>,
) -> impl Fn(&Request) -> Request {
    let username = username.into();
    let password = password.into();
    move |req| req.basic_auth(&username, &password)
}

pub fn bearer_token(token: impl Into<String>) -> impl Fn(&Request) -> Request {
    let token = token.into();
    move |req| req.bearer_token(&token)
}

pub fn set_url_param(
    key: impl Into<String>,
    value: impl Into<String>,
) -> impl Fn(&Request) -> Request {
    let key = key.into();
    let value = value.into();
    move |req| req.set_url_param(&key, &value)
}

pub fn append_url_param(
    key: impl Into<String>,
    value: impl Into<String>,
) -> impl Fn(&Request) -> Request {
    let key = key.into();
    let value = value.into();
    move |req| req.append_url_param(&key, &value)
}

pub fn set_hash(hash: impl Into<String>) -> impl Fn(&Request) -> Request {
    let hash = hash.into();
    move |req| req.set_hash(&hash)
}

pub fn remove_hash() -> impl Fn(&Request) -> Request {
    |req| req.remove_hash()
}

pub fn set_body(body: Body) -> impl Fn(&Request) -> Request {
    move |req| req.set_body(body.clone())
}

pub fn text_body(text: impl Into<String>) -> impl Fn(&Request) -> Request {
    let text = text.into();
    move |req| req.text_body(&text)
}
