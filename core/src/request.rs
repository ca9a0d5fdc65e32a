//! The immutable request descriptor and its transformation methods.
//!
//! # Design
//! `Request` is never mutated after construction. Every setter takes
//! `&self` and returns a new descriptor; the headers map, the query-param
//! list, and body payloads sit behind `Arc`, so a transformation that
//! leaves a field untouched shares the old allocation instead of copying
//! it. Concurrent readers of one descriptor need no coordination.
//!
//! Setters are data-first (`request.set_header(..)`); the [`crate::pipe`]
//! module provides the data-last forms for pipeline composition.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use base64::Engine as _;

use crate::body::{Body, StreamSource};
use crate::error::BodyError;
use crate::fs::FileSystem;
use crate::options::RequestOptions;
use crate::url;

/// HTTP method of a request descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

/// An HTTP request described as an immutable value.
///
/// Built by the per-method constructors and threaded through setter calls;
/// the caller hands the finished descriptor to a transport that executes
/// the actual network I/O. Two descriptors are equal when all five fields
/// are structurally equal, regardless of how they were built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: String,
    url_params: Arc<Vec<(String, String)>>,
    hash: Option<String>,
    headers: Arc<BTreeMap<String, String>>,
    body: Body,
}

impl Request {
    /// A GET request for the empty URL with no params, headers, or body.
    pub fn empty() -> Self {
        Self {
            method: Method::Get,
            url: String::new(),
            url_params: Arc::new(Vec::new()),
            hash: None,
            headers: Arc::new(BTreeMap::new()),
            body: Body::Empty,
        }
    }

    /// A fresh descriptor for `method`, with `url` decomposed per
    /// [`set_url`](Self::set_url).
    pub fn new(method: Method, url: &str) -> Self {
        Self::empty().set_method(method).set_url(url)
    }

    pub fn get(url: &str) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn head(url: &str) -> Self {
        Self::new(Method::Head, url)
    }

    pub fn post(url: &str) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: &str) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn patch(url: &str) -> Self {
        Self::new(Method::Patch, url)
    }

    pub fn delete(url: &str) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn options(url: &str) -> Self {
        Self::new(Method::Options, url)
    }

    // --- accessors ---

    pub fn method(&self) -> Method {
        self.method
    }

    /// Base URL, guaranteed free of `?` and `#`.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn url_params(&self) -> &[(String, String)] {
        &self.url_params
    }

    /// Fragment without the leading `#`.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// All headers, keyed by lowercased name.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Reassemble the full URL: base + `?` + encoded params + `#` + hash.
    pub fn to_url(&self) -> String {
        url::render(&self.url, &self.url_params, self.hash.as_deref())
    }

    // --- transformations ---

    /// Apply a closure to this descriptor, enabling pipelines of data-last
    /// transformations from [`crate::pipe`].
    pub fn pipe(&self, f: impl FnOnce(&Request) -> Request) -> Request {
        f(self)
    }

    pub fn set_method(&self, method: Method) -> Request {
        let mut next = self.clone();
        next.method = method;
        next
    }

    /// Replace the URL. A query string in `url` replaces `url_params` and a
    /// fragment replaces `hash`; when `url` carries neither, the existing
    /// params and hash are kept.
    pub fn set_url(&self, url: &str) -> Request {
        let parts = url::split(url);
        let mut next = self.clone();
        next.url = parts.base;
        if !parts.params.is_empty() {
            next.url_params = Arc::new(parts.params);
        }
        if parts.hash.is_some() {
            next.hash = parts.hash;
        }
        next
    }

    /// Append a path segment to the URL, deduplicating the seam slash only
    /// when both sides contribute one.
    pub fn append_url(&self, segment: &str) -> Request {
        let mut next = self.clone();
        next.url = url::join(&self.url, segment);
        next
    }

    /// Prepend a path segment, with the same seam-slash rule as
    /// [`append_url`](Self::append_url).
    pub fn prepend_url(&self, prefix: &str) -> Request {
        let mut next = self.clone();
        next.url = url::join(prefix, &self.url);
        next
    }

    /// Set a header; names are case-insensitive and a later write for the
    /// same name wins.
    pub fn set_header(&self, name: &str, value: &str) -> Request {
        let mut headers = (*self.headers).clone();
        headers.insert(name.to_ascii_lowercase(), value.to_string());
        let mut next = self.clone();
        next.headers = Arc::new(headers);
        next
    }

    /// Set several headers at once, last write winning per name.
    pub fn set_headers<'a, I>(&self, entries: I) -> Request
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut headers = (*self.headers).clone();
        for (name, value) in entries {
            headers.insert(name.to_ascii_lowercase(), value.to_string());
        }
        let mut next = self.clone();
        next.headers = Arc::new(headers);
        next
    }

    fn remove_headers(&self, names: &[&str]) -> Request {
        let mut headers = (*self.headers).clone();
        for name in names {
            headers.remove(*name);
        }
        let mut next = self.clone();
        next.headers = Arc::new(headers);
        next
    }

    /// Set the `accept` header.
    pub fn accept(&self, media_type: &str) -> Request {
        self.set_header("accept", media_type)
    }

    /// Set `accept: application/json`.
    pub fn accept_json(&self) -> Request {
        self.accept("application/json")
    }

    /// Set `authorization` to HTTP basic auth for the given credentials.
    ///
    /// The credentials are joined with `:` before base64 encoding; a colon
    /// inside `username` is not rejected and will corrupt the decoded form
    /// on the server side. Keeping the delimiter out is the caller's
    /// responsibility.
    pub fn basic_auth(&self, username: &str, password: &str) -> Request {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        self.set_header("authorization", &format!("Basic {encoded}"))
    }

    /// Set `authorization: Bearer <token>`, with `token` taken verbatim.
    pub fn bearer_token(&self, token: &str) -> Request {
        self.set_header("authorization", &format!("Bearer {token}"))
    }

    /// Set a query parameter, replacing any existing values for `key` and
    /// appending the new pair at the end.
    pub fn set_url_param(&self, key: &str, value: &str) -> Request {
        let mut params: Vec<(String, String)> = self
            .url_params
            .iter()
            .filter(|(k, _)| k != key)
            .cloned()
            .collect();
        params.push((key.to_string(), value.to_string()));
        let mut next = self.clone();
        next.url_params = Arc::new(params);
        next
    }

    /// Set several query parameters: existing values for the given keys are
    /// dropped, then the new pairs are appended in iteration order.
    pub fn set_url_params<'a, I>(&self, entries: I) -> Request
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut params: Vec<(String, String)> = self
            .url_params
            .iter()
            .filter(|(k, _)| !entries.iter().any(|(nk, _)| nk == k))
            .cloned()
            .collect();
        params.extend(entries);
        let mut next = self.clone();
        next.url_params = Arc::new(params);
        next
    }

    /// Append a query parameter, keeping any existing values for `key`.
    pub fn append_url_param(&self, key: &str, value: &str) -> Request {
        let mut params = (*self.url_params).clone();
        params.push((key.to_string(), value.to_string()));
        let mut next = self.clone();
        next.url_params = Arc::new(params);
        next
    }

    /// Append several query parameters in iteration order, keeping
    /// duplicates.
    pub fn append_url_params<'a, I>(&self, entries: I) -> Request
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = (*self.url_params).clone();
        params.extend(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        let mut next = self.clone();
        next.url_params = Arc::new(params);
        next
    }

    /// Set the URL fragment (without the leading `#`).
    pub fn set_hash(&self, hash: &str) -> Request {
        let mut next = self.clone();
        next.hash = Some(hash.to_string());
        next
    }

    /// Remove the URL fragment.
    pub fn remove_hash(&self) -> Request {
        let mut next = self.clone();
        next.hash = None;
        next
    }

    /// Replace the body, keeping the `content-type` and `content-length`
    /// headers consistent with the new variant: a non-empty body writes
    /// both (no `content-length` for a stream of unknown size), an empty
    /// body removes both.
    pub fn set_body(&self, body: Body) -> Request {
        let mut next = match body.content_type() {
            Some(content_type) => {
                let with_type = self.set_header("content-type", content_type);
                match body.content_length() {
                    Some(length) => with_type.set_header("content-length", &length.to_string()),
                    None => with_type.remove_headers(&["content-length"]),
                }
            }
            None => self.remove_headers(&["content-type", "content-length"]),
        };
        next.body = body;
        next
    }

    /// Remove the body and its content headers.
    pub fn empty_body(&self) -> Request {
        self.set_body(Body::Empty)
    }

    /// Set a `text/plain` body.
    pub fn text_body(&self, text: &str) -> Request {
        self.set_body(Body::text(text))
    }

    /// Set an `application/octet-stream` body.
    pub fn bytes_body(&self, bytes: impl Into<Vec<u8>>) -> Request {
        self.set_body(Body::bytes(bytes))
    }

    /// Set an `application/x-www-form-urlencoded` body.
    pub fn form_body<'a, I>(&self, entries: I) -> Request
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.set_body(Body::form(entries))
    }

    /// Encode `value` as JSON and set it as an `application/json` text
    /// body. Fails with [`BodyError::Encode`] when serialization rejects
    /// the value.
    pub fn json_body<T>(&self, value: &T) -> Result<Request, BodyError>
    where
        T: serde::Serialize + ?Sized,
    {
        let text =
            serde_json::to_string(value).map_err(|e| BodyError::Encode(e.to_string()))?;
        Ok(self.set_body(Body::text_with(text, "application/json")))
    }

    /// Set a streamed body backed by a file. The injected `fs` capability
    /// supplies the file's size and content type; the transport streams the
    /// bytes from the same source later. Fails with [`BodyError::Io`] when
    /// the file cannot be inspected.
    pub fn file_body(&self, fs: &dyn FileSystem, path: &Path) -> Result<Request, BodyError> {
        let info = fs.file_info(path).map_err(|e| BodyError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(self.set_body(Body::stream(
            StreamSource::File(path.to_path_buf()),
            &info.content_type,
            Some(info.size),
        )))
    }

    /// Apply an options value, each present field triggering the
    /// corresponding setter in a fixed order (method, url, headers,
    /// url_params, hash, body, accept, accept_json) so combined options
    /// compose the same way regardless of how the value was assembled.
    pub fn modify(&self, options: &RequestOptions) -> Request {
        let mut next = self.clone();
        if let Some(method) = options.method {
            next = next.set_method(method);
        }
        if let Some(ref url) = options.url {
            next = next.set_url(url);
        }
        if let Some(ref headers) = options.headers {
            next = next.set_headers(headers.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        if let Some(ref params) = options.url_params {
            next = next.set_url_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        if let Some(ref hash) = options.hash {
            next = next.set_hash(hash);
        }
        if let Some(ref body) = options.body {
            next = next.set_body(body.clone());
        }
        if let Some(ref accept) = options.accept {
            next = next.accept(accept);
        }
        if options.accept_json {
            next = next.accept_json();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn constructors_decompose_full_urls() {
        let req = Request::get("https://h/p?a=1&b=2#frag");
        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.url(), "https://h/p");
        assert_eq!(
            req.url_params(),
            &[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
        assert_eq!(req.hash(), Some("frag"));
    }

    #[test]
    fn to_url_round_trips_construction() {
        let req = Request::get("https://h/p?a=1&b=2#frag");
        assert_eq!(req.to_url(), "https://h/p?a=1&b=2#frag");
    }

    #[test]
    fn empty_is_a_bare_get() {
        let req = Request::empty();
        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.url(), "");
        assert!(req.url_params().is_empty());
        assert!(req.hash().is_none());
        assert!(req.headers().is_empty());
        assert_eq!(*req.body(), Body::Empty);
    }

    #[test]
    fn setters_do_not_mutate_the_input() {
        let before = Request::get("/items").set_header("x-a", "1");
        let snapshot = before.clone();

        let _ = before.set_method(Method::Post);
        let _ = before.set_url("/other");
        let _ = before.set_header("x-a", "2");
        let _ = before.append_url_param("k", "v");
        let _ = before.set_hash("h");
        let _ = before.text_body("body");

        assert_eq!(before, snapshot);
    }

    #[test]
    fn set_method_is_idempotent() {
        let req = Request::get("/items");
        let once = req.set_method(Method::Post);
        let twice = once.set_method(Method::Post);
        assert_eq!(once, twice);
    }

    #[test]
    fn untouched_fields_are_shared_not_copied() {
        let req = Request::get("/items?a=1").set_header("x-a", "1");
        let next = req.set_method(Method::Post);
        assert!(Arc::ptr_eq(&req.url_params, &next.url_params));
        assert!(Arc::ptr_eq(&req.headers, &next.headers));

        let with_header = req.set_header("x-b", "2");
        assert!(Arc::ptr_eq(&req.url_params, &with_header.url_params));
        assert!(!Arc::ptr_eq(&req.headers, &with_header.headers));
    }

    #[test]
    fn header_names_are_case_insensitive_last_write_wins() {
        let req = Request::get("/")
            .set_header("Content-Type", "text/plain")
            .set_header("content-TYPE", "application/json");
        assert_eq!(req.header("CONTENT-type"), Some("application/json"));
        assert_eq!(req.headers().len(), 1);
    }

    #[test]
    fn set_url_keeps_params_when_new_url_has_none() {
        let req = Request::get("/old?a=1").set_url("/new");
        assert_eq!(req.url(), "/new");
        assert_eq!(req.url_params(), &[("a".to_string(), "1".to_string())]);
    }

    #[test]
    fn set_url_replaces_params_and_hash_when_present() {
        let req = Request::get("/old?a=1#x").set_url("/new?b=2#y");
        assert_eq!(req.url(), "/new");
        assert_eq!(req.url_params(), &[("b".to_string(), "2".to_string())]);
        assert_eq!(req.hash(), Some("y"));
    }

    #[test]
    fn append_url_dedups_seam_slash() {
        assert_eq!(Request::get("http://h/a/").append_url("/b").url(), "http://h/a/b");
        assert_eq!(Request::get("http://h/a").append_url("b").url(), "http://h/ab");
        assert_eq!(Request::get("http://h/a").append_url("/b").url(), "http://h/a/b");
    }

    #[test]
    fn prepend_url_joins_on_the_left() {
        let req = Request::get("/items").prepend_url("http://h/api/");
        assert_eq!(req.url(), "http://h/api/items");
    }

    #[test]
    fn set_url_param_replaces_all_values_for_the_key() {
        let req = Request::get("/")
            .append_url_param("k", "1")
            .append_url_param("k", "2")
            .append_url_param("j", "3")
            .set_url_param("k", "9");
        assert_eq!(
            req.url_params(),
            &[
                ("j".to_string(), "3".to_string()),
                ("k".to_string(), "9".to_string())
            ]
        );
    }

    #[test]
    fn append_url_param_preserves_duplicates_in_order() {
        let req = Request::get("/")
            .append_url_param("k", "1")
            .append_url_param("k", "2");
        assert_eq!(
            req.url_params(),
            &[
                ("k".to_string(), "1".to_string()),
                ("k".to_string(), "2".to_string())
            ]
        );
        assert_eq!(req.to_url(), "/?k=1&k=2");
    }

    #[test]
    fn hash_set_and_remove() {
        let req = Request::get("/p").set_hash("section");
        assert_eq!(req.hash(), Some("section"));
        assert_eq!(req.to_url(), "/p#section");
        let req = req.remove_hash();
        assert_eq!(req.hash(), None);
        assert_eq!(req.to_url(), "/p");
    }

    #[test]
    fn text_body_sets_content_headers() {
        let req = Request::post("/p").text_body("hi");
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("content-length"), Some("2"));
    }

    #[test]
    fn empty_body_removes_content_headers() {
        let req = Request::post("/p").text_body("hi").empty_body();
        assert_eq!(req.header("content-type"), None);
        assert_eq!(req.header("content-length"), None);
        assert_eq!(*req.body(), Body::Empty);
    }

    #[test]
    fn unknown_stream_length_drops_content_length() {
        let req = Request::post("/p").text_body("hi").set_body(Body::stream(
            StreamSource::File("data.bin".into()),
            "application/octet-stream",
            None,
        ));
        assert_eq!(req.header("content-type"), Some("application/octet-stream"));
        assert_eq!(req.header("content-length"), None);
    }

    #[test]
    fn form_body_sets_encoded_headers() {
        let req = Request::post("/p").form_body([("a", "1"), ("b", "two words")]);
        assert_eq!(
            req.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            req.body().inline_bytes(),
            Some(b"a=1&b=two+words".to_vec())
        );
        assert_eq!(req.header("content-length"), Some("15"));
    }

    #[test]
    fn basic_auth_encodes_credentials() {
        let req = Request::get("/").basic_auth("Aladdin", "open sesame");
        assert_eq!(
            req.header("authorization"),
            Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
        );
    }

    #[test]
    fn basic_auth_does_not_reject_colon_in_username() {
        use base64::Engine as _;

        // A colon in the username makes the decoded form ambiguous
        // server-side; the builder encodes it anyway.
        let req = Request::get("/").basic_auth("user:name", "pw");
        let expected =
            base64::engine::general_purpose::STANDARD.encode("user:name:pw");
        assert_eq!(
            req.header("authorization").unwrap(),
            format!("Basic {expected}")
        );
    }

    #[test]
    fn bearer_token_is_verbatim() {
        let req = Request::get("/").bearer_token("abc.def");
        assert_eq!(req.header("authorization"), Some("Bearer abc.def"));
    }

    #[test]
    fn accept_json_sets_accept_header() {
        let req = Request::get("/").accept_json();
        assert_eq!(req.header("accept"), Some("application/json"));
    }

    #[test]
    fn json_body_encodes_value() {
        #[derive(serde::Serialize)]
        struct Payload {
            title: String,
        }
        let req = Request::post("/p")
            .json_body(&Payload {
                title: "hi".to_string(),
            })
            .unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body().inline_bytes(), Some(br#"{"title":"hi"}"#.to_vec()));
        assert_eq!(req.header("content-length"), Some("14"));
    }

    #[test]
    fn json_body_surfaces_encode_failure() {
        // serde_json rejects maps whose keys are not strings.
        let bad: std::collections::BTreeMap<Vec<u8>, u8> =
            [(vec![1u8], 1u8)].into_iter().collect();
        let err = Request::post("/p").json_body(&bad).unwrap_err();
        assert!(matches!(err, BodyError::Encode(_)));
    }

    struct FakeFs {
        result: Result<crate::fs::FileInfo, io::ErrorKind>,
    }

    impl FileSystem for FakeFs {
        fn file_info(&self, _path: &Path) -> io::Result<crate::fs::FileInfo> {
            match &self.result {
                Ok(info) => Ok(info.clone()),
                Err(kind) => Err(io::Error::new(*kind, "injected failure")),
            }
        }
    }

    #[test]
    fn file_body_streams_with_stat_metadata() {
        let fs = FakeFs {
            result: Ok(crate::fs::FileInfo {
                size: 42,
                content_type: "text/plain".to_string(),
            }),
        };
        let req = Request::post("/upload")
            .file_body(&fs, Path::new("notes.txt"))
            .unwrap();
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("content-length"), Some("42"));
        assert_eq!(
            *req.body(),
            Body::stream(StreamSource::File("notes.txt".into()), "text/plain", Some(42))
        );
    }

    #[test]
    fn file_body_surfaces_io_failure() {
        let fs = FakeFs {
            result: Err(io::ErrorKind::NotFound),
        };
        let err = Request::post("/upload")
            .file_body(&fs, Path::new("missing.txt"))
            .unwrap_err();
        match err {
            BodyError::Io { path, .. } => assert_eq!(path, Path::new("missing.txt")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn modify_applies_fields_in_fixed_order() {
        let req = Request::get("/old").modify(&RequestOptions {
            url: Some("/new".to_string()),
            accept: Some("application/json".to_string()),
            ..Default::default()
        });
        assert_eq!(req.url(), "/new");
        assert_eq!(req.header("accept"), Some("application/json"));
    }

    #[test]
    fn modify_body_then_headers_compose_deterministically() {
        // headers are applied before body, so body-derived content headers
        // win over a conflicting header option.
        let req = Request::post("/p").modify(&RequestOptions {
            headers: Some(vec![(
                "content-type".to_string(),
                "text/html".to_string(),
            )]),
            body: Some(Body::text("hi")),
            ..Default::default()
        });
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("content-length"), Some("2"));
    }

    #[test]
    fn modify_all_fields() {
        let req = Request::empty().modify(&RequestOptions {
            method: Some(Method::Put),
            url: Some("/items".to_string()),
            headers: Some(vec![("x-a".to_string(), "1".to_string())]),
            url_params: Some(vec![("page".to_string(), "2".to_string())]),
            hash: Some("top".to_string()),
            body: Some(Body::text("hi")),
            accept_json: true,
            ..Default::default()
        });
        assert_eq!(req.method(), Method::Put);
        assert_eq!(req.to_url(), "/items?page=2#top");
        assert_eq!(req.header("x-a"), Some("1"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("content-length"), Some("2"));
    }

    #[test]
    fn modify_with_defaults_is_identity() {
        let req = Request::get("/items?a=1").set_header("x-a", "1");
        assert_eq!(req.modify(&RequestOptions::default()), req);
    }
}
