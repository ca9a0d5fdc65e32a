//! URL string helpers: query/fragment decomposition, path joining, rendering.
//!
//! A descriptor's `url` field never carries a literal `?` or `#` — both are
//! split off at construction time and rendered back by [`render`]. Query
//! strings go through `form_urlencoded` in both directions, so parameter
//! values round-trip percent-encoding.

/// A full URL string decomposed into the descriptor's three URL fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UrlParts {
    pub base: String,
    pub params: Vec<(String, String)>,
    pub hash: Option<String>,
}

/// Split a URL string into base, decoded query pairs, and fragment.
///
/// The fragment is taken first so a `?` inside the fragment is not
/// mistaken for a query delimiter.
pub(crate) fn split(url: &str) -> UrlParts {
    let (without_hash, hash) = match url.split_once('#') {
        Some((rest, hash)) => (rest, Some(hash.to_string())),
        None => (url, None),
    };
    let (base, params) = match without_hash.split_once('?') {
        Some((base, query)) => (
            base,
            form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        ),
        None => (without_hash, Vec::new()),
    };
    UrlParts {
        base: base.to_string(),
        params,
        hash,
    }
}

/// Concatenate two path segments, deduplicating the seam slash only when
/// both sides contribute one. A missing slash is never inserted.
pub(crate) fn join(left: &str, right: &str) -> String {
    match (left.ends_with('/'), right.strip_prefix('/')) {
        (true, Some(stripped)) => format!("{left}{stripped}"),
        _ => format!("{left}{right}"),
    }
}

/// Encode query pairs as `application/x-www-form-urlencoded`.
pub(crate) fn encode_pairs(pairs: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Reassemble a full URL: base + `?` + encoded params + `#` + fragment.
pub(crate) fn render(base: &str, params: &[(String, String)], hash: Option<&str>) -> String {
    let mut url = base.to_string();
    if !params.is_empty() {
        url.push('?');
        url.push_str(&encode_pairs(params));
    }
    if let Some(hash) = hash {
        url.push('#');
        url.push_str(hash);
    }
    url
}
