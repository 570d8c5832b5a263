//! Request path resolution
//!
//! Turns a request path into the path looked up in the bundle and the
//! extension used for Content-Type.

use hyper::Uri;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Document appended to directory-style requests
pub const DIRECTORY_INDEX: &str = "index.html";

/// Extension used for directory-style and fallback responses
pub const HTML_EXTENSION: &str = ".html";

/// Request path after directory expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveRequest<'a> {
    pub path: Cow<'a, str>,
    pub extension: &'a str,
}

/// Percent-decoded path of a request URI
///
/// Paths that do not decode to UTF-8 are returned as sent.
pub fn request_path(uri: &Uri) -> Cow<'_, str> {
    let raw = uri.path();
    percent_decode_str(raw)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(raw))
}

/// Expand a request path for lookup
///
/// A trailing `/` serves that directory's `index.html` as HTML. Anything else
/// is looked up literally, typed by its own extension.
pub fn effective_request(path: &str) -> EffectiveRequest<'_> {
    if path.ends_with('/') {
        EffectiveRequest {
            path: Cow::Owned(format!("{path}{DIRECTORY_INDEX}")),
            extension: HTML_EXTENSION,
        }
    } else {
        EffectiveRequest {
            path: Cow::Borrowed(path),
            extension: path_extension(path),
        }
    }
}

/// Extension of the last path segment, including the dot
///
/// Empty when the last segment has no dot.
pub fn path_extension(path: &str) -> &str {
    let segment = path.rsplit('/').next().unwrap_or(path);
    segment.rfind('.').map_or("", |dot| &segment[dot..])
}
