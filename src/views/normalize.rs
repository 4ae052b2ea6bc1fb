//! Request path normalization

use std::fmt;

/// View used when the request path has no segments
pub const DEFAULT_VIEW: &str = "index";

/// Normalized view identifier
///
/// Slash-joined relative path without leading/trailing separators and
/// without empty segments. Doubles as template name and as the file path
/// fragment below the views directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewId(String);

impl ViewId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Iterate over the path segments of the identifier
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ViewId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ViewId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ViewId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Normalize a request path into a view identifier
///
/// Empty segments are dropped, which uniformly handles leading, trailing and
/// repeated slashes. A path without segments maps to [`DEFAULT_VIEW`].
pub fn normalize(path: &str) -> ViewId {
    let joined = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        ViewId(DEFAULT_VIEW.to_string())
    } else {
        ViewId(joined)
    }
}
