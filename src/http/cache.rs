//! Entity tags for static file revalidation

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Strong entity tag derived from a file's bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTag(String);

impl EntityTag {
    pub fn for_content(content: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        Self(format!("\"{:016x}\"", hasher.finish()))
    }

    /// Header value, quotes included
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether an `If-None-Match` header value names this tag
    ///
    /// `If-None-Match` uses weak comparison, so `W/"x"` matches `"x"`.
    pub fn matched_by(&self, if_none_match: &str) -> bool {
        if_none_match.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.trim_start_matches("W/") == self.0
        })
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_quoted_and_content_addressed() {
        let tag = EntityTag::for_content(b"body { margin: 0 }");
        assert!(tag.as_str().starts_with('"') && tag.as_str().ends_with('"'));
        assert_eq!(tag.as_str().len(), 18);
        assert_eq!(tag, EntityTag::for_content(b"body { margin: 0 }"));
        assert_ne!(tag, EntityTag::for_content(b"body { margin: 1px }"));
    }

    #[test]
    fn test_matched_by_header_forms() {
        let tag = EntityTag::for_content(b"User-agent: *");
        let exact = tag.to_string();
        assert!(tag.matched_by(&exact));
        assert!(tag.matched_by(&format!("W/{exact}")));
        assert!(tag.matched_by(&format!("\"stale\", {exact}")));
        assert!(tag.matched_by("*"));
        assert!(!tag.matched_by("\"stale\""));
        assert!(!tag.matched_by(""));
    }
}
