//! View file existence check

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::normalize::ViewId;
use crate::logger;

/// Unexpected failure of the existence check itself
///
/// Benign outcomes such as a missing file or denied access are never
/// reported through this type.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("view path '{}' cannot be represented on the filesystem: {source}", .path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("view existence probe did not complete: {0}")]
    ProbeFailed(#[from] tokio::task::JoinError),
}

/// Tri-state result of a lookup
#[derive(Debug)]
pub enum LookupOutcome {
    Found(ViewId),
    NotFound,
    Failed(LookupError),
}

impl LookupOutcome {
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Locates view files below a base directory
#[derive(Debug, Clone)]
pub struct ViewLookup {
    directory: PathBuf,
    extension: String,
}

impl ViewLookup {
    /// `extension` is accepted with or without a leading dot
    pub fn new(directory: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Candidate location `{directory}/{view}.{extension}`
    pub fn candidate_path(&self, view: &str) -> PathBuf {
        self.directory.join(format!("{view}.{}", self.extension))
    }

    /// Check whether a view file exists for `view`
    ///
    /// The metadata probe runs on the blocking pool. Missing files, denied
    /// access and any other I/O error all collapse into `NotFound`; only a
    /// path the OS refuses to look up at all, or a probe task that never
    /// completed, yields `Failed`.
    pub async fn check(&self, view: ViewId) -> LookupOutcome {
        if view.segments().any(|segment| segment == ".." || segment == ".") {
            logger::log_warning(&format!("Path traversal attempt blocked: view '{view}'"));
            return LookupOutcome::NotFound;
        }

        let candidate = self.candidate_path(view.as_str());
        let probe = tokio::task::spawn_blocking(move || {
            let result = std::fs::metadata(&candidate);
            (candidate, result)
        });

        match probe.await {
            Ok((_, Ok(metadata))) if metadata.is_file() => LookupOutcome::Found(view),
            Ok((_, Ok(_))) => LookupOutcome::NotFound,
            Ok((path, Err(source))) if source.kind() == io::ErrorKind::InvalidInput => {
                LookupOutcome::Failed(LookupError::InvalidPath { path, source })
            }
            Ok((_, Err(_))) => LookupOutcome::NotFound,
            Err(e) => LookupOutcome::Failed(LookupError::ProbeFailed(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::normalize;
    use std::fs;
    use tempfile::TempDir;

    fn views_dir(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, "<p>{{title}}</p>").unwrap();
        }
        dir
    }

    #[test]
    fn test_candidate_path() {
        let lookup = ViewLookup::new("views", "hbs");
        assert_eq!(lookup.candidate_path("menu/group"), PathBuf::from("views/menu/group.hbs"));
    }

    #[test]
    fn test_extension_leading_dot_is_stripped() {
        let lookup = ViewLookup::new("views", ".hbs");
        assert_eq!(lookup.extension(), "hbs");
        assert_eq!(lookup.candidate_path("index"), PathBuf::from("views/index.hbs"));
    }

    #[tokio::test]
    async fn test_found_index() {
        let dir = views_dir(&["index.hbs"]);
        let lookup = ViewLookup::new(dir.path(), "hbs");
        match lookup.check(normalize("/")).await {
            LookupOutcome::Found(view) => assert_eq!(view, "index"),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_found_nested() {
        let dir = views_dir(&["menu/group.hbs"]);
        let lookup = ViewLookup::new(dir.path(), "hbs");
        assert!(lookup.check(normalize("//menu///group//")).await.is_found());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = views_dir(&["index.hbs"]);
        let lookup = ViewLookup::new(dir.path(), "hbs");
        assert!(matches!(lookup.check(normalize("/about")).await, LookupOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_wrong_extension_is_not_found() {
        let dir = views_dir(&["about.html"]);
        let lookup = ViewLookup::new(dir.path(), "hbs");
        assert!(matches!(lookup.check(normalize("/about")).await, LookupOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let lookup = ViewLookup::new(dir.path().join("does-not-exist"), "hbs");
        assert!(matches!(lookup.check(normalize("/")).await, LookupOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_directory_named_like_view_is_not_found() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("about.hbs")).unwrap();
        let lookup = ViewLookup::new(dir.path(), "hbs");
        assert!(matches!(lookup.check(normalize("/about")).await, LookupOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_file_in_place_of_directory_is_not_found() {
        // "index.hbs/x.hbs" fails with ENOTDIR, which is just another miss
        let dir = views_dir(&["index.hbs"]);
        let lookup = ViewLookup::new(dir.path().join("index.hbs"), "hbs");
        assert!(matches!(lookup.check(normalize("/x")).await, LookupOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_dot_segments_are_not_found() {
        let dir = views_dir(&["secret.hbs", "views/index.hbs"]);
        let lookup = ViewLookup::new(dir.path().join("views"), "hbs");
        assert!(matches!(lookup.check(normalize("/../secret")).await, LookupOutcome::NotFound));
        assert!(matches!(lookup.check(normalize("/./index")).await, LookupOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_nul_byte_fails() {
        let dir = views_dir(&["index.hbs"]);
        let lookup = ViewLookup::new(dir.path(), "hbs");
        match lookup.check(normalize("/bad\0name")).await {
            LookupOutcome::Failed(LookupError::InvalidPath { path, .. }) => {
                assert!(path.to_string_lossy().ends_with("bad\0name.hbs"));
            }
            other => panic!("expected InvalidPath, got {other:?}"),
        }
    }
}
