//! Static file serving module
//!
//! The stage that runs when the view router passes a request on. Serves files
//! from the configured directory with index file support and `ETag`
//! validation; anything it cannot serve is a 404.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::StaticFilesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache::EntityTag};
use crate::logger;

/// Serve the request from the static directory, or 404
pub async fn serve(ctx: &RequestContext<'_>, config: &StaticFilesConfig) -> Response<Full<Bytes>> {
    if !config.enabled {
        return http::build_404_response();
    }

    match load_from_directory(&config.directory, ctx.path, &config.index_files).await {
        Some((content, content_type)) => {
            let etag = EntityTag::for_content(&content);
            if ctx
                .if_none_match
                .as_deref()
                .is_some_and(|header| etag.matched_by(header))
            {
                return http::build_304_response(etag.as_str());
            }
            http::response::build_cached_response(
                Bytes::from(content),
                &content_type,
                etag.as_str(),
                ctx.is_head,
            )
        }
        None => http::build_404_response(),
    }
}

/// Load a file below `static_dir`, trying index files for directories
///
/// Returns `None` for missing files and for paths escaping `static_dir`.
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, String)> {
    let relative_path = path.trim_start_matches('/');
    let mut file_path = Path::new(static_dir).join(relative_path);

    // Security: ensure file_path is within static_dir
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    if file_path.is_dir() {
        file_path = find_index_file(&file_path, index_files)?;
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime_guess::from_path(&file_path)
        .first_or_octet_stream()
        .to_string();
    Some((content, content_type))
}

fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    index_files
        .iter()
        .map(|index_file| dir.join(index_file))
        .find(|candidate| candidate.is_file())
}
