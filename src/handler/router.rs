//! Request pipeline module
//!
//! Entry point for HTTP request processing: method validation, body size
//! check, then the view stage with the static file stage as its `next`.

use crate::config::AppState;
use crate::handler::{build_locals, static_files};
use crate::http;
use crate::logger;
use crate::views::{Handled, ViewRequest};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderMap;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Response extension naming the view that produced the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView(pub String);

/// Main entry point for HTTP request handling
///
/// The body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let uri = req.uri();

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        return Ok(resp);
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(req.headers(), state.config.http.max_body_size) {
        return Ok(resp);
    }

    // 3. Log headers if enabled
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let ctx = RequestContext {
        path: uri.path(),
        query: uri.query(),
        is_head: *method == Method::HEAD,
        if_none_match: req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };

    // 4. View stage, falling through to static files
    Ok(route_request(&ctx, &state).await)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Run the view stage with the static file stage as `next`
async fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let static_config = &state.config.static_files;
    let next = move || static_files::serve(ctx, static_config);

    if !state.config.views.enabled {
        return next().await;
    }

    let locals = build_locals(ctx.path, ctx.query, state);
    let request = ViewRequest::new(ctx.path, &locals);

    match state.views.handle(&request, &state.renderer, next).await {
        Ok(Handled::Rendered { view, body }) => {
            logger::log_view_rendered(&view, body.len());
            let mut resp =
                http::build_html_response(body, &state.config.http.server_name, ctx.is_head);
            resp.extensions_mut().insert(RenderedView(view));
            resp
        }
        Ok(Handled::Passed(resp)) => resp,
        Err(e) => {
            logger::log_error(&format!("[Views] {}: {e}", ctx.path));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use std::fs;
    use tempfile::TempDir;

    struct Site {
        _dir: TempDir,
        state: Arc<AppState>,
    }

    /// Views: index, about, menu/group, fallback. Public: robots.txt
    fn site(configure: impl FnOnce(&mut Config)) -> Site {
        let dir = TempDir::new().unwrap();
        let views = dir.path().join("views");
        let public = dir.path().join("public");
        fs::create_dir_all(views.join("menu")).unwrap();
        fs::create_dir_all(&public).unwrap();
        fs::write(views.join("index.hbs"), "<h1>{{site}} home</h1>").unwrap();
        fs::write(views.join("about.hbs"), "<h1>about {{path}}</h1>").unwrap();
        fs::write(views.join("menu/group.hbs"), "<h1>group {{query.day}}</h1>").unwrap();
        fs::write(views.join("fallback.hbs"), "<h1>fallback for {{path}}</h1>").unwrap();
        fs::write(public.join("robots.txt"), "User-agent: *").unwrap();

        let mut config = Config::load_from(dir.path().join("none").to_str().unwrap()).unwrap();
        config.views.directory = views.to_string_lossy().into_owned();
        config.static_files.directory = public.to_string_lossy().into_owned();
        config
            .views
            .globals
            .insert("site".to_string(), serde_json::json!("Cafe"));
        configure(&mut config);

        let state = Arc::new(AppState::new(&config).unwrap());
        Site { _dir: dir, state }
    }

    fn get(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn rendered_view(resp: &Response<Full<Bytes>>) -> Option<&str> {
        resp.extensions()
            .get::<RenderedView>()
            .map(|v| v.0.as_str())
    }

    #[tokio::test]
    async fn test_root_renders_index_with_globals() {
        let site = site(|_| {});
        let resp = handle_request(get("/"), Arc::clone(&site.state)).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(rendered_view(&resp), Some("index"));
        assert_eq!(body_string(resp).await, "<h1>Cafe home</h1>");
    }

    #[tokio::test]
    async fn test_nested_view_with_query_locals() {
        let site = site(|_| {});
        let resp = handle_request(get("/menu//group/?day=mon"), Arc::clone(&site.state))
            .await
            .unwrap();
        assert_eq!(rendered_view(&resp), Some("menu/group"));
        assert_eq!(body_string(resp).await, "<h1>group mon</h1>");
    }

    #[tokio::test]
    async fn test_unknown_path_falls_through_to_static_files() {
        let site = site(|_| {});
        let resp = handle_request(get("/robots.txt"), Arc::clone(&site.state))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(rendered_view(&resp), None);
        assert!(resp.headers().contains_key("ETag"));
        assert_eq!(body_string(resp).await, "User-agent: *");
    }

    #[tokio::test]
    async fn test_unknown_path_without_static_file_is_404() {
        let site = site(|_| {});
        let resp = handle_request(get("/admin"), Arc::clone(&site.state)).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_configured_override_renders_fallback() {
        let site = site(|c| {
            c.views
                .overrides
                .insert("/admin".to_string(), "fallback".to_string());
        });
        let resp = handle_request(get("/admin"), Arc::clone(&site.state)).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(rendered_view(&resp), Some("fallback"));
        assert_eq!(body_string(resp).await, "<h1>fallback for /admin</h1>");
    }

    #[tokio::test]
    async fn test_discovered_view_beats_configured_override() {
        let site = site(|c| {
            c.views
                .overrides
                .insert("/about".to_string(), "fallback".to_string());
        });
        let resp = handle_request(get("/about"), Arc::clone(&site.state)).await.unwrap();
        assert_eq!(rendered_view(&resp), Some("about"));
        assert_eq!(body_string(resp).await, "<h1>about /about</h1>");
    }

    #[tokio::test]
    async fn test_missing_override_template_is_500() {
        let site = site(|c| {
            c.views
                .overrides
                .insert("/admin".to_string(), "no-such-view".to_string());
        });
        let resp = handle_request(get("/admin"), Arc::clone(&site.state)).await.unwrap();
        assert_eq!(resp.status(), 500);
    }

    #[tokio::test]
    async fn test_mixed_case_global_from_config_file_renders() {
        let dir = TempDir::new().unwrap();
        let views = dir.path().join("views");
        fs::create_dir_all(&views).unwrap();
        fs::write(views.join("index.hbs"), "<h1>{{siteName}}</h1>").unwrap();
        fs::write(
            dir.path().join("site.toml"),
            format!(
                "[views]\ndirectory = {:?}\n\n[views.globals]\nsiteName = \"Cafe\"\n",
                views.to_string_lossy()
            ),
        )
        .unwrap();

        let config = Config::load_from(dir.path().join("site").to_str().unwrap()).unwrap();
        let state = Arc::new(AppState::new(&config).unwrap());
        let resp = handle_request(get("/"), state).await.unwrap();
        assert_eq!(body_string(resp).await, "<h1>Cafe</h1>");
    }

    #[tokio::test]
    async fn test_override_prefix_does_not_cross_segments() {
        let site = site(|c| {
            c.views
                .overrides
                .insert("/admin".to_string(), "fallback".to_string());
        });
        let resp = handle_request(get("/administrator"), Arc::clone(&site.state))
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let site = site(|_| {});
        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/about")
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&site.state)).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_ne!(resp.headers()["Content-Length"], "0");
        assert_eq!(body_string(resp).await, "");
    }

    #[tokio::test]
    async fn test_views_disabled_goes_straight_to_static() {
        let site = site(|c| c.views.enabled = false);
        let resp = handle_request(get("/"), Arc::clone(&site.state)).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_method_and_size_checks() {
        let site = site(|_| {});
        let post = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(())
            .unwrap();
        let resp = handle_request(post, Arc::clone(&site.state)).await.unwrap();
        assert_eq!(resp.status(), 405);

        let big = Request::builder()
            .uri("/")
            .header("content-length", "999999999999")
            .body(())
            .unwrap();
        let resp = handle_request(big, Arc::clone(&site.state)).await.unwrap();
        assert_eq!(resp.status(), 413);

        let options = Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .body(())
            .unwrap();
        let resp = handle_request(options, Arc::clone(&site.state)).await.unwrap();
        assert_eq!(resp.status(), 204);
    }

    #[tokio::test]
    async fn test_static_etag_revalidation() {
        let site = site(|_| {});
        let first = handle_request(get("/robots.txt"), Arc::clone(&site.state))
            .await
            .unwrap();
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/robots.txt")
            .header("if-none-match", etag)
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&site.state)).await.unwrap();
        assert_eq!(resp.status(), 304);
    }
}
