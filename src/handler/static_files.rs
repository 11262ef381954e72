//! Static file serving module
//!
//! Resolves decoded request paths beneath the dashboard root and builds
//! file, index, and listing responses. The served tree is read-only; all
//! content is produced by an external build step.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a decoded request path from the dashboard root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    // Reject traversal before touching the filesystem
    let Some(relative) = relative_components(ctx.path) else {
        logger::log_warning(&format!("Path traversal attempt blocked: {}", ctx.path));
        return http::build_403_response();
    };

    let requested = join_components(&state.root, &relative);

    // Missing paths fail canonicalization; that is the common 404 case
    let Ok(resolved) = requested.canonicalize() else {
        return http::build_404_response();
    };

    // Symlinks may still point outside the root after canonicalization
    if !resolved.starts_with(&state.root) {
        logger::log_warning(&format!(
            "Path escapes dashboard root: {} -> {}",
            ctx.path,
            resolved.display()
        ));
        return http::build_403_response();
    }

    if resolved.is_dir() {
        serve_dir(ctx, state, &resolved).await
    } else {
        serve_file(ctx, &resolved).await
    }
}

/// Serve a directory: index file if present, else a listing
async fn serve_dir(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    for index in &state.config.dashboard.index_files {
        let candidate = dir.join(index);
        if candidate.is_file() {
            return serve_file(ctx, &candidate).await;
        }
    }

    if !state.config.dashboard.directory_listing {
        return http::build_404_response();
    }

    match listing::render(dir, ctx.path).await {
        Ok(html) => http::response::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_response()
        }
    }
}

/// Serve a single file with `ETag` support
async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_404_response();
        }
    };

    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    let etag = cache::generate_etag(&content);

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(content), content_type, &etag, ctx.is_head)
}

/// Split a decoded request path into safe relative components
///
/// Empty and `.` segments are dropped. Any `..` segment makes the whole
/// path invalid; the caller rejects it rather than resolving it.
fn relative_components(decoded_path: &str) -> Option<Vec<&str>> {
    let mut components = Vec::new();
    for segment in decoded_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            other => components.push(other),
        }
    }
    Some(components)
}

fn join_components(root: &Path, components: &[&str]) -> PathBuf {
    let mut path = root.to_path_buf();
    for component in components {
        path.push(component);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;

    fn test_state(root: &Path) -> AppState {
        let mut cfg = Config::load_from("missing-test-config").unwrap();
        cfg.dashboard.root = root.to_str().unwrap().to_string();
        AppState::resolve(cfg).unwrap()
    }

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dash-static-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[test]
    fn test_relative_components() {
        assert_eq!(relative_components("/a/b.css").unwrap(), vec!["a", "b.css"]);
        assert_eq!(relative_components("/").unwrap(), Vec::<&str>::new());
        assert_eq!(relative_components("/a/./b").unwrap(), vec!["a", "b"]);
        assert!(relative_components("/../etc/passwd").is_none());
        assert!(relative_components("/a/../../b").is_none());
    }

    #[tokio::test]
    async fn test_serves_existing_file_bytes() {
        let root = temp_root("file");
        std::fs::write(root.join("app.js"), b"console.log('kpi');").unwrap();
        let state = test_state(&root);

        let resp = serve(&ctx("/app.js"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/javascript"
        );
        assert_eq!(body_bytes(resp).await.as_ref(), b"console.log('kpi');");

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_root_serves_index_file() {
        let root = temp_root("index");
        std::fs::write(root.join("index.html"), b"<h1>Q3</h1>").unwrap();
        let state = test_state(&root);

        let resp = serve(&ctx("/"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await.as_ref(), b"<h1>Q3</h1>");

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_missing_path_is_404() {
        let root = temp_root("missing");
        let state = test_state(&root);

        let resp = serve(&ctx("/nope.html"), &state).await;
        assert_eq!(resp.status(), 404);

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_traversal_is_403() {
        let root = temp_root("traversal");
        let state = test_state(&root);

        let resp = serve(&ctx("/../outside.txt"), &state).await;
        assert_eq!(resp.status(), 403);

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_directory_without_index_lists_entries() {
        let root = temp_root("listing");
        std::fs::write(root.join("report.csv"), b"a,b\n").unwrap();
        let state = test_state(&root);

        let resp = serve(&ctx("/"), &state).await;
        assert_eq!(resp.status(), 200);
        let body = String::from_utf8(body_bytes(resp).await.to_vec()).unwrap();
        assert!(body.contains("report.csv"));

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_listing_disabled_is_404() {
        let root = temp_root("nolist");
        std::fs::write(root.join("report.csv"), b"a,b\n").unwrap();
        let mut cfg = Config::load_from("missing-test-config").unwrap();
        cfg.dashboard.root = root.to_str().unwrap().to_string();
        cfg.dashboard.directory_listing = false;
        let state = AppState::resolve(cfg).unwrap();

        let resp = serve(&ctx("/"), &state).await;
        assert_eq!(resp.status(), 404);

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_head_has_headers_but_no_body() {
        let root = temp_root("head");
        std::fs::write(root.join("style.css"), b"body{}").unwrap();
        let state = test_state(&root);

        let head_ctx = RequestContext {
            path: "/style.css",
            is_head: true,
            if_none_match: None,
        };
        let resp = serve(&head_ctx, &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "6");
        assert!(body_bytes(resp).await.is_empty());

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_if_none_match_hit_is_304() {
        let root = temp_root("etag");
        std::fs::write(root.join("data.json"), b"{}").unwrap();
        let state = test_state(&root);

        let first = serve(&ctx("/data.json"), &state).await;
        let etag = first.headers().get("ETag").unwrap().to_str().unwrap().to_string();

        let cond_ctx = RequestContext {
            path: "/data.json",
            is_head: false,
            if_none_match: Some(etag),
        };
        let resp = serve(&cond_ctx, &state).await;
        assert_eq!(resp.status(), 304);

        std::fs::remove_dir_all(&root).ok();
    }
}
