//! Static file serving module
//!
//! `/` and the chatbot path map to fixed documents; any other path is
//! percent-decoded and looked up relative to the static root.

use crate::config::RoutesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve the document for `ctx.path`, or 404
pub async fn serve(ctx: &RequestContext<'_>, routes: &RoutesConfig) -> Response<Full<Bytes>> {
    let decoded;
    let relative = if ctx.path == "/" {
        routes.index_file.as_str()
    } else if ctx.path == routes.chatbot_path {
        routes.chatbot_file.as_str()
    } else {
        match decode_request_path(ctx.path) {
            Some(path) => {
                decoded = path;
                decoded.trim_start_matches('/')
            }
            None => return http::build_404_response(),
        }
    };

    match load_file(Path::new(&routes.root), relative).await {
        Some((content, content_type)) => build_static_file_response(ctx, content, content_type),
        None => http::build_404_response(),
    }
}

/// Percent-decode a request path; `None` for invalid UTF-8 or embedded NUL
fn decode_request_path(path: &str) -> Option<Cow<'_, str>> {
    match urlencoding::decode(path) {
        Ok(decoded) if !decoded.contains('\0') => Some(decoded),
        Ok(_) => {
            logger::log_warning(&format!("Rejected request path with NUL byte: {path}"));
            None
        }
        Err(e) => {
            logger::log_warning(&format!("Rejected undecodable request path {path}: {e}"));
            None
        }
    }
}

/// Resolve `relative` under `root` and read it.
///
/// Returns `None` when the file does not exist, is not a regular file, or
/// resolves outside `root` (e.g. through `..` or a symlink).
pub async fn load_file(root: &Path, relative: &str) -> Option<(Bytes, &'static str)> {
    if relative.is_empty() {
        return None;
    }

    let path = resolve_within(root, relative).await?;
    let metadata = fs::metadata(&path).await.ok()?;
    if !metadata.is_file() {
        return None;
    }

    match fs::read(&path).await {
        Ok(content) => Some((Bytes::from(content), mime::content_type_for(&path))),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            None
        }
    }
}

async fn resolve_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let root = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    // missing files are the common 404 case, not worth a log line
    let candidate = fs::canonicalize(root.join(relative)).await.ok()?;
    if candidate.starts_with(&root) {
        Some(candidate)
    } else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} -> {}",
            candidate.display()
        ));
        None
    }
}

fn build_static_file_response(
    ctx: &RequestContext<'_>,
    content: Bytes,
    content_type: &str,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&content);
    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }
    http::build_file_response(content, content_type, &etag, ctx.is_head)
}
