//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! decoding, dispatch to the static file handler, and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{HeaderMap, Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Percent-decoded request path
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let is_head = method == Method::HEAD;

    let response = if let Some(resp) = check_http_method(&method) {
        resp
    } else if let Some(decoded) = percent_decode(uri.path()) {
        let ctx = RequestContext {
            path: &decoded,
            is_head,
            if_none_match: header_value(req.headers(), "if-none-match"),
        };
        static_files::serve(&ctx, &state).await
    } else {
        logger::log_warning(&format!(
            "Malformed percent-encoding in path: {}",
            uri.path()
        ));
        http::build_404_response()
    };

    if state.cached_access_log.load(Ordering::Relaxed) {
        let mut entry = AccessLogEntry::new(
            peer_addr.to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = http_version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = body_len(&response);
        entry.referer = header_value(req.headers(), "referer");
        entry.user_agent = header_value(req.headers(), "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method: only GET and HEAD are served
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Decode percent-escapes in a request path
///
/// Returns None for truncated or non-hex escapes and for decoded bytes that
/// are not valid UTF-8. The decoded string is what the traversal check in
/// the static handler inspects, so encoded dot segments cannot slip past it.
fn percent_decode(path: &str) -> Option<String> {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() {
                return None;
            }
            let high = hex_value(bytes[i + 1])?;
            let low = hex_value(bytes[i + 2])?;
            out.push(high * 16 + low);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).ok()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

const fn http_version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Exact length of a fully-buffered response body
fn body_len(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body as _;
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
}
