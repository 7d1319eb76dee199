//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! dispatch, and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{HeaderMap, Method, Request, Response, Version};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: std::net::SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    // 1. Gate the method, then the declared body size
    let response = if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        resp
    } else if let Some(resp) = check_body_size(req.headers(), state.config.http.max_body_size) {
        resp
    } else {
        // 2. Extract the conditional/range headers and dispatch
        let ctx = RequestContext {
            path,
            is_head,
            if_none_match: header_value(req.headers(), "if-none-match"),
            range_header: header_value(req.headers(), "range"),
        };
        route_request(&ctx, &state).await
    };

    if state.config.logging.access_log {
        let entry = access_entry(&req, peer_addr, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and configuration
async fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let routes = &state.config.routes;
    let root_dir = &state.root_dir;

    // 1. Root path serves the index document
    if ctx.path == "/" {
        return static_files::serve_index(ctx, root_dir, &routes.index_files).await;
    }

    // 2. Static prefix: strip it, then resolve under the root directory
    if ctx.path.starts_with(routes.static_prefix.as_str()) {
        return static_files::serve_directory(
            ctx,
            root_dir,
            &routes.static_prefix,
            &routes.index_files,
        )
        .await;
    }

    // 3. Anything else resolves directly under the root directory
    static_files::serve_directory(ctx, root_dir, "", &routes.index_files).await
}

/// Check HTTP method and return an early response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Answer 413 when the declared Content-Length exceeds the configured cap
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let declared = headers.get("content-length")?.to_str().ok()?;
    match declared.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{declared}', skipping size check"
            ));
            None
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

/// Assemble the access log entry for a finished request
fn access_entry(
    req: &Request<hyper::body::Incoming>,
    peer_addr: std::net::SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes =
        usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX);
    entry.referer = header_value(req.headers(), "referer");
    entry.user_agent = header_value(req.headers(), "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_head_pass_the_method_gate() {
        assert!(check_http_method(&Method::GET, false).is_none());
        assert!(check_http_method(&Method::HEAD, false).is_none());
    }

    #[test]
    fn options_gets_a_204() {
        let resp = check_http_method(&Method::OPTIONS, false).unwrap();
        assert_eq!(resp.status(), 204);
    }

    #[test]
    fn other_methods_get_a_405() {
        let resp = check_http_method(&Method::POST, false).unwrap();
        assert_eq!(resp.status(), 405);
        let resp = check_http_method(&Method::DELETE, false).unwrap();
        assert_eq!(resp.status(), 405);
    }

    #[test]
    fn oversized_body_gets_a_413() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", "2048".parse().unwrap());
        let resp = check_body_size(&headers, 1024).unwrap();
        assert_eq!(resp.status(), 413);
    }

    #[test]
    fn small_or_absent_body_passes() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", "10".parse().unwrap());
        assert!(check_body_size(&headers, 1024).is_none());
        assert!(check_body_size(&HeaderMap::new(), 1024).is_none());
    }

    #[test]
    fn malformed_content_length_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", "lots".parse().unwrap());
        assert!(check_body_size(&headers, 1024).is_none());
    }

    #[test]
    fn version_labels() {
        assert_eq!(http_version_label(Version::HTTP_10), "1.0");
        assert_eq!(http_version_label(Version::HTTP_11), "1.1");
        assert_eq!(http_version_label(Version::HTTP_2), "2");
    }
}
