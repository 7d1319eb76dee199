//! Static file serving module
//!
//! Resolves request paths to files under the root directory and builds the
//! responses, including conditional and range handling.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve the index document for the root path
pub async fn serve_index(
    ctx: &RequestContext<'_>,
    root_dir: &Path,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_index(root_dir, index_files).await {
        Some((content, content_type)) => build_static_file_response(
            &content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
            ctx.range_header.as_deref(),
        ),
        None => http::build_404_response(),
    }
}

/// Serve a file from the root directory, stripping `route_prefix` first
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    root_dir: &Path,
    route_prefix: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_from_directory(root_dir, ctx.path, route_prefix, index_files).await {
        Some((content, content_type)) => build_static_file_response(
            &content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
            ctx.range_header.as_deref(),
        ),
        None => http::build_404_response(),
    }
}

/// Load the first matching index file under the root directory
async fn load_index(root_dir: &Path, index_files: &[String]) -> Option<(Vec<u8>, &'static str)> {
    for name in index_files {
        let candidate = root_dir.join(name);
        if let Ok(content) = fs::read(&candidate).await {
            let content_type =
                mime::content_type_for(candidate.extension().and_then(|e| e.to_str()));
            return Some((content, content_type));
        }
    }
    None
}

/// Load a file from the root directory, with index-file fallback for
/// directory paths
pub async fn load_from_directory(
    root_dir: &Path,
    path: &str,
    route_prefix: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    // Remove the leading slash and neutralize traversal segments
    let clean_path = path.trim_start_matches('/').replace("..", "");

    // Remove the route prefix ("/static/app.js" -> "app.js")
    let prefix_clean = route_prefix.trim_matches('/');
    let relative_path = if prefix_clean.is_empty() {
        clean_path.as_str()
    } else {
        clean_path
            .strip_prefix(&format!("{prefix_clean}/"))
            .unwrap_or(&clean_path)
    };

    let mut file_path = root_dir.join(relative_path);

    let root_canonical = match root_dir.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Root directory not found or inaccessible '{}': {e}",
                root_dir.display()
            ));
            return None;
        }
    };

    // Directory paths fall back to index files
    if file_path.is_dir() || relative_path.is_empty() || relative_path.ends_with('/') {
        file_path = find_index(&file_path, index_files)?;
    }

    // A missing file is an ordinary 404, visible only in the access log
    let Ok(file_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    let content_type = mime::content_type_for(file_path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

fn find_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    index_files
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Build a static file response with `ETag` and Range support
fn build_static_file_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
    range_header: Option<&str>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    // Client already has this version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let start = range.start;
            let end = range.end_position(total_size);

            let body = if is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };

            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                is_head,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => {
            let body = if is_head {
                Bytes::new()
            } else {
                Bytes::from(data.to_owned())
            };

            http::response::build_cached_response(body, content_type, &etag, is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    struct TestRoot {
        dir: PathBuf,
    }

    impl TestRoot {
        fn create(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "staticd-files-{}-{}",
                tag,
                std::process::id()
            ));
            std::fs::create_dir_all(&dir).unwrap();
            Self { dir }
        }

        fn write(&self, name: &str, content: &[u8]) {
            let path = self.dir.join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, content).unwrap();
        }
    }

    impl Drop for TestRoot {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    #[tokio::test]
    async fn serves_exact_file_bytes() {
        let root = TestRoot::create("exact");
        root.write("app.js", b"console.log(1);\n");

        let (content, content_type) = load_from_directory(&root.dir, "/app.js", "", &index_files())
            .await
            .unwrap();
        assert_eq!(content, b"console.log(1);\n");
        assert_eq!(content_type, "application/javascript");
    }

    #[tokio::test]
    async fn strips_the_route_prefix() {
        let root = TestRoot::create("prefix");
        root.write("style.css", b"body{}");

        let (content, content_type) =
            load_from_directory(&root.dir, "/static/style.css", "/static", &index_files())
                .await
                .unwrap();
        assert_eq!(content, b"body{}");
        assert_eq!(content_type, "text/css");
    }

    #[tokio::test]
    async fn missing_file_is_none() {
        let root = TestRoot::create("missing");
        root.write("present.txt", b"here");

        let loaded = load_from_directory(&root.dir, "/absent.txt", "", &index_files()).await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn index_document_for_root_path() {
        let root = TestRoot::create("index");
        root.write("index.html", b"<html>home</html>");

        let (content, content_type) = load_index(&root.dir, &index_files()).await.unwrap();
        assert_eq!(content, b"<html>home</html>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn directory_path_falls_back_to_index() {
        let root = TestRoot::create("dir-index");
        root.write("docs/index.html", b"<html>docs</html>");

        let (content, _) = load_from_directory(&root.dir, "/docs/", "", &index_files())
            .await
            .unwrap();
        assert_eq!(content, b"<html>docs</html>");
    }

    #[tokio::test]
    async fn traversal_cannot_escape_the_root() {
        let root = TestRoot::create("traversal");
        root.write("index.html", b"<html></html>");

        let escape = std::env::temp_dir().join(format!("staticd-escape-{}.txt", std::process::id()));
        std::fs::write(&escape, b"secret").unwrap();

        let loaded = load_from_directory(
            &root.dir,
            &format!("/../{}", escape.file_name().unwrap().to_str().unwrap()),
            "",
            &index_files(),
        )
        .await;
        assert!(loaded.is_none());

        std::fs::remove_file(&escape).unwrap();
    }

    #[test]
    fn conditional_request_gets_a_304() {
        let data = b"cached content";
        let etag = cache::generate_etag(data);

        let resp = build_static_file_response(data, "text/plain", Some(&etag), false, None);
        assert_eq!(resp.status(), 304);
    }

    #[test]
    fn range_request_gets_a_206() {
        let data = b"0123456789";
        let resp =
            build_static_file_response(data, "text/plain", None, false, Some("bytes=2-5"));
        assert_eq!(resp.status(), 206);
        assert_eq!(
            resp.headers().get("Content-Range").unwrap(),
            "bytes 2-5/10"
        );
    }

    #[test]
    fn out_of_bounds_range_gets_a_416() {
        let data = b"0123456789";
        let resp =
            build_static_file_response(data, "text/plain", None, false, Some("bytes=100-"));
        assert_eq!(resp.status(), 416);
    }
}
