//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, `/api`
//! dispatch, and the file-serving pipeline with its error-to-status mapping.

use crate::api;
use crate::config::AppState;
use crate::handler::error::ServeError;
use crate::handler::resolve::ServeRoots;
use crate::handler::transform;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    let response = match method {
        Method::POST if path == "/api" => return api::handle_uppercase(req).await,
        Method::GET | Method::HEAD => serve_file(&path, is_head, &state.roots).await,
        Method::OPTIONS => http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response()
        }
    };

    if state.config.logging.access_log {
        logger::log_access(&method, &path, response.status().as_u16());
    }
    Ok(response)
}

/// The file-serving pipeline: resolve → transform → respond.
///
/// Stateless and single-attempt; every failure is terminal for the request.
async fn serve_file(path: &str, is_head: bool, roots: &ServeRoots) -> Response<Full<Bytes>> {
    let location = match roots.resolve(path) {
        Ok(loc) => loc,
        Err(_) => {
            logger::log_warning(&format!("Path escape blocked: {path}"));
            return http::build_403_response();
        }
    };

    match transform::produce(&location, roots).await {
        Ok(outcome) => {
            let content_type = outcome.content_type();
            http::build_file_response(outcome.into_bytes(), content_type, is_head)
        }
        Err(e) => map_serve_error(&e, path),
    }
}

/// Single classification step from pipeline failure to HTTP status
fn map_serve_error(err: &ServeError, path: &str) -> Response<Full<Bytes>> {
    match err {
        ServeError::NotFound => http::build_404_response(),
        ServeError::AccessDenied => {
            logger::log_warning(&format!("Read denied for {path}"));
            http::build_403_response()
        }
        ServeError::ImportMap(_) | ServeError::Transform(_) => {
            // Operator-visible detail; the client only sees a generic body
            logger::log_error(&format!("Failed to serve {path}: {err}"));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importmap::ImportMapError;
    use std::fs;
    use tempfile::TempDir;

    fn roots() -> (TempDir, ServeRoots) {
        let tmp = TempDir::new().unwrap();
        let frontend = tmp.path().join("frontend");
        let node_modules = tmp.path().join("node_modules");
        fs::create_dir(&frontend).unwrap();
        fs::create_dir(&node_modules).unwrap();
        let roots = ServeRoots::new(&frontend, &node_modules, "index.html").unwrap();
        (tmp, roots)
    }

    #[tokio::test]
    async fn traversal_attempt_is_forbidden() {
        let (_tmp, roots) = roots();
        let resp = serve_file("/../../etc/passwd", false, &roots).await;
        assert_eq!(resp.status(), 403);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let (_tmp, roots) = roots();
        let resp = serve_file("/missing-file.png", false, &roots).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn existing_directory_is_not_found() {
        let (_tmp, roots) = roots();
        fs::create_dir(roots.primary().dir.join("img")).unwrap();
        let resp = serve_file("/img", false, &roots).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn typescript_is_served_as_javascript() {
        let (_tmp, roots) = roots();
        fs::write(roots.primary().dir.join("index.ts"), "const x: number = 1;").unwrap();
        let resp = serve_file("/index.ts", false, &roots).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/javascript"
        );
    }

    #[tokio::test]
    async fn node_modules_files_are_served_raw() {
        let (tmp, roots) = roots();
        fs::create_dir(tmp.path().join("node_modules/chalk")).unwrap();
        fs::write(
            tmp.path().join("node_modules/chalk/index.js"),
            "export default {};",
        )
        .unwrap();
        let resp = serve_file("/node_modules/chalk/index.js", false, &roots).await;
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn head_request_omits_body_but_keeps_length() {
        let (_tmp, roots) = roots();
        fs::write(roots.primary().dir.join("a.txt"), "hello").unwrap();
        let resp = serve_file("/a.txt", true, &roots).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "5");
    }

    #[test]
    fn error_mapping_matches_the_status_table() {
        assert_eq!(map_serve_error(&ServeError::NotFound, "/x").status(), 404);
        assert_eq!(
            map_serve_error(&ServeError::AccessDenied, "/x").status(),
            403
        );
        assert_eq!(
            map_serve_error(
                &ServeError::ImportMap(ImportMapError::PackageNotFound("p".into())),
                "/x"
            )
            .status(),
            500
        );
        assert_eq!(
            map_serve_error(
                &ServeError::Transform(std::io::Error::other("boom")),
                "/x"
            )
            .status(),
            500
        );
    }
}
