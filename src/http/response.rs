//! HTTP response building module
//!
//! Provides builders for various HTTP status code responses, decoupled from specific business logic.
//! None of them set CORS or cache-control headers; those are added once per response
//! by the decorating handler.

use super::Body;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use hyper::{Method, Response, StatusCode};

/// Build 200 response carrying file contents
///
/// For HEAD requests `data` is empty and `content_length` still reports the file size.
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    content_length: u64,
    last_modified: Option<&str>,
) -> Response<Body> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);

    if let Some(last_modified) = last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder.body(Body::new(data)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Body::new(Bytes::new()))
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(LAST_MODIFIED, last_modified)
        .body(Body::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Body::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::new(Bytes::from_static(b"404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Body::new(Bytes::from_static(b"404 Not Found")))
        })
}

/// Build 501 Not Implemented response for methods the file server does not handle
pub fn build_501_response(method: &Method) -> Response<Body> {
    let message = format!("501 Not Implemented: unsupported method ('{method}')");
    Response::builder()
        .status(StatusCode::NOT_IMPLEMENTED)
        .header(CONTENT_TYPE, "text/plain")
        .header(ALLOW, "GET, HEAD, OPTIONS")
        .body(Body::new(Bytes::from(message)))
        .unwrap_or_else(|e| {
            log_build_error("501", &e);
            Response::new(Body::new(Bytes::new()))
        })
}

/// Build OPTIONS response (preflight request)
///
/// Status 200 with an empty body; the access-control headers come from the
/// decorating handler like on every other response.
pub fn build_options_response() -> Response<Body> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_LENGTH, 0)
        .body(Body::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Body::new(Bytes::new()))
        })
}

/// Build 301 redirect response
pub fn build_redirect_response(target: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, target)
        .header(CONTENT_LENGTH, 0)
        .body(Body::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            build_404_response()
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Body> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(Body::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Body::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    log::error!("Failed to build {status} response: {error}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_response() {
        let resp = build_404_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_options_response_is_empty() {
        let resp = build_options_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "0");
        assert!(!resp.headers().contains_key(hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[test]
    fn test_file_response_keeps_length_for_head() {
        let resp = build_file_response(Bytes::new(), "text/css", 42, Some("Sun, 06 Nov 1994 08:49:37 GMT"));
        assert_eq!(resp.headers()[CONTENT_LENGTH], "42");
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/css");
        assert_eq!(resp.headers()[LAST_MODIFIED], "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_redirect_response() {
        let resp = build_redirect_response("/docs/?page=2");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/docs/?page=2");
    }

    #[test]
    fn test_501_mentions_method() {
        let resp = build_501_response(&Method::POST);
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(resp.headers()[ALLOW], "GET, HEAD, OPTIONS");
    }
}
