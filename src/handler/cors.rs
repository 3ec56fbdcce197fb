//! Header-decorating handler
//!
//! Wraps a base handler so every response leaves with the same access-control
//! and no-cache headers, and answers `OPTIONS` without consulting the base handler.

use super::Handler;
use crate::http::{self, Body};
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL,
};
use hyper::{Method, Request, Response};

const SERVICE_WORKER_ALLOWED: HeaderName = HeaderName::from_static("service-worker-allowed");

/// Headers added to every response, in order
static FIXED_HEADERS: [(HeaderName, HeaderValue); 5] = [
    (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
    (
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    ),
    (
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    ),
    (
        CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    ),
    (SERVICE_WORKER_ALLOWED, HeaderValue::from_static("/")),
];

/// Immutable, ordered set of response headers shared by all requests
#[derive(Debug, Clone, Copy)]
pub struct ResponseHeaderSet(&'static [(HeaderName, HeaderValue)]);

impl ResponseHeaderSet {
    /// The access-control, cache-control and service worker scope headers
    pub fn fixed() -> Self {
        Self(&FIXED_HEADERS)
    }

    pub fn iter(self) -> impl Iterator<Item = (&'static HeaderName, &'static HeaderValue)> {
        self.0.iter().map(|(name, value)| (name, value))
    }

    /// Write every header of the set into `headers`.
    ///
    /// Other headers are left alone. A header already present under one of
    /// these names is replaced, so each appears exactly once.
    pub fn apply(self, headers: &mut HeaderMap) {
        for (name, value) in self.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }
}

impl Default for ResponseHeaderSet {
    fn default() -> Self {
        Self::fixed()
    }
}

/// Composes a base handler with preflight handling and header decoration
pub struct CorsHandler<H> {
    inner: H,
    headers: ResponseHeaderSet,
}

impl<H: Handler> CorsHandler<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            headers: ResponseHeaderSet::fixed(),
        }
    }

    pub const fn inner(&self) -> &H {
        &self.inner
    }

    /// Last step before a response is written
    fn finalize(&self, mut resp: Response<Body>) -> Response<Body> {
        self.headers.apply(resp.headers_mut());
        resp
    }
}

impl<H: Handler> Handler for CorsHandler<H> {
    async fn handle(&self, req: Request<()>) -> Response<Body> {
        let resp = if req.method() == Method::OPTIONS {
            log::debug!("OPTIONS {} -> preflight", req.uri());
            http::build_options_response()
        } else {
            self.inner.handle(req).await
        };
        self.finalize(resp)
    }
}
