//! Request handler module
//!
//! A [`Handler`] turns a request into a response. The server runs a
//! [`StaticFiles`] base handler wrapped in a [`CorsHandler`], which answers
//! preflight requests itself and stamps the fixed header set on everything else.

pub mod cors;
mod listing;
pub mod static_files;

use crate::http::Body;
use hyper::{Request, Response};
use std::future::Future;

pub use cors::{CorsHandler, ResponseHeaderSet};
pub use static_files::StaticFiles;

/// Something that can answer an HTTP request.
///
/// Request bodies are never read, so handlers receive only the request head.
/// Failures are expressed as error responses; a handler never errors out.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: Request<()>) -> impl Future<Output = Response<Body>> + Send;
}
