//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from specific business logic.

pub mod cache;
pub mod mime;
pub mod response;

use http_body_util::Full;
use hyper::body::Bytes;

/// Response body used throughout the server
pub type Body = Full<Bytes>;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_501_response, build_file_response,
    build_html_response, build_options_response, build_redirect_response,
};
