//! A local development file server.
//!
//! Serves a directory over HTTP/1.1 and stamps a fixed set of permissive
//! cross-origin and no-cache headers on every response, including errors.
//! `OPTIONS` requests are answered with an empty `200 OK` so browser
//! preflight checks always pass.
//!
//! ```no_run
//! use devserve::{Config, Server};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), devserve::Error> {
//! let config = Config::new(8000, "./public");
//! let server = Server::bind(&config)?;
//! server.serve(CancellationToken::new()).await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::Config;
pub use error::{DisplayError, Error};
pub use handler::{CorsHandler, Handler, ResponseHeaderSet, StaticFiles};
pub use server::Server;
