// Connection handling module
// Serves a single accepted TCP connection on its own task

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::handler::Handler;
use crate::http::Body;
use crate::logger::{self, AccessLogEntry};

/// Per-connection settings, fixed at server construction
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub keep_alive: bool,
    /// Upper bound on the connection's lifetime
    pub timeout: Option<Duration>,
    /// Access log format, `None` when access logging is off
    pub access_log: Option<String>,
}

impl ConnectionOptions {
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.performance.connection_timeout;
        Self {
            keep_alive: config.performance.keep_alive,
            timeout: (timeout > 0).then(|| Duration::from_secs(timeout)),
            access_log: config
                .logging
                .access_log
                .then(|| config.logging.access_log_format.clone()),
        }
    }
}

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 connection settings (keep-alive, title-case header names)
/// 3. Serves the connection with the request handler
/// 4. Registers the connection for graceful shutdown
/// 5. Applies the optional connection timeout
pub fn spawn<H: Handler>(
    stream: TcpStream,
    peer_addr: SocketAddr,
    handler: &Arc<H>,
    options: &Arc<ConnectionOptions>,
    graceful: &GracefulShutdown,
) {
    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder.keep_alive(options.keep_alive);
    // Emit header names as `Access-Control-Allow-Origin` rather than lowercase
    builder.title_case_headers(true);

    let service = {
        let handler = Arc::clone(handler);
        let options = Arc::clone(options);
        service_fn(move |req| {
            let handler = Arc::clone(&handler);
            let options = Arc::clone(&options);
            async move { Ok::<_, Infallible>(respond(req, peer_addr, &*handler, &options).await) }
        })
    };

    let conn = graceful.watch(builder.serve_connection(io, service));
    let timeout = options.timeout;

    tokio::spawn(async move {
        let result = match timeout {
            Some(duration) => match tokio::time::timeout(duration, conn).await {
                Ok(result) => result,
                Err(_) => {
                    log::warn!(
                        "Connection from {peer_addr} timed out after {} seconds",
                        duration.as_secs()
                    );
                    return;
                }
            },
            None => conn.await,
        };

        if let Err(err) = result {
            logger::log_connection_error(&err);
        }
    });
}

/// Answer one request: drop the body, run the handler, write the access log line
async fn respond<H: Handler>(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    handler: &H,
    options: &ConnectionOptions,
) -> Response<Body> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();
    let req = Request::from_parts(parts, ());

    let Some(format) = &options.access_log else {
        return handler.handle(req).await;
    };

    let mut entry = AccessLogEntry::from_request(peer_addr, &req);
    let resp = handler.handle(req).await;
    entry.record_response(&resp, started.elapsed());
    logger::log_access(&entry, format);
    resp
}
