// Server loop module
// Accepts connections until the shutdown token fires, then drains in-flight ones

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use super::connection::{self, ConnectionOptions};
use crate::error::{AppliesTo, IoErrorExt};
use crate::handler::Handler;
use crate::logger;

/// Pause after an accept error that is not tied to a single connection
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Source of incoming connections
pub trait Accept: Send + 'static {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send;
}

impl Accept for TcpListener {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        Self::accept(self)
    }
}

/// Accept loop shared by every server instance
///
/// Returns once `shutdown` is cancelled and open connections have finished or
/// `drain_timeout` has passed. Accept errors never end the loop: a lost
/// connection is skipped, anything else (e.g. `EMFILE`) is retried after
/// [`ACCEPT_BACKOFF`].
pub async fn run<A: Accept, H: Handler>(
    listener: A,
    handler: Arc<H>,
    options: Arc<ConnectionOptions>,
    drain_timeout: Duration,
    shutdown: CancellationToken,
) {
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            biased;

            () = shutdown.cancelled() => break,

            accept_result = listener.accept() => match accept_result {
                Ok((stream, peer_addr)) => {
                    log::trace!("Accepted connection from {peer_addr}");
                    if let Err(e) = stream.set_nodelay(true) {
                        log::debug!("Failed to set TCP_NODELAY for {peer_addr}: {e}");
                    }
                    connection::spawn(stream, peer_addr, &handler, &options, &graceful);
                }
                Err(e) => match e.applies_to() {
                    AppliesTo::Connection => log::debug!("Aborted connection dropped: {e}"),
                    AppliesTo::Listener => {
                        log::error!(
                            "Failed to accept connection, retrying in {}ms: {e}",
                            ACCEPT_BACKOFF.as_millis()
                        );
                        tokio::select! {
                            () = shutdown.cancelled() => break,
                            () = tokio::time::sleep(ACCEPT_BACKOFF) => {}
                        }
                    }
                },
            },
        }
    }

    // Stop accepting before waiting on open connections
    drop(listener);

    tokio::select! {
        () = graceful.shutdown() => log::debug!("All connections closed"),
        () = tokio::time::sleep(drain_timeout) => {
            log::warn!(
                "Connections still open after {} seconds, closing anyway",
                drain_timeout.as_secs()
            );
        }
    }

    logger::log_server_stopped();
}
