// Server module entry point
// Binds the listener and runs the accept loop for one server instance

mod connection;
mod listener;
pub mod signal;

// `loop` is a keyword, so the module is renamed
#[path = "loop.rs"]
mod server_loop;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::Error;
use crate::handler::{CorsHandler, Handler, StaticFiles};

pub use connection::ConnectionOptions;
pub use listener::create_listener;

/// A bound, not yet running server.
///
/// Every instance owns its listener and handler; nothing is process-global,
/// so several servers can run side by side.
pub struct Server<H = CorsHandler<StaticFiles>> {
    listener: TcpListener,
    handler: Arc<H>,
    options: Arc<ConnectionOptions>,
    drain_timeout: Duration,
}

impl Server {
    /// Bind the development file server described by `config`.
    ///
    /// Fails with [`Error::Bind`] when the port is taken or unavailable.
    /// Must be called from within a tokio runtime.
    pub fn bind(config: &Config) -> Result<Self, Error> {
        let handler = CorsHandler::new(StaticFiles::from_config(config));
        Self::with_handler(config, handler)
    }
}

impl<H: Handler> Server<H> {
    /// Bind a server that answers every request with `handler`
    pub fn with_handler(config: &Config, handler: H) -> Result<Self, Error> {
        let addr = config.socket_addr()?;
        let listener = create_listener(addr).map_err(|source| Error::Bind { addr, source })?;

        Ok(Self {
            listener,
            handler: Arc::new(handler),
            options: Arc::new(ConnectionOptions::from_config(config)),
            drain_timeout: Duration::from_secs(config.performance.shutdown_timeout),
        })
    }

    /// Address actually bound, useful when the configured port was 0
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Serve until `shutdown` is cancelled
    ///
    /// Accept failures are logged and retried, so this only returns once
    /// shutdown has been requested.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<(), Error> {
        server_loop::run(
            self.listener,
            self.handler,
            self.options,
            self.drain_timeout,
            shutdown,
        )
        .await;
        Ok(())
    }
}
