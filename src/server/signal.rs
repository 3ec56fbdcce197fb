// Signal handling module
//
// Supported signals:
// - SIGINT:  Graceful shutdown (Ctrl+C)
// - SIGTERM: Graceful shutdown

use tokio_util::sync::CancellationToken;

use crate::logger;

/// Cancel `shutdown` when the process is asked to stop
///
/// Signal handlers are registered before this returns, so registration
/// failures surface to the caller. Must be called from within a tokio runtime.
#[cfg(unix)]
pub fn spawn_shutdown_listener(shutdown: CancellationToken) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
            () = shutdown.cancelled() => return,
        };
        logger::log_shutdown_requested(name);
        shutdown.cancel();
    });

    Ok(())
}

/// Non-unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn spawn_shutdown_listener(shutdown: CancellationToken) -> std::io::Result<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    logger::log_shutdown_requested("Ctrl+C");
                    shutdown.cancel();
                }
                Err(e) => log::error!("Failed to listen for Ctrl+C: {e}"),
            },
            () = shutdown.cancelled() => {}
        }
    });

    Ok(())
}
