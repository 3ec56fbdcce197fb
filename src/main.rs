mod opt;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use devserve::server::signal;
use devserve::{logger, Config, DisplayError, Server};

fn main() -> Result<(), DisplayError> {
    let options = opt::Options::parse();

    let cfg = Config::load(options.config.as_deref(), &options.overrides())?;
    logger::init(&cfg.logging, options.verbose)?;

    // Worker thread count follows the config, defaulting to one per core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        log::debug!("Using {workers} worker threads");
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))?;
    Ok(())
}

async fn async_main(cfg: Config) -> Result<(), devserve::Error> {
    let server = Server::bind(&cfg)?;
    let addr = server.local_addr()?;
    logger::log_server_start(&addr, &cfg.root_dir(), &cfg);

    let shutdown = CancellationToken::new();
    signal::spawn_shutdown_listener(shutdown.clone())?;

    server.serve(shutdown).await
}
