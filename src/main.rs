//! Dashboard static server and launcher
//!
//! Serves a directory of pre-built dashboard assets over local HTTP, opens
//! the default browser at the serving URL, and runs until interrupted.

mod browser;
mod config;
mod handler;
mod http;
mod logger;
mod server;

use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;

    // Startup failures are fatal: missing dashboard root, port in use
    let state = Arc::new(config::AppState::resolve(cfg)?);
    let listener = server::bind_listener(addr)?;

    logger::log_server_start(&addr, &state);

    let shutdown = server::signal::ShutdownSignal::new();
    server::signal::start_signal_handler(&shutdown);

    if state.config.dashboard.open_browser {
        browser::launch(&format!("http://localhost:{}/", addr.port()));
    }

    // LocalSet so connection tasks can be spawned locally
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server_loop(
            listener,
            state,
            Arc::clone(&shutdown.notify),
        ))
        .await;

    Ok(())
}
