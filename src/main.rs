use std::sync::Arc;
use tokio::task::LocalSet;

mod api;
mod config;
mod handler;
mod http;
mod importmap;
mod logger;
mod server;
mod strip;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Single-threaded cooperative scheduling: one logical thread processes
    // requests, and every disk read is a suspension point
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(cfg)?);
    logger::log_server_start(&addr, &state.config);

    // LocalSet for spawn_local support
    let local = LocalSet::new();
    local.run_until(server::run(listener, state)).await
}
