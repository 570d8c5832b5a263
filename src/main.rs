use std::sync::Arc;

use servefs::bundle::MemoryBundle;
use servefs::config::{self, AppState};
use servefs::logger;
use servefs::server::{self, SignalHandler};
use servefs::StaticBundle;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;

    logger::init(&cfg.logging)?;

    // Size the Tokio worker pool from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let fs = MemoryBundle::from_dir(&cfg.bundle.dir).await?;
    let file_count = fs.len();
    let total_bytes = fs.total_bytes();
    if fs.is_empty() {
        logger::log_warning(&format!("Bundle directory '{}' is empty", cfg.bundle.dir));
    }

    let bundle = StaticBundle::new(Arc::new(fs), cfg.bundle.handler_config())?;
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&addr, &cfg, bundle.root_prefix(), file_count, total_bytes);

    let state = Arc::new(AppState::new(cfg, bundle));
    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::start_server_loop(listener, state, signals).await;
    Ok(())
}
