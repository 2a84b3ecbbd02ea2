use clap::Parser;

use rust_microserver::config::{Config, DEFAULT_CONFIG_PATH};
use rust_microserver::{app, logger, HttpServer};

/// Minimal HTTP/1.1 server with GET routes and static files
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Port to listen on (overrides `server.port`)
    port: Option<u16>,

    /// Configuration file, with or without extension
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut cfg = Config::load_from(&cli.config)?;
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }
    logger::init(&cfg.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut server = HttpServer::new(cfg);
    app::configure(&mut server);
    logger::log_info(&format!("Routes: {}", server.routes().paths().join(", ")));
    server.run().await
}
