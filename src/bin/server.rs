//! BlockFS Server Binary
//!
//! Starts the TCP server for BlockFS.

use std::sync::Arc;

use blockfs::network::Server;
use blockfs::storage::layout::MIN_DISK_SIZE;
use blockfs::{Config, Engine};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// BlockFS Server
#[derive(Parser, Debug)]
#[command(name = "blockfs-server")]
#[command(about = "Tiny block-structured file store served over TCP")]
#[command(version)]
struct Args {
    /// Disk image path
    #[arg(short, long, default_value = "./blockfs.img")]
    disk: String,

    /// Disk image size in bytes (used when creating a new image)
    #[arg(short, long, default_value_t = MIN_DISK_SIZE)]
    size: u64,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:12345")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "64")]
    max_connections: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blockfs=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("BlockFS Server v{}", blockfs::VERSION);
    tracing::info!("Disk image: {} ({} bytes)", args.disk, args.size);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .disk_path(&args.disk)
        .disk_size(args.size)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .build();

    // Open engine
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Engine initialized with {} file(s)", engine.file_count());

    // Start server
    let server = match Server::bind(config, engine) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Could not start server on {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
