//! `devlockd` — the devlock server binary.
//!
//! Configuration comes from the environment (`JWT_SECRET`, `PORT`,
//! `TOKEN_TTL_SECS`); CLI flags override where given. State is held in
//! memory unless `--db` points at a redb file.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use devlockd::config::ServerConfig;
use devlockd::routes;

/// devlock server.
#[derive(Parser, Debug)]
#[command(name = "devlockd", about = "Device-lifecycle control plane server")]
struct Cli {
    /// Listening port (overrides the PORT environment variable).
    #[arg(long = "port")]
    port: Option<u16>,

    /// Durable redb store path (default: in-memory, lost on restart).
    #[arg(long = "db")]
    db: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::from_env(cli.port, cli.db)?;

    let kv: Arc<dyn devlock_kv::KVStore> = match &config.db_path {
        Some(path) => Arc::new(
            devlock_kv::RedbStore::open(path)
                .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
        ),
        None => Arc::new(devlock_kv::MemoryStore::new()),
    };

    let services = routes::init_services(Arc::clone(&kv), &config.jwt_secret, config.token_ttl_secs);
    info!("Devices module initialized");
    info!("Customers module initialized");

    let app = routes::build_router(&services);

    // Liveness tick, every five minutes. Touches no state.
    tokio::spawn(async {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(300));
        tick.tick().await; // the first tick completes immediately
        loop {
            tick.tick().await;
            info!("devlockd alive at {}", devlock_core::now_rfc3339());
        }
    });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
