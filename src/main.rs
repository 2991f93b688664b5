use anyhow::{anyhow, Context};
use std::sync::Arc;
use tracing::{error, info};

use tower_drop_server::logging::{self, TracingConfig};
use tower_drop_server::{storage, CreatureFacts, DropResolver, ServerConfig};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();

    let mut tracing_config = TracingConfig::for_level(config.log_level);
    if config.verbose_drops {
        tracing_config = tracing_config.verbose_drops();
    }
    logging::init_tracing(&tracing_config);

    info!("Starting Tower drop server...");

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        error!("Ensure PostgreSQL is running: docker compose up -d postgres");
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    info!(
        "Config: lmdb_path={}, lmdb_max_size={}, pg_max_connections={}, multi_equip_drops={}, log_level={}",
        config.lmdb_path,
        config.lmdb_max_size,
        config.pg_max_connections,
        config.drops.multi_equip_drops,
        config.log_level
    );

    // ========================================================================
    // 1. Storage (LMDB templates + PostgreSQL drop tables)
    // ========================================================================
    info!("Connecting to PostgreSQL: {}...", config.database_url);
    let backends = storage::init_storage(
        &config.lmdb_path,
        config.lmdb_max_size,
        &config.database_url,
        config.pg_max_connections,
    )
    .await
    .map_err(|e| anyhow!("storage initialization failed: {}", e))?;

    let stats = backends
        .templates
        .stats()
        .context("failed to read template store stats")?;
    info!("{}", stats.summary());

    // ========================================================================
    // 2. Drop resolution + creature facts
    // ========================================================================
    let resolver = Arc::new(DropResolver::new(backends.drops.clone(), backends.items.clone(), config.drops).await);
    let facts = Arc::new(CreatureFacts::new(backends.creatures.clone(), backends.creatures.clone()));

    info!(
        "Drop server ready: {} global drops loaded, {} creatures in directory",
        resolver.global_drop_count(),
        facts.search_by_name("").await.len()
    );

    // ========================================================================
    // 3. Hot reload on SIGHUP
    // ========================================================================
    #[cfg(unix)]
    {
        let resolver = resolver.clone();
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let mut hangup = match signal(SignalKind::hangup()) {
                Ok(hangup) => hangup,
                Err(e) => {
                    error!("Failed to install SIGHUP handler: {}", e);
                    return;
                }
            };

            while hangup.recv().await.is_some() {
                info!("SIGHUP received, reloading drop data");
                resolver.reset().await;
                info!("Drop cache stats: {}", resolver.stats().to_json());
            }
        });
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    info!("Shutting down. Final drop cache stats: {}", resolver.stats().to_json());
    Ok(())
}
