//! `foodlogd`: the food diary server binary.
//!
//! Usage:
//!   foodlogd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/foodlog/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use foodlog_core::{IdentityProvider, JwtIdentity, Module};
use tracing::info;

use config::ServerConfig;
use diary::service::DiaryService;
use diary::DiaryModule;

/// Food diary server.
#[derive(Parser, Debug)]
#[command(name = "foodlogd", about = "Food diary server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    server_config.verify()?;

    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = foodlog_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: cli.listen.clone(),
        ..Default::default()
    };

    let service = DiaryService::open(&core_config, &server_config.blob.public_base_url)
        .map_err(|e| anyhow::anyhow!("failed to open diary stores: {}", e))?;
    let identity: Arc<dyn IdentityProvider> = Arc::new(JwtIdentity::new(
        &server_config.jwt.secret,
        server_config.jwt.expire_secs,
    ));

    let diary_module = DiaryModule::new(service.clone(), identity);
    info!("{} module initialized", diary_module.name());

    // Images are served from the same store the uploads go to.
    let blob = service.blob_store();
    let app = routes::build_router(blob, vec![(diary_module.name(), diary_module.routes())]);

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("foodlogd listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
