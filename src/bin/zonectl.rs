use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use zonectl::{api, config::AppConfig, db, schema};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// Database connection string (e.g. sqlite://zonectl.db)
    #[arg(long, value_name = "URL", env = "DATABASE_URL")]
    database_url: String,
    /// Listen address for the HTTP server
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,
    /// Maximum number of pooled database connections
    #[arg(long, value_name = "N", default_value_t = 20)]
    db_max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig {
        database_url: cli.database_url,
        listen: cli.listen,
        db_max_connections: cli.db_max_connections,
    };

    let pool = db::init_db(&config.database_url, config.db_max_connections)
        .await
        .context("failed to initialize database")?;
    let app = api::create_router(schema::build_schema(pool));

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind to {}", config.listen))?;

    info!("serving GraphQL on http://{}/graphql", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to install CTRL+C handler: {err}");
    }
    info!("shutdown signal received");
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
