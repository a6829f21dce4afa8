use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use car_api::auth::{generate_jwt, Claims};
use car_api::config::{self, AppConfig};
use car_api::database::{CarStore, DatabaseManager, MemoryCarStore, PgCarStore};
use car_api::{app, AppState};

#[derive(Parser)]
#[command(name = "car-api")]
#[command(about = "Car listing API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
        #[arg(long, help = "Keep records in memory instead of PostgreSQL")]
        memory: bool,
    },

    #[command(about = "Print a development bearer token for an owner id")]
    Token {
        #[arg(help = "Owner id; a random one is generated when omitted")]
        owner: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("car_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::config().clone();

    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        memory: false,
    }) {
        Commands::Serve { port, memory } => serve(config, port, memory).await,
        Commands::Token { owner } => {
            let owner = owner.unwrap_or_else(Uuid::new_v4);
            let claims = Claims::new(owner, config.security.jwt_expiry_hours);
            let token = generate_jwt(&claims, &config.security)?;
            println!("owner: {}", owner);
            println!("token: {}", token);
            Ok(())
        }
    }
}

async fn serve(mut config: AppConfig, port: Option<u16>, memory: bool) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.api.port = port;
    }
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set in {:?} mode", config.environment);
    }

    let store: Arc<dyn CarStore> = if memory {
        tracing::warn!("Using in-memory car store; records are lost on exit");
        MemoryCarStore::new_shared()
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        let store = PgCarStore::new(pool);
        store
            .run_migrations()
            .await
            .context("failed to run migrations")?;
        Arc::new(store)
    };

    tracing::info!("Starting Car API in {:?} mode", config.environment);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Car API listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::new(store, config))).await?;
    Ok(())
}
