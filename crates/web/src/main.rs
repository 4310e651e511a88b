use std::sync::Arc;

use anyhow::Context;
use ledger::{Database, Ledger, LedgerStore, MemoryLedger};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use web::config::{Backend, Config};
use web::middleware::auth::ApiKeys;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting participation ledger API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let store: Arc<dyn LedgerStore> = match config.backend {
        Backend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            tracing::info!(
                "Connecting to database at: {}",
                database_url.split('@').next_back().unwrap_or("unknown")
            );

            let db = Database::connect(
                database_url,
                config.db_max_connections,
                config.store_timeout,
            )
            .await
            .context("Failed to initialize database")?;
            tracing::info!("Database connection established");

            tracing::info!("Running database migrations");
            db.run_migrations()
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Database migrations completed successfully");

            Arc::new(db)
        }
        Backend::Memory => {
            tracing::warn!("Using the in-memory ledger; nothing survives a restart");
            Arc::new(MemoryLedger::new())
        }
    };

    let ledger = Ledger::new(store, config.store_timeout);

    let api_keys =
        ApiKeys::from_comma_separated(&config.api_keys).context("Failed to parse API_KEYS")?;
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty; every protected route will answer 401");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let app = web::app(ledger, api_keys).layer(cors);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
