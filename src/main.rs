use sqlx::postgres::PgPoolOptions;
use tracing::info;

use product_service::config::Config;
use product_service::db::PgProductStore;
use product_service::{build_router, docs, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,product_service=debug,tower_http=info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    info!(environment = %config.environment, "Starting product service");

    info!(max_connections = config.max_connections, "Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await?;
    info!("Database connection pool established.");

    info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations complete.");

    let state = AppState::new(PgProductStore::new(pool));
    let app = build_router(state, config.environment);

    let addr = config.bind_addr();
    info!("Listening on http://{}", addr);
    if config.environment.is_development() {
        info!("API docs at http://{}{}", addr, docs::UI_PATH);
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
