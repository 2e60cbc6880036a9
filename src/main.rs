//! Function Junction HTTP server.
//!
//! Reads configuration from the environment (and `.env` when present),
//! opens the `PostgreSQL` pool, and serves the API until interrupted.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use function_junction::{
    api::{self, AppState, PostgresBackend},
    category::adapters::postgres::PostgresCategoryStore,
    config::AppConfig,
    team::adapters::{TracingNotifier, postgres::PostgresTeamStore},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
    let pool = Pool::builder()
        .max_size(config.max_db_connections)
        .build(manager)?;
    info!(
        database = %config.redacted_database_url(),
        max_connections = config.max_db_connections,
        "database pool ready"
    );

    let state = Arc::new(AppState::<PostgresBackend>::new(
        Arc::new(PostgresTeamStore::new(pool.clone())),
        Arc::new(PostgresCategoryStore::new(pool)),
        Arc::new(TracingNotifier::new()),
        &config,
    ));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(%address, team_size = config.team_size, "listening");
    axum::serve(listener, api::router(state)).await?;
    Ok(())
}
