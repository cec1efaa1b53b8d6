mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use config::{Config, StoreBackend};
use services::store::{BuildingStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let config = Config::from_env().expect("invalid configuration");

    let store: Arc<dyn BuildingStore> = match &config.backend {
        StoreBackend::Memory => {
            tracing::warn!("STORE_BACKEND=memory: buildings are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres { database_url } => {
            let pool = db::init_pool(database_url)
                .await
                .expect("database init failed");
            Arc::new(PgStore::new(pool))
        }
    };

    let state = state::AppState::new(store);
    let app = routes::app(state, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, static_dir = %config.static_dir.display(), "intramap listening");
    axum::serve(listener, app).await.expect("server failed");
}
