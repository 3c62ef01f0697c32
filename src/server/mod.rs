//! HTTP read API over the Query Service.

pub mod handlers;

use axum::{routing::get, Router};
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::query::QueryService;
use crate::storage::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub queries: QueryService,
}

impl AppState {
    pub fn new(db: Database, queries: QueryService) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            queries,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/weather", get(handlers::list_weather))
        .route("/api/weather/stats", get(handlers::list_weather_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!(address = bind_address, "Serving weather API");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| ProcessingError::Server(e.to_string()))
}
