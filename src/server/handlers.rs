use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::error::ProcessingError;
use crate::models::{ObservationView, YearlyStatView};
use crate::query::{ObservationFilter, PageRequest, StatsFilter};
use crate::server::AppState;

/// Error body returned to API clients
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: String,
}

impl From<ProcessingError> for ApiError {
    fn from(e: ProcessingError) -> Self {
        error!(error = %e, "Query failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

fn storage_unavailable() -> ApiError {
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        error: "storage handle is unavailable".to_string(),
    }
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /api/weather
pub async fn list_weather(
    State(state): State<AppState>,
    Query(filter): Query<ObservationFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<ObservationView>>, ApiError> {
    let rows = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let db = state.db.lock().map_err(|_| storage_unavailable())?;
        let rows = state
            .queries
            .list_observations(db.connection(), &filter, page)?;
        Ok(rows)
    })
    .await
    .map_err(ProcessingError::from)??;
    Ok(Json(rows))
}

/// GET /api/weather/stats
pub async fn list_weather_stats(
    State(state): State<AppState>,
    Query(filter): Query<StatsFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<YearlyStatView>>, ApiError> {
    let rows = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let db = state.db.lock().map_err(|_| storage_unavailable())?;
        let rows = state
            .queries
            .list_yearly_stats(db.connection(), &filter, page)?;
        Ok(rows)
    })
    .await
    .map_err(ProcessingError::from)??;
    Ok(Json(rows))
}
