use crate::model::MetricsResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

/// Always answers 200; a failed scan shows up as an `error` field.
pub async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(state.reporter().report().await.into())
}
