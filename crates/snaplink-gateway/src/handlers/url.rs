use crate::error::{AppError, Result};
use crate::model::{rfc3339, CreateUrlRequest, CreateUrlResponse};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tracing::{debug, error};

// Parsed by hand: a missing or wrong Content-Type counts as a malformed
// body.
pub async fn create_url_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CreateUrlResponse>> {
    let request = CreateUrlRequest::from_slice(&body).map_err(|e| {
        debug!(error = %e, "rejecting create request body");
        AppError::InvalidJson
    })?;

    let url = request
        .url
        .filter(|url| !url.is_empty())
        .ok_or(AppError::MissingUrl)?;

    let link = state.shortener().create(&url).await?;
    debug!(code = %link.short_code, "short link created");

    Ok(Json(CreateUrlResponse {
        short_url: link.short_url,
        expires_at: rfc3339(link.expires_at),
    }))
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let target = state.redirector().resolve(&short_code).await?;
    let location = HeaderValue::try_from(target.location).map_err(|e| {
        error!(code = %short_code, error = %e, "stored URL is not a valid Location header");
        AppError::Internal
    })?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location)],
    ))
}
