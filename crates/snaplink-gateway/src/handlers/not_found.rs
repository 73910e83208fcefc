use crate::error::AppError;

pub async fn fallback_handler() -> AppError {
    AppError::RouteNotFound
}
