use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_url_handler, fallback_handler, health_handler, metrics_handler, redirect_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/create", post(create_url_handler))
            .route("/s/{short_code}", get(redirect_handler))
            .route("/metrics", get(metrics_handler))
            .fallback(fallback_handler)
            .method_not_allowed_fallback(fallback_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
