mod health;
mod metrics;
mod not_found;
mod url;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use not_found::fallback_handler;
pub use url::{create_url_handler, redirect_handler};
