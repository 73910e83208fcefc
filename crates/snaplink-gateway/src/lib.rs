//! HTTP surface for Snaplink.
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /create` | shorten a URL |
//! | `GET /s/{short_code}` | permanent redirect |
//! | `GET /metrics` | usage report |
//! | `GET /health` | liveness probe |

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
