//! HTTP API for Copyflow.
//!
//! - [`routes::router`] — the axum router and its handlers
//! - [`state::AppState`] — shared, read-only handler state
//! - [`error::ApiError`] — `{"error": ...}` responses
//! - [`server::serve`] — listener loop with graceful shutdown

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use server::{serve, shutdown_signal};
pub use state::AppState;
