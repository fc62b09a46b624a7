//! Axum-based HTTP server for vision-relay.
//!
//! # Components
//!
//! - `handlers`: `/analyze`, `/health` and `/metrics` endpoints.
//! - `middleware`: CORS, request IDs, per-IP rate limiting and the shared-secret check.
//! - `routes`: Router assembly and shared state.

mod handlers;
mod middleware;
mod routes;

pub use middleware::{IpRateLimiter, APP_TOKEN_HEADER};
pub use routes::{create_router, AppState};
