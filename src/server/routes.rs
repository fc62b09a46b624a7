// HTTP routes configuration

use super::handlers::{analyze_handler, health_handler, metrics_handler};
use super::middleware::{
    app_token_middleware, cors_layer, create_ip_rate_limiter, json_payload_too_large,
    rate_limit_middleware, request_id_layers, IpRateLimiter,
};
use crate::config::AppConfig;
use crate::openai::VisionProvider;
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn_with_state, map_response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn VisionProvider>,
    pub rate_limiter: Option<IpRateLimiter>,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn VisionProvider>) -> Self {
        let rate_limiter = create_ip_rate_limiter(config.security.rate_limit_per_minute);
        Self {
            config: Arc::new(config),
            provider,
            rate_limiter,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let (set_request_id, propagate_request_id) = request_id_layers();
    let body_limit = state.config.server.body_limit_bytes;

    // Rate limit runs before the token check so guessing tokens is throttled too
    let gated = Router::new()
        .route("/analyze", post(analyze_handler))
        .route_layer(from_fn_with_state(state.clone(), app_token_middleware))
        .route_layer(from_fn_with_state(state.clone(), rate_limit_middleware));

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(gated)
        // Base64 images blow past axum's 2MB default; the tower-http limit replaces it
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(map_response(json_payload_too_large))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .layer(cors_layer())
        .with_state(state)
}
