// HTTP middleware

use super::routes::AppState;
use crate::error::RelayError;
use crate::metrics;
use axum::{
    body::{Bytes, HttpBody},
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    BoxError,
};
use dashmap::DashMap;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use subtle::ConstantTimeEq;
use tokio::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::{debug, warn};

/// Header carrying the shared secret
pub const APP_TOKEN_HEADER: &str = "x-app-token";

/// Length of one rate limiting window
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Rate limiter keyed by client IP address
pub type IpRateLimiter = Arc<FixedWindowLimiter>;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter per client address.
///
/// Each address gets `limit` requests per window. The window opens on the
/// address's first request and nothing is refunded until it closes, so no
/// window ever admits more than `limit`.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    clients: DashMap<IpAddr, Window>,
}

impl FixedWindowLimiter {
    pub fn new(limit: NonZeroU32, window: Duration) -> Self {
        Self {
            limit: limit.get(),
            window,
            clients: DashMap::new(),
        }
    }

    /// Count one request from `ip`. On rejection returns the time until the
    /// address's window resets.
    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), Duration> {
        let mut entry = self.clients.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.limit {
            return Err(self.window - now.saturating_duration_since(entry.started));
        }
        entry.count += 1;
        Ok(())
    }

    /// Drop addresses whose window has closed.
    pub fn retain_recent(&self) {
        let now = Instant::now();
        self.clients
            .retain(|_, w| now.saturating_duration_since(w.started) < self.window);
    }

    /// Number of addresses currently tracked.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// Create request ID layers for the application
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::x_request_id(MakeRequestUuid),
        PropagateRequestIdLayer::x_request_id(),
    )
}

/// Any origin, method and header, like a browser-facing dev backend expects
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Per-IP limiter allowing `per_minute` requests in each one-minute window.
/// Returns `None` when limiting is disabled (`0`).
pub fn create_ip_rate_limiter(per_minute: u32) -> Option<IpRateLimiter> {
    let per_minute = NonZeroU32::new(per_minute)?;
    Some(Arc::new(FixedWindowLimiter::new(per_minute, RATE_LIMIT_WINDOW)))
}

/// Resolve the address a request is rate limited under.
fn client_ip(request: &Request, trust_forwarded_for: bool) -> Option<IpAddr> {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok());
        if forwarded.is_some() {
            return forwarded;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

/// Middleware for IP-based rate limiting
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RelayError> {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return Ok(next.run(request).await);
    };

    match client_ip(&request, state.config.security.trust_forwarded_for) {
        Some(ip) => match limiter.check(ip) {
            Ok(()) => Ok(next.run(request).await),
            Err(wait_time) => {
                debug!("Rate limit exceeded for {}", ip);
                metrics::record_rejection("rate_limited");
                metrics::record_analyze(429);
                Err(RelayError::TooManyRequests {
                    message: "Too many requests. Please try again later.".to_string(),
                    retry_after: Some(ceil_secs(wait_time)),
                })
            }
        },
        None => {
            warn!("Could not determine client IP for rate limiting");
            Ok(next.run(request).await)
        }
    }
}

/// Middleware requiring the shared secret when one is configured
pub async fn app_token_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RelayError> {
    let Some(expected) = state.config.security.required_token() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(APP_TOKEN_HEADER)
        .map(|v| v.as_bytes())
        .unwrap_or_default();

    if bool::from(provided.ct_eq(expected.as_bytes())) {
        Ok(next.run(request).await)
    } else {
        debug!("Rejected request with missing or wrong {}", APP_TOKEN_HEADER);
        metrics::record_rejection("unauthorized");
        metrics::record_analyze(401);
        Err(RelayError::Unauthorized)
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    secs.max(1)
}

/// Give body-limit rejections the same `{ "error" }` shape as every other
/// failure. `RequestBodyLimitLayer` answers oversized requests with plain text.
pub async fn json_payload_too_large<B>(response: Response<B>) -> Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        metrics::record_rejection("payload_too_large");
        return RelayError::PayloadTooLarge.into_response();
    }
    response.into_response()
}
