use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// An incoming `x-request-id` header is reused; otherwise a `UUIDv4` is
/// generated. The ID is stored as a [`RequestId`] extension and echoed on
/// the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }
    res
}

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    started_at: Instant,
    count: usize,
}

/// Per-client fixed-window limit on lookup routes.
///
/// Clients are keyed by the peer IP of the connection. Client-supplied
/// headers such as `x-forwarded-for` are ignored. Requests served without
/// [`ConnectInfo`] share a single bucket.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<Option<IpAddr>, ClientWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts one request for `client`, returning the wait until its window
    /// resets when the budget is already spent.
    async fn check(&self, client: Option<IpAddr>, now: Instant) -> Result<(), Duration> {
        let mut clients = self.clients.lock().await;
        clients.retain(|_, w| now.duration_since(w.started_at) < self.window);

        let window = clients.entry(client).or_insert(ClientWindow {
            started_at: now,
            count: 0,
        });
        if window.count >= self.max_requests {
            let elapsed = now.duration_since(window.started_at);
            return Err(self.window.saturating_sub(elapsed));
        }
        window.count += 1;
        Ok(())
    }
}

fn client_key(req: &Request) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

/// Rejects requests over the client's budget with `429 rate_limited`.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    let Err(retry_after) = rate_limit.check(client, Instant::now()).await else {
        return next.run(req).await;
    };

    tracing::warn!(?client, retry_after_secs = retry_after.as_secs(), "rate limit exceeded");
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let mut res = ApiError::new(request_id, "rate_limited", "too many lookups; slow down")
        .into_response();
    // Round up so clients never retry a moment too early.
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    res.headers_mut().insert(RETRY_AFTER, HeaderValue::from(secs));
    res
}
