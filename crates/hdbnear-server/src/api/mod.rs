mod geocode;
mod search;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use hdbnear_search::SearchEngine;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    geocoder: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_unauthorized" | "upstream_error" => StatusCode::BAD_GATEWAY,
            "geocoder_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Splits a comma-separated query parameter, dropping blank entries.
pub(super) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn lookup_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/search", get(search::run_search))
        .route("/api/v1/geocode", get(geocode::forward_geocode))
        .route("/api/v1/sectors/{postal_code}", get(geocode::sector_town))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(lookup_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let settings = state.engine.settings();
    let configured = settings.credentials.is_some() || settings.static_token.is_some();
    let data = if configured {
        HealthData {
            status: "ok",
            geocoder: "configured",
        }
    } else {
        HealthData {
            status: "degraded",
            geocoder: "unconfigured",
        }
    };

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(60, Duration::from_secs(60))
}


#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::test_support::{offline_state, settings, state_with, with_static_token};
    use super::*;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&body).expect("json parse"))
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("validation_error", StatusCode::BAD_REQUEST),
            ("not_found", StatusCode::NOT_FOUND),
            ("upstream_unauthorized", StatusCode::BAD_GATEWAY),
            ("geocoder_unavailable", StatusCode::SERVICE_UNAVAILABLE),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "x").into_response();
            assert_eq!(response.status(), status, "code {code}");
        }
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(
            split_list(Some("4 ROOM, 5 ROOM,,")),
            vec!["4 ROOM".to_string(), "5 ROOM".to_string()]
        );
        assert!(split_list(None).is_empty());
    }

    #[tokio::test]
    async fn health_reports_unconfigured_geocoder() {
        let app = build_app(offline_state(), default_rate_limit_state());
        let (status, json) = get_json(app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "degraded");
        assert_eq!(json["data"]["geocoder"], "unconfigured");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn health_reports_configured_geocoder() {
        let state = state_with(
            "http://127.0.0.1:9",
            "http://127.0.0.1:9",
            with_static_token(settings()),
        );
        let app = build_app(state, default_rate_limit_state());
        let (status, json) = get_json(app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn request_id_header_is_reflected_in_meta() {
        let app = build_app(offline_state(), default_rate_limit_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-42")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["meta"]["request_id"], "req-42");
    }

    #[tokio::test]
    async fn lookup_routes_are_rate_limited() {
        let app = build_app(
            offline_state(),
            RateLimitState::new(1, Duration::from_secs(60)),
        );
        let (first, _) = get_json(app.clone(), "/api/v1/sectors/560406").await;
        assert_eq!(first, StatusCode::OK);
        let (second, json) = get_json(app.clone(), "/api/v1/sectors/560406").await;
        assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"]["code"], "rate_limited");

        let (health, _) = get_json(app, "/api/v1/health").await;
        assert_eq!(health, StatusCode::OK);
    }
}
