//! Integration tests for `OneMapClient` using wiremock HTTP mocks.

use hdbnear_core::{FailureKind, GeoPoint};
use hdbnear_onemap::{AccessToken, OneMapClient, OneMapError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OneMapClient {
    OneMapClient::with_base_url(5, "hdbnear-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn token() -> AccessToken {
    AccessToken::new("tok")
}

// ---------------------------------------------------------------------------
// Token exchange
// ---------------------------------------------------------------------------

#[tokio::test]
async fn acquire_token_posts_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/post/getToken"))
        .and(body_json(serde_json::json!({
            "email": "ops@example.com",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh-token",
            "expiry_timestamp": "1759477267"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let token = client
        .acquire_token("ops@example.com", "hunter2")
        .await
        .expect("token exchange should succeed");

    assert_eq!(token.value(), "fresh-token");
    assert_eq!(
        token.expires_at().map(|t| t.timestamp()),
        Some(1_759_477_267)
    );
}

#[tokio::test]
async fn acquire_token_rejected_credentials_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/post/getToken"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .acquire_token("ops@example.com", "wrong")
        .await
        .expect_err("401 should fail");

    assert!(matches!(err, OneMapError::UnexpectedStatus { status: 401, .. }));
    assert_eq!(err.kind(), FailureKind::Unauthorized);
}

#[tokio::test]
async fn acquire_token_without_token_in_body_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/post/getToken"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "account disabled" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .acquire_token("ops@example.com", "hunter2")
        .await
        .expect_err("missing token should fail");

    match err {
        OneMapError::TokenExchange(msg) => assert_eq!(msg, "account disabled"),
        other => panic!("expected TokenExchange, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Forward geocoding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forward_returns_first_match_and_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/common/elastic/search"))
        .and(query_param("searchVal", "560406"))
        .and(query_param("returnGeom", "Y"))
        .and(query_param("getAddrDetails", "Y"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "found": 2,
            "totalNumPages": 1,
            "pageNum": 1,
            "results": [
                {
                    "SEARCHVAL": "406 ANG MO KIO AVENUE 10",
                    "ADDRESS": "406 ANG MO KIO AVENUE 10 SINGAPORE 560406",
                    "POSTAL": "560406",
                    "LATITUDE": "1.36209",
                    "LONGITUDE": "103.85443"
                },
                {
                    "SEARCHVAL": "OTHER",
                    "LATITUDE": "1.40",
                    "LONGITUDE": "103.90"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let found = client
        .try_search_address(&token(), "560406")
        .await
        .expect("lookup should succeed")
        .expect("should have a match");

    assert!((found.point.latitude() - 1.36209).abs() < 1e-9);
    assert!((found.point.longitude() - 103.85443).abs() < 1e-9);
    assert_eq!(found.postal_code.as_deref(), Some("560406"));
    assert_eq!(
        found.address.as_deref(),
        Some("406 ANG MO KIO AVENUE 10 SINGAPORE 560406")
    );
}

#[tokio::test]
async fn forward_with_zero_matches_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/common/elastic/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "found": 0,
            "totalNumPages": 0,
            "pageNum": 1,
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .try_resolve_forward(&token(), "nowhere at all")
        .await
        .expect("zero matches is not an error");
    assert!(result.is_none());
}

#[tokio::test]
async fn forward_server_error_classifies_as_transport() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/common/elastic/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .try_resolve_forward(&token(), "560406")
        .await
        .expect_err("500 should fail");
    assert_eq!(err.kind(), FailureKind::Transport);

    assert!(client.resolve_forward(&token(), "560406").await.is_none());
}

#[tokio::test]
async fn forward_expired_token_classifies_as_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/common/elastic/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .try_resolve_forward(&token(), "560406")
        .await
        .expect_err("401 should fail");
    assert_eq!(err.kind(), FailureKind::Unauthorized);
}

#[tokio::test]
async fn forward_malformed_body_classifies_as_parse() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/common/elastic/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .try_resolve_forward(&token(), "560406")
        .await
        .expect_err("html body should fail");
    assert!(matches!(err, OneMapError::Deserialize { .. }));
    assert_eq!(err.kind(), FailureKind::Parse);
}

#[tokio::test]
async fn forward_unparseable_coordinates_is_parse_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/common/elastic/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "found": 1,
            "results": [{ "LATITUDE": "NIL", "LONGITUDE": "103.8" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .try_resolve_forward(&token(), "560406")
        .await
        .expect_err("NIL latitude should fail");
    assert!(matches!(err, OneMapError::InvalidCoordinates { .. }));
    assert_eq!(err.kind(), FailureKind::Parse);
}

// ---------------------------------------------------------------------------
// Reverse geocoding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reverse_returns_postal_sector() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/revgeocode"))
        .and(query_param("location", "1.36209,103.85443"))
        .and(query_param("buffer", "40"))
        .and(query_param("addressType", "All"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "GeocodeInfo": [
                {
                    "BUILDINGNAME": "NIL",
                    "BLOCK": "406",
                    "ROAD": "ANG MO KIO AVENUE 10",
                    "POSTALCODE": "560406",
                    "LATITUDE": "1.36209",
                    "LONGITUDE": "103.85443"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let point = GeoPoint::new(1.36209, 103.85443).expect("valid point");
    let sector = client.resolve_reverse(&token(), point).await;
    assert_eq!(sector.as_deref(), Some("56"));
}

#[tokio::test]
async fn reverse_with_malformed_postal_code_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/revgeocode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "GeocodeInfo": [{ "BLOCK": "1", "ROAD": "JURONG PIER", "POSTALCODE": "NIL" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let point = GeoPoint::new(1.30, 103.70).expect("valid point");
    let sector = client
        .try_resolve_reverse(&token(), point)
        .await
        .expect("lookup should succeed");
    assert!(sector.is_none());
}

#[tokio::test]
async fn reverse_with_no_buildings_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/public/revgeocode"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "GeocodeInfo": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let point = GeoPoint::new(1.25, 103.95).expect("valid point");
    assert!(client.resolve_reverse(&token(), point).await.is_none());
}
