use super::*;

fn test_client(base_url: &str) -> OneMapClient {
    OneMapClient::with_base_url(10, "hdbnear-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_joins_path_and_query() {
    let client = test_client("https://www.onemap.gov.sg");
    let url = client.build_url(
        "api/common/elastic/search",
        &[("searchVal", "560406"), ("returnGeom", "Y")],
    );
    assert_eq!(
        url.as_str(),
        "https://www.onemap.gov.sg/api/common/elastic/search?searchVal=560406&returnGeom=Y"
    );
}

#[test]
fn build_url_strips_trailing_slash() {
    let client = test_client("https://www.onemap.gov.sg/");
    let url = client.build_url("/api/auth/post/getToken", &[]);
    assert_eq!(url.as_str(), "https://www.onemap.gov.sg/api/auth/post/getToken");
}

#[test]
fn build_url_keeps_base_path_prefix() {
    let client = test_client("http://127.0.0.1:9000/onemap");
    let url = client.build_url("api/public/revgeocode", &[("buffer", "40")]);
    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:9000/onemap/api/public/revgeocode?buffer=40"
    );
}

#[test]
fn build_url_encodes_address_queries() {
    let client = test_client("https://www.onemap.gov.sg");
    let url = client.build_url(
        "api/common/elastic/search",
        &[("searchVal", "406 ANG MO KIO AVE 10 Singapore")],
    );
    assert!(
        url.as_str()
            .contains("searchVal=406+ANG+MO+KIO+AVE+10+Singapore"),
        "query should be form-encoded: {url}"
    );
}

#[test]
fn with_base_url_rejects_garbage() {
    let result = OneMapClient::with_base_url(10, "ua", "not a url");
    assert!(matches!(result, Err(OneMapError::InvalidBaseUrl { .. })));
}
