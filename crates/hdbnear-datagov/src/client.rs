//! HTTP client for data.gov.sg.
//!
//! Two access paths are supported: the CKAN-style `datastore_search`
//! endpoint for tabular datasets, and the poll-then-download flow for
//! GeoJSON datasets that are only published as files.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::DataGovError;
use crate::filters::{Filters, Pagination};
use crate::geojson::features_to_records;
use crate::types::{DatastoreResponse, FeatureCollection, PollDownloadResponse, RawRecord};

const DEFAULT_BASE_URL: &str = "https://data.gov.sg/";
const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://api-open.data.gov.sg/";

/// Client for the data.gov.sg APIs.
#[derive(Debug, Clone)]
pub struct DataGovClient {
    client: Client,
    base_url: Url,
    download_base_url: Url,
}

impl DataGovClient {
    /// Creates a client pointed at the production data.gov.sg hosts.
    ///
    /// # Errors
    ///
    /// Returns [`DataGovError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, DataGovError> {
        Self::with_base_url(
            timeout_secs,
            user_agent,
            DEFAULT_BASE_URL,
            DEFAULT_DOWNLOAD_BASE_URL,
        )
    }

    /// Creates a client with custom hosts (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DataGovError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`DataGovError::InvalidBaseUrl`] if either URL does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
        download_base_url: &str,
    ) -> Result<Self, DataGovError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base(base_url)?,
            download_base_url: parse_base(download_base_url)?,
        })
    }

    /// Fetches one page of `resource_id` matching `filters`.
    ///
    /// # Errors
    ///
    /// - [`DataGovError::Http`] / [`DataGovError::UnexpectedStatus`] on
    ///   transport failure or a non-2xx status.
    /// - [`DataGovError::Deserialize`] if the body is not the expected shape.
    /// - [`DataGovError::Unsuccessful`] if the payload reports `success: false`.
    pub async fn try_fetch(
        &self,
        resource_id: &str,
        filters: &Filters,
        page: Pagination,
    ) -> Result<Vec<RawRecord>, DataGovError> {
        let limit = page.limit.to_string();
        let offset = page.offset.to_string();
        let filter_json = filters.to_query();

        let mut params = vec![
            ("resource_id", resource_id),
            ("limit", limit.as_str()),
            ("offset", offset.as_str()),
        ];
        if let Some(json) = filter_json.as_deref() {
            params.push(("filters", json));
        }

        let url = join_url(&self.base_url, "api/action/datastore_search", &params);
        let body = self.get_text(&url).await?;
        let parsed: DatastoreResponse =
            serde_json::from_str(&body).map_err(|e| DataGovError::Deserialize {
                context: format!("datastore_search(resource_id={resource_id})"),
                source: e,
            })?;

        if !parsed.success {
            return Err(DataGovError::Unsuccessful {
                context: format!("datastore_search(resource_id={resource_id})"),
                message: parsed
                    .error
                    .map_or_else(|| "success=false".to_string(), |e| e.to_string()),
            });
        }

        let records = parsed.result.map(|r| r.records).unwrap_or_default();
        tracing::debug!(
            resource_id,
            filters = filter_json.as_deref().unwrap_or(""),
            count = records.len(),
            "datastore page fetched"
        );
        Ok(records)
    }

    /// Best-effort [`try_fetch`](Self::try_fetch): any failure is logged and
    /// yields an empty page.
    pub async fn fetch(
        &self,
        resource_id: &str,
        filters: &Filters,
        page: Pagination,
    ) -> Vec<RawRecord> {
        match self.try_fetch(resource_id, filters, page).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(resource_id, kind = ?e.kind(), error = %e, "datastore fetch failed");
                Vec::new()
            }
        }
    }

    /// Resolves the transient download URL for `dataset_id`, downloads the
    /// GeoJSON it points at, and flattens each feature.
    ///
    /// # Errors
    ///
    /// - [`DataGovError::Unsuccessful`] if the poll answers a non-zero
    ///   `code` or no URL.
    /// - Transport and deserialization errors from either request.
    pub async fn try_download_features(
        &self,
        dataset_id: &str,
    ) -> Result<Vec<RawRecord>, DataGovError> {
        let poll_url = join_url(
            &self.download_base_url,
            &format!("v1/public/api/datasets/{dataset_id}/poll-download"),
            &[],
        );
        let body = self.get_text(&poll_url).await?;
        let poll: PollDownloadResponse =
            serde_json::from_str(&body).map_err(|e| DataGovError::Deserialize {
                context: format!("poll-download({dataset_id})"),
                source: e,
            })?;

        if poll.code != 0 {
            return Err(DataGovError::Unsuccessful {
                context: format!("poll-download({dataset_id})"),
                message: poll
                    .error_msg
                    .unwrap_or_else(|| format!("code {}", poll.code)),
            });
        }
        let Some(download) = poll.data.and_then(|d| d.url).filter(|u| !u.is_empty()) else {
            return Err(DataGovError::Unsuccessful {
                context: format!("poll-download({dataset_id})"),
                message: "response did not include a download url".to_string(),
            });
        };

        let download_url = Url::parse(&download).map_err(|e| DataGovError::InvalidBaseUrl {
            base_url: download.clone(),
            reason: e.to_string(),
        })?;
        let body = self.get_text(&download_url).await?;
        let collection: FeatureCollection =
            serde_json::from_str(&body).map_err(|e| DataGovError::Deserialize {
                context: format!("geojson({dataset_id})"),
                source: e,
            })?;

        let records = features_to_records(collection);
        tracing::debug!(dataset_id, count = records.len(), "geojson dataset downloaded");
        Ok(records)
    }

    /// Best-effort [`try_download_features`](Self::try_download_features).
    pub async fn download_features(&self, dataset_id: &str) -> Vec<RawRecord> {
        match self.try_download_features(dataset_id).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(dataset_id, kind = ?e.kind(), error = %e, "dataset download failed");
                Vec::new()
            }
        }
    }

    async fn get_text(&self, url: &Url) -> Result<String, DataGovError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataGovError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

fn parse_base(base_url: &str) -> Result<Url, DataGovError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| DataGovError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason: e.to_string(),
    })
}

fn join_url(base: &Url, path: &str, params: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    url.set_path(&format!("{}{}", base.path(), path.trim_start_matches('/')));
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k, v);
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_encodes_filter_json() {
        let base = parse_base("https://data.gov.sg").unwrap();
        let url = join_url(
            &base,
            "api/action/datastore_search",
            &[("resource_id", "d_abc"), ("filters", r#"{"town":"ANG MO KIO"}"#)],
        );
        assert_eq!(url.path(), "/api/action/datastore_search");
        let filters = url
            .query_pairs()
            .find(|(k, _)| k == "filters")
            .map(|(_, v)| v.into_owned());
        assert_eq!(filters.as_deref(), Some(r#"{"town":"ANG MO KIO"}"#));
    }

    #[test]
    fn join_url_keeps_base_prefix() {
        let base = parse_base("http://127.0.0.1:9000/mock/").unwrap();
        let url = join_url(&base, "v1/public/api/datasets/d_1/poll-download", &[]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/mock/v1/public/api/datasets/d_1/poll-download"
        );
    }

    #[test]
    fn parse_base_rejects_relative_urls() {
        assert!(matches!(
            parse_base("data.gov.sg"),
            Err(DataGovError::InvalidBaseUrl { .. })
        ));
    }
}
