use axum::{
    extract::{Query, State},
    Extension, Json,
};
use hdbnear_core::{resale::is_month, Category};
use hdbnear_search::{SearchReport, SearchRequest, SortOrder};
use serde::Deserialize;

use super::{split_list, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

/// Query string for `GET /api/v1/search`. List parameters are
/// comma-separated.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
    pub radius_km: Option<String>,
    pub categories: Option<String>,
    pub flat_types: Option<String>,
    pub flat_models: Option<String>,
    pub months: Option<String>,
    pub sort: Option<String>,
}

impl SearchQuery {
    fn into_request(self) -> Result<SearchRequest, String> {
        let query = self.q.unwrap_or_default();
        if query.trim().is_empty() {
            return Err("q is required".to_string());
        }
        let mut request = SearchRequest::new(query);

        if let Some(raw) = self.radius_km.as_deref().map(str::trim) {
            if !raw.is_empty() {
                let radius = raw
                    .parse::<f64>()
                    .map_err(|_| format!("radius_km must be a number (got \"{raw}\")"))?;
                request = request.with_radius_km(radius);
            }
        }

        let categories = split_list(self.categories.as_deref())
            .iter()
            .map(|c| c.parse::<Category>())
            .collect::<Result<Vec<_>, _>>()?;
        request = request
            .with_categories(categories)
            .with_flat_types(split_list(self.flat_types.as_deref()))
            .with_flat_models(split_list(self.flat_models.as_deref()));

        let months = split_list(self.months.as_deref());
        if !months.is_empty() {
            if let Some(bad) = months.iter().find(|m| !is_month(m)) {
                return Err(format!("months must be YYYY-MM (got \"{bad}\")"));
            }
            request = request.with_months(months);
        }

        if let Some(sort) = self.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            request = request.sorted_by(sort.parse::<SortOrder>()?);
        }

        Ok(request)
    }
}

pub(super) async fn run_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchReport>>, ApiError> {
    let request = params
        .into_request()
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let report = state.engine.search(&request).await.map_err(|e| {
        tracing::debug!(error = %e, "search request rejected");
        ApiError::new(req_id.0.clone(), "validation_error", e.to_string())
    })?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}
