use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use hdbnear_core::{sectors, FailureKind, GeoPoint};
use hdbnear_onemap::{AccessToken, AddressMatch, OneMapError, ReverseResult};
use hdbnear_search::CenterStatus;
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    pub q: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Either direction of a single geocoder lookup.
#[derive(Debug, Serialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub(super) enum GeocodeData {
    Forward(AddressMatch),
    Reverse {
        point: GeoPoint,
        #[serde(flatten)]
        result: ReverseResult,
        town: Option<&'static str>,
    },
}

#[derive(Debug, Serialize)]
pub(super) struct SectorData {
    pub postal_code: String,
    pub sector: String,
    pub town: &'static str,
}

fn token_error(request_id: String, status: CenterStatus) -> ApiError {
    match status {
        CenterStatus::TokenUnavailable => ApiError::new(
            request_id,
            "geocoder_unavailable",
            "no geocoder credentials are configured",
        ),
        CenterStatus::Unauthorized => ApiError::new(
            request_id,
            "upstream_unauthorized",
            "geocoder rejected the configured credentials",
        ),
        _ => ApiError::new(request_id, "upstream_error", "geocoder token exchange failed"),
    }
}

fn lookup_error(request_id: String, error: &OneMapError) -> ApiError {
    tracing::warn!(kind = ?error.kind(), error = %error, "geocode lookup failed");
    match error.kind() {
        FailureKind::Unauthorized => ApiError::new(
            request_id,
            "upstream_unauthorized",
            "geocoder rejected the access token",
        ),
        FailureKind::Unresolved => ApiError::new(request_id, "not_found", error.to_string()),
        FailureKind::Transport | FailureKind::Parse => {
            ApiError::new(request_id, "upstream_error", "geocoder request failed")
        }
    }
}

async fn access_token(state: &AppState, request_id: &str) -> Result<AccessToken, ApiError> {
    state
        .engine
        .obtain_token()
        .await
        .map_err(|status| token_error(request_id.to_string(), status))
}

pub(super) async fn forward_geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<ApiResponse<GeocodeData>>, ApiError> {
    let onemap = state.engine.onemap();

    let data = match (params.q.as_deref().map(str::trim), params.lat, params.lon) {
        (Some(q), None, None) if !q.is_empty() => {
            let token = access_token(&state, &req_id.0).await?;
            let found = onemap
                .try_search_address(&token, q)
                .await
                .map_err(|e| lookup_error(req_id.0.clone(), &e))?;
            let Some(found) = found else {
                return Err(ApiError::new(
                    req_id.0,
                    "not_found",
                    format!("no address matches \"{q}\""),
                ));
            };
            GeocodeData::Forward(found)
        }
        (None, Some(lat), Some(lon)) => {
            let point = GeoPoint::parse(&lat, &lon).map_err(|e| {
                ApiError::new(req_id.0.clone(), "validation_error", e.to_string())
            })?;
            let token = access_token(&state, &req_id.0).await?;
            let found = onemap
                .try_reverse_lookup(&token, point)
                .await
                .map_err(|e| lookup_error(req_id.0.clone(), &e))?;
            let Some(result) = found else {
                return Err(ApiError::new(
                    req_id.0,
                    "not_found",
                    format!("no building found near {point}"),
                ));
            };
            let town = result.postal_sector().and_then(sectors::town_for_sector);
            GeocodeData::Reverse {
                point,
                result,
                town,
            }
        }
        _ => {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "provide either q, or both lat and lon",
            ))
        }
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn sector_town(
    Extension(req_id): Extension<RequestId>,
    Path(postal_code): Path<String>,
) -> Result<Json<ApiResponse<SectorData>>, ApiError> {
    if !sectors::is_postal_code(&postal_code) {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "postal code must be six digits",
        ));
    }
    let sector = sectors::sector_of(&postal_code)
        .map(str::to_string)
        .unwrap_or_default();
    let Some(town) = sectors::town_for_sector(&sector) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no town is mapped to sector {sector}"),
        ));
    };

    Ok(Json(ApiResponse {
        data: SectorData {
            postal_code,
            sector,
            town,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
