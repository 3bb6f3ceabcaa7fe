//! The search orchestrator.
//!
//! One [`SearchEngine::search`] call walks the request through
//! [`SearchStage`]s: resolve the center, derive the town set, fan out
//! dataset fetches and geocodes, then filter by distance. Lookup failures
//! along the way shrink the result set and are counted in
//! [`SearchDiagnostics`]; only an invalid request is an error.

use chrono::Utc;
use hdbnear_core::resale::recent_months;
use hdbnear_core::{
    sort_by_distance, within_radius, AppConfig, CandidateDetails, CandidateRecord, DatasetIds,
    GeoPoint, OneMapCredentials, ResaleFlat, TownSet, FALLBACK_CENTER,
};
use hdbnear_datagov::DataGovClient;
use hdbnear_onemap::{AccessToken, OneMapClient};
use serde::Serialize;

use crate::diagnostics::{CenterStatus, SearchDiagnostics};
use crate::error::SearchError;
use crate::geocode::geocode_candidates;
use crate::insight::{annotate, SearchHit};
use crate::request::{SearchRequest, SortOrder};
use crate::stage::{SearchStage, StageTracker};
use crate::towns::derive_town_set;
use crate::work::{fan_out, plan_work, FetchContext};

/// Engine-level settings, usually taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub credentials: Option<OneMapCredentials>,
    pub static_token: Option<AccessToken>,
    pub datasets: DatasetIds,
    pub radius_km: f64,
    pub max_concurrency: usize,
    pub resale_months: usize,
    pub page_limit: u32,
}

impl From<&AppConfig> for SearchSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            credentials: config.onemap_credentials.clone(),
            static_token: config.onemap_token.clone().map(AccessToken::new),
            datasets: config.datasets.clone(),
            radius_km: config.search_radius_km,
            max_concurrency: config.max_concurrency,
            resale_months: config.resale_months,
            page_limit: config.page_limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    /// The resolved center, if any.
    pub center: Option<GeoPoint>,
    /// Where a map should be centered: the resolved center or the fallback.
    pub display_center: GeoPoint,
    pub radius_km: f64,
    pub towns: TownSet,
    pub results: Vec<SearchHit>,
    pub diagnostics: SearchDiagnostics,
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    onemap: OneMapClient,
    datagov: DataGovClient,
    settings: SearchSettings,
}

impl SearchEngine {
    #[must_use]
    pub fn new(onemap: OneMapClient, datagov: DataGovClient, settings: SearchSettings) -> Self {
        Self {
            onemap,
            datagov,
            settings,
        }
    }

    /// Builds both HTTP clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if either client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, SearchError> {
        let onemap = OneMapClient::with_base_url(
            config.geocode_timeout_secs,
            &config.user_agent,
            &config.onemap_base_url,
        )
        .map_err(SearchError::OneMapClient)?;
        let datagov = DataGovClient::with_base_url(
            config.dataset_timeout_secs,
            &config.user_agent,
            &config.datagov_base_url,
            &config.datagov_download_base_url,
        )
        .map_err(SearchError::DataGovClient)?;
        Ok(Self::new(onemap, datagov, SearchSettings::from(config)))
    }

    #[must_use]
    pub fn onemap(&self) -> &OneMapClient {
        &self.onemap
    }

    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Obtains a token for this search: a fresh exchange when credentials
    /// are configured, otherwise the static token.
    ///
    /// # Errors
    ///
    /// Returns the [`CenterStatus`] to report when no token is available.
    pub async fn obtain_token(&self) -> Result<AccessToken, CenterStatus> {
        if let Some(creds) = &self.settings.credentials {
            return self
                .onemap
                .acquire_token(&creds.email, &creds.password)
                .await
                .map_err(|e| {
                    tracing::warn!(kind = ?e.kind(), error = %e, "OneMap token exchange failed");
                    CenterStatus::from_failure(e.kind())
                });
        }
        if let Some(token) = &self.settings.static_token {
            if token.is_expired_at(Utc::now()) {
                tracing::warn!("configured OneMap token has expired");
                return Err(CenterStatus::Unauthorized);
            }
            return Ok(token.clone());
        }
        tracing::warn!("no OneMap credentials or token configured");
        Err(CenterStatus::TokenUnavailable)
    }

    /// Runs one search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] only for an invalid request. Every external
    /// failure degrades the result and is reported in the diagnostics.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchReport, SearchError> {
        let radius_km = request.validate(self.settings.radius_km)?;
        let query = request.query.trim();
        let categories = request.effective_categories();
        let max_concurrency = self.settings.max_concurrency.max(1);

        let mut stages = StageTracker::new();
        stages.advance(SearchStage::ResolvingCenter);

        let token = match self.obtain_token().await {
            Ok(token) => token,
            Err(status) => {
                let diagnostics = SearchDiagnostics::new(status);
                return Ok(unresolved_report(query, radius_km, diagnostics, stages));
            }
        };

        let center = match self.onemap.try_resolve_forward(&token, query).await {
            Ok(Some(point)) => point,
            Ok(None) => {
                tracing::info!(query, "search center not found");
                let diagnostics = SearchDiagnostics::new(CenterStatus::NotFound);
                return Ok(unresolved_report(query, radius_km, diagnostics, stages));
            }
            Err(e) => {
                tracing::warn!(query, kind = ?e.kind(), error = %e, "search center lookup failed");
                let mut diagnostics = SearchDiagnostics::new(CenterStatus::from_failure(e.kind()));
                diagnostics.failures.record(e.kind());
                return Ok(unresolved_report(query, radius_km, diagnostics, stages));
            }
        };
        let mut diagnostics = SearchDiagnostics::new(CenterStatus::Resolved);

        stages.advance(SearchStage::ComputingTownSet);
        let towns = if categories.iter().any(|c| c.is_town_scoped()) {
            let outcome = derive_town_set(
                &self.onemap,
                &token,
                center,
                query,
                radius_km,
                max_concurrency,
            )
            .await;
            diagnostics.town_probes = outcome.probes;
            diagnostics.town_probe_misses = outcome.misses;
            for kind in outcome.failures {
                diagnostics.failures.record(kind);
            }
            outcome.towns
        } else {
            TownSet::new()
        };

        stages.advance(SearchStage::FetchingConcurrent);
        let months = request.months.clone().unwrap_or_else(|| {
            recent_months(Utc::now().date_naive(), self.settings.resale_months)
        });
        let items = plan_work(&towns, &months, &categories);
        diagnostics.work_items = items.len();

        let ctx = FetchContext {
            client: &self.datagov,
            datasets: &self.settings.datasets,
            page_limit: self.settings.page_limit,
            flat_types: &request.flat_types,
            flat_models: &request.flat_models,
        };
        let outcomes = fan_out(&ctx, items, max_concurrency).await;

        let mut candidates: Vec<CandidateRecord> = Vec::new();
        for outcome in outcomes {
            if let Some(kind) = outcome.failure {
                diagnostics.failed_work_items += 1;
                diagnostics.failures.record(kind);
            }
            candidates.extend(outcome.candidates);
        }
        let transactions = resale_transactions(&candidates);

        let geocoded = geocode_candidates(&self.onemap, &token, candidates, max_concurrency).await;
        diagnostics.geocode_attempts = geocoded.attempts;
        diagnostics.geocode_misses = geocoded.misses;
        for kind in geocoded.failures {
            diagnostics.failures.record(kind);
        }

        stages.advance(SearchStage::FilteringByDistance);
        let mut results = within_radius(center, geocoded.candidates, radius_km);
        if request.sort == SortOrder::Distance {
            sort_by_distance(center, &mut results);
        }
        let results = annotate(results, &transactions);

        stages.advance(SearchStage::Done);
        diagnostics.stages = stages.into_visited();

        tracing::info!(
            query,
            towns = towns.len(),
            work_items = diagnostics.work_items,
            failed_work_items = diagnostics.failed_work_items,
            results = results.len(),
            "search complete"
        );
        if diagnostics.is_unauthorized() {
            tracing::warn!(query, "search failures were all authorization errors");
        }

        Ok(SearchReport {
            query: query.to_string(),
            center: Some(center),
            display_center: center,
            radius_km,
            towns,
            results,
            diagnostics,
        })
    }
}

fn unresolved_report(
    query: &str,
    radius_km: f64,
    mut diagnostics: SearchDiagnostics,
    mut stages: StageTracker,
) -> SearchReport {
    tracing::debug!(
        stage = %stages.current(),
        center = ?diagnostics.center,
        "center unresolved, skipping to done"
    );
    stages.advance(SearchStage::Done);
    diagnostics.stages = stages.into_visited();
    SearchReport {
        query: query.to_string(),
        center: None,
        display_center: FALLBACK_CENTER,
        radius_km,
        towns: TownSet::new(),
        results: Vec::new(),
        diagnostics,
    }
}

fn resale_transactions(candidates: &[CandidateRecord]) -> Vec<ResaleFlat> {
    candidates
        .iter()
        .filter_map(|c| match &c.details {
            CandidateDetails::ResaleFlat(flat) => Some(flat.clone()),
            _ => None,
        })
        .collect()
}
