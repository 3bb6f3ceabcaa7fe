//! Work items and the bounded fan-out that fetches them.

use std::collections::BTreeSet;

use futures::stream::{self, StreamExt};
use hdbnear_core::{CandidateRecord, Category, DatasetIds, FailureKind, TownSet};
use hdbnear_datagov::{to_candidates, DataGovClient, Filters, Pagination};
use serde::Serialize;

/// One independent dataset fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkItem {
    /// Resale transactions in `town` during `month` (`YYYY-MM`).
    Resale { town: String, month: String },
    Schools { town: String },
    /// The whole-island eldercare services GeoJSON.
    Eldercare,
    /// The whole-island MRT station exits GeoJSON.
    TransitExits,
}

impl WorkItem {
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            WorkItem::Resale { .. } => Category::ResaleFlat,
            WorkItem::Schools { .. } => Category::School,
            WorkItem::Eldercare => Category::Eldercare,
            WorkItem::TransitExits => Category::TransitExit,
        }
    }

    /// The data.gov.sg resource or dataset id this item reads.
    #[must_use]
    pub fn dataset_id<'a>(&self, datasets: &'a DatasetIds) -> &'a str {
        match self {
            WorkItem::Resale { .. } => &datasets.resale,
            WorkItem::Schools { .. } => &datasets.schools,
            WorkItem::Eldercare => &datasets.eldercare,
            WorkItem::TransitExits => &datasets.transit_exits,
        }
    }
}

impl std::fmt::Display for WorkItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkItem::Resale { town, month } => write!(f, "resale({town}, {month})"),
            WorkItem::Schools { town } => write!(f, "schools({town})"),
            WorkItem::Eldercare => f.write_str("eldercare"),
            WorkItem::TransitExits => f.write_str("transit_exits"),
        }
    }
}

/// What a work item contributed. A failed item contributes no candidates.
#[derive(Debug, Clone)]
pub struct WorkOutcome {
    pub item: WorkItem,
    pub candidates: Vec<CandidateRecord>,
    pub failure: Option<FailureKind>,
}

/// Expands the selected categories into work items: one per
/// `(town, month)` for resale, one per town for schools, and one for each
/// amenity dataset. Town-scoped categories produce nothing for an empty
/// town set.
#[must_use]
pub fn plan_work(
    towns: &TownSet,
    months: &[String],
    categories: &BTreeSet<Category>,
) -> Vec<WorkItem> {
    let mut items = Vec::new();
    for category in categories {
        match category {
            Category::ResaleFlat => {
                for town in towns.iter() {
                    for month in months {
                        items.push(WorkItem::Resale {
                            town: town.to_string(),
                            month: month.clone(),
                        });
                    }
                }
            }
            Category::School => {
                items.extend(towns.iter().map(|town| WorkItem::Schools {
                    town: town.to_string(),
                }));
            }
            Category::Eldercare => items.push(WorkItem::Eldercare),
            Category::TransitExit => items.push(WorkItem::TransitExits),
        }
    }
    items
}

/// Everything a work item needs besides the item itself.
#[derive(Debug, Clone, Copy)]
pub struct FetchContext<'a> {
    pub client: &'a DataGovClient,
    pub datasets: &'a DatasetIds,
    pub page_limit: u32,
    pub flat_types: &'a [String],
    pub flat_models: &'a [String],
}

impl FetchContext<'_> {
    fn resale_filters(&self, town: &str, month: &str) -> Filters {
        Filters::new()
            .exact("town", town)
            .exact("month", month)
            .any_of("flat_type", self.flat_types.iter().cloned())
            .any_of("flat_model", self.flat_models.iter().cloned())
    }
}

/// Runs a single work item, classifying any failure instead of returning it.
pub async fn run_work_item(ctx: &FetchContext<'_>, item: WorkItem) -> WorkOutcome {
    let page = Pagination::first(ctx.page_limit);
    let dataset_id = item.dataset_id(ctx.datasets);
    let result = match &item {
        WorkItem::Resale { town, month } => {
            ctx.client
                .try_fetch(dataset_id, &ctx.resale_filters(town, month), page)
                .await
        }
        WorkItem::Schools { town } => {
            let filters = Filters::new().exact("dgp_code", town.as_str());
            ctx.client.try_fetch(dataset_id, &filters, page).await
        }
        WorkItem::Eldercare | WorkItem::TransitExits => {
            ctx.client.try_download_features(dataset_id).await
        }
    };

    match result {
        Ok(raw) => {
            let candidates = to_candidates(item.category(), raw);
            tracing::debug!(%item, count = candidates.len(), "work item complete");
            WorkOutcome {
                item,
                candidates,
                failure: None,
            }
        }
        Err(e) => {
            let kind = e.kind();
            tracing::warn!(%item, ?kind, error = %e, "work item failed");
            WorkOutcome {
                item,
                candidates: Vec::new(),
                failure: Some(kind),
            }
        }
    }
}

/// Runs `items` with at most `max_concurrency` in flight and returns their
/// outcomes in completion order. Waits for every item; one failing item
/// never cancels the rest.
pub async fn fan_out(
    ctx: &FetchContext<'_>,
    items: Vec<WorkItem>,
    max_concurrency: usize,
) -> Vec<WorkOutcome> {
    stream::iter(items)
        .map(|item| run_work_item(ctx, item))
        .buffer_unordered(max_concurrency.max(1))
        .collect()
        .await
}
