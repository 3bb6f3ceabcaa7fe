//! `search` command: runs one enrichment search and prints the results.

use hdbnear_core::{AppConfig, Category};
use hdbnear_search::{CenterStatus, SearchEngine, SearchHit, SearchReport, SearchRequest, SortOrder};

#[derive(Debug)]
pub(crate) struct SearchArgs {
    pub query: String,
    pub radius_km: Option<f64>,
    pub categories: Vec<Category>,
    pub flat_types: Vec<String>,
    pub flat_models: Vec<String>,
    pub months: Vec<String>,
    pub sort: SortOrder,
    pub json: bool,
}

impl SearchArgs {
    pub(crate) fn to_request(&self) -> SearchRequest {
        let mut request = SearchRequest::new(self.query.clone())
            .with_categories(self.categories.iter().copied())
            .with_flat_types(self.flat_types.iter().cloned())
            .with_flat_models(self.flat_models.iter().cloned())
            .sorted_by(self.sort);
        if let Some(radius) = self.radius_km {
            request = request.with_radius_km(radius);
        }
        if !self.months.is_empty() {
            request = request.with_months(self.months.iter().cloned());
        }
        request
    }
}

/// Run a search and print a table (or the JSON report).
///
/// # Errors
///
/// Returns an error if the clients cannot be built, the request is invalid,
/// or the JSON report cannot be serialized.
pub(crate) async fn run_search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let engine = SearchEngine::from_config(config)?;
    let report = engine.search(&args.to_request()).await?;

    if report.diagnostics.is_unauthorized() {
        eprintln!(
            "warning: OneMap rejected the configured credentials; check ONEMAP_EMAIL/ONEMAP_PASSWORD or ONEMAP_TOKEN"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &SearchReport) {
    match report.center {
        Some(center) => println!(
            "{} -> {center} (radius {} km, towns: {})",
            report.query,
            report.radius_km,
            if report.towns.is_empty() {
                "-".to_string()
            } else {
                report.towns.iter().collect::<Vec<_>>().join(", ")
            }
        ),
        None => {
            println!("{}: {}", report.query, center_message(report.diagnostics.center));
            return;
        }
    }

    if report.results.is_empty() {
        println!("no results within {} km", report.radius_km);
    } else {
        println!();
        println!("{:<14}{:>9}  LABEL", "CATEGORY", "KM");
        for hit in &report.results {
            println!("{}", format_hit(hit));
        }
    }

    let d = &report.diagnostics;
    println!();
    println!(
        "{} results; {}/{} fetches failed; {} of {} geocodes missed",
        report.results.len(),
        d.failed_work_items,
        d.work_items,
        d.geocode_misses,
        d.geocode_attempts
    );
}

pub(crate) fn center_message(status: CenterStatus) -> &'static str {
    match status {
        CenterStatus::Resolved => "resolved",
        CenterStatus::NotFound => "no matching address",
        CenterStatus::Unauthorized => "geocoder rejected the credentials",
        CenterStatus::Unavailable => "geocoder unavailable",
        CenterStatus::TokenUnavailable => "no geocoder credentials configured",
    }
}

pub(crate) fn format_hit(hit: &SearchHit) -> String {
    let mut line = format!(
        "{:<14}{:>9.2}  {}",
        hit.result.category.as_str(),
        hit.result.distance_km,
        hit.result.record.label
    );
    if let Some(resale) = &hit.resale {
        if let Some(psf) = resale.metrics.price_per_sqft {
            line.push_str(&format!("  (${psf} psf)"));
        }
    }
    line
}
