//! `geocode` and `sector` commands.

use anyhow::Context;
use hdbnear_core::{sectors, AppConfig, GeoPoint};
use hdbnear_search::{CenterStatus, SearchEngine};

/// Parse `"lat,lon"` into a [`GeoPoint`].
pub(crate) fn parse_lat_lon(value: &str) -> anyhow::Result<GeoPoint> {
    let (lat, lon) = value
        .split_once(',')
        .with_context(|| format!("expected \"lat,lon\", got \"{value}\""))?;
    Ok(GeoPoint::parse(lat.trim(), lon.trim())?)
}

/// Look up a single address or coordinate pair.
///
/// # Errors
///
/// Returns an error if no token can be obtained or the lookup fails.
pub(crate) async fn run_geocode(
    config: &AppConfig,
    query: Option<&str>,
    reverse: Option<&str>,
) -> anyhow::Result<()> {
    let engine = SearchEngine::from_config(config)?;
    let token = engine.obtain_token().await.map_err(|status| match status {
        CenterStatus::TokenUnavailable => {
            anyhow::anyhow!("set ONEMAP_EMAIL/ONEMAP_PASSWORD or ONEMAP_TOKEN to geocode")
        }
        CenterStatus::Unauthorized => anyhow::anyhow!("OneMap rejected the configured credentials"),
        other => anyhow::anyhow!("could not obtain a OneMap token ({other:?})"),
    })?;
    let onemap = engine.onemap();

    if let Some(coords) = reverse {
        let point = parse_lat_lon(coords)?;
        match onemap.try_reverse_lookup(&token, point).await? {
            Some(found) => {
                let town = found
                    .postal_sector()
                    .and_then(sectors::town_for_sector)
                    .unwrap_or("-");
                println!("{point} -> {} [{town}]", found.address());
            }
            None => println!("{point}: no building found nearby"),
        }
        return Ok(());
    }

    let query = query.context("a query or --reverse is required")?;
    match onemap.try_search_address(&token, query).await? {
        Some(found) => println!(
            "{query} -> {} ({})",
            found.point,
            found.address.as_deref().unwrap_or("-")
        ),
        None => println!("{query}: no matching address"),
    }
    Ok(())
}

/// Print the town for a postal code's sector.
///
/// # Errors
///
/// Returns an error if `postal_code` is not six digits or its sector is not
/// mapped to a town.
pub(crate) fn run_sector(postal_code: &str) -> anyhow::Result<()> {
    println!("{postal_code} -> {}", sector_town(postal_code)?);
    Ok(())
}

pub(crate) fn sector_town(postal_code: &str) -> anyhow::Result<&'static str> {
    anyhow::ensure!(
        sectors::is_postal_code(postal_code),
        "postal code must be six digits, got \"{postal_code}\""
    );
    sectors::town_for(postal_code.trim())
        .with_context(|| format!("no town is mapped to postal code {postal_code}"))
}
