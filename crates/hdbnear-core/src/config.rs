use crate::app_config::{AppConfig, DatasetIds, Environment, OneMapCredentials};
use crate::ConfigError;

const DEFAULT_RESALE_RESOURCE_ID: &str = "d_8b84c4ee58e3cfc0ece0d773c8ca6abc";
const DEFAULT_SCHOOLS_RESOURCE_ID: &str = "d_688b934f82c1059ed0a6993d2a829089";
const DEFAULT_ELDERCARE_DATASET_ID: &str = "d_3545b068e3f3506c56b2cb6b6117b884";
const DEFAULT_TRANSIT_EXITS_DATASET_ID: &str = "d_b39d3a0871985372d7e1637193335da5";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a pure
/// `HashMap` lookup.
#[allow(clippy::too_many_lines)]
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("HDBNEAR_ENV", "development"));
    let bind_addr = parse_addr("HDBNEAR_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("HDBNEAR_LOG_LEVEL", "info");

    let onemap_base_url = or_default("ONEMAP_BASE_URL", "https://www.onemap.gov.sg");
    let onemap_credentials = match (optional("ONEMAP_EMAIL"), optional("ONEMAP_PASSWORD")) {
        (Some(email), Some(password)) => Some(OneMapCredentials { email, password }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(invalid(
                "ONEMAP_PASSWORD",
                "required when ONEMAP_EMAIL is set".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(invalid(
                "ONEMAP_EMAIL",
                "required when ONEMAP_PASSWORD is set".to_string(),
            ))
        }
    };
    let onemap_token = optional("ONEMAP_TOKEN");

    let datagov_base_url = or_default("DATAGOV_BASE_URL", "https://data.gov.sg");
    let datagov_download_base_url =
        or_default("DATAGOV_DOWNLOAD_BASE_URL", "https://api-open.data.gov.sg");
    let datasets = DatasetIds {
        resale: or_default("HDBNEAR_RESALE_RESOURCE_ID", DEFAULT_RESALE_RESOURCE_ID),
        schools: or_default("HDBNEAR_SCHOOLS_RESOURCE_ID", DEFAULT_SCHOOLS_RESOURCE_ID),
        eldercare: or_default("HDBNEAR_ELDERCARE_DATASET_ID", DEFAULT_ELDERCARE_DATASET_ID),
        transit_exits: or_default(
            "HDBNEAR_TRANSIT_EXITS_DATASET_ID",
            DEFAULT_TRANSIT_EXITS_DATASET_ID,
        ),
    };

    let search_radius_km = or_default("HDBNEAR_SEARCH_RADIUS_KM", "3.0")
        .parse::<f64>()
        .map_err(|e| invalid("HDBNEAR_SEARCH_RADIUS_KM", e.to_string()))?;
    if !search_radius_km.is_finite() || search_radius_km < 0.0 {
        return Err(invalid(
            "HDBNEAR_SEARCH_RADIUS_KM",
            "must be a finite, non-negative number".to_string(),
        ));
    }

    let max_concurrency = parse_positive_usize("HDBNEAR_MAX_CONCURRENCY", "8")?;
    let geocode_timeout_secs = parse_u64("HDBNEAR_GEOCODE_TIMEOUT_SECS", "10")?;
    let dataset_timeout_secs = parse_u64("HDBNEAR_DATASET_TIMEOUT_SECS", "15")?;
    let resale_months = parse_positive_usize("HDBNEAR_RESALE_MONTHS", "3")?;
    let page_limit = parse_u32("HDBNEAR_PAGE_LIMIT", "500")?;
    let user_agent = or_default("HDBNEAR_USER_AGENT", "hdbnear/0.1 (geo-enrichment)");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        onemap_base_url,
        onemap_credentials,
        onemap_token,
        datagov_base_url,
        datagov_download_base_url,
        datasets,
        search_radius_km,
        max_concurrency,
        geocode_timeout_secs,
        dataset_timeout_secs,
        resale_months,
        page_limit,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
