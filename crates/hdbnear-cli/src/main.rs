mod geocode;
mod search;

use clap::{Parser, Subcommand};
use hdbnear_core::Category;
use hdbnear_search::SortOrder;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hdbnear")]
#[command(about = "Find HDB resale flats, schools, eldercare and MRT exits near a Singapore address")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every category around a postal code or address
    Search {
        /// Postal code or free-text address
        query: String,
        /// Search radius in km (defaults to `HDBNEAR_SEARCH_RADIUS_KM`)
        #[arg(long)]
        radius_km: Option<f64>,
        /// Categories to include, comma-separated (defaults to all)
        #[arg(long = "category", value_delimiter = ',', value_parser = parse_category)]
        categories: Vec<Category>,
        /// Resale flat types to match, e.g. "4 ROOM"
        #[arg(long = "flat-type", value_delimiter = ',')]
        flat_types: Vec<String>,
        /// Resale flat models to match, e.g. "Improved"
        #[arg(long = "flat-model", value_delimiter = ',')]
        flat_models: Vec<String>,
        /// Resale months as YYYY-MM (defaults to the most recent months)
        #[arg(long = "month", value_delimiter = ',', value_parser = parse_month)]
        months: Vec<String>,
        /// Result order: completion or distance
        #[arg(long, default_value = "completion", value_parser = parse_sort)]
        sort: SortOrder,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Geocode an address, or reverse-geocode with --reverse
    Geocode {
        /// Postal code or address to look up
        #[arg(required_unless_present = "reverse", conflicts_with = "reverse")]
        query: Option<String>,
        /// Coordinates as "lat,lon"
        #[arg(long, allow_hyphen_values = true)]
        reverse: Option<String>,
    },
    /// Show the town a postal code's sector belongs to
    Sector {
        /// Six-digit postal code
        postal_code: String,
    },
}

fn parse_category(value: &str) -> Result<Category, String> {
    value.parse()
}

fn parse_sort(value: &str) -> Result<SortOrder, String> {
    value.parse()
}

fn parse_month(value: &str) -> Result<String, String> {
    let month = value.trim();
    if hdbnear_core::resale::is_month(month) {
        Ok(month.to_string())
    } else {
        Err(format!("expected YYYY-MM, got \"{value}\""))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("hdbnear: run `hdbnear --help` for usage");
        return Ok(());
    };

    // Sector lookups are table-driven and need no configuration.
    if let Commands::Sector { postal_code } = &command {
        return geocode::run_sector(postal_code);
    }

    let config = hdbnear_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Search {
            query,
            radius_km,
            categories,
            flat_types,
            flat_models,
            months,
            sort,
            json,
        } => {
            let args = search::SearchArgs {
                query,
                radius_km,
                categories,
                flat_types,
                flat_models,
                months,
                sort,
                json,
            };
            search::run_search(&config, args).await?;
        }
        Commands::Geocode { query, reverse } => {
            geocode::run_geocode(&config, query.as_deref(), reverse.as_deref()).await?;
        }
        Commands::Sector { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests;
