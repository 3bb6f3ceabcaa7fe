use super::*;
use hdbnear_core::{CandidateDetails, CandidateRecord, EnrichedResult, GeoPoint, TransitExit};
use hdbnear_search::{FlatInsight, SearchHit};

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["hdbnear"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_search_with_defaults() {
    let cli = Cli::try_parse_from(["hdbnear", "search", "560406"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Search {
            ref query,
            radius_km: None,
            ref categories,
            sort: SortOrder::Completion,
            json: false,
            ..
        }) if query == "560406" && categories.is_empty()
    ));
}

#[test]
fn parses_search_filters() {
    let cli = Cli::try_parse_from([
        "hdbnear",
        "search",
        "ang mo kio ave 10",
        "--radius-km",
        "1.5",
        "--category",
        "flats,schools",
        "--flat-type",
        "4 ROOM,5 ROOM",
        "--month",
        "2024-04",
        "--month",
        "2024-05",
        "--sort",
        "distance",
        "--json",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Search {
        radius_km,
        categories,
        flat_types,
        months,
        sort,
        json,
        ..
    }) = cli.command
    else {
        panic!("expected search command");
    };
    assert_eq!(radius_km, Some(1.5));
    assert_eq!(categories, vec![Category::ResaleFlat, Category::School]);
    assert_eq!(flat_types, vec!["4 ROOM", "5 ROOM"]);
    assert_eq!(months, vec!["2024-04", "2024-05"]);
    assert_eq!(sort, SortOrder::Distance);
    assert!(json);
}

#[test]
fn rejects_unknown_category() {
    assert!(Cli::try_parse_from(["hdbnear", "search", "560406", "--category", "hawker"]).is_err());
}

#[test]
fn rejects_malformed_month() {
    for month in ["2024-5", "May 2024", "2024-13"] {
        assert!(
            Cli::try_parse_from(["hdbnear", "search", "560406", "--month", month]).is_err(),
            "{month} should be rejected"
        );
    }
    assert!(Cli::try_parse_from(["hdbnear", "search", "560406", "--month", "2024-05,2024-4"]).is_err());
}

#[test]
fn rejects_unknown_sort() {
    assert!(Cli::try_parse_from(["hdbnear", "search", "560406", "--sort", "price"]).is_err());
}

#[test]
fn parses_reverse_geocode() {
    let cli = Cli::try_parse_from(["hdbnear", "geocode", "--reverse", "1.36,103.85"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Geocode {
            query: None,
            reverse: Some(ref r),
        }) if r == "1.36,103.85"
    ));
}

#[test]
fn geocode_needs_query_or_reverse() {
    assert!(Cli::try_parse_from(["hdbnear", "geocode"]).is_err());
    assert!(Cli::try_parse_from(["hdbnear", "geocode", "560406", "--reverse", "1.36,103.85"]).is_err());
}

#[test]
fn parses_sector_command() {
    let cli = Cli::try_parse_from(["hdbnear", "sector", "560406"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Sector { ref postal_code }) if postal_code == "560406"
    ));
}

#[test]
fn search_args_build_request() {
    let args = search::SearchArgs {
        query: "560406".to_string(),
        radius_km: Some(1.0),
        categories: vec![Category::School],
        flat_types: vec![],
        flat_models: vec!["Improved".to_string()],
        months: vec![],
        sort: SortOrder::Distance,
        json: false,
    };
    let request = args.to_request();
    assert_eq!(request.radius_km, Some(1.0));
    assert!(request.categories.contains(&Category::School));
    assert_eq!(request.flat_models, vec!["Improved"]);
    assert!(request.months.is_none());
    assert_eq!(request.sort, SortOrder::Distance);
}

#[test]
fn parse_lat_lon_accepts_pair() {
    let point = geocode::parse_lat_lon("1.36209, 103.85443").expect("valid pair");
    assert!((point.latitude() - 1.362_09).abs() < 1e-9);
    assert!((point.longitude() - 103.854_43).abs() < 1e-9);
}

#[test]
fn parse_lat_lon_rejects_garbage() {
    assert!(geocode::parse_lat_lon("1.36").is_err());
    assert!(geocode::parse_lat_lon("north,east").is_err());
    assert!(geocode::parse_lat_lon("95.0,103.8").is_err());
}

#[test]
fn sector_town_lookup() {
    assert_eq!(geocode::sector_town("560406").expect("mapped"), "ANG MO KIO");
    assert!(geocode::sector_town("74012").is_err());
    assert!(geocode::sector_town("740123").is_err());
}

#[test]
fn format_hit_includes_distance_and_label() {
    let hit = SearchHit {
        result: EnrichedResult {
            category: Category::TransitExit,
            record: CandidateRecord {
                label: "ANG MO KIO MRT STATION (Exit A)".to_string(),
                address: None,
                postal_code: None,
                location: None,
                details: CandidateDetails::TransitExit(TransitExit {
                    station: "ANG MO KIO MRT STATION".to_string(),
                    exit_code: Some("Exit A".to_string()),
                }),
            },
            location: GeoPoint::new(1.3699, 103.8497).expect("valid point"),
            distance_km: 0.94,
        },
        resale: None::<FlatInsight>,
    };
    let line = search::format_hit(&hit);
    assert!(line.starts_with("transit_exit"));
    assert!(line.contains("0.94"));
    assert!(line.ends_with("ANG MO KIO MRT STATION (Exit A)"));
}
