//! Adapters from untyped [`RawRecord`]s to [`CandidateRecord`]s.
//!
//! Each adapter returns `None` when the row lacks the fields needed to
//! label or locate it.

use hdbnear_core::{
    CandidateDetails, CandidateRecord, Category, EldercareFacility, ResaleFlat, School,
    TransitExit,
};

use crate::types::RawRecord;

/// Converts a batch of raw rows from the dataset backing `category`,
/// silently skipping rows that do not adapt.
#[must_use]
pub fn to_candidates(category: Category, records: Vec<RawRecord>) -> Vec<CandidateRecord> {
    let adapt: fn(RawRecord) -> Option<CandidateRecord> = match category {
        Category::ResaleFlat => resale_flat,
        Category::School => school,
        Category::Eldercare => eldercare,
        Category::TransitExit => transit_exit,
    };
    let total = records.len();
    let candidates: Vec<CandidateRecord> = records.into_iter().filter_map(adapt).collect();
    if candidates.len() < total {
        tracing::debug!(
            %category,
            skipped = total - candidates.len(),
            "rows dropped by record adapter"
        );
    }
    candidates
}

/// HDB resale transaction row. Requires `block` and `street_name`.
#[must_use]
pub fn resale_flat(raw: RawRecord) -> Option<CandidateRecord> {
    let block = raw.text("block")?;
    let street_name = raw.text("street_name")?;
    let label = format!("{block} {street_name}");
    Some(CandidateRecord {
        label: label.clone(),
        address: Some(label),
        postal_code: None,
        location: raw.location,
        details: CandidateDetails::ResaleFlat(ResaleFlat {
            month: raw.text("month"),
            town: raw.text("town"),
            flat_type: raw.text("flat_type"),
            flat_model: raw.text("flat_model"),
            block,
            street_name,
            storey_range: raw.text("storey_range"),
            floor_area_sqm: raw.number("floor_area_sqm"),
            lease_commence_date: raw.text("lease_commence_date"),
            remaining_lease: raw.text("remaining_lease"),
            resale_price: raw.number("resale_price"),
        }),
    })
}

/// General school information row. Requires `school_name`.
#[must_use]
pub fn school(raw: RawRecord) -> Option<CandidateRecord> {
    Some(CandidateRecord {
        label: raw.text("school_name")?,
        address: raw.text("address"),
        postal_code: raw.text("postal_code").map(|p| pad_postal_code(&p)),
        location: raw.location,
        details: CandidateDetails::School(School {
            town: raw.text("dgp_code"),
            zone: raw.text("zone_code"),
            level: raw.text("mainlevel_code"),
        }),
    })
}

/// Eldercare facility feature. Requires `NAME`.
#[must_use]
pub fn eldercare(raw: RawRecord) -> Option<CandidateRecord> {
    let label = raw.text("NAME")?;
    let address = [
        raw.text("ADDRESSBLOCKHOUSENUMBER"),
        raw.text("ADDRESSSTREETNAME"),
        raw.text("ADDRESSBUILDINGNAME"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    Some(CandidateRecord {
        label,
        address: (!address.is_empty()).then_some(address),
        postal_code: raw.text("ADDRESSPOSTALCODE").map(|p| pad_postal_code(&p)),
        location: raw.location,
        details: CandidateDetails::Eldercare(EldercareFacility {
            building: raw.text("ADDRESSBUILDINGNAME"),
        }),
    })
}

/// MRT/LRT station exit feature. Requires `STATION_NA`.
#[must_use]
pub fn transit_exit(raw: RawRecord) -> Option<CandidateRecord> {
    let station = raw.text("STATION_NA")?;
    let exit_code = raw.text("EXIT_CODE");
    let label = match &exit_code {
        Some(code) => format!("{station} ({code})"),
        None => station.clone(),
    };
    Some(CandidateRecord {
        label,
        address: None,
        postal_code: None,
        location: raw.location,
        details: CandidateDetails::TransitExit(TransitExit { station, exit_code }),
    })
}

/// Numeric postal codes lose their leading zero in some datasets
/// (`"18935"` for `018935`).
fn pad_postal_code(code: &str) -> String {
    if code.len() < 6 && !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) {
        format!("{code:0>6}")
    } else {
        code.to_string()
    }
}
