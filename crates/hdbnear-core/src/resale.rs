//! Derived resale-flat metrics and per-month price history.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::records::ResaleFlat;

pub const SQFT_PER_SQM: f64 = 10.7639;
const DEFAULT_BEDROOMS: u8 = 3;
const PRICE_HISTORY_MONTHS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResaleMetrics {
    pub floor_area_sqft: Option<u32>,
    pub price_per_sqft: Option<u32>,
    pub bedrooms: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    /// `YYYY-MM`
    pub month: String,
    pub average_price: u64,
}

/// Estimates bedrooms from the flat type's leading digit (`"4 ROOM"` → 4).
#[must_use]
pub fn guess_bedrooms(flat_type: Option<&str>) -> u8 {
    flat_type
        .and_then(|t| t.trim().chars().next())
        .and_then(|c| c.to_digit(10))
        .and_then(|d| u8::try_from(d).ok())
        .unwrap_or(DEFAULT_BEDROOMS)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_positive(value: f64) -> Option<u32> {
    (value.is_finite() && value > 0.0 && value < f64::from(u32::MAX)).then(|| value.round() as u32)
}

#[must_use]
pub fn metrics(flat: &ResaleFlat) -> ResaleMetrics {
    let floor_area_sqft = flat
        .floor_area_sqm
        .and_then(|sqm| round_positive(sqm * SQFT_PER_SQM));
    let price_per_sqft = match (flat.resale_price, floor_area_sqft) {
        (Some(price), Some(sqft)) => round_positive(price / f64::from(sqft)),
        _ => None,
    };
    ResaleMetrics {
        floor_area_sqft,
        price_per_sqft,
        bedrooms: guess_bedrooms(flat.flat_type.as_deref()),
    }
}

/// Average price per month for transactions matching `target`'s block,
/// street, and flat type. Returns at most the six most recent months,
/// oldest first.
#[must_use]
pub fn price_history<'a, I>(transactions: I, target: &ResaleFlat) -> Vec<PricePoint>
where
    I: IntoIterator<Item = &'a ResaleFlat>,
{
    let mut by_month: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    for tx in transactions {
        if tx.block != target.block
            || tx.street_name != target.street_name
            || tx.flat_type != target.flat_type
        {
            continue;
        }
        let (Some(month), Some(price)) = (tx.month.as_deref(), tx.resale_price) else {
            continue;
        };
        let Some(key) = month.get(..7) else {
            continue;
        };
        let entry = by_month.entry(key.to_string()).or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    let mut points: Vec<PricePoint> = by_month
        .into_iter()
        .map(|(month, (sum, count))| PricePoint {
            month,
            average_price: u64::from(round_positive(sum / f64::from(count)).unwrap_or(0)),
        })
        .collect();
    let skip = points.len().saturating_sub(PRICE_HISTORY_MONTHS);
    points.drain(..skip);
    points
}

/// Whether `value` is a strict `YYYY-MM` month, as data.gov.sg's resale
/// `month` column stores it.
#[must_use]
pub fn is_month(value: &str) -> bool {
    value.len() == 7 && NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").is_ok()
}

/// The `count` most recent `YYYY-MM` months ending at `today`'s month,
/// newest first.
#[must_use]
pub fn recent_months(today: NaiveDate, count: usize) -> Vec<String> {
    let mut year = today.year();
    let mut month = today.month();
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(format!("{year:04}-{month:02}"));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    out
}
