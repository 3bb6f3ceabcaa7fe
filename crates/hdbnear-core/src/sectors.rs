//! Static postal-sector → HDB town lookup.
//!
//! A Singapore postal code's first two digits identify its sector. Each
//! sector is bucketed into the HDB town whose resale and school records
//! cover it. Sector `74` has never been issued and is deliberately absent.

/// Sector → town, sorted by sector for binary search.
const SECTOR_TOWNS: &[(&str, &str)] = &[
    ("01", "CENTRAL AREA"),
    ("02", "CENTRAL AREA"),
    ("03", "CENTRAL AREA"),
    ("04", "CENTRAL AREA"),
    ("05", "CENTRAL AREA"),
    ("06", "CENTRAL AREA"),
    ("07", "CENTRAL AREA"),
    ("08", "CENTRAL AREA"),
    ("09", "BUKIT MERAH"),
    ("10", "BUKIT MERAH"),
    ("11", "QUEENSTOWN"),
    ("12", "CLEMENTI"),
    ("13", "QUEENSTOWN"),
    ("14", "QUEENSTOWN"),
    ("15", "BUKIT MERAH"),
    ("16", "BUKIT MERAH"),
    ("17", "CENTRAL AREA"),
    ("18", "CENTRAL AREA"),
    ("19", "KALLANG/WHAMPOA"),
    ("20", "KALLANG/WHAMPOA"),
    ("21", "KALLANG/WHAMPOA"),
    ("22", "CENTRAL AREA"),
    ("23", "CENTRAL AREA"),
    ("24", "BUKIT TIMAH"),
    ("25", "BUKIT TIMAH"),
    ("26", "BUKIT TIMAH"),
    ("27", "BUKIT TIMAH"),
    ("28", "BUKIT TIMAH"),
    ("29", "BUKIT TIMAH"),
    ("30", "TOA PAYOH"),
    ("31", "TOA PAYOH"),
    ("32", "TOA PAYOH"),
    ("33", "KALLANG/WHAMPOA"),
    ("34", "TOA PAYOH"),
    ("35", "TOA PAYOH"),
    ("36", "GEYLANG"),
    ("37", "GEYLANG"),
    ("38", "GEYLANG"),
    ("39", "GEYLANG"),
    ("40", "GEYLANG"),
    ("41", "GEYLANG"),
    ("42", "MARINE PARADE"),
    ("43", "MARINE PARADE"),
    ("44", "MARINE PARADE"),
    ("45", "BEDOK"),
    ("46", "BEDOK"),
    ("47", "BEDOK"),
    ("48", "BEDOK"),
    ("49", "PASIR RIS"),
    ("50", "PASIR RIS"),
    ("51", "PASIR RIS"),
    ("52", "TAMPINES"),
    ("53", "HOUGANG"),
    ("54", "SENGKANG"),
    ("55", "SERANGOON"),
    ("56", "ANG MO KIO"),
    ("57", "BISHAN"),
    ("58", "BUKIT TIMAH"),
    ("59", "BUKIT TIMAH"),
    ("60", "JURONG EAST"),
    ("61", "JURONG WEST"),
    ("62", "JURONG WEST"),
    ("63", "JURONG WEST"),
    ("64", "JURONG WEST"),
    ("65", "BUKIT BATOK"),
    ("66", "BUKIT PANJANG"),
    ("67", "BUKIT PANJANG"),
    ("68", "CHOA CHU KANG"),
    ("69", "CHOA CHU KANG"),
    ("70", "CHOA CHU KANG"),
    ("71", "CHOA CHU KANG"),
    ("72", "WOODLANDS"),
    ("73", "WOODLANDS"),
    ("75", "SEMBAWANG"),
    ("76", "YISHUN"),
    ("77", "ANG MO KIO"),
    ("78", "YISHUN"),
    ("79", "SENGKANG"),
    ("80", "SENGKANG"),
    ("81", "PASIR RIS"),
    ("82", "PUNGGOL"),
];

/// Returns the two-digit sector prefix of a postal code, if it starts with
/// two ASCII digits.
#[must_use]
pub fn sector_of(postal_code: &str) -> Option<&str> {
    let code = postal_code.trim();
    let sector = code.get(..2)?;
    sector
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then_some(sector)
}

/// Looks up the town for a two-digit sector.
#[must_use]
pub fn town_for_sector(sector: &str) -> Option<&'static str> {
    SECTOR_TOWNS
        .binary_search_by(|(s, _)| (*s).cmp(sector))
        .ok()
        .map(|idx| SECTOR_TOWNS[idx].1)
}

/// Maps a postal code to its HDB town via its sector.
///
/// Returns `None` for short, non-numeric, or unmapped codes.
#[must_use]
pub fn town_for(postal_code: &str) -> Option<&'static str> {
    sector_of(postal_code).and_then(town_for_sector)
}

/// Whether `query` looks like a full six-digit postal code.
#[must_use]
pub fn is_postal_code(query: &str) -> bool {
    let q = query.trim();
    q.len() == 6 && q.bytes().all(|b| b.is_ascii_digit())
}
