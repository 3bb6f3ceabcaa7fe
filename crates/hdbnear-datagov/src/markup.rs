//! Extraction of the HTML attribute table that data.gov.sg embeds in
//! GeoJSON `properties.Description`.
//!
//! The table looks like
//! `<tr><th>NAME</th> <td>Some Centre</td></tr>` repeated per attribute,
//! preceded by a header row with no `<td>`. This module is the only place
//! that knows about that layout.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("valid regex"));
static TH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<th\b[^>]*>(.*?)</th>").expect("valid regex"));
static TD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Parses an attribute table into `key -> value` pairs.
///
/// Rows without both a `<th>` and a `<td>` cell are skipped. Tags inside
/// cells are stripped, common entities decoded, and whitespace collapsed.
/// Later duplicate keys overwrite earlier ones. Input with no table yields
/// an empty map.
#[must_use]
pub fn parse_attribute_table(markup: &str) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    for row in ROW_RE.captures_iter(markup) {
        let Some(body) = row.get(1).map(|m| m.as_str()) else {
            continue;
        };
        let key = TH_RE
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| clean_cell(m.as_str()));
        let value = TD_RE
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| clean_cell(m.as_str()));
        if let (Some(key), Some(value)) = (key, value) {
            if !key.is_empty() {
                attributes.insert(key, value);
            }
        }
    }
    attributes
}

fn clean_cell(raw: &str) -> String {
    let stripped = TAG_RE.replace_all(raw, " ");
    let decoded = decode_entities(&stripped);
    WS_RE.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(text: &str) -> String {
    // `&amp;` goes last so `&amp;lt;` decodes to `&lt;` rather than `<`.
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
