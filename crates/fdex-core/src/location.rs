//! Locality/province normalization on top of the country classifier.
//!
//! Upstream data frequently has both values concatenated into one field, the
//! province name buried inside the locality, or the country name pasted into
//! the province column. [`normalize_location`] repairs those cases and always
//! yields trimmed values plus a resolved country code.

use serde::{Deserialize, Serialize};

use crate::country::{classify, is_registry_province, registry_province_in, HOME_COUNTRY};

/// Raw, untrusted location fields as read from the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocation {
    pub locality: Option<String>,
    pub province: Option<String>,
}

/// A classified and cleaned location. `locality` and `province` are trimmed
/// and never null; unknown values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedLocation {
    /// ISO-3166 alpha-2 code, defaulting to the home country.
    pub country: &'static str,
    pub locality: String,
    pub province: String,
}

/// Classify a raw location and repair the locality/province split.
///
/// For home-country records: a missing province is recovered from a
/// comma-joined locality ("MADRID, MADRID"), and a province that is not a
/// known registry entry is replaced by the canonical registry name when one
/// appears inside the locality. For foreign records: occurrences of the
/// detected country code are stripped out of the province along with any
/// separator characters they leave behind.
///
/// Pure and total — inputs are never mutated and every input yields a result.
#[must_use]
pub fn normalize_location(locality: Option<&str>, province: Option<&str>) -> NormalizedLocation {
    let country = classify(province, locality);

    let mut locality = locality.unwrap_or("").trim().to_string();
    let mut province = province.unwrap_or("").trim().to_string();

    if country == HOME_COUNTRY {
        if province.is_empty() && locality.contains(',') {
            if let Some((city, region)) = locality.split_once(',') {
                province = region.trim().to_string();
                locality = city.trim().to_string();
            }
        }

        if !is_registry_province(&province.to_uppercase()) {
            if let Some(canonical) = registry_province_in(&locality) {
                province = canonical.to_string();
            }
        }
    } else if province.to_uppercase().contains(country) {
        province = strip_country_code(&province, country);
    }

    NormalizedLocation {
        country,
        locality: locality.trim().to_string(),
        province: province.trim().to_string(),
    }
}

/// Remove every case-insensitive occurrence of `code` from `value` and trim
/// leftover separators (commas, hyphens, whitespace) from both ends.
/// Country codes are ASCII, so per-char ASCII comparison is sufficient.
fn strip_country_code(value: &str, code: &str) -> String {
    let code_chars: Vec<char> = code.chars().collect();
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());

    let mut i = 0;
    while i < chars.len() {
        let hit = chars
            .get(i..i + code_chars.len())
            .is_some_and(|w| w.iter().zip(&code_chars).all(|(a, b)| a.eq_ignore_ascii_case(b)));
        if hit {
            i += code_chars.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out.trim_matches(|c: char| c == ',' || c == '-' || c.is_whitespace())
        .to_string()
}
