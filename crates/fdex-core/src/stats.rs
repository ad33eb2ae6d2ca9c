//! Per-country record counts for run diagnostics.

use std::collections::BTreeMap;

use crate::country::classify;
use crate::location::RawLocation;

/// Tally classifier outcomes over a record set.
///
/// The map is keyed by country code and iterates in sorted order, so report
/// output is stable across runs. Empty input yields an empty map.
#[must_use]
pub fn count_by_country<I>(locations: I) -> BTreeMap<&'static str, u64>
where
    I: IntoIterator<Item = RawLocation>,
{
    let mut counts = BTreeMap::new();
    for location in locations {
        let code = classify(location.province.as_deref(), location.locality.as_deref());
        *counts.entry(code).or_insert(0) += 1;
    }
    counts
}
