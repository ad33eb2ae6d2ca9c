//! Diagnostic commands: country stats, locality analysis, raw locality dump.

use std::collections::BTreeMap;

use fdex_core::{classify, count_by_country, SourceRecord, HOME_COUNTRY};
use sqlx::MySqlPool;

use crate::Target;

/// Country names that strongly suggest a foreign record. A locality matching
/// one of these while still classifying as the home country is a likely gap
/// in the rule table. Diagnostic only — the classifier itself never consults
/// this list.
const FOREIGN_HINTS: &[&str] = &[
    "CHINA",
    "INDIA",
    "USA",
    "UNITED STATES",
    "CANADA",
    "MEXICO",
    "BRASIL",
    "BRAZIL",
    "ARGENTINA",
    "CHILE",
    "COLOMBIA",
    "PERU",
    "JAPAN",
    "JAPON",
    "KOREA",
    "COREA",
    "TAIWAN",
    "HONG KONG",
    "AUSTRALIA",
    "NEW ZEALAND",
    "SOUTH AFRICA",
    "SUDAFRICA",
    "RUSSIA",
    "RUSIA",
    "POLAND",
    "POLONIA",
    "CZECH",
    "CHECA",
    "NETHERLANDS",
    "HOLANDA",
    "BELGIUM",
    "BELGICA",
    "SWITZERLAND",
    "SUIZA",
    "AUSTRIA",
    "SWEDEN",
    "SUECIA",
    "NORWAY",
    "NORUEGA",
    "DENMARK",
    "DINAMARCA",
    "FINLAND",
    "FINLANDIA",
    "IRELAND",
    "IRLANDA",
    "GREECE",
    "GRECIA",
    "TURKEY",
    "TURQUIA",
    "EGYPT",
    "EGIPTO",
    "ISRAEL",
    "DUBAI",
    "UAE",
];

/// Print per-country counts for one record kind.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub(crate) async fn run_stats(pool: &MySqlPool, target: Target) -> anyhow::Result<()> {
    let records = crate::fetch_records(pool, target).await?;
    let stats = count_by_country(records.iter().map(SourceRecord::raw_location));

    println!("{} by country:", target.noun());
    for (country, count) in &stats {
        println!("  {country}: {count}");
    }
    println!();
    println!("total: {} {}", records.len(), target.noun());
    println!("countries detected: {}", stats.len());
    Ok(())
}

/// Group distinct localities by detected country and flag values that look
/// foreign but still fell through to the home country.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub(crate) async fn run_analyze(pool: &MySqlPool) -> anyhow::Result<()> {
    let localities = fdex_db::list_distinct_localities(pool).await?;
    println!("found {} distinct localities", localities.len());
    println!();

    let mut groups: BTreeMap<&'static str, Vec<&str>> = BTreeMap::new();
    let mut suspects: Vec<&str> = Vec::new();

    for locality in &localities {
        let country = classify(None, Some(locality));
        groups.entry(country).or_default().push(locality);

        let upper = locality.to_uppercase();
        let has_hint = FOREIGN_HINTS.iter().any(|hint| upper.contains(hint));
        if has_hint && country == HOME_COUNTRY {
            suspects.push(locality);
        }
    }

    println!("countries detected:");
    for (country, values) in &groups {
        println!();
        println!("{country}: {} localities", values.len());
        if values.len() <= 20 {
            for value in values {
                println!("  - {value}");
            }
        } else {
            println!("  (showing first 10)");
            for value in values.iter().take(10) {
                println!("  - {value}");
            }
        }
    }

    if !suspects.is_empty() {
        println!();
        println!("potential undetected foreign localities (defaulted to {HOME_COUNTRY}):");
        for value in &suspects {
            println!("  - {value}");
        }
    }
    Ok(())
}

/// Dump the distinct locality list as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the fetch fails or serialization fails.
pub(crate) async fn run_localities(pool: &MySqlPool) -> anyhow::Result<()> {
    let localities = fdex_db::list_distinct_localities(pool).await?;
    println!("{}", serde_json::to_string_pretty(&localities)?);
    Ok(())
}
