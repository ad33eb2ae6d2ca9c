//! The check command: connectivity test plus sample classifications, for
//! eyeballing classifier behavior against live data before a real export.

use fdex_core::{normalize_location, SourceRecord};
use sqlx::MySqlPool;

use crate::Target;

const SAMPLE_SIZE: usize = 5;

/// Ping the database, then print the first few records of each kind with
/// their raw and parsed locations side by side.
///
/// # Errors
///
/// Returns an error if the ping or either fetch fails.
pub(crate) async fn run(pool: &MySqlPool) -> anyhow::Result<()> {
    fdex_db::ping(pool).await?;
    println!("database connection ok");
    println!();

    for target in [Target::Clients, Target::Suppliers] {
        let records = crate::fetch_records(pool, target).await?;
        println!("== {} ({} total) ==", target.noun(), records.len());
        for (index, record) in records.iter().take(SAMPLE_SIZE).enumerate() {
            print_sample(index + 1, record);
        }
        println!();
    }
    Ok(())
}

fn print_sample(position: usize, record: &SourceRecord) {
    let display_name = record
        .name
        .as_deref()
        .or(record.trade_name.as_deref())
        .unwrap_or("(unnamed)");
    let location =
        normalize_location(record.locality_raw.as_deref(), record.province_raw.as_deref());

    println!("{position}. {display_name}");
    println!(
        "   locality: {:?} -> {:?}",
        record.locality_raw.as_deref().unwrap_or(""),
        location.locality
    );
    println!(
        "   province: {:?} -> {:?}",
        record.province_raw.as_deref().unwrap_or(""),
        location.province
    );
    println!("   country:  {}", location.country);
}
