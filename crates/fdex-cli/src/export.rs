//! The export command: fetch, classify, map, validate, write.

use chrono::Utc;
use fdex_core::{count_by_country, map_record, validate_rows, AppConfig, ExportRow, SourceRecord};
use sqlx::MySqlPool;

use crate::Target;

/// Run a full export for one record kind.
///
/// Validation problems are logged as warnings and never abort the run — a
/// half-filled record still belongs in the import file. Database and
/// filesystem failures do abort.
///
/// # Errors
///
/// Returns an error if fetching the records or writing the files fails.
pub(crate) async fn run(
    pool: &MySqlPool,
    config: &AppConfig,
    target: Target,
    dry_run: bool,
) -> anyhow::Result<()> {
    let records = crate::fetch_records(pool, target).await?;
    let noun = target.noun();

    if records.is_empty() {
        println!("no {noun} found; nothing to export");
        return Ok(());
    }

    let stats = count_by_country(records.iter().map(SourceRecord::raw_location));
    for (country, count) in &stats {
        tracing::info!(country = %country, count = *count, "{noun} by country");
    }

    if dry_run {
        println!(
            "dry-run: would export {} {noun} across {} countries; no files written",
            records.len(),
            stats.len()
        );
        return Ok(());
    }

    let rows: Vec<ExportRow> = records.iter().map(map_record).collect();

    let report = validate_rows(&rows);
    for error in &report.errors {
        tracing::warn!(%error, "validation warning");
    }

    let timestamp = fdex_export::run_timestamp(Utc::now());
    let paths = fdex_export::write_chunked(&rows, target.kind(), &config.output_dir, &timestamp)?;

    println!(
        "exported {} {noun} into {} file(s):",
        report.total,
        paths.len()
    );
    for path in &paths {
        println!("  {}", path.display());
    }
    if !report.is_valid() {
        println!(
            "{} validation warning(s), {} fully valid record(s); see log for details",
            report.errors.len(),
            report.valid_records()
        );
    }
    Ok(())
}
