//! Chunked CSV writing for FacturaDirecta import files.
//!
//! The invoicing platform rejects imports above a fixed row count, so large
//! exports are split into part-numbered files. All files of one run share a
//! single timestamp; every field is quoted; output is UTF-8 with a header
//! row per file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fdex_core::{ExportRow, RecordKind};
use thiserror::Error;

/// Import limit of the invoicing platform; files are split at this many rows.
pub const MAX_ROWS_PER_FILE: usize = 1000;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("failed to flush {path}: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Format an export-run timestamp (`YYYY-MM-DDTHH-MM-SS`, UTC), filesystem
/// safe on every platform.
#[must_use]
pub fn run_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

fn file_stem(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Client => "facturadirecta_import_clients",
        RecordKind::Supplier => "facturadirecta_import_suppliers",
    }
}

/// Write `rows` into one or more CSV files under `output_dir`.
///
/// Rows are chunked at [`MAX_ROWS_PER_FILE`] preserving input order. A single
/// chunk is named `<stem>_<timestamp>.csv`; multiple chunks get a
/// `_part<N>_` marker, numbered from 1, all sharing `timestamp`. Empty input
/// produces no files. The output directory is created if missing.
///
/// # Errors
///
/// Returns [`ExportError`] if the directory cannot be created or a file
/// cannot be written.
pub fn write_chunked(
    rows: &[ExportRow],
    kind: RecordKind,
    output_dir: &Path,
    timestamp: &str,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(output_dir).map_err(|source| ExportError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let stem = file_stem(kind);
    let chunks: Vec<&[ExportRow]> = rows.chunks(MAX_ROWS_PER_FILE).collect();
    let multi_part = chunks.len() > 1;

    let mut paths = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let filename = if multi_part {
            format!("{stem}_part{}_{timestamp}.csv", index + 1)
        } else {
            format!("{stem}_{timestamp}.csv")
        };
        let path = output_dir.join(filename);
        write_file(&path, kind, chunk)?;
        tracing::info!(path = %path.display(), rows = chunk.len(), "wrote export file");
        paths.push(path);
    }

    Ok(paths)
}

fn write_file(path: &Path, kind: RecordKind, rows: &[ExportRow]) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_path(path)?;

    writer.write_record(kind.headers())?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush().map_err(|source| ExportError::Flush {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(i: usize) -> ExportRow {
        ExportRow {
            tax_id: format!("B{i:08}"),
            trade_name: format!("Empresa {i}"),
            country: "ES".to_string(),
            language: "es".to_string(),
            e_invoice_opt_out: "0".to_string(),
            ..ExportRow::default()
        }
    }

    fn make_rows(count: usize) -> Vec<ExportRow> {
        (0..count).map(make_row).collect()
    }

    fn line_count(path: &Path) -> usize {
        fs::read_to_string(path).unwrap().lines().count()
    }

    #[test]
    fn splits_1500_rows_into_two_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chunked(
            &make_rows(1500),
            RecordKind::Client,
            dir.path(),
            "2026-08-06T10-00-00",
        )
        .unwrap();

        assert_eq!(paths.len(), 2);
        let first = paths[0].file_name().unwrap().to_str().unwrap();
        let second = paths[1].file_name().unwrap().to_str().unwrap();
        assert_eq!(
            first,
            "facturadirecta_import_clients_part1_2026-08-06T10-00-00.csv"
        );
        assert_eq!(
            second,
            "facturadirecta_import_clients_part2_2026-08-06T10-00-00.csv"
        );

        // Header plus data rows per file.
        assert_eq!(line_count(&paths[0]), 1001);
        assert_eq!(line_count(&paths[1]), 501);
    }

    #[test]
    fn single_file_has_no_part_marker() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chunked(
            &make_rows(3),
            RecordKind::Supplier,
            dir.path(),
            "2026-08-06T10-00-00",
        )
        .unwrap();

        assert_eq!(paths.len(), 1);
        assert_eq!(
            paths[0].file_name().unwrap().to_str().unwrap(),
            "facturadirecta_import_suppliers_2026-08-06T10-00-00.csv"
        );
        assert_eq!(line_count(&paths[0]), 4);
    }

    #[test]
    fn exactly_1000_rows_stay_in_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chunked(
            &make_rows(1000),
            RecordKind::Client,
            dir.path(),
            "2026-08-06T10-00-00",
        )
        .unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(line_count(&paths[0]), 1001);
    }

    #[test]
    fn one_row_past_the_limit_starts_a_second_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chunked(
            &make_rows(1001),
            RecordKind::Client,
            dir.path(),
            "2026-08-06T10-00-00",
        )
        .unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(line_count(&paths[1]), 2);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths =
            write_chunked(&[], RecordKind::Client, dir.path(), "2026-08-06T10-00-00").unwrap();
        assert!(paths.is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn header_row_matches_kind_and_fields_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chunked(
            &make_rows(1),
            RecordKind::Supplier,
            dir.path(),
            "2026-08-06T10-00-00",
        )
        .unwrap();

        let content = fs::read_to_string(&paths[0]).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("\"Proveedor - NIF\","));
        assert!(header.contains("\"Proveedor - Código proveedor\""));
        let data = lines.next().unwrap();
        assert!(data.starts_with("\"B00000000\","));
        // Empty columns are quoted too.
        assert!(data.contains("\"\",\"\""));
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out/run1");
        let paths = write_chunked(
            &make_rows(1),
            RecordKind::Client,
            &nested,
            "2026-08-06T10-00-00",
        )
        .unwrap();
        assert!(paths[0].exists());
    }

    #[test]
    fn timestamp_format_is_filesystem_safe() {
        let now = DateTime::parse_from_rfc3339("2026-08-06T10:20:30Z")
            .unwrap()
            .with_timezone(&Utc);
        let stamp = run_timestamp(now);
        assert_eq!(stamp, "2026-08-06T10-20-30");
        assert!(!stamp.contains(':'));
    }
}
