//! Projection of source records onto the FacturaDirecta import schema.
//!
//! The import format is a flat 21-column CSV with per-kind header prefixes
//! ("Cliente - …" for clients, "Proveedor - …" for suppliers). Mapping is a
//! field-by-field projection with fixed defaults; the only derived values are
//! the normalized location triple and the cleaned email.

use serde::{Deserialize, Serialize};

use crate::location::{normalize_location, RawLocation};

/// The e-invoice opt-out column is emitted as a fixed "off" value for every
/// record; neither source table carries a per-record flag.
pub const E_INVOICE_OPT_OUT: &str = "0";

/// Language emitted when the source record has none.
pub const DEFAULT_LANGUAGE: &str = "es";

/// Which export flavor a row belongs to. Selects header titles only — the
/// column layout is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Client,
    Supplier,
}

impl RecordKind {
    /// Header prefix used by the FacturaDirecta import format.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            RecordKind::Client => "Cliente",
            RecordKind::Supplier => "Proveedor",
        }
    }

    /// The full, ordered header row for this kind.
    #[must_use]
    pub fn headers(self) -> Vec<String> {
        let code_label = match self {
            RecordKind::Client => "Código cliente",
            RecordKind::Supplier => "Código proveedor",
        };
        let columns = [
            "NIF",
            "Nombre",
            "Apellidos",
            "Nombre comercial",
            code_label,
            "No acepta facturas electrónicas",
            "Dirección 1",
            "Dirección 2",
            "Localidad",
            "Provincia",
            "Código postal",
            "País",
            "Web",
            "Email",
            "Teléfono",
            "Móvil",
            "Idioma",
            "Banco - País",
            "Banco - Número cuenta",
            "Banco - SWIFT/BIC",
            "Notas",
        ];
        let prefix = self.prefix();
        columns.iter().map(|c| format!("{prefix} - {c}")).collect()
    }
}

/// A flat business record from the data source. Every field is optional free
/// text; which subset is populated depends on the source table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRecord {
    pub tax_id: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub trade_name: Option<String>,
    pub code: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub locality_raw: Option<String>,
    pub province_raw: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub language: Option<String>,
    pub bank_country: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_swift_bic: Option<String>,
    pub notes: Option<String>,
}

impl SourceRecord {
    /// The raw location pair, for classification and statistics.
    #[must_use]
    pub fn raw_location(&self) -> RawLocation {
        RawLocation {
            locality: self.locality_raw.clone(),
            province: self.province_raw.clone(),
        }
    }
}

/// One row of the 21-column export schema. All values are owned strings;
/// absent source data maps to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub tax_id: String,
    pub name: String,
    pub surname: String,
    pub trade_name: String,
    pub code: String,
    pub e_invoice_opt_out: String,
    pub address1: String,
    pub address2: String,
    pub locality: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub website: String,
    pub email: String,
    pub phone: String,
    pub mobile: String,
    pub language: String,
    pub bank_country: String,
    pub bank_account_number: String,
    pub bank_swift_bic: String,
    pub notes: String,
}

impl ExportRow {
    pub const COLUMN_COUNT: usize = 21;

    /// Column values in header order.
    #[must_use]
    pub fn fields(&self) -> [&str; Self::COLUMN_COUNT] {
        [
            &self.tax_id,
            &self.name,
            &self.surname,
            &self.trade_name,
            &self.code,
            &self.e_invoice_opt_out,
            &self.address1,
            &self.address2,
            &self.locality,
            &self.province,
            &self.postal_code,
            &self.country,
            &self.website,
            &self.email,
            &self.phone,
            &self.mobile,
            &self.language,
            &self.bank_country,
            &self.bank_account_number,
            &self.bank_swift_bic,
            &self.notes,
        ]
    }
}

/// Project a source record onto the export schema.
///
/// The raw location is normalized (which also resolves the country code, so
/// the country column is never empty), the email is cleaned down to its first
/// address, the language falls back to [`DEFAULT_LANGUAGE`], and the e-invoice
/// opt-out flag is the fixed [`E_INVOICE_OPT_OUT`] value. Everything else
/// passes through as-is, with empty strings for absent fields.
#[must_use]
pub fn map_record(record: &SourceRecord) -> ExportRow {
    let location = normalize_location(record.locality_raw.as_deref(), record.province_raw.as_deref());

    ExportRow {
        tax_id: field(record.tax_id.as_deref()),
        name: field(record.name.as_deref()),
        surname: field(record.surname.as_deref()),
        trade_name: field(record.trade_name.as_deref()),
        code: field(record.code.as_deref()),
        e_invoice_opt_out: E_INVOICE_OPT_OUT.to_string(),
        address1: field(record.address1.as_deref()),
        address2: field(record.address2.as_deref()),
        locality: location.locality,
        province: location.province,
        postal_code: field(record.postal_code.as_deref()),
        country: location.country.to_string(),
        website: field(record.website.as_deref()),
        email: clean_email(record.email.as_deref()),
        phone: field(record.phone.as_deref()),
        mobile: field(record.mobile.as_deref()),
        language: record
            .language
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string(),
        bank_country: field(record.bank_country.as_deref()),
        bank_account_number: field(record.bank_account_number.as_deref()),
        bank_swift_bic: field(record.bank_swift_bic.as_deref()),
        notes: field(record.notes.as_deref()),
    }
}

fn field(value: Option<&str>) -> String {
    value.unwrap_or("").to_string()
}

/// Reduce a raw email field to its first usable address.
///
/// Source data frequently packs several addresses into one column, separated
/// by semicolons, slashes, commas, or whitespace runs. The first non-empty
/// token wins; a field with no usable token maps to the empty string.
#[must_use]
pub fn clean_email(email: Option<&str>) -> String {
    email
        .unwrap_or("")
        .split(|c: char| c == ';' || c == '/' || c == ',' || c.is_whitespace())
        .find(|token| !token.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Pre-export sanity report: rows that will import badly (no tax id, or no
/// usable name at all). Warnings only — the export itself never blocks.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub total: usize,
    pub errors: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn valid_records(&self) -> usize {
        self.total.saturating_sub(self.errors.len())
    }
}

/// Check mapped rows for missing identity fields.
#[must_use]
pub fn validate_rows(rows: &[ExportRow]) -> ValidationReport {
    let mut errors = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let line = idx + 1;
        if row.tax_id.is_empty() {
            errors.push(format!("row {line}: missing tax id"));
        }
        if row.name.is_empty() && row.surname.is_empty() && row.trade_name.is_empty() {
            errors.push(format!("row {line}: missing name, surname, and trade name"));
        }
    }
    ValidationReport {
        total: rows.len(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_location(locality: &str, province: &str) -> SourceRecord {
        SourceRecord {
            tax_id: Some("B12345678".to_string()),
            trade_name: Some("Ferretería Ejemplo SL".to_string()),
            locality_raw: Some(locality.to_string()),
            province_raw: Some(province.to_string()),
            ..SourceRecord::default()
        }
    }

    #[test]
    fn maps_defaults_for_absent_fields() {
        let row = map_record(&SourceRecord::default());
        assert_eq!(row.tax_id, "");
        assert_eq!(row.country, "ES");
        assert_eq!(row.language, "es");
        assert_eq!(row.e_invoice_opt_out, "0");
        assert_eq!(row.bank_account_number, "");
    }

    #[test]
    fn empty_language_falls_back_to_default() {
        let record = SourceRecord {
            language: Some(String::new()),
            ..SourceRecord::default()
        };
        assert_eq!(map_record(&record).language, "es");
    }

    #[test]
    fn explicit_language_is_kept() {
        let record = SourceRecord {
            language: Some("en".to_string()),
            ..SourceRecord::default()
        };
        assert_eq!(map_record(&record).language, "en");
    }

    #[test]
    fn location_fields_come_from_the_normalizer() {
        let row = map_record(&record_with_location("MADRID, MADRID", ""));
        assert_eq!(row.locality, "MADRID");
        assert_eq!(row.province, "MADRID");
        assert_eq!(row.country, "ES");
    }

    #[test]
    fn foreign_record_gets_detected_country() {
        let row = map_record(&record_with_location("D-70173 STUTTGART", ""));
        assert_eq!(row.country, "DE");
    }

    #[test]
    fn opt_out_flag_is_fixed_regardless_of_input() {
        let record = SourceRecord {
            notes: Some("accepts e-invoices".to_string()),
            ..SourceRecord::default()
        };
        assert_eq!(map_record(&record).e_invoice_opt_out, "0");
    }

    #[test]
    fn fields_align_with_headers() {
        let row = ExportRow::default();
        assert_eq!(row.fields().len(), RecordKind::Client.headers().len());
        assert_eq!(
            RecordKind::Client.headers()[4],
            "Cliente - Código cliente"
        );
        assert_eq!(
            RecordKind::Supplier.headers()[4],
            "Proveedor - Código proveedor"
        );
        assert_eq!(RecordKind::Supplier.headers()[0], "Proveedor - NIF");
    }

    #[test]
    fn clean_email_takes_first_of_many() {
        assert_eq!(clean_email(Some("a@x.com; b@y.com")), "a@x.com");
        assert_eq!(clean_email(Some("a@x.com/b@y.com")), "a@x.com");
        assert_eq!(clean_email(Some("a@x.com,b@y.com")), "a@x.com");
        assert_eq!(clean_email(Some("a@x.com   b@y.com")), "a@x.com");
    }

    #[test]
    fn clean_email_skips_leading_separators() {
        assert_eq!(clean_email(Some("; a@x.com")), "a@x.com");
        assert_eq!(clean_email(Some("  a@x.com  ")), "a@x.com");
    }

    #[test]
    fn clean_email_degrades_to_empty() {
        assert_eq!(clean_email(None), "");
        assert_eq!(clean_email(Some("")), "");
        assert_eq!(clean_email(Some(" ; / , ")), "");
    }

    #[test]
    fn validation_flags_missing_identity() {
        let rows = vec![
            map_record(&record_with_location("GETAFE", "Madrid")),
            map_record(&SourceRecord::default()),
        ];
        let report = validate_rows(&rows);
        assert_eq!(report.total, 2);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("row 2"));
        assert!(!report.is_valid());
        assert_eq!(report.valid_records(), 0);
    }

    #[test]
    fn validation_passes_complete_rows() {
        let rows = vec![map_record(&record_with_location("GETAFE", "Madrid"))];
        let report = validate_rows(&rows);
        assert!(report.is_valid());
        assert_eq!(report.valid_records(), 1);
    }
}
