//! Pure domain logic for the FacturaDirecta export pipeline: country
//! classification, location normalization, export-schema mapping, per-country
//! statistics, and runtime configuration. No I/O lives here — the database
//! and CSV writing are separate crates.

pub mod config;
pub mod country;
pub mod location;
pub mod mapper;
pub mod stats;

pub use config::{load_app_config, load_app_config_from_env, AppConfig, ConfigError};
pub use country::{classify, CountryRule, COUNTRY_RULES, HOME_COUNTRY, SPANISH_PROVINCES};
pub use location::{normalize_location, NormalizedLocation, RawLocation};
pub use mapper::{
    clean_email, map_record, validate_rows, ExportRow, RecordKind, SourceRecord, ValidationReport,
};
pub use stats::count_by_country;
