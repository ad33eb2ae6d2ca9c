//! Fetch queries for the `proveedores` table.

use fdex_core::SourceRecord;
use sqlx::MySqlPool;

use crate::DbError;

/// A row from the `proveedores` table, aliased to export-schema names.
/// Suppliers carry a person/company name in `NombreProveedor` and only a
/// single phone column.
#[derive(Debug, Clone, sqlx::FromRow)]
struct SupplierRow {
    tax_id: Option<String>,
    name: Option<String>,
    code: Option<String>,
    address1: Option<String>,
    locality_raw: Option<String>,
    province_raw: Option<String>,
    postal_code: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    notes: Option<String>,
}

impl From<SupplierRow> for SourceRecord {
    fn from(row: SupplierRow) -> Self {
        SourceRecord {
            tax_id: row.tax_id,
            name: row.name,
            code: row.code,
            address1: row.address1,
            locality_raw: row.locality_raw,
            province_raw: row.province_raw,
            postal_code: row.postal_code,
            email: row.email,
            phone: row.phone,
            notes: row.notes,
            ..SourceRecord::default()
        }
    }
}

/// Returns all suppliers, ordered by internal code.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn fetch_suppliers(pool: &MySqlPool) -> Result<Vec<SourceRecord>, DbError> {
    let rows = sqlx::query_as::<_, SupplierRow>(
        "SELECT CIF AS tax_id, \
                NombreProveedor AS name, \
                codigo AS code, \
                Direccion AS address1, \
                Poblacion AS locality_raw, \
                provincia AS province_raw, \
                CP AS postal_code, \
                DireccionCorreoEl AS email, \
                Tel AS phone, \
                Observaciones AS notes \
         FROM proveedores \
         ORDER BY codigo",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SourceRecord::from).collect())
}

/// Returns the distinct non-null locality values seen across suppliers,
/// for classifier diagnostics.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_distinct_localities(pool: &MySqlPool) -> Result<Vec<String>, DbError> {
    let rows: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT Poblacion \
         FROM proveedores \
         WHERE Poblacion IS NOT NULL \
         ORDER BY Poblacion",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
