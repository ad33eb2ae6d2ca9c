//! Fetch queries for the `clientes` table.

use fdex_core::SourceRecord;
use sqlx::MySqlPool;

use crate::DbError;

/// A row from the `clientes` table, aliased to export-schema names. The
/// legacy schema stores the company name in `Empresa` and the mobile number
/// in `Tel2`.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ClientRow {
    tax_id: Option<String>,
    trade_name: Option<String>,
    code: Option<String>,
    address1: Option<String>,
    locality_raw: Option<String>,
    province_raw: Option<String>,
    postal_code: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    mobile: Option<String>,
    notes: Option<String>,
}

impl From<ClientRow> for SourceRecord {
    fn from(row: ClientRow) -> Self {
        SourceRecord {
            tax_id: row.tax_id,
            trade_name: row.trade_name,
            code: row.code,
            address1: row.address1,
            locality_raw: row.locality_raw,
            province_raw: row.province_raw,
            postal_code: row.postal_code,
            email: row.email,
            phone: row.phone,
            mobile: row.mobile,
            notes: row.notes,
            ..SourceRecord::default()
        }
    }
}

/// Returns all clients that have a company name, ordered by internal code.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn fetch_clients(pool: &MySqlPool) -> Result<Vec<SourceRecord>, DbError> {
    let rows = sqlx::query_as::<_, ClientRow>(
        "SELECT CIF AS tax_id, \
                Empresa AS trade_name, \
                codigo AS code, \
                Direccion AS address1, \
                Poblacion AS locality_raw, \
                provincia AS province_raw, \
                CP AS postal_code, \
                DireccionCorreoEl AS email, \
                Tel1 AS phone, \
                Tel2 AS mobile, \
                Observaciones AS notes \
         FROM clientes \
         WHERE Empresa IS NOT NULL \
         ORDER BY codigo",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SourceRecord::from).collect())
}
