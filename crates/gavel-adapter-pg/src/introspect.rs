//! Schema introspection against the information_schema catalog.

use crate::error::AdapterError;
use gavel_core::ColumnInfo;
use gavel_policy::{AccessPolicy, PolicyViolation};
use sqlx::{PgPool, Row};

/// Fetch column metadata for an allowed table, in ordinal order.
///
/// The policy check happens before any I/O. A table that yields zero
/// catalog rows is reported as not found; Postgres has no column-less
/// tables to confuse that with in practice.
pub async fn describe_table(
    pool: &PgPool,
    policy: &AccessPolicy,
    table: &str,
) -> Result<Vec<ColumnInfo>, AdapterError> {
    if !policy.is_allowed(table) {
        return Err(PolicyViolation::UnauthorizedTables {
            tables: vec![table.to_lowercase()],
            allowed: policy.tables_owned(),
        }
        .into());
    }

    let rows = sqlx::query(
        r#"
        select column_name, data_type, is_nullable
        from information_schema.columns
        where table_schema = 'public'
          and table_name = $1
        order by ordinal_position
        "#,
    )
    .bind(table.to_lowercase())
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Err(AdapterError::TableNotFound(table.to_string()));
    }

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.try_get("column_name")?;
        let data_type: String = row.try_get("data_type")?;
        let is_nullable: String = row.try_get("is_nullable")?;
        columns.push(ColumnInfo {
            name,
            data_type,
            nullable: is_nullable == "YES",
        });
    }

    Ok(columns)
}
