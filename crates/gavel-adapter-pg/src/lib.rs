//! Postgres adapter for the Gavel gateway.
//!
//! Owns the connection pool and performs every actual database round trip:
//! executing validated raw SQL, running built filter plans, and schema
//! introspection. The policy and plan-building crates stay pure; this is
//! the single place where their outputs meet the wire.

use gavel_core::{ColumnInfo, QueryResult, UpstreamConfig};
use gavel_policy::{AccessPolicy, StatementValidator};
use gavel_query::{BindValue, ItemFilter, QueryPlan, build_items_count, build_items_query};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{Arguments, Column, PgPool, Row};
use std::time::Duration;

pub mod error;
pub mod introspect;

pub use error::AdapterError;

fn args_add<T>(args: &mut PgArguments, v: T) -> Result<(), AdapterError>
where
    T: Send + Sync + 'static,
    for<'q> T: sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    args.add(v).map_err(|e| AdapterError::Bind(e.to_string()))
}

/// Translate a plan's ordered bind values into Postgres arguments.
/// Position `i` of the plan becomes placeholder `$i+1`'s value.
fn bind_plan(plan: &QueryPlan) -> Result<PgArguments, AdapterError> {
    let mut args = PgArguments::default();
    for value in &plan.binds {
        match value {
            BindValue::Text(s) => args_add(&mut args, s.clone())?,
            BindValue::Date(d) => args_add(&mut args, *d)?,
            BindValue::Number(n) => args_add(&mut args, *n)?,
            BindValue::Int(i) => args_add(&mut args, *i)?,
        }
    }
    Ok(args)
}

/// The Postgres adapter: an externally owned handle the server receives.
pub struct PostgresAdapter {
    pool: PgPool,
    policy: AccessPolicy,
}

impl PostgresAdapter {
    /// Connect a new pool from upstream configuration.
    pub async fn connect(
        config: &UpstreamConfig,
        policy: AccessPolicy,
    ) -> Result<Self, AdapterError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.pool.idle_timeout_seconds))
            .connect(&config.connection_string())
            .await?;
        tracing::info!(
            host = %config.host,
            database = %config.database,
            max_connections = config.pool.max_connections,
            "connected to upstream Postgres"
        );
        Ok(Self { pool, policy })
    }

    /// Wrap an existing pool (tests, shared pools).
    pub fn from_pool(pool: PgPool, policy: AccessPolicy) -> Self {
        Self { pool, policy }
    }

    /// The access policy this adapter enforces.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Connectivity probe.
    pub async fn ping(&self) -> Result<(), AdapterError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Validate and execute a caller-supplied read statement.
    ///
    /// Accepted text is forwarded verbatim; rejected text never reaches the
    /// database.
    pub async fn execute_query(&self, sql: &str) -> Result<QueryResult, AdapterError> {
        StatementValidator::new(&self.policy)
            .validate(sql)
            .into_result()?;

        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        let columns: Vec<String> = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let rows: Vec<serde_json::Value> = rows.iter().map(row_to_json).collect();

        tracing::debug!(row_count = rows.len(), "executed raw query");
        Ok(QueryResult::from_rows(columns, rows))
    }

    /// Run the paginated item listing for a filter.
    pub async fn fetch_items(
        &self,
        filter: &ItemFilter,
    ) -> Result<Vec<serde_json::Value>, AdapterError> {
        let plan = build_items_query(filter)?;
        let args = bind_plan(&plan)?;
        let rows = sqlx::query_with(&plan.sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    /// Count the rows a filter matches, ignoring pagination.
    pub async fn count_items(&self, filter: &ItemFilter) -> Result<i64, AdapterError> {
        let plan = build_items_count(filter)?;
        let args = bind_plan(&plan)?;
        let row = sqlx::query_with(&plan.sql, args)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    /// Describe an allowed table's columns in ordinal order.
    pub async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, AdapterError> {
        introspect::describe_table(&self.pool, &self.policy, table).await
    }
}

/// Convert a Postgres row to a JSON object keyed by column name.
///
/// Columns are decoded by trying concrete types in turn; anything that
/// fails every arm becomes null rather than an error, since arbitrary
/// SELECTs can surface types this gateway never binds itself.
fn row_to_json(row: &PgRow) -> serde_json::Value {
    use bigdecimal::ToPrimitive;
    use serde_json::{Value, json};

    let mut obj = serde_json::Map::new();

    for col in row.columns() {
        let name = col.name();

        let value: Value = if let Ok(v) = row.try_get::<Option<i64>, _>(name) {
            json!(v)
        } else if let Ok(v) = row.try_get::<Option<i32>, _>(name) {
            json!(v)
        } else if let Ok(v) = row.try_get::<Option<f64>, _>(name) {
            json!(v)
        } else if let Ok(v) = row.try_get::<Option<bool>, _>(name) {
            json!(v)
        } else if let Ok(v) = row.try_get::<Option<bigdecimal::BigDecimal>, _>(name) {
            match v {
                Some(d) => d.to_f64().map(|f| json!(f)).unwrap_or(Value::Null),
                None => Value::Null,
            }
        } else if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
            match v {
                Some(d) => json!(d.to_string()),
                None => Value::Null,
            }
        } else if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
            match v {
                Some(ts) => json!(ts.to_string()),
                None => Value::Null,
            }
        } else if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
            match v {
                Some(ts) => json!(ts.to_rfc3339()),
                None => Value::Null,
            }
        } else if let Ok(v) = row.try_get::<Option<String>, _>(name) {
            json!(v)
        } else if let Ok(v) = row.try_get::<Option<serde_json::Value>, _>(name) {
            v.unwrap_or(Value::Null)
        } else {
            Value::Null
        };

        obj.insert(name.to_string(), value);
    }

    serde_json::Value::Object(obj)
}
