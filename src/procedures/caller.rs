use anyhow::Result;
use chrono::NaiveDateTime;
use futures_util::future::BoxFuture;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row};
use thiserror::Error;

use super::params::{NormalizedParams, ParamError, ProcParam, ProcValue, normalize};

/// One result row, keyed by column name. Cells stay as loosely-typed JSON
/// values so the schema layer can apply its own coercions.
pub type ProcRow = Map<String, Value>;

#[derive(Error, Debug)]
pub enum CallError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("stored procedure `{proc}` failed: {source}")]
    Upstream {
        proc: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Structured sink for the normalizer's diagnostic trace. Recording never
/// fails and never affects the procedure call.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, fields: &[(&str, String)]);
}

/// Default sink: one log line per record, warnings for ignored tuple extras.
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&self, fields: &[(&str, String)]) {
        let line = fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        if fields
            .iter()
            .any(|(key, value)| *key == "event" && value == "ignored_extras")
        {
            log::warn!("{line}");
        } else {
            log::debug!("{line}");
        }
    }
}

/// The external stored-procedure collaborator: takes a procedure name and an
/// ordered value list, returns result rows or fails. This layer neither
/// retries nor swallows its errors.
pub trait ProcedureCaller: Send + Sync {
    fn call<'a>(
        &'a self,
        proc_name: &'a str,
        values: &'a [ProcValue],
    ) -> BoxFuture<'a, Result<Vec<ProcRow>>>;
}

/// Normalize `params`, record one diagnostic entry per parameter, then invoke
/// the collaborator. The invocation result is propagated unchanged.
pub async fn call_procedure(
    caller: &dyn ProcedureCaller,
    sink: &dyn DiagnosticSink,
    proc_name: &str,
    params: &[ProcParam],
) -> Result<Vec<ProcRow>, CallError> {
    let NormalizedParams {
        names,
        values,
        dropped_extras,
    } = normalize(params)?;

    for (name, value) in names.iter().zip(&values) {
        sink.record(&[
            ("event", "param".to_string()),
            ("procedure", proc_name.to_string()),
            ("name", name.clone()),
            ("value", value.to_string()),
            ("type", value.type_name().to_string()),
        ]);
    }
    for (name, dropped) in &dropped_extras {
        sink.record(&[
            ("event", "ignored_extras".to_string()),
            ("procedure", proc_name.to_string()),
            ("name", name.clone()),
            ("dropped", dropped.to_string()),
        ]);
    }

    caller
        .call(proc_name, &values)
        .await
        .map_err(|source| CallError::Upstream {
            proc: proc_name.to_string(),
            source,
        })
}

/// Thin sqlx-backed collaborator. Owns nothing beyond the pool handle; no
/// transaction management, no retries.
pub struct SqlxProcedureCaller {
    pool: PgPool,
}

impl SqlxProcedureCaller {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProcedureCaller for SqlxProcedureCaller {
    fn call<'a>(
        &'a self,
        proc_name: &'a str,
        values: &'a [ProcValue],
    ) -> BoxFuture<'a, Result<Vec<ProcRow>>> {
        Box::pin(async move {
            let placeholders = (1..=values.len())
                .map(|i| format!("${i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!("SELECT * FROM {proc_name}({placeholders})");

            let mut query = sqlx::query(&sql);
            for value in values {
                query = match value {
                    ProcValue::Null => query.bind(Option::<String>::None),
                    ProcValue::Bool(b) => query.bind(*b),
                    ProcValue::Int(i) => query.bind(*i),
                    ProcValue::Decimal(d) => query.bind(d.clone()),
                    ProcValue::Text(s) => query.bind(s.clone()),
                    ProcValue::Timestamp(ts) => query.bind(*ts),
                };
            }

            let rows = query.fetch_all(&self.pool).await?;
            Ok(rows.iter().map(row_to_json).collect())
        })
    }
}

fn row_to_json(row: &PgRow) -> ProcRow {
    let mut map = Map::new();
    for column in row.columns() {
        map.insert(column.name().to_string(), cell_to_json(row, column.ordinal()));
    }
    map
}

// Decode through a fallback chain since procedure result sets are not typed
// at compile time. Decimals and timestamps become strings so no precision is
// lost on the way to the schema layer.
fn cell_to_json(row: &PgRow, index: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i16>, _>(index) {
        return v.map_or(Value::Null, Value::from);
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return v.map_or(Value::Null, Value::from);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map_or(Value::Null, Value::from);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v.map_or(Value::Null, Value::from);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v.map_or(Value::Null, Value::from);
    }
    if let Ok(v) = row.try_get::<Option<bigdecimal::BigDecimal>, _>(index) {
        return v.map_or(Value::Null, |d| Value::String(d.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<NaiveDateTime>, _>(index) {
        return v.map_or(Value::Null, |dt| {
            Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        });
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.map_or(Value::Null, Value::String);
    }
    Value::Null
}
