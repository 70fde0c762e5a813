//! Stored-procedure invocation: parameter normalization, the diagnostic
//! trace, and the thin database-backed caller.

mod caller;
mod params;

pub use caller::{
    CallError, DiagnosticSink, LogSink, ProcRow, ProcedureCaller, SqlxProcedureCaller,
    call_procedure,
};
pub use params::{NormalizedParams, ParamError, ProcParam, ProcValue, normalize};

use anyhow::Result;
use sqlx::PgPool;

pub async fn connect_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPool::connect(database_url).await?;
    Ok(pool)
}
