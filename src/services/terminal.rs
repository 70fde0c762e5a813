use std::sync::Arc;

use serde_json::Value;

use crate::error::AppError;
use crate::procedures::{
    DiagnosticSink, LogSink, ProcParam, ProcedureCaller, call_procedure,
};
use crate::schema::{
    ClockInRequest, ClockInResponse, ClockOutRequest, ClockOutResponse, UserStatusResponse,
};

pub const CLOCK_IN_PROC: &str = "dbo.uspClockIn";
pub const CLOCK_OUT_PROC: &str = "dbo.uspClockOut";
pub const USER_STATUS_PROC: &str = "dbo.uspGetUserStatus";

/// Orchestrates validated requests into stored procedure calls. Holds only
/// shared handles; every method is a pure pass from canonical request to
/// procedure invocation, so the service is safe to clone per worker.
#[derive(Clone)]
pub struct TerminalService {
    caller: Arc<dyn ProcedureCaller>,
    sink: Arc<dyn DiagnosticSink>,
}

impl TerminalService {
    pub fn new(caller: Arc<dyn ProcedureCaller>) -> Self {
        Self {
            caller,
            sink: Arc::new(LogSink),
        }
    }

    pub fn with_sink(caller: Arc<dyn ProcedureCaller>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { caller, sink }
    }

    pub async fn clock_in(&self, request: ClockInRequest) -> Result<ClockInResponse, AppError> {
        let params = [
            ProcParam::named("work_order_assembly_id", request.work_order_assembly_id),
            ProcParam::named("user_id", request.user_id),
            ProcParam::named("division_fk", request.division_fk),
            ProcParam::named("device_date", request.device_date),
        ];

        let rows = call_procedure(
            self.caller.as_ref(),
            self.sink.as_ref(),
            CLOCK_IN_PROC,
            &params,
        )
        .await?;

        let work_order_collection_id = rows
            .first()
            .and_then(|row| row.get("work_order_collection_id"))
            .and_then(Value::as_i64);

        Ok(ClockInResponse::recorded(work_order_collection_id))
    }

    pub async fn clock_out(&self, request: ClockOutRequest) -> Result<ClockOutResponse, AppError> {
        let params = [
            ProcParam::named("work_order_collection_id", request.work_order_collection_id),
            ProcParam::named("quantity", request.quantity.clone()),
            ProcParam::named("quantity_scrapped", request.quantity_scrapped.clone()),
            ProcParam::named("scrap_reason_pk", request.scrap_reason_pk),
            ProcParam::named("complete", request.complete),
            ProcParam::named("comment", request.comment.clone()),
            ProcParam::named("device_time", request.device_time),
            ProcParam::named("division_fk", request.division_fk),
        ];

        call_procedure(
            self.caller.as_ref(),
            self.sink.as_ref(),
            CLOCK_OUT_PROC,
            &params,
        )
        .await?;

        Ok(ClockOutResponse::for_complete(request.complete))
    }

    pub async fn user_status(&self, user_id: i64) -> Result<UserStatusResponse, AppError> {
        let params = [ProcParam::named("user_id", user_id)];

        let rows = call_procedure(
            self.caller.as_ref(),
            self.sink.as_ref(),
            USER_STATUS_PROC,
            &params,
        )
        .await?;

        let row = rows
            .first()
            .ok_or_else(|| AppError::NotFound(format!("No status for user {user_id}")))?;

        UserStatusResponse::from_row(row).map_err(|e| {
            AppError::internal_server_error_message(format!("malformed user status row: {e}"))
        })
    }
}
