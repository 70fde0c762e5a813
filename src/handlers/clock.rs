use actix_web::{HttpResponse, web};
use serde_json::Value;

use crate::AppState;
use crate::error::AppError;
use crate::schema::{validate_clock_in, validate_clock_out};

pub async fn clock_in(
    body: web::Json<Value>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = validate_clock_in(&body)?;

    log::info!(
        "Clock in: user {} on assembly {}",
        request.user_id,
        request.work_order_assembly_id
    );

    let response = state.terminal.clock_in(request).await?;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn clock_out(
    body: web::Json<Value>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = validate_clock_out(&body)?;

    log::info!(
        "Clock out: collection {} (complete: {})",
        request.work_order_collection_id,
        request.complete
    );

    let response = state.terminal.clock_out(request).await?;

    Ok(HttpResponse::Ok().json(response))
}
