use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::error::AppError;
use crate::schema::ValidationError;

pub async fn user_status(
    path: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    if user_id <= 0 {
        return Err(ValidationError::Range {
            field: "user_id",
            message: "must be a positive integer".to_string(),
        }
        .into());
    }

    let status = state.terminal.user_status(user_id).await?;

    Ok(HttpResponse::Ok().json(status))
}
