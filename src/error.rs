use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::procedures::{CallError, ParamError};
use crate::schema::{ErrorResponse, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidParameterShape(#[from] ParamError),

    #[error("Stored procedure call failed: {0}")]
    Upstream(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidParameterShape(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        log::error!(
            "Request failed with status {}: {}",
            status_code,
            error_message
        );

        HttpResponse::build(status_code).json(ErrorResponse::new(&error_message))
    }
}

impl From<CallError> for AppError {
    fn from(error: CallError) -> Self {
        match error {
            CallError::Param(param_error) => AppError::InvalidParameterShape(param_error),
            CallError::Upstream { proc, source } => {
                log::error!("Stored procedure `{}` failed: {}", proc, source);
                AppError::Upstream(source)
            }
        }
    }
}

impl AppError {
    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }
}
