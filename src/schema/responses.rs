use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ValidationError;
use super::field::{coerce_work_order_number, parse_clock_in_time};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Pending,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub work_order_collection_id: Option<i64>,
}

impl ClockInResponse {
    pub fn recorded(work_order_collection_id: Option<i64>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: "Clock in recorded".to_string(),
            work_order_collection_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockOutResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl ClockOutResponse {
    /// An incomplete clock-out leaves the work order collection open, so the
    /// terminal shows it as pending rather than done.
    pub fn for_complete(complete: bool) -> Self {
        if complete {
            Self {
                status: ResponseStatus::Success,
                message: "Clock out completed".to_string(),
            }
        } else {
            Self {
                status: ResponseStatus::Pending,
                message: "Clock out pending".to_string(),
            }
        }
    }
}

/// JSON body for every error reply, built by `AppError::error_response`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.to_string(),
        }
    }
}

/// Denormalized view of a user and their currently open work order
/// collection. Everything past the identity fields is optional because the
/// user may not be clocked in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusResponse {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub work_order_collection_id: Option<i64>,
    pub work_order_number: Option<String>,
    pub work_order_assembly_number: Option<i64>,
    pub clock_in_time: Option<NaiveDateTime>,
    pub part_number: Option<String>,
    pub operation_code: Option<String>,
    pub operation_name: Option<String>,
}

impl UserStatusResponse {
    /// Build the response from a status-procedure result row. The row comes
    /// back with mixed column types (legacy numeric work order numbers,
    /// time-only clock-in columns), so the polymorphic coercions apply here.
    pub fn from_row(row: &Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: require_int(row, "user_id")?,
            first_name: require_string(row, "first_name")?,
            last_name: require_string(row, "last_name")?,
            work_order_collection_id: optional_int(row, "work_order_collection_id"),
            work_order_number: coerce_work_order_number(cell(row, "work_order_number")),
            work_order_assembly_number: optional_int(row, "work_order_assembly_number"),
            clock_in_time: parse_clock_in_time(cell(row, "clock_in_time"))?,
            part_number: optional_string(row, "part_number"),
            operation_code: optional_string(row, "operation_code"),
            operation_name: optional_string(row, "operation_name"),
        })
    }
}

fn cell<'a>(row: &'a Map<String, Value>, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

fn require_int(row: &Map<String, Value>, column: &'static str) -> Result<i64, ValidationError> {
    cell(row, column).as_i64().ok_or(ValidationError::Type {
        field: column,
        expected: "an integer",
    })
}

fn require_string(
    row: &Map<String, Value>,
    column: &'static str,
) -> Result<String, ValidationError> {
    match cell(row, column) {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ValidationError::Type {
            field: column,
            expected: "a string",
        }),
    }
}

fn optional_int(row: &Map<String, Value>, column: &str) -> Option<i64> {
    cell(row, column).as_i64()
}

fn optional_string(row: &Map<String, Value>, column: &str) -> Option<String> {
    match cell(row, column) {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
