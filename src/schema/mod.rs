//! Request and response schemas for the terminal endpoints.
//!
//! The validator rejects malformed input before any stored procedure is
//! invoked and normalizes accepted input into canonical typed form.

mod error;
mod field;
mod requests;
mod responses;

pub use error::ValidationError;
pub use field::{coerce_work_order_number, parse_clock_in_time};
pub use requests::{ClockInRequest, ClockOutRequest, validate_clock_in, validate_clock_out};
pub use responses::{
    ClockInResponse, ClockOutResponse, ErrorResponse, ResponseStatus, UserStatusResponse,
};
