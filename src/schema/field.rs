//! Per-field coercion rules for the heterogeneous inputs the terminal sends.
//!
//! Values arrive from a device clock, a hand-held scanner keyboard or a
//! database row with mixed column types, so each field carries an explicit
//! ordered list of accepted representations with one coercion function per
//! representation instead of a single schema pass.

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::error::ValidationError;

/// Wire (camelCase) and internal (snake_case) name of a request field.
/// Lookups accept either spelling; errors always report the internal name.
pub(crate) struct Field {
    pub wire: &'static str,
    pub name: &'static str,
}

impl Field {
    pub(crate) const fn new(wire: &'static str, name: &'static str) -> Self {
        Self { wire, name }
    }

    fn get<'a>(&self, obj: &'a Map<String, Value>) -> Option<&'a Value> {
        obj.get(self.wire).or_else(|| obj.get(self.name))
    }

    pub(crate) fn require<'a>(
        &self,
        obj: &'a Map<String, Value>,
    ) -> Result<&'a Value, ValidationError> {
        match self.get(obj) {
            None | Some(Value::Null) => Err(ValidationError::Missing { field: self.name }),
            Some(value) => Ok(value),
        }
    }

    pub(crate) fn optional<'a>(&self, obj: &'a Map<String, Value>) -> Option<&'a Value> {
        self.get(obj).filter(|value| !value.is_null())
    }
}

pub(crate) fn object(raw: &Value) -> Result<&Map<String, Value>, ValidationError> {
    raw.as_object().ok_or(ValidationError::Type {
        field: "body",
        expected: "a JSON object",
    })
}

/// Strict integer. No string coercion here; only `user_id` documents the
/// digit-string representation.
pub(crate) fn int(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    value.as_i64().ok_or(ValidationError::Type {
        field,
        expected: "an integer",
    })
}

pub(crate) fn positive_int(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    let parsed = int(field, value)?;
    ensure_positive(field, parsed)?;
    Ok(parsed)
}

/// User ids arrive either as an integer or as a string of digits (badge
/// scanners send text). Any non-digit string is a format error, never a
/// silent coercion; non-positive values are a range error.
pub(crate) fn user_id(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    match value {
        Value::Number(_) => positive_int(field, value),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
                return Err(ValidationError::Format {
                    field,
                    message: "must contain only digits".to_string(),
                });
            }
            let parsed = trimmed.parse::<i64>().map_err(|_| ValidationError::Format {
                field,
                message: "not a representable integer".to_string(),
            })?;
            ensure_positive(field, parsed)?;
            Ok(parsed)
        }
        _ => Err(ValidationError::Type {
            field,
            expected: "an integer or digit string",
        }),
    }
}

fn ensure_positive(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::Range {
            field,
            message: "must be a positive integer".to_string(),
        });
    }
    Ok(())
}

/// The terminal fleet only runs against division 1 today.
pub(crate) fn division(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    let parsed = int(field, value)?;
    if parsed != 1 {
        return Err(ValidationError::Range {
            field,
            message: "must be 1".to_string(),
        });
    }
    Ok(parsed)
}

/// Quantities keep decimal precision, so the JSON number (or numeric string,
/// the lossless path) goes through its literal text rather than through f64
/// arithmetic.
pub(crate) fn non_negative_decimal(
    field: &'static str,
    value: &Value,
) -> Result<BigDecimal, ValidationError> {
    let parsed = match value {
        Value::Number(n) => {
            BigDecimal::from_str(&n.to_string()).map_err(|_| ValidationError::Format {
                field,
                message: "not a representable decimal".to_string(),
            })?
        }
        Value::String(s) => {
            BigDecimal::from_str(s.trim()).map_err(|_| ValidationError::Format {
                field,
                message: "not a valid decimal string".to_string(),
            })?
        }
        _ => {
            return Err(ValidationError::Type {
                field,
                expected: "a number or numeric string",
            });
        }
    };
    if parsed < BigDecimal::zero() {
        return Err(ValidationError::Range {
            field,
            message: "must not be negative".to_string(),
        });
    }
    Ok(parsed)
}

/// Strict boolean: `1`, `"true"` and friends are rejected.
pub(crate) fn strict_bool(field: &'static str, value: &Value) -> Result<bool, ValidationError> {
    value.as_bool().ok_or(ValidationError::Type {
        field,
        expected: "a boolean",
    })
}

pub(crate) fn string(field: &'static str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ValidationError::Type {
            field,
            expected: "a string",
        }),
    }
}

/// ISO-8601 timestamp. A trailing `Z` is treated as the UTC offset; naive
/// timestamps and bare dates are assumed UTC.
pub(crate) fn iso_datetime(
    field: &'static str,
    value: &Value,
) -> Result<DateTime<Utc>, ValidationError> {
    let text = match value {
        Value::String(s) => s.trim(),
        _ => {
            return Err(ValidationError::Type {
                field,
                expected: "an ISO-8601 datetime string",
            });
        }
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }

    Err(ValidationError::Format {
        field,
        message: "must be a valid ISO 8601 datetime string".to_string(),
    })
}

/// Serialize any non-null work order number to its string form. Legacy rows
/// store the number as an integer, newer ones as text like `AB-1`.
pub fn coerce_work_order_number(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Coerce the mixed representations the status procedure returns for the
/// clock-in column: null/empty means not clocked in, a full timestamp passes
/// through, a bare date gets midnight and a bare time gets the current date.
pub fn parse_clock_in_time(value: &Value) -> Result<Option<NaiveDateTime>, ValidationError> {
    const FIELD: &str = "clock_in_time";

    let text = match value {
        Value::Null => return Ok(None),
        Value::String(s) => s.trim(),
        _ => {
            return Err(ValidationError::Format {
                field: FIELD,
                message: "unsupported clock-in time value".to_string(),
            });
        }
    };

    if text.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(dt.naive_utc()));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Some(naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Some(date.and_time(NaiveTime::MIN)));
    }
    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(text, format) {
            return Ok(Some(Local::now().date_naive().and_time(time)));
        }
    }

    Err(ValidationError::Format {
        field: FIELD,
        message: "unrecognized clock-in time value".to_string(),
    })
}
