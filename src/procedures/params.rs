use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Value passed positionally to a stored procedure. A small tagged union
/// instead of a driver type so the normalizer and its diagnostics stay
/// independent of the database crate.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(BigDecimal),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl ProcValue {
    /// Runtime type name, used in the per-parameter diagnostic trace.
    pub fn type_name(&self) -> &'static str {
        match self {
            ProcValue::Null => "null",
            ProcValue::Bool(_) => "bool",
            ProcValue::Int(_) => "int",
            ProcValue::Decimal(_) => "decimal",
            ProcValue::Text(_) => "str",
            ProcValue::Timestamp(_) => "timestamp",
        }
    }
}

impl fmt::Display for ProcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcValue::Null => write!(f, "NULL"),
            ProcValue::Bool(b) => write!(f, "{b}"),
            ProcValue::Int(i) => write!(f, "{i}"),
            ProcValue::Decimal(d) => write!(f, "{d}"),
            ProcValue::Text(s) => write!(f, "{s:?}"),
            ProcValue::Timestamp(ts) => {
                write!(f, "{}", ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
        }
    }
}

impl From<bool> for ProcValue {
    fn from(value: bool) -> Self {
        ProcValue::Bool(value)
    }
}

impl From<i64> for ProcValue {
    fn from(value: i64) -> Self {
        ProcValue::Int(value)
    }
}

impl From<i32> for ProcValue {
    fn from(value: i32) -> Self {
        ProcValue::Int(value as i64)
    }
}

impl From<BigDecimal> for ProcValue {
    fn from(value: BigDecimal) -> Self {
        ProcValue::Decimal(value)
    }
}

impl From<&str> for ProcValue {
    fn from(value: &str) -> Self {
        ProcValue::Text(value.to_string())
    }
}

impl From<String> for ProcValue {
    fn from(value: String) -> Self {
        ProcValue::Text(value)
    }
}

impl From<DateTime<Utc>> for ProcValue {
    fn from(value: DateTime<Utc>) -> Self {
        ProcValue::Timestamp(value)
    }
}

impl<T: Into<ProcValue>> From<Option<T>> for ProcValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ProcValue::Null, Into::into)
    }
}

/// One caller-supplied parameter: either a bare value or a tuple whose first
/// element is the name and second the value.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcParam {
    Bare(ProcValue),
    Tuple(Vec<ProcValue>),
}

impl ProcParam {
    pub fn bare(value: impl Into<ProcValue>) -> Self {
        ProcParam::Bare(value.into())
    }

    pub fn named(name: &str, value: impl Into<ProcValue>) -> Self {
        ProcParam::Tuple(vec![ProcValue::Text(name.to_string()), value.into()])
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("parameter tuple must have at least two items (name, value)")]
    InvalidShape,
}

/// Ordered positional parameters ready for a procedure call, plus the names
/// that go into the diagnostic trace. Order is exactly the caller's order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedParams {
    pub names: Vec<String>,
    pub values: Vec<ProcValue>,
    /// (parameter name, trailing tuple elements dropped). Extras have always
    /// been ignored by callers of this shape; they are surfaced as warning
    /// diagnostics rather than guessed at.
    pub dropped_extras: Vec<(String, usize)>,
}

/// Flatten a heterogeneous parameter list into positional values. Tuples
/// contribute (name, value); bare values get a synthetic `arg<index>` name
/// from their zero-based position.
pub fn normalize(params: &[ProcParam]) -> Result<NormalizedParams, ParamError> {
    let mut names = Vec::with_capacity(params.len());
    let mut values = Vec::with_capacity(params.len());
    let mut dropped_extras = Vec::new();

    for (index, param) in params.iter().enumerate() {
        match param {
            ProcParam::Bare(value) => {
                names.push(format!("arg{index}"));
                values.push(value.clone());
            }
            ProcParam::Tuple(items) => {
                if items.len() < 2 {
                    return Err(ParamError::InvalidShape);
                }
                let name = match &items[0] {
                    ProcValue::Text(s) => s.clone(),
                    other => other.to_string(),
                };
                if items.len() > 2 {
                    dropped_extras.push((name.clone(), items.len() - 2));
                }
                names.push(name);
                values.push(items[1].clone());
            }
        }
    }

    Ok(NormalizedParams {
        names,
        values,
        dropped_extras,
    })
}
