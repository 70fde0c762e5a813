use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ValidationError;
use super::field::{self, Field};

// Alias tables: wire name first, internal name second. Validation accepts
// either spelling; serde handles the camelCase side for outbound bodies.
const WORK_ORDER_ASSEMBLY_ID: Field = Field::new("workOrderAssemblyId", "work_order_assembly_id");
const USER_ID: Field = Field::new("userId", "user_id");
const DIVISION_FK: Field = Field::new("divisionFK", "division_fk");
const DEVICE_DATE: Field = Field::new("deviceDate", "device_date");

const WORK_ORDER_COLLECTION_ID: Field =
    Field::new("workOrderCollectionId", "work_order_collection_id");
const QUANTITY: Field = Field::new("quantity", "quantity");
const QUANTITY_SCRAPPED: Field = Field::new("quantityScrapped", "quantity_scrapped");
const SCRAP_REASON_PK: Field = Field::new("scrapReasonPK", "scrap_reason_pk");
const COMPLETE: Field = Field::new("complete", "complete");
const COMMENT: Field = Field::new("comment", "comment");
const DEVICE_TIME: Field = Field::new("deviceTime", "device_time");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClockInRequest {
    pub work_order_assembly_id: i64,
    pub user_id: i64,
    #[serde(rename = "divisionFK")]
    pub division_fk: i64,
    pub device_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutRequest {
    pub work_order_collection_id: i64,
    pub quantity: BigDecimal,
    pub quantity_scrapped: BigDecimal,
    #[serde(rename = "scrapReasonPK")]
    pub scrap_reason_pk: i64,
    pub complete: bool,
    pub comment: Option<String>,
    pub device_time: Option<DateTime<Utc>>,
    #[serde(rename = "divisionFK")]
    pub division_fk: i64,
}

/// Validate a raw clock-in body into its canonical typed form. Fails before
/// any side-effecting call: missing/mis-shaped fields are type errors, a
/// non-positive user id is a range error, a non-digit user id string or an
/// unparseable device date is a format error.
pub fn validate_clock_in(raw: &Value) -> Result<ClockInRequest, ValidationError> {
    let obj = field::object(raw)?;

    Ok(ClockInRequest {
        work_order_assembly_id: field::positive_int(
            WORK_ORDER_ASSEMBLY_ID.name,
            WORK_ORDER_ASSEMBLY_ID.require(obj)?,
        )?,
        user_id: field::user_id(USER_ID.name, USER_ID.require(obj)?)?,
        division_fk: field::division(DIVISION_FK.name, DIVISION_FK.require(obj)?)?,
        device_date: DEVICE_DATE
            .optional(obj)
            .map(|value| field::iso_datetime(DEVICE_DATE.name, value))
            .transpose()?,
    })
}

/// Validate a raw clock-out body. Quantities keep decimal precision and must
/// not be negative; `complete` is a strict boolean; `device_time` follows the
/// same ISO-8601 rule as the clock-in device date.
pub fn validate_clock_out(raw: &Value) -> Result<ClockOutRequest, ValidationError> {
    let obj = field::object(raw)?;

    Ok(ClockOutRequest {
        work_order_collection_id: field::int(
            WORK_ORDER_COLLECTION_ID.name,
            WORK_ORDER_COLLECTION_ID.require(obj)?,
        )?,
        quantity: field::non_negative_decimal(QUANTITY.name, QUANTITY.require(obj)?)?,
        quantity_scrapped: field::non_negative_decimal(
            QUANTITY_SCRAPPED.name,
            QUANTITY_SCRAPPED.require(obj)?,
        )?,
        scrap_reason_pk: field::int(SCRAP_REASON_PK.name, SCRAP_REASON_PK.require(obj)?)?,
        complete: field::strict_bool(COMPLETE.name, COMPLETE.require(obj)?)?,
        comment: COMMENT
            .optional(obj)
            .map(|value| field::string(COMMENT.name, value))
            .transpose()?,
        device_time: DEVICE_TIME
            .optional(obj)
            .map(|value| field::iso_datetime(DEVICE_TIME.name, value))
            .transpose()?,
        division_fk: field::division(DIVISION_FK.name, DIVISION_FK.require(obj)?)?,
    })
}
