use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::fees::FeePeriod;
use crate::models::{FeePlan, FeeStatus, InvoiceType};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeRequest {
    #[validate(length(min = 1, message = "Student id is required"))]
    pub student_id: String,

    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    pub due_date: NaiveDate,

    #[serde(rename = "type", default)]
    pub fee_type: InvoiceType,

    pub period: Option<FeePeriod>,
}

impl CreateFeeRequest {
    pub fn check_amount(&self) -> Result<(), ValidationErrors> {
        super::check_non_negative("amount", Some(self.amount))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFeeStatusRequest {
    pub status: FeeStatus,
}

#[derive(Debug, Deserialize)]
pub struct FeePlanQuery {
    pub plan: Option<FeePlan>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PayPeriodRequest {
    pub period: FeePeriod,
}
