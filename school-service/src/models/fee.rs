//! Fee invoices as persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fees::FeePeriod;
use crate::services::repository::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeStatus {
    Pending,
    Processing,
    Paid,
    Overdue,
}

impl FeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::Pending => "PENDING",
            FeeStatus::Processing => "PROCESSING",
            FeeStatus::Paid => "PAID",
            FeeStatus::Overdue => "OVERDUE",
        }
    }

    /// Payment has been made or submitted for approval.
    pub fn is_active(&self) -> bool {
        matches!(self, FeeStatus::Paid | FeeStatus::Processing)
    }

    /// Still owed.
    pub fn is_open(&self) -> bool {
        matches!(self, FeeStatus::Pending | FeeStatus::Overdue)
    }
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment schedule a parent pays the annual fee under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeePlan {
    Annual,
    Quarterly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceType {
    Annual,
    Quarterly,
    Monthly,
    #[default]
    Other,
}

impl InvoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::Annual => "ANNUAL",
            InvoiceType::Quarterly => "QUARTERLY",
            InvoiceType::Monthly => "MONTHLY",
            InvoiceType::Other => "OTHER",
        }
    }

    pub fn plan(&self) -> Option<FeePlan> {
        match self {
            InvoiceType::Annual => Some(FeePlan::Annual),
            InvoiceType::Quarterly => Some(FeePlan::Quarterly),
            InvoiceType::Monthly => Some(FeePlan::Monthly),
            InvoiceType::Other => None,
        }
    }
}

impl From<FeePlan> for InvoiceType {
    fn from(plan: FeePlan) -> Self {
        match plan {
            FeePlan::Annual => InvoiceType::Annual,
            FeePlan::Quarterly => InvoiceType::Quarterly,
            FeePlan::Monthly => InvoiceType::Monthly,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeeInvoice {
    pub id: String,
    pub student_id: String,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: FeeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(rename = "type", default)]
    pub fee_type: InvoiceType,
    /// Explicit coverage. Older records only carry it in the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<FeePeriod>,
}

impl FeeInvoice {
    pub fn new(
        student_id: String,
        title: String,
        amount: Decimal,
        due_date: NaiveDate,
        fee_type: InvoiceType,
        period: Option<FeePeriod>,
    ) -> Self {
        Self {
            id: super::new_id(),
            student_id,
            title,
            amount,
            due_date,
            status: FeeStatus::Pending,
            payment_date: None,
            transaction_id: None,
            fee_type,
            period,
        }
    }

    /// Period this invoice settles, from `period` or, for legacy records, the title.
    pub fn coverage(&self) -> Option<FeePeriod> {
        self.period
            .or_else(|| FeePeriod::infer_from_title(self.fee_type, &self.title))
    }
}

impl Entity for FeeInvoice {
    const COLLECTION: &'static str = "fees";

    fn id(&self) -> &str {
        &self.id
    }
}
