//! Invoice status transitions.
//!
//! PENDING/OVERDUE --pay--> PROCESSING --approve--> PAID. Admins may force
//! any status; OVERDUE is only ever set that way.

use chrono::NaiveDate;
use school_core::error::AppError;

use crate::models::{FeeInvoice, FeeStatus};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invoice is already {0}")]
    AlreadySettled(FeeStatus),
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::Conflict(anyhow::Error::new(err))
    }
}

/// Parent-initiated payment. `millis` stamps the transaction reference.
pub fn begin_payment(
    invoice: &mut FeeInvoice,
    today: NaiveDate,
    millis: i64,
) -> Result<(), TransitionError> {
    if invoice.status.is_active() {
        return Err(TransitionError::AlreadySettled(invoice.status));
    }
    invoice.status = FeeStatus::Processing;
    invoice.payment_date = Some(today);
    invoice.transaction_id = Some(format!("TXN{millis}"));
    Ok(())
}

/// Admin status override.
pub fn override_status(invoice: &mut FeeInvoice, status: FeeStatus, today: NaiveDate, millis: i64) {
    invoice.status = status;
    if status.is_open() {
        invoice.payment_date = None;
        invoice.transaction_id = None;
    } else if invoice.payment_date.is_none() {
        invoice.payment_date = Some(today);
        invoice.transaction_id = Some(format!("MANUAL-{millis}"));
    }
}
