//! Fee plan reads and payments against the store.

use school_core::error::AppError;

use super::clock::Clock;
use super::metrics::record_fee_payment;
use super::repository::Filter;
use super::store::Store;
use crate::fees::{
    begin_payment, derive_plan, AcademicSession, FeePeriod, FeePlanView, PaymentAnalysis,
};
use crate::models::{FeeInvoice, FeePlan, Student};

/// Derived plan view for `student` as of today.
pub async fn plan_view(
    store: &Store,
    student: &Student,
    plan: FeePlan,
    clock: &dyn Clock,
) -> Result<FeePlanView, AppError> {
    let today = clock.today();
    let invoices = store
        .fees
        .find(Filter::all().eq("studentId", &student.id))
        .await?;
    let Some(batch) = store
        .batches
        .find_one(Filter::all().eq("name", &student.batch))
        .await?
    else {
        tracing::warn!(student_id = %student.id, batch = %student.batch, "Student batch not found");
        return Ok(FeePlanView::empty(plan, &invoices, today));
    };

    Ok(derive_plan(batch.fee_amount, &invoices, plan, today))
}

/// Refuses a stored invoice whose period is already covered by a payment
/// under another plan in the same session.
pub async fn ensure_payable(store: &Store, invoice: &FeeInvoice) -> Result<(), AppError> {
    let Some(period) = invoice.coverage() else {
        return Ok(());
    };
    let invoices = store
        .fees
        .find(Filter::all().eq("studentId", &invoice.student_id))
        .await?;
    let session = AcademicSession::for_date(invoice.due_date);
    match PaymentAnalysis::of(&invoices, &session).block_reason(period) {
        Some(reason) => {
            tracing::warn!(invoice_id = %invoice.id, reason = %reason, "Blocked invoice payment");
            Err(AppError::Conflict(anyhow::anyhow!("{}", reason)))
        }
        None => Ok(()),
    }
}

/// Pay the row for `period` in the student's current plan view. A virtual
/// row is stored as a pending invoice first.
pub async fn pay_period(
    store: &Store,
    student: &Student,
    period: FeePeriod,
    clock: &dyn Clock,
) -> Result<FeeInvoice, AppError> {
    let plan = period.plan();
    let view = plan_view(store, student, plan, clock).await?;
    let row = view.row_for(period).ok_or_else(|| {
        AppError::NotFound(anyhow::anyhow!(
            "No {} row in the {} fee plan",
            period,
            view.session.label()
        ))
    })?;

    if let Some(reason) = row.blocked_reason {
        return Err(AppError::Conflict(anyhow::anyhow!("{}", reason)));
    }

    let mut invoice = match &row.invoice_id {
        Some(id) => store.fees.get(id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id))
        })?,
        None => {
            let invoice = FeeInvoice::new(
                student.id.clone(),
                row.title.clone(),
                row.amount,
                row.due_date,
                row.fee_type,
                Some(period),
            );
            store.fees.insert(&invoice).await?;
            tracing::info!(invoice_id = %invoice.id, student_id = %student.id, period = %period, "Materialized fee plan row");
            invoice
        }
    };

    begin_payment(&mut invoice, clock.today(), clock.millis())?;
    store.fees.update(&invoice).await?;
    record_fee_payment(invoice.fee_type.as_str(), "plan");

    if student.fee_plan.is_none() {
        let mut updated = student.clone();
        updated.fee_plan = Some(plan);
        store.students.update(&updated).await?;
    }

    tracing::info!(
        invoice_id = %invoice.id,
        student_id = %student.id,
        transaction_id = ?invoice.transaction_id,
        "Fee plan payment submitted"
    );
    Ok(invoice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::Quarter;
    use crate::models::{Batch, FeeStatus};
    use crate::services::clock::FixedClock;
    use chrono::{Month, NaiveDate};
    use rust_decimal::Decimal;

    async fn setup(today: NaiveDate) -> (Store, Student, FixedClock) {
        let store = Store::in_memory();
        store
            .batches
            .insert(&Batch {
                id: "b1".into(),
                name: "Nursery".into(),
                capacity: 20,
                fee_amount: Decimal::from(15000),
                description: None,
                age_group: None,
            })
            .await
            .unwrap();
        let student = Student {
            id: "STUD000001".into(),
            name: "Kiara".into(),
            batch: "Nursery".into(),
            parent_id: "p1".into(),
            enrollment_date: today,
            father_name: None,
            mother_name: None,
            contact_number: None,
            address: None,
            profile_picture: None,
            fee_plan: None,
        };
        store.students.insert(&student).await.unwrap();
        (store, student, FixedClock::on(today))
    }

    #[tokio::test]
    async fn test_paying_virtual_row_persists_processing_invoice() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let (store, student, clock) = setup(today).await;

        let invoice = pay_period(&store, &student, FeePeriod::Month(Month::April), &clock)
            .await
            .unwrap();
        assert_eq!(invoice.status, FeeStatus::Processing);
        assert_eq!(invoice.amount, Decimal::from(1250));
        assert_eq!(invoice.period, Some(FeePeriod::Month(Month::April)));
        assert_eq!(invoice.payment_date, Some(today));

        let stored = store.fees.get(&invoice.id).await.unwrap().unwrap();
        assert_eq!(stored.status, FeeStatus::Processing);

        let student = store.students.get("STUD000001").await.unwrap().unwrap();
        assert_eq!(student.fee_plan, Some(FeePlan::Monthly));
    }

    #[tokio::test]
    async fn test_blocked_row_is_conflict() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let (store, student, clock) = setup(today).await;
        pay_period(&store, &student, FeePeriod::Month(Month::April), &clock)
            .await
            .unwrap();

        let err = pay_period(&store, &student, FeePeriod::Quarter(Quarter::Q1), &clock)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(err.to_string().contains("Apr is already paid via Monthly Plan"));
    }

    #[tokio::test]
    async fn test_any_paid_month_blocks_its_quarter() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let (store, student, clock) = setup(today).await;
        pay_period(&store, &student, FeePeriod::Month(Month::May), &clock)
            .await
            .unwrap();

        let err = pay_period(&store, &student, FeePeriod::Quarter(Quarter::Q1), &clock)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(err.to_string().contains("May is already paid via Monthly Plan"));
    }

    #[tokio::test]
    async fn test_stored_invoice_covered_by_annual_is_not_payable() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let (store, student, clock) = setup(today).await;
        let may = FeeInvoice::new(
            student.id.clone(),
            "Tuition Fee - May 2024".into(),
            Decimal::from(1250),
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            crate::models::InvoiceType::Monthly,
            Some(FeePeriod::Month(Month::May)),
        );
        store.fees.insert(&may).await.unwrap();
        ensure_payable(&store, &may).await.unwrap();

        pay_period(&store, &student, FeePeriod::Session, &clock)
            .await
            .unwrap();
        let err = ensure_payable(&store, &may).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(err.to_string().contains("Full session paid via Annual Plan."));
    }

    #[tokio::test]
    async fn test_future_row_is_not_found() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let (store, student, clock) = setup(today).await;
        let err = pay_period(&store, &student, FeePeriod::Month(Month::June), &clock)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_paying_twice_is_conflict() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let (store, student, clock) = setup(today).await;
        pay_period(&store, &student, FeePeriod::Session, &clock)
            .await
            .unwrap();
        let err = pay_period(&store, &student, FeePeriod::Session, &clock)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_batch_gives_empty_view() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let (store, mut student, clock) = setup(today).await;
        student.batch = "Kindergarten".into();
        let view = plan_view(&store, &student, FeePlan::Monthly, &clock).await.unwrap();
        assert!(view.rows.is_empty());
    }
}
