//! Invoices and derived fee plans.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use school_core::error::AppError;

use super::students::visible_student;
use crate::dtos::{
    CreateFeeRequest, FeePlanQuery, MessageResponse, PayPeriodRequest, UpdateFeeStatusRequest,
};
use crate::fees::{begin_payment, override_status, FeePlanView};
use crate::middleware::AuthUser;
use crate::models::{FeeInvoice, FeePlan, Role};
use crate::services::{fee_plans, record_fee_payment, Filter};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn list_fees(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<FeeInvoice>>, AppError> {
    auth.require(&[Role::Admin])?;
    Ok(Json(state.store.fees.find(Filter::all()).await?))
}

pub async fn student_fees(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<FeeInvoice>>, AppError> {
    let student = visible_student(&state, &auth, &student_id).await?;
    let invoices = state
        .store
        .fees
        .find(Filter::all().eq("studentId", &student.id))
        .await?;
    Ok(Json(invoices))
}

pub async fn create_fee(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateFeeRequest>,
) -> Result<(StatusCode, Json<FeeInvoice>), AppError> {
    auth.require(&[Role::Admin])?;
    payload.check_amount()?;

    if state.store.students.get(&payload.student_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!("Student not found")));
    }

    let invoice = FeeInvoice::new(
        payload.student_id,
        payload.title,
        payload.amount,
        payload.due_date,
        payload.fee_type,
        payload.period,
    );
    state.store.fees.insert(&invoice).await?;

    tracing::info!(
        invoice_id = %invoice.id,
        student_id = %invoice.student_id,
        amount = %invoice.amount,
        "Invoice created"
    );
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// Simulated payment: PENDING/OVERDUE to PROCESSING, pending admin approval.
pub async fn pay_fee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FeeInvoice>, AppError> {
    auth.require(&[Role::Admin, Role::Parent])?;

    let mut invoice = find_invoice(&state, &id).await?;
    visible_student(&state, &auth, &invoice.student_id).await?;
    fee_plans::ensure_payable(&state.store, &invoice).await?;

    begin_payment(&mut invoice, state.clock.today(), state.clock.millis())?;
    state.store.fees.update(&invoice).await?;
    record_fee_payment(invoice.fee_type.as_str(), "invoice");

    tracing::info!(
        invoice_id = %invoice.id,
        transaction_id = ?invoice.transaction_id,
        "Invoice payment submitted"
    );
    Ok(Json(invoice))
}

/// Admin override, including approval (PROCESSING to PAID).
pub async fn update_fee_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateFeeStatusRequest>,
) -> Result<Json<FeeInvoice>, AppError> {
    auth.require(&[Role::Admin])?;

    let mut invoice = find_invoice(&state, &id).await?;
    let previous = invoice.status;
    override_status(
        &mut invoice,
        payload.status,
        state.clock.today(),
        state.clock.millis(),
    );
    state.store.fees.update(&invoice).await?;

    tracing::info!(
        invoice_id = %invoice.id,
        from = %previous,
        to = %invoice.status,
        "Invoice status overridden"
    );
    Ok(Json(invoice))
}

pub async fn delete_fee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth.require(&[Role::Admin])?;

    if !state.store.fees.delete(&id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Invoice not found")));
    }
    tracing::info!(invoice_id = %id, "Invoice deleted");
    Ok(Json(MessageResponse::new("Deleted")))
}

/// Rows the student can pay under a plan. Defaults to the student's chosen
/// plan, then monthly.
pub async fn fee_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<String>,
    Query(query): Query<FeePlanQuery>,
) -> Result<Json<FeePlanView>, AppError> {
    auth.require(&[Role::Admin, Role::Parent])?;

    let student = visible_student(&state, &auth, &student_id).await?;
    let plan = query
        .plan
        .or(student.fee_plan)
        .unwrap_or(FeePlan::Monthly);

    let view = fee_plans::plan_view(&state.store, &student, plan, state.clock.as_ref()).await?;
    Ok(Json(view))
}

pub async fn pay_fee_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<PayPeriodRequest>,
) -> Result<Json<FeeInvoice>, AppError> {
    auth.require(&[Role::Admin, Role::Parent])?;

    let student = visible_student(&state, &auth, &student_id).await?;
    let invoice =
        fee_plans::pay_period(&state.store, &student, payload.period, state.clock.as_ref()).await?;
    Ok(Json(invoice))
}

async fn find_invoice(state: &AppState, id: &str) -> Result<FeeInvoice, AppError> {
    state
        .store
        .fees
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))
}
