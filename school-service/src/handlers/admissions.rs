use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use school_core::error::AppError;

use crate::dtos::{
    CreateApplicationRequest, CreateEnquiryRequest, CredentialedUser, EnrollRequest,
    EnrollResponse, UpdateAdmissionStatusRequest,
};
use crate::middleware::AuthUser;
use crate::models::{new_id, AdmissionApplication, AdmissionEnquiry, AdmissionStatus, Role};
use crate::services::{enrollment, Filter};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

const MASKED_PASSWORD: &str = "******";

pub async fn list_enquiries(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AdmissionEnquiry>>, AppError> {
    auth.require(&[Role::Admin])?;
    Ok(Json(state.store.enquiries.find(Filter::all()).await?))
}

/// Public quick-enquiry form.
pub async fn create_enquiry(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateEnquiryRequest>,
) -> Result<(StatusCode, Json<AdmissionEnquiry>), AppError> {
    let enquiry = AdmissionEnquiry {
        id: new_id(),
        child_name: payload.child_name,
        parent_name: payload.parent_name,
        parent_email: payload.parent_email,
        notes: payload.notes,
        status: AdmissionStatus::New,
        created_at: Utc::now(),
    };
    state.store.enquiries.insert(&enquiry).await?;

    // No mail transport; the admin notification is a log line.
    tracing::info!(
        enquiry_id = %enquiry.id,
        child_name = %enquiry.child_name,
        parent_email = %enquiry.parent_email,
        "New admission enquiry, notifying admin"
    );
    Ok((StatusCode::CREATED, Json(enquiry)))
}

pub async fn update_enquiry_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateAdmissionStatusRequest>,
) -> Result<Json<AdmissionEnquiry>, AppError> {
    auth.require(&[Role::Admin])?;

    let mut enquiry = state
        .store
        .enquiries
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Enquiry not found")))?;
    enquiry.status = payload.status;
    state.store.enquiries.update(&enquiry).await?;

    tracing::info!(enquiry_id = %enquiry.id, status = ?enquiry.status, "Enquiry status updated");
    Ok(Json(enquiry))
}

pub async fn list_applications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AdmissionApplication>>, AppError> {
    auth.require(&[Role::Admin])?;
    Ok(Json(state.store.applications.find(Filter::all()).await?))
}

/// Public full application form.
pub async fn create_application(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<AdmissionApplication>), AppError> {
    let application = AdmissionApplication {
        id: new_id(),
        child_name: payload.child_name,
        dob: payload.dob,
        gender: payload.gender,
        father_name: payload.father_name,
        mother_name: payload.mother_name,
        father_phone: payload.father_phone,
        mother_phone: payload.mother_phone,
        email: payload.email,
        address: payload.address,
        status: AdmissionStatus::New,
        assigned_student_id: payload.assigned_student_id,
        submitted_date: state.clock.today(),
    };
    state.store.applications.insert(&application).await?;

    tracing::info!(application_id = %application.id, "Admission application submitted");
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn enroll(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<EnrollRequest>,
) -> Result<(StatusCode, Json<EnrollResponse>), AppError> {
    auth.require(&[Role::Admin])?;

    let enrollment = enrollment::enroll(
        &state.store,
        &payload.admission_id,
        payload.source,
        payload.batch,
        state.clock.as_ref(),
    )
    .await?;

    let password = enrollment
        .generated_password
        .as_ref()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| MASKED_PASSWORD.to_string());

    Ok((
        StatusCode::CREATED,
        Json(EnrollResponse {
            student: enrollment.student,
            parent: CredentialedUser {
                user: enrollment.parent.sanitized(),
                password,
            },
        }),
    ))
}
