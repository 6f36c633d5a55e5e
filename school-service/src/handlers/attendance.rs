use axum::{
    extract::{Path, State},
    Json,
};
use school_core::error::AppError;
use serde::Serialize;

use super::students::visible_student;
use crate::dtos::MarkAttendanceRequest;
use crate::middleware::AuthUser;
use crate::models::{new_id, AttendanceRecord, Role};
use crate::services::Filter;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

#[derive(Debug, Serialize)]
pub struct MarkAttendanceResponse {
    pub success: bool,
    pub marked: usize,
}

pub async fn student_attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let student = visible_student(&state, &auth, &student_id).await?;
    let mut records = state
        .store
        .attendance
        .find(Filter::all().eq("studentId", &student.id))
        .await?;
    records.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(records))
}

/// Marks a class for one day. Re-marking a student on the same date
/// replaces the earlier mark.
pub async fn mark_attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<MarkAttendanceRequest>,
) -> Result<Json<MarkAttendanceResponse>, AppError> {
    auth.require(&[Role::Admin, Role::Teacher])?;

    let date = payload.date;
    let mut marked = 0;
    for mark in payload.records {
        let existing = state
            .store
            .attendance
            .find_one(
                Filter::all()
                    .eq("studentId", &mark.student_id)
                    .eq("date", date),
            )
            .await?;

        match existing {
            Some(mut record) => {
                record.status = mark.status;
                record.remarks = mark.remarks;
                state.store.attendance.update(&record).await?;
            }
            None => {
                let record = AttendanceRecord {
                    id: new_id(),
                    student_id: mark.student_id,
                    date,
                    status: mark.status,
                    remarks: mark.remarks,
                };
                state.store.attendance.insert(&record).await?;
            }
        }
        marked += 1;
    }

    tracing::info!(%date, marked, marked_by = %auth.user_id, "Attendance marked");
    Ok(Json(MarkAttendanceResponse {
        success: true,
        marked,
    }))
}
