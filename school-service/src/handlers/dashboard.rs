//! One dashboard per role.

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use school_core::error::AppError;

use crate::dtos::{
    AdminDashboard, AttendanceSummary, BatchRoster, DashboardResponse, ParentDashboard,
    TeacherDashboard,
};
use crate::middleware::AuthUser;
use crate::models::{
    AdmissionStatus, AttendanceStatus, FeeInvoice, FeeStatus, Notice, NoticeCategory,
    NoticePriority, NoticeVisibility, Role,
};
use crate::services::Filter;
use crate::startup::AppState;

const FEE_REMINDER_ID: &str = "virtual-fee-reminder";

pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let response = match auth.role {
        Role::Admin => DashboardResponse::Admin(admin_dashboard(&state).await?),
        Role::Teacher => DashboardResponse::Teacher(teacher_dashboard(&state).await?),
        Role::Parent => DashboardResponse::Parent(parent_dashboard(&state, &auth).await?),
    };
    Ok(Json(response))
}

async fn admin_dashboard(state: &AppState) -> Result<AdminDashboard, AppError> {
    let store = &state.store;
    let new = || Filter::all().eq("status", AdmissionStatus::New);

    Ok(AdminDashboard {
        total_students: store.students.count(Filter::all()).await?,
        new_admissions: store.enquiries.count(new()).await?
            + store.applications.count(new()).await?,
        pending_approvals: store
            .fees
            .count(Filter::all().eq("status", FeeStatus::Processing))
            .await?,
        total_teachers: store
            .users
            .count(Filter::all().eq("role", Role::Teacher))
            .await?,
    })
}

async fn teacher_dashboard(state: &AppState) -> Result<TeacherDashboard, AppError> {
    let store = &state.store;
    let students = store.students.find(Filter::all()).await?;

    let batches = store
        .batches
        .find(Filter::all())
        .await?
        .into_iter()
        .map(|batch| BatchRoster {
            students: students.iter().filter(|s| s.batch == batch.name).count(),
            name: batch.name,
            capacity: batch.capacity,
        })
        .collect();

    let attendance_marked_today = store
        .attendance
        .find(Filter::all().eq("date", state.clock.today()))
        .await?
        .len();

    Ok(TeacherDashboard {
        batches,
        attendance_marked_today,
        homework_count: store.homework.count(Filter::all()).await?,
        notices: visible_notices(state, Role::Teacher).await?,
    })
}

async fn parent_dashboard(state: &AppState, auth: &AuthUser) -> Result<ParentDashboard, AppError> {
    let store = &state.store;
    let mut notices = visible_notices(state, Role::Parent).await?;

    let Some(child) = store
        .students
        .find_one(Filter::all().eq("parentId", &auth.user_id))
        .await?
    else {
        return Ok(ParentDashboard {
            child: None,
            batch: None,
            attendance: AttendanceSummary::default(),
            homework: Vec::new(),
            notices,
            outstanding_fees: Decimal::ZERO,
        });
    };

    let batch = store
        .batches
        .find_one(Filter::all().eq("name", &child.batch))
        .await?;

    let records = store
        .attendance
        .find(Filter::all().eq("studentId", &child.id))
        .await?;
    let attendance = AttendanceSummary {
        present: records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count(),
        total: records.len(),
    };

    let homework = store
        .homework
        .find(Filter::all().eq("batch", &child.batch))
        .await?;

    let invoices = store
        .fees
        .find(Filter::all().eq("studentId", &child.id))
        .await?;
    let outstanding_fees = outstanding(&invoices);
    if !outstanding_fees.is_zero() {
        notices.insert(0, fee_reminder(outstanding_fees, state));
    }

    Ok(ParentDashboard {
        child: Some(child),
        batch,
        attendance,
        homework,
        notices,
        outstanding_fees,
    })
}

async fn visible_notices(state: &AppState, role: Role) -> Result<Vec<Notice>, AppError> {
    let mut notices: Vec<Notice> = state
        .store
        .notices
        .find(Filter::all())
        .await?
        .into_iter()
        .filter(|n| n.visible_to(Some(role)))
        .collect();
    notices.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(notices)
}

/// Sum of PENDING and OVERDUE invoices.
fn outstanding(invoices: &[FeeInvoice]) -> Decimal {
    invoices
        .iter()
        .filter(|i| i.status.is_open())
        .map(|i| i.amount)
        .sum()
}

/// Not stored; rebuilt on every dashboard read.
fn fee_reminder(total: Decimal, state: &AppState) -> Notice {
    Notice {
        id: FEE_REMINDER_ID.to_string(),
        title: "Monthly Fee Payment Reminder".to_string(),
        content: format!(
            "Dear Parent, please note that there are outstanding fees totaling ₹{}. \
             Kindly make the payment at your earliest convenience to ensure \
             uninterrupted services. Click 'Pay Now' to view details.",
            total.normalize()
        ),
        date: state.clock.today(),
        visibility: NoticeVisibility::Parents,
        priority: NoticePriority::Urgent,
        category: NoticeCategory::FeeReminder,
        read_by: Vec::new(),
    }
}
