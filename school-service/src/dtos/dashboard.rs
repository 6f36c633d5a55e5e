use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Batch, Homework, Notice, Student};

/// One variant per role. The `role` tag tells the client which view to render.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardResponse {
    Admin(AdminDashboard),
    Teacher(TeacherDashboard),
    Parent(ParentDashboard),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_students: u64,
    /// Enquiries and applications still in `new`.
    pub new_admissions: u64,
    /// Invoices awaiting approval (PROCESSING).
    pub pending_approvals: u64,
    pub total_teachers: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRoster {
    pub name: String,
    pub capacity: u32,
    pub students: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDashboard {
    pub batches: Vec<BatchRoster>,
    pub attendance_marked_today: usize,
    pub homework_count: u64,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize, PartialEq, Eq, Default)]
pub struct AttendanceSummary {
    pub present: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentDashboard {
    pub child: Option<Student>,
    pub batch: Option<Batch>,
    pub attendance: AttendanceSummary,
    pub homework: Vec<Homework>,
    pub notices: Vec<Notice>,
    #[serde(with = "rust_decimal::serde::float")]
    pub outstanding_fees: Decimal,
}
