pub mod admission;
pub mod attendance;
pub mod batch;
pub mod fee;
pub mod homework;
pub mod landing;
pub mod notice;
pub mod student;
pub mod user;

pub use admission::{AdmissionApplication, AdmissionEnquiry, AdmissionStatus, Gender};
pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use batch::{default_capacity, Batch};
pub use fee::{FeeInvoice, FeePlan, FeeStatus, InvoiceType};
pub use homework::Homework;
pub use landing::{LandingConfig, LANDING_CONFIG_ID};
pub use notice::{Notice, NoticeCategory, NoticePriority, NoticeVisibility};
pub use student::Student;
pub use user::{normalize_email, Role, User, UserResponse};

/// Identifier for documents whose id is not chosen by a person.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
