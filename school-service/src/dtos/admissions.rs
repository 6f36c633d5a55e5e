use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::CredentialedUser;
use crate::models::{AdmissionStatus, Gender, Student};
use crate::services::enrollment::AdmissionSource;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnquiryRequest {
    #[validate(length(min = 1, message = "Child name is required"))]
    pub child_name: String,

    #[validate(length(min = 1, message = "Parent name is required"))]
    pub parent_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub parent_email: String,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    #[validate(length(min = 1, message = "Child name is required"))]
    pub child_name: String,
    pub dob: NaiveDate,
    pub gender: Option<Gender>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub father_phone: Option<String>,
    pub mother_phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub address: Option<String>,
    pub assigned_student_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAdmissionStatusRequest {
    pub status: AdmissionStatus,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    #[validate(length(min = 1, message = "Admission id is required"))]
    pub admission_id: String,
    #[serde(rename = "type")]
    pub source: AdmissionSource,
    pub batch: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnrollResponse {
    pub student: Student,
    /// Password is masked when the parent account already existed.
    pub parent: CredentialedUser,
}
