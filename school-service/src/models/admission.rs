//! Admission enquiries (quick form) and full applications.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::services::repository::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    #[default]
    New,
    Contacted,
    ScheduledVisit,
    Accepted,
    Enrolled,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionEnquiry {
    pub id: String,
    pub child_name: String,
    pub parent_name: String,
    pub parent_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: AdmissionStatus,
    pub created_at: DateTime<Utc>,
}

impl Entity for AdmissionEnquiry {
    const COLLECTION: &'static str = "admission_enquiries";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionApplication {
    pub id: String,
    pub child_name: String,
    pub dob: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_phone: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub status: AdmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_student_id: Option<String>,
    pub submitted_date: NaiveDate,
}

impl AdmissionApplication {
    /// Contact name for the parent account: father first, then mother.
    pub fn guardian_name(&self) -> Option<&str> {
        self.father_name
            .as_deref()
            .or(self.mother_name.as_deref())
            .filter(|n| !n.trim().is_empty())
    }

    pub fn guardian_phone(&self) -> Option<&str> {
        self.father_phone.as_deref().or(self.mother_phone.as_deref())
    }
}

impl Entity for AdmissionApplication {
    const COLLECTION: &'static str = "admission_applications";

    fn id(&self) -> &str {
        &self.id
    }
}
