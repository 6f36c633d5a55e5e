//! Turning an admission (quick enquiry or full application) into a student
//! with a parent account.

use school_core::error::AppError;
use serde::Deserialize;

use super::clock::Clock;
use super::repository::Filter;
use super::store::Store;
use crate::models::user::normalize_email;
use crate::models::{AdmissionStatus, Role, Student, User};
use crate::utils::{generate_password, hash_password, Password};

pub const DEFAULT_BATCH: &str = "Playgroup";

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionSource {
    Enquiry,
    Application,
}

#[derive(Debug)]
pub struct Enrollment {
    pub student: Student,
    pub parent: User,
    /// Set only when the parent account was created by this enrolment.
    pub generated_password: Option<Password>,
}

struct Applicant {
    child_name: String,
    parent_name: String,
    parent_email: String,
    father_name: Option<String>,
    mother_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    assigned_id: Option<String>,
}

/// `STUD` plus the last six digits of the epoch millis.
pub fn generated_student_id(millis: i64) -> String {
    format!("STUD{:06}", millis.rem_euclid(1_000_000))
}

pub async fn enroll(
    store: &Store,
    admission_id: &str,
    source: AdmissionSource,
    batch: Option<String>,
    clock: &dyn Clock,
) -> Result<Enrollment, AppError> {
    let applicant = match source {
        AdmissionSource::Enquiry => {
            let enquiry = store.enquiries.get(admission_id).await?.ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Enquiry not found"))
            })?;
            ensure_not_enrolled(enquiry.status)?;
            Applicant {
                child_name: enquiry.child_name,
                parent_name: enquiry.parent_name,
                parent_email: enquiry.parent_email,
                father_name: None,
                mother_name: None,
                phone: None,
                address: None,
                assigned_id: None,
            }
        }
        AdmissionSource::Application => {
            let application = store.applications.get(admission_id).await?.ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Application not found"))
            })?;
            ensure_not_enrolled(application.status)?;
            Applicant {
                parent_name: application.guardian_name().unwrap_or("Parent").to_string(),
                phone: application.guardian_phone().map(str::to_string),
                child_name: application.child_name,
                parent_email: application.email,
                father_name: application.father_name,
                mother_name: application.mother_name,
                address: application.address,
                assigned_id: application.assigned_student_id,
            }
        }
    };

    let email = normalize_email(&applicant.parent_email);
    let existing = store.users.find_one(Filter::all().eq("email", &email)).await?;
    let (parent, generated_password) = match existing {
        Some(parent) => (parent, None),
        None => {
            let password = generate_password();
            let mut parent = User::new(
                applicant.parent_name.clone(),
                &email,
                hash_password(&password)?,
                Role::Parent,
            );
            parent.phone = applicant.phone.clone();
            parent.address = applicant.address.clone();
            store.users.insert(&parent).await?;
            tracing::info!(user_id = %parent.id, "Created parent account");
            (parent, Some(password))
        }
    };

    let student = Student {
        id: applicant
            .assigned_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| generated_student_id(clock.millis())),
        name: applicant.child_name,
        batch: batch
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BATCH.to_string()),
        parent_id: parent.id.clone(),
        enrollment_date: clock.today(),
        father_name: applicant.father_name,
        mother_name: applicant.mother_name,
        contact_number: applicant.phone,
        address: applicant.address,
        profile_picture: None,
        fee_plan: None,
    };
    store.students.insert(&student).await?;

    mark_enrolled(store, admission_id, source).await?;

    tracing::info!(
        student_id = %student.id,
        parent_id = %parent.id,
        admission_id = %admission_id,
        "Admission enrolled"
    );

    Ok(Enrollment {
        student,
        parent,
        generated_password,
    })
}

fn ensure_not_enrolled(status: AdmissionStatus) -> Result<(), AppError> {
    if status == AdmissionStatus::Enrolled {
        return Err(AppError::Conflict(anyhow::anyhow!("Admission already enrolled")));
    }
    Ok(())
}

async fn mark_enrolled(
    store: &Store,
    admission_id: &str,
    source: AdmissionSource,
) -> Result<(), AppError> {
    match source {
        AdmissionSource::Enquiry => {
            if let Some(mut enquiry) = store.enquiries.get(admission_id).await? {
                enquiry.status = AdmissionStatus::Enrolled;
                store.enquiries.update(&enquiry).await?;
            }
        }
        AdmissionSource::Application => {
            if let Some(mut application) = store.applications.get(admission_id).await? {
                application.status = AdmissionStatus::Enrolled;
                store.applications.update(&application).await?;
            }
        }
    }
    Ok(())
}
