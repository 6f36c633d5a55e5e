//! Request bodies for students, batches, attendance, notices, homework and
//! the landing page.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    AttendanceStatus, Batch, FeePlan, LandingConfig, NoticeCategory, NoticePriority,
    NoticeVisibility, Student,
};

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Batch must not be empty"))]
    pub batch: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub profile_picture: Option<String>,
    pub fee_plan: Option<FeePlan>,
}

impl UpdateStudentRequest {
    pub fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(batch) = self.batch {
            student.batch = batch;
        }
        if self.father_name.is_some() {
            student.father_name = self.father_name;
        }
        if self.mother_name.is_some() {
            student.mother_name = self.mother_name;
        }
        if self.contact_number.is_some() {
            student.contact_number = self.contact_number;
        }
        if self.address.is_some() {
            student.address = self.address;
        }
        if self.profile_picture.is_some() {
            student.profile_picture = self.profile_picture;
        }
        if self.fee_plan.is_some() {
            student.fee_plan = self.fee_plan;
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<u32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub fee_amount: Option<Decimal>,
    pub description: Option<String>,
    pub age_group: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatchRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<u32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub fee_amount: Option<Decimal>,
    pub description: Option<String>,
    pub age_group: Option<String>,
}

impl UpdateBatchRequest {
    pub fn apply(self, batch: &mut Batch) {
        if let Some(name) = self.name {
            batch.name = name;
        }
        if let Some(capacity) = self.capacity {
            batch.capacity = capacity;
        }
        if let Some(fee) = self.fee_amount {
            batch.fee_amount = fee;
        }
        if self.description.is_some() {
            batch.description = self.description;
        }
        if self.age_group.is_some() {
            batch.age_group = self.age_group;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    #[validate(length(min = 1, message = "Student id is required"))]
    pub student_id: String,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MarkAttendanceRequest {
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "At least one record is required"), nested)]
    pub records: Vec<AttendanceMark>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoticeRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub visibility: NoticeVisibility,
    #[serde(default)]
    pub priority: NoticePriority,
    #[serde(default)]
    pub category: NoticeCategory,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHomeworkRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    #[validate(length(min = 1, message = "Batch is required"))]
    pub batch: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitHomeworkRequest {
    #[validate(length(min = 1, message = "Student id is required"))]
    pub student_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HomeworkQuery {
    pub batch: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLandingConfigRequest {
    #[validate(length(min = 1, message = "School name must not be empty"))]
    pub school_name: Option<String>,
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub about_title: Option<String>,
    pub about_text: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
}

impl UpdateLandingConfigRequest {
    pub fn apply(self, config: &mut LandingConfig) {
        let fields = [
            (self.school_name, &mut config.school_name),
            (self.hero_title, &mut config.hero_title),
            (self.hero_subtitle, &mut config.hero_subtitle),
            (self.about_title, &mut config.about_title),
            (self.about_text, &mut config.about_text),
            (self.contact_email, &mut config.contact_email),
            (self.contact_phone, &mut config.contact_phone),
            (self.address, &mut config.address),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}
