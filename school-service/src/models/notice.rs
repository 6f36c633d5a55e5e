use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Role;
use crate::services::repository::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVisibility {
    #[default]
    Public,
    Parents,
    Teachers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoticePriority {
    #[default]
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NoticeCategory {
    #[default]
    General,
    Academic,
    Holiday,
    Event,
    Emergency,
    #[serde(rename = "Fee Reminder")]
    FeeReminder,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub visibility: NoticeVisibility,
    #[serde(default)]
    pub priority: NoticePriority,
    #[serde(default)]
    pub category: NoticeCategory,
    /// Ids of users who have opened the notice.
    #[serde(default)]
    pub read_by: Vec<String>,
}

impl Notice {
    /// Whether a viewer with `role` (None for anonymous) may see this notice.
    pub fn visible_to(&self, role: Option<Role>) -> bool {
        match (self.visibility, role) {
            (NoticeVisibility::Public, _) => true,
            (_, Some(Role::Admin)) => true,
            (NoticeVisibility::Parents, Some(Role::Parent | Role::Teacher)) => true,
            (NoticeVisibility::Teachers, Some(Role::Teacher)) => true,
            _ => false,
        }
    }

    /// Returns false when the user had already read it.
    pub fn mark_read(&mut self, user_id: &str) -> bool {
        if self.read_by.iter().any(|id| id == user_id) {
            return false;
        }
        self.read_by.push(user_id.to_string());
        true
    }
}

impl Entity for Notice {
    const COLLECTION: &'static str = "notices";

    fn id(&self) -> &str {
        &self.id
    }
}
