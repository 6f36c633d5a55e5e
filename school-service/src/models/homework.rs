use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::repository::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Homework {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    pub batch: String,
    /// Student ids.
    #[serde(default)]
    pub submitted_by: Vec<String>,
}

impl Entity for Homework {
    const COLLECTION: &'static str = "homework";

    fn id(&self) -> &str {
        &self.id
    }
}
