use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::repository::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: String,
    pub name: String,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Annual fee for the whole session.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub fee_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
}

pub fn default_capacity() -> u32 {
    20
}

impl Entity for Batch {
    const COLLECTION: &'static str = "batches";

    fn id(&self) -> &str {
        &self.id
    }
}
