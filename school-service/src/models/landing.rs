use serde::{Deserialize, Serialize};

use crate::services::repository::Entity;

/// The only landing config document.
pub const LANDING_CONFIG_ID: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LandingConfig {
    #[serde(default = "landing_id")]
    pub id: String,
    pub school_name: String,
    #[serde(default)]
    pub hero_title: String,
    #[serde(default)]
    pub hero_subtitle: String,
    #[serde(default)]
    pub about_title: String,
    #[serde(default)]
    pub about_text: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub address: String,
}

fn landing_id() -> String {
    LANDING_CONFIG_ID.to_string()
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            id: landing_id(),
            school_name: "Tiny Toddlers Playschool".to_string(),
            hero_title: String::new(),
            hero_subtitle: String::new(),
            about_title: String::new(),
            about_text: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            address: String::new(),
        }
    }
}

impl Entity for LandingConfig {
    const COLLECTION: &'static str = "landing_config";

    fn id(&self) -> &str {
        &self.id
    }
}
