//! Staff Model

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::util::deserialize_id;

/// Staff member entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Entity for Staff {
    const TABLE: &'static str = "staff";
    type Fields = StaffFields;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update staff payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffFields {
    pub name: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub is_active: bool,
}
