//! Customer Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::util::{deserialize_id, deserialize_optional_id};

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    /// Unique per customer
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Linked auth account, if the customer registered online
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub auth_user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Customer {
    const TABLE: &'static str = "customers";
    type Fields = CustomerFields;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update customer payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFields {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_user_id: Option<String>,
}
