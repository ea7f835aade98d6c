//! Service Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::util::deserialize_id;

/// Salon service entity (haircut, shave, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Entity for Service {
    const TABLE: &'static str = "services";
    type Fields = ServiceFields;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update service payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceFields {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: Option<String>,
    pub is_active: bool,
}
