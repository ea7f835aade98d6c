//! Shared types for the salon workspace
//!
//! Entity models, pricing rules, form parsing boundaries and query/pagination
//! types used by both the gateway client and the application layer.

pub mod form;
pub mod models;
pub mod pricing;
pub mod query;
pub mod util;

// Re-exports
pub use form::{FieldError, NumberField, ParseField};
pub use models::Entity;
pub use query::{Filter, PaginatedResponse};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
