//! Data models
//!
//! Rows owned by the hosted backend. The application only holds transient
//! copies of them. All IDs are `String` on the client side.

pub mod booking;
pub mod customer;
pub mod message;
pub mod product;
pub mod service;
pub mod settings;
pub mod staff;

// Re-exports
pub use booking::*;
pub use customer::*;
pub use message::*;
pub use product::*;
pub use service::*;
pub use settings::*;
pub use staff::*;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A row type stored in a backend table
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Backend table name
    const TABLE: &'static str;

    /// Primary key column
    const ID_COLUMN: &'static str = "id";

    /// Create/update payload
    type Fields: Serialize + Send + Sync;

    fn id(&self) -> &str;
}
