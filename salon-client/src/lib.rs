//! Salon Client - data gateway for the hosted backend
//!
//! Typed CRUD per entity, product image storage and email/password auth.
//! [`HttpClient`] talks to the hosted backend over HTTP, [`MemoryBackend`]
//! keeps everything in-process (offline mode and tests).

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod storage;

pub use auth::{AuthUser, Session};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{AuthGateway, Backend, EntityGateway, ImageStorage};
pub use http::HttpClient;
pub use memory::{Call, MemoryBackend};
pub use storage::{ImageUpload, StorageNamespace};

// Re-export shared types for convenience
pub use shared::models::Entity;
pub use shared::query::Filter;
