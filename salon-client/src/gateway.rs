//! Gateway traits
//!
//! Application code only sees these traits; [`crate::HttpClient`] and
//! [`crate::MemoryBackend`] implement all of them.

use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{Booking, Customer, Entity, Message, Product, Service, Setting, Staff};
use shared::query::Filter;

use crate::auth::{AuthUser, Session};
use crate::storage::{ImageUpload, StorageNamespace};
use crate::ClientResult;

/// Typed CRUD over one table
#[async_trait]
pub trait EntityGateway<E: Entity>: Send + Sync {
    async fn list(&self, filter: Option<&Filter>) -> ClientResult<Vec<E>>;
    async fn get(&self, id: &str) -> ClientResult<E>;
    async fn create(&self, fields: &E::Fields) -> ClientResult<E>;
    async fn update(&self, id: &str, fields: &E::Fields) -> ClientResult<E>;
    async fn remove(&self, id: &str) -> ClientResult<()>;
}

/// Product image bucket
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store the file under a fresh key and return its public URL
    async fn upload_image(&self, upload: ImageUpload) -> ClientResult<String>;

    /// Delete a hosted image by its public URL
    async fn delete_image(&self, url: &str) -> ClientResult<()>;

    fn namespace(&self) -> &StorageNamespace;
}

/// Email/password authentication
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<AuthUser>;
    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session>;
    async fn sign_out(&self, session: &Session) -> ClientResult<()>;
}

/// The whole hosted backend
pub trait Backend: Send + Sync {
    fn products(&self) -> &dyn EntityGateway<Product>;
    fn bookings(&self) -> &dyn EntityGateway<Booking>;
    fn customers(&self) -> &dyn EntityGateway<Customer>;
    fn staff(&self) -> &dyn EntityGateway<Staff>;
    fn services(&self) -> &dyn EntityGateway<Service>;
    fn messages(&self) -> &dyn EntityGateway<Message>;
    fn settings(&self) -> &dyn EntityGateway<Setting>;
    fn images(&self) -> &dyn ImageStorage;
    fn auth(&self) -> &dyn AuthGateway;

    /// Gateway acting on behalf of the signed-in user
    fn with_session(&self, session: &Session) -> Arc<dyn Backend>;
}

/// Implements the [`Backend`] accessors for a type that implements every
/// gateway trait itself.
macro_rules! impl_backend {
    ($ty:ty, |$this:ident, $session:ident| $with_session:expr) => {
        impl $crate::gateway::Backend for $ty {
            fn products(&self) -> &dyn $crate::gateway::EntityGateway<shared::models::Product> {
                self
            }
            fn bookings(&self) -> &dyn $crate::gateway::EntityGateway<shared::models::Booking> {
                self
            }
            fn customers(&self) -> &dyn $crate::gateway::EntityGateway<shared::models::Customer> {
                self
            }
            fn staff(&self) -> &dyn $crate::gateway::EntityGateway<shared::models::Staff> {
                self
            }
            fn services(&self) -> &dyn $crate::gateway::EntityGateway<shared::models::Service> {
                self
            }
            fn messages(&self) -> &dyn $crate::gateway::EntityGateway<shared::models::Message> {
                self
            }
            fn settings(&self) -> &dyn $crate::gateway::EntityGateway<shared::models::Setting> {
                self
            }
            fn images(&self) -> &dyn $crate::gateway::ImageStorage {
                self
            }
            fn auth(&self) -> &dyn $crate::gateway::AuthGateway {
                self
            }
            fn with_session(
                &self,
                $session: &$crate::auth::Session,
            ) -> std::sync::Arc<dyn $crate::gateway::Backend> {
                let $this = self;
                $with_session
            }
        }
    };
}

pub(crate) use impl_backend;
