//! Client configuration

use std::time::Duration;

use crate::storage::StorageNamespace;
use crate::{ClientResult, HttpClient};

/// Default storage bucket for product images
pub const DEFAULT_BUCKET: &str = "img";

/// Client configuration for connecting to the hosted backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://abc.supabase.co")
    pub base_url: String,

    /// Public anon key, sent as `apikey` on every request
    pub anon_key: String,

    /// Storage bucket for product images
    pub bucket: String,

    /// Access token of a signed-in user
    pub token: Option<String>,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
            token: None,
            timeout_ms: 30_000,
        }
    }

    /// Set the storage bucket
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `{base_url}/storage/v1`
    pub fn storage_root(&self) -> String {
        format!("{}/storage/v1", self.base_url)
    }

    /// Namespace of images hosted in the configured bucket
    pub fn storage_namespace(&self) -> StorageNamespace {
        StorageNamespace::new(self.storage_root(), self.bucket.clone())
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<HttpClient> {
        HttpClient::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("https://salon.example.com/", "anon")
            .with_bucket("pics")
            .with_timeout_ms(500);

        assert_eq!(config.base_url, "https://salon.example.com");
        assert_eq!(config.storage_root(), "https://salon.example.com/storage/v1");
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert_eq!(
            config.storage_namespace().public_url("a.png"),
            "https://salon.example.com/storage/v1/object/public/pics/a.png"
        );
    }
}
