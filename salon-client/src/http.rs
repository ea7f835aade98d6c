//! HTTP client for the hosted backend
//!
//! Rows go through the PostgREST API (`/rest/v1`), images through the
//! storage API (`/storage/v1`), accounts through the auth API (`/auth/v1`).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shared::models::Entity;
use shared::query::Filter;

use crate::auth::{AuthUser, Credentials, Session};
use crate::gateway::{AuthGateway, EntityGateway, ImageStorage, impl_backend};
use crate::storage::{ImageUpload, StorageNamespace};
use crate::{ClientConfig, ClientError, ClientResult};

/// PostgREST unique violation
const UNIQUE_VIOLATION: &str = "23505";

/// Error body of the hosted APIs.
///
/// PostgREST uses `code`/`message`, the auth API `msg` or
/// `error_description`, storage `error`/`message`.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiErrorResponse {
    fn code(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(code)) => Some(code.clone()),
            Some(serde_json::Value::Number(code)) => Some(code.to_string()),
            _ => None,
        }
    }

    fn message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

/// HTTP client for the hosted backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    anon_key: String,
    token: Option<String>,
    storage: StorageNamespace,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            anon_key: config.anon_key.clone(),
            token: config.token.clone(),
            storage: config.storage_namespace(),
        })
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| ClientError::Internal(format!("invalid url {raw}: {e}")))
    }

    fn table_url(&self, table: &str) -> ClientResult<Url> {
        self.url(&format!("rest/v1/{table}"))
    }

    fn row_url<E: Entity>(&self, id: &str) -> ClientResult<Url> {
        let mut url = self.table_url(E::TABLE)?;
        url.query_pairs_mut()
            .append_pair(E::ID_COLUMN, &format!("eq.{id}"));
        Ok(url)
    }

    /// `apikey` plus bearer token (session token, else the anon key)
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {bearer}"))
    }

    /// Map a non-success response to a [`ClientError`]
    async fn error_from(response: Response) -> ClientError {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ClientError::Http(e),
        };
        let body: ApiErrorResponse = serde_json::from_str(&text).unwrap_or_default();
        let code = body.code();
        let message = body.message().unwrap_or(text);

        if code.as_deref() == Some(UNIQUE_VIOLATION) {
            return ClientError::Conflict(message);
        }
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::CONFLICT => ClientError::Conflict(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            _ => ClientError::Internal(format!("{status}: {message}")),
        }
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Handle a response whose body is ignored
    async fn handle_empty(response: Response) -> ClientResult<()> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    /// Rows returned with `Prefer: return=representation`
    async fn single_row<E: Entity>(response: Response, id: Option<&str>) -> ClientResult<E> {
        let rows: Vec<E> = Self::handle_response(response).await?;
        rows.into_iter().next().ok_or_else(|| match id {
            Some(id) => ClientError::NotFound(format!("{} {}", E::TABLE, id)),
            None => ClientError::InvalidResponse(format!("{}: empty representation", E::TABLE)),
        })
    }
}

#[async_trait]
impl<E: Entity> EntityGateway<E> for HttpClient {
    async fn list(&self, filter: Option<&Filter>) -> ClientResult<Vec<E>> {
        let mut url = self.table_url(E::TABLE)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some(filter) = filter {
                for (key, value) in filter.query_pairs() {
                    query.append_pair(&key, &value);
                }
            }
        }
        tracing::debug!(table = E::TABLE, "list rows");
        let response = self.authorize(self.client.get(url)).send().await?;
        Self::handle_response(response).await
    }

    async fn get(&self, id: &str) -> ClientResult<E> {
        let url = self.row_url::<E>(id)?;
        let response = self.authorize(self.client.get(url)).send().await?;
        Self::single_row(response, Some(id)).await
    }

    async fn create(&self, fields: &E::Fields) -> ClientResult<E> {
        let url = self.table_url(E::TABLE)?;
        tracing::debug!(table = E::TABLE, "insert row");
        let response = self
            .authorize(self.client.post(url))
            .header("Prefer", "return=representation")
            .json(fields)
            .send()
            .await?;
        Self::single_row(response, None).await
    }

    async fn update(&self, id: &str, fields: &E::Fields) -> ClientResult<E> {
        let url = self.row_url::<E>(id)?;
        tracing::debug!(table = E::TABLE, id = %id, "update row");
        let response = self
            .authorize(self.client.patch(url))
            .header("Prefer", "return=representation")
            .json(fields)
            .send()
            .await?;
        Self::single_row(response, Some(id)).await
    }

    async fn remove(&self, id: &str) -> ClientResult<()> {
        let url = self.row_url::<E>(id)?;
        tracing::debug!(table = E::TABLE, id = %id, "delete row");
        let response = self.authorize(self.client.delete(url)).send().await?;
        Self::handle_empty(response).await
    }
}

#[async_trait]
impl ImageStorage for HttpClient {
    async fn upload_image(&self, upload: ImageUpload) -> ClientResult<String> {
        let key = self.storage.new_key(&upload);
        let url = Url::parse(&self.storage.object_url(&key))
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        tracing::info!(key = %key, file = %upload.file_name, size = upload.bytes.len(), "Uploading image");

        let content_type = upload.content_type();
        let response = self
            .authorize(self.client.post(url))
            .header(CONTENT_TYPE, content_type)
            .body(upload.bytes)
            .send()
            .await?;
        Self::handle_empty(response).await?;
        Ok(self.storage.public_url(&key))
    }

    async fn delete_image(&self, url: &str) -> ClientResult<()> {
        let key = self
            .storage
            .key_of(url)
            .ok_or_else(|| ClientError::Storage(format!("not a hosted image: {url}")))?;
        let object = Url::parse(&self.storage.object_url(key))
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        tracing::info!(key = %key, "Deleting image");

        let response = self.authorize(self.client.delete(object)).send().await?;
        Self::handle_empty(response).await
    }

    fn namespace(&self) -> &StorageNamespace {
        &self.storage
    }
}

/// Signup answers with a session (auto-confirm) or the bare user
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session { user: AuthUser },
    User(AuthUser),
}

#[async_trait]
impl AuthGateway for HttpClient {
    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<AuthUser> {
        let url = self.url("auth/v1/signup")?;
        let response = self
            .authorize(self.client.post(url))
            .json(&Credentials { email, password })
            .send()
            .await?;
        let user = match Self::handle_response::<SignUpResponse>(response).await? {
            SignUpResponse::Session { user } => user,
            SignUpResponse::User(user) => user,
        };
        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session> {
        let mut url = self.url("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let response = self
            .authorize(self.client.post(url))
            .json(&Credentials { email, password })
            .send()
            .await?;
        let session: Session = Self::handle_response(response).await?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    async fn sign_out(&self, session: &Session) -> ClientResult<()> {
        let url = self.url("auth/v1/logout")?;
        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", session.access_token))
            .send()
            .await?;
        Self::handle_empty(response).await
    }
}

impl_backend!(HttpClient, |client, session| {
    Arc::new(client.clone().with_token(session.access_token.clone()))
});
