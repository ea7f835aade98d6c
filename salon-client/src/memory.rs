//! In-process backend
//!
//! Rows are kept as JSON objects per table so every entity goes through the
//! same serde path as the hosted client. Each call is appended to a journal
//! and individual operations can be made to fail, which is what the form and
//! view tests assert against.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use shared::models::Entity;
use shared::query::{Condition, Filter, FilterOp};
use uuid::Uuid;

use crate::auth::{AuthUser, Session};
use crate::gateway::{AuthGateway, EntityGateway, ImageStorage, impl_backend};
use crate::storage::{ImageUpload, StorageNamespace};
use crate::{ClientError, ClientResult};

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { table: &'static str },
    Get { table: &'static str, id: String },
    Create { table: &'static str },
    Update { table: &'static str, id: String },
    Remove { table: &'static str, id: String },
    UploadImage { file_name: String },
    DeleteImage { url: String },
    SignUp { email: String },
    SignIn { email: String },
    SignOut,
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::Create { .. } | Call::Update { .. } | Call::Remove { .. }
        )
    }
}

#[derive(Debug, Default)]
struct Faults {
    uploads: bool,
    image_deletes: bool,
    reads: HashSet<&'static str>,
    writes: HashSet<&'static str>,
}

#[derive(Debug, Clone)]
struct MemoryUser {
    user: AuthUser,
    password: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<&'static str, Vec<Map<String, Value>>>,
    unique: HashMap<&'static str, Vec<&'static str>>,
    objects: HashMap<String, Vec<u8>>,
    users: Vec<MemoryUser>,
    journal: Vec<Call>,
    faults: Faults,
}

/// In-memory implementation of every gateway trait
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
    storage: StorageNamespace,
    session_user: Option<AuthUser>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(StorageNamespace::new("http://localhost/storage/v1", "img"))
    }
}

impl MemoryBackend {
    pub fn new(storage: StorageNamespace) -> Self {
        let mut state = MemoryState::default();
        state.unique.insert("customers", vec!["email"]);
        Self {
            state: Arc::new(Mutex::new(state)),
            storage,
            session_user: None,
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// User this handle acts for, if any
    pub fn session_user(&self) -> Option<&AuthUser> {
        self.session_user.as_ref()
    }

    // ========== Seeding ==========

    /// Insert rows as-is (no journal entry)
    pub fn seed<E: Entity>(&self, rows: impl IntoIterator<Item = E>) -> ClientResult<()> {
        let mut state = self.state();
        for row in rows {
            let Value::Object(object) = serde_json::to_value(&row)? else {
                return Err(ClientError::InvalidResponse(format!(
                    "{} row is not an object",
                    E::TABLE
                )));
            };
            state.tables.entry(E::TABLE).or_default().push(object);
        }
        Ok(())
    }

    /// Register an account; `role` ends up in `app_metadata.role`
    pub fn add_user(&self, email: &str, password: &str, role: Option<&str>) -> AuthUser {
        let user = AuthUser {
            id: Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
            app_metadata: match role {
                Some(role) => serde_json::json!({ "role": role }),
                None => serde_json::json!({}),
            },
            user_metadata: serde_json::json!({}),
        };
        self.state().users.push(MemoryUser {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    /// Store an object so a hosted URL resolves; returns the public URL
    pub fn put_object(&self, key: &str, bytes: Vec<u8>) -> String {
        self.state().objects.insert(key.to_string(), bytes);
        self.storage.public_url(key)
    }

    // ========== Fault injection ==========

    pub fn fail_uploads(&self, fail: bool) {
        self.state().faults.uploads = fail;
    }

    pub fn fail_image_deletes(&self, fail: bool) {
        self.state().faults.image_deletes = fail;
    }

    /// Make create/update/remove on `table` fail
    pub fn fail_writes(&self, table: &'static str, fail: bool) {
        let mut state = self.state();
        if fail {
            state.faults.writes.insert(table);
        } else {
            state.faults.writes.remove(table);
        }
    }

    /// Make list/get on `table` fail
    pub fn fail_reads(&self, table: &'static str, fail: bool) {
        let mut state = self.state();
        if fail {
            state.faults.reads.insert(table);
        } else {
            state.faults.reads.remove(table);
        }
    }

    // ========== Inspection ==========

    /// Journal of calls made so far
    pub fn calls(&self) -> Vec<Call> {
        self.state().journal.clone()
    }

    pub fn clear_calls(&self) {
        self.state().journal.clear();
    }

    /// Current rows of a table
    pub fn rows<E: Entity>(&self) -> ClientResult<Vec<E>> {
        let state = self.state();
        state
            .tables
            .get(E::TABLE)
            .map(|rows| rows.iter().map(decode::<E>).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    pub fn has_object(&self, url: &str) -> bool {
        self.storage
            .key_of(url)
            .is_some_and(|key| self.state().objects.contains_key(key))
    }

    pub fn object_count(&self) -> usize {
        self.state().objects.len()
    }
}

impl MemoryState {
    fn record(&mut self, call: Call) {
        self.journal.push(call);
    }

    fn check_read(&self, table: &'static str) -> ClientResult<()> {
        if self.faults.reads.contains(table) {
            return Err(ClientError::Internal(format!("{table}: read rejected")));
        }
        Ok(())
    }

    fn check_write(&self, table: &'static str) -> ClientResult<()> {
        if self.faults.writes.contains(table) {
            return Err(ClientError::Internal(format!("{table}: write rejected")));
        }
        Ok(())
    }

    fn position(&self, table: &'static str, id_column: &str, id: &str) -> Option<usize> {
        self.tables.get(table)?.iter().position(|row| {
            row.get(id_column).and_then(value_text).as_deref() == Some(id)
        })
    }

    /// Unique constraint check, ignoring the row at `skip`
    fn check_unique(
        &self,
        table: &'static str,
        id_column: &str,
        row: &Map<String, Value>,
        skip: Option<usize>,
    ) -> ClientResult<()> {
        let Some(rows) = self.tables.get(table) else {
            return Ok(());
        };
        let mut columns = vec![id_column];
        if let Some(extra) = self.unique.get(table) {
            columns.extend(extra.iter().copied());
        }
        for column in columns {
            let Some(value) = row.get(column).and_then(value_text) else {
                continue;
            };
            let taken = rows.iter().enumerate().any(|(i, other)| {
                Some(i) != skip && other.get(column).and_then(value_text).as_deref() == Some(value.as_str())
            });
            if taken {
                return Err(ClientError::Conflict(format!(
                    "duplicate key value violates unique constraint \"{table}_{column}_key\""
                )));
            }
        }
        Ok(())
    }
}

fn decode<E: Entity>(row: &Map<String, Value>) -> ClientResult<E> {
    Ok(serde_json::from_value(Value::Object(row.clone()))?)
}

fn encode<T: serde::Serialize>(table: &str, fields: &T) -> ClientResult<Map<String, Value>> {
    match serde_json::to_value(fields)? {
        Value::Object(object) => Ok(object),
        _ => Err(ClientError::Validation(format!("{table}: payload is not an object"))),
    }
}

/// Column value as filter text; `null` never matches
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numbers and timestamps compare by value, everything else as text
fn compare_text(a: &str, b: &str) -> Ordering {
    if let (Ok(x), Ok(y)) = (a.parse::<f64>(), b.parse::<f64>()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    if let (Ok(x), Ok(y)) = (
        DateTime::parse_from_rfc3339(a),
        DateTime::parse_from_rfc3339(b),
    ) {
        return x.cmp(&y);
    }
    a.cmp(b)
}

fn matches(row: &Map<String, Value>, condition: &Condition) -> bool {
    let Some(value) = row.get(&condition.column).and_then(value_text) else {
        return false;
    };
    let ordering = compare_text(&value, &condition.value);
    match condition.op {
        FilterOp::Eq => ordering == Ordering::Equal,
        FilterOp::Gte => ordering != Ordering::Less,
        FilterOp::Lt => ordering == Ordering::Less,
    }
}

fn apply_filter(rows: &[Map<String, Value>], filter: Option<&Filter>) -> Vec<Map<String, Value>> {
    let Some(filter) = filter else {
        return rows.to_vec();
    };
    let mut selected: Vec<Map<String, Value>> = rows
        .iter()
        .filter(|row| filter.conditions.iter().all(|c| matches(row, c)))
        .cloned()
        .collect();
    if let Some(order) = &filter.order {
        selected.sort_by(|a, b| {
            let a = a.get(&order.column).and_then(value_text);
            let b = b.get(&order.column).and_then(value_text);
            let ordering = match (a, b) {
                (Some(a), Some(b)) => compare_text(&a, &b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            };
            if order.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }
    selected
}

#[async_trait]
impl<E: Entity> EntityGateway<E> for MemoryBackend {
    async fn list(&self, filter: Option<&Filter>) -> ClientResult<Vec<E>> {
        let mut state = self.state();
        state.record(Call::List { table: E::TABLE });
        state.check_read(E::TABLE)?;
        let rows = state.tables.get(E::TABLE).map(Vec::as_slice).unwrap_or_default();
        apply_filter(rows, filter).iter().map(decode::<E>).collect()
    }

    async fn get(&self, id: &str) -> ClientResult<E> {
        let mut state = self.state();
        state.record(Call::Get {
            table: E::TABLE,
            id: id.to_string(),
        });
        state.check_read(E::TABLE)?;
        let index = state
            .position(E::TABLE, E::ID_COLUMN, id)
            .ok_or_else(|| ClientError::NotFound(format!("{} {}", E::TABLE, id)))?;
        decode(&state.tables[E::TABLE][index])
    }

    async fn create(&self, fields: &E::Fields) -> ClientResult<E> {
        let mut state = self.state();
        state.record(Call::Create { table: E::TABLE });
        state.check_write(E::TABLE)?;

        let mut row = encode(E::TABLE, fields)?;
        if row.get(E::ID_COLUMN).and_then(value_text).is_none() {
            row.insert(E::ID_COLUMN.to_string(), Value::String(Uuid::new_v4().to_string()));
        }
        row.entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        state.check_unique(E::TABLE, E::ID_COLUMN, &row, None)?;

        let entity = decode::<E>(&row)?;
        state.tables.entry(E::TABLE).or_default().push(row);
        tracing::debug!(table = E::TABLE, id = %entity.id(), "memory insert");
        Ok(entity)
    }

    async fn update(&self, id: &str, fields: &E::Fields) -> ClientResult<E> {
        let mut state = self.state();
        state.record(Call::Update {
            table: E::TABLE,
            id: id.to_string(),
        });
        state.check_write(E::TABLE)?;

        let index = state
            .position(E::TABLE, E::ID_COLUMN, id)
            .ok_or_else(|| ClientError::NotFound(format!("{} {}", E::TABLE, id)))?;
        let mut row = state.tables[E::TABLE][index].clone();
        for (column, value) in encode(E::TABLE, fields)? {
            row.insert(column, value);
        }
        state.check_unique(E::TABLE, E::ID_COLUMN, &row, Some(index))?;

        let entity = decode::<E>(&row)?;
        if let Some(rows) = state.tables.get_mut(E::TABLE) {
            rows[index] = row;
        }
        Ok(entity)
    }

    async fn remove(&self, id: &str) -> ClientResult<()> {
        let mut state = self.state();
        state.record(Call::Remove {
            table: E::TABLE,
            id: id.to_string(),
        });
        state.check_write(E::TABLE)?;
        // PostgREST deletes are idempotent
        if let Some(index) = state.position(E::TABLE, E::ID_COLUMN, id) {
            if let Some(rows) = state.tables.get_mut(E::TABLE) {
                rows.remove(index);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ImageStorage for MemoryBackend {
    async fn upload_image(&self, upload: ImageUpload) -> ClientResult<String> {
        let mut state = self.state();
        state.record(Call::UploadImage {
            file_name: upload.file_name.clone(),
        });
        if state.faults.uploads {
            return Err(ClientError::Storage("upload rejected".into()));
        }
        let key = self.storage.new_key(&upload);
        state.objects.insert(key.clone(), upload.bytes);
        Ok(self.storage.public_url(&key))
    }

    async fn delete_image(&self, url: &str) -> ClientResult<()> {
        let mut state = self.state();
        state.record(Call::DeleteImage {
            url: url.to_string(),
        });
        if state.faults.image_deletes {
            return Err(ClientError::Storage("delete rejected".into()));
        }
        let key = self
            .storage
            .key_of(url)
            .ok_or_else(|| ClientError::Storage(format!("not a hosted image: {url}")))?;
        state
            .objects
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| ClientError::NotFound(format!("object {key}")))
    }

    fn namespace(&self) -> &StorageNamespace {
        &self.storage
    }
}

#[async_trait]
impl AuthGateway for MemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<AuthUser> {
        {
            let mut state = self.state();
            state.record(Call::SignUp {
                email: email.to_string(),
            });
            if state
                .users
                .iter()
                .any(|u| u.user.email.as_deref() == Some(email))
            {
                return Err(ClientError::Validation("User already registered".into()));
            }
        }
        Ok(self.add_user(email, password, None))
    }

    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session> {
        let mut state = self.state();
        state.record(Call::SignIn {
            email: email.to_string(),
        });
        let user = state
            .users
            .iter()
            .find(|u| u.user.email.as_deref() == Some(email) && u.password == password)
            .map(|u| u.user.clone())
            .ok_or_else(|| ClientError::Unauthorized("Invalid login credentials".into()))?;
        Ok(Session {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: None,
            expires_in: Some(3600),
            user,
        })
    }

    async fn sign_out(&self, _session: &Session) -> ClientResult<()> {
        self.state().record(Call::SignOut);
        Ok(())
    }
}

impl_backend!(MemoryBackend, |backend, session| {
    let mut scoped = backend.clone();
    scoped.session_user = Some(session.user.clone());
    Arc::new(scoped)
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Backend;
    use shared::models::{Customer, CustomerFields, Message, MessageStatus};

    fn customer(name: &str, email: &str) -> CustomerFields {
        CustomerFields {
            name: name.into(),
            email: email.into(),
            phone: None,
            auth_user_id: None,
        }
    }

    #[tokio::test]
    async fn test_crud_and_journal() {
        let backend = MemoryBackend::default();
        let customers = backend.customers();

        let created = customers.create(&customer("Sam", "sam@example.com")).await.unwrap();
        assert!(created.created_at.is_some());

        let updated = customers
            .update(&created.id, &customer("Samuel", "sam@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Samuel");

        customers.remove(&created.id).await.unwrap();
        assert!(customers.get(&created.id).await.unwrap_err().is_not_found());

        assert_eq!(
            backend.calls(),
            vec![
                Call::Create { table: "customers" },
                Call::Update {
                    table: "customers",
                    id: created.id.clone()
                },
                Call::Remove {
                    table: "customers",
                    id: created.id.clone()
                },
                Call::Get {
                    table: "customers",
                    id: created.id.clone()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_unique_email() {
        let backend = MemoryBackend::default();
        backend
            .customers()
            .create(&customer("A", "a@example.com"))
            .await
            .unwrap();
        let err = backend
            .customers()
            .create(&customer("B", "a@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        let rows: Vec<Customer> = backend.rows().unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_filter_and_order() {
        let backend = MemoryBackend::default();
        for (i, status) in ["unread", "read", "unread"].iter().enumerate() {
            backend
                .seed([Message {
                    id: format!("m{i}"),
                    name: "x".into(),
                    email: "x@example.com".into(),
                    phone: None,
                    message: "hi".into(),
                    status: status.parse().unwrap(),
                    created_at: Some(Utc::now() + chrono::Duration::minutes(i as i64)),
                }])
                .unwrap();
        }

        let filter = Filter::new()
            .eq("status", MessageStatus::Unread)
            .order_by("created_at", false);
        let unread = backend.messages().list(Some(&filter)).await.unwrap();
        let ids: Vec<&str> = unread.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m0"]);
    }

    #[tokio::test]
    async fn test_images_and_faults() {
        let backend = MemoryBackend::default();
        let url = backend
            .upload_image(ImageUpload::new("a.png", vec![1]))
            .await
            .unwrap();
        assert!(backend.has_object(&url));

        backend.fail_image_deletes(true);
        assert!(backend.delete_image(&url).await.is_err());
        backend.fail_image_deletes(false);
        backend.delete_image(&url).await.unwrap();
        assert!(!backend.has_object(&url));

        backend.fail_uploads(true);
        assert!(backend.upload_image(ImageUpload::new("b.png", vec![])).await.is_err());
        assert_eq!(backend.object_count(), 0);
    }

    #[tokio::test]
    async fn test_auth() {
        let backend = MemoryBackend::default();
        backend.add_user("admin@salon.test", "secret", Some("admin"));

        let session = backend.sign_in("admin@salon.test", "secret").await.unwrap();
        assert!(session.user.is_admin());
        assert!(matches!(
            backend.sign_in("admin@salon.test", "wrong").await,
            Err(ClientError::Unauthorized(_))
        ));

        let user = backend.sign_up("new@salon.test", "pw").await.unwrap();
        assert!(!user.id.is_empty());
        assert!(backend.sign_up("new@salon.test", "pw").await.is_err());
    }
}
