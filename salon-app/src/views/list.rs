//! Generic admin list
//!
//! Fetch on mount, client-side search and pagination, and the delete
//! confirmation flow shared by every admin table.

use salon_client::{Backend, ClientError, EntityGateway};
use serde::Serialize;
use shared::models::{Customer, Entity, Product, Service, Staff};
use shared::query::{Filter, PaginatedResponse};

use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};

/// Translation keys of one admin table
#[derive(Debug, Clone, Copy)]
pub struct ListKeys {
    pub title: &'static str,
    pub load_failed: &'static str,
    pub empty: &'static str,
    pub no_search_results: &'static str,
    pub confirm_delete: &'static str,
    pub delete_success: &'static str,
    pub delete_failed: &'static str,
}

/// An entity shown in an admin table
pub trait AdminResource: Entity {
    const KEYS: ListKeys;

    fn gateway(backend: &dyn Backend) -> &dyn EntityGateway<Self>;

    /// Filter used when fetching (ordering, scoping)
    fn fetch_filter() -> Option<Filter> {
        None
    }

    /// Text matched by the search box
    fn search_fields(&self) -> Vec<&str>;

    /// Whether the row belongs to a dropdown filter value (e.g. a status)
    fn in_scope(&self, _scope: &str) -> bool {
        true
    }

    /// Name used in confirmations and notifications
    fn label(&self) -> &str;
}

/// Serializable table snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ListViewModel<R> {
    pub title: String,
    pub search: String,
    pub scope: Option<String>,
    pub rows: Vec<R>,
    pub empty_message: Option<String>,
    pub pagination: String,
    pub page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    /// Confirmation text while a delete is pending
    pub confirm_delete: Option<String>,
    pub error: Option<String>,
}

/// State of one admin table
#[derive(Debug, Clone)]
pub struct ListView<E: AdminResource> {
    rows: Vec<E>,
    search: String,
    scope: Option<String>,
    page: u32,
    page_size: u32,
    pending_delete: Option<E>,
    error: Option<String>,
    t: Translator,
}

impl<E: AdminResource> ListView<E> {
    pub fn new(translator: Translator, page_size: u32) -> Self {
        Self {
            rows: Vec::new(),
            search: String::new(),
            scope: None,
            page: 1,
            page_size,
            pending_delete: None,
            error: None,
            t: translator,
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.t
    }

    /// Fetch all rows. On failure the previous rows are kept.
    pub async fn load(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<(), ClientError> {
        let filter = E::fetch_filter();
        match E::gateway(backend).list(filter.as_ref()).await {
            Ok(rows) => {
                tracing::debug!(table = E::TABLE, count = rows.len(), "List loaded");
                self.rows = rows;
                self.error = None;
                self.page = self.page.clamp(1, self.total_pages());
                Ok(())
            }
            Err(e) => {
                tracing::error!(table = E::TABLE, error = %e, "Failed to load list");
                let message = self.t.t(E::KEYS.load_failed);
                self.error = Some(message.clone());
                notifier.notify(Notification::error(NotificationCode::LoadFailed, message));
                Err(e)
            }
        }
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn set_rows(&mut self, rows: Vec<E>) {
        self.rows = rows;
        self.page = 1;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ========== Search & pagination ==========

    /// Change the search text; always returns to page 1
    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
        self.page = 1;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Restrict to one dropdown value (`None` = all); returns to page 1
    pub fn set_scope(&mut self, scope: Option<&str>) {
        self.scope = scope.map(str::to_string);
        self.page = 1;
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Rows in scope that match the search (case-insensitive substring)
    pub fn filtered(&self) -> Vec<E> {
        let needle = self.search.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|row| self.scope.as_deref().is_none_or(|scope| row.in_scope(scope)))
            .filter(|row| {
                needle.is_empty()
                    || row
                        .search_fields()
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    pub fn current_page(&self) -> PaginatedResponse<E> {
        PaginatedResponse::paginate(&self.filtered(), self.page, self.page_size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        shared::query::total_pages(self.filtered().len() as u64, self.page_size)
    }

    /// Jump to `page`, clamped into range
    pub fn go_to(&mut self, page: u32) -> u32 {
        self.page = page.clamp(1, self.total_pages());
        self.page
    }

    pub fn next_page(&mut self) -> u32 {
        self.go_to(self.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> u32 {
        self.go_to(self.page.saturating_sub(1))
    }

    pub fn pagination_label(&self) -> String {
        let current = self.page.to_string();
        let total = self.total_pages().to_string();
        self.t.t_with(
            "common.pagination",
            &[("currentPage", current.as_str()), ("totalPages", total.as_str())],
        )
    }

    // ========== Row actions ==========

    /// Put a saved row into the list (replace by id, or prepend)
    pub fn upsert(&mut self, entity: E) {
        match self.rows.iter_mut().find(|row| row.id() == entity.id()) {
            Some(row) => *row = entity,
            None => self.rows.insert(0, entity),
        }
    }

    pub fn find(&self, id: &str) -> Option<&E> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Ask for confirmation; returns the confirmation text
    pub fn request_delete(&mut self, id: &str) -> Option<String> {
        let row = self.find(id)?.clone();
        let text = self.t.t_with(E::KEYS.confirm_delete, &[("name", row.label())]);
        self.pending_delete = Some(row);
        Some(text)
    }

    pub fn pending_delete(&self) -> Option<&E> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the pending row. `Ok(None)` when nothing was pending.
    pub async fn confirm_delete(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Option<E>, ClientError> {
        let Some(row) = self.pending_delete.take() else {
            return Ok(None);
        };
        match E::gateway(backend).remove(row.id()).await {
            Ok(()) => {
                tracing::info!(table = E::TABLE, id = %row.id(), "Row deleted");
                self.rows.retain(|r| r.id() != row.id());
                self.page = self.page.clamp(1, self.total_pages());
                notifier.notify(Notification::success(
                    NotificationCode::Deleted,
                    self.t.t_with(E::KEYS.delete_success, &[("name", row.label())]),
                ));
                Ok(Some(row))
            }
            Err(e) => {
                tracing::error!(table = E::TABLE, id = %row.id(), error = %e, "Failed to delete row");
                notifier.notify(Notification::error(
                    NotificationCode::DeleteFailed,
                    self.t.t_with(E::KEYS.delete_failed, &[("name", row.label())]),
                ));
                Err(e)
            }
        }
    }

    // ========== Rendering ==========

    pub fn view<R>(&self, to_row: impl Fn(&E) -> R) -> ListViewModel<R> {
        let page = self.current_page();
        let empty_message = page.data.is_empty().then(|| {
            if self.rows.is_empty() {
                self.t.t(E::KEYS.empty)
            } else {
                self.t.t(E::KEYS.no_search_results)
            }
        });
        ListViewModel {
            title: self.t.t(E::KEYS.title),
            search: self.search.clone(),
            scope: self.scope.clone(),
            rows: page.data.iter().map(to_row).collect(),
            empty_message,
            pagination: self.pagination_label(),
            page: page.page,
            total_pages: page.total_pages,
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            confirm_delete: self
                .pending_delete
                .as_ref()
                .map(|row| self.t.t_with(E::KEYS.confirm_delete, &[("name", row.label())])),
            error: self.error.clone(),
        }
    }
}

// ========== Resources ==========

impl AdminResource for Customer {
    const KEYS: ListKeys = ListKeys {
        title: "admin.customers.title",
        load_failed: "admin.customers.errors.fetch",
        empty: "admin.customers.no_customers",
        no_search_results: "admin.customers.no_customers",
        confirm_delete: "admin.customers.confirm_delete",
        delete_success: "admin.customers.notifications.delete_success",
        delete_failed: "admin.customers.errors.delete",
    };

    fn gateway(backend: &dyn Backend) -> &dyn EntityGateway<Self> {
        backend.customers()
    }

    fn fetch_filter() -> Option<Filter> {
        Some(Filter::new().order_by("created_at", false))
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        fields.extend(self.phone.as_deref());
        fields
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl AdminResource for Staff {
    const KEYS: ListKeys = ListKeys {
        title: "admin.staff.title",
        load_failed: "admin.staff.errors.load",
        empty: "admin.staff.no_staff",
        no_search_results: "admin.staff.no_search_results",
        confirm_delete: "admin.staff.confirm_delete",
        delete_success: "admin.staff.notifications.delete_success",
        delete_failed: "admin.staff.errors.delete",
    };

    fn gateway(backend: &dyn Backend) -> &dyn EntityGateway<Self> {
        backend.staff()
    }

    fn fetch_filter() -> Option<Filter> {
        Some(Filter::new().order_by("name", true))
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.phone.as_deref());
        fields
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl AdminResource for Service {
    const KEYS: ListKeys = ListKeys {
        title: "admin.services.title",
        load_failed: "admin.services.errors.load",
        empty: "admin.services.no_services",
        no_search_results: "admin.services.no_search_results",
        confirm_delete: "admin.services.confirm_delete",
        delete_success: "admin.services.notifications.delete_success",
        delete_failed: "admin.services.errors.delete",
    };

    fn gateway(backend: &dyn Backend) -> &dyn EntityGateway<Self> {
        backend.services()
    }

    fn fetch_filter() -> Option<Filter> {
        Some(Filter::new().order_by("name", true))
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.category.as_deref());
        fields
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl AdminResource for Product {
    const KEYS: ListKeys = ListKeys {
        title: "admin.inventory.title",
        load_failed: "admin.inventory.errors.load",
        empty: "admin.inventory.no_products",
        no_search_results: "admin.inventory.no_search_results",
        confirm_delete: "admin.inventory.confirm_delete",
        delete_success: "admin.inventory.notifications.delete_success",
        delete_failed: "admin.inventory.errors.delete",
    };

    fn gateway(backend: &dyn Backend) -> &dyn EntityGateway<Self> {
        backend.products()
    }

    fn fetch_filter() -> Option<Filter> {
        Some(Filter::new().order_by("name", true))
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.brand.as_deref());
        fields.extend(self.category.as_deref());
        fields
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, TranslationStore};
    use crate::notify::NotificationCenter;
    use salon_client::{Call, MemoryBackend};
    use std::sync::Arc;

    fn staff(id: usize, name: &str) -> Staff {
        Staff {
            id: id.to_string(),
            name: name.to_string(),
            phone: None,
            bio: None,
            is_active: true,
        }
    }

    fn translator() -> Translator {
        Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En)
    }

    async fn loaded(count: usize) -> (MemoryBackend, ListView<Staff>) {
        let backend = MemoryBackend::default();
        backend
            .seed((1..=count).map(|i| staff(i, &format!("Barber {i:02}"))))
            .unwrap();
        let mut view = ListView::new(translator(), 10);
        view.load(&backend, &NotificationCenter::new()).await.unwrap();
        (backend, view)
    }

    #[tokio::test]
    async fn test_pagination_bounds() {
        let (_, mut view) = loaded(23).await;

        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.pagination_label(), "Page 1 of 3");
        assert_eq!(view.previous_page(), 1);
        assert_eq!(view.go_to(99), 3);
        assert_eq!(view.current_page().data.len(), 3);
        assert_eq!(view.next_page(), 3);
    }

    #[tokio::test]
    async fn test_search_resets_page() {
        let (_, mut view) = loaded(23).await;
        view.go_to(2);

        view.set_search("barber 1");
        assert_eq!(view.page(), 1);
        // Barber 10..=19
        assert_eq!(view.filtered().len(), 10);

        view.set_search("nobody");
        let model = view.view(|s| s.name.clone());
        assert_eq!(model.empty_message.as_deref(), Some("No staff members match your search."));
        assert_eq!(model.pagination, "Page 1 of 1");
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (backend, mut view) = loaded(2).await;
        let center = NotificationCenter::new();
        backend.clear_calls();

        let text = view.request_delete("1").unwrap();
        assert_eq!(
            text,
            "Are you sure you want to delete Barber 01? This action cannot be undone."
        );
        view.cancel_delete();
        assert_eq!(view.confirm_delete(&backend, &center).await.unwrap().map(|s| s.id), None);
        assert!(backend.calls().is_empty());

        view.request_delete("1");
        let deleted = view.confirm_delete(&backend, &center).await.unwrap().unwrap();
        assert_eq!(deleted.name, "Barber 01");
        assert_eq!(
            backend.calls(),
            vec![Call::Remove {
                table: "staff",
                id: "1".into()
            }]
        );
        assert_eq!(view.rows().len(), 1);
        assert_eq!(
            center.last().unwrap().message,
            "Staff member \"Barber 01\" deleted successfully!"
        );
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_row() {
        let (backend, mut view) = loaded(1).await;
        let center = NotificationCenter::new();
        backend.fail_writes("staff", true);

        view.request_delete("1");
        assert!(view.confirm_delete(&backend, &center).await.is_err());
        assert_eq!(view.rows().len(), 1);
        assert_eq!(center.codes(), vec![NotificationCode::DeleteFailed]);
    }

    #[tokio::test]
    async fn test_upsert() {
        let (_, mut view) = loaded(1).await;
        view.upsert(staff(1, "Renamed"));
        view.upsert(staff(7, "New"));
        assert_eq!(view.rows().len(), 2);
        assert_eq!(view.rows()[0].name, "New");
        assert_eq!(view.find("1").unwrap().name, "Renamed");
    }
}
