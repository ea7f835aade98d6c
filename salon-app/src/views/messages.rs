//! Messages admin view
//!
//! Contact messages with a status filter, per-row status actions and bulk
//! actions over a selection.

use std::collections::BTreeSet;

use salon_client::{Backend, ClientError, EntityGateway};
use serde::Serialize;
use shared::models::{Message, MessageStatus};
use shared::query::Filter;

use super::list::{AdminResource, ListKeys, ListView, ListViewModel};
use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};

const SNIPPET_CHARS: usize = 50;

impl AdminResource for Message {
    const KEYS: ListKeys = ListKeys {
        title: "admin.messages.title",
        load_failed: "admin.messages.errors.fetch",
        empty: "admin.messages.no_messages",
        no_search_results: "admin.messages.no_filtered_messages",
        confirm_delete: "admin.messages.confirm_delete",
        delete_success: "admin.messages.notifications.deleted",
        delete_failed: "admin.messages.errors.delete",
    };

    fn gateway(backend: &dyn Backend) -> &dyn EntityGateway<Self> {
        backend.messages()
    }

    fn fetch_filter() -> Option<Filter> {
        Some(Filter::new().order_by("created_at", false))
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.message.as_str()]
    }

    fn in_scope(&self, scope: &str) -> bool {
        self.status.as_str() == scope
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Translation key of a status label
pub fn status_key(status: MessageStatus) -> &'static str {
    match status {
        MessageStatus::Unread => "admin.messages.status.unread",
        MessageStatus::Read => "admin.messages.status.read",
        MessageStatus::Archived => "admin.messages.status.archive",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageRow {
    pub id: String,
    pub from: String,
    pub email: String,
    pub phone: String,
    pub snippet: String,
    pub received: String,
    pub status: MessageStatus,
    pub status_label: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct MessagesView {
    pub list: ListView<Message>,
    selected: BTreeSet<String>,
}

impl MessagesView {
    pub fn new(translator: Translator, page_size: u32) -> Self {
        Self {
            list: ListView::new(translator, page_size),
            selected: BTreeSet::new(),
        }
    }

    pub async fn load(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<(), ClientError> {
        self.list.load(backend, notifier).await?;
        let rows = self.list.rows();
        self.selected.retain(|id| rows.iter().any(|m| &m.id == id));
        Ok(())
    }

    /// `None` shows every status
    pub fn set_status_filter(&mut self, status: Option<MessageStatus>) {
        self.list.set_scope(status.map(|s| s.as_str()));
    }

    pub fn status_filter(&self) -> Option<MessageStatus> {
        self.list.scope().and_then(|s| s.parse().ok())
    }

    // ========== Selection ==========

    pub fn toggle_selected(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Select every row matching the current filter, or clear when all are selected
    pub fn toggle_all(&mut self) {
        let visible: BTreeSet<String> = self.list.filtered().into_iter().map(|m| m.id).collect();
        if !visible.is_empty() && visible.is_subset(&self.selected) {
            self.selected.retain(|id| !visible.contains(id));
        } else {
            self.selected.extend(visible);
        }
    }

    pub fn selected(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    // ========== Actions ==========

    async fn write_status(
        &mut self,
        backend: &dyn Backend,
        id: &str,
        status: MessageStatus,
    ) -> Result<Message, ClientError> {
        let message = self
            .list
            .find(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("message {id}")))?;
        let updated = backend
            .messages()
            .update(id, &message.fields_with_status(status))
            .await?;
        self.list.upsert(updated.clone());
        Ok(updated)
    }

    /// Mark read / unread / archived
    pub async fn set_status(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
        id: &str,
        status: MessageStatus,
    ) -> Result<Message, ClientError> {
        let t = self.list.translator().clone();
        match self.write_status(backend, id, status).await {
            Ok(message) => {
                let label = t.t(status_key(status));
                notifier.notify(Notification::success(
                    NotificationCode::StatusUpdated,
                    t.t_with(
                        "admin.messages.notifications.status_updated",
                        &[("status", label.as_str())],
                    ),
                ));
                Ok(message)
            }
            Err(e) => {
                tracing::error!(id = %id, error = %e, "Failed to update message status");
                notifier.notify(Notification::error(
                    NotificationCode::StatusUpdateFailed,
                    t.t("admin.messages.errors.update_status"),
                ));
                Err(e)
            }
        }
    }

    /// Set the status of every selected message. Stops at the first failure;
    /// rows updated before it keep their new status.
    pub async fn bulk_set_status(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
        status: MessageStatus,
    ) -> Result<usize, ClientError> {
        let ids = self.selected();
        let t = self.list.translator().clone();
        for id in &ids {
            if let Err(e) = self.write_status(backend, id, status).await {
                tracing::error!(id = %id, error = %e, "Bulk status update failed");
                notifier.notify(Notification::error(
                    NotificationCode::BulkActionFailed,
                    t.t("admin.messages.errors.bulk_action"),
                ));
                return Err(e);
            }
        }
        self.selected.clear();
        notifier.notify(Notification::success(
            NotificationCode::BulkUpdated,
            t.t("admin.messages.notifications.bulk_updated"),
        ));
        Ok(ids.len())
    }

    /// Delete every selected message
    pub async fn bulk_delete(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<usize, ClientError> {
        let ids = self.selected();
        let t = self.list.translator().clone();
        for id in &ids {
            if let Err(e) = backend.messages().remove(id).await {
                tracing::error!(id = %id, error = %e, "Bulk delete failed");
                notifier.notify(Notification::error(
                    NotificationCode::BulkActionFailed,
                    t.t("admin.messages.errors.bulk_action"),
                ));
                return Err(e);
            }
            self.selected.remove(id);
            let remaining: Vec<Message> = self
                .list
                .rows()
                .iter()
                .filter(|m| &m.id != id)
                .cloned()
                .collect();
            let page = self.list.page();
            self.list.set_rows(remaining);
            self.list.go_to(page);
        }
        notifier.notify(Notification::success(
            NotificationCode::BulkUpdated,
            t.t("admin.messages.notifications.bulk_updated"),
        ));
        Ok(ids.len())
    }

    pub fn view(&self) -> ListViewModel<MessageRow> {
        let t = self.list.translator();
        self.list.view(|m| MessageRow {
            id: m.id.clone(),
            from: m.name.clone(),
            email: m.email.clone(),
            phone: m.phone.clone().unwrap_or_default(),
            snippet: m.snippet(SNIPPET_CHARS),
            received: m
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            status: m.status,
            status_label: t.t(status_key(m.status)),
            selected: self.selected.contains(&m.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, TranslationStore};
    use crate::notify::NotificationCenter;
    use salon_client::MemoryBackend;
    use std::sync::Arc;

    fn message(id: &str, status: MessageStatus) -> Message {
        Message {
            id: id.into(),
            name: format!("Sender {id}"),
            email: format!("{id}@example.com"),
            phone: None,
            message: "Hello".into(),
            status,
            created_at: None,
        }
    }

    async fn setup() -> (MemoryBackend, MessagesView) {
        let backend = MemoryBackend::default();
        backend
            .seed([
                message("m1", MessageStatus::Unread),
                message("m2", MessageStatus::Unread),
                message("m3", MessageStatus::Read),
            ])
            .unwrap();
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);
        let mut view = MessagesView::new(t, 10);
        view.load(&backend, &NotificationCenter::new()).await.unwrap();
        (backend, view)
    }

    #[tokio::test]
    async fn test_status_filter_and_mark_read() {
        let (backend, mut view) = setup().await;
        let center = NotificationCenter::new();

        view.set_status_filter(Some(MessageStatus::Unread));
        assert_eq!(view.view().rows.len(), 2);

        view.set_status(&backend, &center, "m1", MessageStatus::Read)
            .await
            .unwrap();
        assert_eq!(view.view().rows.len(), 1);
        assert_eq!(
            center.last().unwrap().message,
            "Message status updated to Read."
        );
        let stored = backend.rows::<Message>().unwrap();
        assert_eq!(stored[0].status, MessageStatus::Read);
    }

    #[tokio::test]
    async fn test_bulk_archive_and_delete() {
        let (backend, mut view) = setup().await;
        let center = NotificationCenter::new();

        view.set_status_filter(Some(MessageStatus::Unread));
        view.toggle_all();
        assert_eq!(view.selected(), vec!["m1".to_string(), "m2".to_string()]);

        assert_eq!(
            view.bulk_set_status(&backend, &center, MessageStatus::Archived)
                .await
                .unwrap(),
            2
        );
        assert!(view.selected().is_empty());
        view.set_status_filter(Some(MessageStatus::Archived));
        assert_eq!(view.view().rows.len(), 2);

        view.toggle_selected("m3");
        view.bulk_delete(&backend, &center).await.unwrap();
        assert_eq!(backend.rows::<Message>().unwrap().len(), 2);
        assert_eq!(view.list.rows().len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_failure_reports_once() {
        let (backend, mut view) = setup().await;
        let center = NotificationCenter::new();
        backend.fail_writes("messages", true);

        view.toggle_all();
        assert!(view
            .bulk_set_status(&backend, &center, MessageStatus::Read)
            .await
            .is_err());
        assert_eq!(center.codes(), vec![NotificationCode::BulkActionFailed]);
        assert_eq!(view.selected().len(), 3);
    }
}
