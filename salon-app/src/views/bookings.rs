//! Bookings admin view

use std::collections::HashMap;

use salon_client::{Backend, ClientError, EntityGateway};
use serde::Serialize;
use shared::models::{Booking, BookingStatus, Customer};
use shared::query::Filter;

use super::list::{AdminResource, ListKeys, ListView, ListViewModel};
use crate::forms::{BookingForm, FormError, FormMode};
use crate::i18n::Translator;
use crate::notify::Notifier;

impl AdminResource for Booking {
    const KEYS: ListKeys = ListKeys {
        title: "admin.bookings.title",
        load_failed: "admin.bookings.errors.fetch",
        empty: "admin.bookings.no_bookings",
        no_search_results: "admin.bookings.no_bookings",
        confirm_delete: "admin.bookings.confirm_delete",
        delete_success: "admin.bookings.notifications.delete_success",
        delete_failed: "admin.bookings.errors.delete",
    };

    fn gateway(backend: &dyn Backend) -> &dyn EntityGateway<Self> {
        backend.bookings()
    }

    fn fetch_filter() -> Option<Filter> {
        Some(Filter::new().order_by("start_time", false))
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.status.as_str()];
        fields.extend(self.message.as_deref());
        fields.extend(self.notes.as_deref());
        fields
    }

    fn label(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingRow {
    pub id: String,
    pub customer: String,
    pub message: String,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
    pub status_label: String,
}

/// Bookings table, newest start time first, with customer names joined in
#[derive(Debug, Clone)]
pub struct BookingsView {
    pub list: ListView<Booking>,
    customers: HashMap<String, Customer>,
}

impl BookingsView {
    pub fn new(translator: Translator, page_size: u32) -> Self {
        Self {
            list: ListView::new(translator, page_size),
            customers: HashMap::new(),
        }
    }

    pub async fn load(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<(), ClientError> {
        self.list.load(backend, notifier).await?;
        match backend.customers().list(None).await {
            Ok(customers) => {
                self.customers = customers.into_iter().map(|c| (c.id.clone(), c)).collect();
            }
            // Rows still render with the fallback name
            Err(e) => tracing::warn!(error = %e, "Failed to load customers for bookings"),
        }
        Ok(())
    }

    pub fn customer_name(&self, booking: &Booking) -> String {
        self.customers
            .get(&booking.customer_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| self.list.translator().t("common.not_applicable"))
    }

    pub fn open_add(&self) -> BookingForm {
        BookingForm::new(FormMode::Add, self.list.translator().clone())
    }

    pub fn open_edit(&self, id: &str) -> Option<BookingForm> {
        let booking = self.list.find(id)?.clone();
        Some(BookingForm::new(FormMode::Edit(booking), self.list.translator().clone()))
    }

    /// Submit a form and keep the list in sync
    pub async fn save(
        &mut self,
        form: &BookingForm,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Booking, FormError> {
        let booking = form.submit(backend, notifier).await?;
        self.list.upsert(booking.clone());
        let mut rows = self.list.rows().to_vec();
        rows.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        self.list.set_rows(rows);
        Ok(booking)
    }

    pub fn view(&self) -> ListViewModel<BookingRow> {
        let t = self.list.translator();
        self.list.view(|b| BookingRow {
            id: b.id.clone(),
            customer: self.customer_name(b),
            message: b.message.clone().unwrap_or_default(),
            start_time: b.start_time.format("%Y-%m-%d %H:%M").to_string(),
            end_time: b.end_time.format("%Y-%m-%d %H:%M").to_string(),
            status: b.status,
            status_label: t.t(&format!("admin.forms.booking.status_options.{}", b.status.as_str())),
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

    #[tokio::test]
    async fn test_newest_first_with_customer_names() {
        let backend = MemoryBackend::default();
        backend
            .seed([serde_json::from_value::<Customer>(serde_json::json!({
                "id": "c1", "name": "Sam", "email": "sam@example.com"
            }))
            .unwrap()])
            .unwrap();
        let booking = |id: &str, customer: &str, day: u32| {
            serde_json::from_value::<Booking>(serde_json::json!({
                "id": id,
                "customer_id": customer,
                "start_time": format!("2026-05-{day:02}T10:00:00Z"),
                "end_time": format!("2026-05-{day:02}T10:30:00Z"),
                "status": "scheduled"
            }))
            .unwrap()
        };
        backend
            .seed([booking("b1", "c1", 3), booking("b2", "gone", 9)])
            .unwrap();

        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);
        let mut view = BookingsView::new(t, 10);
        view.load(&backend, &NotificationCenter::new()).await.unwrap();

        let model = view.view();
        assert_eq!(model.rows[0].id, "b2");
        assert_eq!(model.rows[0].customer, "N/A");
        assert_eq!(model.rows[1].customer, "Sam");
        assert_eq!(model.rows[1].status_label, "Scheduled");
    }
}
