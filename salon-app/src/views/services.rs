//! Services admin view

use salon_client::Backend;
use serde::Serialize;
use shared::models::{Currency, Service};

use super::list::{ListView, ListViewModel};
use crate::forms::{FormError, FormMode, ServiceForm};
use crate::i18n::Translator;
use crate::notify::Notifier;

#[derive(Debug, Clone, Serialize)]
pub struct ServiceRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub duration_minutes: i32,
    pub price: String,
    pub active: String,
}

#[derive(Debug, Clone)]
pub struct ServicesView {
    pub list: ListView<Service>,
}

impl ServicesView {
    pub fn new(translator: Translator, page_size: u32) -> Self {
        Self {
            list: ListView::new(translator, page_size),
        }
    }

    pub fn open_add(&self) -> ServiceForm {
        ServiceForm::new(FormMode::Add, self.list.translator().clone())
    }

    pub fn open_edit(&self, id: &str) -> Option<ServiceForm> {
        let service = self.list.find(id)?.clone();
        Some(ServiceForm::new(FormMode::Edit(service), self.list.translator().clone()))
    }

    pub async fn save(
        &mut self,
        form: &ServiceForm,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Service, FormError> {
        let service = form.submit(backend, notifier).await?;
        self.list.upsert(service.clone());
        Ok(service)
    }

    pub fn view(&self) -> ListViewModel<ServiceRow> {
        let t = self.list.translator();
        self.list.view(|s| ServiceRow {
            id: s.id.clone(),
            name: s.name.clone(),
            category: s.category.clone().unwrap_or_default(),
            duration_minutes: s.duration_minutes,
            // Service prices are kept in the default currency
            price: Currency::default().format_amount(s.price),
            active: t.t(if s.is_active { "common.yes" } else { "common.no" }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::ServiceField;
    use crate::i18n::{Locale, TranslationStore};
    use crate::notify::NotificationCenter;
    use salon_client::MemoryBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_then_edit_updates_row_in_place() {
        let backend = MemoryBackend::default();
        let center = NotificationCenter::new();
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);
        let mut view = ServicesView::new(t, 10);
        view.list.load(&backend, &center).await.unwrap();

        let mut form = view.open_add();
        form.set_field(ServiceField::Name, "Haircut");
        form.set_field(ServiceField::DurationMinutes, "30");
        form.set_field(ServiceField::Price, "15");
        let service = view.save(&form, &backend, &center).await.unwrap();

        let mut form = view.open_edit(&service.id).unwrap();
        form.set_field(ServiceField::Price, "17.5");
        view.save(&form, &backend, &center).await.unwrap();

        let model = view.view();
        assert_eq!(model.rows.len(), 1);
        assert_eq!(model.rows[0].price, "$17.50");
        assert_eq!(
            center.last().unwrap().message,
            "Service \"Haircut\" updated successfully!"
        );
    }
}
