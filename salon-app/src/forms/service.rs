//! Service form

use std::collections::BTreeMap;

use salon_client::Backend;
use shared::Decimal;
use shared::form::NumberField;
use shared::models::{Service, ServiceFields};

use super::{FormError, FormMode, FormView, OutcomeKeys, invalid, persist};
use crate::i18n::Translator;
use crate::notify::Notifier;
use crate::utils::validation::{self, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceField {
    Name,
    Description,
    DurationMinutes,
    Price,
    Category,
    Active,
}

const KEYS: OutcomeKeys = OutcomeKeys {
    add_success: "admin.forms.service.notifications.add_success",
    update_success: "admin.forms.service.notifications.update_success",
    add_failed: "admin.forms.service.errors.add",
    update_failed: "admin.forms.service.errors.update",
    conflict: None,
};

#[derive(Debug, Clone)]
pub struct ServiceForm {
    mode: FormMode<Service>,
    name: String,
    description: String,
    duration_minutes: NumberField<i32>,
    price: NumberField<Decimal>,
    category: String,
    is_active: bool,
    t: Translator,
}

impl ServiceForm {
    pub fn new(mode: FormMode<Service>, translator: Translator) -> Self {
        let existing = mode.existing().cloned();
        Self {
            name: existing.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
            description: existing
                .as_ref()
                .and_then(|s| s.description.clone())
                .unwrap_or_default(),
            duration_minutes: NumberField::from_value(existing.as_ref().map(|s| s.duration_minutes)),
            price: NumberField::from_value(existing.as_ref().map(|s| s.price)),
            category: existing
                .as_ref()
                .and_then(|s| s.category.clone())
                .unwrap_or_default(),
            is_active: existing.as_ref().is_none_or(|s| s.is_active),
            mode,
            t: translator,
        }
    }

    pub fn mode(&self) -> &FormMode<Service> {
        &self.mode
    }

    pub fn set_field(&mut self, field: ServiceField, raw: &str) {
        match field {
            ServiceField::Name => self.name = raw.to_string(),
            ServiceField::Description => self.description = raw.to_string(),
            ServiceField::DurationMinutes => self.duration_minutes = NumberField::parse(raw),
            ServiceField::Price => self.price = NumberField::parse(raw),
            ServiceField::Category => self.category = raw.to_string(),
            ServiceField::Active => self.is_active = raw.trim().eq_ignore_ascii_case("true"),
        }
    }

    /// Name required, duration > 0, price >= 0
    pub fn validate(&self) -> Option<ServiceFields> {
        let duration_minutes = self.duration_minutes.required().ok().filter(|d| *d > 0)?;
        let price = self.price.required().ok().filter(|p| *p >= Decimal::ZERO)?;
        Some(ServiceFields {
            name: validation::required_text(&self.name, MAX_NAME_LEN).ok()?,
            description: validation::optional_text_max(&self.description, MAX_NOTE_LEN).ok()?,
            duration_minutes,
            price,
            category: validation::optional_text_max(&self.category, MAX_SHORT_TEXT_LEN).ok()?,
            is_active: self.is_active,
        })
    }

    pub async fn submit(
        &self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Service, FormError> {
        let Some(fields) = self.validate() else {
            return Err(invalid(&self.t, notifier, "admin.forms.service.errors.required_fields"));
        };
        persist(
            backend.services(),
            &self.mode,
            &fields,
            &fields.name,
            KEYS,
            &self.t,
            notifier,
        )
        .await
    }

    pub fn view(&self) -> FormView {
        let editing = self.mode.is_edit();
        let (title, button) = if editing {
            ("admin.services.edit_modal_title", "admin.forms.service.buttons.update")
        } else {
            ("admin.services.add_modal_title", "admin.forms.service.buttons.add")
        };
        FormView {
            title: self.t.t(title),
            editing,
            values: BTreeMap::from([
                ("name", self.name.clone()),
                ("description", self.description.clone()),
                ("duration_minutes", self.duration_minutes.raw().to_string()),
                ("price", self.price.raw().to_string()),
                ("category", self.category.clone()),
                ("is_active", self.is_active.to_string()),
            ]),
            submit_label: self.t.t(button),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, TranslationStore};
    use std::sync::Arc;

    fn form(name: &str, duration: &str, price: &str) -> ServiceForm {
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);
        let mut form = ServiceForm::new(FormMode::Add, t);
        form.set_field(ServiceField::Name, name);
        form.set_field(ServiceField::DurationMinutes, duration);
        form.set_field(ServiceField::Price, price);
        form
    }

    #[test]
    fn test_validation_rules() {
        assert!(form("Haircut", "30", "15.5").validate().is_some());
        assert!(form("Haircut", "30", "0").validate().is_some());
        assert!(form("", "30", "15").validate().is_none());
        assert!(form("Haircut", "0", "15").validate().is_none());
        assert!(form("Haircut", "45.5", "15").validate().is_none());
        assert!(form("Haircut", "30", "-1").validate().is_none());
        assert!(form("Haircut", "30", "").validate().is_none());
    }

    #[test]
    fn test_new_service_is_active() {
        let fields = form("Shave", "20", "10").validate().unwrap();
        assert!(fields.is_active);
        assert_eq!(fields.duration_minutes, 20);
    }
}
