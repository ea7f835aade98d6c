//! Staff form

use std::collections::BTreeMap;

use salon_client::Backend;
use shared::models::{Staff, StaffFields};

use super::{FormError, FormMode, FormView, OutcomeKeys, invalid, persist};
use crate::i18n::Translator;
use crate::notify::Notifier;
use crate::utils::validation::{self, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffField {
    Name,
    Phone,
    Bio,
    Active,
}

const KEYS: OutcomeKeys = OutcomeKeys {
    add_success: "admin.forms.staff.notifications.add_success",
    update_success: "admin.forms.staff.notifications.update_success",
    add_failed: "admin.forms.staff.errors.add",
    update_failed: "admin.forms.staff.errors.update",
    conflict: None,
};

#[derive(Debug, Clone)]
pub struct StaffForm {
    mode: FormMode<Staff>,
    name: String,
    phone: String,
    bio: String,
    is_active: bool,
    t: Translator,
}

impl StaffForm {
    pub fn new(mode: FormMode<Staff>, translator: Translator) -> Self {
        let mut form = Self {
            mode: FormMode::Add,
            name: String::new(),
            phone: String::new(),
            bio: String::new(),
            is_active: true,
            t: translator,
        };
        if let FormMode::Edit(staff) = &mode {
            form.name = staff.name.clone();
            form.phone = staff.phone.clone().unwrap_or_default();
            form.bio = staff.bio.clone().unwrap_or_default();
            form.is_active = staff.is_active;
        }
        form.mode = mode;
        form
    }

    pub fn mode(&self) -> &FormMode<Staff> {
        &self.mode
    }

    /// `Active` takes "true"/"false" (checkbox)
    pub fn set_field(&mut self, field: StaffField, raw: &str) {
        match field {
            StaffField::Name => self.name = raw.to_string(),
            StaffField::Phone => self.phone = raw.to_string(),
            StaffField::Bio => self.bio = raw.to_string(),
            StaffField::Active => self.is_active = raw.trim().eq_ignore_ascii_case("true"),
        }
    }

    pub fn validate(&self) -> Option<StaffFields> {
        Some(StaffFields {
            name: validation::required_text(&self.name, MAX_NAME_LEN).ok()?,
            phone: validation::optional_text_max(&self.phone, MAX_SHORT_TEXT_LEN).ok()?,
            bio: validation::optional_text_max(&self.bio, MAX_NOTE_LEN).ok()?,
            is_active: self.is_active,
        })
    }

    pub async fn submit(
        &self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Staff, FormError> {
        let Some(fields) = self.validate() else {
            return Err(invalid(&self.t, notifier, "admin.forms.staff.errors.name_required"));
        };
        persist(
            backend.staff(),
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
            ("admin.staff.edit_modal_title", "admin.forms.staff.buttons.update")
        } else {
            ("admin.staff.add_modal_title", "admin.forms.staff.buttons.add")
        };
        FormView {
            title: self.t.t(title),
            editing,
            values: BTreeMap::from([
                ("name", self.name.clone()),
                ("phone", self.phone.clone()),
                ("bio", self.bio.clone()),
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
    use crate::notify::NotificationCenter;
    use salon_client::MemoryBackend;
    use std::sync::Arc;

    fn translator() -> Translator {
        Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En)
    }

    #[tokio::test]
    async fn test_add_and_edit_staff() {
        let backend = MemoryBackend::default();
        let center = NotificationCenter::new();

        let mut form = StaffForm::new(FormMode::Add, translator());
        form.set_field(StaffField::Name, "Rami");
        form.set_field(StaffField::Active, "false");
        let staff = form.submit(&backend, &center).await.unwrap();
        assert!(!staff.is_active);
        assert_eq!(
            center.last().unwrap().message,
            "Staff member \"Rami\" added successfully!"
        );

        let mut form = StaffForm::new(FormMode::Edit(staff), translator());
        form.set_field(StaffField::Bio, "Beard specialist");
        let staff = form.submit(&backend, &center).await.unwrap();
        assert_eq!(staff.bio.as_deref(), Some("Beard specialist"));
        assert_eq!(staff.name, "Rami");
    }

    #[tokio::test]
    async fn test_name_required() {
        let backend = MemoryBackend::default();
        let center = NotificationCenter::new();
        let form = StaffForm::new(FormMode::Add, translator());

        assert!(matches!(
            form.submit(&backend, &center).await,
            Err(FormError::Invalid(_))
        ));
        assert!(backend.calls().is_empty());
    }
}
