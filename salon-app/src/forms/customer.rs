//! Customer form

use std::collections::BTreeMap;

use salon_client::Backend;
use shared::form::FieldError;
use shared::models::{Customer, CustomerFields};

use super::{FormError, FormMode, FormView, OutcomeKeys, invalid, persist};
use crate::i18n::Translator;
use crate::notify::Notifier;
use crate::utils::validation::{self, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Name,
    Email,
    Phone,
}

const KEYS: OutcomeKeys = OutcomeKeys {
    add_success: "admin.customers.notifications.add_success",
    update_success: "admin.customers.notifications.update_success",
    add_failed: "admin.forms.customer.errors.add",
    update_failed: "admin.forms.customer.errors.update",
    conflict: Some("admin.forms.customer.errors.email_exists"),
};

#[derive(Debug, Clone)]
pub struct CustomerForm {
    mode: FormMode<Customer>,
    name: String,
    email: String,
    phone: String,
    t: Translator,
}

impl CustomerForm {
    pub fn new(mode: FormMode<Customer>, translator: Translator) -> Self {
        let (name, email, phone) = match &mode {
            FormMode::Add => Default::default(),
            FormMode::Edit(c) => (
                c.name.clone(),
                c.email.clone(),
                c.phone.clone().unwrap_or_default(),
            ),
        };
        Self {
            mode,
            name,
            email,
            phone,
            t: translator,
        }
    }

    pub fn mode(&self) -> &FormMode<Customer> {
        &self.mode
    }

    pub fn set_field(&mut self, field: CustomerField, raw: &str) {
        let target = match field {
            CustomerField::Name => &mut self.name,
            CustomerField::Email => &mut self.email,
            CustomerField::Phone => &mut self.phone,
        };
        *target = raw.to_string();
    }

    /// Parse the input into a payload
    pub fn validate(&self) -> Result<CustomerFields, (CustomerField, FieldError)> {
        let name = validation::required_text(&self.name, MAX_NAME_LEN)
            .map_err(|e| (CustomerField::Name, e))?;
        let email = validation::email(&self.email).map_err(|e| (CustomerField::Email, e))?;
        let phone = validation::optional_text_max(&self.phone, MAX_SHORT_TEXT_LEN)
            .map_err(|e| (CustomerField::Phone, e))?;
        Ok(CustomerFields {
            name,
            email,
            phone,
            auth_user_id: self.mode.existing().and_then(|c| c.auth_user_id.clone()),
        })
    }

    fn error_key(field: CustomerField) -> &'static str {
        match field {
            CustomerField::Name => "admin.forms.customer.errors.name_required",
            CustomerField::Email | CustomerField::Phone => {
                "admin.forms.customer.errors.invalid_email"
            }
        }
    }

    /// Validate, then create or update. A duplicate email reports `email_exists`.
    pub async fn submit(
        &self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Customer, FormError> {
        let fields = self
            .validate()
            .map_err(|(field, _)| invalid(&self.t, notifier, Self::error_key(field)))?;
        persist(
            backend.customers(),
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
            ("admin.customers.edit_modal_title", "admin.forms.customer.buttons.update")
        } else {
            ("admin.customers.add_modal_title", "admin.forms.customer.buttons.add")
        };
        FormView {
            title: self.t.t(title),
            editing,
            values: BTreeMap::from([
                ("name", self.name.clone()),
                ("email", self.email.clone()),
                ("phone", self.phone.clone()),
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

    fn filled(name: &str, email: &str) -> CustomerForm {
        let mut form = CustomerForm::new(FormMode::Add, translator());
        form.set_field(CustomerField::Name, name);
        form.set_field(CustomerField::Email, email);
        form
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            filled(" ", "sam@example.com").validate().unwrap_err().0,
            CustomerField::Name
        );
        assert!(matches!(
            filled("Sam", "not-an-email").validate(),
            Err((CustomerField::Email, FieldError::InvalidEmail(_)))
        ));
        let fields = filled(" Sam ", "sam@example.com").validate().unwrap();
        assert_eq!(fields.name, "Sam");
        assert_eq!(fields.phone, None);
    }

    #[tokio::test]
    async fn test_duplicate_email_reports_email_exists() {
        let backend = MemoryBackend::default();
        let center = NotificationCenter::new();

        filled("Sam", "sam@example.com")
            .submit(&backend, &center)
            .await
            .unwrap();
        let err = filled("Other Sam", "sam@example.com")
            .submit(&backend, &center)
            .await
            .unwrap_err();

        assert!(matches!(err, FormError::Backend(ref e) if e.is_conflict()));
        assert_eq!(
            center.last().unwrap().message,
            "A customer with this email already exists."
        );
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_call() {
        let backend = MemoryBackend::default();
        let center = NotificationCenter::new();

        let err = filled("Sam", "sam@").submit(&backend, &center).await.unwrap_err();
        assert!(matches!(err, FormError::Invalid(_)));
        assert!(backend.calls().is_empty());
    }
}
