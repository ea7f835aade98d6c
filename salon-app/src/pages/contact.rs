//! Contact page
//!
//! Salon details and weekly hours, plus the contact form that drops an
//! `unread` message into the admin inbox.

use salon_client::{Backend, ClientResult};
use serde::Serialize;
use shared::models::{Message, MessageFields, MessageStatus, OperatingHours, SalonSettings, weekday_key};

use crate::forms::{FormError, invalid};
use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};
use crate::utils::validation::{self, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoursRow {
    pub day: String,
    pub hours: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactPage {
    pub title: String,
    pub salon_name: String,
    pub phone: String,
    pub address: String,
    pub hours_title: String,
    pub hours: Vec<HoursRow>,
    pub submit_label: String,
}

/// `Monday: 09:00 - 18:00` style rows, `Closed` for closed days
pub fn hours_rows(hours: &OperatingHours, t: &Translator) -> Vec<HoursRow> {
    OperatingHours::WEEK
        .iter()
        .map(|&weekday| {
            let day = hours.day(weekday);
            HoursRow {
                day: t.t(&format!("common.days.{}", weekday_key(weekday))),
                hours: if day.is_open() {
                    format!("{} - {}", day.start.format("%H:%M"), day.end.format("%H:%M"))
                } else {
                    t.t("contact.closed")
                },
            }
        })
        .collect()
}

/// Load the page. Settings problems fall back to defaults silently.
pub async fn load(backend: &dyn Backend, t: &Translator) -> ClientResult<ContactPage> {
    let rows = backend.settings().list(None).await?;
    let (settings, warnings) = SalonSettings::from_rows(&rows);
    if !warnings.is_empty() {
        tracing::debug!(?warnings, "Contact page using default settings");
    }
    Ok(ContactPage {
        title: t.t("contact.title"),
        salon_name: settings.salon_name,
        phone: settings.phone,
        address: settings.address,
        hours_title: t.t("contact.hours"),
        hours: hours_rows(&settings.operating_hours, t),
        submit_label: t.t("contact.form.submit"),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Message,
}

/// Contact form input
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    name: String,
    email: String,
    phone: String,
    message: String,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: ContactField, raw: &str) {
        let target = match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Message => &mut self.message,
        };
        *target = raw.to_string();
    }

    fn validate(&self) -> Option<MessageFields> {
        Some(MessageFields {
            name: validation::required_text(&self.name, MAX_NAME_LEN).ok()?,
            email: validation::email(&self.email).ok()?,
            phone: validation::optional_text_max(&self.phone, MAX_SHORT_TEXT_LEN).ok()?,
            message: validation::required_text(&self.message, MAX_NOTE_LEN).ok()?,
            status: MessageStatus::Unread,
        })
    }

    /// Send the message. The form is cleared on success.
    pub async fn submit(
        &mut self,
        backend: &dyn Backend,
        t: &Translator,
        notifier: &dyn Notifier,
    ) -> Result<Message, FormError> {
        let Some(fields) = self.validate() else {
            return Err(invalid(t, notifier, "contact.form.required_fields"));
        };

        match backend.messages().create(&fields).await {
            Ok(message) => {
                tracing::info!(id = %message.id, "Contact message received");
                notifier.notify(Notification::success(
                    NotificationCode::MessageSent,
                    t.t("contact.form.success"),
                ));
                *self = Self::default();
                Ok(message)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send contact message");
                notifier.notify(Notification::error(
                    NotificationCode::MessageSendFailed,
                    t.t("contact.form.error"),
                ));
                Err(FormError::Backend(e))
            }
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

    fn filled() -> ContactForm {
        let mut form = ContactForm::new();
        form.set_field(ContactField::Name, "Rami");
        form.set_field(ContactField::Email, "rami@example.com");
        form.set_field(ContactField::Message, "Do you open on Fridays?");
        form
    }

    #[tokio::test]
    async fn test_submit_creates_unread_message() {
        let backend = MemoryBackend::default();
        let center = NotificationCenter::new();
        let mut form = filled();

        let message = form.submit(&backend, &translator(), &center).await.unwrap();
        assert_eq!(message.status, MessageStatus::Unread);
        assert_eq!(message.phone, None);
        assert_eq!(backend.rows::<Message>().unwrap().len(), 1);
        assert_eq!(center.codes(), vec![NotificationCode::MessageSent]);
        assert!(form.validate().is_none());
    }

    #[tokio::test]
    async fn test_invalid_email_blocks_submit() {
        let backend = MemoryBackend::default();
        let center = NotificationCenter::new();
        let mut form = filled();
        form.set_field(ContactField::Email, "rami@");

        let err = form.submit(&backend, &translator(), &center).await.unwrap_err();
        assert!(matches!(err, FormError::Invalid(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_input() {
        let backend = MemoryBackend::default();
        backend.fail_writes("messages", true);
        let center = NotificationCenter::new();
        let mut form = filled();

        assert!(form.submit(&backend, &translator(), &center).await.is_err());
        assert_eq!(center.codes(), vec![NotificationCode::MessageSendFailed]);
        assert!(form.validate().is_some());
    }

    #[test]
    fn test_hours_rows() {
        let rows = hours_rows(&OperatingHours::default(), &translator());
        assert_eq!(rows[0].day, "Monday");
        assert_eq!(rows[0].hours, "09:00 - 18:00");
        assert_eq!(rows[6].hours, "Closed");
    }
}
