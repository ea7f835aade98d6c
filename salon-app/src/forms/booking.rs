//! Booking form (admin)
//!
//! Customer, start and end are required and the end must come after the
//! start. Staff and service are optional here; the public booking portal
//! always sets a service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use salon_client::{Backend, ClientResult};
use serde::Serialize;
use shared::form::{ParseField, optional_text};
use shared::models::{Booking, BookingFields, BookingStatus};

use super::{FormError, FormMode, FormView, OutcomeKeys, invalid, persist};
use crate::i18n::Translator;
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingField {
    Customer,
    Staff,
    Service,
    StartTime,
    EndTime,
    Status,
    Message,
    Notes,
}

/// Why booking input was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingInputError {
    RequiredFields,
    InvalidDateTime,
    InvalidStatus,
    EndBeforeStart,
}

impl BookingInputError {
    pub fn translation_key(self) -> &'static str {
        match self {
            BookingInputError::RequiredFields => "admin.forms.booking.errors.required_fields",
            BookingInputError::InvalidDateTime | BookingInputError::InvalidStatus => {
                "admin.forms.booking.errors.invalid_datetime"
            }
            BookingInputError::EndBeforeStart => "admin.forms.booking.errors.end_before_start",
        }
    }
}

const KEYS: OutcomeKeys = OutcomeKeys {
    add_success: "admin.bookings.notifications.add_success",
    update_success: "admin.bookings.notifications.update_success",
    add_failed: "admin.forms.booking.errors.add",
    update_failed: "admin.forms.booking.errors.update",
    conflict: None,
};

/// `datetime-local` input value
fn input_value(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M").to_string()
}

/// One `<option>` of a select
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

/// Options for the select inputs
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingChoices {
    pub customers: Vec<Choice>,
    pub staff: Vec<Choice>,
    pub services: Vec<Choice>,
}

impl BookingChoices {
    pub async fn load(backend: &dyn Backend) -> ClientResult<Self> {
        let customers = backend.customers().list(None).await?;
        let staff = backend.staff().list(None).await?;
        let services = backend.services().list(None).await?;
        Ok(Self {
            customers: customers
                .into_iter()
                .map(|c| Choice {
                    label: format!("{} ({})", c.name, c.email),
                    id: c.id,
                })
                .collect(),
            staff: staff
                .into_iter()
                .filter(|s| s.is_active)
                .map(|s| Choice { id: s.id, label: s.name })
                .collect(),
            services: services
                .into_iter()
                .filter(|s| s.is_active)
                .map(|s| Choice { id: s.id, label: s.name })
                .collect(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BookingForm {
    mode: FormMode<Booking>,
    values: BTreeMap<&'static str, String>,
    t: Translator,
}

impl BookingForm {
    pub fn new(mode: FormMode<Booking>, translator: Translator) -> Self {
        let mut values = BTreeMap::from([
            ("customer_id", String::new()),
            ("staff_id", String::new()),
            ("service_id", String::new()),
            ("start_time", String::new()),
            ("end_time", String::new()),
            ("status", BookingStatus::Scheduled.as_str().to_string()),
            ("message", String::new()),
            ("notes", String::new()),
        ]);
        if let FormMode::Edit(b) = &mode {
            values.insert("customer_id", b.customer_id.clone());
            values.insert("staff_id", b.staff_id.clone().unwrap_or_default());
            values.insert("service_id", b.service_id.clone().unwrap_or_default());
            values.insert("start_time", input_value(b.start_time));
            values.insert("end_time", input_value(b.end_time));
            values.insert("status", b.status.as_str().to_string());
            values.insert("message", b.message.clone().unwrap_or_default());
            values.insert("notes", b.notes.clone().unwrap_or_default());
        }
        Self {
            mode,
            values,
            t: translator,
        }
    }

    pub fn mode(&self) -> &FormMode<Booking> {
        &self.mode
    }

    fn key(field: BookingField) -> &'static str {
        match field {
            BookingField::Customer => "customer_id",
            BookingField::Staff => "staff_id",
            BookingField::Service => "service_id",
            BookingField::StartTime => "start_time",
            BookingField::EndTime => "end_time",
            BookingField::Status => "status",
            BookingField::Message => "message",
            BookingField::Notes => "notes",
        }
    }

    pub fn set_field(&mut self, field: BookingField, raw: &str) {
        self.values.insert(Self::key(field), raw.to_string());
    }

    fn text(&self, field: BookingField) -> Option<String> {
        self.values
            .get(Self::key(field))
            .and_then(|v| optional_text(v))
    }

    pub fn validate(&self) -> Result<BookingFields, BookingInputError> {
        let (Some(customer_id), Some(start), Some(end)) = (
            self.text(BookingField::Customer),
            self.text(BookingField::StartTime),
            self.text(BookingField::EndTime),
        ) else {
            return Err(BookingInputError::RequiredFields);
        };
        let start_time = DateTime::<Utc>::parse_field(&start)
            .map_err(|_| BookingInputError::InvalidDateTime)?;
        let end_time = DateTime::<Utc>::parse_field(&end)
            .map_err(|_| BookingInputError::InvalidDateTime)?;
        if end_time <= start_time {
            return Err(BookingInputError::EndBeforeStart);
        }
        let status = match self.text(BookingField::Status) {
            Some(raw) => raw
                .parse::<BookingStatus>()
                .map_err(|_| BookingInputError::InvalidStatus)?,
            None => BookingStatus::Scheduled,
        };
        Ok(BookingFields {
            customer_id,
            staff_id: self.text(BookingField::Staff),
            service_id: self.text(BookingField::Service),
            start_time,
            end_time,
            status,
            message: self.text(BookingField::Message),
            notes: self.text(BookingField::Notes),
        })
    }

    pub async fn submit(
        &self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Booking, FormError> {
        let fields = self
            .validate()
            .map_err(|e| invalid(&self.t, notifier, e.translation_key()))?;
        persist(
            backend.bookings(),
            &self.mode,
            &fields,
            "",
            KEYS,
            &self.t,
            notifier,
        )
        .await
    }

    pub fn view(&self) -> FormView {
        let editing = self.mode.is_edit();
        let (title, button) = if editing {
            ("admin.bookings.edit_modal_title", "admin.forms.booking.buttons.update")
        } else {
            ("admin.bookings.add_modal_title", "admin.forms.booking.buttons.add")
        };
        FormView {
            title: self.t.t(title),
            editing,
            values: self.values.clone(),
            submit_label: self.t.t(button),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, TranslationStore};
    use std::sync::Arc;

    fn form(customer: &str, start: &str, end: &str) -> BookingForm {
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);
        let mut form = BookingForm::new(FormMode::Add, t);
        form.set_field(BookingField::Customer, customer);
        form.set_field(BookingField::StartTime, start);
        form.set_field(BookingField::EndTime, end);
        form
    }

    #[test]
    fn test_required_and_ordering() {
        assert_eq!(
            form("", "2026-05-04T10:00", "2026-05-04T11:00").validate(),
            Err(BookingInputError::RequiredFields)
        );
        assert_eq!(
            form("c1", "soon", "2026-05-04T11:00").validate(),
            Err(BookingInputError::InvalidDateTime)
        );
        assert_eq!(
            form("c1", "2026-05-04T11:00", "2026-05-04T11:00").validate(),
            Err(BookingInputError::EndBeforeStart)
        );

        let fields = form("c1", "2026-05-04T10:00", "2026-05-04T11:00")
            .validate()
            .unwrap();
        assert_eq!(fields.status, BookingStatus::Scheduled);
        assert_eq!(fields.service_id, None);
    }

    #[test]
    fn test_edit_prefills_inputs() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "id": 4,
            "customer_id": 9,
            "start_time": "2026-05-04T10:00:00Z",
            "end_time": "2026-05-04T10:30:00Z",
            "status": "no_show"
        }))
        .unwrap();
        let t = Translator::new(Arc::new(TranslationStore::embedded().unwrap()), Locale::En);
        let form = BookingForm::new(FormMode::Edit(booking), t);
        let view = form.view();

        assert_eq!(view.values["start_time"], "2026-05-04T10:00");
        assert_eq!(view.values["status"], "no_show");
        assert_eq!(form.validate().unwrap().customer_id, "9");
    }
}
