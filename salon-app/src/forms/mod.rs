//! Admin entity forms
//!
//! Products use the multi-step [`ProductForm`]. Bookings, customers, staff
//! and services use single-step forms that parse their raw input into the
//! entity's `*Fields` payload and then create or update through
//! [`persist`].

pub mod booking;
pub mod customer;
pub mod product;
pub mod service;
pub mod staff;

pub use booking::{BookingChoices, BookingField, BookingForm, BookingInputError};
pub use customer::{CustomerField, CustomerForm};
pub use product::{ImagePreview, ProductField, ProductForm, Step, StepError, SubmitError, SubmitState};
pub use service::{ServiceField, ServiceForm};
pub use staff::{StaffField, StaffForm};

use std::collections::BTreeMap;

use salon_client::{ClientError, EntityGateway};
use serde::Serialize;
use shared::models::Entity;
use thiserror::Error;

use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};

/// Add a new row or edit an existing one
#[derive(Debug, Clone)]
pub enum FormMode<E> {
    Add,
    Edit(E),
}

impl<E: Entity> FormMode<E> {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }

    pub fn existing(&self) -> Option<&E> {
        match self {
            FormMode::Add => None,
            FormMode::Edit(entity) => Some(entity),
        }
    }
}

/// Serializable snapshot of a single-step form
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub title: String,
    pub editing: bool,
    pub values: BTreeMap<&'static str, String>,
    pub submit_label: String,
}

/// Why a single-step form did not save
#[derive(Debug, Error)]
pub enum FormError {
    /// Input rejected before any backend call; carries the translated message
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Backend(#[from] ClientError),
}

/// Translation keys for the outcomes of one form
#[derive(Debug, Clone, Copy)]
pub(crate) struct OutcomeKeys {
    pub add_success: &'static str,
    pub update_success: &'static str,
    pub add_failed: &'static str,
    pub update_failed: &'static str,
    /// Message for a unique-constraint violation, if the form has one
    pub conflict: Option<&'static str>,
}

/// Create or update, then notify with the matching outcome.
///
/// `label` is substituted for `{{name}}` in the success message.
pub(crate) async fn persist<E: Entity>(
    gateway: &dyn EntityGateway<E>,
    mode: &FormMode<E>,
    fields: &E::Fields,
    label: &str,
    keys: OutcomeKeys,
    t: &Translator,
    notifier: &dyn Notifier,
) -> Result<E, FormError> {
    let saved = match mode {
        FormMode::Add => gateway.create(fields).await,
        FormMode::Edit(existing) => gateway.update(existing.id(), fields).await,
    };
    match saved {
        Ok(entity) => {
            let key = if mode.is_edit() {
                keys.update_success
            } else {
                keys.add_success
            };
            tracing::info!(table = E::TABLE, id = %entity.id(), "Row saved");
            notifier.notify(Notification::success(
                NotificationCode::Saved,
                t.t_with(key, &[("name", label)]),
            ));
            Ok(entity)
        }
        Err(e) => {
            tracing::error!(table = E::TABLE, error = %e, "Failed to save row");
            let key = match keys.conflict {
                Some(conflict) if e.is_conflict() => conflict,
                _ if mode.is_edit() => keys.update_failed,
                _ => keys.add_failed,
            };
            notifier.notify(Notification::error(NotificationCode::SaveFailed, t.t(key)));
            Err(FormError::Backend(e))
        }
    }
}

/// Reject input with a translated message and a notification
pub(crate) fn invalid(t: &Translator, notifier: &dyn Notifier, key: &str) -> FormError {
    let message = t.t(key);
    notifier.notify(Notification::error(
        NotificationCode::ValidationFailed,
        message.clone(),
    ));
    FormError::Invalid(message)
}
