//! Staff admin view

use salon_client::Backend;
use serde::Serialize;
use shared::models::Staff;

use super::list::{ListView, ListViewModel};
use crate::forms::{FormError, FormMode, StaffForm};
use crate::i18n::Translator;
use crate::notify::Notifier;

#[derive(Debug, Clone, Serialize)]
pub struct StaffRow {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub active: String,
}

#[derive(Debug, Clone)]
pub struct StaffView {
    pub list: ListView<Staff>,
}

impl StaffView {
    pub fn new(translator: Translator, page_size: u32) -> Self {
        Self {
            list: ListView::new(translator, page_size),
        }
    }

    pub fn open_add(&self) -> StaffForm {
        StaffForm::new(FormMode::Add, self.list.translator().clone())
    }

    pub fn open_edit(&self, id: &str) -> Option<StaffForm> {
        let staff = self.list.find(id)?.clone();
        Some(StaffForm::new(FormMode::Edit(staff), self.list.translator().clone()))
    }

    pub async fn save(
        &mut self,
        form: &StaffForm,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Staff, FormError> {
        let staff = form.submit(backend, notifier).await?;
        self.list.upsert(staff.clone());
        Ok(staff)
    }

    pub fn view(&self) -> ListViewModel<StaffRow> {
        let t = self.list.translator();
        self.list.view(|s| StaffRow {
            id: s.id.clone(),
            name: s.name.clone(),
            phone: s.phone.clone().unwrap_or_default(),
            active: t.t(if s.is_active { "common.yes" } else { "common.no" }),
        })
    }
}
