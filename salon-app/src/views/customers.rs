//! Customers admin view

use salon_client::Backend;
use serde::Serialize;
use shared::models::Customer;

use super::list::{ListView, ListViewModel};
use crate::forms::{CustomerForm, FormError, FormMode};
use crate::i18n::Translator;
use crate::notify::Notifier;

#[derive(Debug, Clone, Serialize)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub joined: String,
}

#[derive(Debug, Clone)]
pub struct CustomersView {
    pub list: ListView<Customer>,
}

impl CustomersView {
    pub fn new(translator: Translator, page_size: u32) -> Self {
        Self {
            list: ListView::new(translator, page_size),
        }
    }

    pub fn open_add(&self) -> CustomerForm {
        CustomerForm::new(FormMode::Add, self.list.translator().clone())
    }

    pub fn open_edit(&self, id: &str) -> Option<CustomerForm> {
        let customer = self.list.find(id)?.clone();
        Some(CustomerForm::new(FormMode::Edit(customer), self.list.translator().clone()))
    }

    pub async fn save(
        &mut self,
        form: &CustomerForm,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Customer, FormError> {
        let customer = form.submit(backend, notifier).await?;
        self.list.upsert(customer.clone());
        Ok(customer)
    }

    pub fn view(&self) -> ListViewModel<CustomerRow> {
        let na = self.list.translator().t("common.not_applicable");
        self.list.view(|c| CustomerRow {
            id: c.id.clone(),
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone().unwrap_or_else(|| na.clone()),
            joined: c
                .created_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| na.clone()),
        })
    }
}
