//! Inventory admin view
//!
//! Product table with search over name, brand and category. Add and edit
//! open the multi-step [`ProductForm`].

use salon_client::Backend;
use serde::Serialize;
use shared::models::{Currency, Product};

use super::list::{ListView, ListViewModel};
use crate::forms::{ProductForm, SubmitError};
use crate::i18n::Translator;
use crate::notify::Notifier;

#[derive(Debug, Clone, Serialize)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub currency: Currency,
    pub sale_price: String,
    pub quantity_on_hand: i64,
    pub reorder_level: Option<i64>,
    pub needs_reorder: bool,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            brand: p.brand.clone().unwrap_or_default(),
            category: p.category.clone().unwrap_or_default(),
            currency: p.currency,
            sale_price: p.display_sale_price(),
            quantity_on_hand: p.quantity_on_hand,
            reorder_level: p.reorder_level,
            needs_reorder: p.needs_reorder(),
            image_url: p.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InventoryView {
    pub list: ListView<Product>,
}

impl InventoryView {
    pub fn new(translator: Translator, page_size: u32) -> Self {
        Self {
            list: ListView::new(translator, page_size),
        }
    }

    pub fn open_add(&self) -> ProductForm {
        ProductForm::add(self.list.translator().clone())
    }

    /// Always rebuilt from the stored row, so a cancelled edit leaves no trace
    pub fn open_edit(&self, id: &str) -> Option<ProductForm> {
        let product = self.list.find(id)?.clone();
        Some(ProductForm::edit(product, self.list.translator().clone()))
    }

    pub async fn save(
        &mut self,
        form: &mut ProductForm,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Product, SubmitError> {
        let product = form.submit(backend, notifier).await?;
        self.list.upsert(product.clone());
        Ok(product)
    }

    pub fn view(&self) -> ListViewModel<ProductRow> {
        self.list.view(|p| ProductRow::from(p))
    }
}
