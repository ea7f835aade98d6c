//! Multi-step product form
//!
//! Three linear steps (basic info, pricing & stock, image) over one draft.
//! Each step validates before the next one is entered; the final submit
//! validates again regardless of the step it is called from.
//!
//! Submission runs `Idle -> Uploading -> Saving -> CleaningUp -> Done | Failed`:
//!
//! - a selected file is uploaded first; an upload failure stops everything;
//! - the product is created or updated;
//! - after a successful save, a replaced hosted image is deleted;
//! - after a failed save, an image uploaded by this submission is deleted.
//!
//! Images outside the hosted storage namespace are never deleted.

use std::collections::BTreeMap;

use salon_client::{Backend, ClientError, ImageUpload};
use serde::Serialize;
use shared::form::{FieldError, NumberField, optional_text};
use shared::models::{Currency, Product, ProductFields};
use shared::{Decimal, pricing};
use thiserror::Error;

use super::FormMode;
use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};

/// Form step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    BasicInfo,
    PricingStock,
    Image,
}

impl Step {
    pub const TOTAL: u8 = 3;

    /// 1-based position
    pub fn number(self) -> u8 {
        match self {
            Step::BasicInfo => 1,
            Step::PricingStock => 2,
            Step::Image => 3,
        }
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::BasicInfo => Some(Step::PricingStock),
            Step::PricingStock => Some(Step::Image),
            Step::Image => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::BasicInfo => None,
            Step::PricingStock => Some(Step::BasicInfo),
            Step::Image => Some(Step::PricingStock),
        }
    }

    pub fn title_key(self) -> &'static str {
        match self {
            Step::BasicInfo => "admin.forms.product.steps.basic_info",
            Step::PricingStock => "admin.forms.product.steps.pricing_stock",
            Step::Image => "admin.forms.product.steps.image",
        }
    }
}

/// Editable product fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Description,
    Brand,
    Category,
    PurchasePrice,
    OriginalPrice,
    Currency,
    DiscountPercentage,
    QuantityOnHand,
    ReorderLevel,
    ImageUrl,
}

/// Form state as typed by the user
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub purchase_price: NumberField<Decimal>,
    pub original_price: NumberField<Decimal>,
    pub currency: Currency,
    pub discount_percentage: NumberField<Decimal>,
    pub quantity_on_hand: NumberField<i64>,
    pub reorder_level: NumberField<i64>,
    pub image_url: String,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            brand: String::new(),
            category: String::new(),
            purchase_price: NumberField::empty(),
            original_price: NumberField::empty(),
            currency: Currency::Usd,
            discount_percentage: NumberField::from_value(Some(Decimal::ZERO)),
            quantity_on_hand: NumberField::from_value(Some(0)),
            reorder_level: NumberField::empty(),
            image_url: String::new(),
        }
    }
}

impl ProductDraft {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            brand: product.brand.clone().unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
            purchase_price: NumberField::from_value(product.purchase_price),
            original_price: NumberField::from_value(product.original_price),
            currency: product.currency,
            discount_percentage: NumberField::from_value(Some(
                product.discount_percentage.unwrap_or_default(),
            )),
            quantity_on_hand: NumberField::from_value(Some(product.quantity_on_hand)),
            reorder_level: NumberField::from_value(product.reorder_level),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }

    fn check_name(&self) -> Result<(), StepError> {
        optional_text(&self.name)
            .map(|_| ())
            .ok_or(StepError::RequiredName)
    }

    fn check_quantity(&self) -> Result<i64, StepError> {
        match self.quantity_on_hand.required() {
            Ok(quantity) if quantity >= 0 => Ok(quantity),
            _ => Err(StepError::InvalidQuantity),
        }
    }

    /// Blank discount counts as 0
    fn check_discount(&self) -> Result<Decimal, StepError> {
        match self.discount_percentage.value() {
            Ok(value) => {
                let discount = value.unwrap_or_default();
                if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
                    Err(StepError::InvalidDiscount)
                } else {
                    Ok(discount)
                }
            }
            Err(_) => Err(StepError::InvalidDiscount),
        }
    }
}

/// What the image area shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImagePreview {
    None,
    /// Stored or typed URL
    Remote { url: String },
    /// Selected file, not uploaded yet
    Local { file_name: String },
}

/// Submission phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitState {
    Idle,
    Uploading,
    Saving,
    CleaningUp,
    Done,
    Failed,
}

/// Step validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepError {
    #[error("product name is required")]
    RequiredName,
    #[error("quantity must be a whole number of 0 or greater")]
    InvalidQuantity,
    #[error("discount must be between 0 and 100")]
    InvalidDiscount,
    #[error("name and quantity must be valid before saving")]
    RequiredFieldsFinal,
}

impl StepError {
    pub fn translation_key(self) -> &'static str {
        match self {
            StepError::RequiredName => "admin.forms.product.errors.required_name",
            StepError::InvalidQuantity => "admin.forms.product.errors.invalid_quantity",
            StepError::InvalidDiscount => "admin.forms.product.errors.invalid_discount",
            StepError::RequiredFieldsFinal => "admin.forms.product.errors.required_fields_final",
        }
    }
}

/// Why a submission did not produce a product
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("validation failed: {0}")]
    Validation(StepError),
    #[error("image upload failed: {0}")]
    Upload(ClientError),
    #[error("saving the product failed: {0}")]
    Save(ClientError),
    #[error("the form was already submitted")]
    AlreadySubmitted,
}

/// Serializable snapshot for rendering
#[derive(Debug, Clone, Serialize)]
pub struct ProductFormView {
    pub title: String,
    pub step: Step,
    pub step_title: String,
    pub progress: String,
    pub editing: bool,
    pub values: BTreeMap<&'static str, String>,
    pub currency: Currency,
    pub sale_price: String,
    pub preview: ImagePreview,
    pub step_error: Option<String>,
    pub error: Option<String>,
    pub submit_state: SubmitState,
    pub submit_label: String,
}

/// The product form
#[derive(Debug)]
pub struct ProductForm {
    mode: FormMode<Product>,
    step: Step,
    draft: ProductDraft,
    initial_image_url: Option<String>,
    image_file: Option<ImageUpload>,
    preview: ImagePreview,
    step_errors: BTreeMap<Step, StepError>,
    error: Option<String>,
    state: SubmitState,
    t: Translator,
}

impl ProductForm {
    pub fn new(mode: FormMode<Product>, translator: Translator) -> Self {
        let (draft, initial_image_url) = match &mode {
            FormMode::Add => (ProductDraft::default(), None),
            FormMode::Edit(product) => (
                ProductDraft::from_product(product),
                product.image_url.clone().filter(|url| !url.is_empty()),
            ),
        };
        let preview = match &initial_image_url {
            Some(url) => ImagePreview::Remote { url: url.clone() },
            None => ImagePreview::None,
        };
        Self {
            mode,
            step: Step::BasicInfo,
            draft,
            initial_image_url,
            image_file: None,
            preview,
            step_errors: BTreeMap::new(),
            error: None,
            state: SubmitState::Idle,
            t: translator,
        }
    }

    pub fn add(translator: Translator) -> Self {
        Self::new(FormMode::Add, translator)
    }

    pub fn edit(product: Product, translator: Translator) -> Self {
        Self::new(FormMode::Edit(product), translator)
    }

    // ========== Accessors ==========

    pub fn mode(&self) -> &FormMode<Product> {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn initial_image_url(&self) -> Option<&str> {
        self.initial_image_url.as_deref()
    }

    pub fn image_file(&self) -> Option<&ImageUpload> {
        self.image_file.as_ref()
    }

    pub fn preview(&self) -> &ImagePreview {
        &self.preview
    }

    pub fn step_error(&self, step: Step) -> Option<StepError> {
        self.step_errors.get(&step).copied()
    }

    /// General (non-step) error message
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submit_state(&self) -> SubmitState {
        self.state
    }

    /// Derived on every call from the current original price and discount
    pub fn sale_price(&self) -> Decimal {
        pricing::sale_price(
            self.draft.original_price.get(),
            self.draft.discount_percentage.get(),
        )
    }

    pub fn display_sale_price(&self) -> String {
        self.draft.currency.format_amount(self.sale_price())
    }

    // ========== Input ==========

    /// Set a field from raw input.
    ///
    /// Numeric input is always accepted and its parse outcome kept on the
    /// field. Only an unknown currency is rejected (the value is unchanged).
    pub fn set_field(&mut self, field: ProductField, raw: &str) -> Result<(), FieldError> {
        let draft = &mut self.draft;
        match field {
            ProductField::Name => draft.name = raw.to_string(),
            ProductField::Description => draft.description = raw.to_string(),
            ProductField::Brand => draft.brand = raw.to_string(),
            ProductField::Category => draft.category = raw.to_string(),
            ProductField::PurchasePrice => draft.purchase_price = NumberField::parse(raw),
            ProductField::OriginalPrice => draft.original_price = NumberField::parse(raw),
            ProductField::Currency => draft.currency = raw.parse()?,
            ProductField::DiscountPercentage => draft.discount_percentage = NumberField::parse(raw),
            ProductField::QuantityOnHand => draft.quantity_on_hand = NumberField::parse(raw),
            ProductField::ReorderLevel => draft.reorder_level = NumberField::parse(raw),
            ProductField::ImageUrl => {
                draft.image_url = raw.to_string();
                self.image_file = None;
                self.preview = match optional_text(raw) {
                    Some(url) => ImagePreview::Remote { url },
                    None => ImagePreview::None,
                };
            }
        }
        Ok(())
    }

    /// Pick a file (`Some`) or clear the file picker (`None`).
    ///
    /// Picking a file clears the URL field. Clearing the picker restores the
    /// initial image, both in the preview and in the saved URL.
    pub fn select_file(&mut self, file: Option<ImageUpload>) {
        match file {
            Some(file) => {
                self.draft.image_url.clear();
                self.preview = ImagePreview::Local {
                    file_name: file.file_name.clone(),
                };
                self.image_file = Some(file);
            }
            None => {
                self.image_file = None;
                self.draft.image_url = self.initial_image_url.clone().unwrap_or_default();
                self.preview = match &self.initial_image_url {
                    Some(url) => ImagePreview::Remote { url: url.clone() },
                    None => ImagePreview::None,
                };
            }
        }
    }

    /// Clear file, URL and preview. Storage is only touched on submit.
    pub fn remove_image(&mut self, notifier: &dyn Notifier) {
        self.image_file = None;
        self.draft.image_url.clear();
        self.preview = ImagePreview::None;
        notifier.notify(Notification::success(
            NotificationCode::ImagePreviewCleared,
            self.t.t("admin.forms.product.notifications.image_removed_preview"),
        ));
    }

    // ========== Navigation ==========

    fn validate_step(&self, step: Step) -> Result<(), StepError> {
        match step {
            Step::BasicInfo => self.draft.check_name(),
            Step::PricingStock => {
                self.draft.check_quantity()?;
                self.draft.check_discount().map(|_| ())
            }
            Step::Image => Ok(()),
        }
    }

    /// Validate the current step and advance. On failure the error is
    /// recorded for the step and the step does not change.
    pub fn next(&mut self) -> Result<Step, StepError> {
        if let Err(e) = self.validate_step(self.step) {
            self.step_errors.insert(self.step, e);
            return Err(e);
        }
        self.step_errors.remove(&self.step);
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step, keeping all entered data
    pub fn previous(&mut self) -> Step {
        self.step_errors.remove(&self.step);
        if let Some(previous) = self.step.previous() {
            self.step_errors.remove(&previous);
            self.step = previous;
        }
        self.step
    }

    // ========== Submission ==========

    fn validate_final(&self) -> Result<(), StepError> {
        if self.draft.check_name().is_err() || self.draft.check_quantity().is_err() {
            return Err(StepError::RequiredFieldsFinal);
        }
        self.draft.check_discount().map(|_| ())
    }

    fn payload(&self, image_url: Option<String>) -> ProductFields {
        let draft = &self.draft;
        ProductFields {
            name: draft.name.trim().to_string(),
            description: optional_text(&draft.description),
            brand: optional_text(&draft.brand),
            category: optional_text(&draft.category),
            purchase_price: draft.purchase_price.get(),
            original_price: draft.original_price.get(),
            currency: draft.currency,
            discount_percentage: draft.discount_percentage.get().unwrap_or_default(),
            quantity_on_hand: draft.quantity_on_hand.get().unwrap_or_default(),
            reorder_level: draft.reorder_level.get(),
            image_url,
        }
    }

    fn fail(&mut self, notifier: &dyn Notifier, code: NotificationCode, key: &str) {
        let message = self.t.t(key);
        self.error = Some(message.clone());
        notifier.notify(Notification::error(code, message));
    }

    /// Upload, save and clean up. See the module docs for the sequence.
    pub async fn submit(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<Product, SubmitError> {
        if self.state == SubmitState::Done {
            return Err(SubmitError::AlreadySubmitted);
        }
        self.error = None;

        if let Err(e) = self.validate_final() {
            self.fail(notifier, NotificationCode::ValidationFailed, e.translation_key());
            return Err(SubmitError::Validation(e));
        }

        let images = backend.images();
        let initial_hosted = self
            .initial_image_url
            .clone()
            .filter(|url| images.namespace().owns(url));

        let mut final_url = optional_text(&self.draft.image_url);
        let mut uploaded: Option<String> = None;
        let mut stale: Option<String> = None;

        if let Some(file) = self.image_file.clone() {
            self.state = SubmitState::Uploading;
            notifier.notify(Notification::info(
                NotificationCode::UploadingImage,
                self.t.t("admin.forms.product.notifications.uploading_image"),
            ));
            match images.upload_image(file).await {
                Ok(url) => {
                    final_url = Some(url.clone());
                    uploaded = Some(url);
                    if self.is_editing() {
                        stale = initial_hosted.clone();
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Image upload failed");
                    self.state = SubmitState::Failed;
                    self.fail(
                        notifier,
                        NotificationCode::UploadFailed,
                        "admin.forms.product.errors.upload",
                    );
                    return Err(SubmitError::Upload(e));
                }
            }
        } else if self.is_editing() && self.initial_image_url != final_url {
            stale = initial_hosted.clone();
        }

        self.state = SubmitState::Saving;
        let fields = self.payload(final_url);
        let saved = match &self.mode {
            FormMode::Add => backend.products().create(&fields).await,
            FormMode::Edit(product) => backend.products().update(&product.id, &fields).await,
        };

        match saved {
            Ok(product) => {
                let (code, key) = if self.is_editing() {
                    (
                        NotificationCode::ProductUpdated,
                        "admin.forms.product.notifications.update_success",
                    )
                } else {
                    (
                        NotificationCode::ProductAdded,
                        "admin.forms.product.notifications.add_success",
                    )
                };
                tracing::info!(product_id = %product.id, name = %product.name, "Product saved");
                notifier.notify(Notification::success(
                    code,
                    self.t.t_with(key, &[("name", product.name.as_str())]),
                ));

                if let Some(url) = stale {
                    self.state = SubmitState::CleaningUp;
                    match images.delete_image(&url).await {
                        Ok(()) => notifier.notify(Notification::success(
                            NotificationCode::OldImageDeleted,
                            self.t.t("admin.forms.product.notifications.old_image_deleted"),
                        )),
                        Err(e) => {
                            tracing::warn!(error = %e, url = %url, "Failed to delete old image");
                            notifier.notify(Notification::warning(
                                NotificationCode::OldImageDeleteFailed,
                                self.t.t("admin.forms.product.errors.delete_old_image"),
                            ));
                        }
                    }
                }

                self.image_file = None;
                self.state = SubmitState::Done;
                Ok(product)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save product");
                let (code, key) = if self.is_editing() {
                    (
                        NotificationCode::ProductUpdateFailed,
                        "admin.forms.product.errors.update",
                    )
                } else {
                    (
                        NotificationCode::ProductAddFailed,
                        "admin.forms.product.errors.add",
                    )
                };
                self.fail(notifier, code, key);

                if let Some(url) = uploaded {
                    self.state = SubmitState::CleaningUp;
                    match images.delete_image(&url).await {
                        Ok(()) => notifier.notify(Notification::warning(
                            NotificationCode::UploadReverted,
                            self.t.t("admin.forms.product.notifications.upload_reverted"),
                        )),
                        Err(revert) => {
                            tracing::error!(error = %revert, url = %url, "Failed to revert image upload");
                            notifier.notify(Notification::error(
                                NotificationCode::RevertFailed,
                                self.t.t("admin.forms.product.errors.revert_upload"),
                            ));
                        }
                    }
                }

                self.state = SubmitState::Failed;
                Err(SubmitError::Save(e))
            }
        }
    }

    // ========== Rendering ==========

    pub fn view(&self) -> ProductFormView {
        let draft = &self.draft;
        let values = BTreeMap::from([
            ("name", draft.name.clone()),
            ("description", draft.description.clone()),
            ("brand", draft.brand.clone()),
            ("category", draft.category.clone()),
            ("purchase_price", draft.purchase_price.raw().to_string()),
            ("original_price", draft.original_price.raw().to_string()),
            ("discount_percentage", draft.discount_percentage.raw().to_string()),
            ("quantity_on_hand", draft.quantity_on_hand.raw().to_string()),
            ("reorder_level", draft.reorder_level.raw().to_string()),
            ("image_url", draft.image_url.clone()),
        ]);
        let (title_key, submit_key) = if self.is_editing() {
            ("admin.inventory.edit_modal_title", "admin.forms.product.buttons.update")
        } else {
            ("admin.inventory.add_modal_title", "admin.forms.product.buttons.add")
        };
        let submit_label = match self.state {
            SubmitState::Uploading | SubmitState::Saving | SubmitState::CleaningUp => {
                self.t.t("common.saving")
            }
            _ => self.t.t(submit_key),
        };
        let current = self.step.number().to_string();
        let total = Step::TOTAL.to_string();
        ProductFormView {
            title: self.t.t(title_key),
            step: self.step,
            step_title: self.t.t(self.step.title_key()),
            progress: self.t.t_with(
                "common.step_progress",
                &[("current", current.as_str()), ("total", total.as_str())],
            ),
            editing: self.is_editing(),
            values,
            currency: draft.currency,
            sale_price: self.display_sale_price(),
            preview: self.preview.clone(),
            step_error: self
                .step_error(self.step)
                .map(|e| self.t.t(e.translation_key())),
            error: self.error.clone(),
            submit_state: self.state,
            submit_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, TranslationStore};
    use std::sync::Arc;

    fn form() -> ProductForm {
        let store = TranslationStore::embedded().unwrap();
        ProductForm::add(Translator::new(Arc::new(store), Locale::En))
    }

    #[test]
    fn test_add_defaults() {
        let form = form();
        assert_eq!(form.step(), Step::BasicInfo);
        assert_eq!(form.draft().currency, Currency::Usd);
        assert_eq!(form.draft().quantity_on_hand.get(), Some(0));
        assert_eq!(form.draft().discount_percentage.get(), Some(Decimal::ZERO));
        assert_eq!(form.preview(), &ImagePreview::None);
        assert_eq!(form.submit_state(), SubmitState::Idle);
    }

    #[test]
    fn test_name_required_for_step_one() {
        let mut form = form();
        form.set_field(ProductField::Name, "   ").unwrap();
        assert_eq!(form.next(), Err(StepError::RequiredName));
        assert_eq!(form.step(), Step::BasicInfo);
        assert_eq!(form.step_error(Step::BasicInfo), Some(StepError::RequiredName));

        form.set_field(ProductField::Name, "Pomade").unwrap();
        assert_eq!(form.next(), Ok(Step::PricingStock));
        assert_eq!(form.step_error(Step::BasicInfo), None);
    }

    #[test]
    fn test_quantity_and_discount_gate_step_two() {
        let mut form = form();
        form.set_field(ProductField::Name, "Pomade").unwrap();
        form.next().unwrap();

        for bad in ["-1", "2.5", "", "abc"] {
            form.set_field(ProductField::QuantityOnHand, bad).unwrap();
            assert_eq!(form.next(), Err(StepError::InvalidQuantity), "quantity {bad:?}");
        }
        form.set_field(ProductField::QuantityOnHand, "10").unwrap();

        for bad in ["101", "-0.5", "ten"] {
            form.set_field(ProductField::DiscountPercentage, bad).unwrap();
            assert_eq!(form.next(), Err(StepError::InvalidDiscount), "discount {bad:?}");
            assert_eq!(form.step(), Step::PricingStock);
        }

        form.set_field(ProductField::DiscountPercentage, "").unwrap();
        assert_eq!(form.next(), Ok(Step::Image));
    }

    #[test]
    fn test_previous_keeps_data_and_clears_errors() {
        let mut form = form();
        form.set_field(ProductField::Name, "Pomade").unwrap();
        form.next().unwrap();
        form.set_field(ProductField::QuantityOnHand, "-3").unwrap();
        assert!(form.next().is_err());

        assert_eq!(form.previous(), Step::BasicInfo);
        assert_eq!(form.step_error(Step::PricingStock), None);
        assert_eq!(form.draft().name, "Pomade");
        assert_eq!(form.draft().quantity_on_hand.raw(), "-3");
        assert_eq!(form.previous(), Step::BasicInfo);
    }

    #[test]
    fn test_sale_price_is_derived() {
        let mut form = form();
        form.set_field(ProductField::OriginalPrice, "25.00").unwrap();
        form.set_field(ProductField::DiscountPercentage, "20").unwrap();
        assert_eq!(form.display_sale_price(), "$20.00");

        form.set_field(ProductField::DiscountPercentage, "0").unwrap();
        assert_eq!(form.display_sale_price(), "$25.00");

        form.set_field(ProductField::OriginalPrice, "abc").unwrap();
        assert_eq!(form.display_sale_price(), "$0.00");

        form.set_field(ProductField::Currency, "SYP").unwrap();
        form.set_field(ProductField::OriginalPrice, "1500").unwrap();
        assert_eq!(form.display_sale_price(), "SYP 1500.00");
        assert!(form.set_field(ProductField::Currency, "EUR").is_err());
        assert_eq!(form.draft().currency, Currency::Syp);
    }

    #[test]
    fn test_image_inputs() {
        let mut form = form();
        form.set_field(ProductField::ImageUrl, "https://cdn.example.com/a.png")
            .unwrap();
        assert_eq!(
            form.preview(),
            &ImagePreview::Remote {
                url: "https://cdn.example.com/a.png".into()
            }
        );

        form.select_file(Some(ImageUpload::new("b.png", vec![1])));
        assert_eq!(form.draft().image_url, "");
        assert_eq!(
            form.preview(),
            &ImagePreview::Local {
                file_name: "b.png".into()
            }
        );

        form.set_field(ProductField::ImageUrl, "https://cdn.example.com/c.png")
            .unwrap();
        assert!(form.image_file().is_none());

        form.select_file(None);
        assert_eq!(form.preview(), &ImagePreview::None);
        assert_eq!(form.draft().image_url, "");
    }

    #[test]
    fn test_view_labels() {
        let mut form = form();
        form.set_field(ProductField::Name, "Pomade").unwrap();
        form.next().unwrap();
        let view = form.view();
        assert_eq!(view.title, "Add New Product");
        assert_eq!(view.progress, "Step 2 of 3");
        assert_eq!(view.step_title, "Step 2: Pricing & Stock");
        assert_eq!(view.submit_label, "Add Product");
        assert_eq!(view.values["name"], "Pomade");
    }
}
