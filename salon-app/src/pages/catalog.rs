//! Product catalog and product detail pages

use std::cmp::Ordering;
use std::str::FromStr;

use salon_client::{Backend, ClientResult};
use serde::Serialize;
use shared::models::Product;
use shared::query::Filter;
use shared::util::slugify;

use crate::core::{AppError, AppResult};
use crate::i18n::Translator;
use crate::notify::{Notification, NotificationCode, Notifier};

const UNCATEGORIZED: &str = "uncategorized";

/// Catalog sort order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::Default,
        SortOrder::PriceAsc,
        SortOrder::PriceDesc,
        SortOrder::NameAsc,
        SortOrder::NameDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Default => "default",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::NameAsc => "name_asc",
            SortOrder::NameDesc => "name_desc",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let by_name = || a.name.to_lowercase().cmp(&b.name.to_lowercase());
        match self {
            SortOrder::Default => Ordering::Equal,
            SortOrder::PriceAsc => a.sale_price().cmp(&b.sale_price()),
            SortOrder::PriceDesc => b.sale_price().cmp(&a.sale_price()),
            SortOrder::NameAsc => by_name(),
            SortOrder::NameDesc => by_name().reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("unknown sort order: {s}")))
    }
}

/// Detail page path of a product
pub fn product_path(product: &Product) -> String {
    let category = product
        .category
        .as_deref()
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| UNCATEGORIZED.to_string());
    format!("/product/{category}/{}", slugify(&product.name))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: String,
    pub price: String,
    /// Original price, shown struck through when discounted
    pub original_price: Option<String>,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub href: String,
}

impl CatalogItem {
    fn new(product: &Product, t: &Translator) -> Self {
        let discounted = product
            .discount_percentage
            .is_some_and(|discount| discount > shared::Decimal::ZERO);
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            description: product
                .description
                .clone()
                .unwrap_or_else(|| t.t("inventory.no_description")),
            price: product.display_sale_price(),
            original_price: discounted
                .then(|| product.original_price.map(|p| product.currency.format_amount(p)))
                .flatten(),
            image_url: product.image_url.clone(),
            in_stock: product.quantity_on_hand > 0,
            href: product_path(product),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub title: String,
    pub categories: Vec<String>,
    pub category: Option<String>,
    pub sort: SortOrder,
    pub items: Vec<CatalogItem>,
    pub empty_message: Option<String>,
}

/// Products loaded for the public catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub async fn load(
        backend: &dyn Backend,
        t: &Translator,
        notifier: &dyn Notifier,
    ) -> ClientResult<Self> {
        let products = backend
            .products()
            .list(Some(&Filter::new().order_by("name", true)))
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, "Failed to load catalog");
                notifier.notify(Notification::error(
                    NotificationCode::LoadFailed,
                    t.t("inventory.errors.load"),
                ));
            })?;
        Ok(Self::new(products))
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .products
            .iter()
            .filter_map(|p| p.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Products in `category` (all when `None`) in `sort` order
    pub fn browse(&self, category: Option<&str>, sort: SortOrder) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category.is_none() || p.category.as_deref() == category)
            .collect();
        products.sort_by(|a, b| sort.compare(a, b));
        products
    }

    pub fn view(&self, t: &Translator, category: Option<&str>, sort: SortOrder) -> CatalogView {
        let items: Vec<CatalogItem> = self
            .browse(category, sort)
            .into_iter()
            .map(|p| CatalogItem::new(p, t))
            .collect();
        let empty_message = items.is_empty().then(|| match category {
            Some(category) => t.t_with("inventory.no_products_in_category", &[("category", category)]),
            None => t.t("inventory.no_products_available"),
        });
        CatalogView {
            title: t.t("inventory.title"),
            categories: self.categories(),
            category: category.map(str::to_string),
            sort,
            items,
            empty_message,
        }
    }

    /// Resolve a detail path's slugs
    pub fn find_by_slugs(&self, category_slug: &str, name_slug: &str) -> Option<&Product> {
        let path = format!("/product/{category_slug}/{name_slug}");
        self.products.iter().find(|p| product_path(p) == path)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub item: CatalogItem,
    pub back_label: String,
}

/// Product detail page at `/product/{category}/{slug}`
pub async fn product_detail(
    backend: &dyn Backend,
    t: &Translator,
    notifier: &dyn Notifier,
    category_slug: &str,
    name_slug: &str,
) -> AppResult<ProductDetail> {
    let catalog = Catalog::load(backend, t, notifier).await?;
    let product = catalog
        .find_by_slugs(category_slug, name_slug)
        .ok_or_else(|| AppError::NotFound(t.t("inventory.errors.product_not_found")))?;
    Ok(ProductDetail {
        item: CatalogItem::new(product, t),
        back_label: t.t("navigation.inventory"),
    })
}
