//! Product Model

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::form::FieldError;
use crate::pricing;
use crate::util::{deserialize_id, deserialize_null_default};

/// Price currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "SYP")]
    Syp,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Syp => "SYP",
        }
    }

    /// Display an amount, e.g. `$20.00` or `SYP 20.00`
    pub fn format_amount(&self, amount: Decimal) -> String {
        let amount = pricing::round_money(amount);
        match self {
            Currency::Usd => format!("${amount:.2}"),
            Currency::Syp => format!("SYP {amount:.2}"),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "SYP" => Ok(Currency::Syp),
            _ => Err(FieldError::InvalidChoice(s.to_string())),
        }
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub purchase_price: Option<Decimal>,
    /// Regular price before discount
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    /// Discount in percent (0-100)
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount_percentage: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub currency: Currency,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub quantity_on_hand: i64,
    #[serde(default)]
    pub reorder_level: Option<i64>,
    /// Hosted storage URL or external link
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Derived sale price
    pub fn sale_price(&self) -> Decimal {
        pricing::sale_price(self.original_price, self.discount_percentage)
    }

    /// Sale price formatted in the product's currency
    pub fn display_sale_price(&self) -> String {
        self.currency.format_amount(self.sale_price())
    }

    /// Stock at or below the reorder level
    pub fn needs_reorder(&self) -> bool {
        self.reorder_level
            .is_some_and(|level| self.quantity_on_hand <= level)
    }
}

impl Entity for Product {
    const TABLE: &'static str = "products";
    type Fields = ProductFields;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create/update product payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub purchase_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    pub currency: Currency,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percentage: Decimal,
    pub quantity_on_hand: i64,
    pub reorder_level: Option<i64>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_deserialize() {
        let json = r#"{
            "id": 12,
            "name": "Pomade",
            "brand": null,
            "original_price": 25,
            "discount_percentage": 20.0,
            "currency": null,
            "quantity_on_hand": 3,
            "reorder_level": 5
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, "12");
        assert_eq!(product.currency, Currency::Usd);
        assert_eq!(product.display_sale_price(), "$20.00");
        assert!(product.needs_reorder());
        assert!(product.image_url.is_none());
    }

    #[test]
    fn test_currency() {
        assert_eq!("syp".parse::<Currency>(), Ok(Currency::Syp));
        assert!("EUR".parse::<Currency>().is_err());
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), r#""USD""#);
        assert_eq!(Currency::Syp.format_amount("1500".parse().unwrap()), "SYP 1500.00");
    }
}
