//! Product snapshot handed to the cart by the catalog

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::value_objects::{Money, ProductId};

/// Catalog data captured at add-to-cart time.
///
/// The cart copies what it needs from the snapshot and never re-queries the
/// catalog, so later price changes do not reach existing lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub product_id: ProductId,
    #[validate(length(min = 1, message = "product name is required"))]
    pub name: String,
    #[validate(custom = "validate_price")]
    pub price: Money,
    /// Catalog markdown as a fraction of the price. Carried for display only.
    #[serde(default)]
    #[validate(custom = "validate_discount")]
    pub discount: Decimal,
    #[serde(default)]
    pub img_name: String,
    #[validate(length(min = 1, message = "sku is required"))]
    pub sku: String,
    #[serde(default)]
    pub unit: String,
}

impl ProductSnapshot {
    pub fn new(product_id: u64, name: impl Into<String>, price: Money) -> Self {
        Self {
            product_id: ProductId::new(product_id),
            name: name.into(),
            price,
            discount: Decimal::ZERO,
            img_name: String::new(),
            sku: String::new(),
            unit: String::new(),
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self { self.sku = sku.into(); self }
    pub fn with_image(mut self, img_name: impl Into<String>) -> Self { self.img_name = img_name.into(); self }
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self { self.unit = unit.into(); self }
    pub fn with_discount(mut self, discount: Decimal) -> Self { self.discount = discount; self }

    /// Price after the catalog markdown.
    pub fn discounted_price(&self) -> Money {
        self.price.scale_by(Decimal::ONE - self.discount)
    }
}

fn validate_price(price: &Money) -> Result<(), ValidationError> {
    if price.is_negative() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

fn validate_discount(discount: &Decimal) -> Result<(), ValidationError> {
    if (discount.is_sign_negative() && !discount.is_zero()) || *discount > Decimal::ONE {
        return Err(ValidationError::new("discount_out_of_range"));
    }
    Ok(())
}
