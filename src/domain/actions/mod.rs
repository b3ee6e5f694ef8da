//! Cart actions
//!
//! [`CartCommand`] is what arrives from the UI layer (JSON, loosely typed
//! quantities). It is checked once, at the boundary, and turned into a
//! [`CartAction`] which the reducer accepts without further validation.

use serde::Deserialize;
use validator::Validate;

use crate::domain::aggregates::{CartSnapshot, CartState, ProductSnapshot};
use crate::domain::value_objects::{CouponCode, ProductId};
use crate::StorefrontError;

/// Validated cart mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum CartAction {
    AddItem { product: ProductSnapshot, quantity: u32 },
    RemoveItem { product_id: ProductId },
    /// A quantity of zero removes the line.
    UpdateQuantity { product_id: ProductId, quantity: u32 },
    ApplyCoupon { code: CouponCode },
    ClearCart,
    ToggleCart,
    SetCartOpen { is_open: bool },
    Rehydrate(CartSnapshot),
}

/// Wire form of a cart action, e.g. `{"type":"ADD_ITEM","payload":{...}}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum CartCommand {
    AddItem { product: ProductSnapshot, quantity: i64 },
    RemoveItem { product_id: ProductId },
    UpdateQuantity { product_id: ProductId, quantity: i64 },
    ApplyCoupon { code: String },
    ClearCart,
    ToggleCart,
    SetCartOpen { is_open: bool },
    LoadCart(CartSnapshot),
}

impl CartCommand {
    pub fn from_json(raw: &str) -> Result<Self, StorefrontError> {
        serde_json::from_str(raw).map_err(StorefrontError::MalformedCommand)
    }
}

impl TryFrom<CartCommand> for CartAction {
    type Error = StorefrontError;

    fn try_from(command: CartCommand) -> Result<Self, Self::Error> {
        Ok(match command {
            CartCommand::AddItem { product, quantity } => {
                product.validate()?;
                let quantity = u32::try_from(quantity)
                    .ok()
                    .filter(|q| *q > 0)
                    .ok_or(StorefrontError::InvalidQuantity(quantity))?;
                product.price.checked_multiply(quantity).ok_or(StorefrontError::PriceOverflow)?;
                CartAction::AddItem { product, quantity }
            }
            CartCommand::RemoveItem { product_id } => CartAction::RemoveItem { product_id },
            CartCommand::UpdateQuantity { product_id, quantity } => {
                let quantity = u32::try_from(quantity.max(0)).map_err(|_| StorefrontError::InvalidQuantity(quantity))?;
                CartAction::UpdateQuantity { product_id, quantity }
            }
            CartCommand::ApplyCoupon { code } => CartAction::ApplyCoupon { code: CouponCode::new(code) },
            CartCommand::ClearCart => CartAction::ClearCart,
            CartCommand::ToggleCart => CartAction::ToggleCart,
            CartCommand::SetCartOpen { is_open } => CartAction::SetCartOpen { is_open },
            CartCommand::LoadCart(snapshot) => {
                CartState::from_snapshot(snapshot.clone())?;
                CartAction::Rehydrate(snapshot)
            }
        })
    }
}
