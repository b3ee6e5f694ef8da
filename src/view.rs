//! Cart display data for the drawer, the cart page and the header button.

use serde::Serialize;

use crate::domain::aggregates::{CartState, LineItem};

/// Badge counts above this render as `99+`.
const BADGE_LIMIT: u64 = 99;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: u64,
    pub name: String,
    pub image: String,
    pub sku: String,
    pub unit: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub subtotal: String,
    pub discount: Option<String>,
    pub shipping: String,
    pub total: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub summary: SummaryView,
    pub coupon_code: Option<String>,
    pub item_count: u64,
    pub badge: String,
    pub is_open: bool,
}

impl CartView {
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

fn badge_text(count: u64) -> String {
    match count {
        0 => String::new(),
        n if n > BADGE_LIMIT => format!("{BADGE_LIMIT}+"),
        n => n.to_string(),
    }
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id.value(),
            name: item.name.clone(),
            image: format!("/{}", item.img_name),
            sku: item.sku.clone(),
            unit: item.unit.clone(),
            quantity: item.quantity,
            price: item.price.to_string(),
            line_price: item.line_total().to_string(),
        }
    }
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        let summary = cart.summary();
        let item_count = cart.total_items();
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            summary: SummaryView {
                subtotal: summary.subtotal.to_string(),
                discount: (summary.discount.amount() > rust_decimal::Decimal::ZERO)
                    .then(|| format!("-{}", summary.discount)),
                shipping: summary.shipping.to_string(),
                total: summary.total.to_string(),
            },
            coupon_code: (!cart.coupon_code().is_none()).then(|| cart.coupon_code().to_string()),
            item_count,
            badge: badge_text(item_count),
            is_open: cart.is_open(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actions::CartAction;
    use crate::domain::aggregates::ProductSnapshot;
    use crate::domain::value_objects::Money;
    use rust_decimal::Decimal;

    #[test]
    fn test_cart_view_formats_prices() {
        let product = ProductSnapshot::new(4, "Octo Tee", Money::new(Decimal::new(1999, 2)))
            .with_sku("TEE-4")
            .with_image("tee.png");
        let cart = CartState::empty()
            .apply(CartAction::AddItem { product, quantity: 3 })
            .apply(CartAction::ApplyCoupon { code: "SAVE10".into() });

        let view = CartView::from(&cart);
        assert_eq!(view.items[0].price, "$19.99");
        assert_eq!(view.items[0].line_price, "$59.97");
        assert_eq!(view.items[0].image, "/tee.png");
        assert_eq!(view.summary.subtotal, "$59.97");
        assert_eq!(view.summary.discount.as_deref(), Some("-$6.00"));
        assert_eq!(view.summary.shipping, "$10.00");
        assert_eq!(view.summary.total, "$63.97");
        assert_eq!(view.coupon_code.as_deref(), Some("SAVE10"));
        assert_eq!(view.badge, "3");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&CartState::empty());
        assert!(view.is_empty());
        assert_eq!(view.badge, "");
        assert_eq!(view.summary.discount, None);
        assert_eq!(view.coupon_code, None);
    }

    #[test]
    fn test_badge_caps_at_ninety_nine() {
        assert_eq!(badge_text(99), "99");
        assert_eq!(badge_text(100), "99+");
    }
}
