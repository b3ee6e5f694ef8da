//! Cart Aggregate
//!
//! The cart is a reducer: every [`CartAction`] takes the current state and
//! yields the next one, with the pricing [`Summary`] recomputed from the
//! lines and coupon on every transition. A transition whose totals would
//! leave the representable range is refused and the state is kept.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::actions::CartAction;
use crate::domain::aggregates::product::ProductSnapshot;
use crate::domain::pricing::Summary;
use crate::domain::value_objects::{CouponCode, Money, ProductId};
use crate::{Result, StorefrontError};

/// One product in the cart. At most one line exists per product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub img_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sku: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
}

impl LineItem {
    pub fn from_product(product: &ProductSnapshot, quantity: u32) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name.clone(),
            price: product.price,
            quantity,
            img_name: product.img_name.clone(),
            sku: product.sku.clone(),
            unit: product.unit.clone(),
        }
    }

    pub fn line_total(&self) -> Money { self.price.multiply(self.quantity) }
}

/// Cart contents as persisted or received from another context.
///
/// Missing or `null` fields default to empty. Any stored summary is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coupon_code: CouponCode,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_open: bool,
}

impl CartSnapshot {
    pub fn parse(raw: &str) -> Result<Self> { serde_json::from_str(raw).map_err(StorefrontError::MalformedSnapshot) }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    items: Vec<LineItem>,
    coupon_code: CouponCode,
    summary: Summary,
    is_open: bool,
}

impl Default for CartState {
    fn default() -> Self { Self::empty() }
}

impl CartState {
    pub fn empty() -> Self {
        let coupon_code = CouponCode::none();
        Self { summary: Summary::calculate(&[], &coupon_code), items: Vec::new(), coupon_code, is_open: false }
    }

    /// Builds a state from a snapshot. Lines with no quantity are dropped
    /// and repeated products are folded into their first line.
    ///
    /// # Errors
    ///
    /// `PriceOverflow` when the snapshot's totals are out of range.
    pub fn from_snapshot(snapshot: CartSnapshot) -> Result<Self> {
        let mut items: Vec<LineItem> = Vec::with_capacity(snapshot.items.len());
        for item in snapshot.items.into_iter().filter(|i| i.quantity > 0) {
            match items.iter_mut().find(|i| i.product_id == item.product_id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
                None => items.push(item),
            }
        }
        Self::assemble(items, snapshot.coupon_code, snapshot.is_open).ok_or(StorefrontError::PriceOverflow)
    }

    /// Parses and restores a stored JSON snapshot.
    pub fn restore(raw: &str) -> Result<Self> { Self::from_snapshot(CartSnapshot::parse(raw)?) }

    fn assemble(items: Vec<LineItem>, coupon_code: CouponCode, is_open: bool) -> Option<Self> {
        let summary = Summary::try_calculate(&items, &coupon_code)?;
        Some(Self { items, coupon_code, summary, is_open })
    }

    /// Next state with new lines and coupon, or `self` if they cannot be priced.
    fn reprice(self, items: Vec<LineItem>, coupon_code: CouponCode) -> Self {
        Self::assemble(items, coupon_code, self.is_open).unwrap_or(self)
    }

    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn coupon_code(&self) -> &CouponCode { &self.coupon_code }
    pub fn summary(&self) -> &Summary { &self.summary }
    pub fn is_open(&self) -> bool { self.is_open }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn line_count(&self) -> usize { self.items.len() }
    pub fn item(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Total units across all lines.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string(self) }

    /// Same contents with a different visibility flag.
    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    /// Applies one action and returns the resulting state.
    pub fn apply(self, action: CartAction) -> Self {
        match action {
            CartAction::AddItem { product, quantity } => self.add_item(&product, quantity),
            CartAction::RemoveItem { product_id } => self.remove_item(product_id),
            CartAction::UpdateQuantity { product_id, quantity } => self.update_quantity(product_id, quantity),
            CartAction::ApplyCoupon { code } => {
                let items = self.items.clone();
                self.reprice(items, code)
            }
            CartAction::ClearCart => Self::empty().with_open(self.is_open),
            CartAction::ToggleCart => {
                let open = !self.is_open;
                self.with_open(open)
            }
            CartAction::SetCartOpen { is_open } => self.with_open(is_open),
            CartAction::Rehydrate(snapshot) => Self::from_snapshot(snapshot).unwrap_or(self),
        }
    }

    fn add_item(self, product: &ProductSnapshot, quantity: u32) -> Self {
        if quantity == 0 {
            return self;
        }
        let mut items = self.items.clone();
        if let Some(existing) = items.iter_mut().find(|i| i.product_id == product.product_id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            items.push(LineItem::from_product(product, quantity));
        }
        let coupon_code = self.coupon_code.clone();
        self.reprice(items, coupon_code)
    }

    fn remove_item(self, product_id: ProductId) -> Self {
        let mut items = self.items.clone();
        items.retain(|i| i.product_id != product_id);
        let coupon_code = self.coupon_code.clone();
        self.reprice(items, coupon_code)
    }

    fn update_quantity(self, product_id: ProductId, quantity: u32) -> Self {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        let mut items = self.items.clone();
        if let Some(item) = items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
        }
        let coupon_code = self.coupon_code.clone();
        self.reprice(items, coupon_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: u64, price: i64) -> ProductSnapshot {
        ProductSnapshot::new(id, format!("Product {id}"), Money::from_major(price))
            .with_sku(format!("SKU-{id}"))
            .with_image(format!("product-{id}.png"))
            .with_unit("each")
    }

    fn add(state: CartState, id: u64, price: i64, quantity: u32) -> CartState {
        state.apply(CartAction::AddItem { product: product(id, price), quantity })
    }

    #[test]
    fn test_add_item_merges_lines() {
        let cart = add(CartState::empty(), 1, 20, 1);
        let cart = add(cart, 1, 20, 2);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.summary().subtotal, Money::from_major(60));
    }

    #[test]
    fn test_hundred_subtotal_pays_shipping() {
        let cart = add(CartState::empty(), 1, 50, 2);
        assert_eq!(cart.summary().subtotal, Money::from_major(100));
        assert_eq!(cart.summary().shipping, Money::from_major(10));
        assert_eq!(cart.summary().total, Money::from_major(110));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let cart = add(add(add(CartState::empty(), 3, 1, 1), 1, 1, 1), 2, 1, 1);
        let ids: Vec<u64> = cart.items().iter().map(|i| i.product_id.value()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_add_keeps_price_captured_at_first_add() {
        let cart = add(CartState::empty(), 1, 20, 1);
        let cart = add(cart, 1, 99, 1);
        assert_eq!(cart.items()[0].price, Money::from_major(20));
        assert_eq!(cart.summary().subtotal, Money::from_major(40));
    }

    #[test]
    fn test_zero_quantity_add_is_noop() {
        let cart = add(CartState::empty(), 1, 20, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_to_zero_matches_remove() {
        let cart = add(add(CartState::empty(), 1, 20, 2), 2, 5, 1);
        let removed = cart.clone().apply(CartAction::RemoveItem { product_id: ProductId::new(1) });
        let zeroed = cart.apply(CartAction::UpdateQuantity { product_id: ProductId::new(1), quantity: 0 });
        assert_eq!(removed, zeroed);
        assert_eq!(zeroed.line_count(), 1);
    }

    #[test]
    fn test_update_sets_absolute_quantity() {
        let cart = add(CartState::empty(), 1, 20, 2);
        let cart = cart.apply(CartAction::UpdateQuantity { product_id: ProductId::new(1), quantity: 5 });
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.summary().subtotal, Money::from_major(100));
    }

    #[test]
    fn test_unknown_product_mutations_are_noops() {
        let cart = add(CartState::empty(), 1, 20, 2);
        let after = cart
            .clone()
            .apply(CartAction::RemoveItem { product_id: ProductId::new(9) })
            .apply(CartAction::UpdateQuantity { product_id: ProductId::new(9), quantity: 4 });
        assert_eq!(after, cart);
    }

    #[test]
    fn test_apply_coupon_is_idempotent() {
        let cart = add(CartState::empty(), 1, 50, 2);
        let once = cart.apply(CartAction::ApplyCoupon { code: "SAVE10".into() });
        let twice = once.clone().apply(CartAction::ApplyCoupon { code: "SAVE10".into() });
        assert_eq!(once.summary(), twice.summary());
        assert_eq!(once.summary().discount, Money::from_major(10));
    }

    #[test]
    fn test_unknown_coupon_is_stored_without_discount() {
        let cart = add(CartState::empty(), 1, 50, 2).apply(CartAction::ApplyCoupon { code: "FREESTUFF".into() });
        assert_eq!(cart.coupon_code().as_str(), "FREESTUFF");
        assert_eq!(cart.summary().discount, Money::ZERO);
    }

    #[test]
    fn test_clear_keeps_drawer_open() {
        let cart = add(CartState::empty(), 1, 50, 2)
            .apply(CartAction::ApplyCoupon { code: "SAVE20".into() })
            .apply(CartAction::SetCartOpen { is_open: true })
            .apply(CartAction::ClearCart);
        assert!(cart.is_empty());
        assert!(cart.coupon_code().is_none());
        assert!(cart.is_open());
        assert_eq!(cart, CartState::empty().with_open(true));
    }

    #[test]
    fn test_visibility_actions_leave_contents_alone() {
        let cart = add(CartState::empty(), 1, 50, 2);
        let toggled = cart.clone().apply(CartAction::ToggleCart);
        assert!(toggled.is_open());
        assert_eq!(toggled.items(), cart.items());
        assert_eq!(toggled.summary(), cart.summary());
        assert!(!toggled.apply(CartAction::ToggleCart).is_open());
    }

    #[test]
    fn test_rehydrate_ignores_stored_summary() {
        let cart = add(CartState::empty(), 1, 50, 2).apply(CartAction::ApplyCoupon { code: "SAVE10".into() });
        let mut blob: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
        blob["summary"] = serde_json::json!({"subtotal": 1, "discount": "nope", "total": -4});

        let snapshot = CartSnapshot::parse(&blob.to_string()).unwrap();
        let restored = CartState::empty().apply(CartAction::Rehydrate(snapshot));
        assert_eq!(restored.summary(), cart.summary());
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_snapshot_normalizes_lines() {
        let snapshot = CartSnapshot::parse(
            r#"{"items":[
                {"productId":1,"name":"A","price":2.5,"quantity":2,"imgName":"a.png","sku":"A","unit":"each"},
                {"productId":2,"name":"B","price":4,"quantity":0,"imgName":"b.png","sku":"B","unit":"each"},
                {"productId":1,"name":"A","price":2.5,"quantity":1,"imgName":"a.png","sku":"A","unit":"each"}
            ]}"#,
        )
        .unwrap();
        let cart = CartState::from_snapshot(snapshot).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.summary().subtotal, Money::new(Decimal::new(75, 1)));
        assert!(cart.coupon_code().is_none());
    }

    #[test]
    fn test_null_snapshot_fields_read_as_empty() {
        let snapshot = CartSnapshot::parse(
            r#"{"items":[{"productId":1,"name":"A","price":3,"quantity":2,"imgName":null,"sku":"A","unit":null}],
                "couponCode":null,"isOpen":null}"#,
        )
        .unwrap();
        let cart = CartState::from_snapshot(snapshot).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].img_name, "");
        assert!(cart.coupon_code().is_none());
        assert!(!cart.is_open());

        let empty = CartState::restore(r#"{"items":null,"couponCode":"SAVE10"}"#).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.coupon_code().as_str(), "SAVE10");
    }

    #[test]
    fn test_out_of_range_snapshot_is_rejected() {
        let raw = r#"{"items":[{"productId":1,"name":"A","price":1e20,"quantity":4294967295,"sku":"A"}]}"#;
        assert!(matches!(CartState::restore(raw), Err(StorefrontError::PriceOverflow)));

        let cart = add(CartState::empty(), 1, 20, 1);
        let rehydrated = cart.clone().apply(CartAction::Rehydrate(CartSnapshot::parse(raw).unwrap()));
        assert_eq!(rehydrated, cart);
    }

    #[test]
    fn test_overflowing_transition_keeps_state() {
        let price = Money::new(Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0));
        let pricey = ProductSnapshot::new(1, "Yacht", price).with_sku("Y");
        let cart = CartState::empty().apply(CartAction::AddItem { product: pricey.clone(), quantity: 1 });
        assert_eq!(cart.line_count(), 1);

        let after = cart.clone().apply(CartAction::AddItem { product: pricey, quantity: u32::MAX });
        assert_eq!(after, cart);
        let after = cart.clone().apply(CartAction::UpdateQuantity { product_id: ProductId::new(1), quantity: u32::MAX });
        assert_eq!(after, cart);
    }

    #[test]
    fn test_product_ids_stay_unique_across_mixed_sequences() {
        let mut cart = CartState::empty();
        for step in 0u64..200 {
            let id = ProductId::new(step * 7 % 5);
            let action = match step % 4 {
                0 | 1 => CartAction::AddItem { product: product(id.value(), 3), quantity: (step % 3) as u32 },
                2 => CartAction::UpdateQuantity { product_id: id, quantity: (step % 4) as u32 },
                _ => CartAction::RemoveItem { product_id: id },
            };
            cart = cart.apply(action);
            let mut ids: Vec<u64> = cart.items().iter().map(|i| i.product_id.value()).collect();
            let len = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), len, "duplicate line after step {step}");
            assert!(cart.items().iter().all(|i| i.quantity > 0));
            assert_eq!(*cart.summary(), Summary::calculate(cart.items(), cart.coupon_code()));
        }
    }

    #[test]
    fn test_total_items() {
        let cart = add(add(CartState::empty(), 1, 1, 2), 2, 1, 5);
        assert_eq!(cart.total_items(), 7);
    }

    #[test]
    fn test_persisted_shape() {
        let cart = add(CartState::empty(), 1, 50, 1);
        let blob: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
        assert_eq!(blob["items"][0]["productId"], 1);
        assert_eq!(blob["items"][0]["imgName"], "product-1.png");
        assert_eq!(blob["couponCode"], "");
        assert_eq!(blob["isOpen"], false);
        assert!(blob["summary"]["total"].is_number());
    }
}
