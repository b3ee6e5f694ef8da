//! Cart pricing: recognized coupons, shipping policy and the derived summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::LineItem;
use crate::domain::value_objects::{CouponCode, Money};

/// Subtotals strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::whole(100);

/// Shipping charged when the subtotal does not clear the threshold.
pub const FLAT_SHIPPING_FEE: Money = Money::whole(10);

/// Recognized coupon codes and their discount, in percent of the subtotal.
pub const RECOGNIZED_COUPONS: &[(&str, u32)] = &[("SAVE10", 10), ("SAVE20", 20)];

/// Discount percentage for a recognized code, matched case-sensitively.
pub fn coupon_percentage(code: &CouponCode) -> Option<u32> {
    RECOGNIZED_COUPONS
        .iter()
        .find(|(known, _)| *known == code.as_str())
        .map(|(_, percent)| *percent)
}

/// Fraction of the subtotal taken off for `code`; zero when unrecognized.
pub fn discount_rate(code: &CouponCode) -> Decimal {
    coupon_percentage(code).map_or(Decimal::ZERO, |percent| Decimal::new(i64::from(percent), 2))
}

/// Pricing summary derived from the cart lines and the applied coupon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub total: Money,
}

impl Summary {
    /// Computes the summary from its two inputs and nothing else. Amounts
    /// saturate on overflow; see [`Summary::try_calculate`].
    pub fn calculate(items: &[LineItem], coupon: &CouponCode) -> Self {
        let subtotal: Money = items.iter().map(LineItem::line_total).sum();
        let discount = subtotal.scale_by(discount_rate(coupon));
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD { Money::ZERO } else { FLAT_SHIPPING_FEE };
        let total = subtotal - discount + shipping;
        Self { subtotal, discount, shipping, total }
    }

    /// Same as [`Summary::calculate`], but `None` when any amount leaves the
    /// representable range.
    pub fn try_calculate(items: &[LineItem], coupon: &CouponCode) -> Option<Self> {
        let subtotal = items
            .iter()
            .try_fold(Money::ZERO, |acc, item| acc.checked_add(item.price.checked_multiply(item.quantity)?))?;
        let discount = subtotal.checked_scale_by(discount_rate(coupon))?;
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD { Money::ZERO } else { FLAT_SHIPPING_FEE };
        let total = subtotal.checked_sub(discount)?.checked_add(shipping)?;
        Some(Self { subtotal, discount, shipping, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ProductId;

    fn line(id: u64, price: i64, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Money::from_major(price),
            quantity,
            img_name: format!("product-{id}.png"),
            sku: format!("SKU-{id}"),
            unit: "each".into(),
        }
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let summary = Summary::calculate(&[line(1, 50, 2)], &CouponCode::none());
        assert_eq!(summary.subtotal, Money::from_major(100));
        assert_eq!(summary.shipping, Money::from_major(10));
        assert_eq!(summary.total, Money::from_major(110));

        let summary = Summary::calculate(&[line(1, 101, 1)], &CouponCode::none());
        assert_eq!(summary.shipping, Money::ZERO);
        assert_eq!(summary.total, Money::from_major(101));
    }

    #[test]
    fn test_save20_on_hundred() {
        let summary = Summary::calculate(&[line(1, 50, 2)], &CouponCode::from("SAVE20"));
        assert_eq!(summary.discount, Money::from_major(20));
        assert_eq!(summary.shipping, Money::from_major(10));
        assert_eq!(summary.total, Money::from_major(90));
    }

    #[test]
    fn test_unknown_and_lowercase_codes_do_not_discount() {
        let items = [line(1, 30, 1)];
        assert_eq!(Summary::calculate(&items, &CouponCode::from("BOGUS")).discount, Money::ZERO);
        assert_eq!(Summary::calculate(&items, &CouponCode::from("save10")).discount, Money::ZERO);
        assert_eq!(discount_rate(&CouponCode::from("SAVE10")), Decimal::new(10, 2));
    }

    #[test]
    fn test_empty_cart_still_charges_flat_shipping() {
        let summary = Summary::calculate(&[], &CouponCode::none());
        assert_eq!(summary.subtotal, Money::ZERO);
        assert_eq!(summary.shipping, FLAT_SHIPPING_FEE);
        assert_eq!(summary.total, FLAT_SHIPPING_FEE);
    }

    #[test]
    fn test_out_of_range_totals_are_reported() {
        let mut big = line(1, 0, u32::MAX);
        big.price = Money::new(Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0));
        assert_eq!(Summary::try_calculate(&[big.clone()], &CouponCode::none()), None);
        assert_eq!(Summary::calculate(&[big], &CouponCode::none()).subtotal, Money::new(Decimal::MAX));

        let items = [line(1, 20, 3), line(2, 7, 4)];
        let code = CouponCode::from("SAVE10");
        assert_eq!(Summary::try_calculate(&items, &code), Some(Summary::calculate(&items, &code)));
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let items = [line(1, 20, 3), line(2, 7, 4)];
        let code = CouponCode::from("SAVE10");
        let first = serde_json::to_string(&Summary::calculate(&items, &code)).unwrap();
        let second = serde_json::to_string(&Summary::calculate(&items, &code)).unwrap();
        assert_eq!(first, second);
    }
}
