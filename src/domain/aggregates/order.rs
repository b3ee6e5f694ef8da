//! Order creation request built from cart lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::cart::LineItem;
use crate::domain::value_objects::{CouponCode, Money, ProductId};

/// Branch used when the shopper did not pick one.
pub const DEFAULT_BRANCH_ID: u32 = 1;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Pending, Processing, Shipped, Delivered, Cancelled }

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail { pub product_id: ProductId, pub quantity: u32, pub unit_price: Money, pub notes: String }

/// Who is checking out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo { pub branch_id: Option<u32>, pub customer_name: Option<String> }

/// Body posted to the order API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_id: i64,
    pub order_date: DateTime<Utc>,
    pub branch_id: u32,
    pub name: String,
    pub description: String,
    pub status: OrderStatus,
    pub order_details: Vec<OrderDetail>,
}

impl OrderDetail {
    pub fn from_line(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.price,
            notes: format!("Cart item: {} (SKU: {})", item.name, item.sku),
        }
    }
}

impl CreateOrderRequest {
    /// Builds a pending order. The order id is the placement time in epoch milliseconds.
    pub fn from_cart(items: &[LineItem], coupon: &CouponCode, customer: &CustomerInfo, placed_at: DateTime<Utc>) -> Self {
        let order_id = placed_at.timestamp_millis();
        let mut description = format!("Order created from cart with {} items", items.len());
        if !coupon.is_none() {
            description.push_str(&format!(" (Coupon: {coupon})"));
        }
        Self {
            order_id,
            order_date: placed_at,
            branch_id: customer.branch_id.unwrap_or(DEFAULT_BRANCH_ID),
            name: format!("Cart Order {order_id}"),
            description,
            status: OrderStatus::Pending,
            order_details: items.iter().map(OrderDetail::from_line).collect(),
        }
    }
}
