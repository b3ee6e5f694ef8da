//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;
pub mod supplier;

pub use product::ProductSnapshot;
pub use order::{CreateOrderRequest, CustomerInfo, OrderDetail, OrderStatus, DEFAULT_BRANCH_ID};
pub use cart::{CartSnapshot, CartState, LineItem};
pub use supplier::{seed_suppliers, Supplier};
