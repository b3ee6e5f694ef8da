//! Storefront domain: value objects, pricing, aggregates and cart actions.
pub mod actions;
pub mod aggregates;
pub mod pricing;
pub mod value_objects;
