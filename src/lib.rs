//! OctoCAT Storefront
//!
//! Storefront core for the OctoCAT supply shop.
//!
//! ## Features
//! - Shopping cart reducer with derived pricing (coupons, free shipping)
//! - Cart persistence and cross-tab synchronization over a shared key-value store
//! - Coupon validation and checkout client
//! - Cart display models
//! - Supplier CRUD API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod checkout;
pub mod config;
pub mod domain;
pub mod storage;
pub mod store;
pub mod suppliers;
pub mod view;

pub use checkout::{
    checkout_cart, CheckoutClient, CheckoutError, CheckoutReceipt, CouponValidation, GatewayError, HttpOrderGateway, OrderGateway,
};
pub use config::{ConfigError, StorefrontConfig};
pub use domain::actions::{CartAction, CartCommand};
pub use domain::aggregates::{CartSnapshot, CartState, CustomerInfo, LineItem, ProductSnapshot, Supplier};
pub use domain::pricing::Summary;
pub use domain::value_objects::{CouponCode, Money, ProductId};
pub use storage::{ChangeNotifier, ContextId, KeyValueStore, LocalStorage, StorageEvent};
pub use store::{CartStore, DEFAULT_STORAGE_KEY};
pub use suppliers::SupplierRepository;
pub use view::CartView;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Supplier not found")]
    SupplierNotFound,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] validator::ValidationErrors),

    #[error("Malformed cart command: {0}")]
    MalformedCommand(#[source] serde_json::Error),

    #[error("Unreadable cart snapshot: {0}")]
    MalformedSnapshot(#[source] serde_json::Error),

    #[error("Cart total out of range")]
    PriceOverflow,
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::SupplierNotFound => StatusCode::NOT_FOUND,
            Self::InvalidQuantity(_)
            | Self::InvalidProduct(_)
            | Self::MalformedCommand(_)
            | Self::MalformedSnapshot(_)
            | Self::PriceOverflow => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

// =============================================================================
// HTTP
// =============================================================================

/// Service router: health check plus the supplier API.
pub fn app(repository: SupplierRepository) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "octocat-storefront"})) }))
        .nest("/api/suppliers", suppliers::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(repository)
}
