//! Checkout and coupon client.
//!
//! Coupon validation is simulated locally with a short delay. Orders are
//! submitted through an [`OrderGateway`]; the HTTP implementation posts to
//! the order API. Nothing here mutates the cart: [`checkout_cart`] clears
//! it only after the gateway confirms the order.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::config::StorefrontConfig;
use crate::domain::aggregates::{CreateOrderRequest, CustomerInfo, LineItem};
use crate::domain::pricing::coupon_percentage;
use crate::domain::value_objects::CouponCode;
use crate::storage::{ChangeNotifier, KeyValueStore};
use crate::store::CartStore;

/// Delay used to mimic a coupon service round trip.
pub const DEFAULT_COUPON_DELAY: Duration = Duration::from_millis(300);

/// Failure talking to the order API.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("order API responded with status {0}")]
    Status(u16),
    #[error("order API unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced to the shopper. The display text is user-facing.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty.")]
    EmptyCart,
    #[error("Failed to process checkout. Please try again.")]
    CheckoutFailed(#[source] GatewayError),
    #[error("Failed to retrieve order details.")]
    OrderLookupFailed(#[source] GatewayError),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponValidation {
    pub valid: bool,
    pub discount_percentage: u32,
    pub message: String,
    /// Upper-cased code, ready to hand to the cart.
    pub code: CouponCode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub success: bool,
    pub order: serde_json::Value,
    pub order_id: i64,
}

/// Backend that records orders.
pub trait OrderGateway {
    async fn create_order(&self, order: &CreateOrderRequest) -> Result<serde_json::Value, GatewayError>;
    async fn get_order(&self, order_id: i64) -> Result<serde_json::Value, GatewayError>;
}

/// Order API over HTTP: `POST {base}/api/orders`, `GET {base}/api/orders/{id}`.
#[derive(Clone, Debug)]
pub struct HttpOrderGateway {
    http: reqwest::Client,
    orders_url: String,
}

impl HttpOrderGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, orders_url: format!("{}/api/orders", base_url.trim_end_matches('/')) })
    }

    pub fn orders_url(&self) -> &str { &self.orders_url }

    async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

impl OrderGateway for HttpOrderGateway {
    async fn create_order(&self, order: &CreateOrderRequest) -> Result<serde_json::Value, GatewayError> {
        let response = self.http.post(&self.orders_url).json(order).send().await?;
        Self::read_json(response).await
    }

    async fn get_order(&self, order_id: i64) -> Result<serde_json::Value, GatewayError> {
        let response = self.http.get(format!("{}/{order_id}", self.orders_url)).send().await?;
        Self::read_json(response).await
    }
}

#[derive(Clone, Debug)]
pub struct CheckoutClient<G> {
    gateway: G,
    coupon_delay: Duration,
}

impl<G: OrderGateway> CheckoutClient<G> {
    pub fn new(gateway: G, coupon_delay: Duration) -> Self {
        Self { gateway, coupon_delay }
    }

    pub fn gateway(&self) -> &G { &self.gateway }
    pub fn coupon_delay(&self) -> Duration { self.coupon_delay }

    /// Checks a code against the recognized coupons, ignoring case.
    pub async fn validate_coupon(&self, code: &str) -> CouponValidation {
        tokio::time::sleep(self.coupon_delay).await;
        let code = CouponCode::new(code.trim().to_uppercase());
        match coupon_percentage(&code) {
            Some(percent) => CouponValidation {
                valid: true,
                discount_percentage: percent,
                message: format!("{percent}% discount applied!"),
                code,
            },
            None => CouponValidation { valid: false, discount_percentage: 0, message: "Invalid coupon code".into(), code },
        }
    }

    /// Submits the cart lines as a pending order.
    #[instrument(skip_all, fields(lines = items.len(), coupon = %coupon))]
    pub async fn checkout(
        &self,
        items: &[LineItem],
        coupon: &CouponCode,
        customer: &CustomerInfo,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let request = CreateOrderRequest::from_cart(items, coupon, customer, Utc::now());
        match self.gateway.create_order(&request).await {
            Ok(order) => {
                info!(order_id = request.order_id, "order created");
                Ok(CheckoutReceipt { success: true, order, order_id: request.order_id })
            }
            Err(err) => {
                error!(error = %err, "checkout failed");
                Err(CheckoutError::CheckoutFailed(err))
            }
        }
    }

    pub async fn get_order(&self, order_id: i64) -> Result<serde_json::Value, CheckoutError> {
        self.gateway.get_order(order_id).await.map_err(|err| {
            error!(order_id, error = %err, "failed to get order");
            CheckoutError::OrderLookupFailed(err)
        })
    }
}

impl CheckoutClient<HttpOrderGateway> {
    /// Client for the order API at `ORDER_API_URL`, with the configured
    /// request timeout and coupon delay.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, GatewayError> {
        let gateway = HttpOrderGateway::new(&config.order_api_url, config.order_api_timeout)?;
        Ok(Self::new(gateway, config.coupon_delay))
    }
}

/// Checks out the store's cart. On success the cart is cleared and closed;
/// on failure it is left untouched.
pub async fn checkout_cart<S, G>(
    store: &mut CartStore<S>,
    client: &CheckoutClient<G>,
    customer: &CustomerInfo,
) -> Result<CheckoutReceipt, CheckoutError>
where
    S: KeyValueStore + ChangeNotifier,
    G: OrderGateway,
{
    let receipt = client.checkout(store.state().items(), store.state().coupon_code(), customer).await?;
    store.clear_cart();
    store.set_cart_open(false);
    Ok(receipt)
}
