//! OctoCAT Storefront - supplier API server

use anyhow::Result;
use octocat_storefront::{app, CheckoutClient, StorefrontConfig, SupplierRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = StorefrontConfig::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let checkout = CheckoutClient::from_config(&config)?;
    tracing::info!(
        order_api = checkout.gateway().orders_url(),
        coupon_delay_ms = checkout.coupon_delay().as_millis() as u64,
        "checkout client configured"
    );

    let suppliers = SupplierRepository::seeded();
    let router = app(suppliers);

    let addr = config.socket_addr();
    tracing::info!(cart_key = %config.cart_storage_key, "OctoCAT Storefront listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;
    Ok(())
}
