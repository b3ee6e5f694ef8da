//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3000)
//! - `CART_STORAGE_KEY` - Storage key for cart snapshots (default: octocat-cart)
//! - `ORDER_API_URL` - Base URL of the order API (default: http://localhost:3000)
//! - `COUPON_VALIDATION_DELAY_MS` - Simulated coupon lookup delay (default: 300)
//! - `ORDER_API_TIMEOUT_SECS` - Order API request timeout (default: 10)
//!
//! Log filtering follows `RUST_LOG`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::checkout::DEFAULT_COUPON_DELAY;
use crate::store::DEFAULT_STORAGE_KEY;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ORDER_API_URL: &str = "http://localhost:3000";
const DEFAULT_ORDER_API_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub host: IpAddr,
    pub port: u16,
    pub cart_storage_key: String,
    pub order_api_url: String,
    pub coupon_delay: Duration,
    pub order_api_timeout: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            cart_storage_key: DEFAULT_STORAGE_KEY.to_string(),
            order_api_url: DEFAULT_ORDER_API_URL.to_string(),
            coupon_delay: DEFAULT_COUPON_DELAY,
            order_api_timeout: DEFAULT_ORDER_API_TIMEOUT,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables, reading `.env` first if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: parse_or(&lookup, "STOREFRONT_HOST", defaults.host)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            cart_storage_key: lookup("CART_STORAGE_KEY").filter(|v| !v.is_empty()).unwrap_or(defaults.cart_storage_key),
            order_api_url: lookup("ORDER_API_URL").filter(|v| !v.is_empty()).unwrap_or(defaults.order_api_url),
            coupon_delay: parse_var(&lookup, "COUPON_VALIDATION_DELAY_MS")?
                .map_or(defaults.coupon_delay, Duration::from_millis),
            order_api_timeout: parse_var(&lookup, "ORDER_API_TIMEOUT_SECS")?
                .map_or(defaults.order_api_timeout, Duration::from_secs),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string())))
        .transpose()
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    Ok(parse_var(lookup, name)?.unwrap_or(default))
}
