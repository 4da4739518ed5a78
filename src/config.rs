use std::{env, fmt::Display, str::FromStr};

use chrono::Duration;
use thiserror::Error;

use crate::application::cart_engine::{CartSettings, DEFAULT_IDEMPOTENCY_WINDOW_MS};
use crate::application::click_guard::{ADD_TO_CART_LOCK_MS, QUANTITY_LOCK_MS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// When unset the cart lives in memory only.
    pub database_url: Option<String>,
    pub store_profile: String,
    pub host: String,
    pub port: u16,
    pub api_url: String,
    pub idempotency_window_ms: u32,
    pub quantity_lock_ms: u32,
    pub add_to_cart_lock_ms: u32,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if database_url.is_none() {
            log::warn!("DATABASE_URL not set, cart will not survive restarts");
        }
        Ok(Self {
            database_url,
            store_profile: try_load(&lookup, "STORE_PROFILE", "default")?,
            host: try_load(&lookup, "HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "8080")?,
            api_url: try_load(&lookup, "API_URL", "http://localhost:5000/api")?,
            idempotency_window_ms: try_load(
                &lookup,
                "CART_IDEMPOTENCY_WINDOW_MS",
                &DEFAULT_IDEMPOTENCY_WINDOW_MS.to_string(),
            )?,
            quantity_lock_ms: try_load(&lookup, "QUANTITY_LOCK_MS", &QUANTITY_LOCK_MS.to_string())?,
            add_to_cart_lock_ms: try_load(
                &lookup,
                "ADD_TO_CART_LOCK_MS",
                &ADD_TO_CART_LOCK_MS.to_string(),
            )?,
        })
    }

    pub fn cart_settings(&self) -> CartSettings {
        CartSettings {
            idempotency_window: millis(self.idempotency_window_ms),
        }
    }

    pub fn quantity_lock(&self) -> Duration {
        millis(self.quantity_lock_ms)
    }

    pub fn add_to_cart_lock(&self) -> Duration {
        millis(self.add_to_cart_lock_ms)
    }
}

fn millis(ms: u32) -> Duration {
    Duration::milliseconds(i64::from(ms))
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
        value,
    })
}
