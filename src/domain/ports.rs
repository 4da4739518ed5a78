use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::{ApiError, DomainError};
use super::storefront::{
    AuthResponse, Credentials, Order, OrderRequest, Product, ProfileUpdate, Registration, User,
};

/// Synchronous string key-value storage, the persisted mirror of client state.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), DomainError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        (**self).remove(key)
    }
}

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// The remote storefront HTTP API.
#[async_trait]
pub trait StorefrontApi: Send + Sync + 'static {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
    async fn get_product(&self, id: &str) -> Result<Product, ApiError>;
    async fn create_order(&self, token: &str, order: &OrderRequest) -> Result<Order, ApiError>;
    async fn list_user_orders(&self, token: &str) -> Result<Vec<Order>, ApiError>;
    async fn current_user(&self, token: &str) -> Result<User, ApiError>;
    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError>;
}
