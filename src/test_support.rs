//! In-process stand-ins for the remote storefront API and the store.

use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};

use async_trait::async_trait;

use crate::domain::errors::{ApiError, DomainError};
use crate::domain::ports::{KeyValueStore, StorefrontApi};
use crate::domain::storefront::{
    AuthResponse, Credentials, Order, OrderLine, OrderRequest, Product, ProfileUpdate,
    Registration, User,
};
use crate::infrastructure::memory_store::InMemoryStore;

#[derive(Default)]
pub struct FakeApi {
    fail_orders: bool,
    orders: Mutex<Vec<OrderRequest>>,
}

impl FakeApi {
    pub const TOKEN: &'static str = "secret-token";
    pub const PASSWORD: &'static str = "correct horse";

    pub fn failing_orders() -> Self {
        Self {
            fail_orders: true,
            ..Self::default()
        }
    }

    pub fn orders(&self) -> Vec<OrderRequest> {
        self.orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn user() -> User {
        User {
            id: "u1".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            role: "user".to_string(),
        }
    }

    fn authorize(token: &str) -> Result<(), ApiError> {
        if token == Self::TOKEN {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: 401,
                message: "Invalid token".to_string(),
            })
        }
    }

    fn to_order(id: usize, request: &OrderRequest) -> Order {
        Order {
            id: format!("o{id}"),
            items: request
                .items
                .iter()
                .map(|i| OrderLine {
                    product_id: serde_json::Value::String(i.product_id.clone()),
                    quantity: i.quantity,
                    price: i.price,
                })
                .collect(),
            total_amount: request.total_amount,
            status: "pending".to_string(),
            created_at: None,
        }
    }
}

#[async_trait]
impl StorefrontApi for FakeApi {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        Ok(vec![Product {
            id: "p1".to_string(),
            name: "Helmet".to_string(),
            price: 129.9,
            description: None,
            category: Some("casques".to_string()),
            stock: Some(4),
        }])
    }

    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        let products = self.list_products().await?;
        products
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Product not found".to_string(),
            })
    }

    async fn create_order(&self, token: &str, order: &OrderRequest) -> Result<Order, ApiError> {
        Self::authorize(token)?;
        if self.fail_orders {
            return Err(ApiError::Status {
                status: 500,
                message: "Order service unavailable".to_string(),
            });
        }
        let mut orders = self.orders.lock().unwrap_or_else(PoisonError::into_inner);
        orders.push(order.clone());
        Ok(Self::to_order(orders.len(), order))
    }

    async fn list_user_orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        Self::authorize(token)?;
        Ok(self
            .orders()
            .iter()
            .enumerate()
            .map(|(i, o)| Self::to_order(i + 1, o))
            .collect())
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        Self::authorize(token)?;
        Ok(Self::user())
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, ApiError> {
        Self::authorize(token)?;
        let mut user = Self::user();
        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        Ok(user)
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        if credentials.password != Self::PASSWORD {
            return Err(ApiError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            });
        }
        Ok(AuthResponse {
            token: Self::TOKEN.to_string(),
            user: User {
                email: credentials.email.clone(),
                ..Self::user()
            },
        })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        Ok(AuthResponse {
            token: Self::TOKEN.to_string(),
            user: User {
                username: registration.username.clone(),
                email: registration.email.clone(),
                ..Self::user()
            },
        })
    }
}

/// In-memory store that remembers which thread performed each write.
#[derive(Default)]
pub struct ThreadRecordingStore {
    inner: InMemoryStore,
    writers: Mutex<Vec<ThreadId>>,
}

impl ThreadRecordingStore {
    pub fn writer_threads(&self) -> Vec<ThreadId> {
        self.writers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self) {
        self.writers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(thread::current().id());
    }
}

impl KeyValueStore for ThreadRecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.record();
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.record();
        self.inner.remove(key)
    }
}
