use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::errors::ApiError;
use crate::domain::ports::StorefrontApi;
use crate::domain::storefront::{
    AuthResponse, Credentials, Order, OrderRequest, Product, ProfileUpdate, Registration, User,
};

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// `StorefrontApi` over HTTP. Stateless apart from the connection pool inside
/// the `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    client: Client,
    base_url: String,
}

impl HttpStorefrontApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and decodes a 2xx body as `T`.
    ///
    /// Error bodies are expected to look like `{"message": "..."}`; when they
    /// don't, `fallback` is reported instead.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
                .unwrap_or_else(|| fallback.to_string());
            log::warn!("{} failed with {}: {}", fallback, status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.send(
            self.client.get(self.url("/products")),
            "Failed to fetch products",
        )
        .await
    }

    async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        self.send(
            self.client.get(self.url(&format!("/products/{id}"))),
            "Failed to fetch product",
        )
        .await
    }

    async fn create_order(&self, token: &str, order: &OrderRequest) -> Result<Order, ApiError> {
        self.send(
            self.client
                .post(self.url("/orders"))
                .bearer_auth(token)
                .json(order),
            "Failed to create order",
        )
        .await
    }

    async fn list_user_orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        self.send(
            self.client.get(self.url("/orders/user")).bearer_auth(token),
            "Failed to fetch orders",
        )
        .await
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        self.send(
            self.client.get(self.url("/auth/me")).bearer_auth(token),
            "Failed to fetch current user",
        )
        .await
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.send(
            self.client
                .put(self.url("/auth/update"))
                .bearer_auth(token)
                .json(update),
            "Failed to update profile",
        )
        .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.send(
            self.client.post(self.url("/auth/login")).json(credentials),
            "Login failed",
        )
        .await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        self.send(
            self.client
                .post(self.url("/auth/register"))
                .json(registration),
            "Registration failed",
        )
        .await
    }
}
