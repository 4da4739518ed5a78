use std::sync::{Mutex, PoisonError};

use bigdecimal::ToPrimitive;
use thiserror::Error;

use crate::application::cart_engine::CartEngine;
use crate::domain::cart::CartSnapshot;
use crate::domain::errors::{ApiError, DomainError};
use crate::domain::ports::{Clock, KeyValueStore, StorefrontApi};
use crate::domain::storefront::{Order, OrderItemRequest, OrderRequest};

/// Session-scoped marker letting the success view know it was reached
/// through a completed checkout.
pub const CHECKOUT_COMPLETE_KEY: &str = "checkoutComplete";

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Sign in to place an order")]
    NotAuthenticated,
    #[error("Order could not be placed: {0}")]
    Api(#[from] ApiError),
}

/// Builds the `POST /orders` body from the cart.
pub fn order_request(snapshot: &CartSnapshot) -> OrderRequest {
    OrderRequest {
        items: snapshot
            .items
            .iter()
            .map(|item| OrderItemRequest {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                price: item.price.to_f64().unwrap_or_default(),
            })
            .collect(),
        total_amount: snapshot.total_price.to_f64().unwrap_or_default(),
    }
}

/// Sends the order for `snapshot` to the remote API.
///
/// Touches neither the cart nor any store, so nothing changes on failure.
/// The caller follows a success with [`complete_checkout`].
pub async fn submit_order(
    snapshot: &CartSnapshot,
    token: Option<&str>,
    api: &dyn StorefrontApi,
) -> Result<Order, CheckoutError> {
    if snapshot.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let Some(token) = token else {
        return Err(CheckoutError::NotAuthenticated);
    };

    let request = order_request(snapshot);
    let order = api.create_order(token, &request).await.map_err(|e| {
        log::error!("Order creation failed: {}", e);
        e
    })?;
    log::info!(
        "Order {} placed for {} items, total {}",
        order.id,
        snapshot.total_items,
        snapshot.total_price
    );
    Ok(order)
}

/// Records a confirmed order: sets the completion marker and empties the
/// cart. Writes to the stores, so run it off the async workers.
pub fn complete_checkout<S, C>(cart: &Mutex<CartEngine<S, C>>, session_store: &dyn KeyValueStore)
where
    S: KeyValueStore,
    C: Clock,
{
    if let Err(e) = mark_checkout_complete(session_store) {
        log::error!("Could not record checkout completion: {}", e);
    }
    cart.lock().unwrap_or_else(PoisonError::into_inner).clear();
}

pub fn mark_checkout_complete(store: &dyn KeyValueStore) -> Result<(), DomainError> {
    store.set(CHECKOUT_COMPLETE_KEY, "true")
}

/// Reads and deletes the completion marker. `true` at most once per checkout.
pub fn take_checkout_complete(store: &dyn KeyValueStore) -> bool {
    match store.get(CHECKOUT_COMPLETE_KEY) {
        Ok(Some(_)) => {
            if let Err(e) = store.remove(CHECKOUT_COMPLETE_KEY) {
                log::warn!("Could not clear checkout marker: {}", e);
            }
            true
        }
        Ok(None) => false,
        Err(e) => {
            log::warn!("Could not read checkout marker: {}", e);
            false
        }
    }
}
