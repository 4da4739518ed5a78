use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::application::checkout::{complete_checkout, submit_order, take_checkout_complete};
use crate::domain::storefront::Order;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /checkout
///
/// Places one order for everything in the cart. The cart is emptied only
/// after the remote API confirms the order.
#[utoipa::path(
    post,
    path = "/checkout",
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Cart is empty"),
        (status = 401, description = "Not signed in"),
        (status = 502, description = "Remote API refused or failed"),
    ),
    tag = "checkout"
)]
pub async fn checkout(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let (token, snapshot) = web::block({
        let state = state.clone();
        move || {
            let token = state.auth.token();
            let cart = state.cart();
            (token, cart.snapshot())
        }
    })
    .await?;

    let order = submit_order(&snapshot, token.as_deref(), state.api.as_ref()).await?;
    web::block(move || complete_checkout(&state.cart, state.session_store.as_ref())).await?;

    Ok(HttpResponse::Created().json(order))
}

/// GET /checkout/success
///
/// Only reachable once per completed checkout; anything else is sent home.
#[utoipa::path(
    get,
    path = "/checkout/success",
    responses(
        (status = 200, description = "Checkout just completed"),
        (status = 303, description = "No checkout to confirm, redirect to /"),
    ),
    tag = "checkout"
)]
pub async fn checkout_success(state: web::Data<AppState>) -> HttpResponse {
    if take_checkout_complete(state.session_store.as_ref()) {
        HttpResponse::Ok().json(json!({ "confirmed": true }))
    } else {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/"))
            .finish()
    }
}
