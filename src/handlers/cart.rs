use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::cart::{CartSnapshot, LineItem, LineItemInput, WireDecimal};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResponse {
    pub product_id: String,
    pub name: String,
    /// Decimal as a string, e.g. "9.99"
    pub price: String,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub subtotal: String,
}

impl From<&LineItem> for LineItemResponse {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            price: item.price.to_string(),
            quantity: item.quantity,
            category: item.category.clone(),
            subtotal: item.subtotal().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItemResponse>,
    pub total_items: i64,
    pub total_price: String,
    /// What happened to the request: `appended`, `merged`, `replaced`,
    /// `suppressed`, `rejected` or `locked`. Absent on plain reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl CartResponse {
    pub fn new(snapshot: &CartSnapshot, outcome: Option<&str>) -> Self {
        Self {
            items: snapshot.items.iter().map(LineItemResponse::from).collect(),
            total_items: snapshot.total_items,
            total_price: snapshot.total_price.to_string(),
            outcome: outcome.map(str::to_owned),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    /// Decimal price, e.g. "9.99". A JSON number is also accepted.
    #[schema(value_type = Option<String>)]
    pub price: Option<WireDecimal>,
    pub quantity: i32,
    pub category: Option<String>,
    /// Set the quantity instead of adding to it.
    #[serde(default)]
    pub replace: bool,
    /// Identifies the control that issued the request, for click suppression.
    /// Defaults to the product id.
    pub control_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

const LOCKED: &str = "locked";

fn parse_price(raw: &WireDecimal) -> Result<BigDecimal, AppError> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid price '{}': {}", raw.to_text(), e)))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses((status = 200, description = "Current cart", body = CartResponse)),
    tag = "cart"
)]
pub async fn get_cart(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let snapshot = web::block(move || {
        let cart = state.cart();
        cart.snapshot()
    })
    .await?;
    let response = CartResponse::new(&snapshot, None);
    Ok(HttpResponse::Ok().json(response))
}

/// POST /cart/items
///
/// Adds a product or changes its quantity. Repeated clicks from the same
/// control are swallowed for a short cooldown before the engine sees them,
/// and the engine then applies its own duplicate window. Invalid items are
/// dropped, not refused: the response is always the resulting cart.
#[utoipa::path(
    post,
    path = "/cart/items",
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Resulting cart", body = CartResponse),
        (status = 400, description = "Price is not a decimal"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    state: web::Data<AppState>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let price = body.price.as_ref().map(parse_price).transpose()?;
    let control = body
        .control_id
        .clone()
        .unwrap_or_else(|| body.product_id.clone());
    let input = LineItemInput {
        product_id: body.product_id,
        name: body.name,
        price,
        quantity: body.quantity,
        category: body.category,
    };
    let replace = body.replace;

    let response = web::block(move || {
        if !state.add_guard().try_acquire(&control) {
            let cart = state.cart();
            return CartResponse::new(&cart.snapshot(), Some(LOCKED));
        }
        let mut cart = state.cart();
        let outcome = cart.add(input, replace);
        CartResponse::new(&cart.snapshot(), Some(outcome.label()))
    })
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /cart/items/{product_id}
///
/// Sets the quantity of a line; zero or less removes it.
#[utoipa::path(
    put,
    path = "/cart/items/{product_id}",
    params(("product_id" = String, Path, description = "Product id")),
    request_body = UpdateQuantityRequest,
    responses((status = 200, description = "Resulting cart", body = CartResponse)),
    tag = "cart"
)]
pub async fn update_quantity(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let quantity = body.quantity;

    let response = web::block(move || {
        if !state.quantity_guard().try_acquire(&product_id) {
            let cart = state.cart();
            return CartResponse::new(&cart.snapshot(), Some(LOCKED));
        }
        let mut cart = state.cart();
        cart.update_quantity(&product_id, quantity);
        CartResponse::new(&cart.snapshot(), None)
    })
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// DELETE /cart/items/{product_id}
#[utoipa::path(
    delete,
    path = "/cart/items/{product_id}",
    params(("product_id" = String, Path, description = "Product id")),
    responses((status = 200, description = "Resulting cart", body = CartResponse)),
    tag = "cart"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();

    let response = web::block(move || {
        let mut cart = state.cart();
        cart.remove(&product_id);
        CartResponse::new(&cart.snapshot(), None)
    })
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// DELETE /cart
#[utoipa::path(
    delete,
    path = "/cart",
    responses((status = 200, description = "Empty cart", body = CartResponse)),
    tag = "cart"
)]
pub async fn clear_cart(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let response = web::block(move || {
        let mut cart = state.cart();
        cart.clear();
        CartResponse::new(&cart.snapshot(), None)
    })
    .await?;

    Ok(HttpResponse::Ok().json(response))
}
