use actix_web::{web, HttpResponse};

use crate::domain::storefront::Product;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "Product catalog", body = Vec<Product>),
        (status = 502, description = "Remote API unavailable"),
    ),
    tag = "catalog"
)]
pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = state.api.list_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product = state.api.get_product(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}
