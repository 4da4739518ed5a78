pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::Config;
pub use domain::errors::DomainError;
pub use db::{create_pool, DbPool};
pub use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::update_quantity,
        handlers::cart::remove_item,
        handlers::cart::clear_cart,
        handlers::checkout::checkout,
        handlers::checkout::checkout_success,
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::account::login,
        handlers::account::register,
        handlers::account::logout,
        handlers::account::get_profile,
        handlers::account::update_profile,
    ),
    tags(
        (name = "cart", description = "The shopping cart"),
        (name = "checkout", description = "Turning the cart into an order"),
        (name = "catalog", description = "Products from the remote API"),
        (name = "account", description = "Session and profile"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Internal(format!("Failed to run migrations: {e}")))?;
    Ok(())
}

/// Registers every route. Shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .service(
                web::resource("")
                    .route(web::get().to(handlers::cart::get_cart))
                    .route(web::delete().to(handlers::cart::clear_cart)),
            )
            .route("/items", web::post().to(handlers::cart::add_item))
            .service(
                web::resource("/items/{product_id}")
                    .route(web::put().to(handlers::cart::update_quantity))
                    .route(web::delete().to(handlers::cart::remove_item)),
            ),
    )
    .service(
        web::scope("/checkout")
            .route("", web::post().to(handlers::checkout::checkout))
            .route(
                "/success",
                web::get().to(handlers::checkout::checkout_success),
            ),
    )
    .service(
        web::scope("/products")
            .route("", web::get().to(handlers::catalog::list_products))
            .route("/{id}", web::get().to(handlers::catalog::get_product)),
    )
    .service(
        web::scope("/auth")
            .route("/login", web::post().to(handlers::account::login))
            .route("/register", web::post().to(handlers::account::register))
            .route("/logout", web::post().to(handlers::account::logout)),
    )
    .service(
        web::resource("/profile")
            .route(web::get().to(handlers::account::get_profile))
            .route(web::put().to(handlers::account::update_profile)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
