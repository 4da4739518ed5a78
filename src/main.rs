use std::sync::Arc;

use actix_web::web;
use dotenvy::dotenv;
use storefront::domain::ports::KeyValueStore;
use storefront::infrastructure::clock::SystemClock;
use storefront::infrastructure::diesel_store::DieselStore;
use storefront::infrastructure::http_api::HttpStorefrontApi;
use storefront::infrastructure::memory_store::InMemoryStore;
use storefront::state::GuardSettings;
use storefront::{build_server, create_pool, run_migrations, AppState, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::load().map_err(std::io::Error::other)?;

    let store: Arc<dyn KeyValueStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).map_err(std::io::Error::other)?;
            run_migrations(&pool).map_err(std::io::Error::other)?;
            log::info!("Persisting client state for profile '{}'", config.store_profile);
            Arc::new(DieselStore::new(pool, config.store_profile.clone()))
        }
        None => Arc::new(InMemoryStore::new()),
    };

    let state = AppState::new(
        store,
        Arc::new(SystemClock),
        Arc::new(HttpStorefrontApi::new(config.api_url.clone())),
        config.cart_settings(),
        GuardSettings {
            quantity_lock: config.quantity_lock(),
            add_to_cart_lock: config.add_to_cart_lock(),
        },
    );

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(web::Data::new(state), &config.host, config.port)?.await
}
