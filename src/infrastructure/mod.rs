pub mod clock;
pub mod diesel_store;
pub mod http_api;
pub mod memory_store;
pub mod models;
