pub mod cart_engine;
pub mod checkout;
pub mod click_guard;
pub mod session;
