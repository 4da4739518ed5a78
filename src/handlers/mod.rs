pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;

#[cfg(test)]
pub(crate) fn test_state() -> (
    actix_web::web::Data<crate::state::AppState>,
    std::sync::Arc<crate::infrastructure::clock::ManualClock>,
) {
    test_state_with_api(crate::test_support::FakeApi::default())
}

#[cfg(test)]
pub(crate) fn test_state_with_api(
    api: crate::test_support::FakeApi,
) -> (
    actix_web::web::Data<crate::state::AppState>,
    std::sync::Arc<crate::infrastructure::clock::ManualClock>,
) {
    use crate::infrastructure::memory_store::InMemoryStore;

    test_state_with(std::sync::Arc::new(InMemoryStore::new()), api)
}

#[cfg(test)]
pub(crate) fn test_state_with(
    store: crate::state::SharedStore,
    api: crate::test_support::FakeApi,
) -> (
    actix_web::web::Data<crate::state::AppState>,
    std::sync::Arc<crate::infrastructure::clock::ManualClock>,
) {
    use std::sync::Arc;

    use crate::application::cart_engine::CartSettings;
    use crate::application::click_guard::{ADD_TO_CART_LOCK_MS, QUANTITY_LOCK_MS};
    use crate::infrastructure::clock::ManualClock;
    use crate::state::{AppState, GuardSettings};

    let clock = Arc::new(ManualClock::default());
    let state = AppState::new(
        store,
        clock.clone(),
        Arc::new(api),
        CartSettings::default(),
        GuardSettings {
            quantity_lock: chrono::Duration::milliseconds(i64::from(QUANTITY_LOCK_MS)),
            add_to_cart_lock: chrono::Duration::milliseconds(i64::from(ADD_TO_CART_LOCK_MS)),
        },
    );
    (actix_web::web::Data::new(state), clock)
}
