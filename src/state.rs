use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Duration;

use crate::application::cart_engine::{CartEngine, CartSettings};
use crate::application::click_guard::ClickGuard;
use crate::application::session::AuthSession;
use crate::domain::ports::{Clock, KeyValueStore, StorefrontApi};
use crate::infrastructure::memory_store::InMemoryStore;

pub type SharedStore = Arc<dyn KeyValueStore>;
pub type SharedClock = Arc<dyn Clock>;
pub type Cart = CartEngine<SharedStore, SharedClock>;

#[derive(Debug, Clone, Copy)]
pub struct GuardSettings {
    pub quantity_lock: Duration,
    pub add_to_cart_lock: Duration,
}

/// Everything the HTTP layer shares. There is exactly one cart engine per
/// running application and it lives here.
pub struct AppState {
    pub cart: Mutex<Cart>,
    pub quantity_guard: Mutex<ClickGuard<SharedClock>>,
    pub add_guard: Mutex<ClickGuard<SharedClock>>,
    /// Per-process scratch space, cleared on restart.
    pub session_store: SharedStore,
    pub auth: AuthSession<SharedStore>,
    pub api: Arc<dyn StorefrontApi>,
}

impl AppState {
    /// Hydrates the cart from `store`, which also keeps the signed-in user.
    pub fn new(
        store: SharedStore,
        clock: SharedClock,
        api: Arc<dyn StorefrontApi>,
        cart_settings: CartSettings,
        guards: GuardSettings,
    ) -> Self {
        Self {
            cart: Mutex::new(CartEngine::hydrate(store.clone(), clock.clone(), cart_settings)),
            quantity_guard: Mutex::new(ClickGuard::new(clock.clone(), guards.quantity_lock)),
            add_guard: Mutex::new(ClickGuard::new(clock, guards.add_to_cart_lock)),
            session_store: Arc::new(InMemoryStore::new()),
            auth: AuthSession::new(store),
            api,
        }
    }

    // The engine never panics while holding the lock, so a poisoned mutex
    // still guards consistent state.
    pub fn cart(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn quantity_guard(&self) -> MutexGuard<'_, ClickGuard<SharedClock>> {
        self.quantity_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_guard(&self) -> MutexGuard<'_, ClickGuard<SharedClock>> {
        self.add_guard.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
