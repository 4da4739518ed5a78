//! The cart engine: owns the line items, applies the four mutations, keeps
//! the derived totals in step and mirrors every change into the store.
//!
//! None of the public operations fail. Invalid input and duplicate adds are
//! dropped with a log line, and a store that refuses a write only costs the
//! persisted mirror, never the in-memory state.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::cart::{
    check_fields, CartSnapshot, CartTotals, LineItem, LineItemInput, RejectReason,
};
use crate::domain::ports::{Clock, KeyValueStore};

/// Store key holding the JSON-encoded line items.
pub const CART_KEY: &str = "cart";

pub const DEFAULT_IDEMPOTENCY_WINDOW_MS: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSettings {
    /// Adds for the product accepted last are discarded until this much time
    /// has passed since it was accepted.
    pub idempotency_window: Duration,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            idempotency_window: Duration::milliseconds(i64::from(DEFAULT_IDEMPOTENCY_WINDOW_MS)),
        }
    }
}

/// What `add` did with a request. Purely informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Appended,
    Merged,
    Replaced,
    Suppressed,
    Rejected(RejectReason),
}

impl AddOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            AddOutcome::Appended => "appended",
            AddOutcome::Merged => "merged",
            AddOutcome::Replaced => "replaced",
            AddOutcome::Suppressed => "suppressed",
            AddOutcome::Rejected(_) => "rejected",
        }
    }
}

#[derive(Debug, Clone)]
struct AcceptedAdd {
    product_id: String,
    at: DateTime<Utc>,
}

pub struct CartEngine<S, C> {
    store: S,
    clock: C,
    settings: CartSettings,
    items: Vec<LineItem>,
    totals: CartTotals,
    last_add: Option<AcceptedAdd>,
}

impl<S: KeyValueStore, C: Clock> CartEngine<S, C> {
    /// Builds the engine from whatever the store holds under [`CART_KEY`].
    pub fn hydrate(store: S, clock: C, settings: CartSettings) -> Self {
        let items = load_items(&store);
        let totals = CartTotals::compute(&items);
        log::info!(
            "Cart hydrated with {} line items ({} units)",
            items.len(),
            totals.total_items
        );
        Self {
            store,
            clock,
            settings,
            items,
            totals,
            last_add: None,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total_items(&self) -> i64 {
        self.totals.total_items
    }

    pub fn total_price(&self) -> &BigDecimal {
        &self.totals.total_price
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total_items: self.totals.total_items,
            total_price: self.totals.total_price.clone(),
        }
    }

    /// Adds `input` to the cart, or sets/increments the quantity of the line
    /// already holding that product.
    ///
    /// With `replace` the incoming quantity overwrites the existing one,
    /// otherwise it is added to it. A product not yet in the cart is appended
    /// either way.
    ///
    /// An add for the same product as the last accepted one, arriving inside
    /// the idempotency window, is discarded. Rejected inputs don't count as
    /// accepted and leave the window untouched.
    pub fn add(&mut self, input: LineItemInput, replace: bool) -> AddOutcome {
        let request_id = Uuid::new_v4();

        let item = match input.validate() {
            Ok(item) => item,
            Err(reason) => {
                log::warn!("Add-to-cart request {} rejected: {}", request_id, reason);
                return AddOutcome::Rejected(reason);
            }
        };

        let now = self.clock.now();
        if let Some(last) = &self.last_add {
            if last.product_id == item.product_id
                && now - last.at < self.settings.idempotency_window
            {
                log::info!(
                    "Add-to-cart request {} for {} suppressed as a duplicate",
                    request_id,
                    item.product_id
                );
                return AddOutcome::Suppressed;
            }
        }
        self.last_add = Some(AcceptedAdd {
            product_id: item.product_id.clone(),
            at: now,
        });

        log::info!(
            "Add-to-cart request {}: {} x{} (replace: {})",
            request_id,
            item.product_id,
            item.quantity,
            replace
        );

        let outcome = match self.position(&item.product_id) {
            Some(idx) => {
                let existing = &mut self.items[idx];
                if replace {
                    existing.quantity = item.quantity;
                    AddOutcome::Replaced
                } else {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                    AddOutcome::Merged
                }
            }
            None => {
                self.items.push(item);
                AddOutcome::Appended
            }
        };

        self.commit();
        outcome
    }

    /// Removes the line for `product_id`. Unknown ids are ignored.
    pub fn remove(&mut self, product_id: &str) {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        if self.items.len() != before {
            log::info!("Removed {} from cart", product_id);
            self.commit();
        }
    }

    /// Sets the quantity of an existing line; zero or less removes it.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i32) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(idx) = self.position(product_id) {
            self.items[idx].quantity = quantity;
            log::info!("Quantity of {} set to {}", product_id, quantity);
            self.commit();
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        log::info!("Cart cleared");
        self.commit();
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
    }

    /// Recomputes the totals and writes the items through to the store.
    fn commit(&mut self) {
        self.totals = CartTotals::compute(&self.items);
        match serde_json::to_string(&self.items) {
            Ok(json) => {
                if let Err(e) = self.store.set(CART_KEY, &json) {
                    log::error!("Failed to persist cart: {}", e);
                }
            }
            Err(e) => log::error!("Failed to serialize cart: {}", e),
        }
    }
}

/// Reads the persisted items. Anything unreadable counts as an empty cart.
fn load_items<S: KeyValueStore>(store: &S) -> Vec<LineItem> {
    let raw = match store.get(CART_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("Could not read persisted cart, starting empty: {}", e);
            return Vec::new();
        }
    };

    let parsed: Vec<LineItem> = match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            log::warn!("Persisted cart is malformed, starting empty: {}", e);
            return Vec::new();
        }
    };

    // Re-establish the invariants a hand-edited or stale mirror may break.
    let mut items: Vec<LineItem> = Vec::with_capacity(parsed.len());
    for item in parsed {
        if let Err(reason) = check_fields(
            &item.product_id,
            &item.name,
            Some(&item.price),
            item.quantity,
        ) {
            log::warn!("Dropping persisted line item {:?}: {}", item.product_id, reason);
            continue;
        }
        match items.iter_mut().find(|i| i.product_id == item.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => items.push(item),
        }
    }
    items
}
