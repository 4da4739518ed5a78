use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::domain::ports::Clock;

pub const QUANTITY_LOCK_MS: u32 = 500;
pub const ADD_TO_CART_LOCK_MS: u32 = 800;

/// Per-control lock that swallows repeated clicks while an earlier one is
/// considered in flight.
///
/// A lock is taken before the request reaches the cart engine and lapses on
/// its own once `cooldown` has elapsed, whatever the engine did with the
/// request. This sits in front of the engine's own idempotency window and
/// does not replace it.
pub struct ClickGuard<C> {
    clock: C,
    cooldown: Duration,
    locks: HashMap<String, DateTime<Utc>>,
}

impl<C: Clock> ClickGuard<C> {
    pub fn new(clock: C, cooldown: Duration) -> Self {
        Self {
            clock,
            cooldown,
            locks: HashMap::new(),
        }
    }

    /// Takes the lock for `key`. Returns `false` if it is still held.
    pub fn try_acquire(&mut self, key: &str) -> bool {
        if self.is_locked(key) {
            log::info!("Ignoring repeated action on {} while one is in flight", key);
            return false;
        }
        let now = self.clock.now();
        self.locks.retain(|_, until| *until > now);
        self.locks.insert(key.to_string(), now + self.cooldown);
        true
    }

    fn is_locked(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.locks.get(key).is_some_and(|until| *until > now)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::infrastructure::clock::ManualClock;

    fn guard(cooldown_ms: i64) -> (ClickGuard<Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (
            ClickGuard::new(clock.clone(), Duration::milliseconds(cooldown_ms)),
            clock,
        )
    }

    #[test]
    fn second_click_inside_cooldown_is_refused() {
        let (mut guard, _) = guard(500);

        assert!(guard.try_acquire("P1"));
        assert!(!guard.try_acquire("P1"));
        assert!(guard.is_locked("P1"));
    }

    #[test]
    fn lock_lapses_after_cooldown() {
        let (mut guard, clock) = guard(500);

        assert!(guard.try_acquire("P1"));
        clock.advance(Duration::milliseconds(500));

        assert!(!guard.is_locked("P1"));
        assert!(guard.try_acquire("P1"));
    }

    #[test]
    fn keys_are_independent() {
        let (mut guard, _) = guard(800);

        assert!(guard.try_acquire("P1"));
        assert!(guard.try_acquire("P2"));
        assert!(!guard.is_locked("P3"));
    }

    #[test]
    fn refused_click_does_not_extend_the_lock() {
        let (mut guard, clock) = guard(500);

        assert!(guard.try_acquire("P1"));
        clock.advance(Duration::milliseconds(400));
        assert!(!guard.try_acquire("P1"));
        clock.advance(Duration::milliseconds(100));

        assert!(guard.try_acquire("P1"));
    }
}
