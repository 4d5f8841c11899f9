//! Per-caller request throttling.
//!
//! One keyed token bucket per scope (`manager`, `delivery`, `customer`),
//! keyed by user id.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use lemon_core::access::Caller;
use lemon_shared::config::ThrottleSettings;
use lemon_shared::constants::{THROTTLE_SCOPE_DELIVERY, THROTTLE_SCOPE_MANAGER};

pub struct Throttle {
    manager: DefaultKeyedRateLimiter<i32>,
    delivery: DefaultKeyedRateLimiter<i32>,
    customer: DefaultKeyedRateLimiter<i32>,
    clock: DefaultClock,
}

impl Throttle {
    pub fn new(settings: &ThrottleSettings) -> Self {
        Self {
            manager: RateLimiter::keyed(per_minute(settings.manager_per_minute)),
            delivery: RateLimiter::keyed(per_minute(settings.delivery_per_minute)),
            customer: RateLimiter::keyed(per_minute(settings.customer_per_minute)),
            clock: DefaultClock::default(),
        }
    }

    /// Take one token from the caller's bucket. On refusal returns how long
    /// until the next token.
    pub fn check(&self, caller: &Caller) -> Result<(), Duration> {
        let limiter = match caller.throttle_scope() {
            THROTTLE_SCOPE_MANAGER => &self.manager,
            THROTTLE_SCOPE_DELIVERY => &self.delivery,
            _ => &self.customer,
        };
        limiter
            .check_key(&caller.user_id)
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Drop buckets that have refilled completely. Returns how many callers
    /// are still tracked.
    pub fn prune(&self) -> usize {
        let mut tracked = 0;
        for limiter in [&self.manager, &self.delivery, &self.customer] {
            limiter.retain_recent();
            limiter.shrink_to_fit();
            tracked += limiter.len();
        }
        tracked
    }
}

/// A zero rate is treated as one request per minute.
fn per_minute(rate: u32) -> Quota {
    Quota::per_minute(NonZeroU32::new(rate).unwrap_or(NonZeroU32::MIN))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use lemon_core::access::Role;

    use super::*;

    fn settings() -> ThrottleSettings {
        ThrottleSettings {
            manager_per_minute: 5,
            delivery_per_minute: 3,
            customer_per_minute: 2,
        }
    }

    #[test]
    fn test_customer_bucket_exhausts() {
        let throttle = Throttle::new(&settings());
        let customer = Caller::new(5, "tilly", false, BTreeSet::new());
        assert!(throttle.check(&customer).is_ok());
        assert!(throttle.check(&customer).is_ok());
        let wait = throttle.check(&customer).unwrap_err();
        assert!(wait > Duration::ZERO);
    }

    #[test]
    fn test_prune_forgets_refilled_buckets() {
        // 60 per minute refills one token per second.
        let throttle = Throttle::new(&ThrottleSettings {
            manager_per_minute: 60,
            delivery_per_minute: 60,
            customer_per_minute: 60,
        });
        let customer = Caller::new(5, "tilly", false, BTreeSet::new());
        let crew = Caller::new(8, "mario", false, BTreeSet::from([Role::DeliveryCrew]));
        throttle.check(&customer).unwrap();
        throttle.check(&crew).unwrap();
        assert_eq!(throttle.prune(), 2);

        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(throttle.prune(), 0);
        assert!(throttle.check(&customer).is_ok());
    }

    #[test]
    fn test_buckets_are_per_user_and_scope() {
        let throttle = Throttle::new(&settings());
        let first = Caller::new(5, "tilly", false, BTreeSet::new());
        let second = Caller::new(6, "mario", false, BTreeSet::new());
        let manager = Caller::new(7, "maria", false, BTreeSet::from([Role::Manager]));

        for _ in 0..2 {
            throttle.check(&first).unwrap();
        }
        assert!(throttle.check(&first).is_err());
        assert!(throttle.check(&second).is_ok());
        for _ in 0..5 {
            assert!(throttle.check(&manager).is_ok());
        }
        assert!(throttle.check(&manager).is_err());
    }
}
