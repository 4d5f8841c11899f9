//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 4;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 86400;

pub const MANAGER_GROUP: &str = "Manager";
pub const DELIVERY_CREW_GROUP: &str = "Delivery Crew";

pub const THROTTLE_SCOPE_MANAGER: &str = "manager";
pub const THROTTLE_SCOPE_DELIVERY: &str = "delivery";
pub const THROTTLE_SCOPE_CUSTOMER: &str = "customer";

/// How often idle throttle buckets are dropped.
pub const THROTTLE_PRUNE_INTERVAL_SECS: u64 = 60;
