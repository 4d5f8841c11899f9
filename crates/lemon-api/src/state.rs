use std::sync::Arc;

use lemon_core::services::Services;

use crate::throttle::Throttle;

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub throttle: Arc<Throttle>,
}

impl AppState {
    pub fn new(services: Services, throttle: Throttle) -> Self {
        Self {
            services,
            throttle: Arc::new(throttle),
        }
    }
}
