use std::time::Duration;

use storefront_core::{
    domain::value_objects::users::AdminAllowList,
    payments::{http_gateway::PaymentEndpoints, polling::PollingPolicy},
};
use url::Url;

use super::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub stage: Stage,
    pub backend_server: BackendServer,
    pub realtime_db: RealtimeDb,
    pub identity: Identity,
    pub payments: Payments,
    pub admin: Admin,
    pub local_storage: LocalStorage,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub enum RealtimeDb {
    Remote {
        url: Url,
        auth_token: Option<String>,
        request_timeout: Duration,
    },
    /// In-process tree; data is lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Identity {
    pub jwt_secret: String,
    pub audience: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Payments {
    pub base_url: Url,
    pub callback_url: Option<String>,
    pub endpoints: PaymentEndpoints,
    pub polling: PollingPolicy,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Admin {
    pub allow_list: AdminAllowList,
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    pub dir: String,
}

impl Payments {
    pub fn polling_from_secs(initial_delay: u64, interval: u64, max_attempts: u32) -> PollingPolicy {
        PollingPolicy {
            initial_delay: Duration::from_secs(initial_delay),
            interval: Duration::from_secs(interval),
            max_attempts,
        }
    }
}
