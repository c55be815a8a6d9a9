use std::sync::Arc;

use anyhow::Result;

use storefront_core::{
    domain::{
        repositories::{local_store::LocalStore, realtime_tree::RealtimeTree},
        value_objects::users::AdminAllowList,
    },
    infra::{
        local_storage::json_file_store::JsonFileStore,
        realtime_db::{client::RealtimeDbClient, memory::MemoryTree},
    },
    payments::{
        attempts::AttemptRegistry, gateway::PaymentGateway, http_gateway::PaymentApiClient,
        polling::PollingPolicy,
    },
    session::registry::SessionRegistry,
};
use tracing::{info, warn};

use crate::{
    auth::IdentityVerifier,
    config::config_model::{DotEnvyConfig, RealtimeDb},
};

/// Everything the routers share for the lifetime of the process.
pub struct AppDependencies {
    pub tree: Arc<dyn RealtimeTree>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub local_store: Arc<dyn LocalStore>,
    pub identity: Arc<IdentityVerifier>,
    pub sessions: Arc<SessionRegistry>,
    pub attempts: Arc<AttemptRegistry>,
    pub admin_allow_list: AdminAllowList,
    pub polling: PollingPolicy,
    pub callback_url: Option<String>,
}

impl AppDependencies {
    pub fn from_config(config: &DotEnvyConfig) -> Result<Self> {
        let tree: Arc<dyn RealtimeTree> = match &config.realtime_db {
            RealtimeDb::Remote {
                url,
                auth_token,
                request_timeout,
            } => {
                info!(%url, "Realtime database client configured");
                Arc::new(RealtimeDbClient::new(
                    url.clone(),
                    auth_token.clone(),
                    *request_timeout,
                )?)
            }
            RealtimeDb::Memory => {
                warn!("Using the in-memory realtime tree; data is lost on restart");
                Arc::new(MemoryTree::new())
            }
        };

        let gateway = Arc::new(PaymentApiClient::new(
            config.payments.base_url.clone(),
            config.payments.endpoints.clone(),
            config.payments.request_timeout,
        )?);

        Ok(Self {
            tree,
            gateway,
            local_store: Arc::new(JsonFileStore::new(&config.local_storage.dir)),
            identity: Arc::new(IdentityVerifier::new(
                &config.identity.jwt_secret,
                config.identity.audience.as_deref(),
            )),
            sessions: Arc::new(SessionRegistry::new()),
            attempts: Arc::new(AttemptRegistry::new()),
            admin_allow_list: config.admin.allow_list.clone(),
            polling: config.payments.polling,
            callback_url: config.payments.callback_url.clone(),
        })
    }
}
