use std::time::Duration;

use anyhow::{Context, Result, bail};
use storefront_core::{
    domain::value_objects::users::AdminAllowList, payments::http_gateway::PaymentEndpoints,
};
use url::Url;

use super::{
    config_model::{
        Admin, BackendServer, DotEnvyConfig, Identity, LocalStorage, Payments, RealtimeDb,
    },
    stage::Stage,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_with(|name| std::env::var(name).ok())
}

/// Builds the config from any variable source. Blank values count as unset.
pub fn load_with<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };
    let required = |name: &str| var(name).with_context(|| format!("{name} is invalid"));

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?
            .parse()
            .context("SERVER_PORT_BACKEND is invalid")?,
        body_limit: var("SERVER_BODY_LIMIT")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: var("SERVER_TIMEOUT")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let realtime_db = match var("REALTIME_DB_MODE").as_deref().unwrap_or("remote") {
        "remote" => RealtimeDb::Remote {
            url: Url::parse(&required("REALTIME_DB_URL")?)
                .context("REALTIME_DB_URL is invalid")?,
            auth_token: var("REALTIME_DB_AUTH_TOKEN"),
            request_timeout: Duration::from_secs(
                var("REALTIME_DB_TIMEOUT_SECS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse()
                    .context("REALTIME_DB_TIMEOUT_SECS is invalid")?,
            ),
        },
        "memory" => RealtimeDb::Memory,
        other => bail!("REALTIME_DB_MODE is invalid: expected `remote` or `memory`, got `{other}`"),
    };

    let identity = Identity {
        jwt_secret: required("IDENTITY_JWT_SECRET")?,
        audience: var("IDENTITY_AUDIENCE"),
    };

    let defaults = PaymentEndpoints::default();
    let payments = Payments {
        base_url: Url::parse(&required("PAYMENT_API_BASE_URL")?)
            .context("PAYMENT_API_BASE_URL is invalid")?,
        callback_url: var("PAYMENT_CALLBACK_URL"),
        endpoints: PaymentEndpoints {
            mobile_push: var("PAYMENT_MOBILE_PUSH_PATH").unwrap_or(defaults.mobile_push),
            paypal_create: var("PAYMENT_PAYPAL_CREATE_PATH").unwrap_or(defaults.paypal_create),
            pesapal_create: var("PAYMENT_PESAPAL_CREATE_PATH").unwrap_or(defaults.pesapal_create),
            status: var("PAYMENT_STATUS_PATH").unwrap_or(defaults.status),
            paypal_verify: var("PAYMENT_PAYPAL_VERIFY_PATH").unwrap_or(defaults.paypal_verify),
        },
        polling: Payments::polling_from_secs(
            var("PAYMENT_POLL_INITIAL_DELAY_SECS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("PAYMENT_POLL_INITIAL_DELAY_SECS is invalid")?,
            var("PAYMENT_POLL_INTERVAL_SECS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("PAYMENT_POLL_INTERVAL_SECS is invalid")?,
            var("PAYMENT_POLL_MAX_ATTEMPTS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .context("PAYMENT_POLL_MAX_ATTEMPTS is invalid")?,
        ),
        request_timeout: Duration::from_secs(
            var("PAYMENT_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "15".to_string())
                .parse()
                .context("PAYMENT_REQUEST_TIMEOUT_SECS is invalid")?,
        ),
    };

    let admin = Admin {
        allow_list: AdminAllowList::from_csv(&var("ADMIN_EMAILS").unwrap_or_default()),
    };

    let local_storage = LocalStorage {
        dir: var("LOCAL_STORAGE_DIR").unwrap_or_else(|| "./data".to_string()),
    };

    let stage = Stage::try_from(&var("STAGE").unwrap_or_default()).unwrap_or_default();

    Ok(DotEnvyConfig {
        stage,
        backend_server,
        realtime_db,
        identity,
        payments,
        admin,
        local_storage,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use storefront_core::domain::value_objects::enums::user_roles::UserRole;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const MINIMAL: [(&str, &str); 4] = [
        ("SERVER_PORT_BACKEND", "8080"),
        ("REALTIME_DB_URL", "https://luo-films-default-rtdb.firebaseio.com"),
        ("IDENTITY_JWT_SECRET", "secret"),
        ("PAYMENT_API_BASE_URL", "https://pay.luo.example"),
    ];

    #[test]
    fn minimal_environment_uses_defaults() {
        let config = load_with(lookup(&MINIMAL)).unwrap();

        assert_eq!(config.backend_server.port, 8080);
        assert_eq!(config.backend_server.body_limit, 10);
        assert_eq!(config.backend_server.timeout, 30);
        assert!(matches!(
            config.realtime_db,
            RealtimeDb::Remote { auth_token: None, request_timeout, .. }
                if request_timeout == Duration::from_secs(10)
        ));
        assert_eq!(config.payments.request_timeout, Duration::from_secs(15));
        assert_eq!(config.payments.endpoints, PaymentEndpoints::default());
        assert_eq!(config.payments.polling.initial_delay, Duration::from_secs(5));
        assert_eq!(config.payments.polling.interval, Duration::from_secs(10));
        assert_eq!(config.payments.polling.max_attempts, 30);
        assert!(config.admin.allow_list.is_empty());
        assert_eq!(config.local_storage.dir, "./data");
        assert_eq!(config.stage, Stage::Development);
    }

    #[test]
    fn memory_mode_does_not_need_a_database_url() {
        let config = load_with(lookup(&[
            ("SERVER_PORT_BACKEND", "8080"),
            ("REALTIME_DB_MODE", "memory"),
            ("IDENTITY_JWT_SECRET", "secret"),
            ("PAYMENT_API_BASE_URL", "https://pay.luo.example"),
            ("ADMIN_EMAILS", "ops@luo.example"),
            ("STAGE", "local"),
        ]))
        .unwrap();

        assert!(matches!(config.realtime_db, RealtimeDb::Memory));
        assert_eq!(config.admin.allow_list.role_for("ops@luo.example"), UserRole::Admin);
        assert_eq!(config.stage, Stage::Local);
    }

    #[test]
    fn names_the_variable_that_is_wrong() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("PAYMENT_POLL_MAX_ATTEMPTS", "many"));

        let err = load_with(lookup(&vars)).unwrap_err();

        assert_eq!(err.to_string(), "PAYMENT_POLL_MAX_ATTEMPTS is invalid");
    }

    #[test]
    fn missing_secret_is_reported() {
        let vars: Vec<_> = MINIMAL
            .into_iter()
            .filter(|(name, _)| *name != "IDENTITY_JWT_SECRET")
            .collect();

        let err = load_with(lookup(&vars)).unwrap_err();

        assert_eq!(err.to_string(), "IDENTITY_JWT_SECRET is invalid");
    }
}
