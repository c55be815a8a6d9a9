use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Extension, Router,
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use storefront_core::infra::local_storage::library::LibraryLocalStore;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    axum_http::{default_routers, dependencies::AppDependencies, routers},
    config::config_model::DotEnvyConfig,
};

/// All `/api/v1` routes with authentication wired in. Transport limits are
/// added by [`start`].
pub fn router(deps: &AppDependencies) -> Router {
    let library = Arc::new(LibraryLocalStore::new(Arc::clone(&deps.local_store)));

    Router::new()
        .fallback(default_routers::not_found)
        .nest("/api/v1/movies", routers::movies::routes(deps))
        .nest("/api/v1/series", routers::series::routes(deps))
        .nest("/api/v1/slides", routers::slides::routes(deps))
        .nest("/api/v1/updates", routers::updates::routes(deps))
        .nest("/api/v1/users", routers::users::routes(deps))
        .nest("/api/v1/session", routers::session::routes(deps))
        .nest(
            "/api/v1/payments",
            routers::payments::routes(deps, Arc::clone(&library)),
        )
        .nest("/api/v1/me", routers::library::routes(library))
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(Extension(Arc::clone(&deps.identity)))
        .layer(TraceLayer::new_for_http())
}

/// [`router`] behind the transport limits from config.
pub fn app(config: &DotEnvyConfig, deps: &AppDependencies) -> Result<Router> {
    Ok(router(deps)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.backend_server.timeout),
        ))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        ))
}

pub async fn start(config: Arc<DotEnvyConfig>, deps: Arc<AppDependencies>) -> Result<()> {
    let app = app(&config, &deps)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(stage = %config.stage, "Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = ?err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
