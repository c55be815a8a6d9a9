use std::sync::Arc;

use anyhow::Result;
use backend::{
    axum_http::{dependencies::AppDependencies, http_serve},
    config::config_loader,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Backend exited with error: {:#}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let service = storefront_core::observability::init_observability("backend")?;

    let dotenvy_env = config_loader::load()?;
    info!(
        service = %service.service_name,
        stage = %dotenvy_env.stage,
        "ENV has been loaded"
    );

    let deps = AppDependencies::from_config(&dotenvy_env)?;
    info!(
        admins = dotenvy_env.admin.allow_list.len(),
        storage_dir = %dotenvy_env.local_storage.dir,
        "Dependencies have been wired"
    );

    http_serve::start(Arc::new(dotenvy_env), Arc::new(deps)).await?;

    Ok(())
}
