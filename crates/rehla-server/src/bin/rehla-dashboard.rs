//! Staff dashboard server.

use rehla_config::{AppConfig, ConfigLoader};
use rehla_core::RehlaResult;
use rehla_rest::{create_dashboard_router, CookieSettings, DashboardState};
use rehla_server::{di, startup};
use rehla_service::DashboardAccountService;
use shaku::HasComponent;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    startup::init_logging(&config.observability);

    info!("Starting Rehla dashboard...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> RehlaResult<()> {
    let metrics = startup::install_metrics(&config.observability);
    let metrics_path = metrics.as_ref().map(|_| config.observability.metrics_path.as_str());

    let module = di::build_dashboard_module(&config).await?;

    let accounts: Arc<dyn DashboardAccountService> = module.resolve();
    match &config.dashboard.admin_password {
        Some(password) => {
            accounts
                .bootstrap_admin(&config.dashboard.admin_username, password)
                .await?;
        }
        None => warn!("No admin password configured, skipping admin bootstrap"),
    }

    let state = DashboardState::from_module(module.as_ref(), CookieSettings::dashboard(&config), metrics.clone());
    let router = create_dashboard_router(state, &config);

    let addr = config.server.dashboard_addr();
    startup::print_startup_info("Dashboard", &addr, metrics_path);
    startup::serve(router, &addr).await?;

    di::flush_store(module.as_ref()).await;
    Ok(())
}
