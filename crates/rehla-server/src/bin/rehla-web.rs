//! Public web site server.

use rehla_config::ConfigLoader;
use rehla_core::RehlaResult;
use rehla_rest::{create_web_router, CookieSettings, WebState};
use rehla_server::{di, startup};
use tracing::{error, info};

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

    info!("Starting Rehla web site...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: rehla_config::AppConfig) -> RehlaResult<()> {
    let metrics = startup::install_metrics(&config.observability);
    let metrics_path = metrics.as_ref().map(|_| config.observability.metrics_path.as_str());

    let module = di::build_web_module(&config).await?;
    let state = WebState::from_module(module.as_ref(), CookieSettings::web(&config), metrics.clone());
    let router = create_web_router(state, &config);

    let addr = config.server.web_addr();
    startup::print_startup_info("Web site", &addr, metrics_path);
    startup::serve(router, &addr).await?;

    di::flush_store(module.as_ref()).await;
    Ok(())
}
