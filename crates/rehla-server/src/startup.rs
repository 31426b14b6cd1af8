//! Server startup utilities.

use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use rehla_config::ObservabilityConfig;
use rehla_core::{RehlaError, RehlaResult};
use tokio::signal;
use tracing::{error, info, warn};

/// Installs the global tracing subscriber. `RUST_LOG` wins over the
/// configured filter.
pub fn init_logging(config: &ObservabilityConfig) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

/// Installs the Prometheus recorder when metrics are enabled.
pub fn install_metrics(config: &ObservabilityConfig) -> Option<PrometheusHandle> {
    if !config.metrics_enabled {
        return None;
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Metrics exposed at {}", config.metrics_path);
            Some(handle)
        }
        Err(e) => {
            warn!("Metrics disabled, recorder install failed: {}", e);
            None
        }
    }
}

/// Prints server startup information.
pub fn print_startup_info(name: &str, addr: &str, metrics_path: Option<&str>) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("{}:  http://{}", name, addr);
    info!("Ping:     http://{}/ping", addr);
    if let Some(path) = metrics_path {
        info!("Metrics:  http://{}{}", addr, path);
    }
    info!("{}", separator);
}

/// Serves `router` on `addr` until a shutdown signal arrives.
pub async fn serve(router: Router, addr: &str) -> RehlaResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RehlaError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RehlaError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install the SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_disabled_installs_nothing() {
        let config = ObservabilityConfig {
            metrics_enabled: false,
            ..ObservabilityConfig::default()
        };
        assert!(install_metrics(&config).is_none());
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info("Web site", "0.0.0.0:4000", Some("/debug/metrics"));
        print_startup_info("Dashboard", "0.0.0.0:4001", None);
    }

    #[tokio::test]
    async fn test_serve_reports_bind_failure() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();
        let result = serve(Router::new(), &addr).await;
        assert!(matches!(result, Err(RehlaError::Internal(_))));
    }
}
