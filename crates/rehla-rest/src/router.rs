//! Application routers.

use crate::{
    dashboard,
    middleware::{logging_middleware, panic_response, security_header_layers, session_middleware, SessionState},
    responses::metrics_text,
    state::{DashboardState, WebState},
    web,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rehla_config::AppConfig;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the public web site router.
pub fn create_web_router(state: WebState, config: &AppConfig) -> Router {
    let session = SessionState::new(state.session_resolver.clone(), state.cookie.name.clone());
    let metrics = state.metrics.clone();

    let router = web::routes(&state)
        .layer(middleware::from_fn_with_state(session, session_middleware))
        .with_state(state);

    let router = with_common_layers(router, metrics, config);
    info!("Web router created");
    router
}

/// Creates the staff dashboard router.
pub fn create_dashboard_router(state: DashboardState, config: &AppConfig) -> Router {
    let session = SessionState::new(state.session_resolver.clone(), state.cookie.name.clone());
    let metrics = state.metrics.clone();

    let router = dashboard::routes()
        .layer(middleware::from_fn_with_state(session, session_middleware))
        .with_state(state);

    let router = with_common_layers(router, metrics, config);
    info!("Dashboard router created");
    router
}

/// Adds the probe and metrics endpoints and the outer middleware chain.
/// Layers run outermost last, so panic recovery wraps everything.
fn with_common_layers(router: Router, metrics: Option<PrometheusHandle>, config: &AppConfig) -> Router {
    let mut router = router.route("/ping", get(ping));
    if let Some(handle) = metrics {
        router = router.route(
            &config.observability.metrics_path,
            get(move || {
                let handle = handle.clone();
                async move { metrics_text(handle.render()) }
            }),
        );
    }

    let mut router = router
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TimeoutLayer::new(config.server.request_timeout()));
    for layer in security_header_layers() {
        router = router.layer(layer);
    }

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

async fn ping() -> &'static str {
    "pong"
}
