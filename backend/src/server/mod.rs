//! Server construction and middleware wiring.

mod config;
mod shutdown;

pub use config::ServerConfig;
pub use shutdown::{drain_on, shutdown_signal};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use user_registry::ApiDoc;
use user_registry::Trace;
use user_registry::domain::UserRegistryService;
use user_registry::inbound::http;
use user_registry::inbound::http::health::HealthState;
use user_registry::inbound::http::state::HttpState;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let service = Arc::new(UserRegistryService::new(
        config.repository.clone(),
        config.clock.clone(),
    ));
    web::Data::new(HttpState::new(service.clone(), service))
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(http::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

#[cfg(feature = "metrics")]
fn build_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("user_registry")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("metrics registration failed: {err}")))
}

/// Construct the HTTP server and mark the process ready once bound.
///
/// Signal handling is left to [`drain_on`] so liveness can fail before the
/// listener stops.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
    };
    #[cfg(feature = "metrics")]
    let metrics = build_metrics()?;

    let server = HttpServer::new(move || {
        let app = build_app(deps.clone());
        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics.clone());
        app
    })
    .bind(config.bind_addr())?
    .disable_signals()
    .run();

    info!(addr = %config.bind_addr(), "user registry listening");
    health_state.mark_ready();
    Ok(server)
}
