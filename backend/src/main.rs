//! User registry entry-point: loads settings, wires the repository, and
//! serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server, drain_on, shutdown_signal};
use user_registry::domain::ports::UserRepository;
use user_registry::inbound::http::health::HealthState;
use user_registry::outbound::memory::InMemoryUserRepository;
use user_registry::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use user_registry::settings::RegistrySettings;

async fn build_repository(settings: &RegistrySettings) -> std::io::Result<Arc<dyn UserRepository>> {
    match settings.database_url() {
        Some(url) => {
            let config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
            let pool = DbPool::new(config)
                .await
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            info!(
                max_connections = settings.db_max_connections(),
                "using PostgreSQL user repository"
            );
            Ok(Arc::new(DieselUserRepository::new(pool)))
        }
        None => {
            warn!("no database URL configured; users are kept in memory");
            Ok(Arc::new(InMemoryUserRepository::default()))
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = RegistrySettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let repository = build_repository(&settings).await?;
    let config = ServerConfig::new(settings.bind_addr()?, repository);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(drain_on(server.handle(), health_state, shutdown_signal()));
    server.await
}
