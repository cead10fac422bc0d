//! Graceful shutdown: fail liveness, then let in-flight requests finish.

use std::future::Future;

use actix_web::dev::ServerHandle;
use actix_web::web;
use tokio::signal;
use tracing::{info, warn};

use user_registry::inbound::http::health::HealthState;

/// Resolve on Ctrl-C, or on SIGTERM where the platform has it.
///
/// A handler that cannot be installed never fires; the other one still
/// can.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C"),
        () = terminate => info!("received SIGTERM"),
    }
}

/// Wait for `shutdown`, flag the process as draining, then stop the server
/// gracefully.
pub async fn drain_on<F>(handle: ServerHandle, health_state: web::Data<HealthState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    shutdown.await;
    health_state.mark_unhealthy();
    info!("liveness marked failing; draining connections");
    handle.stop(true).await;
}
