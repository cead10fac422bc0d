//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use user_registry::domain::ports::UserRepository;

/// Builder-style configuration for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) repository: Arc<dyn UserRepository>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Serve users from `repository` on `bind_addr`, reading dates from the
    /// system clock.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, repository: Arc<dyn UserRepository>) -> Self {
        Self {
            bind_addr,
            repository,
            clock: Arc::new(DefaultClock),
        }
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
