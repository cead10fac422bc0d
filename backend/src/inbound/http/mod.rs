//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod users;

pub use error::ApiResult;

/// Base path under which the users API is mounted a second time.
pub const API_PREFIX: &str = "/api";

/// Register every HTTP route and the JSON extractor configuration.
///
/// Callers supply `web::Data<HttpState>` and `web::Data<HealthState>`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_registry::inbound::http;
///
/// let app = App::new().configure(http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .configure(users::configure)
        .service(web::scope(API_PREFIX).configure(users::configure))
        .service(health::ready)
        .service(health::live);
}
