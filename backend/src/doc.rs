//! OpenAPI documentation for the registry.
//!
//! Registers the users and health endpoints together with the schema
//! wrappers from [`crate::inbound::http::schemas`]. Served by Swagger UI in
//! debug builds and printed by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorResponseSchema};
use crate::inbound::http::users::{
    MessageEnvelope, UserEnvelope, UserRequest, UserResponse, UsersEnvelope,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User registry API",
        description = "Create, list, replace, and delete registered users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserRequest,
        UserResponse,
        UserEnvelope,
        UsersEnvelope,
        MessageEnvelope,
        ErrorResponseSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "users", description = "User registration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
