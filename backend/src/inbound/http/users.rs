//! Users API handlers.
//!
//! ```text
//! POST   /users       {"name":"Jonas Jonaitis","email":"jonas@example.com","birth_date":30}
//! GET    /users
//! PUT    /users/{id}  {"name":...,"email":...,"birth_date":"1990-04-02"}
//! DELETE /users/{id}
//! ```
//!
//! The same handlers are mounted under `/api` by [`configure`]'s callers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{User, UserDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorResponseSchema;
use crate::inbound::http::state::HttpState;

/// Request body for creating or replacing a user.
///
/// Fields are kept untyped so validation can report wrong types per field.
/// Keys other than these are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UserRequest {
    /// Full name with at least two words.
    #[serde(default)]
    #[schema(value_type = String, example = "Jonas Jonaitis")]
    pub name: Option<Value>,
    /// Contact email address.
    #[serde(default)]
    #[schema(value_type = String, example = "jonas@example.com")]
    pub email: Option<Value>,
    /// `YYYY-MM-DD` date or an age in whole years (number or numeric string).
    #[serde(default, alias = "birthDate")]
    #[schema(value_type = String, example = "1990-04-02")]
    pub birth_date: Option<Value>,
}

impl From<UserRequest> for UserDraft {
    fn from(value: UserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            birth_date: value.birth_date,
        }
    }
}

/// Serialised user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Jonas Jonaitis")]
    pub name: String,
    #[schema(example = "jonas@example.com")]
    pub email: String,
    /// Canonical `YYYY-MM-DD` birth date.
    #[schema(example = "1995-01-01")]
    pub birth_date: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            birth_date: user.birth_date().to_string(),
        }
    }
}

/// Success envelope carrying one user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    pub user: UserResponse,
}

/// Success envelope carrying every user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersEnvelope {
    pub success: bool,
    pub users: Vec<UserResponse>,
}

/// Success envelope carrying a confirmation message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageEnvelope {
    pub success: bool,
    #[schema(example = "user deleted")]
    pub message: String,
}

fn user_envelope(user: &User) -> UserEnvelope {
    UserEnvelope {
        success: true,
        user: UserResponse::from(user),
    }
}

/// Register the users handlers on an app or scope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use user_registry::inbound::http::users;
///
/// let app = App::new()
///     .configure(users::configure)
///     .service(web::scope("/api").configure(users::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(list_users)
        .service(update_user)
        .service(delete_user);
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, description = "Validation failed or email already registered", body = ErrorResponseSchema),
        (status = 500, description = "Internal server error", body = ErrorResponseSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users_command
        .create_user(UserDraft::from(payload.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(user_envelope(&user)))
}

/// List every registered user in insertion order.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = UsersEnvelope),
        (status = 500, description = "Internal server error", body = ErrorResponseSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<UsersEnvelope>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(UsersEnvelope {
        success: true,
        users: users.iter().map(UserResponse::from).collect(),
    }))
}

/// Replace every field of an existing user.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 400, description = "Validation failed", body = ErrorResponseSchema),
        (status = 404, description = "Unknown user", body = ErrorResponseSchema),
        (status = 500, description = "Internal server error", body = ErrorResponseSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let id = path.into_inner();
    let user = state
        .users_command
        .update_user(&id, UserDraft::from(payload.into_inner()))
        .await?;
    Ok(web::Json(user_envelope(&user)))
}

/// Remove a user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageEnvelope),
        (status = 404, description = "Unknown user", body = ErrorResponseSchema),
        (status = 500, description = "Internal server error", body = ErrorResponseSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageEnvelope>> {
    let id = path.into_inner();
    state.users_command.delete_user(&id).await?;
    Ok(web::Json(MessageEnvelope {
        success: true,
        message: format!("user {id} deleted"),
    }))
}
