use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    entities::user::Model as UserModel,
    errors::{ApiError, ErrorResponse},
    handlers::AppState,
    services::CreateUserInput,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:email", get(get_user))
        .route("/users/:email/address", put(set_address))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"address": "Flat 4, 221B Baker Street, London"}))]
pub struct SetAddressRequest {
    /// New delivery address, at least 20 characters
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub wallet_money: Decimal,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            wallet_money: user.wallet_money,
            address: user.address,
            created_at: user.created_at,
        }
    }
}

/// Register a shopper
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid name or email", body = ErrorResponse),
        (status = 409, description = "Email already taken", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let user = state
        .services
        .users
        .create_user(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(UserResponse::from(user)))
}

/// Fetch a shopper by email
#[utoipa::path(
    get,
    path = "/api/v1/users/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .get_user_by_email(&email)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(UserResponse::from(user)))
}

/// Set the delivery address used at checkout
#[utoipa::path(
    put,
    path = "/api/v1/users/{email}/address",
    params(("email" = String, Path, description = "User email")),
    request_body = SetAddressRequest,
    responses(
        (status = 200, description = "Address saved", body = UserResponse),
        (status = 400, description = "Address too short", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn set_address(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(payload): Json<SetAddressRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let user = state
        .services
        .users
        .set_address(&email, &payload.address)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(UserResponse::from(user)))
}
