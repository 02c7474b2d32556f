use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{
    entities::{cart::Model as CartModel, CartItem},
    errors::{ApiError, ErrorResponse, ServiceError},
    services::CartService,
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, put},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Creates the router for cart endpoints
pub fn carts_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:email/cart",
            get(get_cart).post(add_to_cart).put(update_cart_item),
        )
        .route(
            "/users/:email/cart/items/:product_id",
            delete(remove_cart_item),
        )
        .route("/users/:email/cart/checkout", put(checkout))
}

// Request and response DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({"productId": "5f0b1c2e-7c3a-4f53-9a51-2f1b6a1c9d10", "quantity": 2}))]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: u32,
}

/// `quantity == 0` removes the product from the cart
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub id: Uuid,
    pub email: String,
    pub cart_items: Vec<CartItem>,
    pub payment_option: String,
    pub total: Decimal,
    pub version: i32,
}

impl TryFrom<CartModel> for CartResponse {
    type Error = ServiceError;

    fn try_from(cart: CartModel) -> Result<Self, Self::Error> {
        let total = CartService::cart_total(&cart)?;
        Ok(Self {
            id: cart.id,
            email: cart.email,
            cart_items: cart.cart_items.0,
            payment_option: cart.payment_option,
            total,
            version: cart.version,
        })
    }
}

/// Get the user's cart
#[utoipa::path(
    get,
    path = "/api/v1/users/{email}/cart",
    params(("email" = String, Path, description = "Cart owner's email")),
    responses(
        (status = 200, description = "Cart found", body = CartResponse),
        (status = 404, description = "User or cart not found", body = ErrorResponse)
    ),
    tag = "carts"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .get_user_by_email(&email)
        .await
        .map_err(map_service_error)?;

    let cart = state
        .services
        .cart
        .get_cart_by_user(&user)
        .await
        .map_err(map_service_error)?;

    let body = CartResponse::try_from(cart).map_err(map_service_error)?;
    Ok(success_response(body))
}

/// Add a product to the user's cart, creating the cart on first use
#[utoipa::path(
    post,
    path = "/api/v1/users/{email}/cart",
    params(("email" = String, Path, description = "Cart owner's email")),
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Product added", body = CartResponse),
        (status = 400, description = "Unknown product or invalid quantity", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Product already in cart", body = ErrorResponse)
    ),
    tag = "carts"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let user = state
        .services
        .users
        .get_user_by_email(&email)
        .await
        .map_err(map_service_error)?;

    let cart = state
        .services
        .cart
        .add_product_to_cart(&user, payload.product_id, payload.quantity)
        .await
        .map_err(map_service_error)?;

    let body = CartResponse::try_from(cart).map_err(map_service_error)?;
    Ok(created_response(body))
}

/// Set the quantity of a product in the cart
#[utoipa::path(
    put,
    path = "/api/v1/users/{email}/cart",
    params(("email" = String, Path, description = "Cart owner's email")),
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Quantity updated", body = CartResponse),
        (status = 204, description = "Quantity 0: product removed"),
        (status = 400, description = "No cart, unknown product or product not in cart", body = ErrorResponse)
    ),
    tag = "carts"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(payload): Json<UpdateCartRequest>,
) -> Result<axum::response::Response, ApiError> {
    validate_input(&payload)?;

    let user = state
        .services
        .users
        .get_user_by_email(&email)
        .await
        .map_err(map_service_error)?;

    if payload.quantity == 0 {
        state
            .services
            .cart
            .delete_product_from_cart(&user, payload.product_id)
            .await
            .map_err(map_service_error)?;
        return Ok(no_content_response());
    }

    let cart = state
        .services
        .cart
        .update_product_in_cart(&user, payload.product_id, payload.quantity)
        .await
        .map_err(map_service_error)?;

    let body = CartResponse::try_from(cart).map_err(map_service_error)?;
    Ok(success_response(body))
}

/// Remove a product from the cart
#[utoipa::path(
    delete,
    path = "/api/v1/users/{email}/cart/items/{product_id}",
    params(
        ("email" = String, Path, description = "Cart owner's email"),
        ("product_id" = Uuid, Path, description = "Product to remove")
    ),
    responses(
        (status = 204, description = "Product removed"),
        (status = 400, description = "No cart or product not in cart", body = ErrorResponse)
    ),
    tag = "carts"
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path((email, product_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .get_user_by_email(&email)
        .await
        .map_err(map_service_error)?;

    state
        .services
        .cart
        .delete_product_from_cart(&user, product_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// Pay for the cart from the user's wallet
#[utoipa::path(
    put,
    path = "/api/v1/users/{email}/cart/checkout",
    params(("email" = String, Path, description = "Cart owner's email")),
    responses(
        (status = 204, description = "Checkout completed; cart emptied"),
        (status = 400, description = "Empty cart, address not set or insufficient balance", body = ErrorResponse),
        (status = 404, description = "User or cart not found", body = ErrorResponse),
        (status = 409, description = "Cart or wallet changed concurrently", body = ErrorResponse)
    ),
    tag = "carts"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .get_user_by_email(&email)
        .await
        .map_err(map_service_error)?;

    let summary = state
        .services
        .cart
        .checkout(&user)
        .await
        .map_err(map_service_error)?;

    info!(
        cart_id = %summary.cart.id,
        total = %summary.total,
        "checkout request served"
    );
    Ok(no_content_response())
}
