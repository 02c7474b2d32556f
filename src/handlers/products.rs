use super::common::{created_response, map_service_error, success_response, validate_input};
use crate::{
    entities::product::Model as ProductModel,
    errors::{ApiError, ErrorResponse},
    handlers::AppState,
    services::CreateProductInput,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", get(get_product))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductSearchParams {
    /// Text matched against product name and category
    pub value: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub cost: Decimal,
    pub rating: i32,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl From<ProductModel> for ProductResponse {
    fn from(product: ProductModel) -> Self {
        Self {
            id: product.id,
            name: product.name,
            category: product.category,
            cost: product.cost,
            rating: product.rating,
            image: product.image,
            created_at: product.created_at,
        }
    }
}

/// List the catalog, optionally filtered by `value`
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductSearchParams),
    responses((status = 200, description = "Matching products", body = [ProductResponse])),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductSearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let products = match params.value.as_deref() {
        Some(value) => state.services.products.search_products(value).await,
        None => state.services.products.list_products().await,
    }
    .map_err(map_service_error)?;

    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(success_response(body))
}

/// Fetch a single product
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ProductResponse::from(product)))
}

/// Add a product to the catalog
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product = state
        .services
        .products
        .create_product(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(ProductResponse::from(product)))
}
