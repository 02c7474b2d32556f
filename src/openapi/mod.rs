use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "QKart API",
        version = "1.0.0",
        description = r#"
# QKart Shopping API

Backend for a small storefront: users with a prepaid wallet, a product
catalog, and one shopping cart per user.

## Cart lifecycle

- `POST /users/{email}/cart` adds a product, creating the cart on first use
- `PUT /users/{email}/cart` sets a quantity (`0` removes the product)
- `PUT /users/{email}/cart/checkout` pays from the wallet and empties the cart

Checkout requires a non-empty cart, a delivery address and enough balance,
checked in that order.

## Error Handling

Every error uses the same body:

```json
{
  "error": "Bad Request",
  "message": "Wallet Balance is insufficient",
  "request_id": "2b1f0c7e-8a1d-4c8e-9d55-1fd1c0d4b1aa",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8082", description = "Local development")
    ),
    tags(
        (name = "carts", description = "Cart and checkout endpoints"),
        (name = "users", description = "Shopper accounts"),
        (name = "products", description = "Product catalog"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        // Carts
        crate::handlers::carts::get_cart,
        crate::handlers::carts::add_to_cart,
        crate::handlers::carts::update_cart_item,
        crate::handlers::carts::remove_cart_item,
        crate::handlers::carts::checkout,

        // Users
        crate::handlers::users::create_user,
        crate::handlers::users::get_user,
        crate::handlers::users::set_address,

        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,

        // Health
        crate::handlers::health::liveness_check,
        crate::handlers::health::readiness_check,
        crate::handlers::health::api_status,
    ),
    components(
        schemas(
            crate::handlers::carts::CartResponse,
            crate::handlers::carts::AddToCartRequest,
            crate::handlers::carts::UpdateCartRequest,
            crate::entities::CartItem,
            crate::entities::ProductSnapshot,
            crate::handlers::users::UserResponse,
            crate::handlers::users::SetAddressRequest,
            crate::services::CreateUserInput,
            crate::handlers::products::ProductResponse,
            crate::services::CreateProductInput,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_cart_routes() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("QKart API"));
        assert!(json.contains("/api/v1/users/{email}/cart"));
        assert!(json.contains("/api/v1/users/{email}/cart/checkout"));
        assert!(json.contains("CartResponse"));
    }
}
