use crate::{
    entities::product::{self, Model as ProductModel, MAX_PRODUCT_COST},
    errors::ServiceError,
    repositories::{ProductLookup, ProductRepository},
};
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Input for adding a product to the catalog
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(custom = "validate_cost")]
    pub cost: Decimal,
    #[validate(range(min = 0, max = 5))]
    pub rating: i32,
    #[validate(url)]
    pub image: String,
}

/// Costs must fit the `Decimal(19, 4)` column and may not be negative.
fn validate_cost(cost: &Decimal) -> Result<(), ValidationError> {
    if *cost < Decimal::ZERO || *cost > MAX_PRODUCT_COST {
        let mut err = ValidationError::new("cost");
        err.message = Some(
            format!("Cost must be between 0 and {}", MAX_PRODUCT_COST).into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Service for the product catalog
#[derive(Clone)]
pub struct ProductService {
    products: Arc<ProductRepository>,
}

impl ProductService {
    /// Creates a new product service instance
    pub fn new(products: Arc<ProductRepository>) -> Self {
        Self { products }
    }

    /// Every product, ordered by name
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductModel>, ServiceError> {
        self.products.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<ProductModel, ServiceError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))
    }

    /// Case-insensitive match against name or category. A blank query
    /// lists the whole catalog.
    #[instrument(skip(self))]
    pub async fn search_products(&self, text: &str) -> Result<Vec<ProductModel>, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return self.products.find_all().await;
        }
        self.products.search(text).await
    }

    /// Create a new product
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<ProductModel, ServiceError> {
        input.validate()?;

        let product = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            category: Set(input.category),
            cost: Set(input.cost),
            rating: Set(input.rating),
            image: Set(input.image),
            ..Default::default()
        };

        let created = self.products.create(product).await?;
        info!(product_id = %created.id, "Product created");
        Ok(created)
    }
}
