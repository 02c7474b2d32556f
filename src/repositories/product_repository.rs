use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::product::{self, Column, Entity as Product, Model as ProductModel};
use crate::errors::ServiceError;
use crate::repositories::{BaseRepository, ProductLookup, Repository};

/// Repository for the product catalog
#[derive(Debug, Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All products ordered by name
    pub async fn find_all(&self) -> Result<Vec<ProductModel>, ServiceError> {
        Product::find()
            .order_by_asc(Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Case-insensitive substring match on name or category
    pub async fn search(&self, text: &str) -> Result<Vec<ProductModel>, ServiceError> {
        let pattern = format!("%{}%", text.to_lowercase());
        Product::find()
            .filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(Column::Name))).like(pattern.as_str()))
                    .add(
                        Expr::expr(Func::lower(Expr::col(Column::Category)))
                            .like(pattern.as_str()),
                    ),
            )
            .order_by_asc(Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Insert a new product
    pub async fn create(&self, product: product::ActiveModel) -> Result<ProductModel, ServiceError> {
        product
            .insert(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}

#[async_trait]
impl ProductLookup for ProductRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductModel>, ServiceError> {
        Product::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
