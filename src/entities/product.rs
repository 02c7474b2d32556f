use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Largest cost the `Decimal(19, 4)` column holds: 999999999999999.9999
pub const MAX_PRODUCT_COST: Decimal =
    Decimal::from_parts(2_313_682_943, 2_328_306_436, 0, false, 4);

/// Catalog product
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Product name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// Free-text category, e.g. "Fashion" or "Electronics"
    #[validate(length(min = 1, max = 100, message = "Category must be between 1 and 100 characters"))]
    pub category: String,

    /// Unit price
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub cost: Decimal,

    /// Star rating, 0 to 5
    #[validate(range(min = 0, max = 5, message = "Rating must be between 0 and 5"))]
    pub rating: i32,

    /// URL of the product image
    pub image: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            active_model.created_at = Set(now);
        }
        active_model.updated_at = Set(now);

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if let Err(err) = model.validate() {
            return Err(DbErr::Custom(format!("Validation error: {}", err)));
        }
        if model.cost < Decimal::ZERO || model.cost > MAX_PRODUCT_COST {
            return Err(DbErr::Custom(
                "Validation error: cost is out of range".to_string(),
            ));
        }

        Ok(active_model)
    }
}
