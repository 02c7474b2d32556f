use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Placeholder stored until the user saves a delivery address.
pub const DEFAULT_ADDRESS: &str = "ADDRESS_NOT_SET";

/// Balance credited to every new account.
pub const DEFAULT_WALLET_MONEY: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Shopper account
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(min = 2, max = 255, message = "Name must be between 2 and 255 characters"))]
    pub name: String,

    /// Natural key used by every cart operation
    #[sea_orm(unique)]
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub wallet_money: Decimal,

    pub address: String,

    /// Bumped on every wallet write
    pub version: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// True once the user has replaced the placeholder address.
    pub fn has_non_default_address(&self) -> bool {
        self.address != DEFAULT_ADDRESS
    }
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
            if let ActiveValue::NotSet = active_model.wallet_money {
                active_model.wallet_money = Set(DEFAULT_WALLET_MONEY);
            }
            if let ActiveValue::NotSet = active_model.address {
                active_model.address = Set(DEFAULT_ADDRESS.to_string());
            }
            if let ActiveValue::NotSet = active_model.version {
                active_model.version = Set(1);
            }
            active_model.created_at = Set(now);
        }
        active_model.updated_at = Set(now);

        if insert {
            let model: Model = active_model.clone().try_into().map_err(|_| {
                DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
            })?;
            if let Err(err) = model.validate() {
                return Err(DbErr::Custom(format!("Validation error: {}", err)));
            }
        }

        Ok(active_model)
    }
}
