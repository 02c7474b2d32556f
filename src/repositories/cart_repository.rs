use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::entities::cart::{self, Column, Entity as Cart, Model as CartModel};
use crate::entities::user::{self, Entity as User, Model as UserModel};
use crate::errors::ServiceError;
use crate::repositories::{BaseRepository, CartStore, Repository};

/// sea-orm backed cart store
#[derive(Debug, Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Version-checked replace of the whole cart row.
    async fn save_on<C>(conn: &C, cart: &CartModel) -> Result<CartModel, ServiceError>
    where
        C: ConnectionTrait,
    {
        let next_version = cart.version + 1;
        let changes = cart::ActiveModel {
            cart_items: Set(cart.cart_items.clone()),
            payment_option: Set(cart.payment_option.clone()),
            version: Set(next_version),
            ..Default::default()
        };

        let result = Cart::update_many()
            .set(changes)
            .filter(Column::Id.eq(cart.id))
            .filter(Column::Version.eq(cart.version))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            warn!(cart_id = %cart.id, version = cart.version, "stale cart version on save");
            counter!("qkart_cart.version_conflicts", 1);
            return Err(ServiceError::ConcurrentModification(cart.id));
        }

        counter!("qkart_cart.saves", 1);
        Ok(CartModel {
            version: next_version,
            ..cart.clone()
        })
    }
}

#[async_trait]
impl CartStore for CartRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<CartModel>, ServiceError> {
        Cart::find()
            .filter(Column::Email.eq(email))
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn create(&self, email: &str) -> Result<CartModel, ServiceError> {
        let cart = CartModel::empty(email);
        let active = cart::ActiveModel {
            id: Set(cart.id),
            email: Set(cart.email.clone()),
            cart_items: Set(cart.cart_items.clone()),
            payment_option: Set(cart.payment_option.clone()),
            version: Set(cart.version),
        };

        let inserted = Cart::insert(active)
            .on_conflict(OnConflict::column(Column::Email).do_nothing().to_owned())
            .exec_without_returning(self.base.get_db())
            .await?;

        if inserted == 0 {
            debug!(email, "cart already exists");
            return Err(ServiceError::Conflict(format!(
                "Cart already exists for {}",
                email
            )));
        }

        counter!("qkart_cart.created", 1);
        Ok(cart)
    }

    async fn save(&self, cart: &CartModel) -> Result<CartModel, ServiceError> {
        Self::save_on(self.base.get_db(), cart).await
    }

    async fn commit_checkout(
        &self,
        cart: &CartModel,
        user: &UserModel,
        total: Decimal,
    ) -> Result<(CartModel, UserModel), ServiceError> {
        // Dropping `txn` on any early return rolls both writes back
        let txn = self.base.get_db().begin().await?;

        let current = User::find()
            .filter(user::Column::Email.eq(user.email.as_str()))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        if current.wallet_money < total {
            return Err(ServiceError::ValidationError(
                "Wallet Balance is insufficient".to_string(),
            ));
        }

        let debited = UserModel {
            wallet_money: current.wallet_money - total,
            version: current.version + 1,
            updated_at: Utc::now(),
            ..current.clone()
        };

        let result = User::update_many()
            .set(user::ActiveModel {
                wallet_money: Set(debited.wallet_money),
                version: Set(debited.version),
                updated_at: Set(debited.updated_at),
                ..Default::default()
            })
            .filter(user::Column::Id.eq(current.id))
            .filter(user::Column::Version.eq(current.version))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            counter!("qkart_user.version_conflicts", 1);
            return Err(ServiceError::ConcurrentModification(current.id));
        }

        let mut emptied = cart.clone();
        emptied.cart_items.clear();
        let saved = Self::save_on(&txn, &emptied).await?;

        txn.commit().await?;
        counter!("qkart_checkout.completed", 1);

        Ok((saved, debited))
    }
}
