use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{cart, product, user};
use crate::errors::ServiceError;

pub mod cart_repository;
pub mod product_repository;
pub mod user_repository;

pub use cart_repository::CartRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Resolves users by their email address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError>;
}

/// Resolves catalog products by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<product::Model>, ServiceError>;
}

/// Persistence for carts.
///
/// A cart is read and written as one document. `save` only succeeds when the
/// stored version still matches the version the caller read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<cart::Model>, ServiceError>;

    /// Inserts an empty cart for `email`. Fails with `Conflict` when one
    /// already exists.
    async fn create(&self, email: &str) -> Result<cart::Model, ServiceError>;

    /// Replaces the stored document and returns it with its new version.
    async fn save(&self, cart: &cart::Model) -> Result<cart::Model, ServiceError>;

    /// Debits `total` from the user's wallet and empties the cart in one
    /// transaction.
    async fn commit_checkout(
        &self,
        cart: &cart::Model,
        user: &user::Model,
        total: Decimal,
    ) -> Result<(cart::Model, user::Model), ServiceError>;
}
