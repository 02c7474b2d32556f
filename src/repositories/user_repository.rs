use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::user::{self, Column, Entity as User, Model as UserModel};
use crate::errors::ServiceError;
use crate::repositories::{BaseRepository, Repository, UserLookup};

/// Repository for user accounts
#[derive(Debug, Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a user with the default wallet and address
    pub async fn create(&self, name: &str, email: &str) -> Result<UserModel, ServiceError> {
        let active = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            ..Default::default()
        };

        active.insert(self.base.get_db()).await.map_err(map_unique_email)
    }

    /// Overwrite the delivery address; `None` when no such user
    pub async fn update_address(
        &self,
        email: &str,
        address: &str,
    ) -> Result<Option<UserModel>, ServiceError> {
        let Some(existing) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.address = Set(address.to_string());
        let updated = active.update(self.base.get_db()).await?;
        Ok(Some(updated))
    }
}

#[async_trait]
impl UserLookup for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, ServiceError> {
        User::find()
            .filter(Column::Email.eq(email))
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}

fn map_unique_email(err: DbErr) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::Conflict("Email already taken".to_string())
        }
        _ => ServiceError::DatabaseError(err),
    }
}
