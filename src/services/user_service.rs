use crate::{
    entities::user::{Model as UserModel, DEFAULT_ADDRESS},
    errors::ServiceError,
    events::{Event, EventSender},
    repositories::{UserLookup, UserRepository},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Minimum length of a delivery address
pub const MIN_ADDRESS_LEN: usize = 20;

/// Input for registering a shopper
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserInput {
    #[validate(length(min = 2, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// Service for shopper accounts
#[derive(Clone)]
pub struct UserService {
    users: Arc<UserRepository>,
    event_sender: Arc<EventSender>,
}

impl UserService {
    pub fn new(users: Arc<UserRepository>, event_sender: Arc<EventSender>) -> Self {
        Self {
            users,
            event_sender,
        }
    }

    /// Registers a user with the default wallet balance and the placeholder
    /// address.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - malformed name or email
    /// * `Conflict` - the email is already registered
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<UserModel, ServiceError> {
        input.validate()?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ServiceError::Conflict("Email already taken".to_string()));
        }

        let user = self.users.create(&input.name, &input.email).await?;

        self.event_sender
            .send_or_log(Event::UserCreated {
                user_id: user.id,
                email: user.email.clone(),
            })
            .await;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<UserModel, ServiceError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Replaces the placeholder (or previous) delivery address.
    #[instrument(skip(self, address))]
    pub async fn set_address(&self, email: &str, address: &str) -> Result<UserModel, ServiceError> {
        let address = address.trim();
        if address == DEFAULT_ADDRESS {
            return Err(ServiceError::ValidationError(
                "Address cannot be the default placeholder".to_string(),
            ));
        }
        if address.chars().count() < MIN_ADDRESS_LEN {
            return Err(ServiceError::ValidationError(format!(
                "Address must be at least {} characters",
                MIN_ADDRESS_LEN
            )));
        }

        let user = self
            .users
            .update_address(email, address)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        info!(user_id = %user.id, "Address updated");
        Ok(user)
    }
}
