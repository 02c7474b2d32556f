pub mod carts;
pub mod common;
pub mod health;
pub mod products;
pub mod users;

use crate::{
    db::DbPool,
    events::EventSender,
    repositories::{CartRepository, ProductRepository, UserRepository},
    services::{CartService, ProductService, UserService},
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub cart: Arc<CartService>,
    pub users: Arc<UserService>,
    pub products: Arc<ProductService>,
}

impl AppServices {
    /// Wires every service to the sea-orm repositories over `db_pool`.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let user_repository = Arc::new(UserRepository::new(db_pool.clone()));
        let product_repository = Arc::new(ProductRepository::new(db_pool.clone()));
        let cart_repository = Arc::new(CartRepository::new(db_pool));

        let cart = Arc::new(CartService::new(
            cart_repository,
            product_repository.clone(),
            event_sender.clone(),
        ));
        let users = Arc::new(UserService::new(user_repository, event_sender));
        let products = Arc::new(ProductService::new(product_repository));

        Self {
            cart,
            users,
            products,
        }
    }
}
