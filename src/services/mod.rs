pub mod cart_service;
pub mod product_service;
pub mod user_service;

pub use cart_service::{CartService, CheckoutSummary};
pub use product_service::{CreateProductInput, ProductService};
pub use user_service::{CreateUserInput, UserService};
