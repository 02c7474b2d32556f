pub mod cart;
pub mod product;
pub mod user;

pub use cart::{CartItem, CartItems, ProductSnapshot};
