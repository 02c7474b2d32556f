use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::product;

/// Payment option recorded on every new cart.
pub const DEFAULT_PAYMENT_OPTION: &str = "PAYMENT_OPTION_DEFAULT";

/// Shopping cart, one per user email.
///
/// Line items are embedded as a JSON document and always written back as a
/// whole. `version` increases on every successful save and guards against
/// lost updates when two requests edit the same cart.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(column_type = "Json")]
    pub cart_items: CartItems,
    pub payment_option: String,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A fresh, empty cart for `email`.
    pub fn empty(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            cart_items: CartItems::default(),
            payment_option: DEFAULT_PAYMENT_OPTION.to_string(),
            version: 1,
        }
    }

    /// Sum of `cost * quantity` over the line items; `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        self.cart_items.total()
    }
}

/// Copy of the product taken when it was added to the cart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductSnapshot {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub cost: Decimal,
    pub rating: i32,
    pub image: String,
}

impl From<&product::Model> for ProductSnapshot {
    fn from(product: &product::Model) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            cost: product.cost,
            rating: product.rating,
            image: product.image.clone(),
        }
    }
}

/// Single cart line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Option<Decimal> {
        self.product.cost.checked_mul(Decimal::from(self.quantity))
    }
}

/// Ordered line items of a cart. At most one line per product id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct CartItems(pub Vec<CartItem>);

impl CartItems {
    /// Index of the first line holding `product_id`.
    pub fn position(&self, product_id: Uuid) -> Option<usize> {
        self.0.iter().position(|item| item.product.id == product_id)
    }

    pub fn contains(&self, product_id: Uuid) -> bool {
        self.position(product_id).is_some()
    }

    pub fn push(&mut self, item: CartItem) {
        self.0.push(item);
    }

    pub fn remove(&mut self, index: usize) -> CartItem {
        self.0.remove(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CartItem> {
        self.0.get_mut(index)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn total(&self) -> Option<Decimal> {
        self.0.iter().try_fold(Decimal::ZERO, |acc, item| {
            item.line_total().and_then(|line| acc.checked_add(line))
        })
    }
}
