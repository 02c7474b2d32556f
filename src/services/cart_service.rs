use crate::{
    entities::{
        cart::Model as CartModel, product::Model as ProductModel, user::Model as UserModel,
        CartItem, ProductSnapshot,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    repositories::{CartStore, ProductLookup},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

const DUPLICATE_PRODUCT: &str =
    "Product already in cart. Use the cart sidebar to update or remove product from cart";
const UNKNOWN_PRODUCT: &str = "Product doesn't exist in database";
const PRODUCT_NOT_IN_CART: &str = "Product not in cart";
const TOTAL_OUT_OF_RANGE: &str = "Cart total exceeds the supported amount";

/// Shopping cart service: the cart lifecycle and the checkout state machine.
///
/// Every user has at most one cart, keyed by email and created lazily on the
/// first add. Line items embed a snapshot of the product taken at add time,
/// so later catalog changes never reprice an existing cart.
///
/// A cart moves between "has items" and "empty" through add, update, delete
/// and checkout. Checkout never closes a cart; it stays usable for the next
/// purchase.
///
/// # Examples
///
/// ```ignore
/// let cart_service = CartService::new(carts, products, event_sender);
///
/// let cart = cart_service.add_product_to_cart(&user, product_id, 2).await?;
/// let summary = cart_service.checkout(&user).await?;
/// assert!(summary.cart.cart_items.is_empty());
/// ```
#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn CartStore>,
    products: Arc<dyn ProductLookup>,
    event_sender: Arc<EventSender>,
}

/// Result of a successful checkout
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSummary {
    pub cart: CartModel,
    pub user: UserModel,
    pub total: Decimal,
}

impl CartService {
    /// Creates a new `CartService` instance.
    ///
    /// # Arguments
    ///
    /// * `carts` - Cart persistence
    /// * `products` - Catalog lookup used to snapshot products
    /// * `event_sender` - Event sender for publishing cart events
    pub fn new(
        carts: Arc<dyn CartStore>,
        products: Arc<dyn ProductLookup>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            carts,
            products,
            event_sender,
        }
    }

    /// Returns the user's cart.
    ///
    /// # Errors
    ///
    /// * `NotFound` - the user has never added anything to a cart
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn get_cart_by_user(&self, user: &UserModel) -> Result<CartModel, ServiceError> {
        self.carts
            .find_by_email(&user.email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User does not have a cart".to_string()))
    }

    /// Adds a new product line to the user's cart, creating the cart first
    /// when the user has none.
    ///
    /// The duplicate check runs before the catalog lookup, so re-adding a
    /// product reports the conflict even if that product has since been
    /// removed from the catalog.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - `quantity` is zero, or the product is unknown
    /// * `Conflict` - the product already has a line in the cart
    /// * `InternalError` - the cart could not be created
    /// * `ConcurrentModification` - another request saved the cart first
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn add_product_to_cart(
        &self,
        user: &UserModel,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<CartModel, ServiceError> {
        ensure_positive(quantity)?;

        let mut cart = match self.carts.find_by_email(&user.email).await? {
            Some(cart) => cart,
            None => self.create_cart(&user.email).await?,
        };

        if cart.cart_items.contains(product_id) {
            return Err(ServiceError::Conflict(DUPLICATE_PRODUCT.to_string()));
        }

        let product = self.require_product(product_id).await?;
        cart.cart_items.push(CartItem {
            product: ProductSnapshot::from(&product),
            quantity,
        });
        Self::cart_total(&cart)?;

        let saved = self.carts.save(&cart).await?;

        self.event_sender
            .send_or_log(Event::CartItemAdded {
                cart_id: saved.id,
                product_id,
                quantity,
            })
            .await;

        info!(cart_id = %saved.id, %product_id, quantity, "Added product to cart");
        Ok(saved)
    }

    /// Sets the quantity of a product already in the cart.
    ///
    /// The new quantity replaces the old one; calling this twice with the
    /// same value leaves the cart unchanged.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - zero quantity, no cart, unknown product, or the
    ///   product has no line in the cart (checked in that order)
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn update_product_in_cart(
        &self,
        user: &UserModel,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<CartModel, ServiceError> {
        ensure_positive(quantity)?;

        let mut cart = self.carts.find_by_email(&user.email).await?.ok_or_else(|| {
            ServiceError::ValidationError(
                "User does not have a cart. Use POST to create cart and add a product"
                    .to_string(),
            )
        })?;

        self.require_product(product_id).await?;

        let index = cart
            .cart_items
            .position(product_id)
            .ok_or_else(|| ServiceError::ValidationError(PRODUCT_NOT_IN_CART.to_string()))?;
        if let Some(item) = cart.cart_items.get_mut(index) {
            item.quantity = quantity;
        }
        Self::cart_total(&cart)?;

        let saved = self.carts.save(&cart).await?;

        self.event_sender
            .send_or_log(Event::CartItemUpdated {
                cart_id: saved.id,
                product_id,
                quantity,
            })
            .await;

        info!(cart_id = %saved.id, %product_id, quantity, "Updated cart item quantity");
        Ok(saved)
    }

    /// Removes the line holding `product_id`, leaving every other line as is.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn delete_product_from_cart(
        &self,
        user: &UserModel,
        product_id: Uuid,
    ) -> Result<(), ServiceError> {
        let mut cart = self
            .carts
            .find_by_email(&user.email)
            .await?
            .ok_or_else(|| ServiceError::ValidationError("User does not have a cart".to_string()))?;

        let index = cart
            .cart_items
            .position(product_id)
            .ok_or_else(|| ServiceError::ValidationError(PRODUCT_NOT_IN_CART.to_string()))?;
        cart.cart_items.remove(index);

        let saved = self.carts.save(&cart).await?;

        self.event_sender
            .send_or_log(Event::CartItemRemoved {
                cart_id: saved.id,
                product_id,
            })
            .await;

        info!(cart_id = %saved.id, %product_id, "Removed product from cart");
        Ok(())
    }

    /// Pays for the cart from the user's wallet and empties it.
    ///
    /// Preconditions are checked in a fixed order and the first failure wins:
    ///
    /// 1. the cart exists (`NotFound`)
    /// 2. the cart has at least one line (`ValidationError`)
    /// 3. the user has a non-default address (`ValidationError`)
    /// 4. the wallet covers the total (`ValidationError`)
    ///
    /// The wallet debit and the cart clear are committed together.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn checkout(&self, user: &UserModel) -> Result<CheckoutSummary, ServiceError> {
        let cart = self
            .carts
            .find_by_email(&user.email)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound("Cart is not present for the user".to_string())
            })?;

        if cart.cart_items.is_empty() {
            return Err(ServiceError::ValidationError(
                "User's cart does not have any products".to_string(),
            ));
        }

        if !user.has_non_default_address() {
            return Err(ServiceError::ValidationError(
                "User must specify a valid address".to_string(),
            ));
        }

        let total = Self::cart_total(&cart)?;
        if user.wallet_money < total {
            warn!(%total, balance = %user.wallet_money, "Checkout rejected: insufficient balance");
            return Err(ServiceError::ValidationError(
                "Wallet Balance is insufficient".to_string(),
            ));
        }

        let (cart, user) = self.carts.commit_checkout(&cart, user, total).await?;

        self.event_sender
            .send_or_log(Event::CheckoutCompleted {
                cart_id: cart.id,
                user_id: user.id,
                total,
                remaining_balance: user.wallet_money,
                completed_at: Utc::now(),
            })
            .await;

        info!(cart_id = %cart.id, %total, "Checkout completed");
        Ok(CheckoutSummary { cart, user, total })
    }

    /// Sum of `cost * quantity` over every line of `cart`.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - the total does not fit in a `Decimal`
    pub fn cart_total(cart: &CartModel) -> Result<Decimal, ServiceError> {
        cart.total()
            .ok_or_else(|| ServiceError::ValidationError(TOTAL_OUT_OF_RANGE.to_string()))
    }

    async fn create_cart(&self, email: &str) -> Result<CartModel, ServiceError> {
        match self.carts.create(email).await {
            Ok(cart) => {
                self.event_sender
                    .send_or_log(Event::CartCreated {
                        cart_id: cart.id,
                        email: email.to_string(),
                    })
                    .await;
                info!(cart_id = %cart.id, "Created cart");
                Ok(cart)
            }
            // Lost a race with a concurrent first add; use the winner's cart
            Err(ServiceError::Conflict(_)) => self
                .carts
                .find_by_email(email)
                .await?
                .ok_or_else(|| ServiceError::InternalError("User cart creation failed".to_string())),
            Err(e) => {
                error!(error = %e, "Cart creation failed");
                Err(ServiceError::InternalError(
                    "User cart creation failed".to_string(),
                ))
            }
        }
    }

    async fn require_product(&self, product_id: Uuid) -> Result<ProductModel, ServiceError> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| ServiceError::ValidationError(UNKNOWN_PRODUCT.to_string()))
    }
}

fn ensure_positive(quantity: u32) -> Result<(), ServiceError> {
    if quantity == 0 {
        return Err(ServiceError::ValidationError(
            "Quantity must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
