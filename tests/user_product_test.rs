mod common;

use assert_matches::assert_matches;
use common::TestApp;
use qkart_api::{
    entities::user::{DEFAULT_ADDRESS, DEFAULT_WALLET_MONEY},
    errors::ServiceError,
    services::{CreateProductInput, CreateUserInput},
};
use rstest::rstest;
use rust_decimal_macros::dec;
use uuid::Uuid;

const EMAIL: &str = "crio-user@example.com";

#[tokio::test]
async fn new_user_gets_default_wallet_and_placeholder_address() {
    let app = TestApp::new().await;
    let user = app.seed_user(EMAIL, None).await;

    assert_eq!(user.wallet_money, DEFAULT_WALLET_MONEY);
    assert_eq!(user.address, DEFAULT_ADDRESS);
    assert!(!user.has_non_default_address());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = TestApp::new().await;
    app.seed_user(EMAIL, None).await;

    let result = app
        .state
        .services
        .users
        .create_user(CreateUserInput {
            name: "someone-else".to_string(),
            email: EMAIL.to_string(),
        })
        .await;
    assert_matches!(result, Err(ServiceError::Conflict(msg)) if msg == "Email already taken");
}

#[rstest]
#[case::too_short("12 Short Lane")]
#[case::placeholder(DEFAULT_ADDRESS)]
#[case::padded_short("      tiny      ")]
#[tokio::test]
async fn invalid_addresses_are_rejected(#[case] address: &str) {
    let app = TestApp::new().await;
    app.seed_user(EMAIL, None).await;

    let result = app.state.services.users.set_address(EMAIL, address).await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
    assert_eq!(app.reload_user(EMAIL).await.address, DEFAULT_ADDRESS);
}

#[tokio::test]
async fn address_update_for_unknown_user_is_not_found() {
    let app = TestApp::new().await;

    let result = app
        .state
        .services
        .users
        .set_address("ghost@example.com", "Flat 4, 221B Baker Street, London")
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn product_search_matches_name_or_category_ignoring_case() {
    let app = TestApp::new().await;
    let products = app.state.services.products.clone();

    for (name, category) in [
        ("YONEX Smash Badminton Racquet", "Sports"),
        ("Tan Leatherette Weekender Duffle", "Fashion"),
        ("Stainless Steel Water Bottle", "Kitchen"),
    ] {
        products
            .create_product(CreateProductInput {
                name: name.to_string(),
                category: category.to_string(),
                cost: dec!(100),
                rating: 4,
                image: "https://images.example.com/p.png".to_string(),
            })
            .await
            .expect("create product");
    }

    let by_name = products.search_products("racquet").await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].category, "Sports");

    let by_category = products.search_products("FASHION").await.unwrap();
    assert_eq!(by_category.len(), 1);

    let everything = products.search_products("   ").await.unwrap();
    assert_eq!(everything.len(), 3);
    // Ordered by name
    assert_eq!(everything[0].name, "Stainless Steel Water Bottle");
}

#[tokio::test]
async fn product_lookup_and_validation() {
    let app = TestApp::new().await;
    let products = app.state.services.products.clone();

    let missing = products.get_product(Uuid::new_v4()).await;
    assert_matches!(missing, Err(ServiceError::NotFound(msg)) if msg == "Product not found");

    let negative = products
        .create_product(CreateProductInput {
            name: "Broken".to_string(),
            category: "Test".to_string(),
            cost: dec!(-1),
            rating: 1,
            image: "https://images.example.com/p.png".to_string(),
        })
        .await;
    assert_matches!(negative, Err(ServiceError::ValidationError(_)));

    let bad_rating = products
        .create_product(CreateProductInput {
            name: "Overrated".to_string(),
            category: "Test".to_string(),
            cost: dec!(10),
            rating: 9,
            image: "https://images.example.com/p.png".to_string(),
        })
        .await;
    assert_matches!(bad_rating, Err(ServiceError::ValidationError(_)));
}
