//! Seed data script - populates the database with a demo catalog and shopper
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - 10 products across a handful of categories
//! - 1 demo user with a delivery address and the default wallet

use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use qkart_api::{
    db::{establish_connection_with_config, run_migrations, DbConfig},
    errors::ServiceError,
    events::{process_events, EventSender},
    repositories::{ProductRepository, UserRepository},
    services::{CreateProductInput, CreateUserInput, ProductService, UserService},
};

const DEMO_EMAIL: &str = "crio-user@example.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== QKart Seed Data ===");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://qkart.db?mode=rwc".to_string());

    info!("Connecting to database: {}", database_url);
    let db = establish_connection_with_config(&DbConfig {
        url: database_url,
        max_connections: 5,
        ..Default::default()
    })
    .await?;
    run_migrations(&db).await?;
    let db = Arc::new(db);

    let (event_tx, event_rx) = mpsc::channel(64);
    let events = tokio::spawn(process_events(event_rx));
    let event_sender = Arc::new(EventSender::new(event_tx));

    let products = ProductService::new(Arc::new(ProductRepository::new(db.clone())));
    let users = UserService::new(Arc::new(UserRepository::new(db)), event_sender);

    if products.list_products().await?.is_empty() {
        let created = create_products(&products).await?;
        info!("  Created {} products", created);
    } else {
        info!("  Catalog already populated; skipping products");
    }

    match users
        .create_user(CreateUserInput {
            name: "crio-user".to_string(),
            email: DEMO_EMAIL.to_string(),
        })
        .await
    {
        Ok(user) => info!("  Created user {} with wallet {}", user.email, user.wallet_money),
        Err(ServiceError::Conflict(_)) => info!("  Demo user already exists"),
        Err(e) => return Err(e.into()),
    }
    users
        .set_address(DEMO_EMAIL, "Flat 4, 221B Baker Street, London NW1 6XE")
        .await?;

    // Dropping the services closes the event channel
    drop(users);
    events.await?;

    info!("=== Seed Data Complete ===");
    info!("Try these API calls:");
    info!("  curl http://localhost:8082/api/v1/products");
    info!("  curl http://localhost:8082/api/v1/users/{}/cart", DEMO_EMAIL);
    info!("Or explore interactively at: http://localhost:8082/swagger-ui");

    Ok(())
}

async fn create_products(products: &ProductService) -> anyhow::Result<usize> {
    let catalog = vec![
        ("UNIFACTOR Mens Running Shoes", "Fashion", dec!(50), 5),
        ("YONEX Smash Badminton Racquet", "Sports", dec!(100), 5),
        ("Tan Leatherette Weekender Duffle", "Fashion", dec!(150), 4),
        ("The Minimalist Slim Leather Watch", "Electronics", dec!(60), 5),
        ("Atomberg 1200mm BLDC Fan", "Home & Kitchen", dec!(80), 5),
        ("Bonsai Spirit Tree Table Lamp", "Home & Kitchen", dec!(250), 3),
        ("Stylish Sporty Sunglasses", "Fashion", dec!(35), 4),
        ("Roadster Mens Slim Fit Jeans", "Fashion", dec!(25), 3),
        ("boAt Rockerz Bluetooth Headphones", "Electronics", dec!(30), 4),
        ("Nivia Dominator Football", "Sports", dec!(20), 4),
    ];

    let mut created = 0;
    for (name, category, cost, rating) in catalog {
        let slug = name.to_lowercase().replace(' ', "-");
        products
            .create_product(CreateProductInput {
                name: name.to_string(),
                category: category.to_string(),
                cost,
                rating,
                image: format!("https://images.example.com/qkart/{}.png", slug),
            })
            .await?;
        created += 1;
    }

    Ok(created)
}
