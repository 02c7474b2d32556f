use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is closed.
    /// Used after the state change has already been persisted.
    pub async fn send_or_log(&self, event: Event) {
        let name = event.name();
        if let Err(e) = self.send(event).await {
            warn!(event = name, error = %e, "dropping domain event");
        }
    }
}

/// Domain events emitted after successful writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    UserCreated {
        user_id: Uuid,
        email: String,
    },
    CartCreated {
        cart_id: Uuid,
        email: String,
    },
    CartItemAdded {
        cart_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    },
    CartItemUpdated {
        cart_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    },
    CartItemRemoved {
        cart_id: Uuid,
        product_id: Uuid,
    },
    CheckoutCompleted {
        cart_id: Uuid,
        user_id: Uuid,
        total: Decimal,
        remaining_balance: Decimal,
        completed_at: DateTime<Utc>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserCreated { .. } => "user_created",
            Event::CartCreated { .. } => "cart_created",
            Event::CartItemAdded { .. } => "cart_item_added",
            Event::CartItemUpdated { .. } => "cart_item_updated",
            Event::CartItemRemoved { .. } => "cart_item_removed",
            Event::CheckoutCompleted { .. } => "checkout_completed",
        }
    }
}

/// Drains the event channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        metrics::counter!("qkart_events.processed", 1, "event" => event.name());

        match &event {
            Event::CheckoutCompleted {
                cart_id,
                user_id,
                total,
                remaining_balance,
                ..
            } => {
                info!(
                    %cart_id,
                    %user_id,
                    %total,
                    %remaining_balance,
                    "checkout completed"
                );
            }
            other => info!(event = other.name(), payload = ?other, "domain event"),
        }
    }

    info!("Event channel closed; event processing loop stopped");
}
