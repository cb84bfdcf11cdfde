use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Events emitted by the services after successful writes. Consumers run
/// out-of-band; a failed delivery never fails the originating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Supplier events
    SupplierCreated(i64),
    SupplierUpdated(i64),
    SupplierDeleted(i64),

    // Raw material events
    MaterialCreated(i64),
    MaterialUpdated(i64),
    MaterialDeleted(i64),
    MaterialPriceChanged {
        material_id: i64,
        old_price: Decimal,
        new_price: Decimal,
    },

    // Yield test events
    YieldTestRecorded {
        yield_test_id: i64,
        material_id: i64,
        yield_percentage: Decimal,
        applied_to_material: bool,
    },

    // Menu events
    MenuItemCreated(i64),
    MenuItemUpdated(i64),
    MenuItemDeleted(i64),
    MenuPriceSet {
        menu_item_id: i64,
        selling_price: Decimal,
    },

    // Recipe events
    RecipeLineAdded {
        menu_item_id: i64,
        material_id: i64,
    },
    RecipeLineUpdated {
        recipe_detail_id: i64,
        menu_item_id: i64,
    },
    RecipeLineRemoved {
        recipe_detail_id: i64,
        menu_item_id: i64,
    },

    // Settings and overhead events
    SettingsUpdated,
    OverheadConfigCreated(i64),

    // Costing events
    CostStandardCalculated {
        cost_standard_id: i64,
        menu_item_id: i64,
        total_cost: Decimal,
    },

    // Production events
    ProductionLogged {
        production_log_id: i64,
        menu_item_id: i64,
        portions_produced: i32,
    },
    ProductionLogDeleted(i64),

    // Variance events
    VarianceRecorded {
        variance_record_id: i64,
        production_log_id: i64,
        total_variance: Decimal,
        classification: String,
    },
}

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

    /// Sends an event, logging delivery failure instead of propagating it.
    /// Used after a write has already committed.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Event delivery failed: {}", e);
        }
    }
}

/// Builds the event channel plus its sender half.
pub fn event_channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

// Processes incoming events. Runs until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::MaterialPriceChanged {
                material_id,
                old_price,
                new_price,
            } => {
                info!(
                    "Material {} price changed: {} -> {}",
                    material_id, old_price, new_price
                );
                if old_price > Decimal::ZERO {
                    let change_pct = (new_price - old_price) / old_price * Decimal::from(100);
                    if change_pct.abs() >= Decimal::from(20) {
                        warn!(
                            "Material {} price moved {}%; dependent cost standards are stale until recalculated",
                            material_id,
                            change_pct.round_dp(1)
                        );
                    }
                }
            }
            Event::YieldTestRecorded {
                material_id,
                yield_percentage,
                applied_to_material,
                ..
            } => {
                info!(
                    "Yield test recorded for material {}: {}% (applied: {})",
                    material_id, yield_percentage, applied_to_material
                );
                if yield_percentage < Decimal::from(50) {
                    warn!(
                        "Material {} tested below 50% yield; review trimming or supplier quality",
                        material_id
                    );
                }
            }
            Event::CostStandardCalculated {
                cost_standard_id,
                menu_item_id,
                total_cost,
            } => {
                info!(
                    "Cost standard {} calculated for menu item {}: total {}",
                    cost_standard_id, menu_item_id, total_cost
                );
            }
            Event::VarianceRecorded {
                variance_record_id,
                production_log_id,
                total_variance,
                classification,
            } => {
                if classification == "unfavorable" {
                    warn!(
                        "Unfavorable variance {} on production log {}: overspend of {}",
                        variance_record_id, production_log_id, total_variance
                    );
                } else {
                    info!(
                        "Variance {} recorded for production log {}: {} ({})",
                        variance_record_id, production_log_id, total_variance, classification
                    );
                }
            }
            other => {
                info!("Event received: {:?}", other);
            }
        }
    }

    warn!("Event processing loop has ended");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (sender, mut rx) = event_channel(8);
        sender.send(Event::SupplierCreated(7)).await.unwrap();

        match rx.recv().await {
            Some(Event::SupplierCreated(id)) => assert_eq!(id, 7),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (sender, rx) = event_channel(1);
        drop(rx);

        // Must not panic or error out
        sender
            .send_or_log(Event::MaterialPriceChanged {
                material_id: 1,
                old_price: dec!(10),
                new_price: dec!(12),
            })
            .await;
    }
}
