// Demo mode: a scripted host session for trying the panel without a server
//
// Walks through every update shape the host can push: a full snapshot keyed
// by id, an upsert that appends, an upsert that replaces in place, a bare-id
// delete and finally a snapshot as a plain array. A few operator actions in
// between show search and sort reacting to new data.
//
// Run with: blipdesk --demo   (or BLIPDESK_DEMO=1)

use crate::blips::SortColumn;
use crate::bridge::Inbound;
use crate::events::NuiMessage;
use crate::panel::OperatorAction;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;

fn host(action: &str, data: Value) -> Inbound {
    Inbound::Host(NuiMessage::new(action, data))
}

fn blip(id: i64, name: &str, zone: &str, sprite: i64, color: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "zone": zone,
        "ftimer": 50000,
        "Sprite": sprite,
        "SpriteImg": format!("https://docs.fivem.net/blips/radar_{}.png", sprite),
        "scale": 0.8,
        "sColor": color,
        "scImg": "",
        "alpha": 255,
        "items": 0,
        "colors": 0,
        "groups": [],
        "hideb": false,
        "tickb": false,
        "bflash": false,
        "sRange": true,
        "outline": false,
        "hideUi": null
    })
}

/// The scripted session: (message, delay after it in ms)
pub fn demo_sequence() -> Vec<(Inbound, u64)> {
    let mut police = blip(3, "Mission Row PD", "Mission Row", 60, 29);
    police["groups"] = json!({"police": 0});

    vec![
        (host("setVisible", Value::Null), 400),
        (
            host(
                "updateBlipData",
                json!({
                    "1": blip(1, "Pillbox Hospital", "Pillbox Hill", 61, 1),
                    "2": blip(2, "Fleeca Bank", "Alta", 108, 2),
                    "3": police,
                }),
            ),
            800,
        ),
        // Upsert of a new id appends
        (
            host("updateBlipData", blip(4, "Bean Machine", "Vinewood", 536, 31)),
            800,
        ),
        // Upsert of a known id replaces in place
        (
            host("updateBlipData", blip(2, "Fleeca Bank (closed)", "Alta", 108, 40)),
            800,
        ),
        (
            Inbound::Operator(OperatorAction::Sort {
                column: SortColumn::Name,
            }),
            600,
        ),
        (
            Inbound::Operator(OperatorAction::Search {
                text: "bank".to_string(),
            }),
            1200,
        ),
        (
            Inbound::Operator(OperatorAction::Search {
                text: String::new(),
            }),
            1200,
        ),
        // Bare id deletes
        (host("updateBlipData", json!(1)), 800),
        // Full reload as an array
        (
            host(
                "updateBlipData",
                json!([
                    blip(2, "Fleeca Bank", "Alta", 108, 2),
                    blip(5, "LS Customs", "La Mesa", 72, 47),
                ]),
            ),
            800,
        ),
        (host("setVisible", json!(5)), 0),
    ]
}

/// Feed the scripted session into the panel's inbound channel, then idle
/// until shutdown so the runtime keeps serving operator input.
pub async fn run_demo(tx: mpsc::Sender<Inbound>, mut shutdown_rx: oneshot::Receiver<()>) {
    for (message, delay_ms) in demo_sequence() {
        if shutdown_rx.try_recv().is_ok() {
            return;
        }
        if tx.send(message).await.is_err() {
            tracing::debug!("Panel loop gone, stopping demo");
            return;
        }
        sleep(Duration::from_millis(delay_ms)).await;
    }

    tracing::info!("Demo script finished");
    let _ = shutdown_rx.await;
}
