use std::sync::Arc;

use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
};

use super::bridge::Controller;
use super::contracts::TransportEvent;

const PUMP_STARTED: &str = "TRANSPORT_PUMP_STARTED";
const PUMP_STOPPED: &str = "TRANSPORT_PUMP_STOPPED";
const PUMP_CHANNEL_CLOSED: &str = "TRANSPORT_PUMP_CHANNEL_CLOSED";

/// Background task forwarding inbound transport events to the controller,
/// one at a time, preserving arrival order. Dropping the pump signals the
/// task to stop.
#[derive(Debug)]
pub struct TransportEventPump {
    stop_tx: Option<watch::Sender<bool>>,
}

impl TransportEventPump {
    pub fn start(
        runtime: &Handle,
        controller: Arc<Controller>,
        events: mpsc::Receiver<TransportEvent>,
    ) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        runtime.spawn(run_pump(controller, events, stop_rx));

        tracing::info!(code = PUMP_STARTED, "transport event pump started");

        Self {
            stop_tx: Some(stop_tx),
        }
    }
}

impl Drop for TransportEventPump {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

async fn run_pump(
    controller: Arc<Controller>,
    mut events: mpsc::Receiver<TransportEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    tracing::info!(code = PUMP_STOPPED, "transport event pump stopped");
                    return;
                }
            }
            event = events.recv() => {
                match event {
                    Some(event) => controller.handle_transport_event(event),
                    None => {
                        tracing::info!(
                            code = PUMP_CHANNEL_CLOSED,
                            "transport event channel closed; stopping pump"
                        );
                        return;
                    }
                }
            }
        }
    }
}
