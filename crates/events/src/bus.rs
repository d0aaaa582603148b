//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the fan-out hub for [`DepositionEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use depo_core::event::DepositionEvent;
use depo_core::store::EventSink;
use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`DepositionEvent`].
pub struct EventBus {
    sender: broadcast::Sender<DepositionEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    /// The timeline table (written by the store) remains the durable
    /// record.
    pub fn publish(&self, event: DepositionEvent) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<DepositionEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventSink for EventBus {
    fn notify(&self, event: &DepositionEvent) {
        self.publish(event.clone());
    }
}

/// Spawn a background task that logs every event published on the bus.
///
/// Lagged receivers resubscribe implicitly; a dropped sender ends the
/// task.
pub fn spawn_event_logger(bus: &EventBus) -> tokio::task::JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    tracing::info!(
                        deposition_id = event.deposition_id,
                        kind = event.kind.as_str(),
                        actor_user_id = ?event.actor_user_id,
                        "deposition event"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event logger lagged behind the bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use depo_core::event::EventKind;

    fn sample_event(kind: EventKind) -> DepositionEvent {
        DepositionEvent {
            id: 1,
            deposition_id: 10,
            kind,
            actor_user_id: Some(7),
            detail: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(sample_event(EventKind::Scheduled));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind, EventKind::Scheduled);
        assert_eq!(received.deposition_id, 10);
        assert_eq!(received.actor_user_id, Some(7));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(sample_event(EventKind::OnRecord));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.kind, EventKind::OnRecord);
        assert_eq!(e2.kind, EventKind::OnRecord);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(sample_event(EventKind::Completed));
    }

    #[tokio::test]
    async fn sink_notify_reaches_subscribers() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = sample_event(EventKind::AdmissionGranted);
        EventSink::notify(&bus, &event);

        let received = rx.recv().await.expect("should receive via sink");
        assert_eq!(received.kind, EventKind::AdmissionGranted);
    }
}
