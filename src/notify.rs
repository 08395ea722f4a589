use dashmap::DashMap;
use tokio::sync::broadcast;
use ulid::Ulid;

use crate::model::ChangeEvent;

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for inventory-change notifications, one channel per room
/// type. Admin dashboards subscribe to re-render availability when stays
/// or counts change.
pub struct NotifyHub {
    channels: DashMap<Ulid, broadcast::Sender<ChangeEvent>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to notifications for a room type. Creates the channel if needed.
    pub fn subscribe(&self, room_id: Ulid) -> broadcast::Receiver<ChangeEvent> {
        let sender = self
            .channels
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send a notification. No-op if nobody is listening.
    pub fn send(&self, room_id: Ulid, event: &ChangeEvent) {
        if let Some(sender) = self.channels.get(&room_id) {
            let _ = sender.send(event.clone());
        }
    }

    /// Remove a channel (e.g. when a room type is removed).
    pub fn remove(&self, room_id: &Ulid) {
        self.channels.remove(room_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribe_and_receive() {
        let hub = NotifyHub::new();
        let room_id = Ulid::new();
        let mut rx = hub.subscribe(room_id);

        let event = ChangeEvent::TotalCountSet { id: room_id, total_count: 7 };
        hub.send(room_id, &event);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn send_without_subscribers_is_noop() {
        let hub = NotifyHub::new();
        let room_id = Ulid::new();
        // No subscriber — should not panic
        hub.send(room_id, &ChangeEvent::RoomTypeRemoved { id: room_id });
    }
}
