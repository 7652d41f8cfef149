use tokio::sync::broadcast;
use super::events::AppEvent;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Fan-out of application events to any number of observers
///
/// Emitting with no subscriber is not an error; the event is dropped.
#[derive(Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<AppEvent>,
}

impl EventEmitter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: AppEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("[EventEmitter] No subscribers, event dropped");
        }
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let emitter = EventEmitter::new();
        let mut rx = emitter.subscribe();

        emitter.emit(AppEvent::MemoryChanged(4.0));
        emitter.emit(AppEvent::TimerCompleted);

        assert_eq!(rx.recv().await.unwrap(), AppEvent::MemoryChanged(4.0));
        assert_eq!(rx.recv().await.unwrap(), AppEvent::TimerCompleted);
    }

    #[test]
    fn test_emit_without_subscribers() {
        EventEmitter::new().emit(AppEvent::Error("Math Error".into()));
    }

    #[test]
    fn test_event_wire_shape() {
        let json = serde_json::to_value(AppEvent::HistoryUpdated(3)).unwrap();
        assert_eq!(json["event"], "history://updated");
        assert_eq!(json["payload"], 3);
    }
}
