use serde::Serialize;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::error::ServiceError;
use crate::services::database::TimetableStore;

const CHANNEL_CAPACITY: usize = 64;

/// Which top-level aggregate a snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Schedule,
    Events,
}

struct TopicChannel {
    // Latest snapshot and the fan-out channel share one lock so that a
    // subscriber atomically gets "everything up to n" via the snapshot and
    // "everything after n" via the receiver.
    latest: Mutex<String>,
    tx: broadcast::Sender<String>,
}

impl TopicChannel {
    fn new(initial: String) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            latest: Mutex::new(initial),
            tx,
        }
    }
}

/// Publishes full aggregate snapshots to every subscribed viewer.
///
/// Snapshots are always complete aggregates, never deltas, so a viewer that
/// lags behind and skips intermediate values still converges on the current
/// state. Delivery is fire-and-forget: publishing with no viewers succeeds,
/// and a disconnected viewer simply stops receiving.
pub struct BroadcastGateway {
    schedule: TopicChannel,
    events: TopicChannel,
}

impl BroadcastGateway {
    pub fn new(schedule_snapshot: String, events_snapshot: String) -> Self {
        Self {
            schedule: TopicChannel::new(schedule_snapshot),
            events: TopicChannel::new(events_snapshot),
        }
    }

    /// Build a gateway seeded with the store's current aggregates, so the
    /// first subscriber on each topic gets real data rather than a
    /// placeholder.
    pub fn from_store(store: &TimetableStore) -> Result<Self, ServiceError> {
        let schedule = serde_json::to_string(&store.load_schedule()?)
            .map_err(|e| ServiceError::Persistence(format!("Failed to serialize schedule: {}", e)))?;
        let events = serde_json::to_string(&store.load_events()?)
            .map_err(|e| ServiceError::Persistence(format!("Failed to serialize events: {}", e)))?;
        Ok(Self::new(schedule, events))
    }

    fn channel(&self, topic: Topic) -> &TopicChannel {
        match topic {
            Topic::Schedule => &self.schedule,
            Topic::Events => &self.events,
        }
    }

    /// Serialize and publish a full snapshot of one aggregate.
    ///
    /// Best-effort: a serialization failure is logged and dropped (the state
    /// is already durable in the store), and the send result is ignored
    /// because an empty channel just means nobody is watching.
    pub fn publish<T: Serialize>(&self, topic: Topic, snapshot: &T) {
        let payload = match serde_json::to_string(snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize {:?} snapshot: {}", topic, e);
                return;
            }
        };

        let channel = self.channel(topic);
        match channel.latest.lock() {
            Ok(mut latest) => {
                *latest = payload.clone();
                let receivers = channel.tx.send(payload).unwrap_or(0);
                debug!("Published {:?} snapshot to {} viewer(s)", topic, receivers);
            }
            Err(e) => {
                error!("Failed to lock {:?} snapshot cache: {}", topic, e);
            }
        }
    }

    /// Subscribe a viewer to one topic.
    ///
    /// Returns the latest snapshot together with the receiver, taken under
    /// one lock, so the initial delivery plus the stream never shows the
    /// viewer an older state after a newer one.
    pub fn attach(&self, topic: Topic) -> (String, broadcast::Receiver<String>) {
        let channel = self.channel(topic);
        // Subscribe while the guard is live; releasing it first would open
        // a window where a publish is neither in the snapshot nor on the
        // receiver
        let latest = match channel.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let rx = channel.tx.subscribe();
        (latest.clone(), rx)
    }

    /// Number of currently attached viewers for a topic.
    pub fn viewer_count(&self, topic: Topic) -> usize {
        self.channel(topic).tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> BroadcastGateway {
        BroadcastGateway::new("[]".to_string(), "[]".to_string())
    }

    #[tokio::test]
    async fn test_attach_returns_seed_snapshot() {
        let gw = BroadcastGateway::new("[\"seed\"]".to_string(), "[]".to_string());
        let (initial, _rx) = gw.attach(Topic::Schedule);
        assert_eq!(initial, "[\"seed\"]");
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber_in_order() {
        let gw = gateway();
        let (_, mut rx) = gw.attach(Topic::Schedule);

        gw.publish(Topic::Schedule, &vec!["first"]);
        gw.publish(Topic::Schedule, &vec!["second"]);

        assert_eq!(rx.recv().await.unwrap(), "[\"first\"]");
        assert_eq!(rx.recv().await.unwrap(), "[\"second\"]");
    }

    #[tokio::test]
    async fn test_publish_without_viewers_is_ok() {
        let gw = gateway();
        // No receivers attached; must not panic or error
        gw.publish(Topic::Events, &vec!["nobody watching"]);
        assert_eq!(gw.viewer_count(Topic::Events), 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_latest_not_history() {
        let gw = gateway();
        gw.publish(Topic::Events, &vec!["old"]);
        gw.publish(Topic::Events, &vec!["new"]);

        let (initial, mut rx) = gw.attach(Topic::Events);
        assert_eq!(initial, "[\"new\"]");

        // Nothing published since attach, so the stream is empty
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn test_attach_never_misses_a_snapshot() {
        use std::sync::Arc;
        use std::thread;

        // A publisher counts up while viewers keep attaching. For every
        // attach, the first delivered snapshot must be the direct successor
        // of the initial one - a publish landing during attach may not fall
        // between the snapshot and the subscription
        let gw = Arc::new(BroadcastGateway::new("0".to_string(), "[]".to_string()));
        let publisher = {
            let gw = Arc::clone(&gw);
            thread::spawn(move || {
                for n in 1..=1000i64 {
                    gw.publish(Topic::Schedule, &n);
                }
            })
        };

        for _ in 0..200 {
            let (initial, mut rx) = gw.attach(Topic::Schedule);
            let seen: i64 = initial.parse().unwrap();
            if let Ok(payload) = rx.try_recv() {
                let next: i64 = payload.parse().unwrap();
                assert_eq!(next, seen + 1, "a publish was lost during attach");
            }
        }

        publisher.join().unwrap();
    }

    #[tokio::test]
    async fn test_topics_are_independent() {
        let gw = gateway();
        let (_, mut schedule_rx) = gw.attach(Topic::Schedule);
        let (_, mut events_rx) = gw.attach(Topic::Events);

        gw.publish(Topic::Schedule, &vec!["slots"]);

        assert_eq!(schedule_rx.recv().await.unwrap(), "[\"slots\"]");
        assert!(matches!(
            events_rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }
}
