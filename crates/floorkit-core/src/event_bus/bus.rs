//! Event Bus implementation.
//!
//! One bus per editor session, shared through `Arc`. Synchronous handlers
//! run on the publishing thread; async consumers poll a broadcast receiver.

use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use super::events::{EditorEvent, EventCategory};

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Which events a handler wants
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    /// Any of the listed categories
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &EditorEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type Handler = Box<dyn Fn(EditorEvent) + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Handler,
}

#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Events buffered per broadcast receiver
    pub channel_capacity: usize,
    /// Keep the most recent events for [`EventBus::history`]
    pub enable_history: bool,
    /// Events kept when history is enabled
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            enable_history: false,
            max_history_size: 200,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    #[error("No active subscribers")]
    NoSubscribers,
}

/// Publish/subscribe hub between the editor core and its host
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
    history: Mutex<VecDeque<EditorEvent>>,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            history: Mutex::new(VecDeque::new()),
            config,
        }
    }

    /// Deliver `event` to matching handlers and broadcast receivers.
    ///
    /// Returns the number of broadcast receivers reached. Fails only when
    /// nobody at all is listening; history is recorded either way.
    pub fn publish(&self, event: EditorEvent) -> Result<usize, EventBusError> {
        tracing::debug!("event: {}", event.description());

        if self.config.enable_history {
            let mut history = self.history.lock();
            history.push_back(event.clone());
            while history.len() > self.config.max_history_size {
                history.pop_front();
            }
        }

        let subscribers = self.subscribers.read();
        subscribers
            .iter()
            .filter(|s| s.filter.matches(&event))
            .for_each(|s| (s.handler)(event.clone()));

        match self.sender.send(event) {
            Ok(receivers) => Ok(receivers),
            Err(_) if subscribers.is_empty() => Err(EventBusError::NoSubscribers),
            Err(_) => Ok(0),
        }
    }

    /// Register a synchronous handler; keep it short, it runs inline
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(EditorEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push(Subscriber {
            id,
            filter,
            handler: Box::new(handler),
        });
        tracing::debug!("{} subscribed", id);
        id
    }

    /// Receiver for async consumers
    pub fn receiver(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }

    /// Returns false when `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Recent events, oldest first; empty unless history is enabled
    pub fn history(&self) -> Vec<EditorEvent> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::events::{LayoutEvent, Notification};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn saved(id: &str) -> EditorEvent {
        EditorEvent::Layout(LayoutEvent::Saved {
            layout_id: id.to_string(),
        })
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let bus = EventBus::new();

        let first = bus.subscribe(EventFilter::All, |_| {});
        let second = bus.subscribe(EventFilter::All, |_| {});
        assert_ne!(first, second);
        assert_eq!(bus.subscriber_count(), 2);

        assert!(bus.unsubscribe(first));
        assert_eq!(bus.subscriber_count(), 1);
        assert!(!bus.unsubscribe(first));
    }

    #[test]
    fn test_publish_without_listeners() {
        let bus = EventBus::new();
        assert!(matches!(
            bus.publish(saved("l1")),
            Err(EventBusError::NoSubscribers)
        ));
    }

    #[test]
    fn test_toasts_and_layout_events_filtered() {
        let bus = EventBus::new();
        let toasts = Arc::new(AtomicUsize::new(0));
        let layouts = Arc::new(AtomicUsize::new(0));

        let t = toasts.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Notification]),
            move |_| {
                t.fetch_add(1, Ordering::SeqCst);
            },
        );
        let l = layouts.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Layout]),
            move |_| {
                l.fetch_add(1, Ordering::SeqCst);
            },
        );

        bus.publish(saved("l1")).ok();
        bus.publish(EditorEvent::Notification(Notification::error("boom")))
            .ok();
        bus.publish(saved("l2")).ok();

        assert_eq!(toasts.load(Ordering::SeqCst), 1);
        assert_eq!(layouts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_history_keeps_latest() {
        let bus = EventBus::with_config(EventBusConfig {
            enable_history: true,
            max_history_size: 3,
            ..Default::default()
        });

        for i in 0..6 {
            bus.publish(saved(&format!("l{}", i))).ok();
        }
        let history = bus.history();
        assert_eq!(history.len(), 3);
        assert!(matches!(
            &history[0],
            EditorEvent::Layout(LayoutEvent::Saved { layout_id }) if layout_id == "l3"
        ));

        bus.clear_history();
        assert!(bus.history().is_empty());
    }

    #[test]
    fn test_history_disabled_by_default() {
        let bus = EventBus::new();
        bus.publish(saved("l1")).ok();
        assert!(bus.history().is_empty());
    }

    #[tokio::test]
    async fn test_async_receiver() {
        let bus = EventBus::new();
        let mut receiver = bus.receiver();

        assert_eq!(bus.publish(saved("l1")).ok(), Some(1));

        match receiver.recv().await {
            Ok(EditorEvent::Layout(LayoutEvent::Saved { layout_id })) => {
                assert_eq!(layout_id, "l1")
            }
            other => panic!("Wrong event received: {:?}", other),
        }
    }
}
