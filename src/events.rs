// Change notification for persisted configuration sections
//
// Two delivery paths:
// - ChangeNotifier: synchronous listener list, invoked on the writer's task in
//   registration order while the write lock is held
// - EventBus: tokio broadcast channel for async consumers, fed from a notifier
//   listener
//
// A slow listener delays the writer and every writer queued on the lock.

use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Maximum capacity for the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Raised after every successful section write
///
/// Carries only the section name, never the new value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationUpdated {
    pub section_name: String,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl ConfigurationUpdated {
    pub fn new(section_name: impl Into<String>) -> Self {
        Self {
            section_name: section_name.into(),
            timestamp: chrono::Local::now(),
        }
    }
}

/// Handle returned by `ChangeNotifier::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&ConfigurationUpdated) + Send + Sync>;

struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

/// Ordered list of synchronous change listeners
pub struct ChangeNotifier {
    listeners: RwLock<Listeners>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Register a listener; it is called after listeners registered earlier
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ConfigurationUpdated) + Send + Sync + 'static,
    {
        let mut guard = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = SubscriptionId(guard.next_id);
        guard.next_id += 1;
        guard.entries.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener, returning whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut guard = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = guard.entries.len();
        guard.entries.retain(|(entry_id, _)| *entry_id != id);
        guard.entries.len() != before
    }

    /// Invoke every listener in registration order
    ///
    /// Iterates over a snapshot, so a listener may subscribe or unsubscribe
    /// without deadlocking; such changes apply from the next notification.
    pub fn notify(&self, event: &ConfigurationUpdated) {
        let snapshot: Vec<Listener> = {
            let guard = self
                .listeners
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.entries.iter().map(|(_, l)| l.clone()).collect()
        };

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .map(|guard| guard.entries.len())
            .unwrap_or(0)
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Event bus for publishing configuration changes to async subscribers
pub struct EventBus {
    tx: broadcast::Sender<ConfigurationUpdated>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    /// Create a new event bus with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to events - returns a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigurationUpdated> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: ConfigurationUpdated) -> Result<usize, EventError> {
        self.tx.send(event).map_err(|_| EventError::NoReceivers)
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during event operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    NoReceivers,
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::NoReceivers => write!(f, "No active event receivers"),
        }
    }
}

impl std::error::Error for EventError {}
