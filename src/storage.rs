//! Per-origin key-value storage with change notifications.
//!
//! Models the browser's `localStorage` plus its `storage` event: a write by
//! one execution context is announced to every *other* context subscribed
//! on the same storage. [`LocalStorage`] is the in-process implementation;
//! clones share the same underlying map, so handing a clone to each
//! [`CartStore`](crate::store::CartStore) behaves like several open tabs.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::trace;
use uuid::Uuid;

/// Identity of one execution context (a tab, a window, a worker).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(Uuid);

impl ContextId {
    pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for ContextId {
    fn default() -> Self { Self::new() }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Announcement that a key changed, delivered to other contexts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub origin: ContextId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

/// String key-value store. Writes are attributed to the writing context.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, origin: ContextId, key: &str, value: String);
    fn remove_item(&self, origin: ContextId, key: &str);
}

/// Subscription to changes made by other contexts.
pub trait ChangeNotifier {
    /// Registers `listener` for changes not originating from `context`.
    fn subscribe(&self, context: ContextId, listener: Listener) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

#[derive(Default)]
struct Inner {
    items: HashMap<String, String>,
    listeners: Vec<(SubscriptionId, ContextId, Listener)>,
    next_subscription: u64,
}

/// In-memory storage shared by every clone.
#[derive(Clone, Default)]
pub struct LocalStorage {
    inner: Arc<Mutex<Inner>>,
}

impl fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("LocalStorage")
            .field("keys", &inner.items.keys().collect::<Vec<_>>())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl LocalStorage {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.lock().items.len() }
    pub fn is_empty(&self) -> bool { self.lock().items.is_empty() }
    pub fn listener_count(&self) -> usize { self.lock().listeners.len() }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, origin: ContextId, key: &str, value: Option<String>) {
        let (event, listeners) = {
            let mut inner = self.lock();
            let old_value = match &value {
                Some(v) => inner.items.insert(key.to_string(), v.clone()),
                None => inner.items.remove(key),
            };
            if old_value == value {
                return;
            }
            let listeners: Vec<Listener> = inner
                .listeners
                .iter()
                .filter(|(_, context, _)| *context != origin)
                .map(|(_, _, listener)| Arc::clone(listener))
                .collect();
            (StorageEvent { key: key.to_string(), old_value, new_value: value, origin }, listeners)
        };
        trace!(key = %event.key, origin = %origin, receivers = listeners.len(), "storage changed");
        // Listeners run outside the lock so they may read the storage.
        for listener in listeners {
            listener(&event);
        }
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> { self.lock().items.get(key).cloned() }
    fn set_item(&self, origin: ContextId, key: &str, value: String) { self.write(origin, key, Some(value)); }
    fn remove_item(&self, origin: ContextId, key: &str) { self.write(origin, key, None); }
}

impl ChangeNotifier for LocalStorage {
    fn subscribe(&self, context: ContextId, listener: Listener) -> SubscriptionId {
        let mut inner = self.lock();
        inner.next_subscription += 1;
        let id = SubscriptionId(inner.next_subscription);
        inner.listeners.push((id, context, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().listeners.retain(|(sub, _, _)| *sub != id);
    }
}
