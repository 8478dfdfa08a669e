//! Store-and-subscribe context values.
//!
//! A [`Context`] plays the role a provider/consumer pair plays in a UI
//! framework: it holds a current value, and descendants that subscribed to it
//! are notified synchronously whenever a new value is published. Contexts are
//! cheap to clone and safe to share across async task boundaries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::trace;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Subscribers<T> {
    entries: RwLock<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
}

/// A published value with synchronous change notification.
///
/// # Example
///
/// ```ignore
/// let ctx = Context::new(0u32);
/// let _sub = ctx.subscribe(|value| println!("now {value}"));
/// ctx.publish(1); // prints "now 1"
/// ```
pub struct Context<T> {
    value: Arc<RwLock<T>>,
    subscribers: Arc<Subscribers<T>>,
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T> Context<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a context holding the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
            subscribers: Arc::new(Subscribers {
                entries: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Replace the value and notify every subscriber.
    ///
    /// Notification runs after the value lock is released, so a subscriber
    /// may read the context re-entrantly.
    pub fn publish(&self, value: T) {
        if let Ok(mut guard) = self.value.write() {
            *guard = value;
        }
        self.notify();
    }

    /// Register a callback invoked on every publish.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped.
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.subscribers.next_id.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut entries) = self.subscribers.entries.write() {
            entries.push((id, Arc::new(f)));
        }

        let subscribers = Arc::downgrade(&self.subscribers);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(subscribers) = subscribers.upgrade() {
                    if let Ok(mut entries) = subscribers.entries.write() {
                        entries.retain(|(entry_id, _)| *entry_id != id);
                    }
                }
            })),
        }
    }

    fn notify(&self) {
        let callbacks: Vec<Callback<T>> = self
            .subscribers
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        if callbacks.is_empty() {
            return;
        }

        trace!("context publish: notifying {} subscriber(s)", callbacks.len());
        let value = self.get();
        for callback in callbacks {
            callback(&value);
        }
    }
}

/// Handle for an active context subscription.
///
/// Dropping it unregisters the callback.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
