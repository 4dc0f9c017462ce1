// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Topic registry and dispatch.

use crate::error::{BusError, SubscriberError};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

type Callback<P> = Arc<dyn Fn(&P) -> Result<(), SubscriberError> + Send + Sync>;

/// One subscriber that failed during a publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriberFailure {
    /// Position of the subscriber in registration order
    pub index: usize,
    /// Error or panic message
    pub message: String,
    /// Whether the subscriber panicked rather than returning an error
    pub panicked: bool,
}

/// Outcome of a single publish.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Topic the payload was published on
    pub topic: String,
    /// Number of subscribers that handled the payload successfully
    pub delivered: usize,
    /// Subscribers that returned an error or panicked
    pub failures: Vec<SubscriberFailure>,
}

impl PublishReport {
    /// True when every subscriber handled the payload
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of subscribers that were invoked
    pub fn invoked(&self) -> usize {
        self.delivered + self.failures.len()
    }
}

struct BusInner<P> {
    topics: Mutex<HashMap<String, Vec<Callback<P>>>>,
    dispatching: Mutex<HashSet<String>>,
}

/// Synchronous topic registry.
///
/// Cloning yields another handle onto the same registry. Payloads are
/// delivered on the calling thread, in subscription order, with no
/// buffering and no replay for late subscribers.
pub struct EventBus<P> {
    inner: Arc<BusInner<P>>,
}

impl<P: 'static> EventBus<P> {
    /// Create an empty bus
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                topics: Mutex::new(HashMap::new()),
                dispatching: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Get a handle onto a named topic
    pub fn topic(&self, name: impl Into<String>) -> Topic<P> {
        Topic {
            bus: self.clone(),
            name: name.into(),
        }
    }

    /// Register a callback on a topic
    pub fn subscribe<F>(&self, topic: &str, callback: F)
    where
        F: Fn(&P) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        self.inner
            .topics
            .lock()
            .entry(topic.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Deliver a payload to every subscriber of a topic.
    ///
    /// A subscriber that errors or panics is recorded in the report and the
    /// remaining subscribers still run. Publishing on a topic from inside
    /// one of its own subscribers is rejected.
    pub fn publish(&self, topic: &str, payload: P) -> Result<PublishReport, BusError> {
        let _guard = DispatchGuard::enter(&self.inner.dispatching, topic)?;

        // Snapshot so subscribers can subscribe or publish elsewhere mid-dispatch
        let subscribers: Vec<Callback<P>> = self
            .inner
            .topics
            .lock()
            .get(topic)
            .cloned()
            .unwrap_or_default();

        let mut report = PublishReport {
            topic: topic.to_string(),
            ..PublishReport::default()
        };

        for (index, callback) in subscribers.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| callback(&payload))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => report.failures.push(SubscriberFailure {
                    index,
                    message: e.to_string(),
                    panicked: false,
                }),
                Err(panic) => report.failures.push(SubscriberFailure {
                    index,
                    message: panic_message(panic.as_ref()),
                    panicked: true,
                }),
            }
        }

        Ok(report)
    }

    /// Number of subscribers on a topic
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner.topics.lock().get(topic).map_or(0, Vec::len)
    }

    /// Names of all topics with at least one subscriber, sorted
    pub fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .topics
            .lock()
            .iter()
            .filter(|(_, subs)| !subs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Check whether a topic is currently being dispatched
    pub fn is_dispatching(&self, topic: &str) -> bool {
        self.inner.dispatching.lock().contains(topic)
    }

    /// Drop every subscriber on every topic
    pub fn clear(&self) {
        self.inner.topics.lock().clear();
    }

    /// Create a handle that does not keep the registry alive.
    ///
    /// Subscribers that need to publish back onto their own bus hold one of
    /// these so the registry does not own itself through its callbacks.
    pub fn downgrade(&self) -> WeakEventBus<P> {
        WeakEventBus {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<P: 'static> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> std::fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let topics = self.inner.topics.lock();
        f.debug_struct("EventBus")
            .field("topics", &topics.len())
            .finish_non_exhaustive()
    }
}

/// Non-owning handle onto a bus registry.
pub struct WeakEventBus<P> {
    inner: Weak<BusInner<P>>,
}

impl<P> WeakEventBus<P> {
    /// Recover a full handle if the registry is still alive
    pub fn upgrade(&self) -> Option<EventBus<P>> {
        self.inner.upgrade().map(|inner| EventBus { inner })
    }
}

impl<P> Clone for WeakEventBus<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

/// Handle onto one named topic of a bus.
pub struct Topic<P> {
    bus: EventBus<P>,
    name: String,
}

impl<P: 'static> Topic<P> {
    /// Topic name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a callback on this topic
    pub fn sub<F>(&self, callback: F) -> &Self
    where
        F: Fn(&P) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        self.bus.subscribe(&self.name, callback);
        self
    }

    /// Deliver a payload to every subscriber of this topic
    pub fn publish(&self, payload: P) -> Result<PublishReport, BusError> {
        self.bus.publish(&self.name, payload)
    }

    /// Number of subscribers on this topic
    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count(&self.name)
    }
}

impl<P> Clone for Topic<P> {
    fn clone(&self) -> Self {
        Self {
            bus: self.bus.clone(),
            name: self.name.clone(),
        }
    }
}

/// Marks a topic as dispatching for the lifetime of the guard.
struct DispatchGuard<'a> {
    dispatching: &'a Mutex<HashSet<String>>,
    topic: String,
}

impl<'a> DispatchGuard<'a> {
    fn enter(dispatching: &'a Mutex<HashSet<String>>, topic: &str) -> Result<Self, BusError> {
        if !dispatching.lock().insert(topic.to_string()) {
            return Err(BusError::Reentrant {
                topic: topic.to_string(),
            });
        }
        Ok(Self {
            dispatching,
            topic: topic.to_string(),
        })
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.dispatching.lock().remove(&self.topic);
    }
}

/// Extract a readable message from a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
