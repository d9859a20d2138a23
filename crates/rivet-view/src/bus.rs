//! Per-view event bus
//!
//! Topic-keyed publish/subscribe with a lifetime equal to the view's
//! attachment to the document. After `stop`, publish and subscribe are
//! no-ops.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

type BusSubscriber = Rc<dyn Fn(&str)>;

#[derive(Default)]
struct BusInner {
    topics: RefCell<HashMap<String, Vec<BusSubscriber>>>,
    stopped: Cell<bool>,
}

/// Per-view topic bus
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a topic
    pub fn subscribe<F>(&self, topic: &str, subscriber: F)
    where
        F: Fn(&str) + 'static,
    {
        if self.inner.stopped.get() {
            return;
        }
        self.inner
            .topics
            .borrow_mut()
            .entry(topic.to_string())
            .or_default()
            .push(Rc::new(subscriber));
    }

    /// Publish a payload to every subscriber of a topic
    pub fn publish(&self, topic: &str, payload: &str) {
        if self.inner.stopped.get() {
            return;
        }
        // Snapshot so subscribers may subscribe/publish re-entrantly
        let subscribers: Vec<BusSubscriber> = self
            .inner
            .topics
            .borrow()
            .get(topic)
            .map(|subs| subs.to_vec())
            .unwrap_or_default();
        for subscriber in subscribers {
            subscriber(payload);
        }
    }

    /// Stop the bus and drop all subscriptions
    pub fn stop(&self) {
        self.inner.stopped.set(true);
        self.inner.topics.borrow_mut().clear();
    }

    /// Check whether the bus has been stopped
    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_subscribers() {
        let bus = EventBus::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = received.clone();
        bus.subscribe("saved", move |payload| {
            sink.borrow_mut().push(payload.to_string());
        });

        bus.publish("saved", "record-1");
        bus.publish("other", "ignored");
        assert_eq!(*received.borrow(), vec!["record-1".to_string()]);
    }

    #[test]
    fn test_stop_silences_bus() {
        let bus = EventBus::new();
        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        bus.subscribe("tick", move |_| sink.set(sink.get() + 1));

        bus.publish("tick", "");
        bus.stop();
        bus.publish("tick", "");
        bus.subscribe("tick", |_| panic!("subscribed after stop"));
        bus.publish("tick", "");

        assert_eq!(count.get(), 1);
        assert!(bus.is_stopped());
    }
}
