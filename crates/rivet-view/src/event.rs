//! Dispatched events
//!
//! Propagation flags are shared across the clones handed to individual
//! handlers, so a `stop_propagation` inside any handler is visible to the
//! rest of the dispatch pass (and to enclosing views).

use std::cell::Cell;
use std::rc::Rc;

use rivet_dom::NodeId;

#[derive(Debug, Default)]
struct EventFlags {
    propagation_stopped: Cell<bool>,
    immediate_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

/// An event flowing through the dispatcher
#[derive(Debug, Clone)]
pub struct Event {
    event_type: Rc<str>,
    target: NodeId,
    delegator: Option<NodeId>,
    flags: Rc<EventFlags>,
}

impl Event {
    /// Create an event of `event_type` originating at `target`
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: Rc::from(event_type),
            target,
            delegator: None,
            flags: Rc::new(EventFlags::default()),
        }
    }

    /// Event type name
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The element the event originated at
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The element that matched the delegated selector for the currently
    /// running handler (the target itself before dispatch sets it)
    pub fn delegator_target(&self) -> NodeId {
        self.delegator.unwrap_or(self.target)
    }

    /// Clone for a handler invocation, sharing flags but carrying its own
    /// delegator target
    pub(crate) fn for_delegator(&self, delegator: NodeId) -> Event {
        let mut clone = self.clone();
        clone.delegator = Some(delegator);
        clone
    }

    /// Stop propagation: no further delegated or root handler fires for this
    /// dispatch, and enclosing views are skipped
    pub fn stop_propagation(&self) {
        self.flags.propagation_stopped.set(true);
    }

    /// Stop propagation immediately (same worklist-clearing effect; kept
    /// distinct for callers that care about the difference)
    pub fn stop_immediate_propagation(&self) {
        self.flags.immediate_stopped.set(true);
        self.flags.propagation_stopped.set(true);
    }

    /// Prevent default action
    pub fn prevent_default(&self) {
        self.flags.default_prevented.set(true);
    }

    /// Check if propagation was stopped
    pub fn propagation_stopped(&self) -> bool {
        self.flags.propagation_stopped.get() || self.flags.immediate_stopped.get()
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.flags.default_prevented.get()
    }
}
