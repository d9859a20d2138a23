//! DOM lifecycle notifier
//!
//! Adapter between whatever mechanism detects element removal and the view
//! registry's cleanup path. The contract is only "invoke cleanup(view) when
//! notified"; how removal is detected is the notifier driver's business.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rivet_dom::{Document, NodeId};

use crate::ViewRegistry;

/// Process-wide removal observer feeding the registry
pub struct LifecycleNotifier {
    registry: Weak<ViewRegistry>,
}

impl LifecycleNotifier {
    /// Subscribe a notifier to a registry; removal notifications are fed in
    /// manually through [`element_removed`](Self::element_removed)
    pub fn new(registry: &Rc<ViewRegistry>) -> Self {
        Self {
            registry: Rc::downgrade(registry),
        }
    }

    /// Wire a document's removal observer to a registry
    ///
    /// `Document::remove` then drives view cleanup directly; the returned
    /// notifier can still be fed manually for removals the document does not
    /// see.
    pub fn install(document: &Rc<RefCell<Document>>, registry: &Rc<ViewRegistry>) -> Self {
        let observer = Rc::downgrade(registry);
        document.borrow_mut().on_removed(move |detached| {
            if let Some(registry) = observer.upgrade() {
                registry.handle_removed(detached);
            }
        });
        Self::new(registry)
    }

    /// Report a detached id set; views rooted inside it are cleaned up
    /// (recursively for descendant views), innermost first
    pub fn element_removed(&self, detached: &[NodeId]) {
        if let Some(registry) = self.registry.upgrade() {
            registry.handle_removed(detached);
        }
    }
}
