//! Document - high-level document API

use crate::{DomTree, NodeId};

type RemovalObserver = Box<dyn Fn(&[NodeId])>;

/// A document: the DOM tree, convenience lookups, and the removal-observer
/// list other layers subscribe to
pub struct Document {
    tree: DomTree,
    removal_observers: Vec<RemovalObserver>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
            removal_observers: Vec::new(),
        }
    }

    /// Document root id
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Create an element attached to `parent`
    pub fn create_element_in(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.tree.create_element(tag);
        self.tree.append_child(parent, id);
        id
    }

    /// Get element by ID attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| {
                self.tree
                    .element(node)
                    .is_some_and(|e| e.id.as_deref() == Some(id))
            })
    }

    /// Register a removal observer, invoked with the full detached id set
    /// once per [`remove`](Self::remove) call
    ///
    /// Observers run while the document is borrowed; they must not re-enter
    /// the document.
    pub fn on_removed<F>(&mut self, observer: F)
    where
        F: Fn(&[NodeId]) + 'static,
    {
        self.removal_observers.push(Box::new(observer));
    }

    /// Remove a subtree, returning every detached id
    ///
    /// Each registered removal observer is notified exactly once with the
    /// detached set (the removed node first, then its descendants in
    /// depth-first order).
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        let detached = self.tree.remove(id);
        for observer in &self.removal_observers {
            observer(&detached);
        }
        detached
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::new();
        let root = doc.root();
        let form = doc.create_element_in(root, "form");
        let input = doc.create_element_in(form, "input");
        doc.tree_mut().set_attr(input, "id", "name");

        assert_eq!(doc.get_element_by_id("name"), Some(input));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_remove_reports_detached_ids() {
        let mut doc = Document::new();
        let root = doc.root();
        let wrap = doc.create_element_in(root, "div");
        let inner = doc.create_element_in(wrap, "span");

        let detached = doc.remove(wrap);
        assert!(detached.contains(&wrap));
        assert!(detached.contains(&inner));
    }

    #[test]
    fn test_remove_notifies_observers_once_with_full_set() {
        let mut doc = Document::new();
        let root = doc.root();
        let wrap = doc.create_element_in(root, "div");
        let inner = doc.create_element_in(wrap, "span");
        let other = doc.create_element_in(root, "p");

        let seen: Rc<RefCell<Vec<Vec<NodeId>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        doc.on_removed(move |detached| sink.borrow_mut().push(detached.to_vec()));

        doc.remove(wrap);
        assert_eq!(*seen.borrow(), vec![vec![wrap, inner]]);

        doc.remove(other);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1], vec![other]);
    }
}
