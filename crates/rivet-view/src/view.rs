//! Views
//!
//! A view is a DOM element plus an explicit configuration struct and a
//! separate mutable runtime-state struct, reached through a cloneable
//! `Rc`-backed handle. No state hangs off the DOM node itself.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use rivet_dom::{Document, NodeId};
use rivet_selectors::Selector;

use crate::EventBus;

/// View identifier, the key of the registry's side table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub(crate) u64);

/// Immutable per-view configuration
pub struct ViewConfig {
    /// Tag of the root element
    pub tag: String,
    /// Optional id attribute placed on the root element
    pub element_id: Option<String>,
    /// Suppress automatic destruction when the root leaves the document
    pub keep_alive: bool,
    /// Hook invoked when the root (or an ancestor) is removed
    pub on_removed: Option<Rc<dyn Fn(&View)>>,
}

/// Mutable per-view runtime state
#[derive(Debug, Default)]
pub struct ViewState {
    /// Free-form scratch data for control code
    pub data: HashMap<String, String>,
    pub(crate) destroyed: bool,
}

struct ViewInner {
    id: ViewId,
    root: NodeId,
    doc: Rc<RefCell<Document>>,
    config: ViewConfig,
    state: RefCell<ViewState>,
    bus: EventBus,
}

/// Cloneable handle to a view
#[derive(Clone)]
pub struct View {
    inner: Rc<ViewInner>,
}

impl View {
    pub(crate) fn new(
        id: ViewId,
        root: NodeId,
        doc: Rc<RefCell<Document>>,
        config: ViewConfig,
    ) -> Self {
        Self {
            inner: Rc::new(ViewInner {
                id,
                root,
                doc,
                config,
                state: RefCell::new(ViewState::default()),
                bus: EventBus::new(),
            }),
        }
    }

    /// View identifier
    pub fn id(&self) -> ViewId {
        self.inner.id
    }

    /// Root element of the view
    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    /// The document this view lives in
    pub fn document(&self) -> &Rc<RefCell<Document>> {
        &self.inner.doc
    }

    /// Immutable configuration
    pub fn config(&self) -> &ViewConfig {
        &self.inner.config
    }

    /// Borrow the runtime state
    pub fn state(&self) -> Ref<'_, ViewState> {
        self.inner.state.borrow()
    }

    /// Mutably borrow the runtime state
    pub fn state_mut(&self) -> RefMut<'_, ViewState> {
        self.inner.state.borrow_mut()
    }

    /// Per-view event bus
    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    /// Whether the view has been destroyed
    pub fn is_destroyed(&self) -> bool {
        self.inner.state.borrow().destroyed
    }

    /// First descendant of the view root matching `selector`
    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        let doc = self.inner.doc.borrow();
        rivet_selectors::query(doc.tree(), self.inner.root, selector)
    }

    /// All descendants of the view root matching `selector`
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        let doc = self.inner.doc.borrow();
        rivet_selectors::query_all(doc.tree(), self.inner.root, selector)
    }
}
