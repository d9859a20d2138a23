//! View factory
//!
//! Constructs or adopts a DOM element, wires the listener map through the
//! dispatcher, and registers the view for removal-driven cleanup.

use std::rc::Rc;

use rivet_dom::NodeId;

use crate::{ListenerMap, View, ViewConfig, ViewError, ViewRegistry};

/// Builder for a view
pub struct ViewBuilder {
    tag: String,
    existing: Option<NodeId>,
    element_id: Option<String>,
    parent: Option<NodeId>,
    keep_alive: bool,
    listeners: ListenerMap,
    on_removed: Option<Rc<dyn Fn(&View)>>,
}

impl ViewBuilder {
    /// A view over a freshly created element
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            existing: None,
            element_id: None,
            parent: None,
            keep_alive: false,
            listeners: ListenerMap::new(),
            on_removed: None,
        }
    }

    /// A view adopting an element that already exists in the document
    pub fn adopt(element: NodeId) -> Self {
        let mut builder = Self::new("");
        builder.existing = Some(element);
        builder
    }

    /// Id attribute to place on the root element
    pub fn element_id(mut self, id: &str) -> Self {
        self.element_id = Some(id.to_string());
        self
    }

    /// Parent to append a freshly created element under (document root by
    /// default); ignored when adopting
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Keep the view's props/bus alive when its root leaves the document
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Listener map to install at build time
    pub fn listeners(mut self, listeners: ListenerMap) -> Self {
        self.listeners = listeners;
        self
    }

    /// Hook invoked when the root (or an ancestor) is removed
    pub fn on_removed<F>(mut self, hook: F) -> Self
    where
        F: Fn(&View) + 'static,
    {
        self.on_removed = Some(Rc::new(hook));
        self
    }

    /// Create the element (or verify the adopted one), register the view,
    /// and install its listeners
    pub fn build(self, registry: &ViewRegistry) -> Result<View, ViewError> {
        let doc = registry.document();

        let root = match self.existing {
            Some(element) => {
                if doc.borrow().tree().element(element).is_none() {
                    return Err(ViewError::UnknownElement(element));
                }
                element
            }
            None => {
                let mut doc = doc.borrow_mut();
                let parent = self.parent.unwrap_or_else(|| doc.root());
                doc.create_element_in(parent, &self.tag)
            }
        };
        if let Some(id) = &self.element_id {
            doc.borrow_mut().tree_mut().set_attr(root, "id", id);
        }

        let tag = doc
            .borrow()
            .tree()
            .element(root)
            .map(|e| e.tag.clone())
            .unwrap_or_default();
        let config = ViewConfig {
            tag,
            element_id: self.element_id,
            keep_alive: self.keep_alive,
            on_removed: self.on_removed,
        };
        let view = View::new(registry.allocate_id(), root, doc, config);
        registry.register(view.clone());

        if let Err(err) = registry.attach(&view, &self.listeners) {
            registry.destroy(&view);
            return Err(err);
        }
        Ok(view)
    }
}
