//! View registry and delegated event dispatch
//!
//! The registry is an owned side table keyed by `ViewId`: views, and one
//! installed listener per (view, event type) pair regardless of how many
//! selectors are declared for that type. Dispatch emulates native bubbling
//! over the declared selector set.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::rc::Rc;

use rivet_dom::{Document, NodeId};
use rivet_selectors::Selector;

use crate::{Event, LocalBoxFuture, View, ViewError, ViewId};

/// An async event handler invoked with `(view, event)`
pub type Handler = Rc<dyn Fn(View, Event) -> LocalBoxFuture<anyhow::Result<()>>>;

/// Wrap an async closure into a [`Handler`]
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(View, Event) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<()>> + 'static,
{
    Rc::new(move |view, event| Box::pin(f(view, event)))
}

/// Declared listeners: event type -> ordered (selector, handler) pairs
///
/// The empty selector denotes the view root itself (no delegation). Built
/// once; replacing it requires re-attachment.
#[derive(Clone, Default)]
pub struct ListenerMap {
    entries: Vec<(String, Vec<(String, Handler)>)>,
}

impl ListenerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a handler for `selector` under `event_type`, preserving
    /// declaration order
    pub fn on(mut self, event_type: &str, selector: &str, handler: Handler) -> Self {
        match self
            .entries
            .iter_mut()
            .find(|(t, _)| t == event_type)
        {
            Some((_, handlers)) => handlers.push((selector.to_string(), handler)),
            None => self
                .entries
                .push((event_type.to_string(), vec![(selector.to_string(), handler)])),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &[(String, Handler)])> {
        self.entries
            .iter()
            .map(|(t, handlers)| (t.as_str(), handlers.as_slice()))
    }
}

/// Compiled form of one event type's listeners; `None` selector = root
#[derive(Clone)]
struct InstalledListener {
    handlers: Vec<(Option<Selector>, Handler)>,
}

/// Owned side table of views and their installed listeners
pub struct ViewRegistry {
    doc: Rc<RefCell<Document>>,
    views: RefCell<HashMap<ViewId, View>>,
    listeners: RefCell<HashMap<ViewId, HashMap<String, InstalledListener>>>,
    next_id: Cell<u64>,
}

impl ViewRegistry {
    /// Create a registry over a document
    pub fn new(doc: Rc<RefCell<Document>>) -> Rc<Self> {
        Rc::new(Self {
            doc,
            views: RefCell::new(HashMap::new()),
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        })
    }

    /// The document this registry routes events for
    pub fn document(&self) -> Rc<RefCell<Document>> {
        self.doc.clone()
    }

    pub(crate) fn allocate_id(&self) -> ViewId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        ViewId(id)
    }

    pub(crate) fn register(&self, view: View) {
        self.views.borrow_mut().insert(view.id(), view);
    }

    /// Look up a registered view
    pub fn get(&self, id: ViewId) -> Option<View> {
        self.views.borrow().get(&id).cloned()
    }

    /// Number of live views
    pub fn len(&self) -> usize {
        self.views.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.borrow().is_empty()
    }

    /// Install the view's listeners: one entry per event type, selectors
    /// compiled up front. Replaces any previous installation for the view.
    pub fn attach(&self, view: &View, map: &ListenerMap) -> Result<(), ViewError> {
        let mut installed = HashMap::new();
        for (event_type, handlers) in map.iter() {
            let mut compiled = Vec::with_capacity(handlers.len());
            for (selector, handler) in handlers {
                let sel = if selector.is_empty() {
                    None
                } else {
                    Some(
                        Selector::parse(selector).map_err(|source| ViewError::Selector {
                            selector: selector.clone(),
                            source,
                        })?,
                    )
                };
                compiled.push((sel, handler.clone()));
            }
            tracing::debug!(
                view = view.id().0,
                event_type,
                selectors = compiled.len(),
                "installing listener"
            );
            installed.insert(event_type.to_string(), InstalledListener { handlers: compiled });
        }
        self.listeners.borrow_mut().insert(view.id(), installed);
        Ok(())
    }

    /// Remove all installed listeners for a view; a no-op when nothing was
    /// attached
    pub fn detach(&self, view: &View) {
        if self.listeners.borrow_mut().remove(&view.id()).is_some() {
            tracing::debug!(view = view.id().0, "detached listeners");
        }
    }

    /// Route a platform event to every registered view whose root contains
    /// the target, innermost view first, honoring stop flags across views
    pub async fn fire(&self, target: NodeId, event_type: &str) -> anyhow::Result<Event> {
        let event = Event::new(event_type, target);
        let mut containing: Vec<(usize, View)> = {
            let doc = self.doc.borrow();
            let tree = doc.tree();
            self.views
                .borrow()
                .values()
                .filter(|view| tree.contains(view.root(), target))
                .map(|view| (tree.depth(view.root()), view.clone()))
                .collect()
        };
        containing.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, view) in containing {
            if event.propagation_stopped() {
                break;
            }
            self.dispatch(&view, &event).await?;
        }
        Ok(event)
    }

    /// Run one dispatch pass over a single view's installed listener for the
    /// event's type
    ///
    /// Delegated handlers fire innermost-to-outermost, at most one per
    /// matched element; the root handler fires last unless propagation was
    /// stopped. Handlers are awaited strictly in sequence; a handler error
    /// aborts the remainder of the pass and propagates to the caller.
    pub async fn dispatch(&self, view: &View, event: &Event) -> anyhow::Result<()> {
        let Some(listener) = self
            .listeners
            .borrow()
            .get(&view.id())
            .and_then(|by_type| by_type.get(event.event_type()))
            .cloned()
        else {
            return Ok(());
        };
        let handlers = listener.handlers;
        let root = view.root();

        let mut pending: Vec<usize> = handlers
            .iter()
            .enumerate()
            .filter(|(_, (sel, _))| sel.is_some())
            .map(|(i, _)| i)
            .collect();
        let root_handler = handlers.iter().position(|(sel, _)| sel.is_none());
        let mut processed_nodes: HashSet<NodeId> = HashSet::new();

        while !pending.is_empty() && !event.propagation_stopped() {
            // Innermost unprocessed ancestor-or-self of the target, bounded
            // by the view root, matching any pending selector. Declaration
            // order breaks ties when one element matches several selectors.
            let matched = {
                let doc = view.document().borrow();
                let tree = doc.tree();
                let mut chain = vec![event.target()];
                chain.extend(tree.ancestors(event.target()));
                let bounded = match chain.iter().position(|&n| n == root) {
                    Some(pos) => &chain[..=pos],
                    None => &[][..],
                };
                let mut found = None;
                'chain: for &node in bounded {
                    if processed_nodes.contains(&node) {
                        continue;
                    }
                    for &i in &pending {
                        if let (Some(sel), _) = &handlers[i] {
                            if rivet_selectors::matches(tree, node, sel) {
                                found = Some((node, i));
                                break 'chain;
                            }
                        }
                    }
                }
                found
            };

            let Some((node, idx)) = matched else {
                break;
            };
            processed_nodes.insert(node);
            pending.retain(|&p| p != idx);

            if let (Some(sel), handler) = &handlers[idx] {
                tracing::debug!(
                    view = view.id().0,
                    selector = %sel.text,
                    event_type = event.event_type(),
                    "delegated handler"
                );
                handler(view.clone(), event.for_delegator(node)).await?;
            }
        }

        if !event.propagation_stopped() {
            if let Some(idx) = root_handler {
                let (_, handler) = &handlers[idx];
                tracing::debug!(
                    view = view.id().0,
                    event_type = event.event_type(),
                    "root handler"
                );
                handler(view.clone(), event.for_delegator(root)).await?;
            }
        }
        Ok(())
    }

    /// Destroy a view: detach listeners, stop the bus, clear state,
    /// unregister. Runs exactly once per view; later calls are no-ops.
    pub fn destroy(&self, view: &View) {
        {
            let mut state = view.state_mut();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.data.clear();
        }
        self.detach(view);
        view.bus().stop();
        self.views.borrow_mut().remove(&view.id());
        tracing::debug!(view = view.id().0, "destroyed view");
    }

    /// Remove an element from the document and clean up any views rooted in
    /// the detached subtree
    ///
    /// Goes through the tree directly, so document removal observers are not
    /// also notified for this removal.
    pub fn remove_element(&self, id: NodeId) {
        let detached = self.doc.borrow_mut().tree_mut().remove(id);
        self.handle_removed(&detached);
    }

    /// React to a removal notification: run removal hooks and destroy the
    /// affected views, innermost first, unless a view is kept alive
    ///
    /// Does not touch the document, so it is safe to call from a document
    /// removal observer while the document borrow is held. The detached set
    /// is in depth-first order; descending position in it is
    /// innermost-first.
    pub fn handle_removed(&self, detached: &[NodeId]) {
        let mut affected: Vec<(usize, View)> = {
            let views = self.views.borrow();
            detached
                .iter()
                .enumerate()
                .filter_map(|(pos, id)| {
                    views
                        .values()
                        .find(|view| view.root() == *id)
                        .map(|view| (pos, view.clone()))
                })
                .collect()
        };
        affected.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, view) in affected {
            if let Some(hook) = &view.config().on_removed {
                hook(&view);
            }
            if view.config().keep_alive {
                tracing::debug!(view = view.id().0, "removed but kept alive");
            } else {
                self.destroy(&view);
            }
        }
    }
}
