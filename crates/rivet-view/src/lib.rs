//! Rivet View
//!
//! Attaches imperative control logic to plain DOM elements: a view factory,
//! a per-view event bus, a delegated event-dispatch engine, and the
//! removal-driven cleanup path. No virtual DOM, no components - control code
//! is handed the live element and mutates it directly.

mod bus;
mod event;
mod factory;
mod lifecycle;
mod registry;
mod view;

pub use bus::EventBus;
pub use event::Event;
pub use factory::ViewBuilder;
pub use lifecycle::LifecycleNotifier;
pub use registry::{handler, Handler, ListenerMap, ViewRegistry};
pub use view::{View, ViewConfig, ViewId, ViewState};

pub use rivet_dom::{Document, DomTree, NodeId};

use std::future::Future;
use std::pin::Pin;

/// Boxed single-threaded future, the shape of all async handlers/callbacks
pub type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// View layer errors
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("invalid selector '{selector}'")]
    Selector {
        selector: String,
        #[source]
        source: rivet_selectors::SelectorError,
    },
    #[error("unknown element {0:?}")]
    UnknownElement(NodeId),
    #[error("view {0:?} is already destroyed")]
    Destroyed(ViewId),
}
