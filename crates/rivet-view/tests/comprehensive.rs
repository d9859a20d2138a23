//! Comprehensive tests for rivet-view
//!
//! Dispatch ordering, propagation control, lifecycle cleanup.

use std::cell::RefCell;
use std::rc::Rc;

use rivet_dom::{Document, NodeId};
use rivet_view::{handler, ListenerMap, ViewBuilder, ViewRegistry};

fn new_registry() -> Rc<ViewRegistry> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    ViewRegistry::new(Rc::new(RefCell::new(Document::new())))
}

type Log = Rc<RefCell<Vec<&'static str>>>;

fn logging_handler(log: &Log, label: &'static str) -> rivet_view::Handler {
    let log = log.clone();
    handler(move |_view, _event| {
        let log = log.clone();
        async move {
            log.borrow_mut().push(label);
            Ok(())
        }
    })
}

/// <div root><div class="a"><div class="b"><button/></div></div></div>
fn nested_fixture(registry: &ViewRegistry) -> (NodeId, NodeId, NodeId, NodeId) {
    let doc = registry.document();
    let mut doc = doc.borrow_mut();
    let root = doc.root();
    let view_root = doc.create_element_in(root, "div");
    let a = doc.create_element_in(view_root, "div");
    let b = doc.create_element_in(a, "div");
    let button = doc.create_element_in(b, "button");
    doc.tree_mut().set_attr(a, "class", "a");
    doc.tree_mut().set_attr(b, "class", "b");
    (view_root, a, b, button)
}

#[test]
fn test_inner_selector_fires_before_outer() {
    smol::block_on(async {
        let registry = new_registry();
        let (view_root, _, _, button) = nested_fixture(&registry);

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let listeners = ListenerMap::new()
            .on("click", ".a", logging_handler(&log, "outer"))
            .on("click", ".a .b", logging_handler(&log, "inner"));
        let _view = ViewBuilder::adopt(view_root)
            .listeners(listeners)
            .build(&registry)
            .unwrap();

        registry.fire(button, "click").await.unwrap();
        // `.a .b` matches the closer ancestor, so it fires first even though
        // `.a` was declared first.
        assert_eq!(*log.borrow(), vec!["inner", "outer"]);
    });
}

#[test]
fn test_root_handler_fires_last() {
    smol::block_on(async {
        let registry = new_registry();
        let (view_root, _, _, button) = nested_fixture(&registry);

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let listeners = ListenerMap::new()
            .on("click", "", logging_handler(&log, "root"))
            .on("click", ".b", logging_handler(&log, "delegated"));
        let view = ViewBuilder::adopt(view_root)
            .listeners(listeners)
            .build(&registry)
            .unwrap();

        let event = registry.fire(button, "click").await.unwrap();
        assert_eq!(*log.borrow(), vec!["delegated", "root"]);
        assert_eq!(event.target(), button);
        drop(view);
    });
}

#[test]
fn test_delegator_target_is_matched_element() {
    smol::block_on(async {
        let registry = new_registry();
        let (view_root, a, b, button) = nested_fixture(&registry);

        let seen: Rc<RefCell<Vec<NodeId>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let record = handler(move |_view, event| {
            let sink = sink.clone();
            async move {
                sink.borrow_mut().push(event.delegator_target());
                Ok(())
            }
        });

        let listeners = ListenerMap::new()
            .on("click", ".a", record.clone())
            .on("click", ".b", record.clone())
            .on("click", "", record);
        let _view = ViewBuilder::adopt(view_root)
            .listeners(listeners)
            .build(&registry)
            .unwrap();

        registry.fire(button, "click").await.unwrap();
        assert_eq!(*seen.borrow(), vec![b, a, view_root]);
    });
}

#[test]
fn test_stop_propagation_suppresses_rest_of_pass() {
    smol::block_on(async {
        let registry = new_registry();
        let (view_root, _, _, button) = nested_fixture(&registry);

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let stopping = {
            let log = log.clone();
            handler(move |_view, event| {
                let log = log.clone();
                event.stop_propagation();
                async move {
                    log.borrow_mut().push("inner");
                    Ok(())
                }
            })
        };
        let listeners = ListenerMap::new()
            .on("click", ".a", logging_handler(&log, "outer"))
            .on("click", ".a .b", stopping)
            .on("click", "", logging_handler(&log, "root"));
        let _view = ViewBuilder::adopt(view_root)
            .listeners(listeners)
            .build(&registry)
            .unwrap();

        let event = registry.fire(button, "click").await.unwrap();
        assert_eq!(*log.borrow(), vec!["inner"]);
        assert!(event.propagation_stopped());
    });
}

#[test]
fn test_one_handler_per_matched_element() {
    smol::block_on(async {
        let registry = new_registry();
        let (view_root, _, b, button) = nested_fixture(&registry);
        registry
            .document()
            .borrow_mut()
            .tree_mut()
            .set_attr(b, "class", "b extra");

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        // Both selectors match the same element; the first declared wins and
        // the element is not revisited.
        let listeners = ListenerMap::new()
            .on("click", ".b", logging_handler(&log, "first"))
            .on("click", ".extra", logging_handler(&log, "second"));
        let _view = ViewBuilder::adopt(view_root)
            .listeners(listeners)
            .build(&registry)
            .unwrap();

        registry.fire(button, "click").await.unwrap();
        assert_eq!(*log.borrow(), vec!["first"]);
    });
}

#[test]
fn test_nested_views_innermost_first() {
    smol::block_on(async {
        let registry = new_registry();
        let doc = registry.document();
        let (outer_root, inner_root, button) = {
            let mut doc = doc.borrow_mut();
            let root = doc.root();
            let outer = doc.create_element_in(root, "div");
            let inner = doc.create_element_in(outer, "div");
            let button = doc.create_element_in(inner, "button");
            doc.tree_mut().set_attr(button, "class", "go");
            (outer, inner, button)
        };

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let _outer = ViewBuilder::adopt(outer_root)
            .listeners(ListenerMap::new().on("click", ".go", logging_handler(&log, "outer-view")))
            .build(&registry)
            .unwrap();
        let _inner = ViewBuilder::adopt(inner_root)
            .listeners(ListenerMap::new().on("click", ".go", logging_handler(&log, "inner-view")))
            .build(&registry)
            .unwrap();

        registry.fire(button, "click").await.unwrap();
        assert_eq!(*log.borrow(), vec!["inner-view", "outer-view"]);
    });
}

#[test]
fn test_stop_propagation_blocks_enclosing_view() {
    smol::block_on(async {
        let registry = new_registry();
        let doc = registry.document();
        let (outer_root, inner_root, button) = {
            let mut doc = doc.borrow_mut();
            let root = doc.root();
            let outer = doc.create_element_in(root, "div");
            let inner = doc.create_element_in(outer, "div");
            let button = doc.create_element_in(inner, "button");
            doc.tree_mut().set_attr(button, "class", "go");
            (outer, inner, button)
        };

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let stopping = {
            let log = log.clone();
            handler(move |_view, event| {
                let log = log.clone();
                event.stop_propagation();
                async move {
                    log.borrow_mut().push("inner-view");
                    Ok(())
                }
            })
        };
        let _outer = ViewBuilder::adopt(outer_root)
            .listeners(ListenerMap::new().on("click", ".go", logging_handler(&log, "outer-view")))
            .build(&registry)
            .unwrap();
        let _inner = ViewBuilder::adopt(inner_root)
            .listeners(ListenerMap::new().on("click", ".go", stopping))
            .build(&registry)
            .unwrap();

        registry.fire(button, "click").await.unwrap();
        assert_eq!(*log.borrow(), vec!["inner-view"]);
    });
}

#[test]
fn test_handler_error_aborts_pass() {
    smol::block_on(async {
        let registry = new_registry();
        let (view_root, _, _, button) = nested_fixture(&registry);

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let failing = {
            let log = log.clone();
            handler(move |_view, _event| {
                let log = log.clone();
                async move {
                    log.borrow_mut().push("failing");
                    Err(anyhow::anyhow!("boom"))
                }
            })
        };
        let listeners = ListenerMap::new()
            .on("click", ".a", logging_handler(&log, "outer"))
            .on("click", ".a .b", failing);
        let _view = ViewBuilder::adopt(view_root)
            .listeners(listeners)
            .build(&registry)
            .unwrap();

        let result = registry.fire(button, "click").await;
        assert!(result.is_err());
        // The failing handler's side effect stands; the outer handler never ran.
        assert_eq!(*log.borrow(), vec!["failing"]);
    });
}

#[test]
fn test_detach_is_a_noop_without_attachment() {
    smol::block_on(async {
        let registry = new_registry();
        let (view_root, _, _, button) = nested_fixture(&registry);
        let view = ViewBuilder::adopt(view_root).build(&registry).unwrap();

        registry.detach(&view);
        registry.detach(&view);
        // No listeners installed: dispatch finds nothing and succeeds.
        registry.fire(button, "click").await.unwrap();
    });
}

#[test]
fn test_reattach_replaces_listeners() {
    smol::block_on(async {
        let registry = new_registry();
        let (view_root, _, _, button) = nested_fixture(&registry);

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let view = ViewBuilder::adopt(view_root)
            .listeners(ListenerMap::new().on("click", ".b", logging_handler(&log, "old")))
            .build(&registry)
            .unwrap();

        registry
            .attach(
                &view,
                &ListenerMap::new().on("click", ".b", logging_handler(&log, "new")),
            )
            .unwrap();

        registry.fire(button, "click").await.unwrap();
        assert_eq!(*log.borrow(), vec!["new"]);
    });
}

#[test]
fn test_attach_rejects_malformed_selector() {
    let registry = new_registry();
    let (view_root, _, _, _) = nested_fixture(&registry);

    let result = ViewBuilder::adopt(view_root)
        .listeners(ListenerMap::new().on("click", "[unclosed", handler(|_, _| async { Ok(()) })))
        .build(&registry);
    assert!(result.is_err());
    // The half-built view was rolled back.
    assert!(registry.is_empty());
}

#[test]
fn test_removal_destroys_view_and_stops_bus() {
    let registry = new_registry();
    let (view_root, _, _, _) = nested_fixture(&registry);

    let removed: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = removed.clone();
    let view = ViewBuilder::adopt(view_root)
        .on_removed(move |_view| sink.borrow_mut().push("removed"))
        .build(&registry)
        .unwrap();
    view.bus().subscribe("topic", |_| {});

    registry.remove_element(view_root);

    assert_eq!(*removed.borrow(), vec!["removed"]);
    assert!(view.is_destroyed());
    assert!(view.bus().is_stopped());
    assert!(registry.is_empty());

    // Destruction is exactly-once; a second destroy is a no-op.
    registry.destroy(&view);
    assert!(view.is_destroyed());
}

#[test]
fn test_removal_cleans_descendant_views() {
    let registry = new_registry();
    let doc = registry.document();
    let (outer_root, inner_root) = {
        let mut doc = doc.borrow_mut();
        let root = doc.root();
        let outer = doc.create_element_in(root, "div");
        let inner = doc.create_element_in(outer, "div");
        (outer, inner)
    };
    let outer = ViewBuilder::adopt(outer_root).build(&registry).unwrap();
    let inner = ViewBuilder::adopt(inner_root).build(&registry).unwrap();

    // Removing the outer root tears down both views.
    registry.remove_element(outer_root);
    assert!(outer.is_destroyed());
    assert!(inner.is_destroyed());
}

#[test]
fn test_keep_alive_suppresses_destruction() {
    let registry = new_registry();
    let (view_root, _, _, _) = nested_fixture(&registry);

    let removed: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = removed.clone();
    let view = ViewBuilder::adopt(view_root)
        .keep_alive(true)
        .on_removed(move |_view| sink.borrow_mut().push("removed"))
        .build(&registry)
        .unwrap();

    registry.remove_element(view_root);
    assert_eq!(*removed.borrow(), vec!["removed"]);
    assert!(!view.is_destroyed());
    assert!(!view.bus().is_stopped());
}

#[test]
fn test_builder_creates_element() {
    let registry = new_registry();
    let view = ViewBuilder::new("section")
        .element_id("panel")
        .build(&registry)
        .unwrap();

    let doc = registry.document();
    let doc = doc.borrow();
    assert_eq!(doc.get_element_by_id("panel"), Some(view.root()));
    assert_eq!(view.config().tag, "section");
    assert!(doc.tree().is_attached(view.root()));
}

#[test]
fn test_adopt_unknown_element_fails() {
    let registry = new_registry();
    assert!(ViewBuilder::adopt(NodeId::NONE).build(&registry).is_err());
}

#[test]
fn test_stop_immediate_propagation_suppresses_rest_of_pass() {
    smol::block_on(async {
        let registry = new_registry();
        let (view_root, _, _, button) = nested_fixture(&registry);

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let stopping = {
            let log = log.clone();
            handler(move |_view, event| {
                let log = log.clone();
                event.stop_immediate_propagation();
                async move {
                    log.borrow_mut().push("inner");
                    Ok(())
                }
            })
        };
        let listeners = ListenerMap::new()
            .on("click", ".a", logging_handler(&log, "outer"))
            .on("click", ".a .b", stopping)
            .on("click", "", logging_handler(&log, "root"));
        let _view = ViewBuilder::adopt(view_root)
            .listeners(listeners)
            .build(&registry)
            .unwrap();

        let event = registry.fire(button, "click").await.unwrap();
        assert_eq!(*log.borrow(), vec!["inner"]);
        assert!(event.propagation_stopped());
    });
}

#[test]
fn test_installed_notifier_observes_document_removal() {
    let registry = new_registry();
    let doc = registry.document();
    let (outer_root, inner_root) = {
        let mut doc = doc.borrow_mut();
        let root = doc.root();
        let outer = doc.create_element_in(root, "div");
        let inner = doc.create_element_in(outer, "div");
        (outer, inner)
    };
    let outer = ViewBuilder::adopt(outer_root).build(&registry).unwrap();
    let inner = ViewBuilder::adopt(inner_root).build(&registry).unwrap();

    let _notifier = rivet_view::LifecycleNotifier::install(&doc, &registry);
    // Removing through the document drives cleanup with no manual feeding.
    doc.borrow_mut().remove(outer_root);

    assert!(outer.is_destroyed());
    assert!(inner.is_destroyed());
    assert!(registry.is_empty());
}

#[test]
fn test_lifecycle_notifier_drives_cleanup() {
    let registry = new_registry();
    let (view_root, _, _, _) = nested_fixture(&registry);
    let view = ViewBuilder::adopt(view_root).build(&registry).unwrap();

    let notifier = rivet_view::LifecycleNotifier::new(&registry);
    let detached = registry.document().borrow_mut().remove(view_root);
    notifier.element_removed(&detached);

    assert!(view.is_destroyed());
}
