//! Comprehensive tests for rivet-selectors
//!
//! Parse-then-match scenarios against a built tree, the shapes the event
//! dispatcher relies on.

use rivet_dom::{DomTree, NodeId};
use rivet_selectors::{closest, matches, query, query_all, Selector, SelectorError};

/// <main id="app">
///   <form class="login">
///     <input type="text" name="user"/>
///     <div class="actions"><button class="submit primary"/></div>
///   </form>
/// </main>
fn fixture() -> (DomTree, NodeId, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let main = tree.create_element("main");
    let form = tree.create_element("form");
    let input = tree.create_element("input");
    let actions = tree.create_element("div");
    let button = tree.create_element("button");
    tree.append_child(tree.root(), main);
    tree.append_child(main, form);
    tree.append_child(form, input);
    tree.append_child(form, actions);
    tree.append_child(actions, button);
    tree.set_attr(main, "id", "app");
    tree.set_attr(form, "class", "login");
    tree.set_attr(input, "type", "text");
    tree.set_attr(input, "name", "user");
    tree.set_attr(actions, "class", "actions");
    tree.set_attr(button, "class", "submit primary");
    (tree, main, form, input, button)
}

fn sel(text: &str) -> Selector {
    Selector::parse(text).unwrap()
}

#[test]
fn test_dispatch_key_shapes() {
    let (tree, _, form, input, button) = fixture();

    assert!(matches(&tree, button, &sel(".submit")));
    assert!(matches(&tree, button, &sel("button.submit.primary")));
    assert!(matches(&tree, input, &sel("input[type=text]")));
    assert!(matches(&tree, input, &sel("[name=\"user\"]")));
    assert!(matches(&tree, form, &sel("#app > form.login")));
    assert!(matches(&tree, button, &sel("#app .actions > button")));
    assert!(!matches(&tree, button, &sel("#app > button")));
    assert!(!matches(&tree, input, &sel("[type=password]")));
}

#[test]
fn test_closest_walks_ancestor_chain() {
    let (tree, main, form, _, button) = fixture();

    assert_eq!(closest(&tree, button, &sel(".login")), Some(form));
    assert_eq!(closest(&tree, button, &sel("#app")), Some(main));
    // Self matches win over ancestors.
    assert_eq!(closest(&tree, button, &sel(".primary")), Some(button));
    assert_eq!(closest(&tree, button, &sel(".missing")), None);
}

#[test]
fn test_query_scoping() {
    let (tree, main, form, input, button) = fixture();

    assert_eq!(query(&tree, tree.root(), &sel(".submit")), Some(button));
    assert_eq!(query(&tree, form, &sel("input")), Some(input));
    // The scope root itself is not a candidate.
    assert_eq!(query(&tree, main, &sel("#app")), None);
    assert_eq!(query_all(&tree, tree.root(), &sel("section")), vec![]);
    // Depth-first order, scoped to the form's descendants.
    let all = query_all(&tree, form, &sel("*"));
    assert_eq!(all.len(), 3);
    assert_eq!(all[0], input);
    assert!(all.contains(&button));
}

#[test]
fn test_attribute_matcher_operators_through_parse() {
    let (tree, _, _, input, button) = fixture();

    assert!(matches(&tree, input, &sel("[name^=us]")));
    assert!(matches(&tree, input, &sel("[name$=er]")));
    assert!(matches(&tree, input, &sel("[name*=se]")));
    assert!(matches(&tree, button, &sel("[class~=primary]")));
    assert!(!matches(&tree, button, &sel("[class~=prim]")));
    assert!(matches(&tree, input, &sel("[name]")));
    assert!(!matches(&tree, input, &sel("[placeholder]")));
}

#[test]
fn test_parse_errors_are_structured() {
    assert!(matches!(Selector::parse(""), Err(SelectorError::Empty)));
    assert!(matches!(
        Selector::parse("[unclosed"),
        Err(SelectorError::UnclosedAttribute { .. })
    ));
    assert!(matches!(
        Selector::parse(".a !"),
        Err(SelectorError::UnexpectedChar { ch: '!', .. })
    ));
    assert!(matches!(
        Selector::parse("div >"),
        Err(SelectorError::ExpectedIdentifier { .. })
    ));
}

#[test]
fn test_text_roundtrip_preserves_source() {
    let selector = sel("  #app .actions > button.submit  ");
    assert_eq!(selector.text, "#app .actions > button.submit");
}
