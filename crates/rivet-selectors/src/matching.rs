//! Selector matching
//!
//! Right-to-left matching: the rightmost compound must match the candidate
//! node, then the remaining compounds are satisfied walking the ancestor
//! chain (with backtracking across descendant combinators).

use rivet_dom::{DomTree, NodeId};

use crate::parser::{Combinator, CompoundSelector, Selector, SimplePart};

/// Check whether `node` matches `selector`
pub fn matches(tree: &DomTree, node: NodeId, selector: &Selector) -> bool {
    let Some(last) = selector.compounds.last() else {
        return false;
    };
    if !compound_matches(tree, node, last) {
        return false;
    }
    match_prefix(tree, node, selector.compounds.len() - 1, selector)
}

/// Innermost ancestor-or-self of `node` matching `selector`
pub fn closest(tree: &DomTree, node: NodeId, selector: &Selector) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|&candidate| matches(tree, candidate, selector))
}

/// First descendant of `root` matching `selector`, in depth-first order
pub fn query(tree: &DomTree, root: NodeId, selector: &Selector) -> Option<NodeId> {
    tree.descendants(root)
        .into_iter()
        .find(|&id| matches(tree, id, selector))
}

/// All descendants of `root` matching `selector`, in depth-first order
pub fn query_all(tree: &DomTree, root: NodeId, selector: &Selector) -> Vec<NodeId> {
    tree.descendants(root)
        .into_iter()
        .filter(|&id| matches(tree, id, selector))
        .collect()
}

/// Verify the compounds to the left of `idx`, given that `compounds[idx]`
/// matched at `node`
fn match_prefix(tree: &DomTree, node: NodeId, idx: usize, selector: &Selector) -> bool {
    if idx == 0 {
        return true;
    }
    let target = idx - 1;
    let compound = &selector.compounds[target];
    match selector.combinators[target] {
        Combinator::Child => match tree.parent(node) {
            Some(parent) => {
                compound_matches(tree, parent, compound)
                    && match_prefix(tree, parent, target, selector)
            }
            None => false,
        },
        Combinator::Descendant => tree.ancestors(node).into_iter().any(|ancestor| {
            compound_matches(tree, ancestor, compound)
                && match_prefix(tree, ancestor, target, selector)
        }),
    }
}

/// Match a compound selector against a single element
fn compound_matches(tree: &DomTree, node: NodeId, compound: &CompoundSelector) -> bool {
    let Some(elem) = tree.element(node) else {
        return false;
    };
    compound.parts.iter().all(|part| match part {
        SimplePart::Universal => true,
        SimplePart::Type(tag) => elem.tag.eq_ignore_ascii_case(tag),
        SimplePart::Id(id) => elem.id.as_deref() == Some(id.as_str()),
        SimplePart::Class(class) => elem.has_class(class),
        SimplePart::Attribute(attr) => attr.matches(elem.get_attr(&attr.name)),
    })
}
