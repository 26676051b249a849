//! Selector matching against a widget tree.

use crate::{Combinator, ElementAdapter, Selector, SelectorNode};

/// Match a selector chain against a target widget.
///
/// The target-facing (last) node is evaluated against the widget
/// itself; predecessors are then resolved leftward through the chain,
/// walking ancestors or preceding siblings as each combinator dictates.
/// Failure at any link fails the whole chain.
pub fn matches_selector<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    selector: &Selector,
) -> bool {
    let parts = &selector.parts;
    let Some(target_idx) = parts.len().checked_sub(1) else {
        return false;
    };
    if !matches_node(adapter, element, &parts[target_idx].0) {
        return false;
    }
    matches_leftward(adapter, element, selector, target_idx)
}

/// Evaluate one simple selector against one widget.
pub fn matches_node<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    node: &SelectorNode,
) -> bool {
    if let Some(type_name) = node.type_name.as_deref()
        && !type_name.is_empty()
        && adapter.type_name(element) != type_name
    {
        return false;
    }
    if let Some(id) = node.id.as_deref()
        && adapter.element_id(element) != Some(id)
    {
        return false;
    }
    for class in &node.classes {
        if !adapter.has_class(element, class) {
            return false;
        }
    }
    for matcher in &node.attributes {
        // Absent attributes never match, including for presence tests.
        match adapter.attr(element, &matcher.name) {
            Some(value) if matcher.matches(value) => {}
            _ => return false,
        }
    }
    // Compare only the bits the selector declares tested; untested
    // state bits on the widget are ignored.
    let state = adapter.state(element);
    if state & node.enabled_state != node.specified_state & node.enabled_state {
        return false;
    }
    if let Some(subitem) = node.subitem.as_deref()
        && adapter.subitem(element) != Some(subitem)
    {
        return false;
    }
    true
}

/// Resolve the predecessor of `parts[right_idx]` (already matched
/// against `element`) against the tree context its combinator selects.
fn matches_leftward<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    selector: &Selector,
    right_idx: usize,
) -> bool {
    if right_idx == 0 {
        return true;
    }
    let left_idx = right_idx - 1;
    let (left_node, _) = &selector.parts[left_idx];
    // The combinator linking a node to its successor is stored with the
    // left node. A missing combinator mid-chain is treated as
    // descendant, the loosest relation.
    let combinator = selector.parts[left_idx]
        .1
        .unwrap_or(Combinator::Descendant);
    match combinator {
        Combinator::Child => adapter.parent(element).is_some_and(|parent| {
            matches_node(adapter, parent, left_node)
                && matches_leftward(adapter, parent, selector, left_idx)
        }),
        Combinator::Descendant => {
            let mut current = adapter.parent(element);
            while let Some(ancestor) = current {
                if matches_node(adapter, ancestor, left_node)
                    && matches_leftward(adapter, ancestor, selector, left_idx)
                {
                    return true;
                }
                current = adapter.parent(ancestor);
            }
            false
        }
        Combinator::NextSibling => adapter.previous_sibling(element).is_some_and(|sibling| {
            matches_node(adapter, sibling, left_node)
                && matches_leftward(adapter, sibling, selector, left_idx)
        }),
        Combinator::SubsequentSibling => {
            let mut current = adapter.previous_sibling(element);
            while let Some(sibling) = current {
                if matches_node(adapter, sibling, left_node)
                    && matches_leftward(adapter, sibling, selector, left_idx)
                {
                    return true;
                }
                current = adapter.previous_sibling(sibling);
            }
            false
        }
    }
}
