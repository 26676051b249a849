//! Selector specificity calculation.

use crate::{Selector, SelectorNode};

/// Specificity as an ordered 4-tuple `(ids, classes_and_attributes,
/// state_weight, types)`, compared lexicographically left-to-right.
///
/// The state component is a `u64` because the weighting is quadratic in
/// the numeric value of the tested state bitset, not just its
/// cardinality: a selector requiring several simultaneous state bits
/// outranks any pile of single-state selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u32, pub u32, pub u64, pub u32);

/// Compute the specificity contribution of a single node. Universal
/// nodes contribute zero.
pub fn specificity_of_node(node: &SelectorNode) -> Specificity {
    if node.is_universal() {
        return Specificity::default();
    }
    let mut ids = 0u32;
    let mut classes = 0u32;
    let mut types = 0u32;
    if node.id.is_some() {
        ids += 1;
    }
    classes += node.classes.len() as u32;
    classes += node.attributes.len() as u32;
    let state_bits = u64::from(node.specified_state.bits());
    let state_weight = state_bits * state_bits * u64::from(state_bits.count_ones());
    if node.type_name.is_some() {
        types += 1;
    }
    if node.subitem.is_some() {
        types += 1;
    }
    Specificity(ids, classes, state_weight, types)
}

/// Accumulate specificity across the whole combinator chain, skipping
/// universal nodes.
pub fn specificity_of_selector(selector: &Selector) -> Specificity {
    let mut total = Specificity::default();
    for (node, _) in &selector.parts {
        let add = specificity_of_node(node);
        total.0 = total.0.saturating_add(add.0);
        total.1 = total.1.saturating_add(add.1);
        total.2 = total.2.saturating_add(add.2);
        total.3 = total.3.saturating_add(add.3);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttrPattern, AttributeMatcher, Combinator, StateFlags};

    #[test]
    fn ordering_is_lexicographic() {
        // One id beats any number of classes.
        assert!(Specificity(1, 0, 0, 0) > Specificity(0, 99, 0, 99));
        // One class beats any state weight.
        assert!(Specificity(0, 1, 0, 0) > Specificity(0, 0, u64::MAX, 9));
        // Types break the final tie.
        assert!(Specificity(0, 0, 5, 2) > Specificity(0, 0, 5, 1));
        assert_eq!(Specificity(1, 2, 3, 4), Specificity(1, 2, 3, 4));
    }

    #[test]
    fn universal_nodes_contribute_zero() {
        let universal = SelectorNode::new();
        assert!(universal.is_universal());
        assert_eq!(specificity_of_node(&universal), Specificity::default());

        // Chained through a combinator it still adds nothing.
        let selector = Selector::new(vec![
            (SelectorNode::new(), Some(Combinator::Descendant)),
            (SelectorNode::new().with_type("button"), None),
        ]);
        assert_eq!(selector.specificity(), Specificity(0, 0, 0, 1));
    }

    #[test]
    fn counts_per_component() {
        let node = SelectorNode::new()
            .with_type("button")
            .with_id("ok")
            .with_class("primary")
            .with_class("wide")
            .with_attribute(AttributeMatcher::new("role", AttrPattern::Exact, "confirm"))
            .with_subitem("label");
        // id=1, classes+attrs=3, type+subitem=2
        assert_eq!(specificity_of_node(&node), Specificity(1, 3, 0, 2));
    }

    #[test]
    fn state_weight_is_superlinear() {
        let single = SelectorNode::new().with_state(StateFlags::HOVERED);
        let hovered = u64::from(StateFlags::HOVERED.bits());
        assert_eq!(
            specificity_of_node(&single),
            Specificity(0, 0, hovered * hovered, 0)
        );

        let double = SelectorNode::new().with_state(StateFlags::HOVERED | StateFlags::FOCUSED);
        let bits = u64::from((StateFlags::HOVERED | StateFlags::FOCUSED).bits());
        assert_eq!(
            specificity_of_node(&double),
            Specificity(0, 0, bits * bits * 2, 0)
        );

        // Two required bits in one selector outweigh the sum of two
        // single-bit selectors.
        let focused = u64::from(StateFlags::FOCUSED.bits());
        assert!(bits * bits * 2 > hovered * hovered + focused * focused);
    }

    #[test]
    fn chain_accumulates_across_nodes() {
        let selector = Selector::new(vec![
            (SelectorNode::new().with_id("main"), Some(Combinator::Child)),
            (
                SelectorNode::new().with_type("list"),
                Some(Combinator::Descendant),
            ),
            (SelectorNode::new().with_class("row"), None),
        ]);
        assert_eq!(selector.specificity(), Specificity(1, 1, 0, 1));
    }
}
