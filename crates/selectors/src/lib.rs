//! Widget selector matching and specificity.
//!
//! This crate implements the selector half of the weft style engine:
//! - Simple selectors over widget type, id, style classes, pseudo-state
//!   bits, sub-items of composite widgets, and attribute tests
//! - Combinators: descendant, child, next-sibling, subsequent-sibling
//! - Specificity calculation with explicit recomputation
//!
//! The widget tree itself lives elsewhere; matching only needs the
//! read-only view provided by [`ElementAdapter`].

use std::hash::Hash;

mod attribute;
mod matcher;
mod specificity;

pub use attribute::{AttrPattern, AttributeMatcher};
pub use matcher::matches_selector;
pub use specificity::{Specificity, specificity_of_node, specificity_of_selector};

bitflags::bitflags! {
    /// Pseudo-state bits a widget can carry and a selector can test.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StateFlags: u32 {
        const HOVERED  = 1 << 0;
        const PRESSED  = 1 << 1;
        const FOCUSED  = 1 << 2;
        const DISABLED = 1 << 3;
        const CHECKED  = 1 << 4;
        const SELECTED = 1 << 5;
        const EXPANDED = 1 << 6;
        const CURRENT  = 1 << 7;
    }
}

/// An adapter that abstracts widget-tree access for selector matching.
/// Implement this for your tree layer.
pub trait ElementAdapter {
    type Handle: Copy + Eq + Hash;

    /// Widget type name, e.g. `"button"`.
    fn type_name(&self, element: Self::Handle) -> &str;

    /// Returns Some(id) if the widget has an identifier, else None.
    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    /// True if the widget carries the given style class.
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    /// Current pseudo-state bits.
    fn state(&self, element: Self::Handle) -> StateFlags;

    /// Name of the sub-part this view is bound to, for composite widgets.
    fn subitem(&self, element: Self::Handle) -> Option<&str>;

    /// Attribute value if the attribute is present.
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;

    /// Parent widget if any.
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Immediately preceding sibling if any.
    fn previous_sibling(&self, element: Self::Handle) -> Option<Self::Handle>;
}

/// Relation between two adjacent nodes in a selector chain.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

/// One simple selector: every populated constraint must hold for the
/// candidate widget.
///
/// `universal` is derived from the other fields and refreshed by
/// [`SelectorNode::recompute_universal`] (or [`Selector::recompute`] for
/// a whole chain); it is never recomputed implicitly on read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectorNode {
    pub type_name: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// State bits that must hold the exact values given here.
    pub specified_state: StateFlags,
    /// Which of the state bits are actually tested. Bits outside this
    /// mask are ignored, which is what makes `:not(x)` expressible: the
    /// bit is enabled but specified as clear.
    pub enabled_state: StateFlags,
    pub subitem: Option<String>,
    pub attributes: Vec<AttributeMatcher>,
    universal: bool,
}

impl SelectorNode {
    pub fn new() -> Self {
        Self {
            universal: true,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self.recompute_universal();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self.recompute_universal();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self.recompute_universal();
        self
    }

    /// Require `bits` to be set. Adds to both the specified and the
    /// enabled mask.
    pub fn with_state(mut self, bits: StateFlags) -> Self {
        self.specified_state |= bits;
        self.enabled_state |= bits;
        self.recompute_universal();
        self
    }

    /// Require `bits` to be clear (`:not(x)` semantics): enabled for the
    /// comparison but specified as zero.
    pub fn without_state(mut self, bits: StateFlags) -> Self {
        self.specified_state &= !bits;
        self.enabled_state |= bits;
        self.recompute_universal();
        self
    }

    pub fn with_subitem(mut self, name: impl Into<String>) -> Self {
        self.subitem = Some(name.into());
        self.recompute_universal();
        self
    }

    pub fn with_attribute(mut self, matcher: AttributeMatcher) -> Self {
        self.attributes.push(matcher);
        self.recompute_universal();
        self
    }

    /// True iff no constraint is populated. Universal nodes never
    /// contribute to specificity.
    pub fn is_universal(&self) -> bool {
        self.universal
    }

    /// Refresh the derived `universal` flag after direct field edits.
    pub fn recompute_universal(&mut self) {
        self.universal = self.type_name.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.enabled_state.is_empty()
            && self.subitem.is_none()
            && self.attributes.is_empty();
    }
}

/// A selector chain: nodes stored left-to-right, ancestor-most first,
/// target-facing node last. The combinator in each entry links the node
/// to the entry after it, so the last combinator is always `None`.
///
/// The cached specificity is derived state; call [`Selector::recompute`]
/// after mutating `parts` directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selector {
    pub parts: Vec<(SelectorNode, Option<Combinator>)>,
    specificity: Specificity,
}

impl Selector {
    /// Build a selector from parts and compute its derived state.
    pub fn new(parts: Vec<(SelectorNode, Option<Combinator>)>) -> Self {
        let mut selector = Self {
            parts,
            specificity: Specificity::default(),
        };
        selector.recompute();
        selector
    }

    /// Convenience constructor for the common single-node selector.
    pub fn simple(node: SelectorNode) -> Self {
        Self::new(vec![(node, None)])
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// The node matched against the target widget itself.
    pub fn target_node(&self) -> Option<&SelectorNode> {
        self.parts.last().map(|(node, _)| node)
    }

    /// Recompute every node's `universal` flag and the cached
    /// specificity. Must be called after any direct mutation of `parts`.
    pub fn recompute(&mut self) {
        for (node, _) in &mut self.parts {
            node.recompute_universal();
        }
        self.specificity = specificity_of_selector(self);
    }
}
