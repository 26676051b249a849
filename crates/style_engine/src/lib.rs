//! Style cascade engine for the weft widget toolkit.
//!
//! Owns rule matching, cascade resolution, and transition blending for
//! a widget tree it only sees through [`selectors::ElementAdapter`].
//! The engine is single-threaded and cooperatively driven: restyle
//! requests mark widgets dirty and resolution happens lazily on the
//! next property read, coalescing rapid state changes into one pass.
//! Animations advance once per external [`StyleEngine::tick`].

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use log::{debug, info, warn};
use selectors::ElementAdapter;

pub mod property;
mod rules;
mod transition;
mod value;

pub use property::{PropertyDescriptor, SideEffect};
pub use rules::{ChainEntry, Declaration, Rule, RuleSet, StyleChain};
pub use transition::{
    Animation, TimingFunction, TransitionDecision, TransitionSpec, decide, find_transition,
    target_covers,
};
pub use value::{ColorRGBA, StyleValue, interpolate};

/// Per-widget, per-property state: the current effective value, whether
/// the consumer owns it (a direct set the cascade must not clobber),
/// and whether an animation is driving it.
#[derive(Clone, Debug)]
struct PropertySlot {
    value: StyleValue,
    owned: bool,
    animating: bool,
}

/// Everything the engine tracks for one widget.
struct ElementEntry {
    chain: StyleChain,
    /// Rules epoch at which `chain` was last built.
    match_epoch: u64,
    dirty: bool,
    /// False until the first resolution pass. The first pass seeds the
    /// widget's styles instantly; transitions only blend later changes.
    styled_once: bool,
    slots: HashMap<&'static str, PropertySlot>,
    transitions: Vec<TransitionSpec>,
    animations: Vec<Animation>,
}

impl ElementEntry {
    fn new() -> Self {
        let slots = property::all()
            .iter()
            .map(|desc| {
                (
                    desc.name,
                    PropertySlot {
                        value: desc.default.clone(),
                        owned: false,
                        animating: false,
                    },
                )
            })
            .collect();
        Self {
            chain: StyleChain::default(),
            match_epoch: 0,
            dirty: true,
            styled_once: false,
            slots,
            transitions: Vec::new(),
            animations: Vec::new(),
        }
    }

    fn cancel_animation(&mut self, property: &str) -> bool {
        if let Some(idx) = self
            .animations
            .iter()
            .position(|anim| anim.property == property)
        {
            self.animations.remove(idx);
            true
        } else {
            false
        }
    }
}

/// The style resolver context. Owned by the UI runtime; one instance
/// per widget tree, no process-wide state.
pub struct StyleEngine<A: ElementAdapter> {
    rules: RuleSet,
    /// Increments whenever the active rule set changes; per-widget
    /// match epochs lag behind until their chains are rebuilt.
    rules_epoch: u64,
    elements: HashMap<A::Handle, ElementEntry>,
    /// Unknown property names already warned about.
    warned_properties: HashSet<String>,
    needs_redraw: HashSet<A::Handle>,
    needs_relayout: HashSet<A::Handle>,
}

impl<A: ElementAdapter> Default for StyleEngine<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ElementAdapter> StyleEngine<A> {
    pub fn new() -> Self {
        Self {
            rules: RuleSet::new(),
            rules_epoch: 0,
            elements: HashMap::new(),
            warned_properties: HashSet::new(),
            needs_redraw: HashSet::new(),
            needs_relayout: HashSet::new(),
        }
    }

    /// Swap in a new active rule set. Every widget's style chain goes
    /// stale and is rebuilt lazily on its next read.
    pub fn replace_rules(&mut self, rules: RuleSet) {
        for rule in rules.rules() {
            for decl in &rule.declarations {
                if property::lookup(&decl.property).is_none()
                    && self.warned_properties.insert(decl.property.clone())
                {
                    warn!(
                        "StyleEngine: ignoring declarations for unknown property '{}'",
                        decl.property
                    );
                }
            }
        }
        self.rules = rules;
        self.rules_epoch = self.rules_epoch.wrapping_add(1);
        info!(
            "StyleEngine: replaced active rule set (rules={}, epoch={})",
            self.rules.len(),
            self.rules_epoch
        );
    }

    /// Mark one widget's style chain stale. The tree layer calls this
    /// on id/class/state/position changes.
    pub fn invalidate_match(&mut self, element: A::Handle) {
        if let Some(entry) = self.elements.get_mut(&element) {
            entry.dirty = true;
        }
    }

    /// Effective value of `property` for `element`, resolving lazily if
    /// the widget is dirty. Returns `None` only for property names
    /// missing from the registry.
    pub fn effective_value(
        &mut self,
        adapter: &A,
        element: A::Handle,
        property: &str,
    ) -> Option<StyleValue> {
        let desc = property::lookup(property)?;
        self.ensure_resolved(adapter, element);
        self.elements
            .get(&element)
            .and_then(|entry| entry.slots.get(desc.name))
            .map(|slot| slot.value.clone())
    }

    /// The widget's matched rule chain from its last resolution, in
    /// cascade order. `None` before the first resolution.
    pub fn matched_chain(&self, element: A::Handle) -> Option<&StyleChain> {
        self.elements
            .get(&element)
            .filter(|entry| entry.styled_once)
            .map(|entry| &entry.chain)
    }

    /// Directly assign a property, taking ownership of it: the cascade
    /// will not touch an owned slot until [`Self::clear_property`], and
    /// any running animation on it is cancelled.
    pub fn set_property(&mut self, element: A::Handle, property: &str, new_value: StyleValue) {
        let Some(desc) = property::lookup(property) else {
            if self.warned_properties.insert(property.to_string()) {
                warn!("StyleEngine: direct set of unknown property '{property}' ignored");
            }
            return;
        };
        let entry = self
            .elements
            .entry(element)
            .or_insert_with(ElementEntry::new);
        entry.cancel_animation(desc.name);
        let Some(slot) = entry.slots.get_mut(desc.name) else {
            return;
        };
        slot.owned = true;
        slot.animating = false;
        if slot.value != new_value {
            slot.value = new_value;
            apply_effect(
                desc.effect,
                element,
                &mut self.needs_redraw,
                &mut self.needs_relayout,
            );
        }
    }

    /// Release an owned property back to the cascade.
    pub fn clear_property(&mut self, element: A::Handle, property: &str) {
        let Some(desc) = property::lookup(property) else {
            return;
        };
        if let Some(entry) = self.elements.get_mut(&element) {
            if let Some(slot) = entry.slots.get_mut(desc.name) {
                slot.owned = false;
            }
            entry.dirty = true;
        }
    }

    /// Replace the widget's declared transitions.
    pub fn set_transitions(&mut self, element: A::Handle, transitions: Vec<TransitionSpec>) {
        let entry = self
            .elements
            .entry(element)
            .or_insert_with(ElementEntry::new);
        entry.transitions = transitions;
    }

    /// True while any property of the widget is mid-blend.
    pub fn is_animating(&self, element: A::Handle) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|entry| !entry.animations.is_empty())
    }

    /// Drop all engine state for a destroyed widget.
    pub fn remove_element(&mut self, element: A::Handle) {
        self.elements.remove(&element);
        self.needs_redraw.remove(&element);
        self.needs_relayout.remove(&element);
    }

    /// Widgets needing a repaint since the last drain.
    pub fn take_redraw(&mut self) -> Vec<A::Handle> {
        self.needs_redraw.drain().collect()
    }

    /// Widgets needing layout since the last drain.
    pub fn take_relayout(&mut self) -> Vec<A::Handle> {
        self.needs_relayout.drain().collect()
    }

    /// Advance every running animation by `delta_ms` of wall time.
    /// Finished animations snap to their end value and fire their
    /// property's side effect once; running ones update their slot and
    /// fire it every tick. Independent widgets and properties advance
    /// on the same tick without any ordering between them.
    pub fn tick(&mut self, delta_ms: f32) {
        for (handle, entry) in &mut self.elements {
            let mut idx = 0;
            while idx < entry.animations.len() {
                let finished = entry.animations[idx].advance(delta_ms);
                let anim_property = entry.animations[idx].property;
                let effect =
                    property::lookup(anim_property).map_or(SideEffect::None, |desc| desc.effect);
                if finished {
                    let anim = entry.animations.remove(idx);
                    if let Some(slot) = entry.slots.get_mut(anim.property) {
                        slot.value = anim.end;
                        slot.animating = false;
                    }
                    debug!("StyleEngine: animation on '{anim_property}' finished");
                    apply_effect(
                        effect,
                        *handle,
                        &mut self.needs_redraw,
                        &mut self.needs_relayout,
                    );
                } else {
                    if !entry.animations[idx].in_delay() {
                        let current = entry.animations[idx].current_value();
                        if let Some(slot) = entry.slots.get_mut(anim_property) {
                            slot.value = current;
                        }
                        apply_effect(
                            effect,
                            *handle,
                            &mut self.needs_redraw,
                            &mut self.needs_relayout,
                        );
                    }
                    idx += 1;
                }
            }
        }
    }

    /// Rebuild the widget's style chain and re-resolve every registered
    /// property in one transactional pass. Change detection and
    /// transition decisions happen here; owned slots are skipped
    /// entirely.
    fn ensure_resolved(&mut self, adapter: &A, element: A::Handle) {
        let epoch = self.rules_epoch;
        let rules = &self.rules;
        let entry = self
            .elements
            .entry(element)
            .or_insert_with(ElementEntry::new);
        if entry.styled_once && !entry.dirty && entry.match_epoch == epoch {
            return;
        }
        let first_pass = !entry.styled_once;
        let chain = StyleChain::build(rules, adapter, element);
        for desc in property::all() {
            let current_target = entry
                .animations
                .iter()
                .find(|anim| anim.property == desc.name)
                .map(|anim| anim.end.clone());
            let Some(slot) = entry.slots.get_mut(desc.name) else {
                continue;
            };
            if slot.owned {
                continue;
            }
            let resolved = chain
                .resolve(rules, desc.name)
                .cloned()
                .unwrap_or_else(|| desc.default.clone());
            // Compare against the value the widget is heading toward: a
            // running blend's end value, else the settled slot value.
            if resolved == *current_target.as_ref().unwrap_or(&slot.value) {
                continue;
            }
            // A widget's first pass has no prior on-screen value, so
            // everything it resolves applies instantly.
            let decision = if first_pass {
                TransitionDecision::ApplyImmediately
            } else {
                decide(
                    desc.animatable,
                    &slot.value,
                    &resolved,
                    &entry.transitions,
                    desc.name,
                )
            };
            match decision {
                TransitionDecision::Unchanged => {
                    // The new target equals the value currently shown;
                    // an in-flight blend toward the old target is moot.
                    if let Some(idx) = entry
                        .animations
                        .iter()
                        .position(|anim| anim.property == desc.name)
                    {
                        entry.animations.remove(idx);
                        slot.animating = false;
                    }
                }
                TransitionDecision::ApplyImmediately => {
                    if let Some(idx) = entry
                        .animations
                        .iter()
                        .position(|anim| anim.property == desc.name)
                    {
                        entry.animations.remove(idx);
                    }
                    slot.animating = false;
                    slot.value = resolved;
                    apply_effect(
                        desc.effect,
                        element,
                        &mut self.needs_redraw,
                        &mut self.needs_relayout,
                    );
                }
                TransitionDecision::Animate(spec) => {
                    // Supersede any running blend from its current
                    // interpolated value so rapid changes never snap.
                    if let Some(idx) = entry
                        .animations
                        .iter()
                        .position(|anim| anim.property == desc.name)
                    {
                        entry.animations.remove(idx);
                    }
                    entry.animations.push(Animation::new(
                        desc.name,
                        &spec,
                        slot.value.clone(),
                        resolved,
                    ));
                    slot.animating = true;
                }
            }
        }
        entry.chain = chain;
        entry.dirty = false;
        entry.styled_once = true;
        entry.match_epoch = epoch;
    }
}

fn apply_effect<H: Copy + Eq + Hash>(
    effect: SideEffect,
    element: H,
    needs_redraw: &mut HashSet<H>,
    needs_relayout: &mut HashSet<H>,
) {
    match effect {
        SideEffect::Redraw => {
            needs_redraw.insert(element);
        }
        SideEffect::Relayout => {
            needs_relayout.insert(element);
            needs_redraw.insert(element);
        }
        SideEffect::None => {}
    }
}
