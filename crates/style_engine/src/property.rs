//! The styleable property registry.
//!
//! One statically enumerated table maps each property name to its
//! default value, animatability, and the side effect a change triggers.
//! The cascade and transition code iterate this table; nothing is
//! looked up by synthesized names at runtime.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::value::{ColorRGBA, StyleValue};

/// What the consuming layer must do after a property changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideEffect {
    None,
    Redraw,
    /// Implies a redraw as well; the consumer re-runs layout first.
    Relayout,
}

pub struct PropertyDescriptor {
    pub name: &'static str,
    pub default: StyleValue,
    pub animatable: bool,
    pub effect: SideEffect,
}

fn descriptor(
    name: &'static str,
    default: StyleValue,
    animatable: bool,
    effect: SideEffect,
) -> PropertyDescriptor {
    PropertyDescriptor {
        name,
        default,
        animatable,
        effect,
    }
}

static REGISTRY: Lazy<Vec<PropertyDescriptor>> = Lazy::new(|| {
    use SideEffect::{Redraw, Relayout};
    let number = StyleValue::Number;
    let color = StyleValue::Color;
    vec![
        descriptor("background-color", color(ColorRGBA::TRANSPARENT), true, Redraw),
        descriptor("text-color", color(ColorRGBA::opaque(0, 0, 0)), true, Redraw),
        descriptor("border-color", color(ColorRGBA::opaque(0, 0, 0)), true, Redraw),
        descriptor("border-top-width", number(0.0), true, Relayout),
        descriptor("border-right-width", number(0.0), true, Relayout),
        descriptor("border-bottom-width", number(0.0), true, Relayout),
        descriptor("border-left-width", number(0.0), true, Relayout),
        descriptor("margin-top", number(0.0), true, Relayout),
        descriptor("margin-right", number(0.0), true, Relayout),
        descriptor("margin-bottom", number(0.0), true, Relayout),
        descriptor("margin-left", number(0.0), true, Relayout),
        descriptor("padding-top", number(0.0), true, Relayout),
        descriptor("padding-right", number(0.0), true, Relayout),
        descriptor("padding-bottom", number(0.0), true, Relayout),
        descriptor("padding-left", number(0.0), true, Relayout),
        descriptor("opacity", number(1.0), true, Redraw),
        descriptor("font-size", number(14.0), true, Relayout),
        descriptor("visible", StyleValue::Flag(true), false, Relayout),
    ]
});

static INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    REGISTRY
        .iter()
        .enumerate()
        .map(|(idx, desc)| (desc.name, idx))
        .collect()
});

/// All registered properties, in declaration order.
pub fn all() -> &'static [PropertyDescriptor] {
    &REGISTRY
}

pub fn lookup(name: &str) -> Option<&'static PropertyDescriptor> {
    INDEX.get(name).map(|&idx| &REGISTRY[idx])
}
