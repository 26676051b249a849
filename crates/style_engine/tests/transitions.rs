use selectors::{ElementAdapter, Selector, SelectorNode, StateFlags};
use style_engine::{
    Declaration, RuleSet, StyleEngine, StyleValue, TimingFunction, TransitionSpec,
};

/// Single-widget tree: transitions only need the target itself.
#[derive(Default)]
struct OneButton {
    state: StateFlags,
    classes: Vec<String>,
}

const BUTTON: usize = 0;

impl ElementAdapter for OneButton {
    type Handle = usize;

    fn type_name(&self, _element: usize) -> &str {
        "button"
    }

    fn element_id(&self, _element: usize) -> Option<&str> {
        None
    }

    fn has_class(&self, _element: usize, class: &str) -> bool {
        self.classes.iter().any(|have| have == class)
    }

    fn state(&self, _element: usize) -> StateFlags {
        self.state
    }

    fn subitem(&self, _element: usize) -> Option<&str> {
        None
    }

    fn attr(&self, _element: usize, _name: &str) -> Option<&str> {
        None
    }

    fn parent(&self, _element: usize) -> Option<usize> {
        None
    }

    fn previous_sibling(&self, _element: usize) -> Option<usize> {
        None
    }
}

/// Rules driving `font-size` by hover state: 10 at rest, 20 hovered.
fn font_size_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    rules.push(
        Selector::simple(SelectorNode::new().with_type("button")),
        vec![Declaration::new("font-size", StyleValue::Number(10.0))],
    );
    rules.push(
        Selector::simple(
            SelectorNode::new()
                .with_type("button")
                .with_state(StateFlags::HOVERED),
        ),
        vec![Declaration::new("font-size", StyleValue::Number(20.0))],
    );
    rules
}

fn number(value: Option<StyleValue>) -> f32 {
    match value {
        Some(StyleValue::Number(inner)) => inner,
        other => panic!("expected a number, got {other:?}"),
    }
}

#[test]
fn eligible_change_starts_an_animation() {
    let mut tree = OneButton::default();
    let mut engine: StyleEngine<OneButton> = StyleEngine::new();
    engine.replace_rules(font_size_rules());
    engine.set_transitions(
        BUTTON,
        vec![TransitionSpec::new(
            "font-size",
            100.0,
            TimingFunction::Linear,
        )],
    );

    // Settle at the rest value first.
    assert_eq!(
        number(engine.effective_value(&tree, BUTTON, "font-size")),
        10.0
    );
    assert!(!engine.is_animating(BUTTON));

    tree.state = StateFlags::HOVERED;
    engine.invalidate_match(BUTTON);
    // The read kicks off the blend; the value starts at the old one.
    assert_eq!(
        number(engine.effective_value(&tree, BUTTON, "font-size")),
        10.0
    );
    assert!(engine.is_animating(BUTTON));

    engine.tick(50.0);
    let midway = number(engine.effective_value(&tree, BUTTON, "font-size"));
    assert!((midway - 15.0).abs() < 1e-3, "expected ~15, got {midway}");

    engine.tick(50.0);
    assert_eq!(
        number(engine.effective_value(&tree, BUTTON, "font-size")),
        20.0
    );
    assert!(!engine.is_animating(BUTTON));
}

#[test]
fn superseded_animation_continues_from_current_value() {
    let mut tree = OneButton::default();
    let mut engine: StyleEngine<OneButton> = StyleEngine::new();
    engine.replace_rules(font_size_rules());
    engine.set_transitions(
        BUTTON,
        vec![TransitionSpec::new(
            "font-size",
            100.0,
            TimingFunction::Linear,
        )],
    );

    let _ = engine.effective_value(&tree, BUTTON, "font-size");
    tree.state = StateFlags::HOVERED;
    engine.invalidate_match(BUTTON);
    let _ = engine.effective_value(&tree, BUTTON, "font-size");

    // Halfway to 20: currently ~15.
    engine.tick(50.0);
    assert!((number(engine.effective_value(&tree, BUTTON, "font-size")) - 15.0).abs() < 1e-3);

    // Hover ends; the reverse blend must start from ~15, not snap to 20
    // or restart from 10.
    tree.state = StateFlags::empty();
    engine.invalidate_match(BUTTON);
    let at_start = number(engine.effective_value(&tree, BUTTON, "font-size"));
    assert!((at_start - 15.0).abs() < 1e-3, "expected ~15, got {at_start}");
    assert!(engine.is_animating(BUTTON));

    // Half the new animation's duration: 15 -> 10 is half done at 12.5.
    engine.tick(50.0);
    let reversing = number(engine.effective_value(&tree, BUTTON, "font-size"));
    assert!(
        (reversing - 12.5).abs() < 1e-3,
        "expected ~12.5, got {reversing}"
    );
}

#[test]
fn unchanged_resolution_triggers_nothing() {
    let mut engine: StyleEngine<OneButton> = StyleEngine::new();
    let tree = OneButton::default();
    engine.replace_rules(font_size_rules());
    engine.set_transitions(
        BUTTON,
        vec![TransitionSpec::new(
            "font-size",
            100.0,
            TimingFunction::Linear,
        )],
    );

    let _ = engine.effective_value(&tree, BUTTON, "font-size");
    let _ = engine.take_redraw();
    let _ = engine.take_relayout();

    // Same chain, same values: no animation, no side effects.
    engine.invalidate_match(BUTTON);
    let _ = engine.effective_value(&tree, BUTTON, "font-size");
    assert!(!engine.is_animating(BUTTON));
    assert!(engine.take_redraw().is_empty());
    assert!(engine.take_relayout().is_empty());
}

#[test]
fn ineligible_changes_apply_immediately() {
    let mut tree = OneButton::default();
    let mut engine: StyleEngine<OneButton> = StyleEngine::new();
    engine.replace_rules(font_size_rules());
    // Transition declared for an unrelated group name: never eligible.
    engine.set_transitions(
        BUTTON,
        vec![TransitionSpec::new("margin", 100.0, TimingFunction::Linear)],
    );

    let _ = engine.effective_value(&tree, BUTTON, "font-size");
    tree.state = StateFlags::HOVERED;
    engine.invalidate_match(BUTTON);
    assert_eq!(
        number(engine.effective_value(&tree, BUTTON, "font-size")),
        20.0
    );
    assert!(!engine.is_animating(BUTTON));
}

#[test]
fn group_transition_covers_expanded_longhands() {
    let mut tree = OneButton::default();
    let mut engine: StyleEngine<OneButton> = StyleEngine::new();

    let mut rules = RuleSet::new();
    rules.push(
        Selector::simple(SelectorNode::new().with_type("button")),
        vec![Declaration::new("margin", StyleValue::Number(0.0))],
    );
    rules.push(
        Selector::simple(
            SelectorNode::new()
                .with_type("button")
                .with_state(StateFlags::HOVERED),
        ),
        vec![Declaration::new("margin", StyleValue::Number(8.0))],
    );
    engine.replace_rules(rules);
    engine.set_transitions(
        BUTTON,
        vec![TransitionSpec::new("margin", 80.0, TimingFunction::Linear)],
    );

    let _ = engine.effective_value(&tree, BUTTON, "margin-left");
    tree.state = StateFlags::HOVERED;
    engine.invalidate_match(BUTTON);
    let _ = engine.effective_value(&tree, BUTTON, "margin-left");
    assert!(engine.is_animating(BUTTON));

    engine.tick(40.0);
    // All four edges blend together under the one group declaration.
    for edge in ["margin-top", "margin-right", "margin-bottom", "margin-left"] {
        let value = number(engine.effective_value(&tree, BUTTON, edge));
        assert!((value - 4.0).abs() < 1e-3, "{edge} expected ~4, got {value}");
    }
}

#[test]
fn direct_set_cancels_the_running_animation() {
    let mut tree = OneButton::default();
    let mut engine: StyleEngine<OneButton> = StyleEngine::new();
    engine.replace_rules(font_size_rules());
    engine.set_transitions(
        BUTTON,
        vec![TransitionSpec::new(
            "font-size",
            100.0,
            TimingFunction::Linear,
        )],
    );

    let _ = engine.effective_value(&tree, BUTTON, "font-size");
    tree.state = StateFlags::HOVERED;
    engine.invalidate_match(BUTTON);
    let _ = engine.effective_value(&tree, BUTTON, "font-size");
    engine.tick(50.0);
    assert!(engine.is_animating(BUTTON));

    engine.set_property(BUTTON, "font-size", StyleValue::Number(30.0));
    assert!(!engine.is_animating(BUTTON));
    assert_eq!(
        number(engine.effective_value(&tree, BUTTON, "font-size")),
        30.0
    );

    // Further ticks must not resurrect or advance anything.
    engine.tick(100.0);
    assert_eq!(
        number(engine.effective_value(&tree, BUTTON, "font-size")),
        30.0
    );
}

#[test]
fn finished_animation_fires_its_effect_once() {
    let mut tree = OneButton::default();
    let mut engine: StyleEngine<OneButton> = StyleEngine::new();
    engine.replace_rules(font_size_rules());
    engine.set_transitions(
        BUTTON,
        vec![TransitionSpec::new(
            "font-size",
            100.0,
            TimingFunction::Linear,
        )],
    );

    let _ = engine.effective_value(&tree, BUTTON, "font-size");
    tree.state = StateFlags::HOVERED;
    engine.invalidate_match(BUTTON);
    let _ = engine.effective_value(&tree, BUTTON, "font-size");
    let _ = engine.take_redraw();
    let _ = engine.take_relayout();

    // Running: every tick requests work.
    engine.tick(30.0);
    assert_eq!(engine.take_relayout(), vec![BUTTON]);
    engine.tick(30.0);
    assert_eq!(engine.take_relayout(), vec![BUTTON]);

    // Finishing tick snaps to the end value and fires once more.
    engine.tick(50.0);
    assert_eq!(engine.take_relayout(), vec![BUTTON]);
    assert!(!engine.is_animating(BUTTON));

    // Idle ticks are silent.
    engine.tick(50.0);
    assert!(engine.take_relayout().is_empty());
    assert!(engine.take_redraw().is_empty());
}

#[test]
fn concurrent_animations_on_different_properties_are_independent() {
    let mut tree = OneButton::default();
    let mut engine: StyleEngine<OneButton> = StyleEngine::new();

    let mut rules = RuleSet::new();
    rules.push(
        Selector::simple(SelectorNode::new().with_type("button")),
        vec![
            Declaration::new("opacity", StyleValue::Number(0.0)),
            Declaration::new("font-size", StyleValue::Number(10.0)),
        ],
    );
    rules.push(
        Selector::simple(
            SelectorNode::new()
                .with_type("button")
                .with_state(StateFlags::HOVERED),
        ),
        vec![
            Declaration::new("opacity", StyleValue::Number(1.0)),
            Declaration::new("font-size", StyleValue::Number(20.0)),
        ],
    );
    engine.replace_rules(rules);
    engine.set_transitions(
        BUTTON,
        vec![
            TransitionSpec::new("opacity", 100.0, TimingFunction::Linear),
            TransitionSpec::new("font-size", 200.0, TimingFunction::Linear),
        ],
    );

    let _ = engine.effective_value(&tree, BUTTON, "opacity");
    tree.state = StateFlags::HOVERED;
    engine.invalidate_match(BUTTON);
    let _ = engine.effective_value(&tree, BUTTON, "opacity");

    engine.tick(100.0);
    // Opacity finished; font-size is only halfway through.
    assert_eq!(
        number(engine.effective_value(&tree, BUTTON, "opacity")),
        1.0
    );
    let font_size = number(engine.effective_value(&tree, BUTTON, "font-size"));
    assert!(
        (font_size - 15.0).abs() < 1e-3,
        "expected ~15, got {font_size}"
    );
    assert!(engine.is_animating(BUTTON));

    engine.tick(100.0);
    assert_eq!(
        number(engine.effective_value(&tree, BUTTON, "font-size")),
        20.0
    );
    assert!(!engine.is_animating(BUTTON));
}
