//! Transition declarations and running animations.
//!
//! When a non-owned property's cascaded value changes, the engine asks
//! this module whether the change applies instantly or blends over
//! time. A transition declaration targets a property by exact name or
//! by one of a small fixed set of group names (`margin`, `padding`,
//! `border`).

use crate::value::{StyleValue, interpolate};

/// Easing curve applied to normalized progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimingFunction {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier(f32, f32, f32, f32),
}

impl TimingFunction {
    /// Apply the curve to linear progress in `[0, 1]`.
    pub fn evaluate(self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => progress,
            Self::Ease => cubic_bezier(progress, 0.25, 0.1, 0.25, 1.0),
            Self::EaseIn => cubic_bezier(progress, 0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => cubic_bezier(progress, 0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => cubic_bezier(progress, 0.42, 0.0, 0.58, 1.0),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(progress, x1, y1, x2, y2),
        }
    }
}

/// Evaluate a `cubic-bezier(x1, y1, x2, y2)` curve at input progress
/// `input`, using Newton-Raphson iteration to invert the x-curve before
/// sampling y.
fn cubic_bezier(input: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let sample_x = |param: f32| -> f32 {
        let sq = param * param;
        let cu = sq * param;
        3.0 * (1.0 - param) * (1.0 - param) * param * x1 + 3.0 * (1.0 - param) * sq * x2 + cu
    };
    let sample_dx = |param: f32| -> f32 {
        let lin = 3.0 * x1;
        let quad = 3.0 * (x2 - x1) - 3.0 * x1;
        let cub = 1.0 - 3.0 * x2 + 3.0 * x1;
        lin + 2.0 * quad * param + 3.0 * cub * param * param
    };

    let mut param = input;
    for _ in 0..8 {
        let error = sample_x(param) - input;
        let slope = sample_dx(param);
        if slope.abs() < 1e-7 {
            break;
        }
        param -= error / slope;
        param = param.clamp(0.0, 1.0);
    }

    let sq = param * param;
    let cu = sq * param;
    3.0 * (1.0 - param) * (1.0 - param) * param * y1 + 3.0 * (1.0 - param) * sq * y2 + cu
}

/// One declared transition: which property (or group) it covers and how
/// the blend runs.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionSpec {
    pub target: String,
    pub duration_ms: f32,
    pub delay_ms: f32,
    pub timing: TimingFunction,
}

impl TransitionSpec {
    pub fn new(target: impl Into<String>, duration_ms: f32, timing: TimingFunction) -> Self {
        Self {
            target: target.into(),
            duration_ms,
            delay_ms: 0.0,
            timing,
        }
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Whether a transition target (exact name or group name) covers a
/// longhand property. Unknown group names cover nothing.
pub fn target_covers(target: &str, property: &str) -> bool {
    if target == property {
        return true;
    }
    match target {
        "margin" => property.starts_with("margin-"),
        "padding" => property.starts_with("padding-"),
        "border" => {
            property == "border-color"
                || (property.starts_with("border-") && property.ends_with("-width"))
        }
        _ => false,
    }
}

/// First declared transition covering `property` with a usable
/// duration, if any.
pub fn find_transition<'specs>(
    catalog: &'specs [TransitionSpec],
    property: &str,
) -> Option<&'specs TransitionSpec> {
    catalog
        .iter()
        .find(|spec| spec.duration_ms > 0.0 && target_covers(&spec.target, property))
}

/// Outcome of a cascaded value change on one property.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionDecision {
    /// Old and new values are equal: no write, no side effect.
    Unchanged,
    ApplyImmediately,
    /// Blend using the given spec.
    Animate(TransitionSpec),
}

/// Decide how a property change is applied. `animatable` comes from the
/// property registry; the values must also be of an interpolable kind.
pub fn decide(
    animatable: bool,
    old_value: &StyleValue,
    new_value: &StyleValue,
    catalog: &[TransitionSpec],
    property: &str,
) -> TransitionDecision {
    if old_value == new_value {
        return TransitionDecision::Unchanged;
    }
    if !animatable || !old_value.is_interpolable_with(new_value) {
        return TransitionDecision::ApplyImmediately;
    }
    match find_transition(catalog, property) {
        Some(spec) => TransitionDecision::Animate(spec.clone()),
        None => TransitionDecision::ApplyImmediately,
    }
}

/// A running blend on one property. Created from the property's current
/// value so that superseding a live animation never snaps.
#[derive(Clone, Debug)]
pub struct Animation {
    pub property: &'static str,
    pub duration_ms: f32,
    pub delay_ms: f32,
    pub timing: TimingFunction,
    pub start: StyleValue,
    pub end: StyleValue,
    pub elapsed_ms: f32,
}

impl Animation {
    pub fn new(
        property: &'static str,
        spec: &TransitionSpec,
        start: StyleValue,
        end: StyleValue,
    ) -> Self {
        Self {
            property,
            duration_ms: spec.duration_ms,
            delay_ms: spec.delay_ms,
            timing: spec.timing,
            start,
            end,
            elapsed_ms: 0.0,
        }
    }

    /// Accumulate elapsed time. Returns true once the active time has
    /// reached the duration and the animation should finalize.
    pub fn advance(&mut self, delta_ms: f32) -> bool {
        self.elapsed_ms += delta_ms;
        self.elapsed_ms - self.delay_ms >= self.duration_ms
    }

    /// True while the delay phase holds the start value in place.
    pub fn in_delay(&self) -> bool {
        self.elapsed_ms < self.delay_ms
    }

    /// The value the property holds right now.
    pub fn current_value(&self) -> StyleValue {
        let active_ms = self.elapsed_ms - self.delay_ms;
        if active_ms <= 0.0 {
            return self.start.clone();
        }
        if active_ms >= self.duration_ms {
            return self.end.clone();
        }
        let eased = self.timing.evaluate(active_ms / self.duration_ms);
        interpolate(&self.start, &self.end, eased)
    }
}
