//! Style values and interpolation.

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ColorRGBA {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl ColorRGBA {
    pub const TRANSPARENT: Self = Self {
        red: 0,
        green: 0,
        blue: 0,
        alpha: 0,
    };

    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }
}

/// A declared or effective property value. The stylesheet parser (a
/// collaborator, not part of this engine) produces these.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    Number(f32),
    Color(ColorRGBA),
    Keyword(String),
    Flag(bool),
}

impl StyleValue {
    /// Numbers and colors can be blended over time; keywords and flags
    /// always switch instantly.
    pub fn is_interpolable_with(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Number(_), Self::Number(_)) | (Self::Color(_), Self::Color(_))
        )
    }
}

/// Blend `start` toward `end` at eased progress `progress` in `[0, 1]`.
/// Non-interpolable pairs resolve to `end`.
pub fn interpolate(start: &StyleValue, end: &StyleValue, progress: f32) -> StyleValue {
    let progress = progress.clamp(0.0, 1.0);
    match (start, end) {
        (StyleValue::Number(from), StyleValue::Number(to)) => {
            StyleValue::Number(from + (to - from) * progress)
        }
        (StyleValue::Color(from), StyleValue::Color(to)) => {
            StyleValue::Color(interpolate_color(*from, *to, progress))
        }
        _ => end.clone(),
    }
}

fn interpolate_color(from: ColorRGBA, to: ColorRGBA, progress: f32) -> ColorRGBA {
    let lerp = |from_channel: u8, to_channel: u8| -> u8 {
        let blended =
            f32::from(from_channel) + (f32::from(to_channel) - f32::from(from_channel)) * progress;
        blended.round().clamp(0.0, 255.0) as u8
    };
    ColorRGBA {
        red: lerp(from.red, to.red),
        green: lerp(from.green, to.green),
        blue: lerp(from.blue, to.blue),
        alpha: lerp(from.alpha, to.alpha),
    }
}
