//! # Trigger Visual Module
//!
//! Fill-bar width and background color for the two analog triggers.

/// Trigger values at or below this are treated as released, ignoring
/// near-zero analog noise at rest.
pub const TRIGGER_PRESS_EPSILON: f32 = 0.02;

/// Background color at zero press (neutral gray).
pub const TRIGGER_BASE_RGB: Rgb = Rgb { r: 42, g: 42, b: 42 };

/// Background color at full press (accent blue).
pub const TRIGGER_ACCENT_RGB: Rgb = Rgb { r: 0, g: 120, b: 212 };

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Rendering parameters for one trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerVisual {
    /// Fill-bar width as a percentage of the bar, `value * 100`.
    pub fill_percent: f32,
    /// True when the press exceeds [`TRIGGER_PRESS_EPSILON`].
    pub active: bool,
    /// Interpolated background color; `None` when inactive.
    pub color: Option<Rgb>,
}

/// Maps a raw trigger value to its visual.
///
/// The background color interpolates per channel between the neutral gray
/// and the accent blue with intensity `min(value, 1.0)`. The fill width
/// uses the raw value uncapped.
///
/// # Examples
///
/// ```
/// use pad_probe::visual::trigger::{trigger_visual, TRIGGER_ACCENT_RGB};
///
/// let visual = trigger_visual(1.0);
/// assert_eq!(visual.fill_percent, 100.0);
/// assert_eq!(visual.color, Some(TRIGGER_ACCENT_RGB));
/// ```
#[must_use]
pub fn trigger_visual(value: f32) -> TriggerVisual {
    let active = value > TRIGGER_PRESS_EPSILON;
    let color = active.then(|| {
        let intensity = value.min(1.0);
        Rgb {
            r: lerp_channel(TRIGGER_BASE_RGB.r, TRIGGER_ACCENT_RGB.r, intensity),
            g: lerp_channel(TRIGGER_BASE_RGB.g, TRIGGER_ACCENT_RGB.g, intensity),
            b: lerp_channel(TRIGGER_BASE_RGB.b, TRIGGER_ACCENT_RGB.b, intensity),
        }
    });

    TriggerVisual {
        fill_percent: value * 100.0,
        active,
        color,
    }
}

fn lerp_channel(start: u8, end: u8, intensity: f32) -> u8 {
    (f32::from(start) + (f32::from(end) - f32::from(start)) * intensity).floor() as u8
}
