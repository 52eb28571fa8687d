//! # Stick Visual Module
//!
//! Two independent renderings of the same raw stick data:
//!
//! - A full-size indicator with a dot offset up to 50 px and a line from
//!   center to dot. Unclamped: the design assumes device axes are already
//!   bounded to [-1, 1].
//! - A compact preview dot with a 22 px radius that IS clamped, guarding
//!   against diagonal travel exceeding the unit circle, with a gray tint
//!   that brightens with deflection.

use crate::controller::state::StickPosition;

/// Maximum dot offset of the full-size indicator, in pixels.
pub const STICK_MAX_OFFSET_PX: f32 = 50.0;

/// Line lengths at or below this are treated as "centered" and hidden,
/// suppressing visual noise from sensor jitter at rest.
pub const LINE_HIDE_THRESHOLD_PX: f32 = 1.0;

/// Radius of the compact preview dot's travel, in pixels.
pub const PREVIEW_MAX_PX: f32 = 22.0;

/// Deflection intensity at or below which the preview dot keeps its
/// baseline tint.
pub const PREVIEW_TINT_THRESHOLD: f32 = 0.1;

/// Baseline gray channel value of the preview dot.
pub const PREVIEW_BASE_GRAY: u8 = 26;

/// Gray channel gain added at full deflection.
pub const PREVIEW_GRAY_RANGE: f32 = 80.0;

/// Rendering parameters for the full-size stick indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickIndicator {
    /// Dot offset from center, in pixels. Unclamped.
    pub offset_x: f32,
    /// Dot offset from center, in pixels. Unclamped.
    pub offset_y: f32,
    /// Length of the center-to-dot line, in pixels.
    pub line_length: f32,
    /// Line rotation in degrees, from `atan2(offset_y, offset_x)`.
    pub line_angle_deg: f32,
    /// False when the stick is effectively centered.
    pub line_visible: bool,
    /// True while the stick-click button is held.
    pub ring_active: bool,
}

/// Rendering parameters for the compact preview dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewDot {
    /// Dot offset from center, clamped to [`PREVIEW_MAX_PX`].
    pub offset_x: f32,
    /// Dot offset from center, clamped to [`PREVIEW_MAX_PX`].
    pub offset_y: f32,
    /// Gray channel value for the dot tint.
    pub gray: u8,
    /// True while the stick-click button is held.
    pub ring_active: bool,
}

/// Maps a raw stick position to the full-size indicator.
///
/// # Examples
///
/// ```
/// use pad_probe::controller::state::StickPosition;
/// use pad_probe::visual::stick::stick_indicator;
///
/// let indicator = stick_indicator(StickPosition { x: 0.5, y: -0.5 }, false);
/// assert_eq!(indicator.offset_x, 25.0);
/// assert_eq!(indicator.offset_y, -25.0);
/// assert!(indicator.line_visible);
/// ```
#[must_use]
pub fn stick_indicator(position: StickPosition, clicked: bool) -> StickIndicator {
    let offset_x = position.x * STICK_MAX_OFFSET_PX;
    let offset_y = position.y * STICK_MAX_OFFSET_PX;
    let line_length = offset_x.hypot(offset_y);

    StickIndicator {
        offset_x,
        offset_y,
        line_length,
        line_angle_deg: offset_y.atan2(offset_x).to_degrees(),
        line_visible: line_length > LINE_HIDE_THRESHOLD_PX,
        ring_active: clicked,
    }
}

/// Maps a raw stick position to the compact preview dot.
///
/// The offset magnitude is capped at [`PREVIEW_MAX_PX`] while preserving
/// direction, so no input, including anomalous values beyond the unit
/// circle, can push the dot outside its ring.
#[must_use]
pub fn preview_dot(position: StickPosition, clicked: bool) -> PreviewDot {
    let mut offset_x = position.x * PREVIEW_MAX_PX;
    let mut offset_y = position.y * PREVIEW_MAX_PX;

    let length = offset_x.hypot(offset_y);
    if length > PREVIEW_MAX_PX {
        offset_x = offset_x / length * PREVIEW_MAX_PX;
        offset_y = offset_y / length * PREVIEW_MAX_PX;
    }

    let intensity = position.x.hypot(position.y).min(1.0);
    let gray = if intensity > PREVIEW_TINT_THRESHOLD {
        (f32::from(PREVIEW_BASE_GRAY) + intensity * PREVIEW_GRAY_RANGE).floor() as u8
    } else {
        PREVIEW_BASE_GRAY
    };

    PreviewDot {
        offset_x,
        offset_y,
        gray,
        ring_active: clicked,
    }
}
