//! # Visual Frame Module
//!
//! Composes the full per-frame visual output from the controller state
//! and delivers it to a [`RenderSink`]. Delivery is element-by-element:
//! one failing element is skipped without aborting the rest of the
//! frame's updates.

use tracing::trace;

use crate::controller::state::{buttons, ControllerState, BUTTON_NAMES};
use crate::error::Result;
use crate::host::HapticCaps;
use crate::visual::stick::{preview_dot, stick_indicator, PreviewDot, StickIndicator};
use crate::visual::trigger::{trigger_visual, TriggerVisual};

/// Axis readouts shown in the diagnostics table (two sticks, x and y).
pub const AXIS_COUNT: usize = 4;

/// Axis magnitudes above this mark the readout as active.
pub const AXIS_ACTIVE_THRESHOLD: f32 = 0.1;

/// Which physical stick or trigger an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One button's visual: highlight flag plus a numeric readout.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonVisual {
    /// Symbolic element name from the fixed index table.
    pub name: &'static str,
    /// Highlight engaged iff the button is pressed.
    pub active: bool,
    /// Analog value formatted to 2 decimals.
    pub value_text: String,
}

/// One axis row in the diagnostics table.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisReadout {
    /// Raw value formatted to 5 decimals.
    pub value_text: String,
    /// True when the magnitude exceeds [`AXIS_ACTIVE_THRESHOLD`].
    pub active: bool,
}

/// Connection and haptics status lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPanel {
    /// "Yes" while a device is connected.
    pub connected_text: &'static str,
    /// "Yes" while the device exposes any haptic surface.
    pub vibration_text: &'static str,
    /// Whether the vibration test control accepts input.
    pub test_enabled: bool,
}

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualFrame {
    pub status: StatusPanel,
    pub buttons: Vec<ButtonVisual>,
    pub axes: [AxisReadout; AXIS_COUNT],
    pub left_stick: StickIndicator,
    pub right_stick: StickIndicator,
    pub left_preview: PreviewDot,
    pub right_preview: PreviewDot,
    pub left_trigger: TriggerVisual,
    pub right_trigger: TriggerVisual,
}

impl VisualFrame {
    /// Composes the visual output for the current state.
    ///
    /// A disconnected state composes to the neutral baseline, since the
    /// connection tracker zeroes all inputs on disconnect.
    #[must_use]
    pub fn compose(state: &ControllerState, caps: HapticCaps, test_ready: bool) -> Self {
        let yes_no = |flag: bool| if flag { "Yes" } else { "No" };

        let button_visuals = state
            .buttons
            .iter()
            .enumerate()
            .map(|(index, button)| ButtonVisual {
                name: BUTTON_NAMES[index],
                active: button.pressed,
                value_text: format!("{:.2}", button.value),
            })
            .collect();

        let axis_values = [
            state.sticks.left.x,
            state.sticks.left.y,
            state.sticks.right.x,
            state.sticks.right.y,
        ];
        let axes = axis_values.map(|value| AxisReadout {
            value_text: format!("{:.5}", value),
            active: value.abs() > AXIS_ACTIVE_THRESHOLD,
        });

        let left_clicked = state.buttons[buttons::LEFT_STICK].pressed;
        let right_clicked = state.buttons[buttons::RIGHT_STICK].pressed;

        Self {
            status: StatusPanel {
                connected_text: yes_no(state.connected),
                vibration_text: yes_no(caps.any()),
                test_enabled: state.connected && caps.any() && test_ready,
            },
            buttons: button_visuals,
            axes,
            left_stick: stick_indicator(state.sticks.left, left_clicked),
            right_stick: stick_indicator(state.sticks.right, right_clicked),
            left_preview: preview_dot(state.sticks.left, left_clicked),
            right_preview: preview_dot(state.sticks.right, right_clicked),
            left_trigger: trigger_visual(state.triggers.left),
            right_trigger: trigger_visual(state.triggers.right),
        }
    }
}

/// Presentation-layer boundary receiving per-element updates.
///
/// Implementations may fail on individual elements, e.g. when a rendering
/// target is missing; [`present`] tolerates that per element.
pub trait RenderSink {
    /// Update the connection/haptics status lines.
    ///
    /// # Errors
    ///
    /// Returns error when the status elements cannot be updated.
    fn status(&mut self, status: &StatusPanel) -> Result<()>;

    /// Update one button highlight and value readout.
    ///
    /// # Errors
    ///
    /// Returns error when the element for this index is missing.
    fn button(&mut self, index: usize, visual: &ButtonVisual) -> Result<()>;

    /// Update one axis readout row.
    ///
    /// # Errors
    ///
    /// Returns error when the element for this index is missing.
    fn axis(&mut self, index: usize, readout: &AxisReadout) -> Result<()>;

    /// Update a full-size stick indicator.
    ///
    /// # Errors
    ///
    /// Returns error when the stick elements are missing.
    fn stick(&mut self, side: Side, indicator: &StickIndicator) -> Result<()>;

    /// Update a compact preview dot.
    ///
    /// # Errors
    ///
    /// Returns error when the preview elements are missing.
    fn preview(&mut self, side: Side, dot: &PreviewDot) -> Result<()>;

    /// Update a trigger fill bar and background.
    ///
    /// # Errors
    ///
    /// Returns error when the trigger elements are missing.
    fn trigger(&mut self, side: Side, visual: &TriggerVisual) -> Result<()>;
}

/// Delivers a composed frame to the sink, element by element.
///
/// A failing element is skipped with a trace log; one missing visual must
/// never block updates to the others. Nothing propagates out of the
/// frame loop.
pub fn present(frame: &VisualFrame, sink: &mut dyn RenderSink) {
    if let Err(e) = sink.status(&frame.status) {
        trace!("Skipping status update: {}", e);
    }

    for (index, visual) in frame.buttons.iter().enumerate() {
        if let Err(e) = sink.button(index, visual) {
            trace!("Skipping button {} update: {}", index, e);
        }
    }

    for (index, readout) in frame.axes.iter().enumerate() {
        if let Err(e) = sink.axis(index, readout) {
            trace!("Skipping axis {} update: {}", index, e);
        }
    }

    let sticks = [
        (Side::Left, &frame.left_stick),
        (Side::Right, &frame.right_stick),
    ];
    for (side, indicator) in sticks {
        if let Err(e) = sink.stick(side, indicator) {
            trace!("Skipping {:?} stick update: {}", side, e);
        }
    }

    let previews = [
        (Side::Left, &frame.left_preview),
        (Side::Right, &frame.right_preview),
    ];
    for (side, dot) in previews {
        if let Err(e) = sink.preview(side, dot) {
            trace!("Skipping {:?} preview update: {}", side, e);
        }
    }

    let triggers = [
        (Side::Left, &frame.left_trigger),
        (Side::Right, &frame.right_trigger),
    ];
    for (side, visual) in triggers {
        if let Err(e) = sink.trigger(side, visual) {
            trace!("Skipping {:?} trigger update: {}", side, e);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::MockSink;
    use super::*;
    use crate::controller::state::{ButtonState, StickPosition, BUTTON_COUNT};

    fn connected_state() -> ControllerState {
        let mut state = ControllerState::new();
        state.connected = true;
        state
    }

    fn any_caps() -> HapticCaps {
        HapticCaps {
            play_effect: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_compose_status_texts() {
        let frame = VisualFrame::compose(&connected_state(), any_caps(), true);
        assert_eq!(frame.status.connected_text, "Yes");
        assert_eq!(frame.status.vibration_text, "Yes");
        assert!(frame.status.test_enabled);

        let frame = VisualFrame::compose(&ControllerState::new(), HapticCaps::default(), true);
        assert_eq!(frame.status.connected_text, "No");
        assert_eq!(frame.status.vibration_text, "No");
        assert!(!frame.status.test_enabled);
    }

    #[test]
    fn test_test_control_disabled_during_cooldown() {
        let frame = VisualFrame::compose(&connected_state(), any_caps(), false);
        assert!(!frame.status.test_enabled);
    }

    #[test]
    fn test_compose_button_values_two_decimals() {
        let mut state = connected_state();
        state.buttons[buttons::L2] = ButtonState { pressed: true, value: 0.456 };

        let frame = VisualFrame::compose(&state, any_caps(), true);
        assert_eq!(frame.buttons.len(), BUTTON_COUNT);
        assert_eq!(frame.buttons[buttons::L2].name, "l2");
        assert_eq!(frame.buttons[buttons::L2].value_text, "0.46");
        assert!(frame.buttons[buttons::L2].active);
        assert!(!frame.buttons[buttons::CROSS].active);
    }

    #[test]
    fn test_compose_axis_readouts() {
        let mut state = connected_state();
        state.sticks.left = StickPosition { x: 0.25, y: -0.05 };
        state.sticks.right = StickPosition { x: 0.0, y: 1.0 };

        let frame = VisualFrame::compose(&state, any_caps(), true);
        assert_eq!(frame.axes[0].value_text, "0.25000");
        assert!(frame.axes[0].active);
        // Magnitude 0.05 is under the 0.1 activity threshold
        assert_eq!(frame.axes[1].value_text, "-0.05000");
        assert!(!frame.axes[1].active);
        assert!(!frame.axes[2].active);
        assert!(frame.axes[3].active);
    }

    #[test]
    fn test_compose_stick_ring_from_click_buttons() {
        let mut state = connected_state();
        state.buttons[buttons::LEFT_STICK] = ButtonState { pressed: true, value: 1.0 };

        let frame = VisualFrame::compose(&state, any_caps(), true);
        assert!(frame.left_stick.ring_active);
        assert!(frame.left_preview.ring_active);
        assert!(!frame.right_stick.ring_active);
        assert!(!frame.right_preview.ring_active);
    }

    #[test]
    fn test_compose_after_disconnect_is_neutral() {
        let mut state = connected_state();
        state.sticks.left = StickPosition { x: 1.0, y: 1.0 };
        state.triggers.right = 1.0;

        // Tracker-style disconnect: flag cleared, inputs reset
        state.connected = false;
        state.reset();

        let frame = VisualFrame::compose(&state, HapticCaps::default(), true);
        assert_eq!(frame.status.connected_text, "No");
        assert!(!frame.left_stick.line_visible);
        assert_eq!(frame.left_stick.offset_x, 0.0);
        assert!(!frame.right_trigger.active);
        assert_eq!(frame.right_trigger.fill_percent, 0.0);
        assert!(frame.buttons.iter().all(|b| !b.active));
    }

    #[test]
    fn test_present_delivers_every_element() {
        let frame = VisualFrame::compose(&connected_state(), any_caps(), true);
        let mut sink = MockSink::new();

        present(&frame, &mut sink);

        assert_eq!(sink.statuses.len(), 1);
        assert_eq!(sink.buttons.len(), BUTTON_COUNT);
        assert_eq!(sink.axes.len(), AXIS_COUNT);
        assert_eq!(sink.sticks.len(), 2);
        assert_eq!(sink.previews.len(), 2);
        assert_eq!(sink.triggers.len(), 2);
    }

    #[test]
    fn test_present_skips_missing_element_without_aborting() {
        let frame = VisualFrame::compose(&connected_state(), any_caps(), true);
        let mut sink = MockSink::new();
        sink.missing_button = Some(5);

        present(&frame, &mut sink);

        // The failing element is skipped, everything else still updates
        assert_eq!(sink.buttons.len(), BUTTON_COUNT - 1);
        assert!(sink.buttons.iter().all(|(index, _)| *index != 5));
        assert_eq!(sink.triggers.len(), 2);
        assert_eq!(sink.statuses.len(), 1);
    }
}
