//! # Frame Sampler Module
//!
//! Per-frame read of the live device into [`ControllerState`].
//!
//! Each call takes a direct, instantaneous snapshot: every button and axis
//! is overwritten wholesale, with no smoothing, debouncing, or hysteresis.
//! The tester exists to show exactly what the hardware reports.

use tracing::debug;

use crate::controller::state::{buttons, ButtonState, ControllerState, StickPosition};
use crate::host::{GamepadHost, GamepadSnapshot};

/// Samples the device at slot 0 into `state`.
///
/// No-op when the tracker has not marked the state connected, or when the
/// host has no live entry at slot 0. The tracked handle and the live slot
/// can disagree transiently; an empty slot means "nothing to sample this
/// frame", never an implicit disconnect. Only the connection tracker's
/// explicit notification changes `connected`.
///
/// A failed device read also skips the frame without mutating state.
pub fn sample_frame(host: &dyn GamepadHost, state: &mut ControllerState) {
    if !state.connected {
        return;
    }

    let Some(handle) = host.device(0) else {
        debug!("No live device at slot 0, skipping frame");
        return;
    };

    match handle.poll() {
        Ok(snapshot) => apply_snapshot(&snapshot, state),
        Err(e) => debug!("Device read failed, skipping frame: {}", e),
    }
}

/// Overwrites every input field of `state` from a raw device snapshot.
///
/// Device buttons beyond the 17 known indices are ignored; indices the
/// device does not report default to released/zero. Axis and trigger
/// values are stored raw, with no clamping.
fn apply_snapshot(snapshot: &GamepadSnapshot, state: &mut ControllerState) {
    for (index, slot) in state.buttons.iter_mut().enumerate() {
        let button = snapshot.buttons.get(index).copied().unwrap_or_default();
        *slot = ButtonState { pressed: button.pressed, value: button.value };
    }

    let axis = |index: usize| snapshot.axes.get(index).copied().unwrap_or(0.0);
    state.sticks.left = StickPosition { x: axis(0), y: axis(1) };
    state.sticks.right = StickPosition { x: axis(2), y: axis(3) };

    state.triggers.left = snapshot
        .buttons
        .get(buttons::L2)
        .map_or(0.0, |button| button.value);
    state.triggers.right = snapshot
        .buttons
        .get(buttons::R2)
        .map_or(0.0, |button| button.value);
}
