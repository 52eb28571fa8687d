//! # Connection Tracker Module
//!
//! Reacts to attach/detach notifications from the host backend and owns
//! the single active device handle. Purely reactive: it never polls the
//! device itself.

use tracing::{debug, info};

use crate::controller::state::ControllerState;
use crate::host::{DeviceHandle, HapticCaps, HostEvent};

/// Holds the active device handle and the haptic capabilities probed at
/// connect time.
///
/// Single-slot model: a new connection silently replaces any previously
/// tracked handle. Disconnection synchronously resets the controller
/// state so no later frame can render stale inputs.
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    handle: Option<DeviceHandle>,
    caps: HapticCaps,
}

impl ConnectionTracker {
    /// Creates a tracker with no active device.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `handle` as the active device and marks the state connected.
    ///
    /// Also probes the device's haptic capability surfaces so the status
    /// display and the vibration test control reflect the new device.
    pub fn on_connect(&mut self, handle: DeviceHandle, state: &mut ControllerState) {
        self.caps = handle.haptic_caps().unwrap_or_default();
        info!(
            "Controller connected: {} (vibration: {})",
            handle.info().name,
            if self.caps.any() { "Yes" } else { "No" }
        );

        self.handle = Some(handle);
        state.connected = true;
    }

    /// Clears the active handle and resets all dependent state.
    ///
    /// The reset happens before this returns, so any frame sampled
    /// afterwards sees neutral inputs rather than the pre-disconnect
    /// values. A disconnect while already disconnected is a no-op.
    pub fn on_disconnect(&mut self, state: &mut ControllerState) {
        if self.handle.is_none() && !state.connected {
            debug!("Ignoring disconnect notification with no active device");
            return;
        }

        info!("Controller disconnected");
        self.handle = None;
        self.caps = HapticCaps::default();
        state.connected = false;
        state.reset();
    }

    /// Applies a host attach/detach notification.
    pub fn apply(&mut self, event: HostEvent, state: &mut ControllerState) {
        match event {
            HostEvent::Connected(handle) => self.on_connect(handle, state),
            HostEvent::Disconnected => self.on_disconnect(state),
        }
    }

    /// The currently tracked device, if any.
    #[must_use]
    pub fn handle(&self) -> Option<&DeviceHandle> {
        self.handle.as_ref()
    }

    /// Haptic capabilities probed from the current device.
    ///
    /// All-absent when disconnected.
    #[must_use]
    pub fn caps(&self) -> HapticCaps {
        self.caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::{buttons, ButtonState, StickPosition};
    use crate::host::mocks::MockPad;

    #[test]
    fn test_connect_sets_connected_and_handle() {
        let mut tracker = ConnectionTracker::new();
        let mut state = ControllerState::new();

        tracker.on_connect(MockPad::new().handle(), &mut state);

        assert!(state.connected);
        assert!(tracker.handle().is_some());
    }

    #[test]
    fn test_connect_probes_caps() {
        let mut tracker = ConnectionTracker::new();
        let mut state = ControllerState::new();
        let pad = MockPad::with_caps(HapticCaps {
            legacy_vibrate: true,
            ..Default::default()
        });

        tracker.on_connect(pad.handle(), &mut state);
        assert!(tracker.caps().any());
        assert!(tracker.caps().legacy_vibrate);
    }

    #[test]
    fn test_connect_replaces_previous_handle() {
        let mut tracker = ConnectionTracker::new();
        let mut state = ControllerState::new();

        let first = MockPad::new();
        let second = MockPad::with_caps(HapticCaps {
            play_effect: true,
            ..Default::default()
        });

        tracker.on_connect(first.handle(), &mut state);
        tracker.on_connect(second.handle(), &mut state);

        assert!(state.connected);
        // Caps come from the replacement device
        assert!(tracker.caps().play_effect);
    }

    #[test]
    fn test_disconnect_resets_state_synchronously() {
        let mut tracker = ConnectionTracker::new();
        let mut state = ControllerState::new();

        tracker.on_connect(MockPad::new().handle(), &mut state);
        state.buttons[buttons::CROSS] = ButtonState { pressed: true, value: 1.0 };
        state.sticks.left = StickPosition { x: 0.8, y: -0.3 };
        state.triggers.left = 0.9;

        tracker.on_disconnect(&mut state);

        assert!(!state.connected);
        assert!(tracker.handle().is_none());
        assert!(!state.buttons[buttons::CROSS].pressed);
        assert_eq!(state.sticks.left, StickPosition::default());
        assert_eq!(state.triggers.left, 0.0);
    }

    #[test]
    fn test_disconnect_clears_caps() {
        let mut tracker = ConnectionTracker::new();
        let mut state = ControllerState::new();
        let pad = MockPad::with_caps(HapticCaps {
            play_effect: true,
            ..Default::default()
        });

        tracker.on_connect(pad.handle(), &mut state);
        tracker.on_disconnect(&mut state);

        assert!(!tracker.caps().any());
    }

    #[test]
    fn test_disconnect_when_already_disconnected_is_noop() {
        let mut tracker = ConnectionTracker::new();
        let mut state = ControllerState::new();

        tracker.on_disconnect(&mut state);

        assert!(!state.connected);
        assert!(tracker.handle().is_none());
    }

    #[test]
    fn test_apply_routes_events() {
        let mut tracker = ConnectionTracker::new();
        let mut state = ControllerState::new();

        tracker.apply(HostEvent::Connected(MockPad::new().handle()), &mut state);
        assert!(state.connected);

        tracker.apply(HostEvent::Disconnected, &mut state);
        assert!(!state.connected);
    }
}
