//! # Host Platform Boundary
//!
//! Traits describing what the host platform provides to the tester: live
//! slot queries, per-device state snapshots, haptic capability surfaces, and
//! attach/detach notifications. The rest of the crate only sees these
//! traits; `dualsense` supplies the Linux evdev backend.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{PadProbeError, Result};

pub mod dualsense;

/// Identity of a device as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub path: String,
}

/// One button's live value inside a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ButtonSnapshot {
    pub pressed: bool,
    /// Analog pressure in [0, 1]; 0.0 or 1.0 for digital buttons
    pub value: f32,
}

/// Raw device state captured by a single poll
///
/// Buttons and axes are in device order; consumers decide how many entries
/// they care about.
#[derive(Debug, Clone, Default)]
pub struct GamepadSnapshot {
    pub buttons: Vec<ButtonSnapshot>,
    pub axes: Vec<f32>,
}

/// Haptic surfaces a device exposes, in fallback priority order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HapticCaps {
    /// Structured dual-rumble play-effect surface
    pub play_effect: bool,

    /// Number of addressable haptic actuators
    pub actuator_count: usize,

    /// Legacy single-call vibrate surface
    pub legacy_vibrate: bool,
}

impl HapticCaps {
    /// True when at least one surface is present
    #[must_use]
    pub fn any(&self) -> bool {
        self.play_effect || self.actuator_count > 0 || self.legacy_vibrate
    }
}

/// A dual-rumble request passed to a device surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RumbleEffect {
    pub duration_ms: u64,

    /// Strong (low-frequency) motor magnitude in [0, 1]
    pub strong: f64,

    /// Weak (high-frequency) motor magnitude in [0, 1]
    pub weak: f64,
}

/// Live controller device behind a [`DeviceHandle`]
///
/// Vibration methods only start the hardware action and return immediately;
/// callers wait out the effect duration themselves.
pub trait GamepadDevice: Send {
    /// Host identity for this device
    fn info(&self) -> DeviceInfo;

    /// Read the current button/axis state
    ///
    /// # Errors
    ///
    /// Returns error if the underlying device read fails, e.g. after an
    /// unplug the host has not noticed yet.
    fn poll(&mut self) -> Result<GamepadSnapshot>;

    /// Report which haptic surfaces the device currently exposes
    fn haptic_caps(&self) -> HapticCaps;

    /// Start a structured dual-rumble effect
    ///
    /// # Errors
    ///
    /// Returns error if the surface is missing or the device rejects the
    /// effect.
    fn start_effect(&mut self, effect: &RumbleEffect) -> Result<()>;

    /// Start a pulse on one haptic actuator
    ///
    /// # Errors
    ///
    /// Returns error if the actuator index is out of range or the pulse
    /// cannot be started.
    fn start_actuator_pulse(&mut self, actuator: usize, effect: &RumbleEffect) -> Result<()>;

    /// Fire the legacy vibrate call
    ///
    /// # Errors
    ///
    /// Returns error if the surface is missing or the call fails.
    fn legacy_vibrate(&mut self, strong: f64, weak: f64, duration_ms: u64) -> Result<()>;
}

/// Cheaply cloneable reference to a live device
///
/// The frame loop and a spawned vibration test share one device through this
/// handle. The inner mutex is held only for the duration of a single
/// non-blocking device call, never across an await.
#[derive(Clone)]
pub struct DeviceHandle {
    info: DeviceInfo,
    device: Arc<Mutex<Box<dyn GamepadDevice>>>,
}

impl DeviceHandle {
    /// Wrap a device for shared use
    #[must_use]
    pub fn new(device: Box<dyn GamepadDevice>) -> Self {
        let info = device.info();
        Self {
            info,
            device: Arc::new(Mutex::new(device)),
        }
    }

    /// Host identity for this device
    #[must_use]
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Read the current button/axis state
    ///
    /// # Errors
    ///
    /// Returns error if the device read fails.
    pub fn poll(&self) -> Result<GamepadSnapshot> {
        self.lock()?.poll()
    }

    /// Report which haptic surfaces the device currently exposes
    ///
    /// # Errors
    ///
    /// Returns error if the handle's device is no longer usable.
    pub fn haptic_caps(&self) -> Result<HapticCaps> {
        Ok(self.lock()?.haptic_caps())
    }

    /// Start a structured dual-rumble effect
    ///
    /// # Errors
    ///
    /// Returns error if the surface is missing or the device rejects it.
    pub fn start_effect(&self, effect: &RumbleEffect) -> Result<()> {
        self.lock()?.start_effect(effect)
    }

    /// Start a pulse on one haptic actuator
    ///
    /// # Errors
    ///
    /// Returns error if the actuator index is out of range or the pulse
    /// cannot be started.
    pub fn start_actuator_pulse(&self, actuator: usize, effect: &RumbleEffect) -> Result<()> {
        self.lock()?.start_actuator_pulse(actuator, effect)
    }

    /// Fire the legacy vibrate call
    ///
    /// # Errors
    ///
    /// Returns error if the surface is missing or the call fails.
    pub fn legacy_vibrate(&self, strong: f64, weak: f64, duration_ms: u64) -> Result<()> {
        self.lock()?.legacy_vibrate(strong, weak, duration_ms)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Box<dyn GamepadDevice>>> {
        self.device
            .lock()
            .map_err(|_| PadProbeError::Host("device mutex poisoned".to_string()))
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle").field("info", &self.info).finish()
    }
}

/// Live view of the host's controller slots
pub trait GamepadHost: Send + Sync {
    /// Device currently occupying the given slot, if any
    fn device(&self, slot: usize) -> Option<DeviceHandle>;
}

/// Attach/detach notification delivered by a host backend
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A device appeared in slot 0
    Connected(DeviceHandle),

    /// The slot 0 device went away
    Disconnected,
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::io;

    /// Mock gamepad device for testing
    ///
    /// Clones share state, so tests keep a copy for assertions while a
    /// [`DeviceHandle`] owns another.
    #[derive(Clone)]
    pub struct MockPad {
        pub snapshot: Arc<Mutex<GamepadSnapshot>>,
        pub caps: Arc<Mutex<HapticCaps>>,
        pub poll_error: Arc<Mutex<Option<io::ErrorKind>>>,
        pub effect_calls: Arc<Mutex<Vec<RumbleEffect>>>,
        pub actuator_calls: Arc<Mutex<Vec<(usize, RumbleEffect)>>>,
        pub legacy_calls: Arc<Mutex<Vec<(f64, f64, u64)>>>,
        pub effect_error: Arc<Mutex<Option<io::ErrorKind>>>,
        pub actuator_error: Arc<Mutex<Option<io::ErrorKind>>>,
        pub legacy_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockPad {
        pub fn new() -> Self {
            Self {
                snapshot: Arc::new(Mutex::new(GamepadSnapshot::default())),
                caps: Arc::new(Mutex::new(HapticCaps::default())),
                poll_error: Arc::new(Mutex::new(None)),
                effect_calls: Arc::new(Mutex::new(Vec::new())),
                actuator_calls: Arc::new(Mutex::new(Vec::new())),
                legacy_calls: Arc::new(Mutex::new(Vec::new())),
                effect_error: Arc::new(Mutex::new(None)),
                actuator_error: Arc::new(Mutex::new(None)),
                legacy_error: Arc::new(Mutex::new(None)),
            }
        }

        pub fn with_caps(caps: HapticCaps) -> Self {
            let pad = Self::new();
            pad.set_caps(caps);
            pad
        }

        /// Wrap a clone of this mock in a shareable handle
        pub fn handle(&self) -> DeviceHandle {
            DeviceHandle::new(Box::new(self.clone()))
        }

        pub fn set_snapshot(&self, snapshot: GamepadSnapshot) {
            *self.snapshot.lock().unwrap() = snapshot;
        }

        pub fn set_caps(&self, caps: HapticCaps) {
            *self.caps.lock().unwrap() = caps;
        }

        pub fn set_poll_error(&self, error: io::ErrorKind) {
            *self.poll_error.lock().unwrap() = Some(error);
        }

        pub fn set_effect_error(&self, error: io::ErrorKind) {
            *self.effect_error.lock().unwrap() = Some(error);
        }

        pub fn set_actuator_error(&self, error: io::ErrorKind) {
            *self.actuator_error.lock().unwrap() = Some(error);
        }

        pub fn set_legacy_error(&self, error: io::ErrorKind) {
            *self.legacy_error.lock().unwrap() = Some(error);
        }

        pub fn get_effect_calls(&self) -> Vec<RumbleEffect> {
            self.effect_calls.lock().unwrap().clone()
        }

        pub fn get_actuator_calls(&self) -> Vec<(usize, RumbleEffect)> {
            self.actuator_calls.lock().unwrap().clone()
        }

        pub fn get_legacy_calls(&self) -> Vec<(f64, f64, u64)> {
            self.legacy_calls.lock().unwrap().clone()
        }
    }

    impl GamepadDevice for MockPad {
        fn info(&self) -> DeviceInfo {
            DeviceInfo {
                name: "Mock Pad".to_string(),
                vendor_id: 0x054c,
                product_id: 0x0ce6,
                path: "/dev/input/event-mock".to_string(),
            }
        }

        fn poll(&mut self) -> Result<GamepadSnapshot> {
            if let Some(error) = *self.poll_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock poll error").into());
            }
            Ok(self.snapshot.lock().unwrap().clone())
        }

        fn haptic_caps(&self) -> HapticCaps {
            *self.caps.lock().unwrap()
        }

        fn start_effect(&mut self, effect: &RumbleEffect) -> Result<()> {
            if let Some(error) = *self.effect_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock effect error").into());
            }
            self.effect_calls.lock().unwrap().push(*effect);
            Ok(())
        }

        fn start_actuator_pulse(&mut self, actuator: usize, effect: &RumbleEffect) -> Result<()> {
            if let Some(error) = *self.actuator_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock actuator error").into());
            }
            self.actuator_calls.lock().unwrap().push((actuator, *effect));
            Ok(())
        }

        fn legacy_vibrate(&mut self, strong: f64, weak: f64, duration_ms: u64) -> Result<()> {
            if let Some(error) = *self.legacy_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock legacy error").into());
            }
            self.legacy_calls.lock().unwrap().push((strong, weak, duration_ms));
            Ok(())
        }
    }

    /// Mock host with a single controllable slot
    #[derive(Clone)]
    pub struct MockHost {
        pub slot0: Arc<Mutex<Option<DeviceHandle>>>,
    }

    impl MockHost {
        pub fn new() -> Self {
            Self {
                slot0: Arc::new(Mutex::new(None)),
            }
        }

        pub fn set_device(&self, handle: Option<DeviceHandle>) {
            *self.slot0.lock().unwrap() = handle;
        }
    }

    impl GamepadHost for MockHost {
        fn device(&self, slot: usize) -> Option<DeviceHandle> {
            if slot != 0 {
                return None;
            }
            self.slot0.lock().unwrap().clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::{MockHost, MockPad};
    use super::*;

    #[test]
    fn test_haptic_caps_any() {
        assert!(!HapticCaps::default().any());
        assert!(HapticCaps { play_effect: true, ..Default::default() }.any());
        assert!(HapticCaps { actuator_count: 1, ..Default::default() }.any());
        assert!(HapticCaps { legacy_vibrate: true, ..Default::default() }.any());
    }

    #[test]
    fn test_handle_clones_share_device() {
        let pad = MockPad::new();
        let handle = pad.handle();
        let other = handle.clone();

        pad.set_snapshot(GamepadSnapshot {
            buttons: vec![ButtonSnapshot { pressed: true, value: 1.0 }],
            axes: vec![0.5],
        });

        let snapshot = other.poll().unwrap();
        assert_eq!(snapshot.buttons.len(), 1);
        assert!(snapshot.buttons[0].pressed);
        assert_eq!(snapshot.axes, vec![0.5]);
    }

    #[test]
    fn test_handle_poll_error_propagates() {
        let pad = MockPad::new();
        pad.set_poll_error(std::io::ErrorKind::BrokenPipe);

        let handle = pad.handle();
        assert!(handle.poll().is_err());
    }

    #[test]
    fn test_handle_info_matches_device() {
        let pad = MockPad::new();
        let handle = pad.handle();
        assert_eq!(handle.info().name, "Mock Pad");
        assert_eq!(handle.info().vendor_id, 0x054c);
    }

    #[test]
    fn test_mock_host_slot_query() {
        let host = MockHost::new();
        assert!(host.device(0).is_none());

        host.set_device(Some(MockPad::new().handle()));
        assert!(host.device(0).is_some());
        assert!(host.device(1).is_none());

        host.set_device(None);
        assert!(host.device(0).is_none());
    }
}
