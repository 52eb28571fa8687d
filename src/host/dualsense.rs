//! # DualSense Backend Module
//!
//! Linux evdev backend for the host boundary: PS5 DualSense discovery,
//! snapshot polling, and force-feedback rumble.
//!
//! ## Controller Detection
//!
//! The DualSense controller is identified by:
//! - Vendor ID: 0x054c (Sony)
//! - Product ID: 0x0ce6 (DualSense, both wired and Bluetooth)
//!
//! ## Input Mapping
//!
//! | Snapshot entry | evdev source | Raw range |
//! |----------------|--------------|-----------|
//! | Axes 0,1 (left stick) | ABS_X, ABS_Y | 0-255 |
//! | Axes 2,3 (right stick) | ABS_Z, ABS_RZ | 0-255 |
//! | Buttons 6,7 value (triggers) | ABS_RX, ABS_RY | 0-255 |
//! | Buttons 12-15 (d-pad) | ABS_HAT0X, ABS_HAT0Y | -1/0/1 |
//! | Remaining buttons | BTN_* key state | pressed |
//!
//! Stick axes are normalized to [-1, 1] and triggers to [0, 1] so the
//! rest of the crate never sees raw evdev units. The kernel's rumble
//! force-feedback surface backs the play-effect haptics tier; the
//! actuator-list and legacy tiers are not exposed by evdev and report
//! absent.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use evdev::{
    AbsoluteAxisType, Device, FFEffect, FFEffectData, FFEffectKind, FFEffectType, FFReplay,
    FFTrigger, Key,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::{PadProbeError, Result};
use crate::host::{
    ButtonSnapshot, DeviceHandle, DeviceInfo, GamepadDevice, GamepadHost, GamepadSnapshot,
    HapticCaps, HostEvent, RumbleEffect,
};

/// PS5 DualSense vendor ID (Sony)
const DUALSENSE_VENDOR_ID: u16 = 0x054c;

/// PS5 DualSense product ID (wired and Bluetooth)
const DUALSENSE_PRODUCT_ID: u16 = 0x0ce6;

/// Raw stick/trigger axis maximum reported by the DualSense.
const RAW_AXIS_MAX: i32 = 255;

/// Capacity of the attach/detach notification channel.
const EVENT_CHANNEL_SIZE: usize = 16;

/// Key codes for the digital buttons, in snapshot index order. The d-pad
/// entries (12-15) come from the hat axes instead and are `None` here.
const BUTTON_KEYS: [Option<Key>; 17] = [
    Some(Key::BTN_SOUTH),  // 0: cross
    Some(Key::BTN_EAST),   // 1: circle
    Some(Key::BTN_WEST),   // 2: square
    Some(Key::BTN_NORTH),  // 3: triangle
    Some(Key::BTN_TL),     // 4: l1
    Some(Key::BTN_TR),     // 5: r1
    Some(Key::BTN_TL2),    // 6: l2
    Some(Key::BTN_TR2),    // 7: r2
    Some(Key::BTN_SELECT), // 8: share
    Some(Key::BTN_START),  // 9: options
    Some(Key::BTN_THUMBL), // 10: left stick click
    Some(Key::BTN_THUMBR), // 11: right stick click
    None,                  // 12: dpad-up
    None,                  // 13: dpad-down
    None,                  // 14: dpad-left
    None,                  // 15: dpad-right
    Some(Key::BTN_MODE),   // 16: ps
];

/// A DualSense controller opened through evdev.
///
/// Kept behind a [`DeviceHandle`] mutex, so the frame loop, the scan
/// task, and a spawned vibration test can share it.
pub struct DualSensePad {
    device: Device,
    path: String,
    /// Last uploaded rumble effect; dropping it erases it from the kernel.
    effect: Option<FFEffect>,
}

impl DualSensePad {
    /// Opens the controller at an explicit event device path.
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::open(path)
            .map_err(|e| PadProbeError::Host(format!("Failed to open {}: {}", path.display(), e)))?;

        let id = device.input_id();
        if id.vendor() != DUALSENSE_VENDOR_ID || id.product() != DUALSENSE_PRODUCT_ID {
            warn!(
                "Device at {} is not a DualSense (vendor: 0x{:04x}, product: 0x{:04x})",
                path.display(),
                id.vendor(),
                id.product()
            );
        }

        Ok(Self {
            device,
            path: path.to_string_lossy().to_string(),
            effect: None,
        })
    }

    /// Scans `/dev/input` for the first connected DualSense controller.
    ///
    /// Returns `Ok(None)` when no controller is present; an empty system
    /// is a normal condition for the tester, not an error.
    ///
    /// # Errors
    ///
    /// Returns error if `/dev/input` itself cannot be read.
    pub fn scan() -> Result<Option<Self>> {
        let input_dir = Path::new("/dev/input");
        if !input_dir.exists() {
            return Err(PadProbeError::Host(
                "/dev/input directory not found".to_string(),
            ));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| PadProbeError::Host(format!("Failed to read /dev/input: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| PadProbeError::Host(format!("Failed to read directory entry: {}", e)))?;

        // Sort entries for deterministic device selection when multiple
        // controllers are connected
        entries.sort_by_key(std::fs::DirEntry::path);

        for entry in entries {
            let path = entry.path();

            let Some(filename) = path.file_name() else {
                continue;
            };
            if !filename.to_string_lossy().starts_with("event") {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    let id = device.input_id();
                    debug!(
                        "Found input device: {} (vendor: 0x{:04x}, product: 0x{:04x})",
                        path.display(),
                        id.vendor(),
                        id.product()
                    );

                    if id.vendor() == DUALSENSE_VENDOR_ID && id.product() == DUALSENSE_PRODUCT_ID {
                        info!("Found PS5 DualSense controller at: {}", path.display());
                        return Ok(Some(Self {
                            device,
                            path: path.to_string_lossy().to_string(),
                            effect: None,
                        }));
                    }
                }
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Ok(None)
    }

    /// Discovers a controller per the configuration: an explicit path
    /// when set, otherwise a scan.
    fn discover(device_path: &str) -> Result<Option<Self>> {
        if device_path.is_empty() {
            Self::scan()
        } else {
            Self::open(device_path).map(Some)
        }
    }
}

/// Normalizes a raw 0-255 stick axis to [-1, 1].
fn axis_to_unit(raw: i32) -> f32 {
    (raw as f32 / RAW_AXIS_MAX as f32) * 2.0 - 1.0
}

/// Normalizes a raw 0-255 trigger axis to [0, 1].
fn trigger_to_unit(raw: i32) -> f32 {
    raw as f32 / RAW_AXIS_MAX as f32
}

impl GamepadDevice for DualSensePad {
    fn info(&self) -> DeviceInfo {
        let id = self.device.input_id();
        DeviceInfo {
            name: self
                .device
                .name()
                .unwrap_or("Unknown controller")
                .to_string(),
            vendor_id: id.vendor(),
            product_id: id.product(),
            path: self.path.clone(),
        }
    }

    fn poll(&mut self) -> Result<GamepadSnapshot> {
        let keys = self.device.get_key_state()?;
        let abs = self.device.get_abs_state()?;

        let abs_value = |axis: AbsoluteAxisType| abs[axis.0 as usize].value;

        let hat_x = abs_value(AbsoluteAxisType::ABS_HAT0X);
        let hat_y = abs_value(AbsoluteAxisType::ABS_HAT0Y);
        let trigger_left = trigger_to_unit(abs_value(AbsoluteAxisType::ABS_RX));
        let trigger_right = trigger_to_unit(abs_value(AbsoluteAxisType::ABS_RY));

        let buttons = BUTTON_KEYS
            .iter()
            .enumerate()
            .map(|(index, key)| {
                let pressed = match (index, key) {
                    (12, None) => hat_y < 0,
                    (13, None) => hat_y > 0,
                    (14, None) => hat_x < 0,
                    (15, None) => hat_x > 0,
                    (_, Some(key)) => keys.contains(*key),
                    (_, None) => false,
                };
                let value = match index {
                    6 => trigger_left,
                    7 => trigger_right,
                    _ if pressed => 1.0,
                    _ => 0.0,
                };
                ButtonSnapshot { pressed, value }
            })
            .collect();

        let axes = vec![
            axis_to_unit(abs_value(AbsoluteAxisType::ABS_X)),
            axis_to_unit(abs_value(AbsoluteAxisType::ABS_Y)),
            axis_to_unit(abs_value(AbsoluteAxisType::ABS_Z)),
            axis_to_unit(abs_value(AbsoluteAxisType::ABS_RZ)),
        ];

        Ok(GamepadSnapshot { buttons, axes })
    }

    fn haptic_caps(&self) -> HapticCaps {
        let play_effect = self
            .device
            .supported_ff()
            .is_some_and(|ff| ff.contains(FFEffectType::FF_RUMBLE));

        // evdev exposes exactly one haptics surface; the actuator-list
        // and legacy tiers stay absent
        HapticCaps {
            play_effect,
            actuator_count: 0,
            legacy_vibrate: false,
        }
    }

    fn start_effect(&mut self, effect: &RumbleEffect) -> Result<()> {
        let to_magnitude = |level: f64| (level.clamp(0.0, 1.0) * f64::from(u16::MAX)) as u16;

        let data = FFEffectData {
            direction: 0,
            trigger: FFTrigger {
                button: 0,
                interval: 0,
            },
            replay: FFReplay {
                length: effect.duration_ms.min(u64::from(u16::MAX)) as u16,
                delay: 0,
            },
            kind: FFEffectKind::Rumble {
                strong_magnitude: to_magnitude(effect.strong),
                weak_magnitude: to_magnitude(effect.weak),
            },
        };

        let mut uploaded = self
            .device
            .upload_ff_effect(data)
            .map_err(|e| PadProbeError::Vibration(format!("Failed to upload effect: {}", e)))?;
        uploaded
            .play(1)
            .map_err(|e| PadProbeError::Vibration(format!("Failed to play effect: {}", e)))?;

        // Keep the handle so the kernel does not erase a running effect
        self.effect = Some(uploaded);
        Ok(())
    }

    fn start_actuator_pulse(&mut self, _actuator: usize, _effect: &RumbleEffect) -> Result<()> {
        Err(PadProbeError::Vibration(
            "haptic actuator list not exposed by evdev".to_string(),
        ))
    }

    fn legacy_vibrate(&mut self, _strong: f64, _weak: f64, _duration_ms: u64) -> Result<()> {
        Err(PadProbeError::Vibration(
            "legacy vibrate not exposed by evdev".to_string(),
        ))
    }
}

/// Host view backed by the background scan task.
#[derive(Clone)]
pub struct DualSenseHost {
    slot0: Arc<Mutex<Option<DeviceHandle>>>,
}

impl GamepadHost for DualSenseHost {
    fn device(&self, slot: usize) -> Option<DeviceHandle> {
        if slot != 0 {
            return None;
        }
        self.slot0.lock().ok().and_then(|guard| guard.clone())
    }
}

/// Starts the backend: a scan task that maintains slot 0 and delivers
/// attach/detach notifications.
///
/// Discovery and liveness run on the configured scan interval. A failed
/// poll on the tracked device clears the slot and emits
/// [`HostEvent::Disconnected`]; a successful discovery fills it and emits
/// [`HostEvent::Connected`].
#[must_use]
pub fn spawn(config: ControllerConfig) -> (DualSenseHost, mpsc::Receiver<HostEvent>) {
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
    let host = DualSenseHost {
        slot0: Arc::new(Mutex::new(None)),
    };

    let slot0 = Arc::clone(&host.slot0);
    tokio::spawn(async move {
        let mut scan_interval =
            tokio::time::interval(Duration::from_millis(config.scan_interval_ms));

        loop {
            scan_interval.tick().await;

            let current = slot0.lock().ok().and_then(|guard| guard.clone());
            match current {
                Some(handle) => {
                    // Liveness check; unplugged devices fail the ioctl
                    if let Err(e) = handle.poll() {
                        debug!("Tracked device no longer readable: {}", e);
                        if let Ok(mut guard) = slot0.lock() {
                            *guard = None;
                        }
                        if event_tx.send(HostEvent::Disconnected).await.is_err() {
                            break;
                        }
                    }
                }
                None => match DualSensePad::discover(&config.device_path) {
                    Ok(Some(pad)) => {
                        let handle = DeviceHandle::new(Box::new(pad));
                        if let Ok(mut guard) = slot0.lock() {
                            *guard = Some(handle.clone());
                        }
                        if event_tx.send(HostEvent::Connected(handle)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => debug!("Controller discovery failed: {}", e),
                },
            }
        }
    });

    (host, event_rx)
}
