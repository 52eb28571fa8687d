//! # Haptics Module
//!
//! The vibration test: three mutually exclusive hardware capability
//! surfaces tried in a fixed priority order, falling through only on
//! failure or absence, never combining two.
//!
//! ## Fallback Tiers
//!
//! 1. **Play-effect actuator**: three sequential timed dual-rumble pulses
//!    (500 ms, 500 ms, 400 ms at full magnitude with 100 ms pauses), each
//!    awaited before the next starts.
//! 2. **Haptic-actuator list**: one 1000 ms full-magnitude pulse on the
//!    first actuator.
//! 3. **Legacy vibrate**: a single `(1.0, 1.0, 1000)` call.
//!
//! Only the first successful tier counts. Exhausting all three yields
//! [`PadProbeError::NoVibrationSupport`]. After every invocation the test
//! control stays disabled for a 2000 ms cool-down, preventing overlapping
//! vibration requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::error::{PadProbeError, Result};
use crate::host::{DeviceHandle, RumbleEffect};

/// Cool-down after each test before the control re-enables.
pub const COOLDOWN_MS: u64 = 2000;

/// Primary-tier pulse durations with the pause that follows each, in ms.
const PRIMARY_PULSES: [(u64, u64); 3] = [(500, 100), (500, 100), (400, 0)];

/// Fallback-tier pulse duration in ms (tiers 2 and 3).
const FALLBACK_PULSE_MS: u64 = 1000;

/// Full motor magnitude used by every tier.
const FULL_MAGNITUDE: f64 = 1.0;

/// Which capability surface produced the haptic feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VibrationTier {
    /// Structured play-effect actuator.
    PlayEffect,
    /// First entry of the haptic-actuator list.
    HapticActuator,
    /// Legacy single-call vibrate.
    Legacy,
}

impl VibrationTier {
    /// Human-readable tier name for status messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayEffect => "play-effect actuator",
            Self::HapticActuator => "haptic actuator",
            Self::Legacy => "legacy vibrate",
        }
    }
}

/// Runs the vibration fallback chain and owns the cool-down gate.
///
/// Cheaply cloneable; the frame loop keeps one clone to read readiness
/// while a spawned test task drives the chain. The chain tolerates the
/// device going away mid-sequence: a failing suspended step falls through
/// to the next tier instead of crashing anything.
#[derive(Debug, Clone)]
pub struct VibrationTester {
    ready: Arc<AtomicBool>,
}

impl Default for VibrationTester {
    fn default() -> Self {
        Self::new()
    }
}

impl VibrationTester {
    /// Creates a tester with the control enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether a test may be started right now.
    ///
    /// False while a test runs and for [`COOLDOWN_MS`] after it finishes,
    /// regardless of outcome.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Runs one vibration test against the device.
    ///
    /// Re-probes the capability surfaces first, then attempts the tiers
    /// in priority order. Returns the tier that succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`PadProbeError::Vibration`] when invoked during the
    /// cool-down, and [`PadProbeError::NoVibrationSupport`] when every
    /// tier is unsupported or has failed.
    pub async fn run(&self, handle: DeviceHandle) -> Result<VibrationTier> {
        if !self.ready.swap(false, Ordering::SeqCst) {
            return Err(PadProbeError::Vibration(
                "test already running or cooling down".to_string(),
            ));
        }

        let outcome = run_chain(&handle).await;
        match &outcome {
            Ok(tier) => info!("Vibration test completed via {}", tier.name()),
            Err(e) => warn!("Vibration test failed: {}", e),
        }

        // Re-enable after the cool-down without holding up the caller
        let ready = Arc::clone(&self.ready);
        tokio::spawn(async move {
            sleep(Duration::from_millis(COOLDOWN_MS)).await;
            ready.store(true, Ordering::SeqCst);
        });

        outcome
    }
}

/// Attempts each capability tier in priority order, short-circuiting on
/// the first success.
async fn run_chain(handle: &DeviceHandle) -> Result<VibrationTier> {
    let caps = handle.haptic_caps()?;

    if caps.play_effect {
        debug!("Trying play-effect actuator");
        match play_effect_sequence(handle).await {
            Ok(()) => return Ok(VibrationTier::PlayEffect),
            Err(e) => warn!("Play-effect actuator failed: {}", e),
        }
    }

    if caps.actuator_count > 0 {
        debug!("Trying haptic actuator 0");
        match actuator_pulse(handle).await {
            Ok(()) => return Ok(VibrationTier::HapticActuator),
            Err(e) => warn!("Haptic actuator failed: {}", e),
        }
    }

    if caps.legacy_vibrate {
        debug!("Trying legacy vibrate");
        match handle.legacy_vibrate(FULL_MAGNITUDE, FULL_MAGNITUDE, FALLBACK_PULSE_MS) {
            Ok(()) => return Ok(VibrationTier::Legacy),
            Err(e) => warn!("Legacy vibrate failed: {}", e),
        }
    }

    Err(PadProbeError::NoVibrationSupport)
}

/// Primary tier: three sequential full-magnitude pulses, each awaited
/// to completion before the next starts.
async fn play_effect_sequence(handle: &DeviceHandle) -> Result<()> {
    for (duration_ms, pause_ms) in PRIMARY_PULSES {
        handle.start_effect(&RumbleEffect {
            duration_ms,
            strong: FULL_MAGNITUDE,
            weak: FULL_MAGNITUDE,
        })?;
        sleep(Duration::from_millis(duration_ms)).await;

        if pause_ms > 0 {
            sleep(Duration::from_millis(pause_ms)).await;
        }
    }
    Ok(())
}

/// Second tier: one pulse on the first haptic actuator.
async fn actuator_pulse(handle: &DeviceHandle) -> Result<()> {
    handle.start_actuator_pulse(
        0,
        &RumbleEffect {
            duration_ms: FALLBACK_PULSE_MS,
            strong: FULL_MAGNITUDE,
            weak: FULL_MAGNITUDE,
        },
    )?;
    sleep(Duration::from_millis(FALLBACK_PULSE_MS)).await;
    Ok(())
}
