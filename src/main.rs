//! # Pad Probe
//!
//! Diagnostic tester for PS5 DualSense controllers: per-frame input
//! readout plus an on-demand vibration test.

use std::path::PathBuf;

use anyhow::Result;
use tokio::time::{interval, Duration};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use pad_probe::config::{Config, LoggingConfig};
use pad_probe::controller::sampler::sample_frame;
use pad_probe::controller::state::{buttons, ControllerState};
use pad_probe::controller::tracker::ConnectionTracker;
use pad_probe::error::Result as PadResult;
use pad_probe::haptics::VibrationTester;
use pad_probe::host::dualsense;
use pad_probe::recorder::SessionRecorder;
use pad_probe::visual::frame::{
    present, AxisReadout, ButtonVisual, RenderSink, Side, StatusPanel, VisualFrame,
};
use pad_probe::visual::stick::{PreviewDot, StickIndicator};
use pad_probe::visual::trigger::TriggerVisual;

/// Number of frames between periodic status log lines (~5s at 60Hz).
const LOG_INTERVAL_FRAMES: u64 = 300;

/// Render sink for a headless terminal session.
///
/// Collects the latest per-element values, logs connection status changes
/// immediately, and provides a compact summary for the periodic log line.
#[derive(Default)]
struct TerminalSink {
    last_status: Option<StatusPanel>,
    pressed: Vec<&'static str>,
    frame_pressed: Vec<&'static str>,
    left_stick: (f32, f32),
    right_stick: (f32, f32),
    triggers: (f32, f32),
}

impl TerminalSink {
    fn new() -> Self {
        Self::default()
    }

    /// One-line state summary for periodic logging.
    fn summary(&self) -> String {
        let buttons = if self.pressed.is_empty() {
            "none".to_string()
        } else {
            self.pressed.join("+")
        };
        format!(
            "buttons: [{}], left: ({:.2}, {:.2}), right: ({:.2}, {:.2}), triggers: ({:.2}, {:.2})",
            buttons,
            self.left_stick.0,
            self.left_stick.1,
            self.right_stick.0,
            self.right_stick.1,
            self.triggers.0,
            self.triggers.1,
        )
    }
}

impl RenderSink for TerminalSink {
    fn status(&mut self, status: &StatusPanel) -> PadResult<()> {
        if self.last_status.as_ref() != Some(status) {
            info!(
                "Controller: {} | Vibration: {} | Test control: {}",
                status.connected_text,
                status.vibration_text,
                if status.test_enabled { "enabled" } else { "disabled" }
            );
            self.last_status = Some(status.clone());
        }
        // A new frame's button updates start from scratch
        self.pressed = std::mem::take(&mut self.frame_pressed);
        Ok(())
    }

    fn button(&mut self, _index: usize, visual: &ButtonVisual) -> PadResult<()> {
        if visual.active {
            self.frame_pressed.push(visual.name);
        }
        Ok(())
    }

    fn axis(&mut self, index: usize, readout: &AxisReadout) -> PadResult<()> {
        let value: f32 = readout.value_text.parse().unwrap_or(0.0);
        match index {
            0 => self.left_stick.0 = value,
            1 => self.left_stick.1 = value,
            2 => self.right_stick.0 = value,
            _ => self.right_stick.1 = value,
        }
        Ok(())
    }

    fn stick(&mut self, _side: Side, _indicator: &StickIndicator) -> PadResult<()> {
        Ok(())
    }

    fn preview(&mut self, _side: Side, _dot: &PreviewDot) -> PadResult<()> {
        Ok(())
    }

    fn trigger(&mut self, side: Side, visual: &TriggerVisual) -> PadResult<()> {
        match side {
            Side::Left => self.triggers.0 = visual.fill_percent / 100.0,
            Side::Right => self.triggers.1 = visual.fill_percent / 100.0,
        }
        Ok(())
    }
}

/// Initializes tracing with the configured level, optionally into a
/// rolling log file. The returned guard must stay alive for the file
/// writer to flush.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.dir.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        None
    } else {
        let appender = tracing_appender::rolling::daily(&config.dir, "pad-probe.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    }
}

/// Main entry point for the Pad Probe tester
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load the TOML configuration (optional path as the first argument)
///    - Set up logging per the configuration
///    - Spawn the DualSense backend with its scan task
///
/// 2. **Frame Loop**
///    - Apply attach/detach notifications to the connection tracker
///    - Sample the controller and present the composed visual frame
///    - Record state on the configured cadence
///    - Start the vibration test on a Share+Options chord
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if the configuration fails to load or validate.
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load_or_default(config_path.as_deref())?;

    let _log_guard = init_logging(&config.logging);
    info!("Pad Probe v{} starting...", env!("CARGO_PKG_VERSION"));

    let (host, mut host_events) = dualsense::spawn(config.controller.clone());

    let mut state = ControllerState::new();
    let mut tracker = ConnectionTracker::new();
    let tester = VibrationTester::new();
    let mut recorder = SessionRecorder::new(config.recorder.clone());
    let mut sink = TerminalSink::new();

    let frame_period = Duration::from_micros(1_000_000 / u64::from(config.frame.rate_hz));
    let mut frame_interval = interval(frame_period);
    let mut record_interval = interval(Duration::from_millis(config.recorder.record_interval_ms));

    info!(
        "Starting frame loop at {}Hz (press Share+Options on the pad to test vibration)",
        config.frame.rate_hz
    );
    info!("Press Ctrl+C to exit");

    let mut chord_was_down = false;
    let mut frame_count: u64 = 0;
    let mut last_log_count: u64 = 0;

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                sample_frame(&host, &mut state);

                let frame = VisualFrame::compose(&state, tracker.caps(), tester.ready());
                present(&frame, &mut sink);

                // Edge-triggered Share+Options chord fires the vibration test
                let chord = state.buttons[buttons::SHARE].pressed
                    && state.buttons[buttons::OPTIONS].pressed;
                if chord && !chord_was_down && frame.status.test_enabled {
                    if let Some(handle) = tracker.handle() {
                        let handle = handle.clone();
                        let tester = tester.clone();
                        tokio::spawn(async move {
                            if let Err(e) = tester.run(handle).await {
                                warn!("Vibration test did not complete: {}", e);
                            }
                        });
                    }
                }
                chord_was_down = chord;

                frame_count += 1;
                if state.connected && frame_count - last_log_count >= LOG_INTERVAL_FRAMES {
                    info!("{}", sink.summary());
                    last_log_count = frame_count;
                }
            }

            Some(event) = host_events.recv() => {
                tracker.apply(event, &mut state);
            }

            _ = record_interval.tick() => {
                if let Err(e) = recorder.record(&state) {
                    warn!("Failed to write session record: {}", e);
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total frames sampled: {}", frame_count);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_interval_constant() {
        // At the default 60Hz, 300 frames = 5 seconds
        let seconds = LOG_INTERVAL_FRAMES as f64 / 60.0;
        assert_eq!(seconds, 5.0);
    }

    #[test]
    fn test_frame_period_at_default_rate() {
        let period = Duration::from_micros(1_000_000 / 60);
        assert_eq!(period.as_micros(), 16_666);
    }

    #[test]
    fn test_terminal_sink_summary_when_idle() {
        let sink = TerminalSink::new();
        let summary = sink.summary();
        assert!(summary.contains("buttons: [none]"));
        assert!(summary.contains("left: (0.00, 0.00)"));
    }

    #[test]
    fn test_terminal_sink_collects_pressed_buttons() {
        let mut sink = TerminalSink::new();

        sink.button(0, &ButtonVisual {
            name: "cross",
            active: true,
            value_text: "1.00".to_string(),
        })
        .unwrap();
        sink.button(1, &ButtonVisual {
            name: "circle",
            active: false,
            value_text: "0.00".to_string(),
        })
        .unwrap();

        // The next frame's status call publishes the collected set
        sink.status(&StatusPanel {
            connected_text: "Yes",
            vibration_text: "Yes",
            test_enabled: true,
        })
        .unwrap();

        assert!(sink.summary().contains("buttons: [cross]"));
    }
}
