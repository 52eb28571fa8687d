//! # Pad Probe
//!
//! Diagnostic tester for PS5 DualSense controllers.
//!
//! This library samples a connected controller once per display frame,
//! normalizes its raw button/axis signals, maps them to visual feedback
//! parameters, and drives an on-demand vibration test through a layered
//! hardware fallback chain.

pub mod config;
pub mod controller;
pub mod error;
pub mod haptics;
pub mod host;
pub mod recorder;
pub mod visual;
