//! # Visual Mapper Module
//!
//! Pure functions from normalized controller state to rendering
//! parameters: stick indicator geometry, preview-dot clamping and tint,
//! trigger fill bars and colors, and the composed per-frame visual
//! output. No hardware I/O happens here.

pub mod frame;
pub mod stick;
pub mod trigger;
