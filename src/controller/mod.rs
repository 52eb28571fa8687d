//! # Controller Module
//!
//! Controller state tracking and per-frame sampling.
//!
//! This module handles:
//! - The normalized controller state mutated every frame
//! - Attach/detach tracking and the single active device handle
//! - Per-frame snapshot sampling from the host's slot 0

pub mod sampler;
pub mod state;
pub mod tracker;
