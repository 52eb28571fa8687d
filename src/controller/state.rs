//! # Controller State Module
//!
//! Normalized runtime state for a single connected controller.
//!
//! All values are stored exactly as the host reports them: stick axes in
//! [-1, 1], trigger pressure in [0, 1], one pressed/value pair per button
//! index. No deadzone, smoothing, or clamping is applied here; the tester
//! shows raw fidelity and leaves clamping to the visual mapping stage.
//!
//! ## Button Indices
//!
//! | Index | Button | Index | Button |
//! |-------|--------|-------|--------|
//! | 0 | Cross (×) | 9 | Options |
//! | 1 | Circle (○) | 10 | Left stick click |
//! | 2 | Square (□) | 11 | Right stick click |
//! | 3 | Triangle (△) | 12 | D-Pad up |
//! | 4 | L1 | 13 | D-Pad down |
//! | 5 | R1 | 14 | D-Pad left |
//! | 6 | L2 (analog) | 15 | D-Pad right |
//! | 7 | R2 (analog) | 16 | PS |
//! | 8 | Share | | |

/// Number of known button indices.
pub const BUTTON_COUNT: usize = 17;

/// Symbolic names for the 17 known button indices.
///
/// Used for visual-element lookup and readout labels only; sampling works
/// on raw indices.
pub const BUTTON_NAMES: [&str; BUTTON_COUNT] = [
    "cross",
    "circle",
    "square",
    "triangle",
    "l1",
    "r1",
    "l2",
    "r2",
    "share",
    "options",
    "left-stick",
    "right-stick",
    "dpad-up",
    "dpad-down",
    "dpad-left",
    "dpad-right",
    "ps",
];

/// Button indices for semantic access.
pub mod buttons {
    /// Cross (×)
    pub const CROSS: usize = 0;
    /// Circle (○)
    pub const CIRCLE: usize = 1;
    /// Square (□)
    pub const SQUARE: usize = 2;
    /// Triangle (△)
    pub const TRIANGLE: usize = 3;
    /// L1 shoulder button
    pub const L1: usize = 4;
    /// R1 shoulder button
    pub const R1: usize = 5;
    /// L2 trigger (analog pressure in `value`)
    pub const L2: usize = 6;
    /// R2 trigger (analog pressure in `value`)
    pub const R2: usize = 7;
    /// Share button
    pub const SHARE: usize = 8;
    /// Options button
    pub const OPTIONS: usize = 9;
    /// Left stick click (L3)
    pub const LEFT_STICK: usize = 10;
    /// Right stick click (R3)
    pub const RIGHT_STICK: usize = 11;
    /// D-Pad up
    pub const DPAD_UP: usize = 12;
    /// D-Pad down
    pub const DPAD_DOWN: usize = 13;
    /// D-Pad left
    pub const DPAD_LEFT: usize = 14;
    /// D-Pad right
    pub const DPAD_RIGHT: usize = 15;
    /// PS button
    pub const PS: usize = 16;
}

/// One button's state: digital press plus analog pressure.
///
/// Digital buttons report `value` as 0.0 or 1.0; the triggers (indices 6
/// and 7) report the full pressure range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ButtonState {
    /// Whether the button is currently pressed.
    pub pressed: bool,
    /// Analog value in [0, 1].
    pub value: f32,
}

/// Raw stick deflection in [-1, 1] per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickPosition {
    /// Horizontal deflection. -1 = full left, 1 = full right.
    pub x: f32,
    /// Vertical deflection. -1 = full up, 1 = full down.
    pub y: f32,
}

/// Left and right stick positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickPair {
    /// Left stick (axes 0 and 1).
    pub left: StickPosition,
    /// Right stick (axes 2 and 3).
    pub right: StickPosition,
}

/// Left and right trigger pressure in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggerPair {
    /// L2 pressure (button index 6).
    pub left: f32,
    /// R2 pressure (button index 7).
    pub right: f32,
}

/// Complete normalized state of the tracked controller.
///
/// Created once at startup and mutated in place: the sampler overwrites
/// every input field each frame, and the connection tracker flips
/// `connected` and resets the inputs on disconnect.
///
/// # Examples
///
/// ```
/// use pad_probe::controller::state::ControllerState;
///
/// let state = ControllerState::new();
/// assert!(!state.connected);
/// assert_eq!(state.sticks.left.x, 0.0);
/// assert!(!state.buttons[0].pressed);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerState {
    /// True iff the connection tracker holds an active device handle.
    ///
    /// Owned by the tracker; the sampler only reads it.
    pub connected: bool,

    /// All 17 known buttons, overwritten wholesale each frame.
    pub buttons: [ButtonState; BUTTON_COUNT],

    /// Raw stick positions, copied verbatim each frame.
    pub sticks: StickPair,

    /// Trigger pressure derived from button indices 6 and 7.
    pub triggers: TriggerPair,
}

impl ControllerState {
    /// Creates a disconnected state with all inputs at their neutral values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every input field to its neutral value.
    ///
    /// Does not touch `connected`; that flag belongs to the connection
    /// tracker, which calls this as part of disconnect handling.
    pub fn reset(&mut self) {
        self.buttons = [ButtonState::default(); BUTTON_COUNT];
        self.sticks = StickPair::default();
        self.triggers = TriggerPair::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_neutral() {
        let state = ControllerState::default();

        assert!(!state.connected);
        for button in &state.buttons {
            assert!(!button.pressed);
            assert_eq!(button.value, 0.0);
        }
        assert_eq!(state.sticks.left, StickPosition::default());
        assert_eq!(state.sticks.right, StickPosition::default());
        assert_eq!(state.triggers.left, 0.0);
        assert_eq!(state.triggers.right, 0.0);
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(ControllerState::new(), ControllerState::default());
    }

    #[test]
    fn test_reset_clears_inputs() {
        let mut state = ControllerState::new();
        state.buttons[buttons::CROSS] = ButtonState { pressed: true, value: 1.0 };
        state.sticks.left = StickPosition { x: 0.5, y: -0.5 };
        state.triggers.right = 0.75;

        state.reset();

        assert!(!state.buttons[buttons::CROSS].pressed);
        assert_eq!(state.sticks.left, StickPosition::default());
        assert_eq!(state.triggers.right, 0.0);
    }

    #[test]
    fn test_reset_leaves_connected_flag() {
        let mut state = ControllerState::new();
        state.connected = true;

        state.reset();
        assert!(state.connected);
    }

    #[test]
    fn test_button_name_table_size() {
        assert_eq!(BUTTON_NAMES.len(), BUTTON_COUNT);
    }

    #[test]
    fn test_button_index_constants_match_names() {
        assert_eq!(BUTTON_NAMES[buttons::CROSS], "cross");
        assert_eq!(BUTTON_NAMES[buttons::L2], "l2");
        assert_eq!(BUTTON_NAMES[buttons::R2], "r2");
        assert_eq!(BUTTON_NAMES[buttons::SHARE], "share");
        assert_eq!(BUTTON_NAMES[buttons::OPTIONS], "options");
        assert_eq!(BUTTON_NAMES[buttons::LEFT_STICK], "left-stick");
        assert_eq!(BUTTON_NAMES[buttons::RIGHT_STICK], "right-stick");
        assert_eq!(BUTTON_NAMES[buttons::DPAD_RIGHT], "dpad-right");
        assert_eq!(BUTTON_NAMES[buttons::PS], "ps");
    }

    #[test]
    fn test_trigger_indices() {
        // The two analog triggers live at the designated indices
        assert_eq!(buttons::L2, 6);
        assert_eq!(buttons::R2, 7);
    }
}
