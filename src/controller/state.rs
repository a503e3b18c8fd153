//! # Controller State
//!
//! A snapshot of every input on the virtual controller.
//!
//! Stick and shoulder values are stored exactly as they were set. They are only
//! clamped to `[0, 1]` when the state is encoded into a serial frame.

use std::fmt;

use super::input::{Button, InputOp, Shoulder, Stick};
use crate::frame::encoder::encode_state_frame;
use crate::frame::protocol::STATE_FRAME_SIZE;

/// Stick axis value at rest.
pub const STICK_CENTER: f64 = 0.5;

/// Shoulder value at rest.
pub const SHOULDER_RELEASED: f64 = 0.0;

/// Full state of a virtual GameCube controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    buttons: [bool; Button::COUNT],
    /// Main stick (x, y): 0 is left/down, 1 is right/up
    pub main_stick: (f64, f64),
    /// C-stick (x, y)
    pub c_stick: (f64, f64),
    /// Left shoulder travel: 0 released, 1 fully pressed
    pub l_shoulder: f64,
    /// Right shoulder travel
    pub r_shoulder: f64,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            buttons: [false; Button::COUNT],
            main_stick: (STICK_CENTER, STICK_CENTER),
            c_stick: (STICK_CENTER, STICK_CENTER),
            l_shoulder: SHOULDER_RELEASED,
            r_shoulder: SHOULDER_RELEASED,
        }
    }
}

impl ControllerState {
    /// Neutral state: nothing pressed, sticks centered
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons[button.index()]
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.buttons[button.index()] = pressed;
    }

    /// Buttons currently held, in [`Button::ALL`] order
    pub fn pressed_buttons(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL.into_iter().filter(|b| self.is_pressed(*b))
    }

    pub fn stick(&self, stick: Stick) -> (f64, f64) {
        match stick {
            Stick::Main => self.main_stick,
            Stick::C => self.c_stick,
        }
    }

    pub fn shoulder(&self, shoulder: Shoulder) -> f64 {
        match shoulder {
            Shoulder::L => self.l_shoulder,
            Shoulder::R => self.r_shoulder,
        }
    }

    /// Apply a single input change
    pub fn apply(&mut self, op: &InputOp) {
        match *op {
            InputOp::Press(button) => self.set_button(button, true),
            InputOp::Release(button) => self.set_button(button, false),
            InputOp::Shoulder(Shoulder::L, amount) => self.l_shoulder = amount,
            InputOp::Shoulder(Shoulder::R, amount) => self.r_shoulder = amount,
            InputOp::Tilt(Stick::Main, x, y) => self.main_stick = (x, y),
            InputOp::Tilt(Stick::C, x, y) => self.c_stick = (x, y),
            InputOp::Empty => self.reset(),
        }
    }

    /// Return to the neutral state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Serialize into the 8-byte frame the TAStm32 sends to the console
    pub fn to_bytes(&self) -> [u8; STATE_FRAME_SIZE] {
        encode_state_frame(self)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for button in Button::ALL {
            writeln!(f, "{}: {}", button, self.is_pressed(button))?;
        }
        writeln!(f, "MAIN_STICK: ({}, {})", self.main_stick.0, self.main_stick.1)?;
        writeln!(f, "C_STICK: ({}, {})", self.c_stick.0, self.c_stick.1)?;
        writeln!(f, "L_SHOULDER: {}", self.l_shoulder)?;
        writeln!(f, "R_SHOULDER: {}", self.r_shoulder)
    }
}
