//! # Controller Inputs
//!
//! The closed set of inputs a virtual GameCube controller exposes, and the
//! [`InputOp`] value every state change is expressed as.
//!
//! ## Digital Buttons
//!
//! | Button | Pipe name | Serial mask bit |
//! |--------|-----------|-----------------|
//! | A | `A` | 0x0100 |
//! | B | `B` | 0x0200 |
//! | X | `X` | 0x0400 |
//! | Y | `Y` | 0x0800 |
//! | Z | `Z` | 0x1000 |
//! | L (digital) | `L` | 0x0002 |
//! | R (digital) | `R` | 0x0004 |
//! | Start | `START` | not sent |
//! | D-Pad Up | `D_UP` | not sent |
//! | D-Pad Down | `D_DOWN` | not sent |
//! | D-Pad Left | `D_LEFT` | not sent |
//! | D-Pad Right | `D_RIGHT` | not sent |

use std::fmt;

use crate::frame::protocol::*;

/// Digital button on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    Z,
    L,
    R,
    Start,
    DUp,
    DDown,
    DLeft,
    DRight,
}

impl Button {
    /// Number of digital buttons.
    pub const COUNT: usize = 12;

    /// Every digital button, in pipe reset order.
    pub const ALL: [Button; Button::COUNT] = [
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::Z,
        Button::L,
        Button::R,
        Button::Start,
        Button::DUp,
        Button::DDown,
        Button::DLeft,
        Button::DRight,
    ];

    /// Identifier used by the pipe protocol (`PRESS <name>`).
    pub fn name(self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
            Button::Z => "Z",
            Button::L => "L",
            Button::R => "R",
            Button::Start => "START",
            Button::DUp => "D_UP",
            Button::DDown => "D_DOWN",
            Button::DLeft => "D_LEFT",
            Button::DRight => "D_RIGHT",
        }
    }

    /// Bit this button sets in the serial frame's button mask.
    ///
    /// Start and the D-Pad are not carried by the TAStm32 GameCube frame and
    /// return `None`.
    pub fn mask_bit(self) -> Option<u16> {
        match self {
            Button::A => Some(MASK_BUTTON_A),
            Button::B => Some(MASK_BUTTON_B),
            Button::X => Some(MASK_BUTTON_X),
            Button::Y => Some(MASK_BUTTON_Y),
            Button::Z => Some(MASK_BUTTON_Z),
            Button::L => Some(MASK_BUTTON_L),
            Button::R => Some(MASK_BUTTON_R),
            Button::Start | Button::DUp | Button::DDown | Button::DLeft | Button::DRight => None,
        }
    }

    /// Position of this button in [`Button::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Analog stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stick {
    Main,
    C,
}

impl Stick {
    pub fn name(self) -> &'static str {
        match self {
            Stick::Main => "MAIN",
            Stick::C => "C",
        }
    }
}

impl fmt::Display for Stick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Analog shoulder trigger.
///
/// The analog travel is independent of the digital [`Button::L`] /
/// [`Button::R`] click: pressing a shoulder all the way in does not press the
/// digital button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shoulder {
    L,
    R,
}

impl Shoulder {
    pub fn name(self) -> &'static str {
        match self {
            Shoulder::L => "L",
            Shoulder::R => "R",
        }
    }
}

impl fmt::Display for Shoulder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single change to the controller state.
///
/// Analog amounts are carried exactly as the caller gave them, unclamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputOp {
    Press(Button),
    Release(Button),
    Shoulder(Shoulder, f64),
    Tilt(Stick, f64, f64),
    /// Release everything, center both sticks, zero both shoulders.
    Empty,
}
