//! # GameCube Frame Encoder
//!
//! Encodes a [`ControllerState`] into the 8-byte frame the TAStm32 replays to
//! the console.
//!
//! ```text
//! Byte 0-1: button mask (big-endian, baseline 0x0080 always set)
//! Byte 2:   main stick X    (1-255)
//! Byte 3:   main stick Y    (1-255)
//! Byte 4:   C-stick X       (1-255)
//! Byte 5:   C-stick Y       (1-255)
//! Byte 6:   left shoulder   (0-255)
//! Byte 7:   right shoulder  (0-255)
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::protocol::*;
use crate::controller::input::Button;
use crate::controller::state::ControllerState;

/// Encode a controller state into a GameCube frame
///
/// # Arguments
///
/// * `state` - Controller state to encode (analog values clamped here)
///
/// # Returns
///
/// * `[u8; 8]` - Encoded frame
///
/// # Examples
///
/// ```
/// use gc_pad_bridge::controller::state::ControllerState;
/// use gc_pad_bridge::frame::encoder::encode_state_frame;
///
/// let frame = encode_state_frame(&ControllerState::new());
/// assert_eq!(frame, [0x00, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00, 0x00]);
/// ```
pub fn encode_state_frame(state: &ControllerState) -> [u8; STATE_FRAME_SIZE] {
    let [mask_hi, mask_lo] = button_mask(state).to_be_bytes();

    [
        mask_hi,
        mask_lo,
        stick_byte(state.main_stick.0),
        stick_byte(state.main_stick.1),
        stick_byte(state.c_stick.0),
        stick_byte(state.c_stick.1),
        shoulder_byte(state.l_shoulder),
        shoulder_byte(state.r_shoulder),
    ]
}

/// Encode a complete poll packet: [`CMD_POLL`] followed by the state frame
///
/// Sent to the device as a single write.
pub fn encode_poll_packet(state: &ControllerState) -> Bytes {
    let mut packet = BytesMut::with_capacity(POLL_PACKET_SIZE);
    packet.put_u8(CMD_POLL);
    packet.put_slice(&encode_state_frame(state));
    packet.freeze()
}

/// Build the 16-bit button mask
///
/// Buttons without a mask bit (Start, D-Pad) do not contribute.
pub fn button_mask(state: &ControllerState) -> u16 {
    state
        .pressed_buttons()
        .filter_map(Button::mask_bit)
        .fold(BUTTON_MASK_BASELINE, |mask, bit| mask | bit)
}

/// Convert a stick axis from `[0, 1]` to `1..=255`
///
/// Out-of-range values are clamped first; the scaled value is truncated.
pub fn stick_byte(value: f64) -> u8 {
    (clamp_unit(value) * STICK_SCALE) as u8 + STICK_OFFSET
}

/// Convert a shoulder from `[0, 1]` to `0..=255`
pub fn shoulder_byte(value: f64) -> u8 {
    (clamp_unit(value) * SHOULDER_SCALE) as u8
}

/// Clamp to `[0, 1]`. NaN maps to 0.
fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
