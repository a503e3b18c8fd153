//! # TAStm32 Protocol Constants
//!
//! Command bytes, responses and frame layout for the TAStm32 serial protocol.
//!
//! ```text
//! Host                          TAStm32
//!  | 'R'                    ->   |
//!  |                        <-   | 0x01 'R'
//!  | 'S' 'A' 'G' 0x80 0x00  ->   |
//!  |                        <-   | 0x01 'S'
//!  | 'A' + 8-byte frame     ->   |   (once per poll)
//!  |                        <-   | 'A'
//! ```

/// Serial baud rate of the TAStm32 USB link
pub const TASTM32_BAUD_RATE: u32 = 115_200;

/// Reset command
pub const CMD_RESET: u8 = b'R';

/// Expected answer to [`CMD_RESET`]
pub const RESPONSE_RESET: [u8; 2] = [0x01, b'R'];

/// Setup command: player A, GameCube console, flags 0x80 0x00
pub const CMD_SET_GCN_MODE: [u8; 5] = [b'S', b'A', b'G', 0x80, 0x00];

/// Expected answer to [`CMD_SET_GCN_MODE`]
pub const RESPONSE_SET_MODE: [u8; 2] = [0x01, b'S'];

/// "Send a single controller poll" command, followed by one state frame
pub const CMD_POLL: u8 = b'A';

/// Expected acknowledgment of a poll
pub const RESPONSE_POLL: u8 = b'A';

/// Encoded controller state size (2 mask bytes + 4 stick bytes + 2 shoulder bytes)
pub const STATE_FRAME_SIZE: usize = 8;

/// Poll packet size (command + frame)
pub const POLL_PACKET_SIZE: usize = 1 + STATE_FRAME_SIZE;

/// Bit that is always set in the button mask
pub const BUTTON_MASK_BASELINE: u16 = 0x0080;

/// Per-button mask bits
pub const MASK_BUTTON_A: u16 = 0x0100;
pub const MASK_BUTTON_B: u16 = 0x0200;
pub const MASK_BUTTON_X: u16 = 0x0400;
pub const MASK_BUTTON_Y: u16 = 0x0800;
pub const MASK_BUTTON_Z: u16 = 0x1000;
pub const MASK_BUTTON_L: u16 = 0x0002;
pub const MASK_BUTTON_R: u16 = 0x0004;

/// Stick bytes scale `[0, 1]` onto `1..=255`
pub const STICK_SCALE: f64 = 254.0;
pub const STICK_OFFSET: u8 = 1;

/// Shoulder bytes scale `[0, 1]` onto `0..=255`
pub const SHOULDER_SCALE: f64 = 255.0;
