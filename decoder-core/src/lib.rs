#![cfg_attr(not(feature = "std"), no_std)]

//! # Decoder Core
//!
//! Straight-key Morse decoder core logic for embedded systems.
//! A timer tick drives the timing FSM, finished symbols travel through a
//! lossy SPSC ring and the main loop renders them on a character display.

pub mod types;
pub mod decode;
pub mod ring;
pub mod fsm;
pub mod render;
pub mod hal;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use decode::{decode, encode, UNKNOWN_CHAR};
pub use ring::*;
pub use fsm::*;
pub use render::*;
pub use hal::*;

/// Decoder library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration with the stock tick counts
pub fn default_config() -> DecoderConfig {
    DecoderConfig {
        dot_ticks: 128,
        dash_hold_ticks: 240,
        symbol_gap_ticks: 255,
        char_gap_ticks: 128,
        idle_grace_ticks: 64,
        dot_duty_percent: 50,
        dash_duty_percent: 25,
    }
}
