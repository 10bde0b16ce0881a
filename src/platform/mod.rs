//! Platform abstraction layer
//!
//! The host window/browser loop samples these once per frame:
//! - Input events
//! - Frame timing

pub mod input;
pub mod time;

pub use input::{FrameInput, InputState};
pub use time::FrameClock;
