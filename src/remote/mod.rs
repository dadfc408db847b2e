//! Infrared remote receiver: edge timing capture, frame decode, and
//! debounced button notifications.
//!
//! The receiver is split along the interrupt boundary. [`PulseCapture`] runs
//! in the pin edge ISR and turns inter-edge times into raw 64-pulse frames
//! and repeat-pulse counts. [`FrameLatch`] is the single-slot handoff between
//! the ISR and the polling task. [`IrRemoteDevice`] runs at the application's
//! own cadence: it drains the latch, decodes the frame, and reports a
//! [`RemoteUpdate`] only when something actually changed since the last poll.

pub mod button;
pub mod capture;
pub mod device;
pub mod frame;
pub mod latch;

pub use button::Button;
pub use capture::PulseCapture;
pub use device::{IrRemoteDevice, RemoteUpdate};
pub use frame::{DecodedFrame, RawFrame};
pub use latch::{FrameLatch, FRAME_PULSES};
