pub mod switch;
pub mod tracker;
pub mod ultrasonic;

use crate::error::Error;

/// A device the firmware polls for input.
///
/// `sense` returns `Ok(Some(message))` only when there is something new to
/// report, so callers can act on every `Some` without their own debouncing.
pub trait Sensor {
    type Message;
    type Error: Error;

    fn sense(&mut self) -> Result<Option<Self::Message>, Self::Error>;
}
