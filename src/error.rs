use alloc::boxed::Box;
use core::convert::Infallible;
use core::fmt::{Debug, Formatter, Result as FmtResult};

/// Marker trait for device errors so they can be boxed and bubbled up
/// through the runner without losing their `Debug` output.
pub trait Error: Debug {}

impl Error for Infallible {}

impl<E: Error + 'static> From<E> for Box<dyn Error> {
    fn from(error: E) -> Box<dyn Error> {
        Box::new(error)
    }
}

/// Type-erased error, used where many device error types meet (e.g.
/// `Car::poll`).
pub struct BoxError(Box<dyn Error>);

impl Debug for BoxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

impl Error for BoxError {}

impl From<Box<dyn Error>> for BoxError {
    fn from(error: Box<dyn Error>) -> BoxError {
        BoxError(error)
    }
}
