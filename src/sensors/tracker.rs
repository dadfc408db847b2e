use core::fmt::Debug;
use defmt::Format;
use embedded_hal::adc::{Channel, OneShot};
use nb::block;

use super::Sensor;
use crate::error::Error;

/// ADC reading at or above which a probe is considered to be over the dark
/// line, out of the 12-bit range.
pub const DEFAULT_LINE_THRESHOLD: u16 = 2000;

/// Dark/light classification of the three reflectance probes, left to right
/// in the direction of travel.
#[derive(Clone, Copy, Debug, Format, PartialEq, Eq)]
pub struct LineUpdate {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

/// Three-probe reflectance line tracker.
///
/// Classification changes are reported once; identical readings are
/// suppressed so the consumer only reacts when the car actually drifts.
pub struct LineTrackerDevice<Adc, L, M, R>
where
    L: Channel<Adc>,
    M: Channel<Adc>,
    R: Channel<Adc>,
{
    adc: Adc,
    left: L,
    middle: M,
    right: R,
    threshold: u16,
    current: Option<LineUpdate>,
}

impl<Adc, L, M, R> LineTrackerDevice<Adc, L, M, R>
where
    L: Channel<Adc>,
    M: Channel<Adc>,
    R: Channel<Adc>,
{
    pub fn new(adc: Adc, left: L, middle: M, right: R) -> Self {
        Self {
            adc,
            left,
            middle,
            right,
            threshold: DEFAULT_LINE_THRESHOLD,
            current: None,
        }
    }

    pub fn with_threshold(mut self, threshold: u16) -> Self {
        self.threshold = threshold;
        self
    }
}

#[derive(Clone, Copy, Debug)]
pub enum LineTrackerError<AdcError: Debug> {
    Adc(AdcError),
}

impl<AdcError: Debug> Error for LineTrackerError<AdcError> {}

impl<Adc, L, M, R, E> Sensor for LineTrackerDevice<Adc, L, M, R>
where
    Adc: OneShot<Adc, u16, L, Error = E>
        + OneShot<Adc, u16, M, Error = E>
        + OneShot<Adc, u16, R, Error = E>,
    L: Channel<Adc>,
    M: Channel<Adc>,
    R: Channel<Adc>,
    E: Debug,
{
    type Message = LineUpdate;
    type Error = LineTrackerError<E>;

    fn sense(&mut self) -> Result<Option<LineUpdate>, Self::Error> {
        let left = block!(self.adc.read(&mut self.left)).map_err(LineTrackerError::Adc)?;
        let middle = block!(self.adc.read(&mut self.middle)).map_err(LineTrackerError::Adc)?;
        let right = block!(self.adc.read(&mut self.right)).map_err(LineTrackerError::Adc)?;

        let update = LineUpdate {
            left: left >= self.threshold,
            middle: middle >= self.threshold,
            right: right >= self.threshold,
        };

        if Some(update) != self.current {
            self.current = Some(update);

            Ok(Some(update))
        } else {
            Ok(None)
        }
    }
}
