use core::fmt::Debug;
use core::marker::PhantomData;
use defmt::Format;
use embedded_hal::digital::v2::InputPin;
use fugit::TimerDurationU32 as TimerDuration;
use fugit_timer::Timer;
use nb;

use super::Sensor;
use crate::error::Error;

#[derive(Clone, Copy, Debug, Format, PartialEq, Eq)]
pub enum SwitchStatus {
    On,
    Off,
}

#[derive(Clone, Copy, Debug, Format)]
pub struct SwitchUpdate {
    pub status: SwitchStatus,
}

/// Marker for switches that read high when pressed.
pub struct SwitchActiveHigh;

/// Marker for switches that read low when pressed (pull-up wiring).
pub struct SwitchActiveLow;

pub trait SwitchActiveness {
    fn status(is_high: bool) -> SwitchStatus;
}

impl SwitchActiveness for SwitchActiveHigh {
    fn status(is_high: bool) -> SwitchStatus {
        if is_high {
            SwitchStatus::On
        } else {
            SwitchStatus::Off
        }
    }
}

impl SwitchActiveness for SwitchActiveLow {
    fn status(is_high: bool) -> SwitchStatus {
        if is_high {
            SwitchStatus::Off
        } else {
            SwitchStatus::On
        }
    }
}

/// Debounced switch or push button.
///
/// A level change is reported only once it has held steady for the debounce
/// window (default 10 ms).
pub struct SwitchDevice<P, A, T, const TIMER_HZ: u32>
where
    P: InputPin,
    A: SwitchActiveness,
    T: Timer<TIMER_HZ>,
{
    pin: P,
    timer: T,
    debounce: TimerDuration<TIMER_HZ>,
    current_status: Option<SwitchStatus>,
    settling_status: Option<SwitchStatus>,
    active: PhantomData<A>,
}

const DEFAULT_DEBOUNCE_MILLIS: u32 = 10;

impl<P, T, const TIMER_HZ: u32> SwitchDevice<P, SwitchActiveHigh, T, TIMER_HZ>
where
    P: InputPin,
    T: Timer<TIMER_HZ>,
{
    pub fn new_active_high(pin: P, timer: T) -> Self {
        Self::new(pin, timer)
    }
}

impl<P, T, const TIMER_HZ: u32> SwitchDevice<P, SwitchActiveLow, T, TIMER_HZ>
where
    P: InputPin,
    T: Timer<TIMER_HZ>,
{
    pub fn new_active_low(pin: P, timer: T) -> Self {
        Self::new(pin, timer)
    }
}

impl<P, A, T, const TIMER_HZ: u32> SwitchDevice<P, A, T, TIMER_HZ>
where
    P: InputPin,
    A: SwitchActiveness,
    T: Timer<TIMER_HZ>,
{
    pub fn new(pin: P, timer: T) -> Self {
        Self {
            pin,
            timer,
            debounce: TimerDuration::<TIMER_HZ>::millis(DEFAULT_DEBOUNCE_MILLIS),
            current_status: None,
            settling_status: None,
            active: PhantomData,
        }
    }

    pub fn with_debounce(mut self, debounce: TimerDuration<TIMER_HZ>) -> Self {
        self.debounce = debounce;
        self
    }
}

#[derive(Clone, Copy, Debug)]
pub enum SwitchError<PinError: Debug, TimerError: Debug> {
    Pin(PinError),
    TimerStart(TimerError),
    TimerWait(TimerError),
}

impl<PinError: Debug, TimerError: Debug> Error for SwitchError<PinError, TimerError> {}

impl<P, A, T, const TIMER_HZ: u32> Sensor for SwitchDevice<P, A, T, TIMER_HZ>
where
    P: InputPin,
    P::Error: Debug,
    A: SwitchActiveness,
    T: Timer<TIMER_HZ>,
    T::Error: Debug,
{
    type Message = SwitchUpdate;
    type Error = SwitchError<P::Error, T::Error>;

    fn sense(&mut self) -> Result<Option<SwitchUpdate>, Self::Error> {
        let is_high = self.pin.is_high().map_err(SwitchError::Pin)?;
        let status = A::status(is_high);

        if Some(status) == self.current_status {
            self.settling_status = None;

            return Ok(None);
        }

        if self.settling_status != Some(status) {
            self.settling_status = Some(status);
            self.timer
                .start(self.debounce)
                .map_err(SwitchError::TimerStart)?;

            return Ok(None);
        }

        match self.timer.wait() {
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(err)) => Err(SwitchError::TimerWait(err)),
            Ok(()) => {
                self.current_status = Some(status);
                self.settling_status = None;

                Ok(Some(SwitchUpdate { status }))
            }
        }
    }
}
