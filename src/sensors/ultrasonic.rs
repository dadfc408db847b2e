use core::fmt::Debug;
use defmt::Format;
use fugit::TimerDurationU32 as TimerDuration;
use fugit_timer::Timer;
use nb;

use super::Sensor;
use crate::error::Error;

/// Width of the trigger pulse the HC-SR04 wants.
const TRIGGER_MICROS: u32 = 10;
/// Give up waiting for the echo after this long and report out of range.
const ECHO_TIMEOUT_MILLIS: u32 = 1_000;

/// One completed ranging measurement.
#[derive(Clone, Copy, Debug, Format, PartialEq, Eq)]
pub struct RangeUpdate {
    /// Echo pulse width in microseconds; `None` when the echo never arrived
    /// (nothing in range, or the sensor is disconnected).
    pub echo_micros: Option<u32>,
}

impl RangeUpdate {
    /// Distance in millimeters: echo time at ~343 m/s, halved for the round
    /// trip.
    pub fn millimeters(&self) -> Option<u32> {
        self.echo_micros.map(|micros| micros * 343 / 2_000)
    }

    pub fn centimeters(&self) -> Option<f32> {
        self.millimeters().map(|mm| mm as f32 / 10.0)
    }
}

#[derive(Clone, Copy, Debug, Format)]
enum RangeState {
    Idle,
    Trigger,
    AwaitEchoRise,
    MeasureEcho { rise_ticks: u32 },
}

/// Non-blocking HC-SR04 ultrasonic ranger.
///
/// Each call to `sense` advances the measurement state machine one step;
/// a measurement completes over several polls. Every completed measurement
/// is reported, including out-of-range ones.
pub struct UltrasonicDevice<Trig, Echo, T, const TIMER_HZ: u32>
where
    T: Timer<TIMER_HZ>,
{
    trig: Trig,
    echo: Echo,
    timer: T,
    state: RangeState,
}

impl<Trig, Echo, T, const TIMER_HZ: u32> UltrasonicDevice<Trig, Echo, T, TIMER_HZ>
where
    Trig: embedded_hal::digital::v2::OutputPin,
    Echo: embedded_hal::digital::v2::InputPin,
    T: Timer<TIMER_HZ>,
{
    pub fn new(trig: Trig, echo: Echo, timer: T) -> Self {
        Self {
            trig,
            echo,
            timer,
            state: RangeState::Idle,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum UltrasonicError<TrigError: Debug, EchoError: Debug, TimerError: Debug> {
    Trig(TrigError),
    Echo(EchoError),
    TimerStart(TimerError),
    TimerWait(TimerError),
}

impl<TrigError: Debug, EchoError: Debug, TimerError: Debug> Error
    for UltrasonicError<TrigError, EchoError, TimerError>
{
}

impl<Trig, Echo, T, const TIMER_HZ: u32> Sensor for UltrasonicDevice<Trig, Echo, T, TIMER_HZ>
where
    Trig: embedded_hal::digital::v2::OutputPin,
    Trig::Error: Debug,
    Echo: embedded_hal::digital::v2::InputPin,
    Echo::Error: Debug,
    T: Timer<TIMER_HZ>,
    T::Error: Debug,
{
    type Message = RangeUpdate;
    type Error = UltrasonicError<Trig::Error, Echo::Error, T::Error>;

    fn sense(&mut self) -> Result<Option<RangeUpdate>, Self::Error> {
        match self.state {
            RangeState::Idle => {
                self.trig.set_high().map_err(UltrasonicError::Trig)?;
                self.timer
                    .start(TimerDuration::<TIMER_HZ>::micros(TRIGGER_MICROS))
                    .map_err(UltrasonicError::TimerStart)?;
                self.state = RangeState::Trigger;

                Ok(None)
            }
            RangeState::Trigger => match self.timer.wait() {
                Err(nb::Error::WouldBlock) => Ok(None),
                Err(nb::Error::Other(err)) => Err(UltrasonicError::TimerWait(err)),
                Ok(()) => {
                    self.trig.set_low().map_err(UltrasonicError::Trig)?;
                    self.timer
                        .start(TimerDuration::<TIMER_HZ>::millis(ECHO_TIMEOUT_MILLIS))
                        .map_err(UltrasonicError::TimerStart)?;
                    self.state = RangeState::AwaitEchoRise;

                    Ok(None)
                }
            },
            RangeState::AwaitEchoRise => {
                if self.echo.is_high().map_err(UltrasonicError::Echo)? {
                    let rise_ticks = self.timer.now().ticks();
                    self.state = RangeState::MeasureEcho { rise_ticks };

                    return Ok(None);
                }

                match self.timer.wait() {
                    Err(nb::Error::WouldBlock) => Ok(None),
                    Err(nb::Error::Other(err)) => Err(UltrasonicError::TimerWait(err)),
                    Ok(()) => {
                        // echo never arrived: fail open with an out-of-range
                        // reading, never an error
                        self.state = RangeState::Idle;

                        Ok(Some(RangeUpdate { echo_micros: None }))
                    }
                }
            }
            RangeState::MeasureEcho { rise_ticks } => {
                if self.echo.is_low().map_err(UltrasonicError::Echo)? {
                    let fall_ticks = self.timer.now().ticks();
                    let ticks = fall_ticks.wrapping_sub(rise_ticks);
                    let micros = TimerDuration::<TIMER_HZ>::from_ticks(ticks).to_micros();
                    self.state = RangeState::Idle;

                    return Ok(Some(RangeUpdate {
                        echo_micros: Some(micros),
                    }));
                }

                match self.timer.wait() {
                    Err(nb::Error::WouldBlock) => Ok(None),
                    Err(nb::Error::Other(err)) => Err(UltrasonicError::TimerWait(err)),
                    Ok(()) => {
                        // echo stuck high past the timeout
                        self.state = RangeState::Idle;

                        Ok(Some(RangeUpdate { echo_micros: None }))
                    }
                }
            }
        }
    }
}
