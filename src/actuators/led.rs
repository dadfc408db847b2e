use core::fmt::Debug;
use core::task::Poll;
use defmt::Format;
use embedded_hal::digital::v2::{OutputPin, PinState};
use fugit::TimerDurationU32 as TimerDuration;
use fugit_timer::Timer;
use nb;

use super::Actuator;
use crate::error::Error;

#[derive(Clone, Copy, Debug, Format)]
pub enum LedAction<const TIMER_HZ: u32> {
    Set { is_on: bool },
    Toggle,
    Blink { duration: TimerDuration<TIMER_HZ> },
}

#[derive(Clone, Copy, Debug, Format)]
enum BlinkPhase {
    Lit,
    Wait,
    Dark,
}

#[derive(Clone, Copy, Debug, Format)]
enum LedState<const TIMER_HZ: u32> {
    Set {
        is_on: bool,
    },
    Blink {
        phase: BlinkPhase,
        duration: TimerDuration<TIMER_HZ>,
    },
}

/// On/off indicator LED on a digital pin.
pub struct LedDevice<P, T, const TIMER_HZ: u32>
where
    P: OutputPin,
    T: Timer<TIMER_HZ>,
{
    pin: P,
    timer: T,
    is_on: bool,
    state: Option<LedState<TIMER_HZ>>,
}

impl<P, T, const TIMER_HZ: u32> LedDevice<P, T, TIMER_HZ>
where
    P: OutputPin,
    T: Timer<TIMER_HZ>,
{
    pub fn new(pin: P, timer: T) -> Self {
        Self {
            pin,
            timer,
            is_on: false,
            state: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum LedError<PinError: Debug, TimerError: Debug> {
    Pin(PinError),
    TimerStart(TimerError),
    TimerWait(TimerError),
}

impl<PinError: Debug, TimerError: Debug> Error for LedError<PinError, TimerError> {}

impl<P, T, const TIMER_HZ: u32> Actuator for LedDevice<P, T, TIMER_HZ>
where
    P: OutputPin,
    P::Error: Debug,
    T: Timer<TIMER_HZ>,
    T::Error: Debug,
{
    type Action = LedAction<TIMER_HZ>;
    type Error = LedError<P::Error, T::Error>;

    fn run(&mut self, action: &Self::Action) {
        self.state = Some(match action {
            LedAction::Set { is_on } => LedState::Set { is_on: *is_on },
            LedAction::Toggle => LedState::Set { is_on: !self.is_on },
            LedAction::Blink { duration } => LedState::Blink {
                phase: BlinkPhase::Lit,
                duration: *duration,
            },
        });
    }

    fn poll(&mut self) -> Poll<Result<(), Self::Error>> {
        match self.state {
            None => Poll::Ready(Ok(())),
            Some(LedState::Set { is_on }) => {
                self.pin
                    .set_state(PinState::from(is_on))
                    .map_err(LedError::Pin)?;
                self.is_on = is_on;
                self.state = None;

                Poll::Ready(Ok(()))
            }
            Some(LedState::Blink { phase, duration }) => match phase {
                BlinkPhase::Lit => {
                    self.timer.start(duration).map_err(LedError::TimerStart)?;
                    self.pin.set_high().map_err(LedError::Pin)?;
                    self.is_on = true;
                    self.state = Some(LedState::Blink {
                        phase: BlinkPhase::Wait,
                        duration,
                    });

                    Poll::Pending
                }
                BlinkPhase::Wait => match self.timer.wait() {
                    Err(nb::Error::WouldBlock) => Poll::Pending,
                    Err(nb::Error::Other(err)) => Poll::Ready(Err(LedError::TimerWait(err))),
                    Ok(()) => {
                        self.state = Some(LedState::Blink {
                            phase: BlinkPhase::Dark,
                            duration,
                        });

                        Poll::Pending
                    }
                },
                BlinkPhase::Dark => {
                    self.pin.set_low().map_err(LedError::Pin)?;
                    self.is_on = false;
                    self.state = None;

                    Poll::Ready(Ok(()))
                }
            },
        }
    }
}
