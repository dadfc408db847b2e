use core::fmt::Debug;
use core::task::Poll;
use defmt::Format;
use embedded_hal::PwmPin;
use fugit::TimerDurationU32 as TimerDuration;
use fugit_timer::Timer;
use nb;

use super::Actuator;
use crate::error::Error;

/// Standard hobby servo timing: 500-2500 us pulse on a 20 ms period maps to
/// 0-180 degrees.
const PULSE_MIN_MICROS: u32 = 500;
const PULSE_MAX_MICROS: u32 = 2500;
const PERIOD_MICROS: u32 = 20_000;

pub const ANGLE_MAX_DEGREES: u8 = 180;

#[derive(Clone, Copy, Debug, Format)]
pub enum ServoAction<const TIMER_HZ: u32> {
    /// Jump straight to an angle.
    MoveTo { degrees: u8 },
    /// Step one degree at a time from `from` to `to`, one step per
    /// `step_delay`.
    Sweep {
        from: u8,
        to: u8,
        step_delay: TimerDuration<TIMER_HZ>,
    },
}

#[derive(Clone, Copy, Debug, Format)]
enum ServoState<const TIMER_HZ: u32> {
    MoveTo {
        degrees: u8,
    },
    Sweep {
        at: u8,
        to: u8,
        step_delay: TimerDuration<TIMER_HZ>,
        armed: bool,
    },
}

/// Positional servo on a 50 Hz PWM channel.
pub struct ServoDevice<P, T, const TIMER_HZ: u32>
where
    P: PwmPin<Duty = u16>,
    T: Timer<TIMER_HZ>,
{
    pwm: P,
    timer: T,
    degrees: u8,
    state: Option<ServoState<TIMER_HZ>>,
}

impl<P, T, const TIMER_HZ: u32> ServoDevice<P, T, TIMER_HZ>
where
    P: PwmPin<Duty = u16>,
    T: Timer<TIMER_HZ>,
{
    pub fn new(mut pwm: P, timer: T, initial_degrees: u8) -> Self {
        let initial_degrees = initial_degrees.min(ANGLE_MAX_DEGREES);
        let duty = duty_for(initial_degrees, pwm.get_max_duty());
        pwm.set_duty(duty);
        pwm.enable();

        Self {
            pwm,
            timer,
            degrees: initial_degrees,
            state: None,
        }
    }

    /// Angle the servo was last commanded to.
    pub fn degrees(&self) -> u8 {
        self.degrees
    }

    fn position(&mut self, degrees: u8) {
        let degrees = degrees.min(ANGLE_MAX_DEGREES);
        let duty = duty_for(degrees, self.pwm.get_max_duty());
        self.pwm.set_duty(duty);
        self.degrees = degrees;
    }
}

/// PWM duty for an angle, given the channel's maximum duty over the 20 ms
/// period.
pub fn duty_for(degrees: u8, max_duty: u16) -> u16 {
    let degrees = degrees.min(ANGLE_MAX_DEGREES) as u32;
    let pulse_micros =
        PULSE_MIN_MICROS + degrees * (PULSE_MAX_MICROS - PULSE_MIN_MICROS) / ANGLE_MAX_DEGREES as u32;

    (pulse_micros * max_duty as u32 / PERIOD_MICROS) as u16
}

#[derive(Clone, Copy, Debug)]
pub enum ServoError<TimerError: Debug> {
    TimerStart(TimerError),
    TimerWait(TimerError),
}

impl<TimerError: Debug> Error for ServoError<TimerError> {}

impl<P, T, const TIMER_HZ: u32> Actuator for ServoDevice<P, T, TIMER_HZ>
where
    P: PwmPin<Duty = u16>,
    T: Timer<TIMER_HZ>,
    T::Error: Debug,
{
    type Action = ServoAction<TIMER_HZ>;
    type Error = ServoError<T::Error>;

    fn run(&mut self, action: &Self::Action) {
        self.state = Some(match action {
            ServoAction::MoveTo { degrees } => ServoState::MoveTo { degrees: *degrees },
            ServoAction::Sweep {
                from,
                to,
                step_delay,
            } => ServoState::Sweep {
                at: (*from).min(ANGLE_MAX_DEGREES),
                to: (*to).min(ANGLE_MAX_DEGREES),
                step_delay: *step_delay,
                armed: false,
            },
        });
    }

    fn poll(&mut self) -> Poll<Result<(), Self::Error>> {
        match self.state {
            None => Poll::Ready(Ok(())),
            Some(ServoState::MoveTo { degrees }) => {
                self.position(degrees);
                self.state = None;

                Poll::Ready(Ok(()))
            }
            Some(ServoState::Sweep {
                at,
                to,
                step_delay,
                armed,
            }) => {
                if armed {
                    match self.timer.wait() {
                        Err(nb::Error::WouldBlock) => return Poll::Pending,
                        Err(nb::Error::Other(err)) => {
                            return Poll::Ready(Err(ServoError::TimerWait(err)))
                        }
                        Ok(()) => {}
                    }
                }

                self.position(at);

                if at == to {
                    self.state = None;

                    return Poll::Ready(Ok(()));
                }

                let next = if at < to { at + 1 } else { at - 1 };
                self.timer
                    .start(step_delay)
                    .map_err(ServoError::TimerStart)?;
                self.state = Some(ServoState::Sweep {
                    at: next,
                    to,
                    step_delay,
                    armed: true,
                });

                Poll::Pending
            }
        }
    }
}
