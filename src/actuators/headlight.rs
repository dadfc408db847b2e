use core::fmt::Debug;
use core::task::Poll;
use defmt::Format;
use embedded_hal::PwmPin;
use fugit::TimerDurationU32 as TimerDuration;
use fugit_timer::Timer;
use nb;

use super::Actuator;
use crate::error::Error;

/// Brightness steps per breathe ramp. One full breathe cycle is an up ramp
/// followed by a down ramp.
const BREATHE_STEPS: u32 = 50;

#[derive(Clone, Copy, Debug, Format)]
pub enum HeadlightAction<const TIMER_HZ: u32> {
    /// Hold a brightness, 0-100 percent.
    Set { percent: u8 },
    /// Ramp brightness up then back down once over `period`.
    Breathe { period: TimerDuration<TIMER_HZ> },
}

#[derive(Clone, Copy, Debug, Format)]
enum BreathePhase {
    RampUp { step: u32 },
    RampDown { step: u32 },
}

#[derive(Clone, Copy, Debug, Format)]
enum HeadlightState<const TIMER_HZ: u32> {
    Set {
        percent: u8,
    },
    Breathe {
        phase: BreathePhase,
        step_duration: TimerDuration<TIMER_HZ>,
        // false until the step timer has been started for the first step
        armed: bool,
    },
}

/// PWM-dimmed headlight.
pub struct HeadlightDevice<P, T, const TIMER_HZ: u32>
where
    P: PwmPin<Duty = u16>,
    T: Timer<TIMER_HZ>,
{
    pwm: P,
    timer: T,
    state: Option<HeadlightState<TIMER_HZ>>,
}

impl<P, T, const TIMER_HZ: u32> HeadlightDevice<P, T, TIMER_HZ>
where
    P: PwmPin<Duty = u16>,
    T: Timer<TIMER_HZ>,
{
    pub fn new(mut pwm: P, timer: T) -> Self {
        pwm.set_duty(0);
        pwm.enable();

        Self {
            pwm,
            timer,
            state: None,
        }
    }

    fn set_level(&mut self, numerator: u32, denominator: u32) {
        let max = self.pwm.get_max_duty() as u32;
        self.pwm.set_duty((max * numerator / denominator) as u16);
    }
}

#[derive(Clone, Copy, Debug)]
pub enum HeadlightError<TimerError: Debug> {
    TimerStart(TimerError),
    TimerWait(TimerError),
}

impl<TimerError: Debug> Error for HeadlightError<TimerError> {}

impl<P, T, const TIMER_HZ: u32> Actuator for HeadlightDevice<P, T, TIMER_HZ>
where
    P: PwmPin<Duty = u16>,
    T: Timer<TIMER_HZ>,
    T::Error: Debug,
{
    type Action = HeadlightAction<TIMER_HZ>;
    type Error = HeadlightError<T::Error>;

    fn run(&mut self, action: &Self::Action) {
        self.state = Some(match action {
            HeadlightAction::Set { percent } => HeadlightState::Set {
                percent: (*percent).min(100),
            },
            HeadlightAction::Breathe { period } => HeadlightState::Breathe {
                phase: BreathePhase::RampUp { step: 0 },
                step_duration: *period / (2 * BREATHE_STEPS),
                armed: false,
            },
        });
    }

    fn poll(&mut self) -> Poll<Result<(), Self::Error>> {
        match self.state {
            None => Poll::Ready(Ok(())),
            Some(HeadlightState::Set { percent }) => {
                self.set_level(percent as u32, 100);
                self.state = None;

                Poll::Ready(Ok(()))
            }
            Some(HeadlightState::Breathe {
                phase,
                step_duration,
                armed,
            }) => {
                if armed {
                    match self.timer.wait() {
                        Err(nb::Error::WouldBlock) => return Poll::Pending,
                        Err(nb::Error::Other(err)) => {
                            return Poll::Ready(Err(HeadlightError::TimerWait(err)))
                        }
                        Ok(()) => {}
                    }
                }

                let next_phase = match phase {
                    BreathePhase::RampUp { step } => {
                        self.set_level(step, BREATHE_STEPS);

                        if step >= BREATHE_STEPS {
                            Some(BreathePhase::RampDown { step: BREATHE_STEPS })
                        } else {
                            Some(BreathePhase::RampUp { step: step + 1 })
                        }
                    }
                    BreathePhase::RampDown { step } => {
                        self.set_level(step, BREATHE_STEPS);

                        if step == 0 {
                            None
                        } else {
                            Some(BreathePhase::RampDown { step: step - 1 })
                        }
                    }
                };

                match next_phase {
                    None => {
                        self.state = None;

                        Poll::Ready(Ok(()))
                    }
                    Some(next_phase) => {
                        self.timer
                            .start(step_duration)
                            .map_err(HeadlightError::TimerStart)?;
                        self.state = Some(HeadlightState::Breathe {
                            phase: next_phase,
                            step_duration,
                            armed: true,
                        });

                        Poll::Pending
                    }
                }
            }
        }
    }
}
