// https://playground.arduino.cc/Code/TimingRollover/

use alloc::rc::Rc;
use core::sync::atomic::{AtomicU32, Ordering};
use defmt::Format;
use fugit::{TimerDurationU32 as TimerDuration, TimerInstantU32 as TimerInstant};
use fugit_timer::Timer;
use nb;

use crate::error::Error;

/// One hardware counter fanned out to any number of software timers.
///
/// The kit needs many concurrent timeouts (debounce, blink, breathe, sweep,
/// melody, echo timeout) but only one hardware timer. `TickTimer` owns the
/// hardware counter and publishes its tick count through a shared cell;
/// [`TimerHandle`]s read that cell and do their own deadline arithmetic.
pub struct TickTimer<T, const TIMER_HZ: u32>
where
    T: Timer<TIMER_HZ>,
{
    now: Rc<AtomicU32>,
    timer: T,
    max_ticks: u32,
}

impl<T, const TIMER_HZ: u32> TickTimer<T, TIMER_HZ>
where
    T: Timer<TIMER_HZ>,
{
    pub fn new(timer: T, max_ticks: u32) -> Self {
        Self {
            now: Rc::new(AtomicU32::new(0)),
            timer,
            max_ticks,
        }
    }

    pub fn setup(&mut self) -> Result<(), T::Error> {
        let max_duration = TimerDuration::<TIMER_HZ>::from_ticks(self.max_ticks);
        self.timer.start(max_duration)?;
        Ok(())
    }

    /// Call once per main-loop iteration to refresh the shared tick count.
    pub fn tick(&mut self) -> Result<(), T::Error> {
        let ticks = self.timer.now().ticks();
        self.now.store(ticks, Ordering::SeqCst);

        match self.timer.wait() {
            Ok(()) => {
                self.setup()?;
            }
            Err(nb::Error::WouldBlock) => {}
            Err(nb::Error::Other(err)) => return Err(err),
        }

        Ok(())
    }

    pub fn now(&self) -> TimerInstant<TIMER_HZ> {
        TimerInstant::from_ticks(self.now.load(Ordering::SeqCst))
    }

    pub fn handle(&self) -> TimerHandle<TIMER_HZ> {
        TimerHandle::new(self.now.clone())
    }
}

/// Cheap software timer backed by a [`TickTimer`]'s shared tick cell.
#[derive(Clone)]
pub struct TimerHandle<const TIMER_HZ: u32> {
    now: Rc<AtomicU32>,
    state: HandleState<TIMER_HZ>,
}

#[derive(Clone, Copy, Debug, Format)]
enum HandleState<const TIMER_HZ: u32> {
    Stopped,
    Running {
        start: TimerInstant<TIMER_HZ>,
        duration: TimerDuration<TIMER_HZ>,
    },
}

impl<const TIMER_HZ: u32> TimerHandle<TIMER_HZ> {
    pub fn new(now: Rc<AtomicU32>) -> Self {
        Self {
            now,
            state: HandleState::Stopped,
        }
    }
}

#[derive(Clone, Copy, Debug, Format)]
pub enum TimerHandleError {
    NotStarted,
}

impl Error for TimerHandleError {}

impl<const TIMER_HZ: u32> Timer<TIMER_HZ> for TimerHandle<TIMER_HZ> {
    type Error = TimerHandleError;

    fn now(&mut self) -> TimerInstant<TIMER_HZ> {
        TimerInstant::from_ticks(self.now.load(Ordering::SeqCst))
    }

    fn start(&mut self, duration: TimerDuration<TIMER_HZ>) -> Result<(), Self::Error> {
        let start = TimerInstant::from_ticks(self.now.load(Ordering::SeqCst));

        self.state = HandleState::Running { start, duration };

        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Self::Error> {
        match self.state {
            HandleState::Stopped => Err(TimerHandleError::NotStarted),
            HandleState::Running { .. } => {
                self.state = HandleState::Stopped;

                Ok(())
            }
        }
    }

    fn wait(&mut self) -> nb::Result<(), Self::Error> {
        match self.state {
            HandleState::Stopped => Err(nb::Error::Other(TimerHandleError::NotStarted)),
            HandleState::Running { start, duration } => {
                // wrapping subtraction so counter rollover is harmless
                let elapsed = self.now().ticks().wrapping_sub(start.ticks());

                if elapsed > duration.ticks() {
                    Ok(())
                } else {
                    Err(nb::Error::WouldBlock)
                }
            }
        }
    }
}
