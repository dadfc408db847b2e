use core::fmt::Debug;
use defmt::Format;
use fugit::TimerDurationU32 as TimerDuration;
use fugit_timer::Timer;
use nb;

use crate::actuators::drive::{DriveAction, Motion};
use crate::error::Error;
use crate::sensors::ultrasonic::RangeUpdate;

/// Closer than this and the car turns away instead of driving on.
const OBSTACLE_MILLIMETERS: u32 = 250;
/// How long to spin before re-checking the way ahead.
const SPIN_MILLIS: u32 = 1_500;

const CRUISE_SPEED: u8 = 150;
const SPIN_SPEED: u8 = 180;

#[derive(Clone, Copy, Debug, Format)]
enum AvoidState {
    Cruising,
    Turning,
}

/// Drive forward until something is in the way, then spin left for a fixed
/// time and stop to take a fresh reading.
///
/// Feed every ranging update to [`on_range`](Self::on_range) and call
/// [`poll`](Self::poll) each loop iteration; both return the next chassis
/// action when one is due.
pub struct ObstacleAvoider<T, const TIMER_HZ: u32>
where
    T: Timer<TIMER_HZ>,
{
    timer: T,
    state: AvoidState,
}

#[derive(Clone, Copy, Debug)]
pub enum AvoidError<TimerError: Debug> {
    TimerStart(TimerError),
    TimerWait(TimerError),
}

impl<TimerError: Debug> Error for AvoidError<TimerError> {}

impl<T, const TIMER_HZ: u32> ObstacleAvoider<T, TIMER_HZ>
where
    T: Timer<TIMER_HZ>,
{
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            state: AvoidState::Cruising,
        }
    }

    /// React to a ranging update. An out-of-range reading counts as a clear
    /// road.
    pub fn on_range(
        &mut self,
        range: &RangeUpdate,
    ) -> Result<Option<DriveAction>, AvoidError<T::Error>> {
        if let AvoidState::Turning = self.state {
            // committed to the spin, readings of the passing scenery do not
            // matter
            return Ok(None);
        }

        let blocked = match range.millimeters() {
            Some(millimeters) => millimeters <= OBSTACLE_MILLIMETERS,
            None => false,
        };

        if blocked {
            self.timer
                .start(TimerDuration::<TIMER_HZ>::millis(SPIN_MILLIS))
                .map_err(AvoidError::TimerStart)?;
            self.state = AvoidState::Turning;

            Ok(Some(DriveAction::Move {
                motion: Motion::SpinLeft,
                speed: SPIN_SPEED,
            }))
        } else {
            Ok(Some(DriveAction::Move {
                motion: Motion::Forward,
                speed: CRUISE_SPEED,
            }))
        }
    }

    /// Finish a pending spin once its time is up.
    pub fn poll(&mut self) -> Result<Option<DriveAction>, AvoidError<T::Error>> {
        if let AvoidState::Cruising = self.state {
            return Ok(None);
        }

        match self.timer.wait() {
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(err)) => Err(AvoidError::TimerWait(err)),
            Ok(()) => {
                self.state = AvoidState::Cruising;

                Ok(Some(DriveAction::Stop))
            }
        }
    }
}
