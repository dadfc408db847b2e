use alloc::boxed::Box;
use core::task::Poll;
use heapless::Vec;

use crate::actuators::{
    buzzer::BuzzerAction, drive::DriveAction, headlight::HeadlightAction, led::LedAction,
    servo::ServoAction, ActuatorSet,
};
use crate::error::Error;
use crate::runner::{Command, Runner};
use crate::scheduler::Scheduler;

type CarCommand<const TIMER_HZ: u32, Leds, Headlights, Drives, Servos, Buzzers> = Command<
    TIMER_HZ,
    <Leds as ActuatorSet>::Id,
    <Headlights as ActuatorSet>::Id,
    <Drives as ActuatorSet>::Id,
    <Servos as ActuatorSet>::Id,
    <Buzzers as ActuatorSet>::Id,
>;

#[derive(Copy, Clone, Debug)]
pub enum CarBuildError {
    TooManyRunCommands,
    TooManyStartCommands,
    TooManyStopCommands,
}

/// The whole car: actuator sets plus a scripted routine, driven by
/// `start`/`stop`/`toggle` and polled from the main loop.
///
/// Actuator ids are typed enums generated by
/// [`actuator_set!`](crate::actuator_set), so every command is known to
/// address a real device at compile time.
pub struct Car<
    const TIMER_HZ: u32,
    const ACTIVE_COMMANDS_COUNT: usize,
    const RUN_COMMANDS_COUNT: usize,
    const START_COMMANDS_COUNT: usize,
    const STOP_COMMANDS_COUNT: usize,
    Leds,
    Headlights,
    Drives,
    Servos,
    Buzzers,
> where
    Leds: ActuatorSet<Action = LedAction<TIMER_HZ>>,
    Headlights: ActuatorSet<Action = HeadlightAction<TIMER_HZ>>,
    Drives: ActuatorSet<Action = DriveAction>,
    Servos: ActuatorSet<Action = ServoAction<TIMER_HZ>>,
    Buzzers: ActuatorSet<Action = BuzzerAction<TIMER_HZ>>,
{
    scheduler: Scheduler<
        CarCommand<TIMER_HZ, Leds, Headlights, Drives, Servos, Buzzers>,
        Runner<TIMER_HZ, ACTIVE_COMMANDS_COUNT, Leds, Headlights, Drives, Servos, Buzzers>,
        RUN_COMMANDS_COUNT,
        START_COMMANDS_COUNT,
        STOP_COMMANDS_COUNT,
    >,
}

impl<
        const TIMER_HZ: u32,
        const ACTIVE_COMMANDS_COUNT: usize,
        const RUN_COMMANDS_COUNT: usize,
        const START_COMMANDS_COUNT: usize,
        const STOP_COMMANDS_COUNT: usize,
        Leds,
        Headlights,
        Drives,
        Servos,
        Buzzers,
    >
    Car<
        TIMER_HZ,
        ACTIVE_COMMANDS_COUNT,
        RUN_COMMANDS_COUNT,
        START_COMMANDS_COUNT,
        STOP_COMMANDS_COUNT,
        Leds,
        Headlights,
        Drives,
        Servos,
        Buzzers,
    >
where
    Leds: ActuatorSet<Action = LedAction<TIMER_HZ>>,
    Leds::Error: 'static,
    Headlights: ActuatorSet<Action = HeadlightAction<TIMER_HZ>>,
    Headlights::Error: 'static,
    Drives: ActuatorSet<Action = DriveAction>,
    Drives::Error: 'static,
    Servos: ActuatorSet<Action = ServoAction<TIMER_HZ>>,
    Servos::Error: 'static,
    Buzzers: ActuatorSet<Action = BuzzerAction<TIMER_HZ>>,
    Buzzers::Error: 'static,
    Leds::Id: 'static,
    Headlights::Id: 'static,
    Drives::Id: 'static,
    Servos::Id: 'static,
    Buzzers::Id: 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        leds: Leds,
        headlights: Headlights,
        drives: Drives,
        servos: Servos,
        buzzers: Buzzers,
        run_commands: &[CarCommand<TIMER_HZ, Leds, Headlights, Drives, Servos, Buzzers>],
        start_commands: &[CarCommand<TIMER_HZ, Leds, Headlights, Drives, Servos, Buzzers>],
        stop_commands: &[CarCommand<TIMER_HZ, Leds, Headlights, Drives, Servos, Buzzers>],
    ) -> Result<Self, CarBuildError> {
        let run_commands =
            Vec::from_slice(run_commands).map_err(|_| CarBuildError::TooManyRunCommands)?;
        let start_commands =
            Vec::from_slice(start_commands).map_err(|_| CarBuildError::TooManyStartCommands)?;
        let stop_commands =
            Vec::from_slice(stop_commands).map_err(|_| CarBuildError::TooManyStopCommands)?;

        let runner = Runner::new(leds, headlights, drives, servos, buzzers);
        let scheduler = Scheduler::new(runner, run_commands, start_commands, stop_commands);

        Ok(Self { scheduler })
    }

    pub fn start(&mut self) {
        self.scheduler.start()
    }

    pub fn stop(&mut self) {
        self.scheduler.stop()
    }

    pub fn toggle(&mut self) {
        self.scheduler.toggle()
    }

    pub fn poll(&mut self) -> Poll<Result<(), Box<dyn Error>>> {
        match self.scheduler.poll() {
            Poll::Ready(Err(err)) => Poll::Ready(Err(err.into())),
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            Poll::Pending => Poll::Pending,
        }
    }
}
