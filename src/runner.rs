use core::fmt::Debug;
use core::task::Poll;
use defmt::Format;
use heapless::Deque;

use crate::actuators::{
    buzzer::BuzzerAction, drive::DriveAction, headlight::HeadlightAction, led::LedAction,
    servo::ServoAction, Actuator, ActuatorSet,
};
use crate::error::Error;

/// One command addressed to one actuator of the car.
#[derive(Clone, Copy, Debug, Format)]
pub enum Command<const TIMER_HZ: u32, LedId, HeadlightId, DriveId, ServoId, BuzzerId>
where
    LedId: Debug + Format,
    HeadlightId: Debug + Format,
    DriveId: Debug + Format,
    ServoId: Debug + Format,
    BuzzerId: Debug + Format,
{
    Led(LedId, LedAction<TIMER_HZ>),
    Headlight(HeadlightId, HeadlightAction<TIMER_HZ>),
    Drive(DriveId, DriveAction),
    Servo(ServoId, ServoAction<TIMER_HZ>),
    Buzzer(BuzzerId, BuzzerAction<TIMER_HZ>),
}

#[derive(Clone, Copy, Debug, Format)]
pub enum RunnerAction<Command> {
    Run(Command),
    Reset,
}

#[derive(Clone, Copy, Debug)]
pub enum RunnerError<
    LedId,
    LedSetError,
    HeadlightId,
    HeadlightSetError,
    DriveId,
    DriveSetError,
    ServoId,
    ServoSetError,
    BuzzerId,
    BuzzerSetError,
> where
    LedId: Debug + Format,
    LedSetError: Debug,
    HeadlightId: Debug + Format,
    HeadlightSetError: Debug,
    DriveId: Debug + Format,
    DriveSetError: Debug,
    ServoId: Debug + Format,
    ServoSetError: Debug,
    BuzzerId: Debug + Format,
    BuzzerSetError: Debug,
{
    Led(LedId, LedSetError),
    Headlight(HeadlightId, HeadlightSetError),
    Drive(DriveId, DriveSetError),
    Servo(ServoId, ServoSetError),
    Buzzer(BuzzerId, BuzzerSetError),
}

impl<
        LedId,
        LedSetError,
        HeadlightId,
        HeadlightSetError,
        DriveId,
        DriveSetError,
        ServoId,
        ServoSetError,
        BuzzerId,
        BuzzerSetError,
    > Error
    for RunnerError<
        LedId,
        LedSetError,
        HeadlightId,
        HeadlightSetError,
        DriveId,
        DriveSetError,
        ServoId,
        ServoSetError,
        BuzzerId,
        BuzzerSetError,
    >
where
    LedId: Debug + Format,
    LedSetError: Debug,
    HeadlightId: Debug + Format,
    HeadlightSetError: Debug,
    DriveId: Debug + Format,
    DriveSetError: Debug,
    ServoId: Debug + Format,
    ServoSetError: Debug,
    BuzzerId: Debug + Format,
    BuzzerSetError: Debug,
{
}

/// Dispatches commands to the car's actuator sets and polls the in-flight
/// ones to completion.
pub struct Runner<
    const TIMER_HZ: u32,
    const ACTIVE_COMMANDS_COUNT: usize,
    LedSet,
    HeadlightSet,
    DriveSet,
    ServoSet,
    BuzzerSet,
> where
    LedSet: ActuatorSet<Action = LedAction<TIMER_HZ>>,
    HeadlightSet: ActuatorSet<Action = HeadlightAction<TIMER_HZ>>,
    DriveSet: ActuatorSet<Action = DriveAction>,
    ServoSet: ActuatorSet<Action = ServoAction<TIMER_HZ>>,
    BuzzerSet: ActuatorSet<Action = BuzzerAction<TIMER_HZ>>,
{
    active_commands: Deque<
        Command<TIMER_HZ, LedSet::Id, HeadlightSet::Id, DriveSet::Id, ServoSet::Id, BuzzerSet::Id>,
        ACTIVE_COMMANDS_COUNT,
    >,
    leds: LedSet,
    headlights: HeadlightSet,
    drives: DriveSet,
    servos: ServoSet,
    buzzers: BuzzerSet,
}

impl<
        const TIMER_HZ: u32,
        const ACTIVE_COMMANDS_COUNT: usize,
        LedSet,
        HeadlightSet,
        DriveSet,
        ServoSet,
        BuzzerSet,
    > Runner<TIMER_HZ, ACTIVE_COMMANDS_COUNT, LedSet, HeadlightSet, DriveSet, ServoSet, BuzzerSet>
where
    LedSet: ActuatorSet<Action = LedAction<TIMER_HZ>>,
    HeadlightSet: ActuatorSet<Action = HeadlightAction<TIMER_HZ>>,
    DriveSet: ActuatorSet<Action = DriveAction>,
    ServoSet: ActuatorSet<Action = ServoAction<TIMER_HZ>>,
    BuzzerSet: ActuatorSet<Action = BuzzerAction<TIMER_HZ>>,
{
    pub fn new(
        leds: LedSet,
        headlights: HeadlightSet,
        drives: DriveSet,
        servos: ServoSet,
        buzzers: BuzzerSet,
    ) -> Self {
        Self {
            active_commands: Deque::new(),
            leds,
            headlights,
            drives,
            servos,
            buzzers,
        }
    }
}

impl<
        const TIMER_HZ: u32,
        const ACTIVE_COMMANDS_COUNT: usize,
        LedSet,
        HeadlightSet,
        DriveSet,
        ServoSet,
        BuzzerSet,
    > Actuator
    for Runner<TIMER_HZ, ACTIVE_COMMANDS_COUNT, LedSet, HeadlightSet, DriveSet, ServoSet, BuzzerSet>
where
    LedSet: ActuatorSet<Action = LedAction<TIMER_HZ>>,
    HeadlightSet: ActuatorSet<Action = HeadlightAction<TIMER_HZ>>,
    DriveSet: ActuatorSet<Action = DriveAction>,
    ServoSet: ActuatorSet<Action = ServoAction<TIMER_HZ>>,
    BuzzerSet: ActuatorSet<Action = BuzzerAction<TIMER_HZ>>,
{
    type Action = RunnerAction<
        Command<TIMER_HZ, LedSet::Id, HeadlightSet::Id, DriveSet::Id, ServoSet::Id, BuzzerSet::Id>,
    >;
    type Error = RunnerError<
        LedSet::Id,
        LedSet::Error,
        HeadlightSet::Id,
        HeadlightSet::Error,
        DriveSet::Id,
        DriveSet::Error,
        ServoSet::Id,
        ServoSet::Error,
        BuzzerSet::Id,
        BuzzerSet::Error,
    >;

    fn run(&mut self, action: &Self::Action) {
        match action {
            RunnerAction::Run(command) => {
                match command {
                    Command::Led(id, action) => self.leds.run(id, action),
                    Command::Headlight(id, action) => self.headlights.run(id, action),
                    Command::Drive(id, action) => self.drives.run(id, action),
                    Command::Servo(id, action) => self.servos.run(id, action),
                    Command::Buzzer(id, action) => self.buzzers.run(id, action),
                }

                // a command that does not fit evicts the oldest in-flight
                // one rather than getting lost
                if self.active_commands.is_full() {
                    self.active_commands.pop_front();
                }
                self.active_commands.push_back(*command).ok();
            }
            RunnerAction::Reset => self.active_commands.clear(),
        }
    }

    fn poll(&mut self) -> Poll<Result<(), Self::Error>> {
        let num_commands = self.active_commands.len();
        for _ in 0..num_commands {
            let command = match self.active_commands.pop_front() {
                Some(command) => command,
                None => break,
            };

            let result = match command {
                Command::Led(id, _) => self.leds.poll(&id).map_err(|err| RunnerError::Led(id, err)),
                Command::Headlight(id, _) => self
                    .headlights
                    .poll(&id)
                    .map_err(|err| RunnerError::Headlight(id, err)),
                Command::Drive(id, _) => self
                    .drives
                    .poll(&id)
                    .map_err(|err| RunnerError::Drive(id, err)),
                Command::Servo(id, _) => self
                    .servos
                    .poll(&id)
                    .map_err(|err| RunnerError::Servo(id, err)),
                Command::Buzzer(id, _) => self
                    .buzzers
                    .poll(&id)
                    .map_err(|err| RunnerError::Buzzer(id, err)),
            };

            match result {
                Poll::Ready(Ok(())) => {}
                Poll::Ready(Err(err)) => {
                    self.active_commands.push_back(command).ok();

                    return Poll::Ready(Err(err));
                }
                Poll::Pending => {
                    self.active_commands.push_back(command).ok();
                }
            }
        }

        if self.active_commands.is_empty() {
            Poll::Ready(Ok(()))
        } else {
            Poll::Pending
        }
    }
}
