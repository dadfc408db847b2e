use carkit::{actuator_set, BuzzerAction, DriveAction, HeadlightAction, LedAction, ServoAction};

pub const TICK_TIMER_HZ: u32 = 1_000_000;

actuator_set!(Led { Status }, LedAction<TICK_TIMER_HZ>, LedId, LedSet, LedSetError);

actuator_set!(
    Headlight { Left, Right },
    HeadlightAction<TICK_TIMER_HZ>,
    HeadlightId,
    HeadlightSet,
    HeadlightSetError
);

actuator_set!(Drive { Chassis }, DriveAction, DriveId, DriveSet, DriveSetError);

actuator_set!(
    Servo { Lookout },
    ServoAction<TICK_TIMER_HZ>,
    ServoId,
    ServoSet,
    ServoSetError
);

// the kit's buzzer header is unpopulated on this board
actuator_set!(
    Buzzer {},
    BuzzerAction<TICK_TIMER_HZ>,
    BuzzerId,
    BuzzerSet,
    BuzzerSetError
);
