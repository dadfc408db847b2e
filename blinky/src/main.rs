#![no_main]
#![no_std]

use blinky as _;

use core::task::Poll;
use cortex_m_rt::entry;
use defmt::Debug2Format;
use fugit::ExtU32;
use stm32f7xx_hal::{pac, prelude::*};

use carkit::{
    actuator_set, BuzzerAction, Car, Command, DriveAction, HeadlightAction, HeadlightDevice,
    LedAction, LedDevice, Sensor, ServoAction, SwitchDevice, SwitchStatus, TickTimer,
};

use blinky::init_heap;

const TICK_TIMER_HZ: u32 = 1_000_000;
const ACTIVE_COMMANDS_COUNT: usize = 4;
const RUN_COMMANDS_COUNT: usize = 6;
const START_COMMANDS_COUNT: usize = 1;
const STOP_COMMANDS_COUNT: usize = 3;

actuator_set!(Led { Green, Blue, Red }, LedAction<TICK_TIMER_HZ>, LedId, LedSet, LedSetError);

actuator_set!(
    Headlight { Left, Right },
    HeadlightAction<TICK_TIMER_HZ>,
    HeadlightId,
    HeadlightSet,
    HeadlightSetError
);

actuator_set!(Drive {}, DriveAction, DriveId, DriveSet, DriveSetError);

actuator_set!(Servo {}, ServoAction<TICK_TIMER_HZ>, ServoId, ServoSet, ServoSetError);

actuator_set!(
    Buzzer {},
    BuzzerAction<TICK_TIMER_HZ>,
    BuzzerId,
    BuzzerSet,
    BuzzerSetError
);

type BlinkyCommand = Command<TICK_TIMER_HZ, LedId, HeadlightId, DriveId, ServoId, BuzzerId>;

fn get_run_commands() -> [BlinkyCommand; RUN_COMMANDS_COUNT] {
    [
        Command::Led(
            LedId::Green,
            LedAction::Blink {
                duration: 50.millis(),
            },
        ),
        Command::Led(
            LedId::Blue,
            LedAction::Blink {
                duration: 100.millis(),
            },
        ),
        Command::Led(
            LedId::Red,
            LedAction::Blink {
                duration: 200.millis(),
            },
        ),
        Command::Headlight(
            HeadlightId::Left,
            HeadlightAction::Breathe {
                period: 2_000.millis(),
            },
        ),
        Command::Headlight(
            HeadlightId::Right,
            HeadlightAction::Breathe {
                period: 2_000.millis(),
            },
        ),
        Command::Led(
            LedId::Green,
            LedAction::Blink {
                duration: 50.millis(),
            },
        ),
    ]
}

fn get_start_commands() -> [BlinkyCommand; START_COMMANDS_COUNT] {
    [Command::Led(LedId::Green, LedAction::Set { is_on: true })]
}

fn get_stop_commands() -> [BlinkyCommand; STOP_COMMANDS_COUNT] {
    [
        Command::Led(LedId::Green, LedAction::Set { is_on: false }),
        Command::Headlight(HeadlightId::Left, HeadlightAction::Set { percent: 0 }),
        Command::Headlight(HeadlightId::Right, HeadlightAction::Set { percent: 0 }),
    ]
}

#[entry]
fn main() -> ! {
    init_heap();

    defmt::println!("Init!");

    let p = pac::Peripherals::take().unwrap();

    let rcc = p.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();

    let gpiob = p.GPIOB.split();
    let gpioc = p.GPIOC.split();

    let tick_timer_device = p.TIM5.counter_us(&clocks);
    let mut tick_timer = TickTimer::new(tick_timer_device, u32::MAX);

    let user_button_pin = gpioc.pc13.into_floating_input();
    let mut user_button = SwitchDevice::new_active_high(user_button_pin, tick_timer.handle());

    let green_led = LedDevice::new(gpiob.pb0.into_push_pull_output(), tick_timer.handle());
    let blue_led = LedDevice::new(gpiob.pb7.into_push_pull_output(), tick_timer.handle());
    let red_led = LedDevice::new(gpiob.pb14.into_push_pull_output(), tick_timer.handle());

    let headlight_left_pin = gpiob.pb4.into_alternate();
    let headlight_right_pin = gpiob.pb5.into_alternate();
    let (headlight_left_pwm, headlight_right_pwm) = p
        .TIM3
        .pwm((headlight_left_pin, headlight_right_pin), 1.kHz(), &clocks);
    let headlight_left = HeadlightDevice::new(headlight_left_pwm, tick_timer.handle());
    let headlight_right = HeadlightDevice::new(headlight_right_pwm, tick_timer.handle());

    let mut car: Car<
        TICK_TIMER_HZ,
        ACTIVE_COMMANDS_COUNT,
        RUN_COMMANDS_COUNT,
        START_COMMANDS_COUNT,
        STOP_COMMANDS_COUNT,
        _,
        _,
        _,
        _,
        _,
    > = Car::new(
        LedSet::new(green_led, blue_led, red_led),
        HeadlightSet::new(headlight_left, headlight_right),
        DriveSet::new(),
        ServoSet::new(),
        BuzzerSet::new(),
        &get_run_commands(),
        &get_start_commands(),
        &get_stop_commands(),
    )
    .expect("Error building car");

    tick_timer.setup().expect("Failed to setup tick timer");
    loop {
        tick_timer.tick().expect("Failed to tick tick timer");

        if let Some(update) = user_button.sense().expect("Error reading user button") {
            if let SwitchStatus::On = update.status {
                car.toggle();
            }
        }

        if let Poll::Ready(Err(err)) = car.poll() {
            defmt::println!("Unexpected error: {}", Debug2Format(&err));

            car.stop();
        }
    }
}
