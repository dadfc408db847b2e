#![no_main]
#![no_std]

use smartcar as _;

use core::cell::RefCell;
use core::task::Poll;
use cortex_m::interrupt::Mutex;
use cortex_m_rt::entry;
use defmt::{Debug2Format, Format};
use fugit::{ExtU32, TimerInstantU32 as TimerInstant};
use stm32f7xx_hal::{
    adc::Adc,
    gpio::{Edge, ExtiPin, Floating, Input, Output, Pin, PushPull},
    pac::{self, interrupt},
    prelude::*,
    timer::Counter,
    watchdog,
};

use carkit::{
    behavior::{follow, remote, ObstacleAvoider},
    Actuator, Button, Command, DriveAction, DriveDevice, FrameLatch, HeadlightAction,
    HeadlightDevice, IrRemoteDevice, LedDevice, LineTrackerDevice, PulseCapture, Runner,
    RunnerAction, Sensor, ServoAction, ServoDevice, SwitchDevice, SwitchStatus, TickTimer,
    UltrasonicDevice,
};

use smartcar::{
    actuators::{
        BuzzerSet, DriveId, DriveSet, HeadlightId, HeadlightSet, LedId, LedSet, ServoId, ServoSet,
        TICK_TIMER_HZ,
    },
    init_heap,
};

const ACTIVE_COMMANDS_COUNT: usize = 8;

const TICK_TIMER_MAX: u32 = u32::MAX;
type TickTimerDevice = Counter<pac::TIM5, TICK_TIMER_HZ>;

type IrReceiverPin = Pin<'C', 7, Input<Floating>>;

type StatusLedPin = Pin<'B', 0, Output<PushPull>>;

/* drive shift register */
type DriveDataPin = Pin<'E', 13, Output<PushPull>>;
type DriveClockPin = Pin<'E', 14, Output<PushPull>>;
type DriveLatchPin = Pin<'E', 15, Output<PushPull>>;
type DriveEnablePin = Pin<'E', 12, Output<PushPull>>;

/* ultrasonic ranger */
type RangerTrigPin = Pin<'F', 13, Output<PushPull>>;
type RangerEchoPin = Pin<'F', 12, Input<Floating>>;

// the edge interrupt hands timing off to the polling loop through these
static IR_LATCH: FrameLatch = FrameLatch::new();
static IR_CAPTURE: Mutex<RefCell<Option<PulseCapture<'static, TICK_TIMER_HZ>>>> =
    Mutex::new(RefCell::new(None));
static IR_PIN: Mutex<RefCell<Option<IrReceiverPin>>> = Mutex::new(RefCell::new(None));

#[derive(Clone, Copy, Debug, Format, PartialEq, Eq)]
enum DriveMode {
    /// Remote buttons steer the chassis directly.
    Manual,
    /// Cruise and turn away from obstacles.
    Avoid,
    /// Follow the dark line under the tracker probes.
    Follow,
}

#[entry]
fn main() -> ! {
    init_heap();

    defmt::println!("Init!");

    let mut p = pac::Peripherals::take().unwrap();

    let mut rcc = p.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();

    let gpiob = p.GPIOB.split();
    let gpioc = p.GPIOC.split();
    let gpiod = p.GPIOD.split();
    let gpiof = p.GPIOF.split();
    let gpioe = p.GPIOE.split();

    let tick_timer_device: TickTimerDevice = p.TIM5.counter_us(&clocks);
    let mut tick_timer = TickTimer::new(tick_timer_device, TICK_TIMER_MAX);

    /* user button, stops everything */
    let user_button_pin = gpioc.pc13.into_floating_input();
    let mut user_button = SwitchDevice::new_active_high(user_button_pin, tick_timer.handle());

    /* status led */
    let status_led_pin: StatusLedPin = gpiob.pb0.into_push_pull_output();
    let status_led = LedDevice::new(status_led_pin, tick_timer.handle());

    /* headlights on TIM12 */
    let headlight_left_pin = gpiob.pb14.into_alternate();
    let headlight_right_pin = gpiob.pb15.into_alternate();
    let (headlight_left_pwm, headlight_right_pwm) = p
        .TIM12
        .pwm((headlight_left_pin, headlight_right_pin), 1.kHz(), &clocks);
    let headlight_left = HeadlightDevice::new(headlight_left_pwm, tick_timer.handle());
    let headlight_right = HeadlightDevice::new(headlight_right_pwm, tick_timer.handle());

    /* chassis drive: shift register + TIM3 motor supplies */
    let drive_data_pin: DriveDataPin = gpioe.pe13.into_push_pull_output();
    let drive_clock_pin: DriveClockPin = gpioe.pe14.into_push_pull_output();
    let drive_latch_pin: DriveLatchPin = gpioe.pe15.into_push_pull_output();
    let drive_enable_pin: DriveEnablePin = gpioe.pe12.into_push_pull_output();
    let drive_pwm_left_pin = gpiob.pb4.into_alternate();
    let drive_pwm_right_pin = gpiob.pb5.into_alternate();
    let (drive_pwm_left, drive_pwm_right) = p
        .TIM3
        .pwm((drive_pwm_left_pin, drive_pwm_right_pin), 500.Hz(), &clocks);
    let drive = DriveDevice::new(
        drive_data_pin,
        drive_clock_pin,
        drive_latch_pin,
        drive_enable_pin,
        drive_pwm_left,
        drive_pwm_right,
    );

    /* lookout servo on TIM4, centered at boot */
    let servo_pin = gpiod.pd12.into_alternate();
    let servo_pwm = p.TIM4.pwm(servo_pin, 50.Hz(), &clocks);
    let lookout_servo = ServoDevice::new(servo_pwm, tick_timer.handle(), 90);

    /* ultrasonic ranger */
    let ranger_trig_pin: RangerTrigPin = gpiof.pf13.into_push_pull_output();
    let ranger_echo_pin: RangerEchoPin = gpiof.pf12.into_floating_input();
    let mut ranger = UltrasonicDevice::new(ranger_trig_pin, ranger_echo_pin, tick_timer.handle());

    /* line tracker probes on ADC1 */
    let adc = Adc::adc1(p.ADC1, &mut rcc.apb2, &clocks, 12, true);
    let probe_left_pin = gpioc.pc0.into_analog();
    let probe_middle_pin = gpioc.pc3.into_analog();
    let probe_right_pin = gpiof.pf4.into_analog();
    let mut tracker =
        LineTrackerDevice::new(adc, probe_left_pin, probe_middle_pin, probe_right_pin);

    /* infrared receiver: edge interrupt feeds the capture state machine */
    let mut ir_pin: IrReceiverPin = gpioc.pc7.into_floating_input();
    let mut syscfg = p.SYSCFG.constrain();
    ir_pin.make_interrupt_source(&mut syscfg);
    ir_pin.trigger_on_edge(&mut p.EXTI, Edge::RisingFalling);
    ir_pin.enable_interrupt(&mut p.EXTI);
    cortex_m::interrupt::free(|cs| {
        IR_CAPTURE
            .borrow(cs)
            .replace(Some(PulseCapture::new(&IR_LATCH)));
        IR_PIN.borrow(cs).replace(Some(ir_pin));
    });
    unsafe { cortex_m::peripheral::NVIC::unmask(pac::Interrupt::EXTI9_5) };

    let mut ir_remote = IrRemoteDevice::new(&IR_LATCH);

    let mut runner: Runner<
        TICK_TIMER_HZ,
        ACTIVE_COMMANDS_COUNT,
        LedSet<_>,
        HeadlightSet<_, _>,
        DriveSet<_>,
        ServoSet<_>,
        BuzzerSet,
    > = Runner::new(
        LedSet::new(status_led),
        HeadlightSet::new(headlight_left, headlight_right),
        DriveSet::new(drive),
        ServoSet::new(lookout_servo),
        BuzzerSet::new(),
    );

    let mut avoider = ObstacleAvoider::new(tick_timer.handle());
    let mut mode = DriveMode::Manual;

    let mut iwdg = watchdog::IndependentWatchdog::new(p.IWDG);

    iwdg.start(2.millis());

    tick_timer.setup().expect("Failed to setup tick timer");
    loop {
        tick_timer.tick().expect("Failed to tick tick timer");

        if let Some(update) = user_button.sense().expect("Error reading user button") {
            if let SwitchStatus::On = update.status {
                mode = enter_mode(&mut runner, DriveMode::Manual);
            }
        }

        if let Some(update) = ir_remote.sense().expect("Error reading remote") {
            defmt::println!("Remote: {}", update);

            mode = match update.button {
                Some(Button::Star) => enter_mode(&mut runner, DriveMode::Avoid),
                Some(Button::Hash) => enter_mode(&mut runner, DriveMode::Follow),
                Some(Button::Ok) => enter_mode(&mut runner, DriveMode::Manual),
                Some(Button::Two) => {
                    run_headlights(&mut runner);
                    mode
                }
                Some(Button::Five) => {
                    run_lookout_sweep(&mut runner);
                    mode
                }
                _ => {
                    if let DriveMode::Manual = mode {
                        runner.run(&RunnerAction::Run(Command::Drive(
                            DriveId::Chassis,
                            remote::drive_for_button(update.button),
                        )));
                    }
                    mode
                }
            };
        }

        match mode {
            DriveMode::Manual => {}
            DriveMode::Avoid => {
                if let Some(range) = ranger.sense().expect("Error reading ranger") {
                    if let Some(action) = avoider.on_range(&range).expect("Error avoiding") {
                        runner.run(&RunnerAction::Run(Command::Drive(DriveId::Chassis, action)));
                    }
                }
                if let Some(action) = avoider.poll().expect("Error avoiding") {
                    runner.run(&RunnerAction::Run(Command::Drive(DriveId::Chassis, action)));
                }
            }
            DriveMode::Follow => {
                if let Some(line) = tracker.sense().expect("Error reading tracker") {
                    if let Some(action) = follow::follow_three_probe(&line) {
                        runner.run(&RunnerAction::Run(Command::Drive(DriveId::Chassis, action)));
                    }
                }
            }
        }

        if let Poll::Ready(Err(err)) = runner.poll() {
            defmt::println!("Unexpected error: {}", Debug2Format(&err));

            runner.run(&RunnerAction::Reset);
            runner.run(&RunnerAction::Run(Command::Drive(
                DriveId::Chassis,
                DriveAction::Stop,
            )));
        }

        iwdg.feed();
    }
}

/// Switch driving mode: halt the chassis and blink the status led.
fn enter_mode<R>(runner: &mut R, mode: DriveMode) -> DriveMode
where
    R: Actuator<
        Action = RunnerAction<
            Command<TICK_TIMER_HZ, LedId, HeadlightId, DriveId, ServoId, smartcar::actuators::BuzzerId>,
        >,
    >,
{
    defmt::println!("Mode: {}", mode);

    runner.run(&RunnerAction::Run(Command::Drive(
        DriveId::Chassis,
        DriveAction::Stop,
    )));
    runner.run(&RunnerAction::Run(Command::Led(
        LedId::Status,
        carkit::LedAction::Blink {
            duration: 100.millis(),
        },
    )));

    mode
}

fn run_headlights<R>(runner: &mut R)
where
    R: Actuator<
        Action = RunnerAction<
            Command<TICK_TIMER_HZ, LedId, HeadlightId, DriveId, ServoId, smartcar::actuators::BuzzerId>,
        >,
    >,
{
    for id in [HeadlightId::Left, HeadlightId::Right] {
        runner.run(&RunnerAction::Run(Command::Headlight(
            id,
            HeadlightAction::Breathe {
                period: 2_000.millis(),
            },
        )));
    }
}

fn run_lookout_sweep<R>(runner: &mut R)
where
    R: Actuator<
        Action = RunnerAction<
            Command<TICK_TIMER_HZ, LedId, HeadlightId, DriveId, ServoId, smartcar::actuators::BuzzerId>,
        >,
    >,
{
    runner.run(&RunnerAction::Run(Command::Servo(
        ServoId::Lookout,
        ServoAction::Sweep {
            from: 0,
            to: 180,
            step_delay: 10.millis(),
        },
    )));
}

#[interrupt]
fn EXTI9_5() {
    cortex_m::interrupt::free(|cs| {
        if let Some(pin) = IR_PIN.borrow(cs).borrow_mut().as_mut() {
            pin.clear_interrupt_pending_bit();
        }

        if let Some(capture) = IR_CAPTURE.borrow(cs).borrow_mut().as_mut() {
            // TIM5 runs the microsecond tick; read it directly so the
            // timestamp is taken inside the interrupt, not at the next poll
            let ticks = unsafe { (*pac::TIM5::ptr()).cnt.read().bits() };
            capture.edge(TimerInstant::from_ticks(ticks));
        }
    });
}
