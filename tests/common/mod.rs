#![allow(dead_code)]

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use core::sync::atomic::{AtomicU32, Ordering};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::adc::{Channel, OneShot};
use embedded_hal::digital::v2::{InputPin, OutputPin};
use embedded_hal::PwmPin;
use fugit::TimerInstantU32 as TimerInstant;

use carkit::{timer::TimerHandle, ToneEmitter};

/// All tests run their timers at 1 MHz, so ticks are microseconds.
pub const TICK_HZ: u32 = 1_000_000;

/// Manually advanced time source, standing in for the hardware counter
/// behind [`carkit::TickTimer`].
#[derive(Clone)]
pub struct Clock {
    ticks: Rc<AtomicU32>,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            ticks: Rc::new(AtomicU32::new(0)),
        }
    }

    pub fn handle(&self) -> TimerHandle<TICK_HZ> {
        TimerHandle::new(self.ticks.clone())
    }

    pub fn advance_micros(&self, micros: u32) {
        self.ticks.fetch_add(micros, Ordering::SeqCst);
    }

    pub fn now(&self) -> TimerInstant<TICK_HZ> {
        TimerInstant::from_ticks(self.ticks.load(Ordering::SeqCst))
    }
}

pub type PinLog = Rc<RefCell<Vec<(&'static str, bool)>>>;

pub fn pin_log() -> PinLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Scriptable input / recording output pin.
#[derive(Clone)]
pub struct FakePin {
    name: &'static str,
    level: Rc<Cell<bool>>,
    log: Option<PinLog>,
}

impl FakePin {
    pub fn new() -> Self {
        Self {
            name: "",
            level: Rc::new(Cell::new(false)),
            log: None,
        }
    }

    /// A pin that records every output write into a shared log, so tests
    /// can reconstruct the order of writes across several pins.
    pub fn logged(name: &'static str, log: &PinLog) -> Self {
        Self {
            name,
            level: Rc::new(Cell::new(false)),
            log: Some(log.clone()),
        }
    }

    pub fn set_level(&self, level: bool) {
        self.level.set(level);
    }

    pub fn level(&self) -> bool {
        self.level.get()
    }
}

impl OutputPin for FakePin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.level.set(false);
        if let Some(log) = &self.log {
            log.borrow_mut().push((self.name, false));
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.level.set(true);
        if let Some(log) = &self.log {
            log.borrow_mut().push((self.name, true));
        }
        Ok(())
    }
}

impl InputPin for FakePin {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.level.get())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.level.get())
    }
}

/// PWM channel that remembers its duty.
#[derive(Clone)]
pub struct FakePwm {
    duty: Rc<Cell<u16>>,
    enabled: Rc<Cell<bool>>,
    max_duty: u16,
}

impl FakePwm {
    pub fn new(max_duty: u16) -> Self {
        Self {
            duty: Rc::new(Cell::new(0)),
            enabled: Rc::new(Cell::new(false)),
            max_duty,
        }
    }

    pub fn duty(&self) -> u16 {
        self.duty.get()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

impl PwmPin for FakePwm {
    type Duty = u16;

    fn disable(&mut self) {
        self.enabled.set(false);
    }

    fn enable(&mut self) {
        self.enabled.set(true);
    }

    fn get_duty(&self) -> u16 {
        self.duty.get()
    }

    fn get_max_duty(&self) -> u16 {
        self.max_duty
    }

    fn set_duty(&mut self, duty: u16) {
        self.duty.set(duty);
    }
}

/// Tone driver that records `Some(freq)` for tones and `None` for mutes.
#[derive(Clone)]
pub struct FakeTone {
    pub events: Rc<RefCell<Vec<Option<u16>>>>,
}

impl FakeTone {
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl ToneEmitter for FakeTone {
    type Error = Infallible;

    fn tone(&mut self, freq_hz: u16) -> Result<(), Infallible> {
        self.events.borrow_mut().push(Some(freq_hz));
        Ok(())
    }

    fn mute(&mut self) -> Result<(), Infallible> {
        self.events.borrow_mut().push(None);
        Ok(())
    }
}

/// Three-channel ADC with scriptable readings.
#[derive(Clone)]
pub struct FakeAdc {
    left: Rc<Cell<u16>>,
    middle: Rc<Cell<u16>>,
    right: Rc<Cell<u16>>,
}

pub struct LeftProbe;
pub struct MiddleProbe;
pub struct RightProbe;

impl Channel<FakeAdc> for LeftProbe {
    type ID = u8;
    fn channel() -> u8 {
        0
    }
}

impl Channel<FakeAdc> for MiddleProbe {
    type ID = u8;
    fn channel() -> u8 {
        1
    }
}

impl Channel<FakeAdc> for RightProbe {
    type ID = u8;
    fn channel() -> u8 {
        2
    }
}

impl FakeAdc {
    pub fn new() -> Self {
        Self {
            left: Rc::new(Cell::new(0)),
            middle: Rc::new(Cell::new(0)),
            right: Rc::new(Cell::new(0)),
        }
    }

    pub fn set_readings(&self, left: u16, middle: u16, right: u16) {
        self.left.set(left);
        self.middle.set(middle);
        self.right.set(right);
    }
}

impl OneShot<FakeAdc, u16, LeftProbe> for FakeAdc {
    type Error = Infallible;

    fn read(&mut self, _pin: &mut LeftProbe) -> nb::Result<u16, Infallible> {
        Ok(self.left.get())
    }
}

impl OneShot<FakeAdc, u16, MiddleProbe> for FakeAdc {
    type Error = Infallible;

    fn read(&mut self, _pin: &mut MiddleProbe) -> nb::Result<u16, Infallible> {
        Ok(self.middle.get())
    }
}

impl OneShot<FakeAdc, u16, RightProbe> for FakeAdc {
    type Error = Infallible;

    fn read(&mut self, _pin: &mut RightProbe) -> nb::Result<u16, Infallible> {
        Ok(self.right.get())
    }
}

/// Edge timestamps (in microseconds) of one full 32-bit transmission,
/// 9 ms header pulse, 4.5 ms gap, then 560 us marks with 1690 us (one) or
/// 560 us (zero) spaces.
pub fn transmission_edges(value: u32, start_micros: u32) -> Vec<u32> {
    let mut at = start_micros;
    let mut edges = vec![at];

    at += 9_000;
    edges.push(at);
    at += 4_500;
    edges.push(at);

    for bit in 0..32 {
        let is_one = value & (1 << (31 - bit)) != 0;

        at += 560;
        edges.push(at);
        at += if is_one { 1_690 } else { 560 };
        edges.push(at);
    }

    edges
}

/// The 32-bit frame value the kit's remote sends for a command byte:
/// device address 0, then the command and its complement.
pub fn frame_value(code: u8) -> u32 {
    0x00ff_0000 | ((code as u32) << 8) | (!code as u32)
}
