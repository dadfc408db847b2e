#![no_std]

extern crate alloc;

pub mod actuators;
pub mod behavior;
pub mod car;
pub mod error;
pub mod remote;
pub mod runner;
pub mod scheduler;
pub mod sensors;
pub mod timer;

// used by the `actuator_set!` macro expansion
#[doc(hidden)]
pub use paste;

pub use actuators::{
    buzzer::{pitch, BuzzerAction, BuzzerDevice, Note, ToneEmitter},
    drive::{DriveAction, DriveDevice, Motion},
    headlight::{HeadlightAction, HeadlightDevice},
    led::{LedAction, LedDevice},
    servo::{ServoAction, ServoDevice},
    Actuator, ActuatorSet,
};
pub use car::{Car, CarBuildError};
pub use error::{BoxError, Error};
pub use remote::{Button, FrameLatch, IrRemoteDevice, PulseCapture, RemoteUpdate};
pub use runner::{Command, Runner, RunnerAction};
pub use scheduler::Scheduler;
pub use sensors::{
    switch::{SwitchActiveHigh, SwitchActiveLow, SwitchDevice, SwitchStatus, SwitchUpdate},
    tracker::{LineTrackerDevice, LineUpdate},
    ultrasonic::{RangeUpdate, UltrasonicDevice},
    Sensor,
};
pub use timer::{TickTimer, TimerHandle};
