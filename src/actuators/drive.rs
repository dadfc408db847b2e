use core::fmt::Debug;
use core::task::Poll;
use defmt::Format;
use embedded_hal::digital::v2::OutputPin;
use embedded_hal::PwmPin;

use super::Actuator;
use crate::error::Error;

// Per-motor bits of the 74HC595 shift register driving the four H-bridges.
// M1/M2 are the left side, M3/M4 the right side.
const M1_FORWARD: u8 = 0x80;
const M1_REVERSE: u8 = 0x40;
const M2_FORWARD: u8 = 0x20;
const M2_REVERSE: u8 = 0x10;
const M3_FORWARD: u8 = 0x02;
const M3_REVERSE: u8 = 0x04;
const M4_FORWARD: u8 = 0x01;
const M4_REVERSE: u8 = 0x08;

/// Chassis motions of the four-motor mecanum drive.
#[derive(Clone, Copy, Debug, Format, PartialEq, Eq)]
pub enum Motion {
    Forward,
    Backward,
    /// Strafe left without turning.
    SlideLeft,
    /// Strafe right without turning.
    SlideRight,
    ForwardLeft,
    ForwardRight,
    BackwardLeft,
    BackwardRight,
    /// Rotate counter-clockwise in place.
    SpinLeft,
    /// Rotate clockwise in place.
    SpinRight,
}

impl Motion {
    /// Shift register byte selecting each motor's direction for this motion.
    pub const fn register_bits(self) -> u8 {
        match self {
            Motion::Forward => M1_FORWARD | M2_FORWARD | M3_FORWARD | M4_FORWARD,
            Motion::Backward => M1_REVERSE | M2_REVERSE | M3_REVERSE | M4_REVERSE,
            Motion::SlideLeft => M1_REVERSE | M2_FORWARD | M3_FORWARD | M4_REVERSE,
            Motion::SlideRight => M1_FORWARD | M2_REVERSE | M3_REVERSE | M4_FORWARD,
            Motion::ForwardLeft => M2_FORWARD | M3_FORWARD,
            Motion::ForwardRight => M1_FORWARD | M4_FORWARD,
            Motion::BackwardLeft => M1_REVERSE | M4_REVERSE,
            Motion::BackwardRight => M2_REVERSE | M3_REVERSE,
            Motion::SpinLeft => M1_REVERSE | M2_REVERSE | M3_FORWARD | M4_FORWARD,
            Motion::SpinRight => M1_FORWARD | M2_FORWARD | M3_REVERSE | M4_REVERSE,
        }
    }
}

#[derive(Clone, Copy, Debug, Format, PartialEq, Eq)]
pub enum DriveAction {
    /// Drive in `motion` at `speed` (0-255).
    Move { motion: Motion, speed: u8 },
    Stop,
}

/// Four-motor chassis behind a 74HC595 shift register.
///
/// The register byte selects each motor's direction; the two PWM channels
/// gate the left and right motor supplies. The enable pin is active low.
pub struct DriveDevice<Data, Clock, Latch, Enable, PwmLeft, PwmRight>
where
    Data: OutputPin,
    Clock: OutputPin,
    Latch: OutputPin,
    Enable: OutputPin,
    PwmLeft: PwmPin<Duty = u16>,
    PwmRight: PwmPin<Duty = u16>,
{
    data: Data,
    clock: Clock,
    latch: Latch,
    enable: Enable,
    pwm_left: PwmLeft,
    pwm_right: PwmRight,
    pending: Option<DriveAction>,
}

impl<Data, Clock, Latch, Enable, PwmLeft, PwmRight>
    DriveDevice<Data, Clock, Latch, Enable, PwmLeft, PwmRight>
where
    Data: OutputPin,
    Clock: OutputPin,
    Latch: OutputPin,
    Enable: OutputPin,
    PwmLeft: PwmPin<Duty = u16>,
    PwmRight: PwmPin<Duty = u16>,
{
    pub fn new(
        data: Data,
        clock: Clock,
        latch: Latch,
        enable: Enable,
        mut pwm_left: PwmLeft,
        mut pwm_right: PwmRight,
    ) -> Self {
        pwm_left.set_duty(0);
        pwm_left.enable();
        pwm_right.set_duty(0);
        pwm_right.enable();

        Self {
            data,
            clock,
            latch,
            enable,
            pwm_left,
            pwm_right,
            pending: None,
        }
    }

    fn apply(
        &mut self,
        register_bits: u8,
        speed: u8,
    ) -> Result<(), DriveError<Data::Error, Clock::Error, Latch::Error, Enable::Error>> {
        self.enable.set_low().map_err(DriveError::Enable)?;

        let max_left = self.pwm_left.get_max_duty() as u32;
        self.pwm_left
            .set_duty((max_left * speed as u32 / 255) as u16);
        let max_right = self.pwm_right.get_max_duty() as u32;
        self.pwm_right
            .set_duty((max_right * speed as u32 / 255) as u16);

        self.latch.set_low().map_err(DriveError::Latch)?;
        self.shift_out(register_bits)?;
        self.latch.set_high().map_err(DriveError::Latch)?;

        Ok(())
    }

    /// Bit-bang one byte into the register, most significant bit first.
    fn shift_out(
        &mut self,
        value: u8,
    ) -> Result<(), DriveError<Data::Error, Clock::Error, Latch::Error, Enable::Error>> {
        for bit in 0..8 {
            if value >> (7 - bit) & 1 == 0 {
                self.data.set_low().map_err(DriveError::Data)?;
            } else {
                self.data.set_high().map_err(DriveError::Data)?;
            }

            self.clock.set_high().map_err(DriveError::Clock)?;
            self.clock.set_low().map_err(DriveError::Clock)?;
        }

        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub enum DriveError<DataError, ClockError, LatchError, EnableError>
where
    DataError: Debug,
    ClockError: Debug,
    LatchError: Debug,
    EnableError: Debug,
{
    Data(DataError),
    Clock(ClockError),
    Latch(LatchError),
    Enable(EnableError),
}

impl<DataError, ClockError, LatchError, EnableError> Error
    for DriveError<DataError, ClockError, LatchError, EnableError>
where
    DataError: Debug,
    ClockError: Debug,
    LatchError: Debug,
    EnableError: Debug,
{
}

impl<Data, Clock, Latch, Enable, PwmLeft, PwmRight> Actuator
    for DriveDevice<Data, Clock, Latch, Enable, PwmLeft, PwmRight>
where
    Data: OutputPin,
    Data::Error: Debug,
    Clock: OutputPin,
    Clock::Error: Debug,
    Latch: OutputPin,
    Latch::Error: Debug,
    Enable: OutputPin,
    Enable::Error: Debug,
    PwmLeft: PwmPin<Duty = u16>,
    PwmRight: PwmPin<Duty = u16>,
{
    type Action = DriveAction;
    type Error = DriveError<Data::Error, Clock::Error, Latch::Error, Enable::Error>;

    fn run(&mut self, action: &Self::Action) {
        self.pending = Some(*action);
    }

    fn poll(&mut self) -> Poll<Result<(), Self::Error>> {
        match self.pending.take() {
            None => Poll::Ready(Ok(())),
            Some(DriveAction::Move { motion, speed }) => {
                self.apply(motion.register_bits(), speed)?;

                Poll::Ready(Ok(()))
            }
            Some(DriveAction::Stop) => {
                self.apply(0, 0)?;

                Poll::Ready(Ok(()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_bits_drive_all_four_motors() {
        assert_eq!(Motion::Forward.register_bits(), 0xa3);
        assert_eq!(Motion::Backward.register_bits(), 0x5c);
        assert_eq!(Motion::SlideLeft.register_bits(), 0x6a);
        assert_eq!(Motion::SlideRight.register_bits(), 0x95);
        assert_eq!(Motion::SpinLeft.register_bits(), 0x53);
        assert_eq!(Motion::SpinRight.register_bits(), 0xac);
    }

    #[test]
    fn diagonal_motions_drive_one_diagonal_pair() {
        assert_eq!(Motion::ForwardLeft.register_bits(), 0x22);
        assert_eq!(Motion::ForwardRight.register_bits(), 0x81);
        assert_eq!(Motion::BackwardLeft.register_bits(), 0x48);
        assert_eq!(Motion::BackwardRight.register_bits(), 0x14);
    }

    #[test]
    fn no_motion_ever_fights_a_motor_against_itself() {
        let motions = [
            Motion::Forward,
            Motion::Backward,
            Motion::SlideLeft,
            Motion::SlideRight,
            Motion::ForwardLeft,
            Motion::ForwardRight,
            Motion::BackwardLeft,
            Motion::BackwardRight,
            Motion::SpinLeft,
            Motion::SpinRight,
        ];
        let pairs = [
            (M1_FORWARD, M1_REVERSE),
            (M2_FORWARD, M2_REVERSE),
            (M3_FORWARD, M3_REVERSE),
            (M4_FORWARD, M4_REVERSE),
        ];

        for motion in motions {
            let bits = motion.register_bits();
            for (forward, reverse) in pairs {
                assert!(bits & forward == 0 || bits & reverse == 0);
            }
        }
    }
}
