use crate::actuators::drive::{DriveAction, Motion};
use crate::remote::Button;

/// Chassis speed for remote-controlled driving.
pub const DRIVE_SPEED: u8 = 220;

/// Map a remote button to a chassis action: arrows drive and spin, 1 and 3
/// strafe, anything else (including no button) stops the car.
pub fn drive_for_button(button: Option<Button>) -> DriveAction {
    let motion = match button {
        Some(Button::Up) => Motion::Forward,
        Some(Button::Down) => Motion::Backward,
        Some(Button::Left) => Motion::SpinLeft,
        Some(Button::Right) => Motion::SpinRight,
        Some(Button::One) => Motion::SlideLeft,
        Some(Button::Three) => Motion::SlideRight,
        _ => return DriveAction::Stop,
    };

    DriveAction::Move {
        motion,
        speed: DRIVE_SPEED,
    }
}
