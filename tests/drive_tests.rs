mod common;

use core::task::Poll;

use carkit::{Actuator, DriveAction, DriveDevice, Motion};

use common::{pin_log, FakePin, FakePwm};

const MAX_DUTY: u16 = 1_000;

/// Replay the pin log: the register samples the data line on each rising
/// clock edge, and commits on the rising latch edge.
fn shifted_byte(log: &common::PinLog) -> u8 {
    let mut byte = 0u8;
    let mut data_level = false;
    let mut bits = 0;

    for (pin, level) in log.borrow().iter() {
        match (*pin, *level) {
            ("data", level) => data_level = level,
            ("clock", true) => {
                byte = (byte << 1) | data_level as u8;
                bits += 1;
            }
            _ => {}
        }
    }

    assert_eq!(bits, 8, "expected exactly one byte shifted out");
    byte
}

#[test]
fn shifts_the_motion_byte_out_most_significant_first() {
    let log = pin_log();
    let data = FakePin::logged("data", &log);
    let clock = FakePin::logged("clock", &log);
    let latch = FakePin::logged("latch", &log);
    let enable = FakePin::logged("enable", &log);
    let mut drive = DriveDevice::new(
        data,
        clock,
        latch.clone(),
        enable.clone(),
        FakePwm::new(MAX_DUTY),
        FakePwm::new(MAX_DUTY),
    );

    drive.run(&DriveAction::Move {
        motion: Motion::Forward,
        speed: 255,
    });
    assert!(matches!(drive.poll(), Poll::Ready(Ok(()))));

    assert_eq!(shifted_byte(&log), 0xa3);
    // register latched and motors enabled (enable is active low)
    assert!(latch.level());
    assert!(!enable.level());
}

#[test]
fn speed_scales_both_pwm_channels() {
    let pwm_left = FakePwm::new(MAX_DUTY);
    let pwm_right = FakePwm::new(MAX_DUTY);
    let mut drive = DriveDevice::new(
        FakePin::new(),
        FakePin::new(),
        FakePin::new(),
        FakePin::new(),
        pwm_left.clone(),
        pwm_right.clone(),
    );

    drive.run(&DriveAction::Move {
        motion: Motion::Backward,
        speed: 255,
    });
    assert!(matches!(drive.poll(), Poll::Ready(Ok(()))));
    assert_eq!(pwm_left.duty(), MAX_DUTY);
    assert_eq!(pwm_right.duty(), MAX_DUTY);

    drive.run(&DriveAction::Move {
        motion: Motion::Backward,
        speed: 51,
    });
    assert!(matches!(drive.poll(), Poll::Ready(Ok(()))));
    assert_eq!(pwm_left.duty(), MAX_DUTY / 5);
    assert_eq!(pwm_right.duty(), MAX_DUTY / 5);
}

#[test]
fn stop_clears_the_register_and_the_duty() {
    let log = pin_log();
    let data = FakePin::logged("data", &log);
    let clock = FakePin::logged("clock", &log);
    let pwm_left = FakePwm::new(MAX_DUTY);
    let pwm_right = FakePwm::new(MAX_DUTY);
    let mut drive = DriveDevice::new(
        data,
        clock,
        FakePin::new(),
        FakePin::new(),
        pwm_left.clone(),
        pwm_right.clone(),
    );

    drive.run(&DriveAction::Move {
        motion: Motion::SpinRight,
        speed: 200,
    });
    assert!(matches!(drive.poll(), Poll::Ready(Ok(()))));
    log.borrow_mut().clear();

    drive.run(&DriveAction::Stop);
    assert!(matches!(drive.poll(), Poll::Ready(Ok(()))));
    assert_eq!(shifted_byte(&log), 0);
    assert_eq!(pwm_left.duty(), 0);
    assert_eq!(pwm_right.duty(), 0);
}

#[test]
fn poll_without_a_pending_action_is_a_no_op() {
    let log = pin_log();
    let mut drive = DriveDevice::new(
        FakePin::logged("data", &log),
        FakePin::logged("clock", &log),
        FakePin::logged("latch", &log),
        FakePin::logged("enable", &log),
        FakePwm::new(MAX_DUTY),
        FakePwm::new(MAX_DUTY),
    );

    assert!(matches!(drive.poll(), Poll::Ready(Ok(()))));
    assert!(log.borrow().is_empty());
}
