mod common;

use carkit::{Sensor, UltrasonicDevice};

use common::{Clock, FakePin};

#[test]
fn measures_the_echo_width() {
    let clock = Clock::new();
    let trig = FakePin::new();
    let echo = FakePin::new();
    let mut ranger = UltrasonicDevice::new(trig.clone(), echo.clone(), clock.handle());

    // trigger pulse goes out
    assert!(ranger.sense().unwrap().is_none());
    assert!(trig.level());
    clock.advance_micros(11);
    assert!(ranger.sense().unwrap().is_none());
    assert!(!trig.level());

    // echo arrives and lasts 580 us
    echo.set_level(true);
    assert!(ranger.sense().unwrap().is_none());
    clock.advance_micros(580);
    echo.set_level(false);

    let update = ranger.sense().unwrap().expect("expected a reading");
    assert_eq!(update.echo_micros, Some(580));
    assert_eq!(update.millimeters(), Some(99));
    assert_eq!(update.centimeters(), Some(9.9));
}

#[test]
fn a_missing_echo_reads_out_of_range() {
    let clock = Clock::new();
    let trig = FakePin::new();
    let echo = FakePin::new();
    let mut ranger = UltrasonicDevice::new(trig.clone(), echo.clone(), clock.handle());

    assert!(ranger.sense().unwrap().is_none());
    clock.advance_micros(11);
    assert!(ranger.sense().unwrap().is_none());

    // nothing comes back for over a second
    clock.advance_micros(1_000_001);
    let update = ranger.sense().unwrap().expect("expected a reading");
    assert_eq!(update.echo_micros, None);
    assert_eq!(update.millimeters(), None);
}

#[test]
fn ranging_restarts_after_each_reading() {
    let clock = Clock::new();
    let trig = FakePin::new();
    let echo = FakePin::new();
    let mut ranger = UltrasonicDevice::new(trig.clone(), echo.clone(), clock.handle());

    for expected_micros in [580u32, 1_160] {
        assert!(ranger.sense().unwrap().is_none());
        clock.advance_micros(11);
        assert!(ranger.sense().unwrap().is_none());

        echo.set_level(true);
        assert!(ranger.sense().unwrap().is_none());
        clock.advance_micros(expected_micros);
        echo.set_level(false);

        let update = ranger.sense().unwrap().expect("expected a reading");
        assert_eq!(update.echo_micros, Some(expected_micros));
    }
}
