mod common;

use fugit::TimerInstantU32 as TimerInstant;

use carkit::remote::{Button, FrameLatch, IrRemoteDevice, PulseCapture};
use carkit::Sensor;

use common::{frame_value, transmission_edges, TICK_HZ};

fn feed(capture: &mut PulseCapture<'_, TICK_HZ>, edges: &[u32]) {
    for at in edges {
        capture.edge(TimerInstant::from_ticks(*at));
    }
}

#[test]
fn without_a_header_nothing_ever_happens() {
    let latch = FrameLatch::new();
    let mut capture = PulseCapture::new(&latch);
    let mut remote = IrRemoteDevice::new(&latch);

    // deltas cover the frame-gap, repeat-gap, repeat-pulse and data ranges,
    // but never the header range
    let mut at = 0;
    for delta in [100, 560, 1_690, 4_500, 2_500, 600, 2_250, 7_000, 10_000] {
        at += delta;
        capture.edge(TimerInstant::from_ticks(at));
    }

    for _ in 0..4 {
        assert_eq!(remote.sense().unwrap(), None);
    }
}

#[test]
fn one_transmission_yields_one_event() {
    let latch = FrameLatch::new();
    let mut capture = PulseCapture::new(&latch);
    let mut remote = IrRemoteDevice::new(&latch);

    feed(&mut capture, &transmission_edges(frame_value(98), 100_000));

    let update = remote.sense().unwrap().expect("expected a remote event");
    assert_eq!(update.code, Some(98));
    assert_eq!(update.button, Some(Button::Up));
    assert_eq!(update.repeat, 0);

    // same frame observed again: nothing new
    assert_eq!(remote.sense().unwrap(), None);
    assert_eq!(remote.sense().unwrap(), None);
}

#[test]
fn back_to_back_transmissions_each_decode() {
    let latch = FrameLatch::new();
    let mut capture = PulseCapture::new(&latch);
    let mut remote = IrRemoteDevice::new(&latch);

    feed(&mut capture, &transmission_edges(frame_value(98), 100_000));
    let first = remote.sense().unwrap().expect("expected first event");
    assert_eq!(first.button, Some(Button::Up));

    feed(&mut capture, &transmission_edges(frame_value(56), 400_000));
    let second = remote.sense().unwrap().expect("expected second event");
    assert_eq!(second.button, Some(Button::Eight));
    assert_eq!(second.button.unwrap().label(), "8");
}

#[test]
fn unconsumed_frame_wins_over_a_later_one() {
    let latch = FrameLatch::new();
    let mut capture = PulseCapture::new(&latch);
    let mut remote = IrRemoteDevice::new(&latch);

    // two transmissions with no poll in between: the second is dropped
    feed(&mut capture, &transmission_edges(frame_value(98), 100_000));
    feed(&mut capture, &transmission_edges(frame_value(56), 400_000));

    let update = remote.sense().unwrap().expect("expected an event");
    assert_eq!(update.button, Some(Button::Up));
    assert_eq!(remote.sense().unwrap(), None);
}

#[test]
fn repeat_gap_increments_without_altering_command() {
    let latch = FrameLatch::new();
    let mut capture = PulseCapture::new(&latch);
    let mut remote = IrRemoteDevice::new(&latch);

    feed(&mut capture, &transmission_edges(frame_value(98), 100_000));
    assert_eq!(
        remote.sense().unwrap().expect("expected press").button,
        Some(Button::Up)
    );
    assert_eq!(remote.sense().unwrap(), None);

    // held button: header then a 2.5 ms repeat gap
    let at = 300_000;
    capture.edge(TimerInstant::from_ticks(at));
    capture.edge(TimerInstant::from_ticks(at + 9_000));
    capture.edge(TimerInstant::from_ticks(at + 9_000 + 2_500));

    let update = remote.sense().unwrap().expect("expected repeat event");
    assert_eq!(update.code, Some(98));
    assert_eq!(update.button, Some(Button::Up));
    assert_eq!(update.repeat, 1);
}

#[test]
fn quiet_poll_resets_the_repeat_count() {
    let latch = FrameLatch::new();
    let mut capture = PulseCapture::new(&latch);
    let mut remote = IrRemoteDevice::new(&latch);

    feed(&mut capture, &transmission_edges(frame_value(98), 100_000));
    remote.sense().unwrap().expect("expected press");
    assert_eq!(remote.sense().unwrap(), None);

    let at = 300_000;
    capture.edge(TimerInstant::from_ticks(at));
    capture.edge(TimerInstant::from_ticks(at + 9_000));
    capture.edge(TimerInstant::from_ticks(at + 9_000 + 2_500));
    assert_eq!(remote.sense().unwrap().expect("repeat").repeat, 1);

    // nothing arrives: the repeat count neutralizes
    assert_eq!(remote.sense().unwrap(), None);

    // the next repeat pulse counts from one again, not two
    let at = 500_000;
    capture.edge(TimerInstant::from_ticks(at));
    capture.edge(TimerInstant::from_ticks(at + 9_000));
    capture.edge(TimerInstant::from_ticks(at + 9_000 + 2_500));
    assert_eq!(remote.sense().unwrap().expect("repeat").repeat, 1);
}

#[test]
fn long_press_pulses_keep_counting() {
    let latch = FrameLatch::new();
    let mut capture = PulseCapture::new(&latch);
    let mut remote = IrRemoteDevice::new(&latch);

    feed(&mut capture, &transmission_edges(frame_value(98), 100_000));
    remote.sense().unwrap().expect("expected press");

    // header, repeat gap, then two trailing repeat pulses
    let at = 300_000;
    capture.edge(TimerInstant::from_ticks(at));
    capture.edge(TimerInstant::from_ticks(at + 9_000));
    capture.edge(TimerInstant::from_ticks(at + 9_000 + 2_500));
    capture.edge(TimerInstant::from_ticks(at + 9_000 + 2_500 + 600));
    capture.edge(TimerInstant::from_ticks(at + 9_000 + 2_500 + 600 + 560));

    let update = remote.sense().unwrap().expect("expected repeat event");
    assert_eq!(update.repeat, 3);
}

#[test]
fn unmapped_code_is_an_event_with_no_button() {
    let latch = FrameLatch::new();
    let mut capture = PulseCapture::new(&latch);
    let mut remote = IrRemoteDevice::new(&latch);

    feed(&mut capture, &transmission_edges(frame_value(255), 100_000));

    let update = remote.sense().unwrap().expect("expected an event");
    assert_eq!(update.code, Some(255));
    assert_eq!(update.button, None);
}

#[test]
fn complement_check_drops_corrupt_frames() {
    let latch = FrameLatch::new();
    let mut capture = PulseCapture::new(&latch);
    let mut remote = IrRemoteDevice::with_complement_check(&latch);

    // command 0x62 paired with a bogus complement byte
    feed(&mut capture, &transmission_edges(0x00ff_6200, 100_000));
    assert_eq!(remote.sense().unwrap(), None);

    // a clean frame still decodes
    feed(&mut capture, &transmission_edges(frame_value(0x62), 400_000));
    let update = remote.sense().unwrap().expect("expected an event");
    assert_eq!(update.button, Some(Button::Up));
}

#[test]
fn header_mid_frame_restarts_capture() {
    let latch = FrameLatch::new();
    let mut capture = PulseCapture::new(&latch);
    let mut remote = IrRemoteDevice::new(&latch);

    // a transmission cut off after 10 data edges
    let edges = transmission_edges(frame_value(98), 100_000);
    feed(&mut capture, &edges[..13]);
    assert_eq!(remote.sense().unwrap(), None);

    // the retransmission decodes normally
    feed(&mut capture, &transmission_edges(frame_value(98), 400_000));
    let update = remote.sense().unwrap().expect("expected an event");
    assert_eq!(update.button, Some(Button::Up));
}
